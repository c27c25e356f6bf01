//! # Storefront Analytics Engine
//!
//! This crate turns a (possibly date-filtered) view of the order-line table into
//! the small summary tables a dashboard renders.
//!
//! ## Architectural Principles
//!
//! - **Pure logic:** no I/O. Its only input is the read-only views handed out
//!   by `dataset`.
//! - **Frames for grouping:** each aggregator copies the columns it needs into
//!   a polars `DataFrame` and runs a lazy group-by/sort/limit query over it.
//! - **Stateless calculation:** `AnalyticsEngine` holds nothing but its ranking
//!   limit. Every aggregator is an idempotent function of its input view.
//! - **Explicit recompute:** `Dashboard::compute` reruns the whole pipeline for
//!   a date range against the shared, immutable dataset.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: the six aggregators.
//! - `Dashboard`, `DashboardViewModel`: the recompute entry point and its output.
//! - `CurrencyFormat`: renders revenue figures for headline metrics.
//! - `AnalyticsError`: the errors that can be returned from this crate.

pub mod dashboard;
pub mod engine;
pub mod error;
pub mod format;
mod frame;
pub mod report;

pub use dashboard::Dashboard;
pub use engine::{AnalyticsEngine, DEFAULT_TOP_N, sort_by_customer_count_desc};
pub use error::AnalyticsError;
pub use format::CurrencyFormat;
pub use report::{
    CategorySummary, DashboardViewModel, DashboardWarning, HeadlineMetrics, MonthlyOrders, Rank,
    RankBy, StateCustomerCount,
};
