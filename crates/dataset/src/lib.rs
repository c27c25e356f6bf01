//! # Storefront Dataset Crate
//!
//! Loads the pre-joined order-line extract and exposes it as an immutable,
//! shareable context for the analytics layer.
//!
//! ## Architectural Principles
//!
//! - **Load once:** `load_dataset` reads and normalizes the source a single time.
//!   The resulting `Dataset` is never mutated and is meant to be shared behind
//!   an `Arc` for the lifetime of the process.
//! - **Borrowing views:** `Dataset::filter` returns a `TableView` of references,
//!   so a date-range change never copies rows.
//! - **Lenient columns, strict dates:** only the five timestamp columns are
//!   mandatory at load time. Every other column is checked by whoever needs it,
//!   through `Schema::require`.
//!
//! ## Public API
//!
//! - `load_dataset` / `load_from_reader`: the loader and normalizer.
//! - `Dataset`, `Schema`, `TableView`: the loaded table and its views.
//! - `DataLoadError`, `SchemaError`: the error types of this crate.

pub mod error;
pub mod loader;
pub mod table;

pub use error::{DataLoadError, SchemaError};
pub use loader::{load_dataset, load_from_reader};
pub use table::{Dataset, Schema, TableView};
