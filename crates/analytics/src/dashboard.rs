use crate::engine::{AnalyticsEngine, sort_by_customer_count_desc};
use crate::error::AnalyticsError;
use crate::format::CurrencyFormat;
use crate::report::{DashboardViewModel, DashboardWarning, HeadlineMetrics, MonthlyOrders};
use chrono::NaiveDate;
use core_types::DateRange;
use dataset::Dataset;
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;

/// The immutable context a presentation shell recomputes against.
///
/// Built once at startup around the loaded dataset; cheap to clone.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    engine: AnalyticsEngine,
    currency: CurrencyFormat,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>, engine: AnalyticsEngine, currency: CurrencyFormat) -> Self {
        Self {
            dataset,
            engine,
            currency,
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn engine(&self) -> &AnalyticsEngine {
        &self.engine
    }

    pub fn date_bounds(&self) -> Option<DateRange> {
        self.dataset.date_bounds()
    }

    /// Builds a range from optional user input, defaulting each missing end to
    /// the dataset's bounds.
    pub fn resolve_range(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<DateRange, AnalyticsError> {
        let bounds = self.date_bounds();
        let start = match start.or(bounds.map(|b| b.start())) {
            Some(start) => start,
            None => return Err(AnalyticsError::NoDateBounds),
        };
        let end = match end.or(bounds.map(|b| b.end())) {
            Some(end) => end,
            None => return Err(AnalyticsError::NoDateBounds),
        };
        Ok(DateRange::new(start, end)?)
    }

    /// Filters the dataset to `range` and recomputes every summary table.
    pub fn compute(&self, range: &DateRange) -> Result<DashboardViewModel, AnalyticsError> {
        let started = Instant::now();
        let view = self.dataset.filter(range);

        let mut warnings = Vec::new();
        if view.is_empty() {
            tracing::warn!(start = %range.start(), end = %range.end(), "Selected range matched no order lines.");
            warnings.push(DashboardWarning::EmptyResult);
        }

        let monthly_orders = self.engine.monthly_orders(&view)?;
        let customers_by_state =
            sort_by_customer_count_desc(self.engine.customers_by_state(&view)?);
        let highest_income = self.engine.highest_income_categories(&view)?;
        let lowest_income = self.engine.lowest_income_categories(&view)?;
        let highest_sales = self.engine.highest_sales_categories(&view)?;
        let lowest_sales = self.engine.lowest_sales_categories(&view)?;
        let headline = self.headline(&monthly_orders);

        tracing::debug!(
            start = %range.start(),
            end = %range.end(),
            rows = view.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Dashboard recomputed."
        );

        Ok(DashboardViewModel {
            range: *range,
            bounds: self.date_bounds(),
            row_count: view.len(),
            headline,
            monthly_orders,
            customers_by_state,
            highest_income,
            lowest_income,
            highest_sales,
            lowest_sales,
            warnings,
        })
    }

    /// Totals the monthly table into the two headline figures.
    pub fn headline(&self, monthly_orders: &[MonthlyOrders]) -> HeadlineMetrics {
        let total_orders = monthly_orders.iter().map(|m| m.order_count).sum();
        let total_revenue: Decimal = monthly_orders.iter().map(|m| m.revenue).sum();

        HeadlineMetrics {
            total_orders,
            total_revenue,
            total_revenue_display: self.currency.format(total_revenue),
        }
    }
}
