use core_types::DateRange;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Distinct customers per region code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StateCustomerCount {
    pub customer_state: String,
    pub customer_count: usize,
}

/// Order lines and revenue for one `order_month` bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyOrders {
    pub order_month: String,
    /// Number of order lines with an `order_id`, not distinct orders.
    pub order_count: usize,
    pub revenue: Decimal,
    /// The month key rendered for axis labels.
    pub order_month_label: String,
}

/// Distinct orders and revenue for one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: String,
    pub order_count: usize,
    pub revenue: Decimal,
}

/// The measure categories are ranked by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankBy {
    /// Summed line-item price.
    Revenue,
    /// Distinct order count.
    Volume,
}

/// Which end of the ranking to keep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    #[default]
    Highest,
    Lowest,
}

/// The two headline figures shown above the monthly trend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadlineMetrics {
    pub total_orders: usize,
    pub total_revenue: Decimal,
    pub total_revenue_display: String,
}

/// Conditions worth surfacing to the user that are not errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DashboardWarning {
    /// The selected range matched no rows; every table is empty.
    EmptyResult,
}

/// Everything a presentation shell needs to render one dashboard pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViewModel {
    pub range: DateRange,
    pub bounds: Option<DateRange>,
    pub row_count: usize,
    pub headline: HeadlineMetrics,
    pub monthly_orders: Vec<MonthlyOrders>,
    /// Sorted by customer count, largest first.
    pub customers_by_state: Vec<StateCustomerCount>,
    pub highest_income: Vec<CategorySummary>,
    pub lowest_income: Vec<CategorySummary>,
    pub highest_sales: Vec<CategorySummary>,
    pub lowest_sales: Vec<CategorySummary>,
    pub warnings: Vec<DashboardWarning>,
}
