use crate::error::AnalyticsError;
use crate::frame::OrderFrame;
use crate::report::{CategorySummary, MonthlyOrders, Rank, RankBy, StateCustomerCount};
use core_types::Column;
use dataset::TableView;
use polars::prelude::*;

/// How many categories the ranked tables keep by default.
pub const DEFAULT_TOP_N: usize = 5;

const CUSTOMER_COUNT: &str = "customer_count";
const ORDER_COUNT: &str = "order_count";
const REVENUE_UNITS: &str = "revenue_units";

/// A stateless calculator for the dashboard's summary tables.
///
/// Each aggregator copies the columns it needs into a polars frame, drops rows
/// whose group key is null, groups with `group_by_stable` and orders the groups
/// by key. Every later sort keeps that order for ties, so repeated runs agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyticsEngine {
    top_n: usize,
}

impl Default for AnalyticsEngine {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides how many entries the ranked category tables keep.
    pub fn with_top_n(top_n: usize) -> Self {
        Self { top_n }
    }

    /// Counts distinct customers per `customer_state`.
    ///
    /// The result is ordered by state code. A customer with many order lines in
    /// one state counts once. States with no rows are absent.
    pub fn customers_by_state(
        &self,
        view: &TableView<'_>,
    ) -> Result<Vec<StateCustomerCount>, AnalyticsError> {
        let state = Column::CustomerState.as_str();
        let customer = Column::CustomerId.as_str();

        let frame = OrderFrame::build(view, &[Column::CustomerState, Column::CustomerId])?;
        let grouped = frame
            .lazy()
            .filter(col(state).is_not_null())
            .group_by_stable([col(state)])
            .agg([col(customer)
                .drop_nulls()
                .n_unique()
                .cast(DataType::UInt64)
                .alias(CUSTOMER_COUNT)])
            .sort(state, by_key())
            .collect()?;

        let states = grouped.column(state)?.str()?;
        let counts = grouped.column(CUSTOMER_COUNT)?.u64()?;
        Ok(states
            .into_iter()
            .zip(counts)
            .filter_map(|(state, count)| {
                Some(StateCustomerCount {
                    customer_state: state?.to_string(),
                    customer_count: count.unwrap_or(0) as usize,
                })
            })
            .collect())
    }

    /// Order-line count and revenue per `order_month`, oldest month first.
    ///
    /// Months are `YYYY-MM` text (the loader rejects anything else), so text
    /// order is chronological order.
    pub fn monthly_orders(
        &self,
        view: &TableView<'_>,
    ) -> Result<Vec<MonthlyOrders>, AnalyticsError> {
        let month = Column::OrderMonth.as_str();

        let frame = OrderFrame::build(view, &[Column::OrderMonth, Column::OrderId, Column::Price])?;
        let grouped = frame
            .lazy()
            .filter(col(month).is_not_null())
            .group_by_stable([col(month)])
            .agg([
                col(Column::OrderId.as_str())
                    .is_not_null()
                    .cast(DataType::UInt64)
                    .sum()
                    .alias(ORDER_COUNT),
                col(Column::Price.as_str()).sum().alias(REVENUE_UNITS),
            ])
            .sort(month, by_key())
            .collect()?;

        let months = grouped.column(month)?.str()?;
        let counts = grouped.column(ORDER_COUNT)?.u64()?;
        let revenue = grouped.column(REVENUE_UNITS)?.i64()?;
        Ok(months
            .into_iter()
            .zip(counts)
            .zip(revenue)
            .filter_map(|((month, count), units)| {
                let month = month?.to_string();
                Some(MonthlyOrders {
                    order_month_label: month.clone(),
                    order_month: month,
                    order_count: count.unwrap_or(0) as usize,
                    revenue: frame.revenue(units),
                })
            })
            .collect())
    }

    /// The `top_n` categories with the largest summed price.
    pub fn highest_income_categories(
        &self,
        view: &TableView<'_>,
    ) -> Result<Vec<CategorySummary>, AnalyticsError> {
        self.ranked_categories(view, RankBy::Revenue, Rank::Highest)
    }

    /// The `top_n` categories with the smallest summed price.
    pub fn lowest_income_categories(
        &self,
        view: &TableView<'_>,
    ) -> Result<Vec<CategorySummary>, AnalyticsError> {
        self.ranked_categories(view, RankBy::Revenue, Rank::Lowest)
    }

    /// The `top_n` categories with the most distinct orders.
    pub fn highest_sales_categories(
        &self,
        view: &TableView<'_>,
    ) -> Result<Vec<CategorySummary>, AnalyticsError> {
        self.ranked_categories(view, RankBy::Volume, Rank::Highest)
    }

    /// The `top_n` categories with the fewest distinct orders.
    pub fn lowest_sales_categories(
        &self,
        view: &TableView<'_>,
    ) -> Result<Vec<CategorySummary>, AnalyticsError> {
        self.ranked_categories(view, RankBy::Volume, Rank::Lowest)
    }

    /// Summarizes every category, sorts by `by` toward `rank`, and keeps `top_n`.
    ///
    /// Categories with equal measures stay in category order.
    pub fn ranked_categories(
        &self,
        view: &TableView<'_>,
        by: RankBy,
        rank: Rank,
    ) -> Result<Vec<CategorySummary>, AnalyticsError> {
        let category = Column::ProductCategoryNameEnglish.as_str();
        let measure = match by {
            RankBy::Revenue => REVENUE_UNITS,
            RankBy::Volume => ORDER_COUNT,
        };
        let descending = matches!(rank, Rank::Highest);
        let limit = IdxSize::try_from(self.top_n).unwrap_or(IdxSize::MAX);

        let frame = OrderFrame::build(
            view,
            &[
                Column::ProductCategoryNameEnglish,
                Column::OrderId,
                Column::Price,
            ],
        )?;
        let ranked = frame
            .lazy()
            .filter(col(category).is_not_null())
            .group_by_stable([col(category)])
            .agg([
                col(Column::OrderId.as_str())
                    .drop_nulls()
                    .n_unique()
                    .cast(DataType::UInt64)
                    .alias(ORDER_COUNT),
                col(Column::Price.as_str()).sum().alias(REVENUE_UNITS),
            ])
            .sort(category, by_key())
            .sort_by_exprs([col(measure)], [descending], false, true)
            .limit(limit)
            .collect()?;

        let categories = ranked.column(category)?.str()?;
        let counts = ranked.column(ORDER_COUNT)?.u64()?;
        let revenue = ranked.column(REVENUE_UNITS)?.i64()?;
        Ok(categories
            .into_iter()
            .zip(counts)
            .zip(revenue)
            .filter_map(|((category, count), units)| {
                Some(CategorySummary {
                    category: category?.to_string(),
                    order_count: count.unwrap_or(0) as usize,
                    revenue: frame.revenue(units),
                })
            })
            .collect())
    }
}

/// Ascending group-key order; the sort is stable.
fn by_key() -> SortOptions {
    SortOptions {
        maintain_order: true,
        ..Default::default()
    }
}

/// Re-sorts a by-state table for display, largest customer count first.
///
/// Ties keep their incoming (state code) order.
pub fn sort_by_customer_count_desc(mut counts: Vec<StateCustomerCount>) -> Vec<StateCustomerCount> {
    counts.sort_by(|a, b| b.customer_count.cmp(&a.customer_count));
    counts
}


#[cfg(test)]
mod tests {
    use super::*;
    use core_types::OrderLine;
    use dataset::{Dataset, Schema};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn line(order: &str, category: Option<&str>, price: Option<Decimal>) -> OrderLine {
        OrderLine {
            order_id: Some(order.to_string()),
            customer_id: Some(format!("cust-{order}")),
            customer_state: Some("SP".to_string()),
            product_category_name_english: category.map(str::to_string),
            price,
            order_month: Some("2018-01".to_string()),
            ..OrderLine::default()
        }
    }

    #[test]
    fn null_category_rows_are_dropped_from_category_tables() {
        let dataset = Dataset::new(
            "test",
            Schema::complete(),
            vec![
                line("1", Some("toys"), Some(dec!(10))),
                line("2", None, Some(dec!(99))),
            ],
        );
        let engine = AnalyticsEngine::new();
        let highest = engine.highest_income_categories(&dataset.all()).unwrap();
        assert_eq!(highest.len(), 1);
        assert_eq!(highest[0].category, "toys");
    }

    #[test]
    fn null_prices_are_skipped_in_sums() {
        let dataset = Dataset::new(
            "test",
            Schema::complete(),
            vec![
                line("1", Some("toys"), Some(dec!(10))),
                line("2", Some("toys"), None),
            ],
        );
        let engine = AnalyticsEngine::new();
        let monthly = engine.monthly_orders(&dataset.all()).unwrap();
        assert_eq!(monthly[0].order_count, 2);
        assert_eq!(monthly[0].revenue, dec!(10));
    }

    #[test]
    fn ties_keep_category_order() {
        let dataset = Dataset::new(
            "test",
            Schema::complete(),
            vec![
                line("1", Some("garden"), Some(dec!(5))),
                line("2", Some("art"), Some(dec!(5))),
                line("3", Some("books"), Some(dec!(5))),
            ],
        );
        let engine = AnalyticsEngine::new();
        let view = dataset.all();
        let names = |rows: Vec<CategorySummary>| -> Vec<String> {
            rows.into_iter().map(|r| r.category).collect()
        };
        assert_eq!(
            names(engine.highest_income_categories(&view).unwrap()),
            vec!["art", "books", "garden"]
        );
        assert_eq!(
            names(engine.lowest_sales_categories(&view).unwrap()),
            vec!["art", "books", "garden"]
        );
    }

    #[test]
    fn custom_top_n_truncates() {
        let dataset = Dataset::new(
            "test",
            Schema::complete(),
            vec![
                line("1", Some("a"), Some(dec!(1))),
                line("2", Some("b"), Some(dec!(2))),
                line("3", Some("c"), Some(dec!(3))),
            ],
        );
        let engine = AnalyticsEngine::with_top_n(2);
        let lowest = engine.lowest_income_categories(&dataset.all()).unwrap();
        assert_eq!(lowest.len(), 2);
        assert_eq!(lowest[0].category, "a");
        assert_eq!(lowest[1].category, "b");
    }

    #[test]
    fn display_sort_puts_largest_state_first() {
        let counts = vec![
            StateCustomerCount {
                customer_state: "AC".to_string(),
                customer_count: 1,
            },
            StateCustomerCount {
                customer_state: "RJ".to_string(),
                customer_count: 4,
            },
            StateCustomerCount {
                customer_state: "SP".to_string(),
                customer_count: 1,
            },
        ];
        let sorted = sort_by_customer_count_desc(counts);
        let states: Vec<_> = sorted.iter().map(|c| c.customer_state.as_str()).collect();
        assert_eq!(states, vec!["RJ", "AC", "SP"]);
    }
}
