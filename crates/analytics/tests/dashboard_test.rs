//! End-to-end recompute: CSV text -> dataset -> dashboard view model.

use analytics::{AnalyticsEngine, AnalyticsError, CurrencyFormat, Dashboard, DashboardWarning};
use chrono::NaiveDate;
use core_types::{CoreError, DateRange};
use dataset::load_from_reader;
use rust_decimal_macros::dec;
use std::sync::Arc;

const EXTRACT: &str = "\
order_id,customer_id,customer_state,product_category_name_english,price,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,order_month
1,A,SP,toys,10.00,2018-01-02 09:00:00,2018-01-02 10:00:00,2018-01-05 16:20:00,2018-01-10 12:00:00,2018-01-20 00:00:00,2018-01
2,A,SP,toys,5.00,2018-01-03 09:00:00,2018-01-03 10:00:00,2018-01-06 08:00:00,2018-01-11 12:00:00,2018-01-20 00:00:00,2018-01
3,B,RJ,books,20.00,2018-02-01 09:00:00,2018-02-01 10:00:00,2018-02-03 23:59:00,2018-02-09 12:00:00,2018-02-20 00:00:00,2018-02
4,C,MG,garden,1200.50,2018-02-10 09:00:00,2018-02-10 10:00:00,,,2018-02-25 00:00:00,2018-02
";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn dashboard() -> Dashboard {
    let dataset = load_from_reader(EXTRACT.as_bytes(), "inline").unwrap();
    Dashboard::new(
        Arc::new(dataset),
        AnalyticsEngine::new(),
        CurrencyFormat::default(),
    )
}

#[test]
fn test_full_range_view_model() {
    let dashboard = dashboard();
    let bounds = dashboard.date_bounds().unwrap();
    assert_eq!(bounds.start(), day(2018, 1, 5));
    assert_eq!(bounds.end(), day(2018, 2, 3));

    let view = dashboard.compute(&bounds).unwrap();

    // The undelivered garden order is outside every range.
    assert_eq!(view.row_count, 3);
    assert!(view.warnings.is_empty());
    assert_eq!(view.headline.total_orders, 3);
    assert_eq!(view.headline.total_revenue, dec!(35.00));
    assert_eq!(view.headline.total_revenue_display, "R$\u{a0}35,00");
    assert_eq!(view.monthly_orders.len(), 2);
    assert_eq!(view.highest_income[0].category, "books");
    assert_eq!(view.highest_sales[0].category, "toys");
    assert_eq!(view.customers_by_state.len(), 2);
}

#[test]
fn test_end_day_includes_late_timestamps() {
    let dashboard = dashboard();
    // Order 3 was handed over at 23:59 on the last day of the range.
    let range = DateRange::new(day(2018, 2, 1), day(2018, 2, 3)).unwrap();
    let view = dashboard.compute(&range).unwrap();
    assert_eq!(view.row_count, 1);
    assert_eq!(view.highest_income[0].category, "books");
}

#[test]
fn test_empty_range_warns_but_succeeds() {
    let dashboard = dashboard();
    let range = DateRange::new(day(2017, 1, 1), day(2017, 12, 31)).unwrap();
    let view = dashboard.compute(&range).unwrap();

    assert_eq!(view.row_count, 0);
    assert_eq!(view.warnings, vec![DashboardWarning::EmptyResult]);
    assert_eq!(view.headline.total_orders, 0);
    assert_eq!(view.headline.total_revenue_display, "R$\u{a0}0,00");
    assert!(view.monthly_orders.is_empty());
    assert!(view.customers_by_state.is_empty());
    assert!(view.highest_income.is_empty());
    assert!(view.lowest_sales.is_empty());
}

#[test]
fn test_recompute_is_deterministic() {
    let dashboard = dashboard();
    let range = dashboard.date_bounds().unwrap();
    assert_eq!(
        dashboard.compute(&range).unwrap(),
        dashboard.compute(&range).unwrap()
    );
}

#[test]
fn test_resolve_range_defaults_to_bounds() {
    let dashboard = dashboard();

    let full = dashboard.resolve_range(None, None).unwrap();
    assert_eq!(Some(full), dashboard.date_bounds());

    let partial = dashboard.resolve_range(Some(day(2018, 1, 20)), None).unwrap();
    assert_eq!(partial.start(), day(2018, 1, 20));
    assert_eq!(partial.end(), day(2018, 2, 3));
}

#[test]
fn test_resolve_range_rejects_inverted_input() {
    let dashboard = dashboard();
    let err = dashboard
        .resolve_range(Some(day(2018, 3, 1)), Some(day(2018, 1, 1)))
        .unwrap_err();
    assert!(matches!(err, AnalyticsError::Range(CoreError::InvalidRange { .. })));
}

#[test]
fn test_resolve_range_without_deliveries_needs_explicit_bounds() {
    let header = EXTRACT.lines().next().unwrap();
    let dataset = load_from_reader(header.as_bytes(), "empty").unwrap();
    let dashboard = Dashboard::new(
        Arc::new(dataset),
        AnalyticsEngine::new(),
        CurrencyFormat::default(),
    );

    assert_eq!(
        dashboard.resolve_range(None, None).unwrap_err(),
        AnalyticsError::NoDateBounds
    );
    let explicit = dashboard
        .resolve_range(Some(day(2018, 1, 1)), Some(day(2018, 1, 31)))
        .unwrap();
    let view = dashboard.compute(&explicit).unwrap();
    assert_eq!(view.warnings, vec![DashboardWarning::EmptyResult]);
}
