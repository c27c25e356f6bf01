use crate::{AppState, error::AppError};
use analytics::{
    CategorySummary, DashboardViewModel, MonthlyOrders, Rank, RankBy, StateCustomerCount,
    sort_by_customer_count_desc,
};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;
use core_types::DateRange;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Optional date-range selection. Missing ends default to the dataset bounds.
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RankQuery {
    #[serde(default)]
    pub rank: Rank,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct DateBoundsResponse {
    pub source: String,
    pub rows: usize,
    pub bounds: Option<DateRange>,
}

/// # GET /api/date-bounds
/// The range a date selector should offer.
pub async fn get_date_bounds(State(state): State<Arc<AppState>>) -> Json<DateBoundsResponse> {
    let dataset = state.dashboard.dataset();
    Json(DateBoundsResponse {
        source: dataset.source().to_string(),
        rows: dataset.len(),
        bounds: dataset.date_bounds(),
    })
}

/// # GET /api/dashboard
/// Recomputes every table for the selected range.
pub async fn get_dashboard(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<DashboardViewModel>, AppError> {
    let range = state.dashboard.resolve_range(query.start, query.end)?;
    let view_model = state.dashboard.compute(&range)?;
    Ok(Json(view_model))
}

/// # GET /api/customers-by-state
pub async fn get_customers_by_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<StateCustomerCount>>, AppError> {
    let range = state.dashboard.resolve_range(query.start, query.end)?;
    let view = state.dashboard.dataset().filter(&range);
    let counts = state.dashboard.engine().customers_by_state(&view)?;
    Ok(Json(sort_by_customer_count_desc(counts)))
}

/// # GET /api/monthly-orders
pub async fn get_monthly_orders(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<Vec<MonthlyOrders>>, AppError> {
    let range = state.dashboard.resolve_range(query.start, query.end)?;
    let view = state.dashboard.dataset().filter(&range);
    Ok(Json(state.dashboard.engine().monthly_orders(&view)?))
}

/// # GET /api/categories/revenue?rank=highest|lowest
pub async fn get_categories_by_revenue(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    ranked_categories(&state, RankBy::Revenue, query)
}

/// # GET /api/categories/volume?rank=highest|lowest
pub async fn get_categories_by_volume(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RankQuery>,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    ranked_categories(&state, RankBy::Volume, query)
}

fn ranked_categories(
    state: &AppState,
    by: RankBy,
    query: RankQuery,
) -> Result<Json<Vec<CategorySummary>>, AppError> {
    let range = state.dashboard.resolve_range(query.start, query.end)?;
    let view = state.dashboard.dataset().filter(&range);
    let categories = state
        .dashboard
        .engine()
        .ranked_categories(&view, by, query.rank)?;
    Ok(Json(categories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::{AnalyticsEngine, CurrencyFormat, Dashboard};
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use core_types::Column;
    use dataset::{Dataset, Schema, load_from_reader};

    const EXTRACT: &str = "\
order_id,customer_id,customer_state,product_category_name_english,price,order_purchase_timestamp,order_approved_at,order_delivered_carrier_date,order_delivered_customer_date,order_estimated_delivery_date,order_month
1,A,SP,toys,10.00,2018-01-02 09:00:00,,2018-01-05 16:20:00,,,2018-01
2,A,SP,toys,5.00,2018-01-03 09:00:00,,2018-01-06 08:00:00,,,2018-01
3,B,RJ,books,20.00,2018-02-01 09:00:00,,2018-02-03 23:59:00,,,2018-02
4,C,RJ,art,2.00,2018-02-01 09:00:00,,2018-02-04 10:00:00,,,2018-02
";

    fn state_for(dataset: Dataset) -> Arc<AppState> {
        Arc::new(AppState {
            dashboard: Dashboard::new(
                Arc::new(dataset),
                AnalyticsEngine::new(),
                CurrencyFormat::default(),
            ),
        })
    }

    fn app_state() -> Arc<AppState> {
        state_for(load_from_reader(EXTRACT.as_bytes(), "inline").unwrap())
    }

    fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn date_bounds_cover_delivered_rows() {
        let Json(body) = get_date_bounds(State(app_state())).await;
        assert_eq!(body.rows, 4);
        let bounds = body.bounds.unwrap();
        assert_eq!(Some(bounds.start()), day(2018, 1, 5));
        assert_eq!(Some(bounds.end()), day(2018, 2, 4));
    }

    #[tokio::test]
    async fn dashboard_defaults_to_full_range() {
        let Json(view) = get_dashboard(State(app_state()), Query(RangeQuery::default()))
            .await
            .unwrap();
        assert_eq!(view.row_count, 4);
        assert_eq!(view.headline.total_orders, 4);
        assert_eq!(view.headline.total_revenue_display, "R$\u{a0}37,00");
    }

    #[tokio::test]
    async fn customers_by_state_is_sorted_for_display() {
        let Json(counts) =
            get_customers_by_state(State(app_state()), Query(RangeQuery::default()))
                .await
                .unwrap();
        let states: Vec<_> = counts.iter().map(|c| c.customer_state.as_str()).collect();
        assert_eq!(states, vec!["RJ", "SP"]);
        assert_eq!(counts[0].customer_count, 2);
    }

    #[tokio::test]
    async fn monthly_orders_respect_the_range() {
        let query = RangeQuery {
            start: day(2018, 1, 1),
            end: day(2018, 1, 31),
        };
        let Json(months) = get_monthly_orders(State(app_state()), Query(query))
            .await
            .unwrap();
        assert_eq!(months.len(), 1);
        assert_eq!(months[0].order_month_label, "2018-01");
        assert_eq!(months[0].order_count, 2);
    }

    #[tokio::test]
    async fn category_rank_direction_is_selectable() {
        let state = app_state();
        let Json(highest) =
            get_categories_by_revenue(State(state.clone()), Query(RankQuery::default()))
                .await
                .unwrap();
        assert_eq!(highest[0].category, "books");

        let lowest_query = RankQuery {
            rank: Rank::Lowest,
            ..RankQuery::default()
        };
        let Json(lowest) = get_categories_by_volume(State(state), Query(lowest_query))
            .await
            .unwrap();
        assert_eq!(lowest[0].category, "art");
        assert_eq!(lowest.last().unwrap().category, "toys");
    }

    #[tokio::test]
    async fn inverted_range_is_a_bad_request() {
        let query = RangeQuery {
            start: day(2018, 2, 1),
            end: day(2018, 1, 1),
        };
        let err = get_dashboard(State(app_state()), Query(query))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_column_is_unprocessable() {
        let schema = Schema::new(Column::ALL.into_iter().filter(|c| *c != Column::OrderMonth));
        let state = state_for(Dataset::new("partial", schema, Vec::new()));
        let query = RangeQuery {
            start: day(2018, 1, 1),
            end: day(2018, 1, 31),
        };

        let err = get_monthly_orders(State(state.clone()), Query(query))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        // The same state keeps serving the endpoints that can run.
        let query = RangeQuery {
            start: day(2018, 1, 1),
            end: day(2018, 1, 31),
        };
        let Json(counts) = get_customers_by_state(State(state), Query(query))
            .await
            .unwrap();
        assert!(counts.is_empty());
    }

    #[tokio::test]
    async fn empty_dataset_without_range_is_not_found() {
        let state = state_for(Dataset::new("empty", Schema::complete(), Vec::new()));
        let err = get_dashboard(State(state), Query(RangeQuery::default()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }
}
