use analytics::Dashboard;
use axum::{Router, routing::get};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
#[derive(Clone)]
pub struct AppState {
    pub dashboard: Dashboard,
}

/// Builds the application routes around a loaded dashboard.
pub fn router(dashboard: Dashboard) -> Router {
    let app_state = Arc::new(AppState { dashboard });
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api/date-bounds", get(handlers::get_date_bounds))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/customers-by-state", get(handlers::get_customers_by_state))
        .route("/api/monthly-orders", get(handlers::get_monthly_orders))
        .route("/api/categories/revenue", get(handlers::get_categories_by_revenue))
        .route("/api/categories/volume", get(handlers::get_categories_by_volume))
        .with_state(app_state)
        .layer(cors)
        // Logs every incoming request.
        .layer(TraceLayer::new_for_http())
}

/// Serves the dashboard API until the process is stopped.
///
/// Tracing is initialized by the binary; the dataset is already loaded.
pub async fn run_server(addr: SocketAddr, dashboard: Dashboard) -> anyhow::Result<()> {
    let app = router(dashboard);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Web server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
