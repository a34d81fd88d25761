//! The REST API: route paths, shared state and handlers.
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    middleware,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::logging::log_requests;
use crate::models::{CategoryCount, CombinedData, PriceRangeCount, Statistics, TransactionPage};
use crate::repositories::TransactionStore;
use crate::services::query_service::TransactionQuery;
use crate::services::seed_loader::SeedSource;
use crate::services::{aggregation_service, composite, query_service, seed_loader};

/// Route paths.
pub mod endpoints {
    /// Replaces the stored records with the seed feed.
    pub const INITIALIZE: &str = "/api/initialize";
    pub const TRANSACTIONS: &str = "/api/transactions";
    pub const STATISTICS: &str = "/api/statistics";
    pub const BAR_CHART: &str = "/api/barchart";
    pub const PIE_CHART: &str = "/api/piechart";
    /// Transactions, statistics and bar chart in one response.
    pub const COMBINED: &str = "/api/combinedata";
}

/// The state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn TransactionStore>,
    pub seed_source: Arc<dyn SeedSource>,
    /// Page size used when a listing does not give `perPage`.
    pub default_per_page: u64,
}

impl AppState {
    pub fn new(
        store: Arc<dyn TransactionStore>,
        seed_source: Arc<dyn SeedSource>,
        default_per_page: u64,
    ) -> Self {
        Self {
            store,
            seed_source,
            default_per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub month: Option<String>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::INITIALIZE, get(initialize))
        .route(endpoints::TRANSACTIONS, get(get_transactions))
        .route(endpoints::STATISTICS, get(get_statistics))
        .route(endpoints::BAR_CHART, get(get_bar_chart))
        .route(endpoints::PIE_CHART, get(get_pie_chart))
        .route(endpoints::COMBINED, get(get_combined_data))
        .layer(middleware::from_fn(log_requests))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn initialize(State(state): State<AppState>) -> Result<String, AppError> {
    let count =
        seed_loader::initialize_collection(state.store.as_ref(), state.seed_source.as_ref())
            .await?;
    Ok(format!("Database initialized with seed data ({count} records)"))
}

async fn get_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<TransactionPage>, AppError> {
    query_service::list_transactions(state.store.as_ref(), &query, state.default_per_page)
        .await
        .map(Json)
}

async fn get_statistics(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, AppError> {
    aggregation_service::statistics(state.store.as_ref(), query.month.as_deref())
        .await
        .map(Json)
}

async fn get_bar_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PriceRangeCount>>, AppError> {
    aggregation_service::bar_chart(state.store.as_ref(), query.month.as_deref())
        .await
        .map(Json)
}

async fn get_pie_chart(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<CategoryCount>>, AppError> {
    aggregation_service::pie_chart(state.store.as_ref(), query.month.as_deref())
        .await
        .map(Json)
}

async fn get_combined_data(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> Result<Json<CombinedData>, AppError> {
    composite::get_combined(state.store.as_ref(), &query, state.default_per_page)
        .await
        .map(Json)
}
