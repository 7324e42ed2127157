use std::sync::Arc;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::features::perdin::handlers;
use crate::features::perdin::services::PerdinService;

/// Create routes for perdin submission and review
pub fn routes(service: Arc<PerdinService>) -> Router {
    Router::new()
        .route(
            "/api/perdin",
            get(handlers::list_my_perdin).post(handlers::create_perdin),
        )
        .route("/api/perdin/calculate", post(handlers::calculate_perdin))
        .route("/api/perdin/sdm", get(handlers::list_perdin_for_review))
        .route("/api/perdin/{id}", get(handlers::get_perdin))
        .route("/api/perdin/{id}/approve", patch(handlers::decide_perdin))
        .with_state(service)
}
