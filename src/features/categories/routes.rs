use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::categories::handlers::category_handler;
use crate::features::categories::services::CategoryService;

/// Create routes for the categories feature
pub fn routes(service: Arc<CategoryService>) -> Router {
    Router::new()
        .route(
            "/api/category",
            get(category_handler::list_categories).post(category_handler::create_category),
        )
        .route(
            "/api/category/{id}",
            get(category_handler::get_category)
                .put(category_handler::update_category)
                .delete(category_handler::delete_category),
        )
        .with_state(service)
}
