use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};

use crate::features::users::handlers::user_handler;
use crate::features::users::services::UserService;

pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route("/api/admin/users", get(user_handler::list_users))
        .route(
            "/api/admin/users/{id}/status",
            patch(user_handler::update_user_status),
        )
        .with_state(service)
}
