use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::operators::handlers::operator_handler;
use crate::features::operators::services::OperatorService;

pub fn routes(service: Arc<OperatorService>) -> Router {
    Router::new()
        .route(
            "/api/operator",
            get(operator_handler::list_operators).post(operator_handler::create_operator),
        )
        .route(
            "/api/operator/{id}",
            get(operator_handler::get_operator)
                .put(operator_handler::update_operator)
                .delete(operator_handler::delete_operator),
        )
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::Role;
    use crate::shared::test_helpers::{create_user, with_user};
    use axum_test::TestServer;
    use serde_json::json;
    use sqlx::postgres::PgPoolOptions;

    /// The gate rejects before the service touches the (never connected) pool
    fn server(role: Role) -> TestServer {
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let router = with_user(routes(Arc::new(OperatorService::new(pool))), create_user(role));
        TestServer::new(router).unwrap()
    }

    #[tokio::test]
    async fn test_officer_cannot_write_operators() {
        let server = server(Role::Officer);
        let body = json!({"name": "Budi Santoso", "phone": "+62 812 3456 7890"});

        server
            .post("/api/operator")
            .json(&body)
            .expect_failure()
            .await
            .assert_status_unauthorized();

        server
            .delete("/api/operator/0190a6d4-5b7e-7c3a-9f1e-2d4b6a8c0e12")
            .expect_failure()
            .await
            .assert_status_unauthorized();
    }

    #[tokio::test]
    async fn test_admin_payload_is_validated() {
        let server = server(Role::Admin);

        let response = server
            .post("/api/operator")
            .json(&json!({"name": "", "phone": "not a phone"}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let body = response.json::<serde_json::Value>();
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|e| e["field"].as_str())
            .collect();
        assert!(fields.contains(&"name"));
        assert!(fields.contains(&"phone"));
    }
}
