use std::sync::Arc;

use axum::{extract::DefaultBodyLimit, routing::get, Router};

use crate::features::inspections::handlers::inspection_handler;
use crate::features::inspections::services::InspectionService;

/// Inspection routes. `max_body_size` bounds multipart submissions.
pub fn routes(service: Arc<InspectionService>, max_body_size: usize) -> Router {
    Router::new()
        .route(
            "/api/inspection",
            get(inspection_handler::list_inspections).post(inspection_handler::create_inspection),
        )
        .route(
            "/api/inspection/{id}",
            get(inspection_handler::get_equipment_inspections)
                .patch(inspection_handler::update_inspection)
                .delete(inspection_handler::delete_inspection),
        )
        .layer(DefaultBodyLimit::max(max_body_size))
        .with_state(service)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::auth::model::{AuthenticatedUser, Role};
    use crate::features::inspections::repository::InspectionRepository;
    use crate::shared::test_helpers::{
        bare_inspection, create_user, exterior_item, with_user, InMemoryInspectionRepository,
        InMemoryStorage,
    };
    use chrono::{Duration, Utc};
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use uuid::Uuid;

    const BODY_LIMIT: usize = 20 * 1024 * 1024;

    struct App {
        repository: Arc<InMemoryInspectionRepository>,
        service: Arc<InspectionService>,
        equipment_id: Uuid,
    }

    impl App {
        fn new() -> Self {
            let repository = Arc::new(InMemoryInspectionRepository::default());
            let equipment_id = repository.add_equipment("CHS-2023001");
            let service = Arc::new(InspectionService::new(
                repository.clone(),
                Arc::new(InMemoryStorage::default()),
            ));
            Self {
                repository,
                service,
                equipment_id,
            }
        }

        fn server(&self, user: &AuthenticatedUser) -> TestServer {
            let router = with_user(routes(self.service.clone(), BODY_LIMIT), user.clone());
            TestServer::new(router).unwrap()
        }

        async fn submit(&self, user: &AuthenticatedUser, body: Value) -> Uuid {
            let response = self.server(user).post("/api/inspection").json(&body).await;
            response.assert_status(StatusCode::CREATED);
            let id = response.json::<Value>()["data"]["id"].as_str().unwrap().to_string();
            Uuid::parse_str(&id).unwrap()
        }
    }

    fn jpeg(file_name: &str) -> Part {
        Part::bytes(b"fake-jpeg-bytes".to_vec())
            .file_name(file_name)
            .mime_type("image/jpeg")
    }

    #[tokio::test]
    async fn test_multipart_submission_reads_back_image_fields() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);

        let form = MultipartForm::new()
            .add_text("equipmentId", "CHS-2023001")
            .add_text(
                "exteriorInspections",
                json!([{"itemName": "Body/Exterior", "condition": "GOOD"}]).to_string(),
            )
            .add_part("exterior_0_frontView", jpeg("frontView.jpg"));

        let response = app
            .server(&inspector)
            .post("/api/inspection")
            .multipart(form)
            .await;

        response.assert_status(StatusCode::CREATED);
        let body = response.json::<Value>();
        assert_eq!(body["success"], true);
        assert!(body["data"]["id"].is_string());

        let response = app
            .server(&inspector)
            .get(&format!("/api/inspection/{}", app.equipment_id))
            .await;
        response.assert_status_ok();

        let inspection = &response.json::<Value>()["data"][0];
        assert_eq!(inspection["inspectorId"], json!(inspector.id));
        assert_eq!(inspection["exteriorInspections"].as_array().unwrap().len(), 1);
        for field in [
            "interiorInspections",
            "mechanicalInspections",
            "functionalInspections",
            "documentLegalInspections",
        ] {
            assert_eq!(inspection[field], json!([]));
        }

        let item = &inspection["exteriorInspections"][0];
        assert_eq!(item["itemName"], "Body/Exterior");
        assert_eq!(item["condition"], "GOOD");

        let image_fields = item["imageFields"].as_array().unwrap();
        assert_eq!(image_fields.len(), 1);
        assert_eq!(image_fields[0]["fieldName"], "exterior_0_frontView");
        assert_eq!(image_fields[0]["fileName"], "frontView.jpg");
        assert_eq!(image_fields[0]["mimeType"], "image/jpeg");
        assert_eq!(image_fields[0]["fileSize"], 15);
    }

    #[tokio::test]
    async fn test_files_bind_to_their_exact_index() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);

        let items: Vec<Value> = (0..11).map(|i| exterior_item(&format!("Panel {}", i))).collect();
        let form = MultipartForm::new()
            .add_text("equipmentId", "CHS-2023001")
            .add_text("exteriorInspections", Value::Array(items).to_string())
            .add_part("exterior_1_left", jpeg("left.jpg"))
            .add_part("exterior_1_right", jpeg("right.jpg"))
            .add_part("exterior_10_rear", jpeg("rear.jpg"));

        app.server(&inspector)
            .post("/api/inspection")
            .multipart(form)
            .await
            .assert_status(StatusCode::CREATED);

        let body = app
            .server(&inspector)
            .get(&format!("/api/inspection/{}", app.equipment_id))
            .await
            .json::<Value>();
        let exterior = &body["data"][0]["exteriorInspections"];

        let counts: Vec<usize> = exterior
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["imageFields"].as_array().unwrap().len())
            .collect();
        assert_eq!(counts, vec![0, 2, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(exterior[10]["imageFields"][0]["fieldName"], "exterior_10_rear");
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_inspector_unless_admin() {
        let app = App::new();
        let first = create_user(Role::Inspector);
        let second = create_user(Role::Officer);

        let body = json!({"equipmentId": "CHS-2023001", "exteriorInspections": [exterior_item("Body")]});
        app.submit(&first, body.clone()).await;
        app.submit(&second, body.clone()).await;
        app.submit(&second, body).await;

        let own = app.server(&first).get("/api/inspection").await.json::<Value>();
        assert_eq!(own["data"].as_array().unwrap().len(), 1);
        assert_eq!(own["data"][0]["inspectorId"], json!(first.id));

        let own = app.server(&second).get("/api/inspection").await.json::<Value>();
        assert_eq!(own["meta"]["total"], 2);

        for role in [Role::Admin, Role::PlatAdmin] {
            let all = app
                .server(&create_user(role))
                .get("/api/inspection")
                .await
                .json::<Value>();
            assert_eq!(all["data"].as_array().unwrap().len(), 3);
        }
    }

    #[tokio::test]
    async fn test_missing_equipment_is_rejected_without_writing() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);

        let response = app
            .server(&inspector)
            .post("/api/inspection")
            .json(&json!({"exteriorInspections": [exterior_item("Body")]}))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["success"], false);
        assert_eq!(app.repository.inspection_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_items_report_field_errors() {
        let app = App::new();

        let response = app
            .server(&create_user(Role::Inspector))
            .post("/api/inspection")
            .json(&json!({
                "equipmentId": "CHS-2023001",
                "mechanicalInspections": [{"itemName": "Engine", "condition": "EXCELLENT"}]
            }))
            .expect_failure()
            .await;

        response.assert_status_bad_request();
        let body = response.json::<Value>();
        assert_eq!(body["errors"][0]["field"], "mechanicalInspections[0]");
        assert_eq!(app.repository.inspection_count(), 0);
    }

    #[tokio::test]
    async fn test_omitted_category_reads_back_empty() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);

        app.submit(
            &inspector,
            json!({
                "equipmentId": "CHS-2023001",
                "mechanicalInspections": [{"itemName": "Engine", "condition": "FAIR", "notes": "Oil seep"}]
            }),
        )
        .await;

        let body = app
            .server(&inspector)
            .get(&format!("/api/inspection/{}", app.equipment_id))
            .await
            .json::<Value>();
        let inspection = &body["data"][0];
        assert_eq!(inspection["functionalInspections"], json!([]));
        assert_eq!(inspection["mechanicalInspections"][0]["notes"], "Oil seep");
    }

    #[tokio::test]
    async fn test_attachment_without_field_name_reads_as_unknown() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);

        let form = MultipartForm::new()
            .add_text("equipmentId", app.equipment_id.to_string())
            .add_text(
                "documentLegalInspections",
                json!([{"itemName": "Registration", "condition": "GOOD"}]).to_string(),
            )
            .add_part("documentation_0_scan", jpeg("scan.jpg"));
        app.server(&inspector)
            .post("/api/inspection")
            .multipart(form)
            .await
            .assert_status(StatusCode::CREATED);

        app.repository.clear_attachment_metadata();

        let body = app
            .server(&inspector)
            .get(&format!("/api/inspection/{}", app.equipment_id))
            .await
            .json::<Value>();
        let image = &body["data"][0]["documentLegalInspections"][0]["imageFields"][0];
        assert_eq!(image["fieldName"], "unknown");
        assert_eq!(image["fileName"], "scan.jpg");
    }

    #[tokio::test]
    async fn test_unknown_equipment_has_no_inspections() {
        let app = App::new();

        app.server(&create_user(Role::Admin))
            .get(&format!("/api/inspection/{}", Uuid::now_v7()))
            .expect_failure()
            .await
            .assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_equipment_inspections_newest_first() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);
        let now = Utc::now();

        let older = bare_inspection(app.equipment_id, inspector.id, now - Duration::days(90));
        let middle = bare_inspection(app.equipment_id, inspector.id, now - Duration::days(7));
        let newest = bare_inspection(app.equipment_id, inspector.id, now);
        for inspection in [&older, &newest, &middle] {
            app.repository.create(inspection).await.unwrap();
        }

        let response = app
            .server(&inspector)
            .get(&format!("/api/inspection/{}", app.equipment_id))
            .await;
        response.assert_status_ok();

        let ids: Vec<Value> = response.json::<Value>()["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|i| i["id"].clone())
            .collect();
        assert_eq!(ids, vec![json!(newest.id), json!(middle.id), json!(older.id)]);

        let response = app.server(&inspector).get("/api/inspection").await;
        response.assert_status_ok();
        assert_eq!(response.json::<Value>()["data"][0]["id"], json!(newest.id));
    }

    #[tokio::test]
    async fn test_only_platform_admin_deletes() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);
        let id = app
            .submit(&inspector, json!({"equipmentId": "CHS-2023001"}))
            .await;

        for role in [Role::Admin, Role::Officer, Role::Inspector] {
            app.server(&create_user(role))
                .delete(&format!("/api/inspection/{}", id))
                .expect_failure()
                .await
                .assert_status_unauthorized();
        }
        assert_eq!(app.repository.inspection_count(), 1);

        app.server(&create_user(Role::PlatAdmin))
            .delete(&format!("/api/inspection/{}", id))
            .await
            .assert_status_ok();
        assert_eq!(app.repository.inspection_count(), 0);
    }

    #[tokio::test]
    async fn test_patch_changes_header_only() {
        let app = App::new();
        let inspector = create_user(Role::Inspector);
        let id = app
            .submit(
                &inspector,
                json!({"equipmentId": "CHS-2023001", "exteriorInspections": [exterior_item("Body")]}),
            )
            .await;

        let response = app
            .server(&inspector)
            .patch(&format!("/api/inspection/{}", id))
            .json(&json!({"nextDueDate": "2026-06-30", "notes": "Follow up on paint"}))
            .await;
        response.assert_status_ok();

        let data = &response.json::<Value>()["data"];
        assert_eq!(data["notes"], "Follow up on paint");
        assert_eq!(data["nextDueDate"], "2026-06-30T00:00:00Z");
        assert_eq!(data["exteriorInspections"].as_array().unwrap().len(), 1);

        app.server(&create_user(Role::Inspector))
            .patch(&format!("/api/inspection/{}", id))
            .json(&json!({"notes": "Not mine"}))
            .expect_failure()
            .await
            .assert_status_unauthorized();
    }
}
