use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::equipment::handlers::equipment_handler;
use crate::features::equipment::services::EquipmentService;

pub fn routes(service: Arc<EquipmentService>) -> Router {
    Router::new()
        .route(
            "/api/equipment",
            get(equipment_handler::list_equipment).post(equipment_handler::create_equipment),
        )
        .route(
            "/api/equipment/{id}",
            get(equipment_handler::get_equipment)
                .put(equipment_handler::update_equipment)
                .delete(equipment_handler::delete_equipment),
        )
        .with_state(service)
}
