//! Equipment assets.
//!
//! Equipment is identified by its id or by its chassis number; both resolve
//! in the same order everywhere (see [`models::lookup_order`]).

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::EquipmentService;
