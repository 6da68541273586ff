//! Equipment inspections.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/inspection` | List inspections (own, or all for administrators) |
//! | POST | `/api/inspection` | Submit an inspection (JSON or multipart) |
//! | GET | `/api/inspection/{id}` | Inspections of the equipment with this id |
//! | PATCH | `/api/inspection/{id}` | Update next-due date and notes |
//! | DELETE | `/api/inspection/{id}` | Delete (PLATADMIN) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use repository::{InspectionRepository, PgInspectionRepository};
pub use services::InspectionService;
