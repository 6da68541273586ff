//! Local user accounts.
//!
//! Accounts are provisioned out of band; this feature loads them for the auth
//! middleware and lets platform administrators list accounts and change their
//! status.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/users` | Paginated account list (PLATADMIN) |
//! | PATCH | `/api/admin/users/{id}/status` | Activate, deactivate or suspend (PLATADMIN) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
