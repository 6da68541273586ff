pub mod auth;
pub mod categories;
pub mod equipment;
pub mod inspections;
pub mod operators;
pub mod users;
