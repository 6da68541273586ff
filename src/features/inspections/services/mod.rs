mod inspection_service;
pub mod matcher;
pub mod normalizer;

pub use inspection_service::InspectionService;
