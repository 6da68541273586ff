mod operator_dto;

pub use operator_dto::*;
