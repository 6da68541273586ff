mod category;
mod document;
mod inspection;

pub use category::{ByCategory, Category, CategorySpec, CATEGORY_TABLE};
pub use document::{Document, NewAttachment};
pub use inspection::{
    HeaderUpdate, Inspection, InspectionFilter, InspectionRecord, ItemCondition, LineItem,
    LineItemRecord, NewInspection, NewLineItem,
};
