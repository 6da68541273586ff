mod equipment;

pub use equipment::{lookup_order, Equipment, EquipmentLookup};
