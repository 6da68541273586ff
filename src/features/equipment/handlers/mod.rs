pub mod equipment_handler;
