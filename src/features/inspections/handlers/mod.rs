pub mod inspection_handler;
