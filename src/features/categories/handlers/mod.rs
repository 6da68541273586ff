pub mod category_handler;
