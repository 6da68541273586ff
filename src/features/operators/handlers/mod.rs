pub mod operator_handler;
