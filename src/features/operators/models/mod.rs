mod operator;

pub use operator::Operator;
