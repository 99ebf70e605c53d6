pub mod decimal;
pub mod number;
