pub mod escape;
pub mod ident;
