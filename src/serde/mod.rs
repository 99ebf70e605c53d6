pub mod de;
pub mod ser;
