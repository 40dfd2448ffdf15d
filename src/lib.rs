pub mod handlers;
pub mod scaling;
