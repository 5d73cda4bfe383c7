// Presentation layer - HTTP surface for the public site
pub mod app_state;
pub mod handlers;
