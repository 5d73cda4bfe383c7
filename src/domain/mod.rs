// Domain layer - Core business entities
pub mod dashboard;
pub mod newsletter;
pub mod notice;
pub mod preview;
pub mod record;
pub mod section;
pub mod session;
pub mod settings;
