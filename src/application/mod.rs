// Application layer - View-models and the repository seams they depend on
pub mod api_error;
pub mod content_repository;
pub mod dashboard_view;
pub mod draft_store;
pub mod lifecycle;
pub mod list_editor;
pub mod local_storage;
pub mod newsletter_widget;
pub mod public_pages;
pub mod section_editor;
pub mod session_store;
pub mod settings_editor;
