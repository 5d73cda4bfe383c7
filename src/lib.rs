// Newsdesk - admin editors, dashboard and public pages for a news site
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
