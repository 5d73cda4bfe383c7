// Application state for HTTP handlers
use crate::application::public_pages::PublicPages;

#[derive(Clone)]
pub struct AppState {
    pub public_pages: PublicPages,
}
