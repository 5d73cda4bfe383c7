// Newsletter signup widget
use crate::application::api_error::ApiError;
use crate::application::content_repository::SiteRepository;
use crate::domain::newsletter::normalize_email;
use crate::domain::notice::Notice;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignupState {
    Idle,
    Submitting,
    Subscribed,
    /// The address was rejected locally; nothing was sent.
    Invalid,
    Failed,
}

pub struct NewsletterWidget {
    api: Option<Arc<dyn SiteRepository>>,
    state: SignupState,
    notice: Option<Notice>,
}

impl NewsletterWidget {
    pub fn new(api: Option<Arc<dyn SiteRepository>>) -> Self {
        Self {
            api,
            state: SignupState::Idle,
            notice: None,
        }
    }

    pub fn state(&self) -> SignupState {
        self.state
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub async fn submit(&mut self, email: &str) -> SignupState {
        let email = match normalize_email(email) {
            Ok(email) => email,
            Err(e) => {
                self.state = SignupState::Invalid;
                self.notice = Some(Notice::error(e.to_string()));
                return self.state;
            }
        };
        let Some(api) = self.api.clone() else {
            self.state = SignupState::Failed;
            self.notice = Some(Notice::error(ApiError::NotConfigured.user_message()));
            return self.state;
        };

        self.state = SignupState::Submitting;
        match api.subscribe(&email).await {
            Ok(()) => {
                tracing::info!("Newsletter signup accepted");
                self.state = SignupState::Subscribed;
                self.notice = Some(Notice::success("Thanks! You're on the list."));
            }
            Err(e) => {
                tracing::warn!("Newsletter signup failed: {}", e);
                self.state = SignupState::Failed;
                self.notice = Some(Notice::error(e.user_message()));
            }
        }
        self.state
    }
}
