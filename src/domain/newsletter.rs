// Newsletter domain model
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Subscriber {
    pub email: String,
    pub subscribed_at: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubscriberStats {
    pub total: u64,
    pub new_this_week: u64,
    pub unsubscribed: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriberQuery {
    pub search: String,
    pub page: u32,
}

impl Default for SubscriberQuery {
    fn default() -> Self {
        Self {
            search: String::new(),
            page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Enter your email address.")]
    Empty,
    #[error("That email address doesn't look right.")]
    Malformed,
}

/// Trim and lowercase an address, rejecting anything that is obviously not one.
pub fn normalize_email(raw: &str) -> Result<String, EmailError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(EmailError::Empty);
    }
    if email.chars().any(char::is_whitespace) {
        return Err(EmailError::Malformed);
    }

    let (local, domain) = email.split_once('@').ok_or(EmailError::Malformed)?;
    if local.is_empty() || domain.contains('@') {
        return Err(EmailError::Malformed);
    }

    let dot = domain.find('.').ok_or(EmailError::Malformed)?;
    if dot == 0 || domain.ends_with('.') {
        return Err(EmailError::Malformed);
    }

    Ok(email)
}
