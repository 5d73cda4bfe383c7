// Repository traits for the content backend
use crate::application::api_error::ApiError;
use crate::domain::dashboard::{ActivityEvent, DashboardSnapshot};
use crate::domain::newsletter::{Subscriber, SubscriberQuery, SubscriberStats};
use crate::domain::record::Record;
use crate::domain::section::Section;
use crate::domain::settings::SiteSettings;
use async_trait::async_trait;
use bytes::Bytes;

/// An image picked by the user, ready to be posted as multipart form data.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ImageUpload {
    pub fn new(
        file_name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }
}

#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// Published records for a section (unauthenticated)
    async fn fetch_published(&self, section: Section) -> Result<Vec<Record>, ApiError>;

    /// Replace the section's list on the server.
    /// Returns the server's canonical list when the response carries one.
    async fn publish(
        &self,
        section: Section,
        records: &[Record],
        token: &str,
    ) -> Result<Option<Vec<Record>>, ApiError>;

    /// Upload an image and return its public URL
    async fn upload_image(
        &self,
        section: Section,
        image: ImageUpload,
        token: &str,
    ) -> Result<String, ApiError>;
}

#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    async fn fetch_stats(&self, token: &str) -> Result<DashboardSnapshot, ApiError>;

    async fn fetch_recent_activity(
        &self,
        token: &str,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ApiError>;

    async fn fetch_subscriber_stats(&self, token: &str) -> Result<SubscriberStats, ApiError>;

    async fn fetch_subscribers(
        &self,
        token: &str,
        query: &SubscriberQuery,
    ) -> Result<Vec<Subscriber>, ApiError>;
}

#[async_trait]
pub trait SiteRepository: Send + Sync {
    /// Newsletter signup (unauthenticated)
    async fn subscribe(&self, email: &str) -> Result<(), ApiError>;

    async fn fetch_settings(&self) -> Result<SiteSettings, ApiError>;

    async fn update_settings(
        &self,
        settings: &SiteSettings,
        token: &str,
    ) -> Result<SiteSettings, ApiError>;
}
