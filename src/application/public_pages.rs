// Public pages - read-only section views served to readers
use crate::application::content_repository::{ContentRepository, SiteRepository};
use crate::application::draft_store::DraftStore;
use crate::application::newsletter_widget::{NewsletterWidget, SignupState};
use crate::domain::notice::Notice;
use crate::domain::preview::{build_preview, PreviewFilter, PreviewLayout, PreviewOptions};
use crate::domain::record::Record;
use crate::domain::section::Section;
use std::sync::Arc;

#[derive(Clone)]
pub struct PublicPages {
    content: Option<Arc<dyn ContentRepository>>,
    site: Option<Arc<dyn SiteRepository>>,
    drafts: DraftStore,
    preview: PreviewOptions,
}

impl PublicPages {
    pub fn new(
        content: Option<Arc<dyn ContentRepository>>,
        site: Option<Arc<dyn SiteRepository>>,
        drafts: DraftStore,
        preview: PreviewOptions,
    ) -> Self {
        Self {
            content,
            site,
            drafts,
            preview,
        }
    }

    /// Published records when the API has any, otherwise the local draft.
    pub async fn section_records(&self, section: Section) -> Vec<Record> {
        if let Some(api) = &self.content {
            match api.fetch_published(section).await {
                Ok(records) if !records.is_empty() => return records,
                Ok(_) => tracing::debug!("No published {} records, serving draft", section),
                Err(e) => tracing::warn!("Serving {} from draft, API unavailable: {}", section, e),
            }
        }
        self.drafts.load(section)
    }

    pub async fn section_page(
        &self,
        section: Section,
        filter: &PreviewFilter,
        page: usize,
    ) -> PreviewLayout {
        let records = self.section_records(section).await;
        build_preview(&records, filter, self.preview, page)
    }

    pub async fn subscribe(&self, email: &str) -> (SignupState, Option<Notice>) {
        let mut widget = NewsletterWidget::new(self.site.clone());
        let state = widget.submit(email).await;
        (state, widget.notice().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::api_error::ApiError;
    use crate::application::content_repository::ImageUpload;
    use crate::infrastructure::memory_storage::MemoryStorage;
    use async_trait::async_trait;

    struct FixedContent(Result<Vec<Record>, ApiError>);

    #[async_trait]
    impl ContentRepository for FixedContent {
        async fn fetch_published(&self, _section: Section) -> Result<Vec<Record>, ApiError> {
            self.0.clone()
        }

        async fn publish(
            &self,
            _section: Section,
            _records: &[Record],
            _token: &str,
        ) -> Result<Option<Vec<Record>>, ApiError> {
            Err(ApiError::MissingToken)
        }

        async fn upload_image(
            &self,
            _section: Section,
            _image: ImageUpload,
            _token: &str,
        ) -> Result<String, ApiError> {
            Err(ApiError::MissingToken)
        }
    }

    fn build_pages(content: Option<FixedContent>) -> PublicPages {
        PublicPages::new(
            content.map(|c| Arc::new(c) as Arc<dyn ContentRepository>),
            None,
            DraftStore::new(Arc::new(MemoryStorage::new()), "newsdesk"),
            PreviewOptions::default(),
        )
    }

    #[tokio::test]
    async fn test_serves_published_records() {
        let pages = build_pages(Some(FixedContent(Ok(vec![Record::new("live".to_string())]))));
        let layout = pages
            .section_page(Section::Sports, &PreviewFilter::default(), 1)
            .await;
        assert_eq!(layout.lead.map(|r| r.id), Some("live".to_string()));
        assert_eq!(layout.total, 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_draft_when_api_fails() {
        let pages = build_pages(Some(FixedContent(Err(ApiError::Network("down".to_string())))));
        let records = pages.section_records(Section::Podcast).await;
        assert_eq!(records, Section::Podcast.default_records());

        let offline = build_pages(None);
        let layout = offline
            .section_page(Section::WorldNews, &PreviewFilter::desk("International"), 1)
            .await;
        assert_eq!(layout.total, 2);
    }

    #[tokio::test]
    async fn test_subscribe_without_api_fails_cleanly() {
        let (state, notice) = build_pages(None).subscribe("reader@example.com").await;
        assert_eq!(state, SignupState::Failed);
        assert_eq!(notice.unwrap().text, ApiError::NotConfigured.user_message());
    }
}
