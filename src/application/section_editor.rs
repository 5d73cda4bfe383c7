// Section editor - the admin screen behind every content section
use crate::application::api_error::ApiError;
use crate::application::content_repository::{ContentRepository, ImageUpload};
use crate::application::draft_store::DraftStore;
use crate::application::lifecycle::ViewScope;
use crate::application::list_editor::{Direction, ListEditor};
use crate::domain::notice::Notice;
use crate::domain::preview::{build_preview, PreviewFilter, PreviewLayout, PreviewOptions};
use crate::domain::record::{Record, RecordId, RecordPatch};
use crate::domain::section::Section;
use crate::domain::session::Session;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorOptions {
    /// Mirror every edit into the local draft cache.
    pub autosave: bool,
    pub preview: PreviewOptions,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            autosave: true,
            preview: PreviewOptions::default(),
        }
    }
}

/// Where the current in-memory list came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftSource {
    LocalDraft,
    Server,
}

pub struct SectionEditor {
    section: Section,
    session: Session,
    api: Option<Arc<dyn ContentRepository>>,
    drafts: DraftStore,
    list: ListEditor,
    options: EditorOptions,
    scope: ViewScope,
    notice: Option<Notice>,
    loading: bool,
    synced: bool,
    source: DraftSource,
}

impl SectionEditor {
    /// `api` is `None` when no API base URL is configured.
    pub fn new(
        section: Section,
        session: Session,
        drafts: DraftStore,
        api: Option<Arc<dyn ContentRepository>>,
        options: EditorOptions,
    ) -> Self {
        let list = ListEditor::with_desks(drafts.load(section), section.desks());
        let loading = api.is_some();
        Self {
            section,
            session,
            api,
            drafts,
            list,
            options,
            scope: ViewScope::new(),
            notice: None,
            loading,
            synced: false,
            source: DraftSource::LocalDraft,
        }
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn records(&self) -> &[Record] {
        self.list.records()
    }

    pub fn list(&self) -> &ListEditor {
        &self.list
    }

    pub fn selected_id(&self) -> &str {
        self.list.selected_id()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn source(&self) -> DraftSource {
        self.source
    }

    /// Handle for disposing this view from elsewhere.
    pub fn scope(&self) -> ViewScope {
        self.scope.clone()
    }

    pub fn dispose(&self) {
        self.scope.dispose();
    }

    /// Pull the published list once. Failures and empty lists keep the draft.
    pub async fn activate(&mut self) {
        if self.synced {
            return;
        }
        self.synced = true;

        let Some(api) = self.api.clone() else {
            self.loading = false;
            return;
        };

        self.loading = true;
        let fetched = self.scope.run(api.fetch_published(self.section)).await;
        self.loading = false;
        let Some(result) = fetched else {
            tracing::debug!("{} editor disposed during sync", self.section);
            return;
        };

        match result {
            Ok(records) if !records.is_empty() => {
                tracing::debug!("Loaded {} published {} records", records.len(), self.section);
                self.list.reset(records);
                self.source = DraftSource::Server;
                self.autosave();
            }
            Ok(_) => {
                tracing::debug!("No published {} records, keeping local draft", self.section);
            }
            Err(e) => {
                tracing::warn!("Sync of {} failed, keeping local draft: {}", self.section, e);
            }
        }
    }

    pub fn add(&mut self) -> RecordId {
        let id = self.list.add();
        self.autosave();
        id
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.list.select(id)
    }

    pub fn close_editor(&mut self) {
        self.list.close_editor();
    }

    /// False when the section has no desk with that name.
    pub fn set_desk(&mut self, desk: Option<String>) -> bool {
        self.list.set_desk(desk)
    }

    pub fn patch(&mut self, id: &str, patch: RecordPatch) -> bool {
        let changed = self.list.patch(id, patch);
        if changed {
            self.autosave();
        }
        changed
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let removed = self.list.delete(id);
        if removed {
            self.autosave();
        }
        removed
    }

    pub fn move_record(&mut self, id: &str, direction: Direction) -> bool {
        let moved = self.list.move_record(id, direction);
        if moved {
            self.autosave();
        }
        moved
    }

    /// Explicit "save draft" action.
    pub fn save_draft(&mut self) {
        if self.persist() {
            self.notice = Some(Notice::success("Draft saved on this device."));
        }
    }

    /// Throw the local draft away and start again from the bundled defaults.
    pub fn reset_to_defaults(&mut self) {
        if let Err(e) = self.drafts.clear(self.section) {
            self.notice = Some(Notice::error(format!("Could not clear the local draft: {}", e)));
            return;
        }
        self.list.reset(self.section.default_records());
        self.source = DraftSource::LocalDraft;
        self.notice = Some(Notice::info("Restored the default content."));
    }

    /// Upload an image for the record selected when the upload starts.
    pub async fn upload_image(&mut self, image: ImageUpload) {
        let (api, token) = match self.privileged() {
            Ok(pair) => pair,
            Err(e) => {
                self.notice = Some(Notice::error(e.user_message()));
                return;
            }
        };
        let Some(target) = self.list.selected().map(|r| r.id.clone()) else {
            self.notice = Some(Notice::error("Select a record before uploading an image."));
            return;
        };

        tracing::debug!("Uploading {} for {} record {}", image.file_name, self.section, target);
        let Some(result) = self
            .scope
            .run(api.upload_image(self.section, image, &token))
            .await
        else {
            return;
        };

        match result {
            Ok(url) => {
                if self.list.patch(&target, RecordPatch::image(url)) {
                    self.autosave();
                    self.notice = Some(Notice::success("Image uploaded."));
                } else {
                    self.notice = Some(Notice::error(
                        "The record was removed before the upload finished.",
                    ));
                }
            }
            Err(e) => {
                tracing::warn!("Image upload for {} failed: {}", self.section, e);
                self.notice = Some(Notice::error(e.user_message()));
            }
        }
    }

    /// PUT the whole list and adopt the server's canonical copy.
    pub async fn publish(&mut self) {
        let (api, token) = match self.privileged() {
            Ok(pair) => pair,
            Err(e) => {
                self.notice = Some(Notice::error(e.user_message()));
                return;
            }
        };

        let outgoing = self.list.records().to_vec();
        let Some(result) = self
            .scope
            .run(api.publish(self.section, &outgoing, &token))
            .await
        else {
            return;
        };

        match result {
            Ok(canonical) => {
                let published = canonical.unwrap_or_else(|| {
                    tracing::warn!(
                        "Publish response for {} had no record list, keeping local copy",
                        self.section
                    );
                    outgoing
                });
                let count = published.len();
                self.list.replace_all(published);
                self.source = DraftSource::Server;
                self.autosave();
                self.notice = Some(Notice::success(format!(
                    "Published {} {} item{}.",
                    count,
                    self.section.title(),
                    if count == 1 { "" } else { "s" }
                )));
            }
            Err(e) => {
                tracing::warn!("Publish of {} failed: {}", self.section, e);
                self.notice = Some(Notice::error(e.user_message()));
            }
        }
    }

    pub fn preview(&self, filter: &PreviewFilter, page: usize) -> PreviewLayout {
        build_preview(self.list.records(), filter, self.options.preview, page)
    }

    fn privileged(&self) -> Result<(Arc<dyn ContentRepository>, String), ApiError> {
        let api = self.api.clone().ok_or(ApiError::NotConfigured)?;
        let token = self.session.bearer().ok_or(ApiError::MissingToken)?;
        Ok((api, token.to_string()))
    }

    fn autosave(&mut self) {
        if self.options.autosave {
            self.persist();
        }
    }

    fn persist(&mut self) -> bool {
        match self.drafts.save(self.section, self.list.records()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("Failed to save {} draft: {}", self.section, e);
                self.notice = Some(Notice::error(format!("Could not save the draft locally: {}", e)));
                false
            }
        }
    }
}

impl Drop for SectionEditor {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}
