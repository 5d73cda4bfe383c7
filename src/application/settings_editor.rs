// Site settings editor
use crate::application::api_error::ApiError;
use crate::application::content_repository::SiteRepository;
use crate::application::lifecycle::ViewScope;
use crate::domain::notice::Notice;
use crate::domain::session::Session;
use crate::domain::settings::SiteSettings;
use std::sync::Arc;

pub struct SettingsEditor {
    api: Option<Arc<dyn SiteRepository>>,
    session: Session,
    settings: SiteSettings,
    notice: Option<Notice>,
    scope: ViewScope,
}

impl SettingsEditor {
    pub fn new(session: Session, api: Option<Arc<dyn SiteRepository>>) -> Self {
        Self {
            api,
            session,
            settings: SiteSettings::default(),
            notice: None,
            scope: ViewScope::new(),
        }
    }

    pub fn settings(&self) -> &SiteSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut SiteSettings {
        &mut self.settings
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dispose(&self) {
        self.scope.dispose();
    }

    pub async fn load(&mut self) {
        let Some(api) = self.api.clone() else {
            self.notice = Some(Notice::error(ApiError::NotConfigured.user_message()));
            return;
        };
        let Some(result) = self.scope.run(api.fetch_settings()).await else {
            return;
        };
        match result {
            Ok(settings) => self.settings = settings,
            Err(e) => {
                tracing::warn!("Could not load site settings: {}", e);
                self.notice = Some(Notice::error(e.user_message()));
            }
        }
    }

    pub async fn save(&mut self) {
        let Some(api) = self.api.clone() else {
            self.notice = Some(Notice::error(ApiError::NotConfigured.user_message()));
            return;
        };
        let Some(token) = self.session.bearer().map(str::to_owned) else {
            self.notice = Some(Notice::error(ApiError::MissingToken.user_message()));
            return;
        };

        let outgoing = self.settings.clone();
        let Some(result) = self
            .scope
            .run(api.update_settings(&outgoing, &token))
            .await
        else {
            return;
        };
        match result {
            Ok(saved) => {
                self.settings = saved;
                self.notice = Some(Notice::success("Settings saved."));
            }
            Err(e) => {
                tracing::warn!("Could not save site settings: {}", e);
                self.notice = Some(Notice::error(e.user_message()));
            }
        }
    }
}

impl Drop for SettingsEditor {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::UserProfile;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeSite {
        stored: Mutex<SiteSettings>,
    }

    #[async_trait]
    impl SiteRepository for FakeSite {
        async fn subscribe(&self, _email: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn fetch_settings(&self) -> Result<SiteSettings, ApiError> {
            Ok(self.stored.lock().unwrap().clone())
        }

        async fn update_settings(
            &self,
            settings: &SiteSettings,
            _token: &str,
        ) -> Result<SiteSettings, ApiError> {
            let mut saved = settings.clone();
            saved.site_name = saved.site_name.trim().to_string();
            *self.stored.lock().unwrap() = saved.clone();
            Ok(saved)
        }
    }

    #[tokio::test]
    async fn test_load_edit_save() {
        let site = Arc::new(FakeSite::default());
        site.stored.lock().unwrap().tagline = "News you can trust".to_string();
        let session = Session::new("t0k", UserProfile::default());
        let mut editor = SettingsEditor::new(session, Some(site.clone()));

        editor.load().await;
        assert_eq!(editor.settings().tagline, "News you can trust");

        editor.settings_mut().site_name = "  The Daily Ledger ".to_string();
        editor.save().await;

        assert_eq!(editor.settings().site_name, "The Daily Ledger");
        assert_eq!(site.stored.lock().unwrap().site_name, "The Daily Ledger");
        assert!(!editor.notice().unwrap().is_error());
    }

    #[tokio::test]
    async fn test_save_requires_token() {
        let site = Arc::new(FakeSite::default());
        let mut editor = SettingsEditor::new(Session::anonymous(), Some(site.clone()));
        editor.settings_mut().site_name = "Changed".to_string();

        editor.save().await;

        assert_eq!(editor.notice().unwrap().text, ApiError::MissingToken.user_message());
        assert_eq!(site.stored.lock().unwrap().site_name, "");
    }
}
