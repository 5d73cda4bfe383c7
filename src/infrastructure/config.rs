use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::domain::preview::PreviewOptions;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiSettings,
    pub endpoints: EndpointsConfig,
    pub storage: StorageSettings,
    pub preview: PreviewSettings,
    pub server: ServerSettings,
    pub auth: AuthSettings,
    pub dashboard: DashboardSettings,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: Option<String>,
}

impl ApiSettings {
    /// Configured base URL without a trailing slash; `None` when unset or blank.
    pub fn base(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|b| b.trim().trim_end_matches('/'))
            .filter(|b| !b.is_empty())
            .map(str::to_string)
    }
}

/// Path templates relative to the API base. `${section}` is replaced by the
/// section slug.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EndpointsConfig {
    pub published: String,
    pub publish: String,
    pub upload: String,
    pub stats: String,
    pub activity: String,
    pub subscriber_stats: String,
    pub subscribers: String,
    pub newsletter: String,
    pub settings: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            published: "/api/sections/${section}".to_string(),
            publish: "/api/sections/${section}".to_string(),
            upload: "/api/uploads/${section}".to_string(),
            stats: "/api/dashboard/stats".to_string(),
            activity: "/api/dashboard/activity".to_string(),
            subscriber_stats: "/api/subscribers/stats".to_string(),
            subscribers: "/api/subscribers".to_string(),
            newsletter: "/api/newsletter/subscribe".to_string(),
            settings: "/api/settings".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageSettings {
    pub dir: PathBuf,
    pub namespace: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("drafts"),
            namespace: "newsdesk".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PreviewSettings {
    pub side_count: usize,
    pub page_size: usize,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        let defaults = PreviewOptions::default();
        Self {
            side_count: defaults.side_count,
            page_size: defaults.page_size,
        }
    }
}

impl PreviewSettings {
    pub fn options(&self) -> PreviewOptions {
        PreviewOptions {
            side_count: self.side_count,
            page_size: self.page_size.max(1),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AuthSettings {
    pub login_route: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            login_route: "/login".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DashboardSettings {
    pub activity_limit: usize,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self { activity_limit: 10 }
    }
}

/// Load `config/newsdesk.*` (optional) overlaid with `NEWSDESK_*` variables,
/// e.g. `NEWSDESK_API__BASE_URL=https://cms.example.com`.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/newsdesk").required(false))
        .add_source(
            config::Environment::with_prefix("NEWSDESK")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

/// Replace template variables in an endpoint path
pub fn prepare_path(template: &str, vars: &HashMap<String, String>) -> String {
    let mut result = template.to_string();
    for (key, value) in vars {
        let placeholder = format!("${{{}}}", key);
        result = result.replace(&placeholder, value);
    }
    result
}
