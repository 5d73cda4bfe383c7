// REST client for the content backend
use crate::application::api_error::ApiError;
use crate::application::content_repository::{
    AnalyticsRepository, ContentRepository, ImageUpload, SiteRepository,
};
use crate::domain::dashboard::{ActivityEvent, DashboardSnapshot};
use crate::domain::newsletter::{Subscriber, SubscriberQuery, SubscriberStats};
use crate::domain::record::{decode_records, Record};
use crate::domain::section::Section;
use crate::domain::settings::SiteSettings;
use crate::infrastructure::config::{prepare_path, ApiSettings, EndpointsConfig};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

/// Keys under which backends wrap a record list in an object.
const LIST_KEYS: [&str; 3] = ["items", "records", "data"];

#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
    endpoints: EndpointsConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    url: Option<String>,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, endpoints: EndpointsConfig) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            endpoints,
            client: reqwest::Client::new(),
        }
    }

    /// `None` when no API base URL is configured.
    pub fn from_config(api: &ApiSettings, endpoints: &EndpointsConfig) -> Option<Self> {
        api.base().map(|base| Self::new(base, endpoints.clone()))
    }

    fn url(&self, template: &str, section: Option<Section>) -> String {
        let mut vars = HashMap::new();
        if let Some(section) = section {
            vars.insert("section".to_string(), section.slug().to_string());
        }
        format!("{}{}", self.base_url, prepare_path(template, &vars))
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, ApiError> {
        let response = request
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(error_from_body(status, &body));
        }
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn send_typed<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let value = self.send(request).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Map a non-2xx response to an error, preferring the server's own message.
pub fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    let message = server_message(body);
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return ApiError::Unauthorized {
            status: status.as_u16(),
            message,
        };
    }

    ApiError::Status {
        status: status.as_u16(),
        message: message
            .unwrap_or_else(|| format!("Request failed with status {}.", status.as_u16())),
    }
}

/// `message` (or `error`) field of a JSON error body.
fn server_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    ["message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

/// Pull the record array out of a response body, if it has one.
pub fn extract_record_list(value: Value) -> Option<Value> {
    match value {
        Value::Array(_) => Some(value),
        Value::Object(mut map) => LIST_KEYS
            .iter()
            .find_map(|key| map.remove(*key).filter(Value::is_array)),
        _ => None,
    }
}

#[async_trait]
impl ContentRepository for HttpApi {
    async fn fetch_published(&self, section: Section) -> Result<Vec<Record>, ApiError> {
        let url = self.url(&self.endpoints.published, Some(section));
        tracing::debug!("Fetching published records from {}", url);

        let value = self.send(self.client.get(&url)).await?;
        let list = extract_record_list(value)
            .ok_or_else(|| ApiError::Decode("response has no record list".to_string()))?;
        decode_records(list).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn publish(
        &self,
        section: Section,
        records: &[Record],
        token: &str,
    ) -> Result<Option<Vec<Record>>, ApiError> {
        let url = self.url(&self.endpoints.publish, Some(section));
        tracing::info!("Publishing {} {} records", records.len(), section);

        let request = self.client.put(&url).bearer_auth(token).json(records);
        let value = self.send(request).await?;

        let Some(list) = extract_record_list(value) else {
            return Ok(None);
        };
        match decode_records(list) {
            Ok(records) => Ok(Some(records)),
            Err(e) => {
                tracing::warn!("Ignoring undecodable publish response for {}: {}", section, e);
                Ok(None)
            }
        }
    }

    async fn upload_image(
        &self,
        section: Section,
        image: ImageUpload,
        token: &str,
    ) -> Result<String, ApiError> {
        let url = self.url(&self.endpoints.upload, Some(section));
        let part = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name)
            .mime_str(&image.content_type)
            .map_err(|e| ApiError::Decode(format!("invalid content type: {}", e)))?;
        let form = Form::new().part("file", part);

        let response: UploadResponse = self
            .send_typed(self.client.post(&url).bearer_auth(token).multipart(form))
            .await?;
        response
            .url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ApiError::Decode("upload response did not include a url".to_string()))
    }
}

#[async_trait]
impl AnalyticsRepository for HttpApi {
    async fn fetch_stats(&self, token: &str) -> Result<DashboardSnapshot, ApiError> {
        let url = self.url(&self.endpoints.stats, None);
        self.send_typed(self.client.get(&url).bearer_auth(token)).await
    }

    async fn fetch_recent_activity(
        &self,
        token: &str,
        limit: usize,
    ) -> Result<Vec<ActivityEvent>, ApiError> {
        let url = format!("{}?limit={}", self.url(&self.endpoints.activity, None), limit);
        let value = self.send(self.client.get(&url).bearer_auth(token)).await?;
        let list = extract_list_or_empty(value);
        serde_json::from_value(list).map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn fetch_subscriber_stats(&self, token: &str) -> Result<SubscriberStats, ApiError> {
        let url = self.url(&self.endpoints.subscriber_stats, None);
        self.send_typed(self.client.get(&url).bearer_auth(token)).await
    }

    async fn fetch_subscribers(
        &self,
        token: &str,
        query: &SubscriberQuery,
    ) -> Result<Vec<Subscriber>, ApiError> {
        let url = format!(
            "{}?q={}&page={}",
            self.url(&self.endpoints.subscribers, None),
            urlencoding::encode(query.search.trim()),
            query.page.max(1)
        );
        let value = self.send(self.client.get(&url).bearer_auth(token)).await?;
        let list = extract_list_or_empty(value);
        serde_json::from_value(list).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

fn extract_list_or_empty(value: Value) -> Value {
    extract_record_list(value).unwrap_or_else(|| Value::Array(Vec::new()))
}

#[async_trait]
impl SiteRepository for HttpApi {
    async fn subscribe(&self, email: &str) -> Result<(), ApiError> {
        let url = self.url(&self.endpoints.newsletter, None);
        self.send(self.client.post(&url).json(&json!({ "email": email })))
            .await
            .map(|_| ())
    }

    async fn fetch_settings(&self) -> Result<SiteSettings, ApiError> {
        let url = self.url(&self.endpoints.settings, None);
        self.send_typed(self.client.get(&url)).await
    }

    async fn update_settings(
        &self,
        settings: &SiteSettings,
        token: &str,
    ) -> Result<SiteSettings, ApiError> {
        let url = self.url(&self.endpoints.settings, None);
        let value = self
            .send(self.client.put(&url).bearer_auth(token).json(settings))
            .await?;
        if value.is_null() {
            return Ok(settings.clone());
        }
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::draft_store::DraftStore;
    use crate::application::section_editor::{EditorOptions, SectionEditor};
    use crate::domain::session::{Role, Session, UserProfile};
    use crate::infrastructure::memory_storage::MemoryStorage;
    use axum::extract::{Request, State};
    use axum::response::{IntoResponse, Response};
    use axum::Router;
    use std::sync::{Arc, Mutex};

    /// One request as the local backend saw it.
    #[derive(Debug, Clone)]
    struct Seen {
        method: String,
        path: String,
        query: Option<String>,
        authorization: Option<String>,
        content_type: String,
        body: String,
    }

    /// Canned replies keyed by "METHOD /path"; everything else is a 404.
    #[derive(Default)]
    struct Backend {
        replies: HashMap<String, (u16, String)>,
        seen: Mutex<Vec<Seen>>,
    }

    impl Backend {
        fn seen(&self) -> Vec<Seen> {
            self.seen.lock().unwrap().clone()
        }
    }

    async fn record_and_reply(State(backend): State<Arc<Backend>>, request: Request) -> Response {
        let (parts, body) = request.into_parts();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        backend.seen.lock().unwrap().push(Seen {
            method: parts.method.to_string(),
            path: parts.uri.path().to_string(),
            query: parts.uri.query().map(str::to_string),
            authorization: header("authorization"),
            content_type: header("content-type").unwrap_or_default(),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });

        let key = format!("{} {}", parts.method, parts.uri.path());
        match backend.replies.get(&key) {
            Some((status, body)) => (
                StatusCode::from_u16(*status).unwrap(),
                [("content-type", "application/json")],
                body.clone(),
            )
                .into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        }
    }

    async fn serve(replies: &[(&str, u16, &str)]) -> (HttpApi, Arc<Backend>) {
        let backend = Arc::new(Backend {
            replies: replies
                .iter()
                .map(|(key, status, body)| (key.to_string(), (*status, body.to_string())))
                .collect(),
            ..Backend::default()
        });
        let app = Router::new()
            .fallback(record_and_reply)
            .with_state(backend.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let api = HttpApi::new(format!("http://{}", addr), EndpointsConfig::default());
        (api, backend)
    }

    fn business_editor(api: HttpApi) -> SectionEditor {
        let session = Session::new(
            "t0k",
            UserProfile {
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                role: Role::Editor,
            },
        );
        SectionEditor::new(
            Section::Business,
            session,
            DraftStore::new(Arc::new(MemoryStorage::new()), "newsdesk"),
            Some(Arc::new(api)),
            EditorOptions::default(),
        )
    }

    #[test]
    fn test_error_prefers_server_message() {
        let err = error_from_body(StatusCode::INTERNAL_SERVER_ERROR, r#"{"message":"db down"}"#);
        assert_eq!(
            err,
            ApiError::Status {
                status: 500,
                message: "db down".to_string()
            }
        );
        assert_eq!(err.user_message(), "db down");

        let err = error_from_body(StatusCode::BAD_REQUEST, r#"{"error":"title required"}"#);
        assert_eq!(err.user_message(), "title required");
    }

    #[test]
    fn test_error_falls_back_to_generic_message() {
        let err = error_from_body(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>");
        assert_eq!(err.user_message(), "Request failed with status 502.");
    }

    #[test]
    fn test_auth_statuses_are_rejections() {
        assert_eq!(
            error_from_body(StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized {
                status: 401,
                message: None
            }
        );
        let refused = error_from_body(
            StatusCode::FORBIDDEN,
            r#"{"message":"Only admins may publish Business"}"#,
        );
        assert!(refused.is_auth_rejection());
        assert_eq!(refused.user_message(), "Only admins may publish Business");
    }

    #[test]
    fn test_extract_record_list_shapes() {
        assert_eq!(extract_record_list(json!([1])), Some(json!([1])));
        assert_eq!(extract_record_list(json!({ "items": [1] })), Some(json!([1])));
        assert_eq!(extract_record_list(json!({ "data": [2] })), Some(json!([2])));
        assert_eq!(extract_record_list(json!({ "items": "nope" })), None);
        assert_eq!(extract_record_list(json!({ "ok": true })), None);
        assert_eq!(extract_record_list(Value::Null), None);
    }

    #[test]
    fn test_url_templates() {
        let api = HttpApi::new("https://cms.example.com/", EndpointsConfig::default());
        assert_eq!(
            api.url(&api.endpoints.publish, Some(Section::WorldNews)),
            "https://cms.example.com/api/sections/world-news"
        );
        assert_eq!(
            api.url(&api.endpoints.stats, None),
            "https://cms.example.com/api/dashboard/stats"
        );
    }

    #[test]
    fn test_from_config_requires_base() {
        let endpoints = EndpointsConfig::default();
        assert!(HttpApi::from_config(&ApiSettings::default(), &endpoints).is_none());
        let api = ApiSettings {
            base_url: Some("http://localhost:4000".to_string()),
        };
        assert!(HttpApi::from_config(&api, &endpoints).is_some());
    }

    #[tokio::test]
    async fn test_fetch_published_is_anonymous_and_unwraps_items() {
        let (api, backend) = serve(&[(
            "GET /api/sections/sports",
            200,
            r#"{"items":[{"_id":"s1","title":"Derby day"},{"title":3}]}"#,
        )])
        .await;

        let records = api.fetch_published(Section::Sports).await.unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "s1");
        assert_eq!(records[1].title, "3");
        assert!(records[1].id.starts_with("draft-"));
        let seen = backend.seen();
        assert_eq!(seen[0].method, "GET");
        assert_eq!(seen[0].authorization, None);
    }

    #[tokio::test]
    async fn test_publish_sends_bearer_and_json_list() {
        let (api, backend) = serve(&[(
            "PUT /api/sections/business",
            200,
            r#"{"items":[{"id":"srv-1","title":"Rates hold"}]}"#,
        )])
        .await;
        let mut outgoing = Record::new("a".to_string());
        outgoing.title = "Rates hold".to_string();

        let canonical = api
            .publish(Section::Business, &[outgoing], "t0k")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(canonical[0].id, "srv-1");
        let seen = backend.seen();
        assert_eq!(seen[0].method, "PUT");
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer t0k"));
        assert!(seen[0].content_type.starts_with("application/json"));
        let body: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body[0]["id"], "a");
        assert_eq!(body[0]["title"], "Rates hold");
    }

    #[tokio::test]
    async fn test_publish_refusal_shows_server_text() {
        let (api, _) = serve(&[(
            "PUT /api/sections/business",
            403,
            r#"{"message":"Only admins may publish Business"}"#,
        )])
        .await;
        let mut editor = business_editor(api);
        let before = editor.records().to_vec();

        editor.publish().await;

        let notice = editor.notice().unwrap();
        assert!(notice.is_error());
        assert_eq!(notice.text, "Only admins may publish Business");
        assert_eq!(editor.records(), before.as_slice());
    }

    #[tokio::test]
    async fn test_publish_server_error_keeps_list() {
        let (api, _) = serve(&[(
            "PUT /api/sections/business",
            500,
            r#"{"message":"db down"}"#,
        )])
        .await;
        let mut editor = business_editor(api);
        let before = editor.records().to_vec();

        editor.publish().await;

        assert_eq!(editor.notice().map(|n| n.text.as_str()), Some("db down"));
        assert_eq!(editor.records(), before.as_slice());
    }

    #[tokio::test]
    async fn test_upload_posts_multipart_file_part() {
        let (api, backend) = serve(&[(
            "POST /api/uploads/world-news",
            200,
            r#"{"url":"https://cdn.example.com/summit.jpg"}"#,
        )])
        .await;

        let url = api
            .upload_image(
                Section::WorldNews,
                ImageUpload::new("summit.jpg", "image/jpeg", b"JFIF".to_vec()),
                "t0k",
            )
            .await
            .unwrap();

        assert_eq!(url, "https://cdn.example.com/summit.jpg");
        let seen = backend.seen();
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer t0k"));
        assert!(seen[0].content_type.starts_with("multipart/form-data"));
        assert!(seen[0].body.contains(r#"name="file""#));
        assert!(seen[0].body.contains(r#"filename="summit.jpg""#));
        assert!(seen[0].body.contains("JFIF"));
    }

    #[tokio::test]
    async fn test_upload_without_url_is_rejected() {
        let (api, _) = serve(&[("POST /api/uploads/podcast", 200, r#"{"ok":true}"#)]).await;

        let err = api
            .upload_image(
                Section::Podcast,
                ImageUpload::new("cover.png", "image/png", b"PNG".to_vec()),
                "t0k",
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message(), "The server sent an unexpected response.");
    }

    #[tokio::test]
    async fn test_activity_tolerates_odd_timestamps() {
        let (api, backend) = serve(&[(
            "GET /api/dashboard/activity",
            200,
            r#"{"items":[{"id":"1","at":1772357400000},{"id":"2","at":"soon"}]}"#,
        )])
        .await;

        let events = api.fetch_recent_activity("t0k", 5).await.unwrap();

        assert_eq!(events.len(), 2);
        assert!(events[0].at.is_some());
        assert!(events[1].at.is_none());
        let seen = backend.seen();
        assert_eq!(seen[0].query.as_deref(), Some("limit=5"));
        assert_eq!(seen[0].authorization.as_deref(), Some("Bearer t0k"));
    }

    #[tokio::test]
    async fn test_newsletter_signup_is_anonymous_post() {
        let (api, backend) = serve(&[("POST /api/newsletter/subscribe", 200, "")]).await;

        api.subscribe("reader@example.com").await.unwrap();
        let err = api.fetch_settings().await.unwrap_err();

        let seen = backend.seen();
        assert_eq!(seen[0].authorization, None);
        let body: Value = serde_json::from_str(&seen[0].body).unwrap();
        assert_eq!(body["email"], "reader@example.com");
        assert_eq!(err.user_message(), "Request failed with status 404.");
    }
}
