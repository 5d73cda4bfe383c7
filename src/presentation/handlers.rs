// HTTP request handlers for the public site
use crate::application::newsletter_widget::SignupState;
use crate::domain::notice::Notice;
use crate::domain::preview::PreviewFilter;
use crate::domain::section::Section;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub desk: Option<String>,
    pub category: Option<String>,
    pub page: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SectionSummary {
    pub slug: &'static str,
    pub title: &'static str,
    pub desks: &'static [&'static str],
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// All sections with their desks
pub async fn list_sections() -> Json<Vec<SectionSummary>> {
    Json(
        Section::ALL
            .into_iter()
            .map(|s| SectionSummary {
                slug: s.slug(),
                title: s.title(),
                desks: s.desks(),
            })
            .collect(),
    )
}

/// Lead / side / grid layout of one section page
pub async fn section_page(
    Path(slug): Path<String>,
    Query(query): Query<PageQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let Some(section) = Section::from_slug(&slug) else {
        return (
            StatusCode::NOT_FOUND,
            Json(Notice::error(format!("No section named '{}'.", slug))),
        )
            .into_response();
    };

    let filter = PreviewFilter {
        desk: query.desk,
        category: query.category,
    };
    let layout = state
        .public_pages
        .section_page(section, &filter, query.page.unwrap_or(1))
        .await;
    Json(layout).into_response()
}

/// Newsletter signup from the public widget
pub async fn newsletter_signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Response {
    let (signup, notice) = state.public_pages.subscribe(&request.email).await;
    let notice = notice.unwrap_or_else(|| Notice::info("Request received."));

    let status = match signup {
        SignupState::Subscribed => StatusCode::OK,
        SignupState::Invalid => StatusCode::BAD_REQUEST,
        _ => StatusCode::BAD_GATEWAY,
    };
    (status, Json(notice)).into_response()
}
