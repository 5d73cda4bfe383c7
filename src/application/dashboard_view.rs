// Dashboard view - statistics gated by session and role
use crate::application::api_error::ApiError;
use crate::application::content_repository::AnalyticsRepository;
use crate::application::lifecycle::ViewScope;
use crate::application::session_store::SessionStore;
use crate::domain::dashboard::{scale_max, trend_percent, ActivityEvent, DashboardSnapshot};
use crate::domain::newsletter::{Subscriber, SubscriberQuery, SubscriberStats};
use crate::domain::notice::Notice;
use crate::domain::session::Session;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    /// No token: nothing is fetched.
    Unauthenticated,
    /// Token present but the role may not see analytics.
    Restricted,
    Live,
}

pub struct DashboardView {
    api: Option<Arc<dyn AnalyticsRepository>>,
    sessions: SessionStore,
    session: Session,
    login_route: String,
    activity_limit: usize,
    state: DashboardState,
    snapshot: DashboardSnapshot,
    activity: Vec<ActivityEvent>,
    subscriber_stats: Option<SubscriberStats>,
    subscribers: Vec<Subscriber>,
    notice: Option<Notice>,
    redirect: Option<String>,
    scope: ViewScope,
}

impl DashboardView {
    pub fn new(
        session: Session,
        sessions: SessionStore,
        api: Option<Arc<dyn AnalyticsRepository>>,
        login_route: impl Into<String>,
        activity_limit: usize,
    ) -> Self {
        let mut view = Self {
            api,
            sessions,
            session,
            login_route: login_route.into(),
            activity_limit,
            state: DashboardState::Unauthenticated,
            snapshot: DashboardSnapshot::placeholder(),
            activity: Vec::new(),
            subscriber_stats: None,
            subscribers: Vec::new(),
            notice: None,
            redirect: None,
            scope: ViewScope::new(),
        };
        view.state = view.gate();
        view
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    pub fn activity(&self) -> &[ActivityEvent] {
        &self.activity
    }

    pub fn subscriber_stats(&self) -> Option<&SubscriberStats> {
        self.subscriber_stats.as_ref()
    }

    pub fn subscribers(&self) -> &[Subscriber] {
        &self.subscribers
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Route the host should navigate to after the session was rejected.
    pub fn redirect(&self) -> Option<&str> {
        self.redirect.as_deref()
    }

    pub fn traffic_trend(&self) -> Option<f64> {
        trend_percent(&self.snapshot.traffic)
    }

    pub fn traffic_scale(&self) -> f64 {
        scale_max(&self.snapshot.traffic)
    }

    pub fn scope(&self) -> ViewScope {
        self.scope.clone()
    }

    pub fn dispose(&self) {
        self.scope.dispose();
    }

    fn gate(&self) -> DashboardState {
        if !self.session.is_authenticated() {
            DashboardState::Unauthenticated
        } else if !self.session.role().can_view_analytics() {
            DashboardState::Restricted
        } else {
            DashboardState::Live
        }
    }

    /// Fetch stats and recent activity concurrently when the session allows it.
    pub async fn refresh(&mut self) {
        self.redirect = None;
        self.state = self.gate();
        if self.state != DashboardState::Live {
            self.clear_data();
            return;
        }

        let Some(api) = self.api.clone() else {
            self.notice = Some(Notice::error(ApiError::NotConfigured.user_message()));
            return;
        };
        let token = self.session.bearer().unwrap_or_default().to_string();
        let limit = self.activity_limit;

        let fetched = self
            .scope
            .run(async {
                tokio::join!(api.fetch_stats(&token), api.fetch_recent_activity(&token, limit))
            })
            .await;
        let Some((stats, activity)) = fetched else {
            return;
        };

        match stats {
            Ok(snapshot) => {
                self.snapshot = snapshot;
                self.notice = None;
            }
            Err(e) if e.is_auth_rejection() => {
                self.sign_out(&e);
                return;
            }
            Err(e) => {
                tracing::warn!("Dashboard stats unavailable: {}", e);
                self.snapshot = DashboardSnapshot::placeholder();
                self.notice = Some(Notice::error(e.user_message()));
            }
        }

        match activity {
            Ok(events) => self.activity = events,
            Err(e) => {
                tracing::warn!("Recent activity unavailable: {}", e);
                self.activity.clear();
            }
        }
    }

    /// Subscriber counters plus one page of the subscriber list.
    pub async fn load_subscribers(&mut self, query: &SubscriberQuery) {
        if self.state != DashboardState::Live {
            return;
        }
        let Some(api) = self.api.clone() else {
            self.notice = Some(Notice::error(ApiError::NotConfigured.user_message()));
            return;
        };
        let token = self.session.bearer().unwrap_or_default().to_string();

        let fetched = self
            .scope
            .run(async {
                tokio::join!(
                    api.fetch_subscriber_stats(&token),
                    api.fetch_subscribers(&token, query)
                )
            })
            .await;
        let Some((stats, list)) = fetched else {
            return;
        };

        match (stats, list) {
            (Err(e), _) | (_, Err(e)) if e.is_auth_rejection() => self.sign_out(&e),
            (Ok(stats), Ok(list)) => {
                self.subscriber_stats = Some(stats);
                self.subscribers = list;
            }
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!("Subscriber data unavailable: {}", e);
                self.notice = Some(Notice::error(e.user_message()));
            }
        }
    }

    fn sign_out(&mut self, cause: &ApiError) {
        tracing::info!("Dashboard session rejected ({}), signing out", cause);
        self.sessions.clear(&mut self.session);
        self.state = DashboardState::Unauthenticated;
        self.clear_data();
        self.notice = Some(Notice::error(cause.user_message()));
        self.redirect = Some(self.login_route.clone());
    }

    fn clear_data(&mut self) {
        self.snapshot = DashboardSnapshot::placeholder();
        self.activity.clear();
        self.subscriber_stats = None;
        self.subscribers.clear();
    }
}

impl Drop for DashboardView {
    fn drop(&mut self) {
        self.scope.dispose();
    }
}
