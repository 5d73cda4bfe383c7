// Dashboard domain model - read-only aggregates fetched wholesale
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Kpis {
    pub total_articles: u64,
    pub published_today: u64,
    pub page_views: u64,
    pub subscribers: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryShare {
    pub category: String,
    pub share: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankedItem {
    pub label: String,
    pub value: f64,
}

/// The all-zero `Default` doubles as the placeholder shown when no live data
/// is available.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub kpis: Kpis,
    pub traffic: Vec<SeriesPoint>,
    pub category_shares: Vec<CategoryShare>,
    pub top_articles: Vec<RankedItem>,
    pub top_authors: Vec<RankedItem>,
}

impl DashboardSnapshot {
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityEvent {
    pub id: String,
    pub actor: String,
    pub action: String,
    pub target: String,
    #[serde(deserialize_with = "lenient_timestamp")]
    pub at: Option<DateTime<Utc>>,
}

/// RFC 3339 text or epoch milliseconds; anything else decodes as `None`.
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let at = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    };
    Ok(at)
}

/// Percentage change between the first and last point of a series.
pub fn trend_percent(points: &[SeriesPoint]) -> Option<f64> {
    let (first, last) = match points {
        [first, .., last] => (first.value, last.value),
        _ => return None,
    };
    if first == 0.0 {
        return None;
    }
    Some((last - first) / first * 100.0)
}

/// Upper bound for a chart axis; never below 1 so empty series still scale.
pub fn scale_max(points: &[SeriesPoint]) -> f64 {
    points
        .iter()
        .map(|p| p.value)
        .fold(1.0_f64, f64::max)
}
