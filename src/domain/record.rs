// Record domain model - a single content item edited by a section screen
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

pub type RecordId = String;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    #[serde(default, alias = "_id", deserialize_with = "lenient_string")]
    pub id: RecordId,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, alias = "excerpt", deserialize_with = "lenient_string")]
    pub summary: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub body: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub date: String,
    #[serde(default, alias = "imageUrl", deserialize_with = "lenient_string")]
    pub image: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub desk: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub author_role: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub link: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub duration: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub audio_url: String,
}

impl Record {
    /// Blank record carrying only an id; every other field is empty.
    pub fn new(id: RecordId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Shallow merge: only fields present in the patch are overwritten.
    pub fn apply(&mut self, patch: RecordPatch) {
        let RecordPatch {
            title,
            summary,
            body,
            date,
            image,
            category,
            desk,
            author,
            author_role,
            link,
            duration,
            audio_url,
        } = patch;

        merge(&mut self.title, title);
        merge(&mut self.summary, summary);
        merge(&mut self.body, body);
        merge(&mut self.date, date);
        merge(&mut self.image, image);
        merge(&mut self.category, category);
        merge(&mut self.desk, desk);
        merge(&mut self.author, author);
        merge(&mut self.author_role, author_role);
        merge(&mut self.link, link);
        merge(&mut self.duration, duration);
        merge(&mut self.audio_url, audio_url);
    }
}

fn merge(field: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *field = value;
    }
}

/// Field-level partial update. The id is deliberately absent: ids never change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecordPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub date: Option<String>,
    pub image: Option<String>,
    pub category: Option<String>,
    pub desk: Option<String>,
    pub author: Option<String>,
    pub author_role: Option<String>,
    pub link: Option<String>,
    pub duration: Option<String>,
    pub audio_url: Option<String>,
}

impl RecordPatch {
    pub fn image(url: impl Into<String>) -> Self {
        Self {
            image: Some(url.into()),
            ..Self::default()
        }
    }

    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a JSON array of records, found {0}")]
    NotAList(&'static str),
    #[error("record {index}: {message}")]
    InvalidRecord { index: usize, message: String },
}

/// Decode a JSON document (as text) into a list of records.
pub fn decode_records_str(raw: &str) -> Result<Vec<Record>, DecodeError> {
    let value: Value = serde_json::from_str(raw)?;
    decode_records(value)
}

/// Typed boundary for record lists coming from the server or local storage.
///
/// Missing ids are generated and duplicate ids are replaced so the returned
/// list always satisfies the uniqueness invariant.
pub fn decode_records(value: Value) -> Result<Vec<Record>, DecodeError> {
    let items = match value {
        Value::Array(items) => items,
        other => return Err(DecodeError::NotAList(json_kind(&other))),
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(DecodeError::InvalidRecord {
                index,
                message: format!("expected an object, found {}", json_kind(&item)),
            });
        }
        let record = serde_json::from_value::<Record>(item).map_err(|e| {
            DecodeError::InvalidRecord {
                index,
                message: e.to_string(),
            }
        })?;
        records.push(record);
    }

    assign_missing_ids(&mut records);
    Ok(records)
}

fn assign_missing_ids(records: &mut [Record]) {
    let mut seen: HashSet<String> = HashSet::with_capacity(records.len());
    for index in 0..records.len() {
        let id = records[index].id.trim().to_string();
        if !id.is_empty() && seen.insert(id.clone()) {
            records[index].id = id;
            continue;
        }
        if !id.is_empty() {
            tracing::warn!("Duplicate record id {} at position {}, assigning a new id", id, index);
        }
        let fresh = new_record_id(records);
        seen.insert(fresh.clone());
        records[index].id = fresh;
    }
}

/// Generate a draft id that does not collide with any id in `existing`.
pub fn new_record_id(existing: &[Record]) -> RecordId {
    loop {
        let candidate = format!("draft-{}", Uuid::new_v4().simple());
        if !existing.iter().any(|r| r.id == candidate) {
            return candidate;
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s),
        Some(Value::Bool(b)) => Ok(b.to_string()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        Some(other) => Err(de::Error::custom(format!(
            "expected a string, found {}",
            json_kind(&other)
        ))),
    }
}
