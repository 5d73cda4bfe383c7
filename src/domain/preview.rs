// Preview layout - lead / side / grid slices derived from an ordered list
use super::record::Record;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PreviewFilter {
    pub desk: Option<String>,
    pub category: Option<String>,
}

impl PreviewFilter {
    pub fn desk(desk: impl Into<String>) -> Self {
        Self {
            desk: Some(desk.into()),
            category: None,
        }
    }

    pub fn matches(&self, record: &Record) -> bool {
        field_matches(self.desk.as_deref(), &record.desk)
            && field_matches(self.category.as_deref(), &record.category)
    }
}

fn field_matches(wanted: Option<&str>, actual: &str) -> bool {
    match wanted.map(str::trim) {
        None | Some("") => true,
        Some(wanted) => wanted.eq_ignore_ascii_case(actual.trim()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewOptions {
    pub side_count: usize,
    pub page_size: usize,
}

impl Default for PreviewOptions {
    fn default() -> Self {
        Self {
            side_count: 2,
            page_size: 6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewLayout {
    pub lead: Option<Record>,
    pub side: Vec<Record>,
    pub grid: Vec<Record>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
}

/// Derive display slices. `page` is 1-based and clamped into range.
pub fn build_preview(
    records: &[Record],
    filter: &PreviewFilter,
    options: PreviewOptions,
    page: usize,
) -> PreviewLayout {
    let visible: Vec<&Record> = records.iter().filter(|r| filter.matches(r)).collect();
    let total = visible.len();

    let mut rest = visible.into_iter();
    let lead = rest.next().cloned();
    let side: Vec<Record> = rest.by_ref().take(options.side_count).cloned().collect();
    let remainder: Vec<&Record> = rest.collect();

    let page_size = options.page_size.max(1);
    let total_pages = remainder.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);

    let grid = remainder
        .chunks(page_size)
        .nth(page - 1)
        .map(|chunk| chunk.iter().map(|r| (*r).clone()).collect())
        .unwrap_or_default();

    PreviewLayout {
        lead,
        side,
        grid,
        page,
        total_pages,
        total,
    }
}
