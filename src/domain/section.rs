// Section domain model
use super::record::{decode_records_str, Record};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Section {
    Business,
    Sports,
    Politics,
    WorldNews,
    Podcast,
    Resources,
}

impl Section {
    pub const ALL: [Section; 6] = [
        Section::Business,
        Section::Sports,
        Section::Politics,
        Section::WorldNews,
        Section::Podcast,
        Section::Resources,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            Section::Business => "business",
            Section::Sports => "sports",
            Section::Politics => "politics",
            Section::WorldNews => "world-news",
            Section::Podcast => "podcast",
            Section::Resources => "resources",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Section::Business => "Business",
            Section::Sports => "Sports",
            Section::Politics => "Politics",
            Section::WorldNews => "World News",
            Section::Podcast => "Podcast",
            Section::Resources => "Resources",
        }
    }

    /// Named partitions of the section's records.
    pub fn desks(&self) -> &'static [&'static str] {
        match self {
            Section::WorldNews => &["Local", "International"],
            _ => &[],
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.slug().eq_ignore_ascii_case(slug.trim()))
    }

    fn bundled_json(&self) -> &'static str {
        match self {
            Section::Business => include_str!("../../data/defaults/business.json"),
            Section::Sports => include_str!("../../data/defaults/sports.json"),
            Section::Politics => include_str!("../../data/defaults/politics.json"),
            Section::WorldNews => include_str!("../../data/defaults/world-news.json"),
            Section::Podcast => include_str!("../../data/defaults/podcast.json"),
            Section::Resources => include_str!("../../data/defaults/resources.json"),
        }
    }

    /// The dataset shipped with the binary, used whenever no usable draft exists.
    pub fn default_records(&self) -> Vec<Record> {
        match decode_records_str(self.bundled_json()) {
            Ok(records) => records,
            Err(e) => {
                tracing::error!("Bundled defaults for {} are invalid: {}", self.slug(), e);
                Vec::new()
            }
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownSection(pub String);

impl fmt::Display for UnknownSection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown section '{}'", self.0)
    }
}

impl std::error::Error for UnknownSection {}

impl FromStr for Section {
    type Err = UnknownSection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slug(s).ok_or_else(|| UnknownSection(s.to_string()))
    }
}
