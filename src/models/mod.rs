use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Episode count for a catalog entry
///
/// The catalog source marks still-airing shows with a literal "Unknown",
/// which normalizes to `Ongoing` at parse time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Episodes {
    Count(String),
    Ongoing,
}

impl Display for Episodes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Episodes::Count(n) => write!(f, "{}", n),
            Episodes::Ongoing => write!(f, "Ongoing"),
        }
    }
}

/// Full catalog entry (the comma-delimited source)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    pub genres: Vec<String>,
    /// Format of the release ("TV", "Movie", "OVA", ...); "Unknown" when absent
    pub kind: String,
    pub episodes: Episodes,
    /// Average rating in [0, 10]; 0 when the source had none
    pub rating: f64,
    /// Community member count; 0 when the source had none
    pub members: u64,
}

/// Descriptive entry (the pipe-delimited source); carries free text instead
/// of catalog statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveEntry {
    pub title: String,
    pub genres: Vec<String>,
    pub description: String,
}

/// A single anime known to the recommender
///
/// The two source formats provide different fields, so the record is a sum
/// type over them. Every record, from either source, has a non-empty title
/// and a non-empty genre list. The serde tag preserves the source name the
/// catalog files use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source")]
pub enum AnimeRecord {
    #[serde(rename = "csv")]
    Catalog(CatalogEntry),
    #[serde(rename = "txt")]
    Descriptive(DescriptiveEntry),
}

impl AnimeRecord {
    pub fn title(&self) -> &str {
        match self {
            AnimeRecord::Catalog(e) => &e.title,
            AnimeRecord::Descriptive(e) => &e.title,
        }
    }

    pub fn genres(&self) -> &[String] {
        match self {
            AnimeRecord::Catalog(e) => &e.genres,
            AnimeRecord::Descriptive(e) => &e.genres,
        }
    }

    /// Release format; only catalog entries carry one
    pub fn kind(&self) -> Option<&str> {
        match self {
            AnimeRecord::Catalog(e) => Some(&e.kind),
            AnimeRecord::Descriptive(_) => None,
        }
    }

    /// Rating in [0, 10]; descriptive entries have none
    pub fn rating(&self) -> f64 {
        match self {
            AnimeRecord::Catalog(e) => e.rating,
            AnimeRecord::Descriptive(_) => 0.0,
        }
    }

    /// Popularity member count; descriptive entries have none
    pub fn members(&self) -> u64 {
        match self {
            AnimeRecord::Catalog(e) => e.members,
            AnimeRecord::Descriptive(_) => 0,
        }
    }
}

/// A catalog record selected for the user, with its relevance score when one
/// was computed
///
/// The quick-suggestion fallback returns records without scoring them, so the
/// score is optional; when present it is always positive.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub anime: AnimeRecord,
    pub score: Option<f64>,
}
