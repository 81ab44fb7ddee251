use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

pub const GENRES: [&str; 11] = [
    "EDM",
    "Hip-Hop",
    "Pop",
    "Rock",
    "R&B",
    "Country",
    "Electronic",
    "Alternative",
    "Indie",
    "Latin",
    "Other",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtistTier {
    Emerging,
    MidTier,
    Established,
}

impl ArtistTier {
    pub fn label(self) -> &'static str {
        match self {
            Self::Emerging => "Emerging",
            Self::MidTier => "Mid-Tier",
            Self::Established => "Established",
        }
    }
}

/// Metadata about the artist and release. Not involved in pricing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientDetails {
    pub artist_name: String,
    pub song_title: String,
    pub genre: String,
    pub tier: Option<ArtistTier>,
    pub release_date: NaiveDate,
}

impl Default for ClientDetails {
    fn default() -> Self {
        Self {
            artist_name: String::new(),
            song_title: String::new(),
            genre: String::new(),
            tier: None,
            release_date: Utc::now().date_naive(),
        }
    }
}

impl ClientDetails {
    /// Fields that must be non-blank before a proposal can be submitted.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.artist_name.trim().is_empty() {
            missing.push("artist_name");
        }
        if self.song_title.trim().is_empty() {
            missing.push("song_title");
        }
        if self.genre.trim().is_empty() {
            missing.push("genre");
        }
        if self.tier.is_none() {
            missing.push("tier");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required_fields().is_empty()
    }

    /// Canonical spelling of the genre when it is one of [`GENRES`],
    /// ignoring case and surrounding whitespace.
    pub fn listed_genre(&self) -> Option<&'static str> {
        let genre = self.genre.trim();
        GENRES.iter().copied().find(|listed| listed.eq_ignore_ascii_case(genre))
    }

    /// A genre was entered but it is not one the portal offers.
    pub fn has_unlisted_genre(&self) -> bool {
        !self.genre.trim().is_empty() && self.listed_genre().is_none()
    }
}
