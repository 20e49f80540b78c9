use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::playstyle::PlaystyleVector;

/// Identifier wrapper for build listings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SellerId(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BuyerId(pub String);

/// Games a build can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameTitle {
    Nba2k25,
    Nba2k26,
    CollegeHoops,
}

impl GameTitle {
    pub const fn label(self) -> &'static str {
        match self {
            GameTitle::Nba2k25 => "NBA 2K25",
            GameTitle::Nba2k26 => "NBA 2K26",
            GameTitle::CollegeHoops => "College Hoops",
        }
    }

    /// Lenient parse used by catalog imports ("NBA 2K26", "nba_2k26", "2k26").
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "nba2k25" | "2k25" => Some(GameTitle::Nba2k25),
            "nba2k26" | "2k26" => Some(GameTitle::Nba2k26),
            "collegehoops" => Some(GameTitle::CollegeHoops),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    PointGuard,
    ShootingGuard,
    SmallForward,
    PowerForward,
    Center,
}

impl Position {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PG" | "POINT GUARD" => Some(Position::PointGuard),
            "SG" | "SHOOTING GUARD" => Some(Position::ShootingGuard),
            "SF" | "SMALL FORWARD" => Some(Position::SmallForward),
            "PF" | "POWER FORWARD" => Some(Position::PowerForward),
            "C" | "CENTER" => Some(Position::Center),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Playmaker,
    Sharpshooter,
    Slasher,
    TwoWay,
    Lockdown,
    Rebounder,
    Stretch,
}

impl Archetype {
    pub fn parse(raw: &str) -> Option<Self> {
        let compact: String = raw
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        match compact.as_str() {
            "playmaker" => Some(Archetype::Playmaker),
            "sharpshooter" => Some(Archetype::Sharpshooter),
            "slasher" => Some(Archetype::Slasher),
            "twoway" => Some(Archetype::TwoWay),
            "lockdown" => Some(Archetype::Lockdown),
            "rebounder" => Some(Archetype::Rebounder),
            "stretch" => Some(Archetype::Stretch),
            _ => None,
        }
    }
}

/// Character configuration a seller documents for a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildAttributes {
    pub archetype: Archetype,
    pub position: Position,
    pub height_inches: u8,
    pub overall_rating: u8,
    #[serde(default)]
    pub badges: Vec<String>,
}

/// Seller-reported results for a build, as percentages. Only `shooting` feeds the scorer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    #[serde(default)]
    pub shooting: Option<f64>,
    #[serde(default)]
    pub speed: Option<f64>,
    #[serde(default)]
    pub defense: Option<f64>,
    #[serde(default)]
    pub playmaking: Option<f64>,
    #[serde(default)]
    pub athleticism: Option<f64>,
}

impl PerformanceSnapshot {
    pub(crate) fn fields(&self) -> [(&'static str, Option<f64>); 5] {
        [
            ("shooting", self.shooting),
            ("speed", self.speed),
            ("defense", self.defense),
            ("playmaking", self.playmaking),
            ("athleticism", self.athleticism),
        ]
    }
}

/// Seller input for creating or replacing a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildSubmission {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub game: GameTitle,
    pub price_cents: u32,
    pub attributes: BuildAttributes,
    #[serde(default)]
    pub performance: PerformanceSnapshot,
    #[serde(default)]
    pub build_dna: Option<PlaystyleVector>,
}

/// Moderation lifecycle of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingStatus {
    PendingReview,
    Approved,
    Rejected,
}

impl ListingStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ListingStatus::PendingReview => "pending_review",
            ListingStatus::Approved => "approved",
            ListingStatus::Rejected => "rejected",
        }
    }
}

/// Stored listing as buyers and moderators see it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildListing {
    pub build_id: BuildId,
    pub seller_id: SellerId,
    pub title: String,
    pub description: String,
    pub game: GameTitle,
    pub price_cents: u32,
    pub attributes: BuildAttributes,
    pub performance: PerformanceSnapshot,
    pub build_dna: Option<PlaystyleVector>,
    pub status: ListingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub moderation_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Admin verdict on a pending listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum ModerationDecision {
    Approve,
    Reject { reason: String },
}

/// Filters applied when browsing approved listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BrowseQuery {
    #[serde(default)]
    pub game: Option<GameTitle>,
    #[serde(default)]
    pub max_price_cents: Option<u32>,
    #[serde(default)]
    pub buyer_id: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}
