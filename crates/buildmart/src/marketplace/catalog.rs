//! Seller catalog spreadsheets (CSV) converted into listing submissions.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use super::domain::{
    Archetype, BuildAttributes, BuildSubmission, GameTitle, PerformanceSnapshot, Position,
};
use crate::playstyle::{self, CompatibilityResult, PlaystyleVector};

/// Parsed catalog row. `row` is 1-based and excludes the header line.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub row: usize,
    pub submission: BuildSubmission,
}

/// Catalog row scored against one buyer profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub row: usize,
    pub title: String,
    pub price_cents: u32,
    pub compatibility: CompatibilityResult,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read catalog: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed catalog: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {reason}")]
    InvalidRow { row: usize, reason: String },
}

pub fn read_catalog_path(path: impl AsRef<Path>) -> Result<Vec<CatalogEntry>, CatalogError> {
    let file = std::fs::File::open(path)?;
    read_catalog(file)
}

pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut entries = Vec::new();

    for (index, record) in csv_reader.deserialize::<CatalogRow>().enumerate() {
        let row = index + 1;
        let parsed = record.map_err(|err| row_error(row, err))?;
        let submission = parsed
            .into_submission()
            .map_err(|reason| CatalogError::InvalidRow { row, reason })?;
        entries.push(CatalogEntry { row, submission });
    }

    Ok(entries)
}

/// Score every row for `buyer`, best fit first. Ties keep catalog order.
pub fn rank_catalog(entries: &[CatalogEntry], buyer: &PlaystyleVector) -> Vec<RankedEntry> {
    let buyer = buyer.to_scores();
    let mut ranked: Vec<RankedEntry> = entries
        .iter()
        .map(|entry| {
            let build = entry.submission.build_dna.map(|dna| dna.to_scores());
            RankedEntry {
                row: entry.row,
                title: entry.submission.title.clone(),
                price_cents: entry.submission.price_cents,
                compatibility: playstyle::score(
                    Some(buyer.as_slice()),
                    build.as_ref().map(|ratings| ratings.as_slice()),
                    entry.submission.performance.shooting,
                ),
            }
        })
        .collect();
    ranked.sort_by(|a, b| b.compatibility.score.cmp(&a.compatibility.score));
    ranked
}

#[derive(Debug, Deserialize)]
struct CatalogRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Game")]
    game: String,
    #[serde(rename = "Price")]
    price: String,
    #[serde(rename = "Archetype")]
    archetype: String,
    #[serde(rename = "Position")]
    position: String,
    #[serde(rename = "Height")]
    height: u8,
    #[serde(rename = "Overall")]
    overall: u8,
    #[serde(rename = "Shooting", default, deserialize_with = "empty_as_none")]
    shooting: Option<f64>,
    #[serde(rename = "Speed", default, deserialize_with = "empty_as_none")]
    speed: Option<f64>,
    #[serde(rename = "Defense", default, deserialize_with = "empty_as_none")]
    defense: Option<f64>,
    #[serde(rename = "Playmaking", default, deserialize_with = "empty_as_none")]
    playmaking: Option<f64>,
    #[serde(rename = "Athleticism", default, deserialize_with = "empty_as_none")]
    athleticism: Option<f64>,
    #[serde(rename = "DNA", default)]
    dna: Option<String>,
}

impl CatalogRow {
    fn into_submission(self) -> Result<BuildSubmission, String> {
        let game =
            GameTitle::parse(&self.game).ok_or_else(|| format!("unknown game '{}'", self.game))?;
        let archetype = Archetype::parse(&self.archetype)
            .ok_or_else(|| format!("unknown archetype '{}'", self.archetype))?;
        let position = Position::parse(&self.position)
            .ok_or_else(|| format!("unknown position '{}'", self.position))?;
        let price_cents = parse_price_cents(&self.price)
            .ok_or_else(|| format!("price '{}' is not a dollar amount", self.price))?;
        let build_dna = match self.dna.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<PlaystyleVector>()
                    .map_err(|err| format!("DNA '{raw}': {err}"))?,
            ),
        };

        Ok(BuildSubmission {
            title: self.title,
            description: String::new(),
            game,
            price_cents,
            attributes: BuildAttributes {
                archetype,
                position,
                height_inches: self.height,
                overall_rating: self.overall,
                badges: Vec::new(),
            },
            performance: PerformanceSnapshot {
                shooting: self.shooting,
                speed: self.speed,
                defense: self.defense,
                playmaking: self.playmaking,
                athleticism: self.athleticism,
            },
            build_dna,
        })
    }
}

/// Cell-level problems are reported against the row; only reader failures stay `Csv`.
fn row_error(row: usize, err: csv::Error) -> CatalogError {
    if err.is_io_error() {
        return CatalogError::Csv(err);
    }
    let reason = match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => match err.field() {
            Some(field) => format!("column {}: {}", field + 1, err.kind()),
            None => err.kind().to_string(),
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => format!("expected {expected_len} columns, found {len}"),
        _ => err.to_string(),
    };
    CatalogError::InvalidRow { row, reason }
}

/// "$12.99", "12.99", and "12" are all accepted.
pub(super) fn parse_price_cents(raw: &str) -> Option<u32> {
    let trimmed = raw.trim().trim_start_matches('$');
    let (dollars, cents) = match trimmed.split_once('.') {
        Some((dollars, cents)) => (dollars, cents),
        None => (trimmed, "0"),
    };
    if cents.is_empty() || cents.len() > 2 || !cents.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let dollars: u32 = dollars.parse().ok()?;
    let cents: u32 = if cents.len() == 1 {
        cents.parse::<u32>().ok()? * 10
    } else {
        cents.parse().ok()?
    };
    dollars.checked_mul(100)?.checked_add(cents)
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .trim_end_matches('%')
            .parse::<f64>()
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
