use serde::{Deserialize, Serialize};

use super::dimensions::{DIMENSIONS, DIMENSION_COUNT};
use super::vector::{MAX_RATING, MIN_RATING};

const MAX_STRENGTHS: usize = 3;
const MAX_WEAKNESSES: usize = 2;
const STRENGTH_THRESHOLD: f64 = 75.0;
const WEAKNESS_THRESHOLD: f64 = 45.0;
const MAX_DIFF: f64 = (MAX_RATING - MIN_RATING) as f64;

const BASE_BOOST_SPAN: f64 = 25.0;
const PERFORMANCE_WEIGHT: f64 = 0.3;
const NEUTRAL_SHOOTING: f64 = 50.0;
const MIN_WIN_BOOST: f64 = -15.0;
const MAX_WIN_BOOST: f64 = 30.0;

const FALLBACK_SCORE: u8 = 70;
const FALLBACK_WIN_BOOST: i32 = 5;

/// Qualitative band for a compatibility score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchLabel {
    #[serde(rename = "Perfect Match")]
    Perfect,
    #[serde(rename = "Great Match")]
    Great,
    #[serde(rename = "Good Match")]
    Good,
    #[serde(rename = "Moderate Match")]
    Moderate,
    #[serde(rename = "Poor Match")]
    Poor,
}

impl MatchLabel {
    /// Bands are inclusive on their lower bound.
    pub const fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::Perfect,
            75..=89 => Self::Great,
            60..=74 => Self::Good,
            45..=59 => Self::Moderate,
            _ => Self::Poor,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Perfect => "Perfect Match",
            Self::Great => "Great Match",
            Self::Good => "Good Match",
            Self::Moderate => "Moderate Match",
            Self::Poor => "Poor Match",
        }
    }
}

impl std::fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// How well a build fits a buyer, with the explanations shown next to a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityResult {
    pub score: u8,
    pub label: MatchLabel,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub predicted_win_boost: i32,
}

impl CompatibilityResult {
    /// Neutral result used whenever either side has no usable playstyle.
    pub fn fallback() -> Self {
        Self {
            score: FALLBACK_SCORE,
            label: MatchLabel::Good,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
            predicted_win_boost: FALLBACK_WIN_BOOST,
        }
    }
}

/// Compare a buyer playstyle with a build's DNA.
///
/// Never fails: a missing vector, a vector that is not exactly eight ratings long, or a rating
/// outside `1..=10` produces [`CompatibilityResult::fallback`]. `shooting` is the build's
/// shooting percentage and defaults to 50 when absent.
pub fn score(
    buyer: Option<&[i32]>,
    build: Option<&[i32]>,
    shooting: Option<f64>,
) -> CompatibilityResult {
    let (Some(buyer), Some(build)) = (usable(buyer), usable(build)) else {
        return CompatibilityResult::fallback();
    };

    let mut total = 0.0;
    let mut strengths = Vec::new();
    let mut weaknesses = Vec::new();

    for (index, dimension) in DIMENSIONS.iter().enumerate() {
        let diff = f64::from((buyer[index] - build[index]).abs());
        let dim_score = (1.0 - diff / MAX_DIFF) * 100.0;
        total += dim_score;

        if dim_score >= STRENGTH_THRESHOLD {
            strengths.push(format!("Fits your {}", dimension.side_for(buyer[index])));
        } else if dim_score < WEAKNESS_THRESHOLD {
            weaknesses.push(format!(
                "Conflicts with your {}",
                dimension.side_for(buyer[index])
            ));
        }
    }
    strengths.truncate(MAX_STRENGTHS);
    weaknesses.truncate(MAX_WEAKNESSES);

    let score = round_half_up(total / DIMENSION_COUNT as f64).clamp(0.0, 100.0) as u8;

    let base_boost = (f64::from(score) - 50.0) * BASE_BOOST_SPAN / 50.0;
    let shooting = shooting
        .filter(|value| value.is_finite())
        .unwrap_or(NEUTRAL_SHOOTING);
    let performance_boost = (shooting - NEUTRAL_SHOOTING) * PERFORMANCE_WEIGHT;
    let predicted_win_boost =
        round_half_up((base_boost + performance_boost).clamp(MIN_WIN_BOOST, MAX_WIN_BOOST)) as i32;

    CompatibilityResult {
        score,
        label: MatchLabel::from_score(score),
        strengths,
        weaknesses,
        predicted_win_boost,
    }
}

fn usable(vector: Option<&[i32]>) -> Option<&[i32]> {
    let range = i32::from(MIN_RATING)..=i32::from(MAX_RATING);
    vector.filter(|ratings| {
        ratings.len() == DIMENSION_COUNT && ratings.iter().all(|rating| range.contains(rating))
    })
}

/// Halves round toward positive infinity, so -2.5 becomes -2.
fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}
