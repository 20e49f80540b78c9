use serde::{Deserialize, Serialize};

use super::dimensions::{DIMENSIONS, DIMENSION_COUNT};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 10;

/// Validated eight-dimension playstyle profile with every rating in `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<i64>", into = "Vec<i64>")]
pub struct PlaystyleVector([u8; DIMENSION_COUNT]);

impl PlaystyleVector {
    pub fn new(ratings: [u8; DIMENSION_COUNT]) -> Result<Self, PlaystyleVectorError> {
        for (index, rating) in ratings.iter().enumerate() {
            if !(MIN_RATING..=MAX_RATING).contains(rating) {
                return Err(PlaystyleVectorError::OutOfRange {
                    dimension: DIMENSIONS[index].key,
                    value: i64::from(*rating),
                });
            }
        }
        Ok(Self(ratings))
    }

    /// Profile with every rating at the same value, clamped into range.
    pub fn uniform(rating: u8) -> Self {
        Self([rating.clamp(MIN_RATING, MAX_RATING); DIMENSION_COUNT])
    }

    pub fn ratings(&self) -> [u8; DIMENSION_COUNT] {
        self.0
    }

    /// Widened copy in the shape the scorer consumes.
    pub fn to_scores(&self) -> [i32; DIMENSION_COUNT] {
        self.0.map(i32::from)
    }
}

impl TryFrom<Vec<i64>> for PlaystyleVector {
    type Error = PlaystyleVectorError;

    fn try_from(values: Vec<i64>) -> Result<Self, Self::Error> {
        if values.len() != DIMENSION_COUNT {
            return Err(PlaystyleVectorError::WrongLength(values.len()));
        }

        let mut ratings = [0u8; DIMENSION_COUNT];
        for (index, value) in values.into_iter().enumerate() {
            ratings[index] = u8::try_from(value)
                .ok()
                .filter(|rating| (MIN_RATING..=MAX_RATING).contains(rating))
                .ok_or(PlaystyleVectorError::OutOfRange {
                    dimension: DIMENSIONS[index].key,
                    value,
                })?;
        }
        Ok(Self(ratings))
    }
}

impl From<PlaystyleVector> for Vec<i64> {
    fn from(vector: PlaystyleVector) -> Self {
        vector.0.iter().map(|rating| i64::from(*rating)).collect()
    }
}

impl std::str::FromStr for PlaystyleVector {
    type Err = PlaystyleVectorError;

    /// Accepts ratings separated by commas, dashes, or whitespace (`5,7,3,...` or `5-7-3-...`).
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let values = raw
            .split(|c: char| c == ',' || c == '-' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .map(|part| {
                part.parse::<i64>()
                    .map_err(|_| PlaystyleVectorError::NotANumber(part.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(values)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlaystyleVectorError {
    #[error("playstyle must have exactly 8 ratings (found {0})")]
    WrongLength(usize),
    #[error("{dimension} rating must be between 1 and 10 (found {value})")]
    OutOfRange { dimension: &'static str, value: i64 },
    #[error("'{0}' is not a whole number")]
    NotANumber(String),
}
