use super::domain::BuildSubmission;
use crate::config::MarketplaceConfig;

const MAX_TITLE_CHARS: usize = 120;
const MAX_DESCRIPTION_CHARS: usize = 2000;
const MAX_BADGES: usize = 40;
const HEIGHT_RANGE_INCHES: (u8, u8) = (60, 96);
const OVERALL_RANGE: (u8, u8) = (40, 99);

/// Validation errors raised before a listing reaches storage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListingViolation {
    #[error("title is required")]
    MissingTitle,
    #[error("title exceeds {max} characters")]
    TitleTooLong { max: usize },
    #[error("description exceeds {max} characters")]
    DescriptionTooLong { max: usize },
    #[error("price must be between {min} and {max} cents (found {found})")]
    PriceOutOfRange { min: u32, max: u32, found: u32 },
    #[error("height must be between {min} and {max} inches (found {found})")]
    HeightOutOfRange { min: u8, max: u8, found: u8 },
    #[error("overall rating must be between {min} and {max} (found {found})")]
    OverallOutOfRange { min: u8, max: u8, found: u8 },
    #[error("at most {max} badges may be listed")]
    TooManyBadges { max: usize },
    #[error("{field} performance must be a percentage between 0 and 100 (found {found})")]
    PerformanceOutOfRange { field: &'static str, found: f64 },
}

/// Guard responsible for normalizing seller submissions.
#[derive(Debug, Clone)]
pub struct ListingGuard {
    min_price_cents: u32,
    max_price_cents: u32,
}

impl Default for ListingGuard {
    fn default() -> Self {
        Self::from_config(&MarketplaceConfig::default())
    }
}

impl ListingGuard {
    pub fn from_config(config: &MarketplaceConfig) -> Self {
        Self {
            min_price_cents: config.min_price_cents,
            max_price_cents: config.max_price_cents,
        }
    }

    /// Trim free text and reject submissions that cannot be listed.
    pub fn sanitize(
        &self,
        mut submission: BuildSubmission,
    ) -> Result<BuildSubmission, ListingViolation> {
        submission.title = submission.title.trim().to_string();
        submission.description = submission.description.trim().to_string();

        if submission.title.is_empty() {
            return Err(ListingViolation::MissingTitle);
        }
        if submission.title.chars().count() > MAX_TITLE_CHARS {
            return Err(ListingViolation::TitleTooLong {
                max: MAX_TITLE_CHARS,
            });
        }
        if submission.description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(ListingViolation::DescriptionTooLong {
                max: MAX_DESCRIPTION_CHARS,
            });
        }

        if !(self.min_price_cents..=self.max_price_cents).contains(&submission.price_cents) {
            return Err(ListingViolation::PriceOutOfRange {
                min: self.min_price_cents,
                max: self.max_price_cents,
                found: submission.price_cents,
            });
        }

        let attributes = &mut submission.attributes;
        let (min_height, max_height) = HEIGHT_RANGE_INCHES;
        if !(min_height..=max_height).contains(&attributes.height_inches) {
            return Err(ListingViolation::HeightOutOfRange {
                min: min_height,
                max: max_height,
                found: attributes.height_inches,
            });
        }
        let (min_overall, max_overall) = OVERALL_RANGE;
        if !(min_overall..=max_overall).contains(&attributes.overall_rating) {
            return Err(ListingViolation::OverallOutOfRange {
                min: min_overall,
                max: max_overall,
                found: attributes.overall_rating,
            });
        }

        attributes.badges = attributes
            .badges
            .iter()
            .map(|badge| badge.trim().to_string())
            .filter(|badge| !badge.is_empty())
            .collect();
        if attributes.badges.len() > MAX_BADGES {
            return Err(ListingViolation::TooManyBadges { max: MAX_BADGES });
        }

        for (field, value) in submission.performance.fields() {
            if let Some(found) = value {
                if !found.is_finite() || !(0.0..=100.0).contains(&found) {
                    return Err(ListingViolation::PerformanceOutOfRange { field, found });
                }
            }
        }

        Ok(submission)
    }
}
