//! Playstyle profiles and the buyer/build compatibility scorer.
//!
//! Buyers answer eight onboarding questions; sellers attach the same eight answers to each
//! listing as its "Build DNA". The scorer compares the two position by position.

mod compatibility;
mod dimensions;
mod vector;

pub use compatibility::{score, CompatibilityResult, MatchLabel};
pub use dimensions::{PlaystyleDimension, DIMENSIONS, DIMENSION_COUNT};
pub use vector::{PlaystyleVector, PlaystyleVectorError, MAX_RATING, MIN_RATING};
