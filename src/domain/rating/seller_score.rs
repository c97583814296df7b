//! Seller score aggregation.
//!
//! The seller's profile carries a denormalized mean rating and count.
//! Both are always the full recomputation over every rating on record;
//! incremental updates are never applied, so concurrent submissions
//! cannot make the stored score drift from the ratings themselves.

use serde::{Deserialize, Serialize};

use super::Stars;

/// Denormalized rating summary embedded in a seller's user record.
///
/// `rating` is the mean of all star values rounded to one decimal place,
/// or `0.0` when the seller has no ratings yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerScore {
    rating: f64,
    rating_count: u32,
}

impl SellerScore {
    /// Computes the score from the full set of a seller's star values.
    ///
    /// Rounds half away from zero to the nearest tenth, matching
    /// `round(mean * 10) / 10`.
    pub fn compute(stars: &[Stars]) -> Self {
        if stars.is_empty() {
            return Self {
                rating: 0.0,
                rating_count: 0,
            };
        }

        let total: u32 = stars.iter().map(|s| s.value() as u32).sum();
        let mean = total as f64 / stars.len() as f64;

        Self {
            rating: (mean * 10.0).round() / 10.0,
            rating_count: stars.len() as u32,
        }
    }

    /// Creates a score from already-persisted values.
    pub fn from_parts(rating: f64, rating_count: u32) -> Self {
        Self {
            rating,
            rating_count,
        }
    }

    /// Returns the mean rating, rounded to one decimal place.
    pub fn rating(&self) -> f64 {
        self.rating
    }

    /// Returns the number of ratings behind the mean.
    pub fn rating_count(&self) -> u32 {
        self.rating_count
    }
}

impl Default for SellerScore {
    fn default() -> Self {
        Self {
            rating: 0.0,
            rating_count: 0,
        }
    }
}

/// Per-star breakdown of a seller's ratings, for profile display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    /// Mean rating, rounded to one decimal place.
    pub average: f64,
    /// Total number of ratings.
    pub total: u32,
    /// Count of ratings per star value; index 0 holds 1-star counts.
    pub breakdown: [u32; 5],
}

impl RatingStats {
    /// Computes display statistics from the full set of star values.
    pub fn compute(stars: &[Stars]) -> Self {
        let mut breakdown = [0u32; 5];
        for s in stars {
            breakdown[(s.value() - 1) as usize] += 1;
        }

        let score = SellerScore::compute(stars);
        Self {
            average: score.rating(),
            total: score.rating_count(),
            breakdown,
        }
    }
}
