//! Review aggregation for producer and product pages.

use serde::Serialize;

use crate::models::{ProductId, Review, UserId};

/// Mean star rating over a set of reviews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RatingSummary {
    /// 0.0 when there are no reviews.
    pub average: f64,
    pub count: usize,
}

impl RatingSummary {
    pub fn from_reviews<'a>(reviews: impl IntoIterator<Item = &'a Review>) -> Self {
        let (total, count) = reviews
            .into_iter()
            .fold((0u32, 0usize), |(total, count), r| {
                (total + u32::from(r.rating.stars()), count + 1)
            });

        if count == 0 {
            return Self::default();
        }

        Self {
            average: f64::from(total) / count as f64,
            count,
        }
    }

    pub fn has_reviews(&self) -> bool {
        self.count > 0
    }
}

/// Every review left for a producer, including product-specific ones.
pub fn producer_rating(reviews: &[Review], producer_id: &UserId) -> RatingSummary {
    RatingSummary::from_reviews(reviews.iter().filter(|r| &r.producer_id == producer_id))
}

/// Reviews linked to one listing.
pub fn product_rating(reviews: &[Review], product_id: &ProductId) -> RatingSummary {
    RatingSummary::from_reviews(
        reviews
            .iter()
            .filter(|r| r.product_id.as_ref() == Some(product_id)),
    )
}
