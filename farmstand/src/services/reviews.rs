//! Writing reviews for producers and their listings.

use chrono::{DateTime, Utc};

use crate::models::{Product, ProductId, Rating, Review, ReviewId, User, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReviewError {
    #[error("Review comment is empty")]
    EmptyComment,

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("User {0} is not a producer")]
    NotAProducer(UserId),

    #[error("Product {product_id} does not belong to producer {producer_id}")]
    ForeignProduct {
        product_id: ProductId,
        producer_id: UserId,
    },
}

/// Build a review of `producer`, optionally about one of its `product`s.
pub fn compose(
    author: &User,
    producer: &User,
    product: Option<&Product>,
    stars: u8,
    comment: &str,
    now: DateTime<Utc>,
) -> Result<Review, ReviewError> {
    if comment.trim().is_empty() {
        return Err(ReviewError::EmptyComment);
    }
    let rating = Rating::new(stars).ok_or(ReviewError::InvalidRating(stars))?;
    if !producer.is_producer() {
        return Err(ReviewError::NotAProducer(producer.id.clone()));
    }
    if let Some(p) = product {
        if p.producer_id != producer.id {
            return Err(ReviewError::ForeignProduct {
                product_id: p.id.clone(),
                producer_id: producer.id.clone(),
            });
        }
    }

    Ok(Review {
        id: ReviewId::generate(),
        producer_id: producer.id.clone(),
        product_id: product.map(|p| p.id.clone()),
        user_id: author.id.clone(),
        user_name: author.name.clone(),
        rating,
        comment: comment.trim().to_string(),
        timestamp: now,
    })
}
