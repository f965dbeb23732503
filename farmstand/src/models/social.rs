//! Messages and reviews exchanged between users.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::product::ProductId;
use super::user::UserId;
use crate::define_id_type;

define_id_type!(MessageId);
define_id_type!(ReviewId);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub sender_id: UserId,
    pub receiver_id: UserId,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// True when the message travels between `a` and `b` in either direction.
    pub fn is_between(&self, a: &UserId, b: &UserId) -> bool {
        (&self.sender_id == a && &self.receiver_id == b)
            || (&self.sender_id == b && &self.receiver_id == a)
    }

    pub fn involves(&self, user: &UserId) -> bool {
        &self.sender_id == user || &self.receiver_id == user
    }
}

/// Star rating, 1 to 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Rating(stars))
    }

    pub fn stars(&self) -> u8 {
        self.0
    }
}

impl Default for Rating {
    fn default() -> Self {
        Rating(Self::MAX)
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating must be 1-5, got {}", value))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: ReviewId,
    pub producer_id: UserId,
    /// Set when the review is about a specific listing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub user_id: UserId,
    pub user_name: String,
    pub rating: Rating,
    pub comment: String,
    pub timestamp: DateTime<Utc>,
}
