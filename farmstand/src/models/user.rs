//! Marketplace participants and their approval state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::define_id_type;

define_id_type!(UserId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Consumer,
    Producer,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UserRole::Consumer => "consumer",
            UserRole::Producer => "producer",
            UserRole::Admin => "admin",
        };
        f.write_str(s)
    }
}

/// Where an account is in the admin approval workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    /// City or postcode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    pub status: UserStatus,
    #[serde(default)]
    pub is_verified: bool,
}

impl User {
    pub fn is_producer(&self) -> bool {
        self.role == UserRole::Producer
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Approved producer, allowed to list products.
    pub fn can_sell(&self) -> bool {
        self.is_producer() && self.status == UserStatus::Approved
    }
}
