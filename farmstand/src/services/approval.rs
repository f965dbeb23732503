//! Admin approval of new accounts.
//!
//! ```text
//!            approve
//!   PENDING ─────────▶ APPROVED (verified)
//!      │
//!      └────reject───▶ REJECTED (unverified)
//! ```
//!
//! Only pending accounts can be decided and only admins can decide them.

use serde::{Deserialize, Serialize};

use crate::models::{User, UserId, UserRole, UserStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    #[error("User {0} is not an admin")]
    NotAdmin(UserId),

    #[error("User {user_id} is not pending approval (status {status:?})")]
    NotPending { user_id: UserId, status: UserStatus },
}

/// Apply an admin's decision to a pending account, returning the updated
/// account.
pub fn decide(admin: &User, applicant: &User, decision: Decision) -> Result<User, ApprovalError> {
    if !admin.is_admin() {
        return Err(ApprovalError::NotAdmin(admin.id.clone()));
    }
    if applicant.status != UserStatus::Pending {
        return Err(ApprovalError::NotPending {
            user_id: applicant.id.clone(),
            status: applicant.status,
        });
    }

    let mut updated = applicant.clone();
    match decision {
        Decision::Approve => {
            updated.status = UserStatus::Approved;
            updated.is_verified = true;
        }
        Decision::Reject => {
            updated.status = UserStatus::Rejected;
            updated.is_verified = false;
        }
    }
    Ok(updated)
}

/// Accounts waiting for an admin, in input order.
pub fn pending_applications(users: &[User]) -> Vec<&User> {
    users
        .iter()
        .filter(|u| u.status == UserStatus::Pending)
        .collect()
}

/// Producers currently allowed to sell.
pub fn approved_producer_count(users: &[User]) -> usize {
    users
        .iter()
        .filter(|u| u.role == UserRole::Producer && u.status == UserStatus::Approved)
        .count()
}
