//! Domain logic over already-validated values.
//!
//! Everything here is synchronous and store-agnostic except the content
//! port; [`crate::db::services`] wires these rules to a repository.

pub mod approval;
pub mod availability;
pub mod calendar;
pub mod catalog;
pub mod content;
pub mod messaging;
pub mod ratings;
pub mod reviews;

pub use approval::{ApprovalError, Decision};
pub use availability::{AvailabilityMatcher, HasAvailability};
pub use calendar::{DayCell, MonthGrid};
pub use catalog::{query_products, ProductQuery, SortOption};
pub use content::{CannedContent, ContentGenerator, RecipeSuggestion, ResilientContent};
pub use messaging::MessagingError;
pub use ratings::RatingSummary;
pub use reviews::ReviewError;
