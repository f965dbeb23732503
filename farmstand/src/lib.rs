//! # Farmstand
//!
//! Core of a local-food marketplace: producers list seasonal products with
//! the dates they are on offer, and consumers browse them by text, by date
//! range, or on a producer's month calendar.
//!
//! ## Architecture
//!
//! - [`models`]: listings, users, messages, reviews and calendar dates
//! - [`services`]: the availability matcher and the other domain rules
//! - [`forms`]: validation of raw form input into domain values
//! - [`db`]: repository traits, the in-memory store, seed data and the
//!   service layer
//! - [`config`]: `farmstand.toml` and environment overrides
//!
//! ## Availability matching
//!
//! A listing declares an inclusive `[from, until]` window of calendar days.
//! A query range matches when the two closed intervals overlap. Listings
//! without a complete window are answered by a [`models::MissingBoundPolicy`]
//! chosen by the caller.
//!
//! ```
//! use farmstand::models::{parse_calendar_date, Availability, QueryRange};
//! use farmstand::services::AvailabilityMatcher;
//!
//! let tomatoes = Availability::window(
//!     parse_calendar_date("2024-06-01").unwrap(),
//!     parse_calendar_date("2024-08-30").unwrap(),
//! );
//! let range = QueryRange::parse("2024-07-15", None).unwrap();
//! assert!(AvailabilityMatcher::strict().overlaps(&tomatoes, &range));
//! ```

// RepositoryError carries an ErrorContext
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod forms;
pub mod models;
pub mod services;
