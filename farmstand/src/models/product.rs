//! Catalog listings.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::availability::Availability;
use super::date::serde_optional_calendar_date;
use super::user::UserId;
use crate::define_id_type;

define_id_type!(ProductId);

/// A listing offered by a producer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub producer_id: UserId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub unit: String,
    pub category: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
    #[serde(
        default,
        with = "serde_optional_calendar_date",
        skip_serializing_if = "Option::is_none"
    )]
    pub harvest_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organic: Option<bool>,
    /// Serialized as the flat `availableFrom` / `availableUntil` pair.
    #[serde(flatten)]
    pub availability: Availability,
}

fn default_in_stock() -> bool {
    true
}

/// Image shown when a producer did not upload one.
pub const PLACEHOLDER_IMAGE_URL: &str =
    "https://images.unsplash.com/photo-1615485500704-8e99099928b3?w=400&h=300&fit=crop";

/// Pounds per selling unit for the units the marketplace knows about.
/// Most entries other than the mass units are rough produce averages.
const UNIT_TO_LBS: &[(&str, f64)] = &[
    ("lb", 1.0),
    ("oz", 0.0625),
    ("kg", 2.20462),
    ("g", 0.00220462),
    ("bunch", 0.5),
    ("piece", 0.4),
    ("box", 5.0),
    ("dozen", 2.0),
    ("pint", 0.75),
    ("quart", 2.0),
];

/// Pounds in one `unit`, if the unit is known.
pub fn pounds_per_unit(unit: &str) -> Option<f64> {
    UNIT_TO_LBS
        .iter()
        .find(|(name, _)| *name == unit)
        .map(|(_, factor)| *factor)
}

impl Product {
    /// Price normalised to dollars per pound, rounded to cents.
    ///
    /// `None` for products already sold by the pound and for unknown units.
    pub fn price_per_lb(&self) -> Option<f64> {
        if self.unit == "lb" {
            return None;
        }
        let factor = pounds_per_unit(&self.unit)?;
        Some((self.price / factor * 100.0).round() / 100.0)
    }
}
