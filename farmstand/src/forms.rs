//! Raw form input and its validation.
//!
//! Everything typed by a user arrives here as strings. Validation turns it
//! into domain values, so the matcher and the service layer only ever see
//! parsed dates and well-formed ranges.

use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::{
    parse_calendar_date, Availability, AvailabilityError, DateError, Product, ProductId,
    QueryRange, UserId, PLACEHOLDER_IMAGE_URL,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FormError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    #[error("Invalid price '{0}': must be a non-negative number")]
    InvalidPrice(String),

    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Range(#[from] AvailabilityError),
}

fn blank_to_none(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

fn required(value: &str, field: &'static str) -> Result<String, FormError> {
    blank_to_none(value)
        .map(str::to_string)
        .ok_or(FormError::MissingField(field))
}

fn optional_date(value: &str) -> Result<Option<NaiveDate>, DateError> {
    blank_to_none(value).map(parse_calendar_date).transpose()
}

/// A producer's availability window as typed into a form.
///
/// Either side may be left blank; the listing is then shown without a
/// window. An inverted window is accepted but logged, since it will never
/// match a query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityForm {
    #[serde(default)]
    pub available_from: String,
    #[serde(default)]
    pub available_until: String,
}

impl AvailabilityForm {
    pub fn new(available_from: impl Into<String>, available_until: impl Into<String>) -> Self {
        Self {
            available_from: available_from.into(),
            available_until: available_until.into(),
        }
    }

    pub fn validate(&self) -> Result<Availability, FormError> {
        let from = optional_date(&self.available_from)?;
        let until = optional_date(&self.available_until)?;
        let availability = Availability::from_bounds(from, until);

        if let Some(window) = availability.as_window() {
            if window.is_inverted() {
                warn!(
                    "Availability window {} ends before it starts; it will never match",
                    window
                );
            }
        }
        Ok(availability)
    }
}

/// The "add product" form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProductForm {
    pub name: String,
    pub category: String,
    pub price: String,
    pub unit: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(flatten)]
    pub availability: AvailabilityForm,
}

impl NewProductForm {
    /// Validate the form into a listing owned by `producer_id`.
    ///
    /// A fresh ID is generated, a missing image gets the placeholder and the
    /// listing starts in stock.
    pub fn validate(&self, producer_id: &UserId) -> Result<Product, FormError> {
        let name = required(&self.name, "name")?;
        let category = required(&self.category, "category")?;
        let unit = required(&self.unit, "unit")?;
        let raw_price = required(&self.price, "price")?;
        let price = raw_price
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite() && *p >= 0.0)
            .ok_or(FormError::InvalidPrice(raw_price))?;

        let image_url = blank_to_none(&self.image_url)
            .unwrap_or(PLACEHOLDER_IMAGE_URL)
            .to_string();

        Ok(Product {
            id: ProductId::generate(),
            producer_id: producer_id.clone(),
            name,
            description: self.description.trim().to_string(),
            price,
            unit,
            category,
            image_url,
            in_stock: true,
            harvest_date: None,
            organic: None,
            availability: self.availability.validate()?,
        })
    }
}

/// The consumer's "available between" filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityFilterForm {
    #[serde(default)]
    pub start: String,
    #[serde(default)]
    pub end: String,
}

impl AvailabilityFilterForm {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `None` when neither date was picked (no filtering). A blank end
    /// means a single-day query; an end without a start is rejected.
    pub fn to_query(&self) -> Result<Option<QueryRange>, FormError> {
        match (blank_to_none(&self.start), blank_to_none(&self.end)) {
            (Some(start), end) => Ok(Some(QueryRange::parse(start, end)?)),
            (None, Some(_)) => Err(FormError::MissingField("start")),
            (None, None) => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tomatoes() -> NewProductForm {
        NewProductForm {
            name: " Heirloom Tomatoes ".to_string(),
            category: "Vegetables".to_string(),
            price: "4.50".to_string(),
            unit: "lb".to_string(),
            description: String::new(),
            image_url: String::new(),
            availability: AvailabilityForm::new("2024-06-01", "2024-08-30"),
        }
    }

    #[test]
    fn test_valid_form_builds_product() {
        let product = tomatoes().validate(&UserId::from("u1")).unwrap();
        assert_eq!(product.name, "Heirloom Tomatoes");
        assert_eq!(product.price, 4.5);
        assert_eq!(product.image_url, PLACEHOLDER_IMAGE_URL);
        assert!(product.in_stock);
        assert!(product.availability.as_window().is_some());
    }

    #[test]
    fn test_missing_name_and_bad_price() {
        let mut form = tomatoes();
        form.name = "   ".to_string();
        assert_eq!(
            form.validate(&UserId::from("u1")),
            Err(FormError::MissingField("name"))
        );

        let mut form = tomatoes();
        form.price = "-1".to_string();
        assert_eq!(
            form.validate(&UserId::from("u1")),
            Err(FormError::InvalidPrice("-1".to_string()))
        );
    }

    #[test]
    fn test_impossible_date_rejected() {
        let form = AvailabilityForm::new("2023-02-30", "");
        assert!(matches!(form.validate(), Err(FormError::Date(_))));
    }

    #[test]
    fn test_blank_bounds_give_unknown_availability() {
        let availability = AvailabilityForm::new("2024-06-01", " ").validate().unwrap();
        assert!(availability.as_window().is_none());
        assert!(availability.starts_on().is_some());
    }

    #[test]
    fn test_inverted_window_is_kept() {
        let availability = AvailabilityForm::new("2024-08-30", "2024-06-01")
            .validate()
            .unwrap();
        assert!(availability.as_window().unwrap().is_inverted());
    }

    #[test]
    fn test_filter_form() {
        assert_eq!(AvailabilityFilterForm::default().to_query(), Ok(None));

        let single = AvailabilityFilterForm::new("2024-07-15", "")
            .to_query()
            .unwrap()
            .unwrap();
        assert!(single.is_single_day());

        let inverted = AvailabilityFilterForm::new("2024-08-01", "2024-07-01").to_query();
        assert!(matches!(
            inverted,
            Err(FormError::Range(AvailabilityError::InvalidRange { .. }))
        ));

        let bad_day = AvailabilityFilterForm::new("2024-02-30", "").to_query();
        assert!(matches!(
            bad_day,
            Err(FormError::Range(AvailabilityError::Date(_)))
        ));
    }

    #[test]
    fn test_filter_end_without_start_rejected() {
        assert_eq!(
            AvailabilityFilterForm::new("", "2023-07-01").to_query(),
            Err(FormError::MissingField("start"))
        );
        assert_eq!(AvailabilityFilterForm::new("  ", "  ").to_query(), Ok(None));
    }
}
