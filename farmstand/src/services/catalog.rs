//! Marketplace listing queries: text search, availability filter, sorting.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{MissingBoundPolicy, Product, QueryRange};

use super::availability::AvailabilityMatcher;

/// Ordering of the product grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    PriceAsc,
    PriceDesc,
    Name,
    /// Newest `availableFrom` first; listings without one go last.
    #[default]
    Date,
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortOption::PriceAsc => "price_asc",
            SortOption::PriceDesc => "price_desc",
            SortOption::Name => "name",
            SortOption::Date => "date",
        };
        f.write_str(s)
    }
}

impl FromStr for SortOption {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "price_asc" => Ok(SortOption::PriceAsc),
            "price_desc" => Ok(SortOption::PriceDesc),
            "name" => Ok(SortOption::Name),
            "date" => Ok(SortOption::Date),
            other => Err(format!(
                "Invalid sort option: {}. Must be 'price_asc', 'price_desc', 'name' or 'date'",
                other
            )),
        }
    }
}

/// What a consumer asked the product grid for.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductQuery {
    /// Case-insensitive substring of the name or category. Empty matches all.
    pub search: String,
    /// Only listings overlapping this range, when set.
    pub available: Option<QueryRange>,
    pub policy: MissingBoundPolicy,
    pub sort: SortOption,
}

impl ProductQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn available_during(mut self, range: QueryRange) -> Self {
        self.available = Some(range);
        self
    }

    pub fn with_policy(mut self, policy: MissingBoundPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn sorted_by(mut self, sort: SortOption) -> Self {
        self.sort = sort;
        self
    }
}

/// Does the product's name or category contain `search`?
pub fn matches_search(product: &Product, search: &str) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty()
        || product.name.to_lowercase().contains(&needle)
        || product.category.to_lowercase().contains(&needle)
}

fn compare(a: &Product, b: &Product, sort: SortOption) -> Ordering {
    match sort {
        SortOption::PriceAsc => a.price.total_cmp(&b.price),
        SortOption::PriceDesc => b.price.total_cmp(&a.price),
        SortOption::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
        // Option orders None first, so reversing puts the undated last
        SortOption::Date => b
            .availability
            .starts_on()
            .cmp(&a.availability.starts_on()),
    }
}

/// Stable sort of `products` by `sort`.
pub fn sort_products(products: &mut [&Product], sort: SortOption) {
    products.sort_by(|a, b| compare(a, b, sort));
}

/// Apply a full query to the catalog.
pub fn query_products<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
    let matcher = AvailabilityMatcher::new(query.policy);

    let mut selected: Vec<&Product> = products
        .iter()
        .filter(|p| matches_search(p, &query.search))
        .filter(|p| match &query.available {
            Some(range) => matcher.overlaps(*p, range),
            None => true,
        })
        .collect();

    sort_products(&mut selected, query.sort);
    selected
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod catalog_tests;
