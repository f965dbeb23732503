//! Catalog snapshots used to seed a store.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult};
use crate::models::{Message, Product, Review, User};

/// Demo marketplace bundled with the crate.
const DEMO_CATALOG: &str = include_str!("../../data/demo_catalog.json");

/// Every entity of a marketplace, as stored in a JSON seed file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub messages: Vec<Message>,
    /// Newest first.
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl CatalogSnapshot {
    /// Parse a snapshot from a JSON string.
    pub fn from_json_str(json: &str) -> RepositoryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> RepositoryResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            RepositoryError::ConfigurationError {
                message: format!("Failed to read seed file: {}", e),
                context: ErrorContext::new("load_snapshot").with_details(path.display().to_string()),
            }
        })?;

        let snapshot = Self::from_json_str(&content).map_err(|e| e.with_operation("load_snapshot"))?;
        info!(
            "Loaded seed catalog from {}: {} products, {} users",
            path.display(),
            snapshot.products.len(),
            snapshot.users.len()
        );
        Ok(snapshot)
    }

    pub fn to_json_pretty(&self) -> RepositoryResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The bundled demo marketplace: two producers (one pending), a consumer,
/// an admin, three listings with 2023 windows, a short conversation and
/// three reviews.
pub fn demo_snapshot() -> RepositoryResult<CatalogSnapshot> {
    CatalogSnapshot::from_json_str(DEMO_CATALOG).map_err(|e| e.with_operation("demo_snapshot"))
}
