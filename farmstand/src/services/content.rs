//! Generated marketing copy, recipe ideas and search keywords.
//!
//! The generator itself is an external black box reached through
//! [`ContentGenerator`]. [`ResilientContent`] wraps any generator with the
//! fallbacks the marketplace shows when generation fails, so callers never
//! see an error from this layer.

use anyhow::{bail, Result};
use async_trait::async_trait;
use log::warn;
use serde::{Deserialize, Serialize};

/// Copy used when a description can not be generated.
pub const DEFAULT_DESCRIPTION: &str =
    "Fresh, locally sourced produce straight from our farm to your table.";

/// A recipe idea built around some ingredients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeSuggestion {
    pub title: String,
    pub ingredients: Vec<String>,
    pub instructions: String,
}

/// Call-and-response content service.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Short appetising description of a listing.
    async fn describe(&self, name: &str, category: &str) -> Result<String>;

    /// One simple recipe using some of the comma-separated `ingredients`.
    async fn suggest_recipe(&self, ingredients: &str) -> Result<RecipeSuggestion>;

    /// A handful of product keywords or categories matching a free-text query.
    async fn search_keywords(&self, query: &str) -> Result<Vec<String>>;
}

/// Wraps a generator with fixed fallbacks, logging each failure.
#[derive(Debug, Clone)]
pub struct ResilientContent<G> {
    inner: G,
    default_description: String,
}

impl<G: ContentGenerator> ResilientContent<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            default_description: DEFAULT_DESCRIPTION.to_string(),
        }
    }

    pub fn with_default_description(mut self, description: impl Into<String>) -> Self {
        self.default_description = description.into();
        self
    }

    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Generated description, or the default copy when generation fails or
    /// comes back blank.
    pub async fn describe(&self, name: &str, category: &str) -> String {
        match self.inner.describe(name, category).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => self.default_description.clone(),
            Err(e) => {
                warn!("Description generation failed for '{}': {:#}", name, e);
                self.default_description.clone()
            }
        }
    }

    /// Recipe idea, or `None` when generation fails.
    pub async fn suggest_recipe(&self, ingredients: &str) -> Option<RecipeSuggestion> {
        match self.inner.suggest_recipe(ingredients).await {
            Ok(recipe) => Some(recipe),
            Err(e) => {
                warn!("Recipe generation failed: {:#}", e);
                None
            }
        }
    }

    /// Keywords for `query`; falls back to the query itself.
    pub async fn search_keywords(&self, query: &str) -> Vec<String> {
        match self.inner.search_keywords(query).await {
            Ok(keywords) if !keywords.is_empty() => keywords,
            Ok(_) => vec![query.to_string()],
            Err(e) => {
                warn!("Keyword generation failed for '{}': {:#}", query, e);
                vec![query.to_string()]
            }
        }
    }
}

/// Offline generator producing deterministic, template-based content.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedContent;

fn split_ingredients(ingredients: &str) -> Vec<String> {
    ingredients
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ContentGenerator for CannedContent {
    async fn describe(&self, name: &str, category: &str) -> Result<String> {
        if name.trim().is_empty() {
            bail!("product name is required");
        }
        Ok(format!(
            "{} from our fields, picked at peak ripeness. Honest {} grown close to home and full of flavour.",
            name.trim(),
            category.trim().to_lowercase()
        ))
    }

    async fn suggest_recipe(&self, ingredients: &str) -> Result<RecipeSuggestion> {
        let items = split_ingredients(ingredients);
        let Some(first) = items.first() else {
            bail!("no ingredients given");
        };
        Ok(RecipeSuggestion {
            title: format!("Market {} Bowl", first),
            instructions: format!(
                "Wash and chop the {}. Toss everything together with olive oil, salt and pepper, then serve fresh.",
                items.join(", ").to_lowercase()
            ),
            ingredients: items,
        })
    }

    async fn search_keywords(&self, query: &str) -> Result<Vec<String>> {
        let keywords: Vec<String> = query
            .split_whitespace()
            .filter(|w| w.len() > 3)
            .take(5)
            .map(|w| {
                let mut chars = w.chars();
                match chars.next() {
                    Some(c) => c.to_uppercase().chain(chars).collect(),
                    None => String::new(),
                }
            })
            .collect();
        Ok(keywords)
    }
}
