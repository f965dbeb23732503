//! High-level marketplace service layer.
//!
//! Repository-agnostic operations that work with any [`FullRepository`].
//! They load what a use case needs from the store, apply the domain rules
//! from [`crate::services`], and write the result back. Presentation code
//! (the CLI, a web front end) should go through these functions rather than
//! the repository traits.
//!
//! # Usage
//!
//! ```no_run
//! use farmstand::db::{seed, services, repositories::LocalRepository};
//! use farmstand::services::ProductQuery;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::from_snapshot(seed::demo_snapshot()?);
//!
//!     let products = services::list_marketplace_products(&repo, &ProductQuery::new()).await?;
//!     println!("Found {} products", products.len());
//!
//!     Ok(())
//! }
//! ```

use chrono::{DateTime, Utc};
use log::{info, warn};

use super::repository::{FullRepository, RepositoryError, RepositoryResult};
use crate::forms::{AvailabilityForm, FormError, NewProductForm};
use crate::models::{
    AvailabilityError, Message, MissingBoundPolicy, Product, ProductId, Review, User, UserId,
    YearMonth,
};
use crate::services::approval::{self, ApprovalError, Decision};
use crate::services::availability::AvailabilityMatcher;
use crate::services::calendar::MonthGrid;
use crate::services::catalog::{matches_search, query_products, ProductQuery};
use crate::services::content::{ContentGenerator, RecipeSuggestion, ResilientContent};
use crate::services::messaging::{self, MessagingError};
use crate::services::ratings::{self, RatingSummary};
use crate::services::reviews::{self, ReviewError};

/// How many catalog products seed a catalog recipe.
const CATALOG_RECIPE_INGREDIENTS: usize = 5;

/// Errors raised by service-layer operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    Form(#[from] FormError),

    #[error(transparent)]
    Availability(#[from] AvailabilityError),

    #[error(transparent)]
    Approval(#[from] ApprovalError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error("User {user_id} is not permitted to {action}")]
    NotPermitted {
        user_id: UserId,
        action: &'static str,
    },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

fn not_permitted(user_id: &UserId, action: &'static str) -> ServiceError {
    ServiceError::NotPermitted {
        user_id: user_id.clone(),
        action,
    }
}

// ==================== Health & Connection ====================

/// Check if the store is healthy.
///
/// This is a simple pass-through to the repository's health check.
pub async fn health_check<R: FullRepository>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Listings ====================

/// Create a listing from the "add product" form.
///
/// Only approved producers can sell.
pub async fn create_product<R: FullRepository>(
    repo: &R,
    producer_id: &UserId,
    form: &NewProductForm,
) -> ServiceResult<Product> {
    let producer = repo.get_user(producer_id).await?;
    if !producer.can_sell() {
        return Err(not_permitted(producer_id, "list products"));
    }

    let product = form.validate(producer_id)?;
    let stored = repo.insert_product(&product).await?;
    info!(
        "Producer {} listed '{}' ({}, {})",
        producer_id, stored.name, stored.id, stored.availability
    );
    Ok(stored)
}

/// Replace a listing's availability window. Only its producer may do this.
pub async fn update_product_availability<R: FullRepository>(
    repo: &R,
    producer_id: &UserId,
    product_id: &ProductId,
    form: &AvailabilityForm,
) -> ServiceResult<Product> {
    let mut product = repo.get_product(product_id).await?;
    if &product.producer_id != producer_id {
        return Err(not_permitted(producer_id, "edit another producer's listing"));
    }

    product.availability = form.validate()?;
    let updated = repo.update_product(&product).await?;
    info!(
        "Availability of {} set to {}",
        updated.id, updated.availability
    );
    Ok(updated)
}

/// The consumer product grid: search, optional availability filter, sort.
pub async fn list_marketplace_products<R: FullRepository>(
    repo: &R,
    query: &ProductQuery,
) -> ServiceResult<Vec<Product>> {
    let products = repo.list_products().await?;
    Ok(query_products(&products, query)
        .into_iter()
        .cloned()
        .collect())
}

/// A producer's month calendar: for every day, the listings on offer.
pub async fn producer_calendar<R: FullRepository>(
    repo: &R,
    producer_id: &UserId,
    month: YearMonth,
    policy: MissingBoundPolicy,
) -> ServiceResult<MonthGrid<Product>> {
    let producer = repo.get_user(producer_id).await?;
    let products = repo.list_products_by_producer(&producer.id).await?;
    let grid = AvailabilityMatcher::new(policy)
        .build_month_grid(month, &products)
        .cloned();
    Ok(grid)
}

// ==================== Accounts ====================

/// Apply an admin decision to a pending account and store it.
pub async fn decide_application<R: FullRepository>(
    repo: &R,
    admin_id: &UserId,
    applicant_id: &UserId,
    decision: Decision,
) -> ServiceResult<User> {
    let admin = repo.get_user(admin_id).await?;
    let applicant = repo.get_user(applicant_id).await?;

    let updated = approval::decide(&admin, &applicant, decision)?;
    let stored = repo.update_user(&updated).await?;
    info!(
        "Admin {} decided {:?} for {} ({:?})",
        admin_id, decision, applicant_id, stored.status
    );
    Ok(stored)
}

/// Accounts waiting for an admin decision.
pub async fn pending_applications<R: FullRepository>(repo: &R) -> ServiceResult<Vec<User>> {
    let users = repo.list_users().await?;
    Ok(approval::pending_applications(&users)
        .into_iter()
        .cloned()
        .collect())
}

/// Producers currently allowed to sell, for the admin dashboard.
pub async fn approved_producer_count<R: FullRepository>(repo: &R) -> ServiceResult<usize> {
    let users = repo.list_users().await?;
    Ok(approval::approved_producer_count(&users))
}

// ==================== Messaging ====================

/// Send a direct message. Both parties must exist.
pub async fn send_message<R: FullRepository>(
    repo: &R,
    sender_id: &UserId,
    receiver_id: &UserId,
    content: &str,
    now: DateTime<Utc>,
) -> ServiceResult<Message> {
    let sender = repo.get_user(sender_id).await?;
    let receiver = repo.get_user(receiver_id).await?;

    let message = messaging::compose(&sender.id, &receiver.id, content, now)?;
    Ok(repo.insert_message(&message).await?)
}

/// People `user_id` can message.
pub async fn list_contacts<R: FullRepository>(
    repo: &R,
    user_id: &UserId,
) -> ServiceResult<Vec<User>> {
    let current = repo.get_user(user_id).await?;
    let users = repo.list_users().await?;
    let messages = repo.list_messages_for(user_id).await?;

    Ok(messaging::contacts(&current, &users, &messages)
        .into_iter()
        .cloned()
        .collect())
}

/// Messages between two users, oldest first.
pub async fn get_conversation<R: FullRepository>(
    repo: &R,
    user_id: &UserId,
    other_id: &UserId,
) -> ServiceResult<Vec<Message>> {
    let messages = repo.list_messages_for(user_id).await?;
    Ok(messaging::conversation(&messages, user_id, other_id)
        .into_iter()
        .cloned()
        .collect())
}

// ==================== Reviews ====================

/// Store a review of `producer_id`, optionally about one of its listings.
pub async fn submit_review<R: FullRepository>(
    repo: &R,
    author_id: &UserId,
    producer_id: &UserId,
    product_id: Option<&ProductId>,
    stars: u8,
    comment: &str,
    now: DateTime<Utc>,
) -> ServiceResult<Review> {
    let author = repo.get_user(author_id).await?;
    let producer = repo.get_user(producer_id).await?;
    let product = match product_id {
        Some(id) => Some(repo.get_product(id).await?),
        None => None,
    };

    let review = reviews::compose(&author, &producer, product.as_ref(), stars, comment, now)?;
    Ok(repo.insert_review(&review).await?)
}

pub async fn producer_rating<R: FullRepository>(
    repo: &R,
    producer_id: &UserId,
) -> ServiceResult<RatingSummary> {
    let reviews = repo.list_reviews_for_producer(producer_id).await?;
    Ok(ratings::producer_rating(&reviews, producer_id))
}

pub async fn product_rating<R: FullRepository>(
    repo: &R,
    product_id: &ProductId,
) -> ServiceResult<RatingSummary> {
    let product = repo.get_product(product_id).await?;
    let reviews = repo.list_reviews_for_producer(&product.producer_id).await?;
    Ok(ratings::product_rating(&reviews, product_id))
}

// ==================== Generated content ====================

/// Regenerate a listing's description and store it. Only its producer may
/// do this; a failed generation stores the default copy.
pub async fn enhance_description<R: FullRepository, G: ContentGenerator>(
    repo: &R,
    content: &ResilientContent<G>,
    producer_id: &UserId,
    product_id: &ProductId,
) -> ServiceResult<Product> {
    let mut product = repo.get_product(product_id).await?;
    if &product.producer_id != producer_id {
        return Err(not_permitted(producer_id, "edit another producer's listing"));
    }

    product.description = content.describe(&product.name, &product.category).await;
    Ok(repo.update_product(&product).await?)
}

/// Recipe built from the first few catalog listings.
pub async fn recipe_from_catalog<R: FullRepository, G: ContentGenerator>(
    repo: &R,
    content: &ResilientContent<G>,
) -> ServiceResult<Option<RecipeSuggestion>> {
    let products = repo.list_products().await?;
    if products.is_empty() {
        warn!("No listings to build a recipe from");
        return Ok(None);
    }

    let ingredients = products
        .iter()
        .take(CATALOG_RECIPE_INGREDIENTS)
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    Ok(content.suggest_recipe(&ingredients).await)
}

/// Recipe from free-text pantry ingredients. Blank input does not reach the
/// generator.
pub async fn pantry_recipe<G: ContentGenerator>(
    content: &ResilientContent<G>,
    ingredients: &str,
) -> Option<RecipeSuggestion> {
    if ingredients.trim().is_empty() {
        return None;
    }
    content.suggest_recipe(ingredients).await
}

/// Product grid for a free-text request: a listing matches when its name or
/// category contains any generated keyword. Availability filter and sort
/// come from `query`.
pub async fn smart_search<R: FullRepository, G: ContentGenerator>(
    repo: &R,
    content: &ResilientContent<G>,
    query: &ProductQuery,
) -> ServiceResult<Vec<Product>> {
    if query.search.trim().is_empty() {
        return list_marketplace_products(repo, query).await;
    }

    let keywords = content.search_keywords(&query.search).await;
    info!("Searching '{}' as {:?}", query.search, keywords);

    let products = repo.list_products().await?;
    let unfiltered = ProductQuery {
        search: String::new(),
        ..query.clone()
    };
    Ok(query_products(&products, &unfiltered)
        .into_iter()
        .filter(|p| keywords.iter().any(|k| matches_search(p, k)))
        .cloned()
        .collect())
}

#[cfg(test)]
#[path = "services_tests.rs"]
mod services_tests;
