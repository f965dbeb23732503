//! Repository traits for the marketplace store.
//!
//! These traits define the interface every store implementation provides,
//! so the service layer can run against the in-memory store in tests and a
//! different backend elsewhere without change.
//!
//! # Thread Safety
//! Implementations must be `Send + Sync` so a single store handle can be
//! shared by every caller.
//!
//! # Ordering
//! `list_*` methods return entities in insertion order, except reviews,
//! which come newest first.

use async_trait::async_trait;

use crate::models::{Message, Product, ProductId, Review, User, UserId};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Store a new listing.
    ///
    /// # Errors
    /// * `RepositoryError::Conflict` if a listing with the same ID exists
    async fn insert_product(&self, product: &Product) -> RepositoryResult<Product>;

    /// Replace an existing listing.
    ///
    /// # Errors
    /// * `RepositoryError::NotFound` if no listing has this ID
    async fn update_product(&self, product: &Product) -> RepositoryResult<Product>;

    async fn get_product(&self, product_id: &ProductId) -> RepositoryResult<Product>;

    async fn list_products(&self) -> RepositoryResult<Vec<Product>>;

    /// Listings owned by one producer.
    async fn list_products_by_producer(&self, producer_id: &UserId)
        -> RepositoryResult<Vec<Product>>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// # Errors
    /// * `RepositoryError::Conflict` if a user with the same ID exists
    async fn insert_user(&self, user: &User) -> RepositoryResult<User>;

    /// # Errors
    /// * `RepositoryError::NotFound` if no user has this ID
    async fn update_user(&self, user: &User) -> RepositoryResult<User>;

    async fn get_user(&self, user_id: &UserId) -> RepositoryResult<User>;

    async fn list_users(&self) -> RepositoryResult<Vec<User>>;
}

#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn insert_message(&self, message: &Message) -> RepositoryResult<Message>;

    async fn list_messages(&self) -> RepositoryResult<Vec<Message>>;

    /// Messages sent or received by `user_id`.
    async fn list_messages_for(&self, user_id: &UserId) -> RepositoryResult<Vec<Message>>;
}

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// New reviews are listed before older ones.
    async fn insert_review(&self, review: &Review) -> RepositoryResult<Review>;

    /// Newest first.
    async fn list_reviews(&self) -> RepositoryResult<Vec<Review>>;

    async fn list_reviews_for_producer(&self, producer_id: &UserId)
        -> RepositoryResult<Vec<Review>>;
}

/// Everything the service layer needs from a store.
#[async_trait]
pub trait FullRepository:
    ProductRepository + UserRepository + MessageRepository + ReviewRepository
{
    /// Check if the store is reachable.
    ///
    /// # Returns
    /// - `Ok(true)` if healthy
    /// - `Ok(false)` if unhealthy but no error occurred
    async fn health_check(&self) -> RepositoryResult<bool>;
}
