//! In-memory local repository implementation.
//!
//! Stores every entity in insertion-ordered vectors behind a single
//! `RwLock`. Suitable for the CLI, unit tests and local development; nothing
//! survives the process.

use async_trait::async_trait;
use log::debug;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::db::seed::CatalogSnapshot;
use crate::models::{Message, Product, ProductId, Review, User, UserId};

/// In-memory local repository.
///
/// Cloning is cheap and clones share the same data.
///
/// # Example
/// ```
/// use farmstand::db::repositories::LocalRepository;
/// use farmstand::db::{seed, ProductRepository};
///
/// let repo = LocalRepository::from_snapshot(seed::demo_snapshot().unwrap());
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// let products = rt.block_on(repo.list_products()).unwrap();
/// assert_eq!(products.len(), 3);
/// ```
#[derive(Clone, Default)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    users: Vec<User>,
    products: Vec<Product>,
    messages: Vec<Message>,
    /// Newest first.
    reviews: Vec<Review>,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            users: Vec::new(),
            products: Vec::new(),
            messages: Vec::new(),
            reviews: Vec::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `snapshot`.
    ///
    /// Reviews in the snapshot are taken to be newest first already.
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        debug!(
            "Seeding local repository: {} users, {} products, {} messages, {} reviews",
            snapshot.users.len(),
            snapshot.products.len(),
            snapshot.messages.len(),
            snapshot.reviews.len()
        );
        Self {
            data: Arc::new(RwLock::new(LocalData {
                users: snapshot.users,
                products: snapshot.products,
                messages: snapshot.messages,
                reviews: snapshot.reviews,
                is_healthy: true,
            })),
        }
    }

    /// Copy of everything currently stored.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let data = self.data.read();
        CatalogSnapshot {
            users: data.users.clone(),
            products: data.products.clone(),
            messages: data.messages.clone(),
            reviews: data.reviews.clone(),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    pub fn product_count(&self) -> usize {
        self.data.read().products.len()
    }

    pub fn user_count(&self) -> usize {
        self.data.read().users.len()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Store is not healthy").with_operation(operation));
        }
        Ok(())
    }
}

fn not_found(operation: &str, entity: &str, id: impl ToString) -> RepositoryError {
    let id = id.to_string();
    RepositoryError::not_found_with_context(
        format!("{} {} not found", entity, id),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

fn conflict(operation: &str, entity: &str, id: impl ToString) -> RepositoryError {
    let id = id.to_string();
    RepositoryError::conflict_with_context(
        format!("{} {} already exists", entity, id),
        ErrorContext::new(operation)
            .with_entity(entity)
            .with_entity_id(id),
    )
}

// ==================== Product Repository ====================

#[async_trait]
impl ProductRepository for LocalRepository {
    async fn insert_product(&self, product: &Product) -> RepositoryResult<Product> {
        self.check_health("insert_product")?;
        let mut data = self.data.write();
        if data.products.iter().any(|p| p.id == product.id) {
            return Err(conflict("insert_product", "product", &product.id));
        }
        data.products.push(product.clone());
        Ok(product.clone())
    }

    async fn update_product(&self, product: &Product) -> RepositoryResult<Product> {
        self.check_health("update_product")?;
        let mut data = self.data.write();
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| not_found("update_product", "product", &product.id))?;
        *slot = product.clone();
        Ok(product.clone())
    }

    async fn get_product(&self, product_id: &ProductId) -> RepositoryResult<Product> {
        self.check_health("get_product")?;
        self.data
            .read()
            .products
            .iter()
            .find(|p| &p.id == product_id)
            .cloned()
            .ok_or_else(|| not_found("get_product", "product", product_id))
    }

    async fn list_products(&self) -> RepositoryResult<Vec<Product>> {
        self.check_health("list_products")?;
        Ok(self.data.read().products.clone())
    }

    async fn list_products_by_producer(
        &self,
        producer_id: &UserId,
    ) -> RepositoryResult<Vec<Product>> {
        self.check_health("list_products_by_producer")?;
        Ok(self
            .data
            .read()
            .products
            .iter()
            .filter(|p| &p.producer_id == producer_id)
            .cloned()
            .collect())
    }
}

// ==================== User Repository ====================

#[async_trait]
impl UserRepository for LocalRepository {
    async fn insert_user(&self, user: &User) -> RepositoryResult<User> {
        self.check_health("insert_user")?;
        let mut data = self.data.write();
        if data.users.iter().any(|u| u.id == user.id) {
            return Err(conflict("insert_user", "user", &user.id));
        }
        data.users.push(user.clone());
        Ok(user.clone())
    }

    async fn update_user(&self, user: &User) -> RepositoryResult<User> {
        self.check_health("update_user")?;
        let mut data = self.data.write();
        let slot = data
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or_else(|| not_found("update_user", "user", &user.id))?;
        *slot = user.clone();
        Ok(user.clone())
    }

    async fn get_user(&self, user_id: &UserId) -> RepositoryResult<User> {
        self.check_health("get_user")?;
        self.data
            .read()
            .users
            .iter()
            .find(|u| &u.id == user_id)
            .cloned()
            .ok_or_else(|| not_found("get_user", "user", user_id))
    }

    async fn list_users(&self) -> RepositoryResult<Vec<User>> {
        self.check_health("list_users")?;
        Ok(self.data.read().users.clone())
    }
}

// ==================== Message Repository ====================

#[async_trait]
impl MessageRepository for LocalRepository {
    async fn insert_message(&self, message: &Message) -> RepositoryResult<Message> {
        self.check_health("insert_message")?;
        self.data.write().messages.push(message.clone());
        Ok(message.clone())
    }

    async fn list_messages(&self) -> RepositoryResult<Vec<Message>> {
        self.check_health("list_messages")?;
        Ok(self.data.read().messages.clone())
    }

    async fn list_messages_for(&self, user_id: &UserId) -> RepositoryResult<Vec<Message>> {
        self.check_health("list_messages_for")?;
        Ok(self
            .data
            .read()
            .messages
            .iter()
            .filter(|m| m.involves(user_id))
            .cloned()
            .collect())
    }
}

// ==================== Review Repository ====================

#[async_trait]
impl ReviewRepository for LocalRepository {
    async fn insert_review(&self, review: &Review) -> RepositoryResult<Review> {
        self.check_health("insert_review")?;
        self.data.write().reviews.insert(0, review.clone());
        Ok(review.clone())
    }

    async fn list_reviews(&self) -> RepositoryResult<Vec<Review>> {
        self.check_health("list_reviews")?;
        Ok(self.data.read().reviews.clone())
    }

    async fn list_reviews_for_producer(
        &self,
        producer_id: &UserId,
    ) -> RepositoryResult<Vec<Review>> {
        self.check_health("list_reviews_for_producer")?;
        Ok(self
            .data
            .read()
            .reviews
            .iter()
            .filter(|r| &r.producer_id == producer_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl FullRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::seed::demo_snapshot;

    #[tokio::test]
    async fn test_clear_keeps_health_flag() {
        let repo = LocalRepository::from_snapshot(demo_snapshot().unwrap());
        repo.set_healthy(false);
        repo.clear();
        assert_eq!(repo.product_count(), 0);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_data() {
        let repo = LocalRepository::new();
        let other = repo.clone();
        let snapshot = demo_snapshot().unwrap();
        other.insert_user(&snapshot.users[0]).await.unwrap();
        assert_eq!(repo.user_count(), 1);
    }

    #[tokio::test]
    async fn test_unhealthy_store_rejects_calls() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let err = repo.list_products().await.unwrap_err();
        assert!(err.is_retryable());
        assert_eq!(err.context().operation.as_deref(), Some("list_products"));
    }
}
