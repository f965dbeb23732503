//! Marketplace storage.
//!
//! Storage sits behind the Repository pattern, so the in-memory store used
//! by the CLI and tests could be swapped for a persistent one.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Application Layer (CLI, web front end)                 │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Service Layer (services.rs) - Use cases                │
//! │  - Permission checks                                     │
//! │  - Form validation and domain rules                      │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Traits (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────▼──────────────────────────────┐
//!     │             Local Repository                  │
//!     │      (in-memory, seeded from a snapshot)      │
//!     └──────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - `services`: use-case functions (use these in your application!)
//! - `repository`: trait definitions and error types
//! - `repositories::local`: in-memory implementation
//! - `seed`: JSON catalog snapshots and the bundled demo catalog

pub mod repositories;
pub mod repository;
pub mod seed;
pub mod services;

// ==================== Service Layer ====================

pub use services::{
    approved_producer_count, create_product, decide_application, enhance_description,
    get_conversation, health_check, list_contacts, list_marketplace_products, pantry_recipe,
    pending_applications, producer_calendar, producer_rating, product_rating,
    recipe_from_catalog, send_message, smart_search, submit_review, update_product_availability,
    ServiceError, ServiceResult,
};

// ==================== Repository Pattern Exports ====================

pub use repositories::LocalRepository;
pub use repository::{
    ErrorContext, FullRepository, MessageRepository, ProductRepository, RepositoryError,
    RepositoryResult, ReviewRepository, UserRepository,
};
pub use seed::{demo_snapshot, CatalogSnapshot};
