//! # Linkify
//!
//! An alias-based URL shortener built with Axum and Redis.
//!
//! Callers choose the alias; the service maps it to a target URL, redirects
//! visitors and counts visits in the background.
//!
//! ## Architecture
//!
//! This crate follows Clean Architecture principles with clear layer separation:
//!
//! - **Domain Layer** ([`domain`]) - Link record entity, store trait, visit pipeline
//! - **Application Layer** ([`application`]) - Shortening service and alias resolver
//! - **Infrastructure Layer** ([`infrastructure`]) - Redis/RediSearch and in-memory stores
//! - **API Layer** ([`api`]) - REST API handlers, DTOs, and middleware
//!
//! ## Features
//!
//! - Caller-chosen aliases with strict validation
//! - Atomic alias claiming, safe under concurrent creates
//! - Asynchronous visit counting that never delays a redirect
//! - Bounded store operations: a slow store is an error, never "not found"
//!
//! ## Quick Start
//!
//! ```bash
//! # Redis Stack (RediSearch) connection; omit to use the in-memory store
//! export REDIS_URL="redis://localhost:6379"
//!
//! # Create the search index
//! cargo run --bin admin -- index create
//!
//! # Start the service
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{AliasResolver, ShortenedUrl, ShorteningService};
    pub use crate::domain::entities::{LinkRecord, NewLinkRecord};
    pub use crate::domain::repositories::{LinkRepository, StoreError, StoreResult};
    pub use crate::domain::visit_event::VisitEvent;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::InMemoryLinkRepository;
    pub use crate::state::AppState;
}
