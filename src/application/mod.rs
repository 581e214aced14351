//! Application layer services implementing business logic.
//!
//! Services consume the [`crate::domain::repositories::LinkRepository`] trait
//! and provide a clean API for HTTP handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::shortening_service::ShorteningService`] - Validated short link creation and lookup
//! - [`services::alias_resolver::AliasResolver`] - Redirect resolution with asynchronous visit counting

pub mod services;
