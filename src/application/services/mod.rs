//! Business logic services for the application layer.

pub mod alias_resolver;
pub mod shortening_service;

pub use alias_resolver::AliasResolver;
pub use shortening_service::{ShortenedUrl, ShorteningService};
