//! Core domain entities.
//!
//! - [`LinkRecord`] - A persisted alias mapping with its visit counter
//! - [`NewLinkRecord`] - Input for creating a record

pub mod link;

pub use link::{LinkRecord, NewLinkRecord};
