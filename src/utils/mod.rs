//! Utility functions for validation, query escaping, and URL processing.
//!
//! This module provides helper functions used across the application:
//!
//! - [`validator`] - URL and alias validation
//! - [`query_escape`] - Escaping of user input for RediSearch queries
//! - [`url_normalizer`] - Protocol normalization for redirect targets

pub mod query_escape;
pub mod url_normalizer;
pub mod validator;
