//! Domain layer containing business entities and logic.
//!
//! This module defines the link record entity, the store interface, and the
//! asynchronous visit counting pipeline, independent of infrastructure
//! concerns.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - Data access trait definitions
//! - [`visit_event`] - Visit counting event model
//! - [`visit_worker`] - Asynchronous visit increment worker
//!
//! # Visit Counting Flow
//!
//! 1. The alias resolver decides the redirect target
//! 2. A [`visit_event::VisitEvent`] is sent to the visit queue (non-blocking)
//! 3. [`visit_worker::run_visit_worker`] applies the increment
//! 4. The counter is incremented atomically by [`repositories::LinkRepository`]

pub mod entities;
pub mod repositories;
pub mod visit_event;
pub mod visit_worker;
