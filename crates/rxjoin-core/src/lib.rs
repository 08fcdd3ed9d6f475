//! Core types for the rxjoin drug-interaction query service.
//!
//! No HTTP or database code lives here.
//! The store, API and binaries all depend on it.

pub mod drug;
pub mod error;
pub mod intersect;
pub mod patient;
pub mod query;

pub use error::{Error, Result};
