//! Printfuse Core - catalog domain library.
//!
//! This crate holds everything about the catalog that is a rule rather than
//! plumbing:
//! - `storefront` - HTTP API and catalog stores build on these types
//! - `cli` - Migrations and reference-data seeding
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and validation - no I/O,
//! no database access, no HTTP. Everything here is deterministic and can be
//! tested without a runtime.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and stock levels
//! - [`catalog`] - Domain model, add-on eligibility rules, pricing engine and
//!   catalog projections

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod types;

pub use catalog::*;
pub use types::*;
