//! Core value types for the Printfuse catalog.
//!
//! This module provides type-safe wrappers for identifiers, money and stock.

pub mod id;
pub mod price;
pub mod stock;

pub use id::*;
pub use price::{Price, PriceError, Rounding};
pub use stock::{Stock, StockError};
