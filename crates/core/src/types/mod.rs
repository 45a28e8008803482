//! Core types for Harvest & Home.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod catalog;
pub mod email;
pub mod id;
pub mod price;

pub use catalog::{Category, CategoryParseError, Farm, Product};
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, PriceError};
