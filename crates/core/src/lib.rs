//! Harvest & Home Core - Shared domain types.
//!
//! This crate provides the types shared by every Harvest & Home component:
//! - `storefront` - The storefront application state machine and its JSON surface
//! - `integration-tests` - Black-box tests driving the storefront
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients, no async runtime. Catalog records are immutable once loaded, so
//! everything here is plain data with validation at construction time.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, prices, emails and catalog records

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
