//! Application stores and services.
//!
//! # Services
//!
//! - `session` - authentication gate (Loading / Authenticated / Unauthenticated)
//! - `catalog` - farms and products, loaded once per session
//! - `cart` - the purchase basket and its panel
//! - `navigation` - the current view and its resolution against the catalog
//! - `notifications` - the single self-dismissing toast
//! - `recipes` - recipe suggestions from the generative endpoint
//! - `checkout` - order summary
//! - `auth` - the auth collaborator interface

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod navigation;
pub mod notifications;
pub mod recipes;
pub mod session;
