//! Domain models for the storefront.
//!
//! - [`session`] - Authenticated identity, remote or local-only
//! - [`view`] - The navigable screens

pub mod session;
pub mod view;

pub use session::{
    LocalSession, RemoteSession, Session, SessionPhase, SessionSnapshot, SessionTokens,
};
pub use view::View;
