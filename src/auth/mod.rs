//! Hybrid login reconciliation.
//!
//! [`AuthService`] is the consumer surface: `login`, `logout`,
//! `clear_error`, and a read-only [`Session`] snapshot. Behind it the
//! engine decides between the fast path (cached profile plus a live remote
//! credential check) and the slow path (full remote resolution and cache
//! hydration). Offline-only authentication is deliberately impossible.

mod account;
mod engine;
mod error;
mod service;
mod session;

pub use account::{Account, ProfileRecord};
pub use error::LoginError;
pub use service::AuthService;
pub use session::{Session, SessionStatus};
