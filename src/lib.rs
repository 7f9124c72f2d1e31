//! Hybrid local/remote login reconciliation.
//!
//! A login request is answered from two sources of truth: a fast local
//! account cache (offline-capable lookup) and an authoritative remote
//! identity provider. The [`auth`] module carries the reconciliation engine
//! and session state machine, [`cache`] the local store, and [`directory`]
//! the remote collaborator boundary.

pub mod auth;
pub mod cache;
pub mod cli;
pub mod directory;

pub static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
