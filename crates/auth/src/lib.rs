//! Authentication, sessions, and identity management.
//!
//! Dual-token scheme: short-lived HS256 access tokens that verify without
//! storage, and long-lived refresh sessions of which only a SHA-256 digest
//! is persisted. Passwords are hashed with Argon2id.
//!
//! ## Identity Types
//!
//! - [`Member`] — Registered user with credentials
//! - [`Lurker`] — Anonymous visitor
//! - [`User`] — Request identity: member or lurker
//! - [`Session`] — Refresh session with expiry
//!
//! ## Security
//!
//! - [`Crypto`] — Access token signing and verification
//! - [`Manager`] — Token pair issuance and refresh
//! - [`Hasher`] — Argon2 hashing and verification
//!
//! ## Collaborators
//!
//! - [`Members`] — Identity lookup
//! - [`Sessions`] — Refresh session persistence
mod claims;
mod crypto;
mod dto;
mod error;
mod hasher;
mod identity;
mod lurker;
mod manager;
mod member;
mod repository;
mod session;
mod settings;
mod validate;

pub use claims::*;
pub use crypto::*;
pub use dto::*;
pub use error::*;
pub use hasher::*;
pub use identity::*;
pub use lurker::*;
pub use manager::*;
pub use member::*;
pub use repository::*;
pub use session::*;
pub use settings::*;
pub use validate::*;

#[cfg(any(test, feature = "memory"))]
mod memory;
#[cfg(any(test, feature = "memory"))]
pub use memory::*;

#[cfg(feature = "server")]
mod handlers;
#[cfg(feature = "server")]
mod middleware;
#[cfg(feature = "server")]
pub use handlers::*;
#[cfg(feature = "server")]
pub use middleware::*;
