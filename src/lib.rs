//! Barberdesk: authentication session layer for the barbershop console.
//!
//! SYSTEM CONTEXT
//! ==============
//! The console's pages never talk to the backend about identity directly.
//! They read [`session::SessionStore`], which owns the signed-in user and
//! the loading/error flags, and call its operations to sign in, sign up,
//! sign out, reset a password or edit the profile.
//!
//! ARCHITECTURE
//! ============
//! - [`gateway`]: `AuthGateway` trait with a mock and an HTTP implementation.
//! - [`session`]: the store, its persisted snapshot and the 401 watcher.
//! - [`storage`]: key/value medium the snapshot and token live in.
//! - [`guard`]: route access decisions derived from session state.
//! - [`validate`]: form rules applied before any gateway call.
//! - [`config`]: environment-driven wiring for the binary.

pub mod config;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod session;
pub mod storage;
pub mod types;
pub mod validate;

pub use error::{AuthError, ValidationError};
pub use session::{SessionState, SessionStore};
pub use types::{Role, User};
