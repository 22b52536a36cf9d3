//! Client-side authentication session.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pages, the route guard and the CLI read from [`SessionStore`]; nothing
//! else mutates it. The store reaches the outside world only through an
//! [`crate::gateway::AuthGateway`] and a [`SessionPersistence`] medium, both
//! injected by the composition root.

pub mod expiry;
pub mod notify;
pub mod persist;
pub mod state;
pub mod store;

pub use expiry::spawn_unauthorized_watch;
pub use notify::{Notification, NotificationLevel};
pub use persist::{SESSION_KEY, SessionPersistence, TOKEN_KEY};
pub use state::{PersistedSession, SessionState};
pub use store::SessionStore;
