//! Bridges HTTP-level 401s into an implicit logout.
//!
//! The HTTP adapter has no handle on the store and the store does not know
//! about HTTP; the composition root spawns this task to connect the two.

use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::debug;

use super::store::SessionStore;
use crate::gateway::UnauthorizedSignal;

/// Spawn the watcher. It exits once every signal sender is dropped.
pub fn spawn_unauthorized_watch(
    store: SessionStore,
    mut signals: broadcast::Receiver<UnauthorizedSignal>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match signals.recv().await {
                // A lagged receiver still means at least one 401 happened.
                Ok(UnauthorizedSignal) | Err(RecvError::Lagged(_)) => {
                    if store.state().is_authenticated {
                        store.expire();
                    }
                }
                Err(RecvError::Closed) => {
                    debug!("unauthorized signal channel closed");
                    break;
                }
            }
        }
    })
}

#[cfg(test)]
#[path = "expiry_test.rs"]
mod tests;
