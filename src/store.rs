//! Observable session state.
//!
//! DESIGN
//! ======
//! The state is a single `SessionState` value behind a `tokio::sync::watch`
//! channel. Every write replaces the whole snapshot in one `send_if_modified`
//! call, so subscribers never observe a token without its identity (or the
//! reverse). Only the provider writes; all write methods are crate-private.
//! Readers hold cheap `SessionStore` clones and either take snapshots or
//! subscribe for change notifications.
//!
//! A store mounted by a provider shares the provider's cancellation token.
//! It is checked inside the same `send_if_modified` closure that writes, so
//! once the provider is torn down no write can land, whichever thread races.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Published when the host container supplied no `initData`.
pub const MISSING_INIT_DATA: &str = "Missing initData";
/// Published when the exchange failed for any reason.
pub const AUTHENTICATION_FAILED: &str = "Authentication failed";

// =============================================================================
// SESSION STATE
// =============================================================================

/// Snapshot of the session as seen by consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(rename = "userID")]
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub token: Option<String>,
    pub init_data: Option<String>,
    pub error: Option<String>,
}

/// Display identity decoded from the session token. Untrusted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
    pub username: String,
}

impl SessionState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn identity(&self) -> Option<Identity> {
        match (&self.user_id, &self.username) {
            (Some(user_id), Some(username)) if self.is_authenticated() => {
                Some(Identity { user_id: user_id.clone(), username: username.clone() })
            }
            _ => None,
        }
    }

    /// Settled: either authenticated or carrying an error.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.is_authenticated() || self.error.is_some()
    }
}

// =============================================================================
// STORE
// =============================================================================

/// Shared handle to the session state. Clone freely.
#[derive(Clone, Debug)]
pub struct SessionStore {
    tx: Arc<watch::Sender<SessionState>>,
    closed: CancellationToken,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::with_cancel(CancellationToken::new())
    }

    /// Store that rejects every write once `closed` is cancelled.
    pub(crate) fn with_cancel(closed: CancellationToken) -> Self {
        let (tx, _rx) = watch::channel(SessionState::default());
        Self { tx: Arc::new(tx), closed }
    }

    /// Current state, cloned.
    #[must_use]
    pub fn snapshot(&self) -> SessionState {
        self.tx.borrow().clone()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.tx.borrow().token.clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> SessionSubscription {
        SessionSubscription { rx: self.tx.subscribe() }
    }

    // -------------------------------------------------------------------------
    // Writes (provider only); each returns `false` if the store is closed
    // -------------------------------------------------------------------------

    pub(crate) fn set_authenticated(&self, token: String, identity: Identity, init_data: String) -> bool {
        self.replace(|_| SessionState {
            user_id: Some(identity.user_id),
            username: Some(identity.username),
            token: Some(token),
            init_data: Some(init_data),
            error: None,
        })
    }

    pub(crate) fn set_failed(&self, init_data: String) -> bool {
        self.replace(|_| SessionState {
            user_id: None,
            username: None,
            token: None,
            init_data: Some(init_data),
            error: Some(AUTHENTICATION_FAILED.to_owned()),
        })
    }

    /// Only the error changes; a missing payload says nothing about identity.
    pub(crate) fn set_missing_init_data(&self) -> bool {
        self.replace(|state| SessionState { error: Some(MISSING_INIT_DATA.to_owned()), ..state.clone() })
    }

    /// Expiry clear: error and `init_data` are left untouched.
    pub(crate) fn clear_identity(&self) -> bool {
        self.replace(|state| SessionState { user_id: None, username: None, token: None, ..state.clone() })
    }

    fn replace(&self, next: impl FnOnce(&SessionState) -> SessionState) -> bool {
        let mut accepted = false;
        self.tx.send_if_modified(|state| {
            if self.closed.is_cancelled() {
                return false;
            }
            accepted = true;
            let updated = next(state);
            if *state == updated {
                return false;
            }
            *state = updated;
            true
        });
        accepted
    }
}

// =============================================================================
// SUBSCRIPTION
// =============================================================================

/// Change feed for one consumer.
#[derive(Debug)]
pub struct SessionSubscription {
    rx: watch::Receiver<SessionState>,
}

impl SessionSubscription {
    /// Current state; marks it as seen.
    pub fn current(&mut self) -> SessionState {
        self.rx.borrow_and_update().clone()
    }

    /// Wait for the next published change. `None` once the store is gone.
    pub async fn changed(&mut self) -> Option<SessionState> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// Wait until the state satisfies `pred` (checked immediately first).
    pub async fn wait_for(&mut self, pred: impl FnMut(&SessionState) -> bool) -> Option<SessionState> {
        self.rx.wait_for(pred).await.ok().map(|state| state.clone())
    }
}

#[cfg(test)]
#[path = "store_test.rs"]
mod tests;
