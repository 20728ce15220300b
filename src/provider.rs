//! Session provider — the authentication lifecycle.
//!
//! ARCHITECTURE
//! ============
//! `SessionProvider::mount` creates an empty [`SessionStore`], installs it on
//! a child [`Scope`], and spawns one lifecycle task. The task runs a cycle
//! on mount, re-runs immediately whenever a cycle changed the held token,
//! and otherwise parks until [`ProviderHandle::trigger`] or teardown.
//!
//! One cycle:
//! - token held: check its `exp` against the clock; clear identity if
//!   expired, otherwise do nothing
//! - no token: read `initData` from the host, exchange it, decode identity,
//!   publish
//!
//! Clearing an expired token changes the held token, so the next cycle
//! re-authenticates without any outside trigger. A failed exchange leaves
//! the token unset (unchanged), so it is never retried automatically.
//!
//! TEARDOWN
//! ========
//! Unmount cancels a `CancellationToken`. The in-flight exchange is raced
//! against it, and the mounted store checks the same token inside its write,
//! so a late response is never applied to a torn-down provider.
//!
//! ERROR HANDLING
//! ==============
//! Consumers only ever see `MISSING_INIT_DATA` or `AUTHENTICATION_FAILED`.
//! The underlying [`AuthError`] (status, body, transport message) is logged.

use std::sync::Arc;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::api::{AuthApi, AuthError};
use crate::claims::{self, TokenClaims};
use crate::clock::{Clock, SystemClock};
use crate::host::InitDataSource;
use crate::scope::Scope;
use crate::store::{Identity, SessionStore};

/// What a single lifecycle cycle did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Held token is still valid; nothing happened.
    TokenValid,
    /// Held token expired and identity was cleared.
    TokenExpired,
    /// Not running inside the host container; nothing happened.
    HostUnavailable,
    /// Host supplied no payload; error published.
    MissingInitData,
    /// Exchange succeeded; identity published.
    Authenticated,
    /// Exchange failed; error published.
    Failed,
    /// Provider was torn down; nothing was applied.
    Cancelled,
}

// =============================================================================
// PROVIDER
// =============================================================================

pub struct SessionProvider {
    api: Arc<dyn AuthApi>,
    host: Arc<dyn InitDataSource>,
    clock: Arc<dyn Clock>,
}

impl SessionProvider {
    #[must_use]
    pub fn new(api: Arc<dyn AuthApi>, host: Arc<dyn InitDataSource>) -> Self {
        Self { api, host, clock: Arc::new(SystemClock) }
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Run one lifecycle cycle against `store`.
    pub async fn run_cycle(&self, store: &SessionStore, cancel: &CancellationToken) -> CycleOutcome {
        if cancel.is_cancelled() {
            return CycleOutcome::Cancelled;
        }

        if let Some(token) = store.token() {
            if claims::is_token_valid(&token, self.clock.now_millis()) {
                return CycleOutcome::TokenValid;
            }
            warn!("session token expired; clearing user state");
            if !store.clear_identity() {
                return CycleOutcome::Cancelled;
            }
            return CycleOutcome::TokenExpired;
        }

        if !self.host.is_available() {
            debug!("host container unavailable; skipping authentication");
            return CycleOutcome::HostUnavailable;
        }

        let Some(init_data) = self.host.init_data().filter(|data| !data.is_empty()) else {
            error!("initData is missing from host container");
            if !store.set_missing_init_data() {
                return CycleOutcome::Cancelled;
            }
            return CycleOutcome::MissingInitData;
        };

        let result = tokio::select! {
            () = cancel.cancelled() => return CycleOutcome::Cancelled,
            result = self.authenticate(&init_data) => result,
        };

        if cancel.is_cancelled() {
            return CycleOutcome::Cancelled;
        }

        match result {
            Ok((token, identity)) => {
                let (id, username) = (identity.user_id.clone(), identity.username.clone());
                if !store.set_authenticated(token, identity, init_data) {
                    debug!("provider torn down; discarding authenticated session");
                    return CycleOutcome::Cancelled;
                }
                info!(%id, %username, "authenticated successfully");
                CycleOutcome::Authenticated
            }
            Err(e) => {
                match &e {
                    AuthError::Status { status, body } => {
                        error!(%status, %body, "authentication failed");
                    }
                    other => error!(error = %other, "authentication failed"),
                }
                if !store.set_failed(init_data) {
                    return CycleOutcome::Cancelled;
                }
                CycleOutcome::Failed
            }
        }
    }

    async fn authenticate(&self, init_data: &str) -> Result<(String, Identity), AuthError> {
        let token = self.api.exchange(init_data).await?;
        let TokenClaims { id, username, .. } = claims::decode_claims::<TokenClaims>(&token)?;

        // An already-dead token would be cleared and re-exchanged at once.
        if !claims::is_token_valid(&token, self.clock.now_millis()) {
            return Err(AuthError::Claims("issued token is expired or has no exp".into()));
        }

        Ok((token, Identity { user_id: id, username }))
    }

    /// Create a fresh store under a child of `parent` and start the lifecycle.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn mount(self, parent: &Scope) -> ProviderHandle {
        let cancel = CancellationToken::new();
        let scope = parent.child();
        let store = SessionStore::with_cancel(cancel.clone());
        scope.provide(store.clone());

        let trigger = Arc::new(Notify::new());
        let (cycles_tx, cycles_rx) = watch::channel(0u64);

        let task = tokio::spawn(lifecycle_loop(
            Arc::new(self),
            store.clone(),
            cancel.clone(),
            Arc::clone(&trigger),
            cycles_tx,
        ));

        ProviderHandle { scope, store, cancel, trigger, cycles: cycles_rx, task: Some(task) }
    }
}

async fn lifecycle_loop(
    provider: Arc<SessionProvider>,
    store: SessionStore,
    cancel: CancellationToken,
    trigger: Arc<Notify>,
    cycles: watch::Sender<u64>,
) {
    loop {
        let watched = store.token();
        let outcome = provider.run_cycle(&store, &cancel).await;
        cycles.send_modify(|n| *n += 1);
        debug!(?outcome, "session cycle complete");

        if outcome == CycleOutcome::Cancelled {
            break;
        }
        if store.token() != watched {
            continue;
        }

        tokio::select! {
            () = cancel.cancelled() => break,
            () = trigger.notified() => {}
        }
    }
    debug!("session provider stopped");
}

// =============================================================================
// HANDLE
// =============================================================================

/// A mounted provider. Dropping it tears the provider down.
pub struct ProviderHandle {
    scope: Scope,
    store: SessionStore,
    cancel: CancellationToken,
    trigger: Arc<Notify>,
    cycles: watch::Receiver<u64>,
    task: Option<JoinHandle<()>>,
}

impl ProviderHandle {
    /// Scope to hand to consumers of this session.
    #[must_use]
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Re-run the lifecycle: expiry check if a token is held, otherwise a
    /// fresh exchange. Coalesces with any trigger already pending.
    pub fn trigger(&self) {
        self.trigger.notify_one();
    }

    /// Number of lifecycle cycles finished so far.
    #[must_use]
    pub fn completed_cycles(&self) -> u64 {
        *self.cycles.borrow()
    }

    /// Wait until at least `n` cycles have finished (or the task stopped).
    pub async fn wait_for_cycles(&self, n: u64) {
        let mut rx = self.cycles.clone();
        let _ = rx.wait_for(|done| *done >= n).await;
    }

    /// Tear down: stop the lifecycle task and withdraw the session from the
    /// scope. Any in-flight exchange result is discarded.
    pub async fn unmount(mut self) {
        self.cancel.cancel();
        self.scope.withdraw();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                error!(error = %e, "session provider task failed");
            }
        }
    }
}

impl Drop for ProviderHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        self.scope.withdraw();
    }
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
