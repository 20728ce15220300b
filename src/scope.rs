//! Provider scoping — which consumers may read a session.
//!
//! A `Scope` is an explicit node in the consumer tree. Mounting a provider
//! creates a child scope carrying its store; anything handed that scope (or
//! a descendant of it) can reach the session. Asking from anywhere else is a
//! wiring mistake and [`use_session`] panics rather than inventing a default.

use std::sync::{Arc, PoisonError, RwLock};

use crate::store::SessionStore;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ScopeError {
    #[error("use_session must be used within a SessionProvider scope")]
    OutsideProvider,
}

#[derive(Clone, Debug, Default)]
pub struct Scope {
    node: Arc<ScopeNode>,
}

#[derive(Debug, Default)]
struct ScopeNode {
    parent: Option<Scope>,
    session: RwLock<Option<SessionStore>>,
}

impl Scope {
    /// Top of a consumer tree; carries no session.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn child(&self) -> Self {
        Self { node: Arc::new(ScopeNode { parent: Some(self.clone()), session: RwLock::new(None) }) }
    }

    /// Nearest session store on the path to the root.
    #[must_use]
    pub fn session(&self) -> Option<SessionStore> {
        let mut cursor = Some(self);
        while let Some(scope) = cursor {
            let slot = scope.node.session.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(store) = slot.as_ref() {
                return Some(store.clone());
            }
            cursor = scope.node.parent.as_ref();
        }
        None
    }

    pub(crate) fn provide(&self, store: SessionStore) {
        *self.node.session.write().unwrap_or_else(PoisonError::into_inner) = Some(store);
    }

    pub(crate) fn withdraw(&self) {
        self.node.session.write().unwrap_or_else(PoisonError::into_inner).take();
    }
}

/// Session store for `scope`.
///
/// # Panics
///
/// Panics if no provider is mounted on `scope` or any of its ancestors.
#[must_use]
pub fn use_session(scope: &Scope) -> SessionStore {
    match try_use_session(scope) {
        Ok(store) => store,
        Err(err) => panic!("{err}"),
    }
}

/// Non-panicking form of [`use_session`].
///
/// # Errors
///
/// Returns [`ScopeError::OutsideProvider`] outside any provider subtree.
pub fn try_use_session(scope: &Scope) -> Result<SessionStore, ScopeError> {
    scope.session().ok_or(ScopeError::OutsideProvider)
}

#[cfg(test)]
#[path = "scope_test.rs"]
mod tests;
