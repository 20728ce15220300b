//! # miniapp-session
//!
//! Session bootstrapping for a front-end embedded in a chat-platform
//! mini-app container. The host hands over a signed `initData` payload; the
//! provider exchanges it with the backend for a session token, decodes the
//! identity claims, and publishes `{identity, token, initData, error}` to
//! every consumer in its scope.
//!
//! Token claims are decoded WITHOUT signature verification and are for
//! display only. See [`claims`].
//!
//! ```no_run
//! use std::sync::Arc;
//! use miniapp_session::{EnvInitData, HttpAuthApi, Scope, SessionConfig, SessionProvider, use_session};
//!
//! # async fn demo() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SessionConfig::from_env()?;
//! let api = HttpAuthApi::from_config(&config)?;
//! let handle = SessionProvider::new(Arc::new(api), Arc::new(EnvInitData::default())).mount(&Scope::root());
//!
//! let session = use_session(&handle.scope().child());
//! let state = session.subscribe().wait_for(|s| s.is_settled()).await;
//! println!("{state:?}");
//! handle.unmount().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod claims;
pub mod clock;
pub mod config;
pub mod host;
pub mod provider;
pub mod scope;
pub mod store;

pub use api::{AuthApi, AuthError, HttpAuthApi};
pub use claims::{ClaimsError, TokenClaims};
pub use clock::{Clock, SystemClock};
pub use config::{AuthTimeouts, ConfigError, SessionConfig};
pub use host::{EnvInitData, InitDataSource, StaticInitData};
pub use provider::{CycleOutcome, ProviderHandle, SessionProvider};
pub use scope::{Scope, ScopeError, try_use_session, use_session};
pub use store::{AUTHENTICATION_FAILED, Identity, MISSING_INIT_DATA, SessionState, SessionStore, SessionSubscription};
