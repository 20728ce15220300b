//! Host-container bridge supplying the mini-app `initData` payload.
//!
//! DESIGN
//! ======
//! The payload is opaque: it is forwarded verbatim to the backend, which
//! verifies it. Nothing here parses or trims it.
//!
//! A host may also be entirely absent (e.g. rendering outside the
//! container). In that case the provider does nothing at all, which is
//! distinct from a present host that hands back an empty payload.

pub const DEFAULT_INIT_DATA_VAR: &str = "MINIAPP_INIT_DATA";

pub trait InitDataSource: Send + Sync {
    /// Whether the host runtime bridge exists at all.
    fn is_available(&self) -> bool {
        true
    }

    /// The raw `initData` string, if the host supplied one.
    fn init_data(&self) -> Option<String>;
}

/// Fixed payload, for embedding hosts that hand the value over up front.
#[derive(Debug, Clone)]
pub struct StaticInitData {
    available: bool,
    init_data: Option<String>,
}

impl StaticInitData {
    #[must_use]
    pub fn new(init_data: Option<String>) -> Self {
        Self { available: true, init_data }
    }

    /// A source representing "not running inside the host container".
    #[must_use]
    pub fn unavailable() -> Self {
        Self { available: false, init_data: None }
    }
}

impl InitDataSource for StaticInitData {
    fn is_available(&self) -> bool {
        self.available
    }

    fn init_data(&self) -> Option<String> {
        self.init_data.clone()
    }
}

/// Reads the payload from an environment variable on every call.
#[derive(Debug, Clone)]
pub struct EnvInitData {
    var: String,
}

impl EnvInitData {
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl Default for EnvInitData {
    fn default() -> Self {
        Self::new(DEFAULT_INIT_DATA_VAR)
    }
}

impl InitDataSource for EnvInitData {
    fn init_data(&self) -> Option<String> {
        std::env::var(&self.var).ok()
    }
}

#[cfg(test)]
#[path = "host_test.rs"]
mod tests;
