use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use miniapp_session::{
    AuthError, AuthTimeouts, EnvInitData, HttpAuthApi, InitDataSource, Scope, SessionProvider, SessionState,
    StaticInitData, use_session,
};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("auth client setup failed: {0}")]
    Setup(#[from] AuthError),
    #[error("timed out after {0}s waiting for the session to settle")]
    Timeout(u64),
    #[error("session store closed before settling")]
    Closed,
    #[error("state encode failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Stand-in host container: mounts a session provider and prints the
/// settled state as JSON.
#[derive(Parser, Debug)]
#[command(name = "miniapp-session", about = "Exchange mini-app initData for a session token")]
struct Cli {
    /// Backend base URL; `/auth` is appended. Falls back to `MINIAPP_API_URL` at call time.
    #[arg(long)]
    api_url: Option<String>,

    /// Raw initData payload. When omitted it is read from `MINIAPP_INIT_DATA`.
    #[arg(long)]
    init_data: Option<String>,

    #[arg(long, env = "MINIAPP_WAIT_SECS", default_value_t = 15)]
    wait_secs: u64,

    /// Overrides `MINIAPP_AUTH_REQUEST_TIMEOUT_SECS`.
    #[arg(long)]
    request_timeout_secs: Option<u64>,

    /// Overrides `MINIAPP_AUTH_CONNECT_TIMEOUT_SECS`.
    #[arg(long)]
    connect_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(state) if state.is_authenticated() => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            tracing::error!(error = %e, "miniapp-session failed");
            ExitCode::from(2)
        }
    }
}

async fn run(cli: Cli) -> Result<SessionState, CliError> {
    let mut timeouts = AuthTimeouts::from_env();
    if let Some(secs) = cli.request_timeout_secs {
        timeouts.request_secs = secs;
    }
    if let Some(secs) = cli.connect_timeout_secs {
        timeouts.connect_secs = secs;
    }
    let mut api = HttpAuthApi::new(timeouts)?;
    if let Some(url) = cli.api_url.as_deref() {
        api = api.with_base_url(url);
    }

    let host: Arc<dyn InitDataSource> = match cli.init_data {
        Some(raw) => Arc::new(StaticInitData::new(Some(raw))),
        None => Arc::new(EnvInitData::default()),
    };

    let handle = SessionProvider::new(Arc::new(api), host).mount(&Scope::root());
    let mut session = use_session(&handle.scope().child()).subscribe();

    let settled = tokio::time::timeout(Duration::from_secs(cli.wait_secs), session.wait_for(SessionState::is_settled))
        .await
        .map_err(|_| CliError::Timeout(cli.wait_secs))?
        .ok_or(CliError::Closed)?;
    handle.unmount().await;

    println!("{}", serde_json::to_string_pretty(&settled)?);
    Ok(settled)
}
