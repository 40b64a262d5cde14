use crate::{
    api,
    cli::commands::token,
    store::{MemoryCredentialStore, PgCredentialStore, SharedStore},
};
use anyhow::{Context, Result};
use bearer_token::{Secret, TokenConfig};
use secrecy::ExposeSecret;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub dsn: Option<String>,
    pub token: token::Options,
}

/// Turn the token options into the process-wide [`TokenConfig`].
///
/// # Errors
/// Returns an error if the secret is too short or issuer/audience are blank.
pub fn token_config(options: &token::Options) -> Result<TokenConfig> {
    let secret = Secret::new(options.secret.expose_secret().as_bytes())
        .context("Invalid --jwt-secret")?;

    let ttl = options
        .ttl_minutes
        .checked_mul(60)
        .map(Duration::from_secs)
        .context("--jwt-ttl-minutes is too large")?;

    let config = TokenConfig::new(secret, &options.issuer, &options.audience)
        .context("Invalid token issuer or audience")?
        .with_ttl(ttl);

    Ok(config)
}

/// Execute the server action.
/// # Errors
/// Returns an error if the token settings are invalid, the database is
/// unreachable or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let tokens = token_config(&args.token)?;

    debug!(
        port = args.port,
        issuer = tokens.issuer(),
        audience = tokens.audience(),
        ttl_seconds = tokens.ttl().as_secs(),
        "startup"
    );

    let store: SharedStore = if let Some(dsn) = &args.dsn {
        info!("Using PostgreSQL credential store");
        Arc::new(
            PgCredentialStore::connect(dsn)
                .await
                .context("Failed to connect to database")?,
        )
    } else {
        warn!("No --dsn given, users are kept in memory");
        Arc::new(MemoryCredentialStore::new())
    };

    api::new(args.port, store, tokens).await
}
