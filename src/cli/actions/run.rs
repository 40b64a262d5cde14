use crate::cli::{
    actions::{Action, generate_secret, server},
    telemetry,
};
use anyhow::Result;

/// Execute the provided action.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    let result = match action {
        Action::Server(args) => server::execute(args).await,
        Action::GenerateSecret => generate_secret::execute(),
    };

    telemetry::shutdown_tracer();

    result
}
