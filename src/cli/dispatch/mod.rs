//! Map parsed CLI arguments to an [`Action`].

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{ARG_DSN, ARG_PORT, CMD_GENERATE_SECRET, token};
use anyhow::Result;

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if matches.subcommand_name() == Some(CMD_GENERATE_SECRET) {
        return Ok(Action::GenerateSecret);
    }

    let port = matches.get_one::<u16>(ARG_PORT).copied().unwrap_or(8080);
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .cloned()
        .filter(|v| !v.trim().is_empty());

    Ok(Action::Server(Args {
        port,
        dsn,
        token: token::Options::parse(matches)?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands;
    use secrecy::ExposeSecret;

    const VARS: [(&str, Option<&str>); 4] = [
        ("TOKENGATE_PORT", None),
        ("TOKENGATE_DSN", None),
        ("TOKENGATE_JWT_SECRET", None),
        ("TOKENGATE_JWT_TTL_MINUTES", None),
    ];

    #[test]
    fn server_without_dsn() -> Result<()> {
        temp_env::with_vars(VARS, || {
            let matches = commands::new().get_matches_from([
                "tokengate",
                "--jwt-secret",
                "0123456789abcdef0123456789abcdef",
            ]);

            let Action::Server(args) = handler(&matches)? else {
                anyhow::bail!("expected server action");
            };
            assert_eq!(args.port, 8080);
            assert!(args.dsn.is_none());
            assert_eq!(
                args.token.secret.expose_secret(),
                "0123456789abcdef0123456789abcdef"
            );
            Ok(())
        })
    }

    #[test]
    fn server_requires_secret() {
        temp_env::with_vars(VARS, || {
            let matches = commands::new().get_matches_from(["tokengate"]);
            assert!(handler(&matches).is_err());
        });
    }

    #[test]
    fn generate_secret_needs_no_secret() {
        temp_env::with_vars(VARS, || {
            let matches = commands::new().get_matches_from(["tokengate", CMD_GENERATE_SECRET]);
            assert!(matches!(handler(&matches), Ok(Action::GenerateSecret)));
        });
    }
}
