use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_JWT_SECRET: &str = "jwt-secret";
pub const ARG_JWT_ISSUER: &str = "jwt-issuer";
pub const ARG_JWT_AUDIENCE: &str = "jwt-audience";
pub const ARG_JWT_TTL_MINUTES: &str = "jwt-ttl-minutes";

#[derive(Debug, Clone)]
pub struct Options {
    pub secret: SecretString,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: u64,
}

impl Options {
    /// Parse token arguments from matches.
    ///
    /// # Errors
    /// Returns an error if the secret is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let secret = match matches.get_one::<String>(ARG_JWT_SECRET) {
            Some(value) if !value.trim().is_empty() => SecretString::from(value.clone()),
            _ => anyhow::bail!("missing required argument: --{ARG_JWT_SECRET}"),
        };

        let get_or_default = |id: &str| {
            matches
                .get_one::<String>(id)
                .cloned()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
        };

        Ok(Self {
            secret,
            issuer: get_or_default(ARG_JWT_ISSUER),
            audience: get_or_default(ARG_JWT_AUDIENCE),
            ttl_minutes: matches
                .get_one::<u64>(ARG_JWT_TTL_MINUTES)
                .copied()
                .unwrap_or(10),
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_JWT_SECRET)
                .long(ARG_JWT_SECRET)
                .help("HMAC secret used to sign and verify bearer tokens (at least 32 bytes)")
                .long_help(
                    "HMAC-SHA-256 secret used to sign and verify bearer tokens.\n\nMust be at least 32 bytes. Use `tokengate generate-secret` to create one.",
                )
                .env("TOKENGATE_JWT_SECRET")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_JWT_ISSUER)
                .long(ARG_JWT_ISSUER)
                .help("Token issuer (iss)")
                .env("TOKENGATE_JWT_ISSUER")
                .default_value(env!("CARGO_PKG_NAME")),
        )
        .arg(
            Arg::new(ARG_JWT_AUDIENCE)
                .long(ARG_JWT_AUDIENCE)
                .help("Token audience (aud)")
                .env("TOKENGATE_JWT_AUDIENCE")
                .default_value(env!("CARGO_PKG_NAME")),
        )
        .arg(
            Arg::new(ARG_JWT_TTL_MINUTES)
                .long(ARG_JWT_TTL_MINUTES)
                .help("Token lifetime in minutes")
                .env("TOKENGATE_JWT_TTL_MINUTES")
                .default_value("10")
                .value_parser(clap::value_parser!(u64).range(1..)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn command() -> Command {
        with_args(Command::new("test"))
    }

    #[test]
    fn defaults_apply() -> anyhow::Result<()> {
        temp_env::with_vars(
            [
                ("TOKENGATE_JWT_SECRET", None::<&str>),
                ("TOKENGATE_JWT_ISSUER", None),
                ("TOKENGATE_JWT_AUDIENCE", None),
                ("TOKENGATE_JWT_TTL_MINUTES", None),
            ],
            || {
                let matches = command().get_matches_from(["test", "--jwt-secret", "s"]);
                let options = Options::parse(&matches)?;
                assert_eq!(options.secret.expose_secret(), "s");
                assert_eq!(options.issuer, "tokengate");
                assert_eq!(options.audience, "tokengate");
                assert_eq!(options.ttl_minutes, 10);
                Ok(())
            },
        )
    }

    #[test]
    fn env_overrides_defaults() -> anyhow::Result<()> {
        temp_env::with_vars(
            [
                ("TOKENGATE_JWT_SECRET", Some("from-env")),
                ("TOKENGATE_JWT_ISSUER", Some("issuer-env")),
                ("TOKENGATE_JWT_AUDIENCE", Some("aud-env")),
                ("TOKENGATE_JWT_TTL_MINUTES", Some("30")),
            ],
            || {
                let matches = command().get_matches_from(["test"]);
                let options = Options::parse(&matches)?;
                assert_eq!(options.secret.expose_secret(), "from-env");
                assert_eq!(options.issuer, "issuer-env");
                assert_eq!(options.audience, "aud-env");
                assert_eq!(options.ttl_minutes, 30);
                Ok(())
            },
        )
    }

    #[test]
    fn missing_secret_is_an_error() {
        temp_env::with_var("TOKENGATE_JWT_SECRET", None::<&str>, || {
            let matches = command().get_matches_from(["test"]);
            let result = Options::parse(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(err.to_string().contains("--jwt-secret"));
            }
        });
    }

    #[test]
    fn zero_ttl_is_refused() {
        temp_env::with_var("TOKENGATE_JWT_TTL_MINUTES", None::<&str>, || {
            let result = command().try_get_matches_from(["test", "--jwt-ttl-minutes", "0"]);
            assert!(result.is_err());
        });
    }
}
