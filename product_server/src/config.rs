use std::{env, io::Write};

use chrono::Duration;
use log::*;
use product_common::{
    helpers::{env_flag, env_non_empty},
    Secret,
};
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use tempfile::NamedTempFile;

use crate::errors::ServerError;

const DEFAULT_PAS_HOST: &str = "127.0.0.1";
const DEFAULT_PAS_PORT: u16 = 8380;
const DEFAULT_DATABASE_URL: &str = "sqlite://products.db";
const DEFAULT_TOKEN_TTL: Duration = Duration::hours(1);
const MAX_TOKEN_TTL_SECS: i64 = 366 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth: AuthConfig,
    /// An identity to provision at startup, if both `PAS_ADMIN_EMAIL` and `PAS_ADMIN_PASSWORD` are set.
    pub seed: Option<SeedConfig>,
    /// If true, the X-Forwarded-For header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_x_forwarded_for: bool,
    /// If true, the Forwarded header will be used to determine the client's IP address, rather than the
    /// connection's remote address.
    pub use_forwarded: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PAS_HOST.to_string(),
            port: DEFAULT_PAS_PORT,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            auth: AuthConfig::default(),
            seed: None,
            use_x_forwarded_for: false,
            use_forwarded: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env_or_default() -> Self {
        let host = env_non_empty("PAS_HOST").unwrap_or_else(|| DEFAULT_PAS_HOST.into());
        let port = env::var("PAS_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PAS_PORT. {e} Using the default, {DEFAULT_PAS_PORT}, instead."
                    );
                    DEFAULT_PAS_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PAS_PORT);
        let database_url = env_non_empty("PAS_DATABASE_URL").unwrap_or_else(|| {
            info!("🪛️ PAS_DATABASE_URL is not set. Using the default, {DEFAULT_DATABASE_URL}.");
            DEFAULT_DATABASE_URL.to_string()
        });
        let auth = AuthConfig::from_env();
        let seed = SeedConfig::from_env();
        let use_x_forwarded_for = env_flag("PAS_USE_X_FORWARDED_FOR", false);
        let use_forwarded = env_flag("PAS_USE_FORWARDED", false);
        Self { host, port, database_url, auth, seed, use_x_forwarded_for, use_forwarded }
    }
}

//-------------------------------------------------  AuthConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct AuthConfig {
    /// The HMAC secret used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
    /// How long an access token stays valid after it is issued.
    pub token_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        warn!(
            "🚨️🚨️🚨️ The JWT secret has not been set. I'm using a random value for this session. DO NOT operate on \
             production like this, since every token becomes invalid when the server restarts. 🚨️🚨️🚨️"
        );
        let secret = thread_rng().sample_iter(&Alphanumeric).take(64).map(char::from).collect::<String>();
        let mut tmpfile = NamedTempFile::new().ok().and_then(|f| f.keep().ok());
        match &mut tmpfile {
            Some((f, p)) => match writeln!(f, "{secret}") {
                Ok(()) => warn!(
                    "🚨️🚨️🚨️ The JWT secret for this session was written to {}. If this is a production instance, you \
                     are doing it wrong! Set the PAS_JWT_SECRET environment variable instead. 🚨️🚨️🚨️",
                    p.to_str().unwrap_or("???")
                ),
                Err(e) => warn!("🪛️ Could not write the JWT secret to the temporary file. {e}"),
            },
            None => {
                warn!("🪛️ Could not create a temporary file to store the JWT secret.");
            },
        }
        Self { jwt_secret: Secret::new(secret), token_ttl: DEFAULT_TOKEN_TTL }
    }
}

impl AuthConfig {
    pub fn new<S: Into<String>>(secret: S, token_ttl: Duration) -> Self {
        Self { jwt_secret: Secret::new(secret.into()), token_ttl }
    }

    /// Reads `PAS_JWT_SECRET` and `PAS_JWT_TTL`. Each falls back to its default on its own, so a bad lifetime never
    /// costs you a configured secret.
    pub fn from_env() -> Self {
        Self::from_values(env_non_empty("PAS_JWT_SECRET"), env_non_empty("PAS_JWT_TTL"))
    }

    fn from_values(secret: Option<String>, ttl: Option<String>) -> Self {
        let token_ttl = match ttl {
            Some(s) => parse_token_ttl(&s).unwrap_or_else(|e| {
                error!("🪛️ {e} Using the default of {} seconds instead.", DEFAULT_TOKEN_TTL.num_seconds());
                DEFAULT_TOKEN_TTL
            }),
            None => {
                info!("🪛️ PAS_JWT_TTL is not set. Tokens will be valid for {} seconds.", DEFAULT_TOKEN_TTL.num_seconds());
                DEFAULT_TOKEN_TTL
            },
        };
        match secret {
            Some(secret) => Self::new(secret, token_ttl),
            None => Self { token_ttl, ..Self::default() },
        }
    }
}

/// Parses a token lifetime in whole seconds. It must be positive and at most a year (366 days).
pub fn parse_token_ttl(value: &str) -> Result<Duration, ServerError> {
    let invalid = |reason: &str| {
        ServerError::ConfigurationError(format!("{value} is not a valid token lifetime for PAS_JWT_TTL. {reason}"))
    };
    let secs = value.trim().parse::<i64>().map_err(|e| invalid(&format!("{e}.")))?;
    if !(1..=MAX_TOKEN_TTL_SECS).contains(&secs) {
        return Err(invalid(&format!("It must be between 1 and {MAX_TOKEN_TTL_SECS} seconds.")));
    }
    Duration::try_seconds(secs).ok_or_else(|| invalid("It is out of range."))
}

//-------------------------------------------------  SeedConfig  -------------------------------------------------------
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub email: String,
    pub password: Secret<String>,
}

impl SeedConfig {
    pub fn from_env() -> Option<Self> {
        match (env_non_empty("PAS_ADMIN_EMAIL"), env_non_empty("PAS_ADMIN_PASSWORD")) {
            (Some(email), Some(password)) => Some(Self { email, password: Secret::new(password) }),
            (Some(_), None) | (None, Some(_)) => {
                warn!("🪛️ Only one of PAS_ADMIN_EMAIL and PAS_ADMIN_PASSWORD is set. No identity will be provisioned.");
                None
            },
            (None, None) => None,
        }
    }
}

//-------------------------------------------------  ServerOptions  ----------------------------------------------------
/// The subset of the server configuration that handlers need at request time. It holds no secrets.
#[derive(Clone, Copy, Debug, Default)]
pub struct ServerOptions {
    pub use_x_forwarded_for: bool,
    pub use_forwarded: bool,
}

impl ServerOptions {
    pub fn from_config(config: &ServerConfig) -> Self {
        Self { use_x_forwarded_for: config.use_x_forwarded_for, use_forwarded: config.use_forwarded }
    }
}
