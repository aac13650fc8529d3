//! Configuration schema definitions.
//!
//! The snapshot handed to the application at startup. Values come from the
//! command line (`port`, `env`, `api`) and the process environment
//! (`secrets`). Nothing here is validated beyond type parsing.

use std::fmt;
use std::time::Duration;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 3001;

/// Default environment tag.
pub const DEFAULT_ENV: &str = "development";

/// Default upstream API URL.
pub const DEFAULT_API: &str = "http://localhost:3000";

/// Default for every transport timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Environment variable holding the publishable key.
pub const STRIPE_KEY_VAR: &str = "STRIPE_KEY";

/// Environment variable holding the secret key.
pub const STRIPE_SECRET_VAR: &str = "STRIPE_SECRET";

/// Root configuration for the web application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Port to listen on (all interfaces).
    pub port: u16,

    /// Environment tag, e.g. "development" or "production". Advisory only.
    pub env: String,

    /// URL of the upstream API.
    pub api: String,

    /// Secrets sourced from the environment.
    pub secrets: Secrets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            env: DEFAULT_ENV.to_string(),
            api: DEFAULT_API.to_string(),
            secrets: Secrets::default(),
        }
    }
}

/// Payment provider credentials. Empty when the variables are unset.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Secrets {
    pub key: String,
    pub secret: String,
}

impl Secrets {
    /// Read both secrets through `lookup`, defaulting to empty strings.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            key: lookup(STRIPE_KEY_VAR).unwrap_or_default(),
            secret: lookup(STRIPE_SECRET_VAR).unwrap_or_default(),
        }
    }
}

// Secrets must never reach the logs, including through `{:?}` on Config.
impl fmt::Debug for Secrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Secrets")
            .field("key", &redact(&self.key))
            .field("secret", &redact(&self.secret))
            .finish()
    }
}

fn redact(value: &str) -> &'static str {
    if value.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

/// Connection-phase limits passed to the transport.
///
/// A zero duration disables the corresponding limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerTimeouts {
    /// Maximum time a keep-alive connection may sit without traffic.
    pub idle: Duration,

    /// Maximum time to receive the request body.
    pub read: Duration,

    /// Maximum time to receive the request head.
    pub read_header: Duration,

    /// Maximum time to produce the response.
    pub write: Duration,
}

impl Default for ServerTimeouts {
    fn default() -> Self {
        Self {
            idle: DEFAULT_TIMEOUT,
            read: DEFAULT_TIMEOUT,
            read_header: DEFAULT_TIMEOUT,
            write: DEFAULT_TIMEOUT,
        }
    }
}

impl ServerTimeouts {
    /// Effective idle limit. Falls back to the read limit when unset.
    pub fn idle_limit(&self) -> Option<Duration> {
        limit(self.idle).or_else(|| limit(self.read))
    }

    pub fn read_limit(&self) -> Option<Duration> {
        limit(self.read)
    }

    pub fn read_header_limit(&self) -> Option<Duration> {
        limit(self.read_header)
    }

    pub fn write_limit(&self) -> Option<Duration> {
        limit(self.write)
    }
}

fn limit(d: Duration) -> Option<Duration> {
    (!d.is_zero()).then_some(d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let config = Config::default();
        assert_eq!(config.port, 3001);
        assert_eq!(config.env, "development");
        assert_eq!(config.api, "http://localhost:3000");
        assert_eq!(config.secrets, Secrets::default());

        let timeouts = ServerTimeouts::default();
        assert_eq!(timeouts.idle, Duration::from_secs(5));
        assert_eq!(timeouts.read, Duration::from_secs(5));
        assert_eq!(timeouts.read_header, Duration::from_secs(5));
        assert_eq!(timeouts.write, Duration::from_secs(5));
    }

    #[test]
    fn secrets_empty_when_unset() {
        let secrets = Secrets::from_lookup(|_| None);
        assert_eq!(secrets.key, "");
        assert_eq!(secrets.secret, "");
    }

    #[test]
    fn secrets_read_from_lookup() {
        let secrets = Secrets::from_lookup(|name| match name {
            STRIPE_KEY_VAR => Some("pk_test".to_string()),
            STRIPE_SECRET_VAR => Some("sk_test".to_string()),
            _ => None,
        });
        assert_eq!(secrets.key, "pk_test");
        assert_eq!(secrets.secret, "sk_test");
    }

    #[test]
    fn secrets_redacted_in_debug() {
        let config = Config {
            secrets: Secrets {
                key: "pk_live_abc".into(),
                secret: "sk_live_xyz".into(),
            },
            ..Config::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("pk_live_abc"));
        assert!(!rendered.contains("sk_live_xyz"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn zero_disables_limit() {
        let timeouts = ServerTimeouts {
            idle: Duration::ZERO,
            read: Duration::from_secs(10),
            read_header: Duration::ZERO,
            write: Duration::from_secs(3),
        };
        assert_eq!(timeouts.idle_limit(), Some(Duration::from_secs(10)));
        assert_eq!(timeouts.read_header_limit(), None);
        assert_eq!(timeouts.write_limit(), Some(Duration::from_secs(3)));

        let none = ServerTimeouts {
            idle: Duration::ZERO,
            read: Duration::ZERO,
            ..timeouts
        };
        assert_eq!(none.idle_limit(), None);
        assert_eq!(none.read_limit(), None);
    }
}
