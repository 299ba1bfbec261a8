//! Client configuration.

use crate::identity::{IdentityContext, UserIdentity};
use crate::types::PushServicePlatform;
use crate::{Email, UserId};
use std::time::Duration;

/// Default API host.
pub const DEFAULT_API_HOST: &str = "https://api.iterable.com";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub(crate) api_host: String,
    pub(crate) timeout: Duration,
}

impl Config {
    /// Get the API host.
    pub fn api_host(&self) -> &str {
        &self.api_host
    }

    /// Get the request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Builder for the Iterable client.
#[derive(Debug)]
pub struct IterableBuilder {
    api_key: String,
    user: Option<UserIdentity>,
    environment: Option<PushServicePlatform>,
    api_host: Option<String>,
    timeout: Option<Duration>,
}

impl IterableBuilder {
    /// Create a new builder with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            user: None,
            environment: None,
            api_host: None,
            timeout: None,
        }
    }

    /// Attribute events to a user by email.
    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.user = Some(UserIdentity::Email(Email(email.into())));
        self
    }

    /// Attribute events to a user by user ID.
    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user = Some(UserIdentity::UserId(UserId(user_id.into())));
        self
    }

    /// Set the push service environment used for token registration.
    pub fn environment(mut self, environment: PushServicePlatform) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Set the API host.
    pub fn api_host(mut self, host: impl Into<String>) -> Self {
        self.api_host = Some(host.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the identity and transport configuration.
    pub(crate) fn build_parts(self) -> Result<(IdentityContext, Config), crate::Error> {
        let user = self
            .user
            .ok_or_else(|| crate::Error::Config("email or user_id is required".into()))?;

        let api_host = self.api_host.unwrap_or_else(|| DEFAULT_API_HOST.into());
        let api_host = api_host.trim_end_matches('/').to_string();
        if api_host.is_empty() {
            return Err(crate::Error::Config("api_host cannot be empty".into()));
        }

        let identity =
            IdentityContext::new(self.api_key, user, self.environment.unwrap_or_default())?;

        Ok((
            identity,
            Config {
                api_host,
                timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            },
        ))
    }
}
