//! Run configuration.
//!
//! Everything a run needs is carried in an explicit [`Config`] passed to the
//! client constructor; there is no ambient or process-global state. Values
//! come from the environment and are validated fail-fast so a missing token
//! surfaces before any service call is made.

use std::env;
use std::fmt;

use thiserror::Error;

/// Environment variable holding the organization name.
pub const ORGANIZATION_VAR: &str = "AZDO_ORGANIZATION";
/// Environment variable holding the project name.
pub const PROJECT_VAR: &str = "AZDO_PROJECT";
/// Environment variable holding the personal access token.
pub const TOKEN_VAR: &str = "AZDO_TOKEN";

/// Errors raised while assembling the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required value was not provided or was empty.
    #[error("required configuration {0} is not set or empty")]
    Missing(&'static str),
}

/// Configuration for one cascade run.
#[derive(Clone)]
pub struct Config {
    /// Organization name (the `{organization}` segment of the service URL).
    pub organization: String,
    /// Project name within the organization.
    pub project: String,
    /// Personal access token used as basic-auth credentials on every request.
    pub token: String,
}

impl Config {
    /// Creates a configuration, rejecting empty values.
    pub fn new(
        organization: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        let config = Config {
            organization: organization.into(),
            project: project.into(),
            token: token.into(),
        };
        if config.organization.trim().is_empty() {
            return Err(ConfigError::Missing(ORGANIZATION_VAR));
        }
        if config.project.trim().is_empty() {
            return Err(ConfigError::Missing(PROJECT_VAR));
        }
        if config.token.trim().is_empty() {
            return Err(ConfigError::Missing(TOKEN_VAR));
        }
        Ok(config)
    }

    /// Loads the configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::new(
            env::var(ORGANIZATION_VAR).unwrap_or_default(),
            env::var(PROJECT_VAR).unwrap_or_default(),
            env::var(TOKEN_VAR).unwrap_or_default(),
        )
    }
}

// Manual Debug so the access token never lands in logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("token", &"<redacted>")
            .finish()
    }
}
