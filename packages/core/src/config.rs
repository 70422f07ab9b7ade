use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::provider::ProviderConfig;
use crate::store::DEFAULT_STATE_FILE;

pub const API_KEY_VAR: &str = "BASELIME_API_KEY";
/// Older name for the API key variable, still accepted as a fallback.
pub const LEGACY_API_KEY_VAR: &str = "BASELIMEIO_API_KEY";
pub const API_HOST_VAR: &str = "BASELIME_API_HOST";
pub const API_SCHEME_VAR: &str = "BASELIME_API_SCHEME";
pub const STATE_FILE_VAR: &str = "BASELIME_STATE_FILE";
pub const DEBUG_VAR: &str = "BASELIME_DEBUG";

/// Runtime settings for the binary. CLI flags win over the environment.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_host: Option<String>,
    pub api_scheme: Option<ApiScheme>,
    pub state_file: PathBuf,
    pub debug: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiScheme {
    Http,
    Https,
}

impl ApiScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiScheme::Http => "http",
            ApiScheme::Https => "https",
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_host", &self.api_host)
            .field("api_scheme", &self.api_scheme)
            .field("state_file", &self.state_file)
            .field("debug", &self.debug)
            .finish()
    }
}

impl Config {
    pub fn from_env(cli: &Cli) -> Result<Self, String> {
        Self::from_lookup(cli, |key| env::var(key).ok())
    }

    /// Resolve settings from CLI flags, falling back to `lookup` for
    /// environment variables.
    pub fn from_lookup<F>(cli: &Cli, lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let api_key = non_empty(cli.api_key.clone())
            .or_else(|| non_empty(lookup(API_KEY_VAR)))
            .or_else(|| non_empty(lookup(LEGACY_API_KEY_VAR)))
            .ok_or_else(|| format!("{} is required", API_KEY_VAR))?;

        let api_host = non_empty(cli.api_host.clone()).or_else(|| non_empty(lookup(API_HOST_VAR)));

        let api_scheme = match non_empty(cli.api_scheme.clone())
            .or_else(|| non_empty(lookup(API_SCHEME_VAR)))
            .as_deref()
        {
            None => None,
            Some("http") => Some(ApiScheme::Http),
            Some("https") => Some(ApiScheme::Https),
            Some(other) => return Err(format!("Invalid {}: {}", API_SCHEME_VAR, other)),
        };

        let state_file = cli
            .state_file
            .clone()
            .or_else(|| non_empty(lookup(STATE_FILE_VAR)).map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_FILE));

        let debug = cli.debug
            || match non_empty(lookup(DEBUG_VAR)).as_deref() {
                None | Some("0") | Some("false") => false,
                Some("1") | Some("true") => true,
                Some(other) => return Err(format!("Invalid {}: {}", DEBUG_VAR, other)),
            };

        Ok(Self {
            api_key,
            api_host,
            api_scheme,
            state_file,
            debug,
        })
    }

    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_host: self.api_host.clone(),
            api_key: self.api_key.clone(),
            api_scheme: self.api_scheme.map(|s| s.as_str().to_string()),
            debug: self.debug,
        }
    }
}
