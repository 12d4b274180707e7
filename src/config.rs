use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

const APP_DIR: &str = "tweet-analyzer";
const CONFIG_FILE: &str = "config.toml";

pub const ENV_CONSUMER_KEY: &str = "TWITTER_CONSUMER_KEY";
pub const ENV_CONSUMER_SECRET: &str = "TWITTER_CONSUMER_SECRET";
pub const ENV_ACCESS_TOKEN: &str = "TWITTER_ACCESS_TOKEN";
pub const ENV_ACCESS_TOKEN_SECRET: &str = "TWITTER_ACCESS_TOKEN_SECRET";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub credentials: Credentials,
    pub api: ApiConfig,
    pub stream: StreamConfig,
}

/// OAuth 1.0a user-context credentials.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("consumer_key", &self.consumer_key)
            .field("consumer_secret", &"<redacted>")
            .field("access_token", &self.access_token)
            .field("access_token_secret", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    pub fn new(
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
        access_token: impl Into<String>,
        access_token_secret: impl Into<String>,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            consumer_secret: consumer_secret.into(),
            access_token: access_token.into(),
            access_token_secret: access_token_secret.into(),
        }
    }

    /// Names of the credential fields that are still empty.
    pub fn missing(&self) -> Vec<&'static str> {
        [
            ("consumer_key", &self.consumer_key),
            ("consumer_secret", &self.consumer_secret),
            ("access_token", &self.access_token),
            ("access_token_secret", &self.access_token_secret),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub api_url: String,
    pub stream_url: String,
    pub timeout_secs: u64,
    /// Items requested per page; Twitter caps most v1.1 endpoints at 200.
    pub page_size: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.twitter.com".to_string(),
            stream_url: "https://stream.twitter.com".to_string(),
            timeout_secs: 30,
            page_size: 200,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub output_path: PathBuf,
    pub channel_capacity: usize,
    /// Print every received payload to stdout as well as the file.
    pub echo: bool,
    pub on_write_failure: WriteFailurePolicy,
    pub on_stream_error: ErrorPolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from("fetched_tweets.txt"),
            channel_capacity: 256,
            echo: true,
            on_write_failure: WriteFailurePolicy::default(),
            on_stream_error: ErrorPolicy::default(),
        }
    }
}

/// What the listener does when appending a payload to the output file fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteFailurePolicy {
    /// Log the failure and keep streaming.
    #[default]
    Continue,
    Stop,
}

/// Which stream error statuses end the stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Only 420 (rate limited) stops; everything else is logged.
    #[default]
    StopOnRateLimit,
    StopOnAnyError,
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load configuration from `path`, or from the default location when none
    /// is given. A missing default file is not an error; a missing explicit
    /// file is. Environment overrides are applied and credentials validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`], reading credential overrides from `lookup`.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_overrides(lookup);
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Replace credential fields with values from `lookup` when present.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let creds = &mut self.credentials;
        for (key, field) in [
            (ENV_CONSUMER_KEY, &mut creds.consumer_key),
            (ENV_CONSUMER_SECRET, &mut creds.consumer_secret),
            (ENV_ACCESS_TOKEN, &mut creds.access_token),
            (ENV_ACCESS_TOKEN_SECRET, &mut creds.access_token_secret),
        ] {
            if let Some(value) = lookup(key).filter(|v| !v.is_empty()) {
                *field = value;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        let missing = self.credentials.missing();
        if !missing.is_empty() {
            bail!(
                "Missing Twitter credentials: {} (set them in the [credentials] section or via {}/{}/{}/{})",
                missing.join(", "),
                ENV_CONSUMER_KEY,
                ENV_CONSUMER_SECRET,
                ENV_ACCESS_TOKEN,
                ENV_ACCESS_TOKEN_SECRET
            );
        }
        if self.api.page_size == 0 {
            bail!("api.page_size must be at least 1");
        }
        if self.stream.channel_capacity == 0 {
            bail!("stream.channel_capacity must be at least 1");
        }
        Ok(())
    }
}
