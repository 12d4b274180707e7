//! Callbacks invoked for each message received on a filtered stream.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::config::{ErrorPolicy, StreamConfig, WriteFailurePolicy};

/// Twitter's "Enhance Your Calm" status: the client is being rate limited.
pub const RATE_LIMIT_STATUS: u16 = 420;

/// Receives stream messages inline on the consuming task.
///
/// Returning `false` from either method ends the stream.
pub trait StreamListener {
    fn on_data(&mut self, raw: &str) -> bool;

    fn on_error(&mut self, status: u16) -> bool;
}

/// Appends every raw payload to a file, one per line.
#[derive(Debug, Clone)]
pub struct TwitterListener {
    fetched_tweets_filename: PathBuf,
    echo: bool,
    write_failure_policy: WriteFailurePolicy,
    error_policy: ErrorPolicy,
    written: u64,
    write_failures: u64,
}

impl TwitterListener {
    pub fn new(fetched_tweets_filename: impl Into<PathBuf>) -> Self {
        Self {
            fetched_tweets_filename: fetched_tweets_filename.into(),
            echo: true,
            write_failure_policy: WriteFailurePolicy::default(),
            error_policy: ErrorPolicy::default(),
            written: 0,
            write_failures: 0,
        }
    }

    pub fn from_config(config: &StreamConfig) -> Self {
        Self::new(&config.output_path)
            .with_echo(config.echo)
            .with_write_failure_policy(config.on_write_failure)
            .with_error_policy(config.on_stream_error)
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn with_write_failure_policy(mut self, policy: WriteFailurePolicy) -> Self {
        self.write_failure_policy = policy;
        self
    }

    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    pub fn path(&self) -> &Path {
        &self.fetched_tweets_filename
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    /// Payloads that could not be appended to the output file.
    pub fn write_failures(&self) -> u64 {
        self.write_failures
    }

    // The file is opened and closed on every call; no handle outlives a write.
    fn append(&self, raw: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.fetched_tweets_filename)?;
        file.write_all(raw.as_bytes())?;
        if !raw.ends_with('\n') {
            file.write_all(b"\n")?;
        }
        Ok(())
    }
}

impl StreamListener for TwitterListener {
    fn on_data(&mut self, raw: &str) -> bool {
        if self.echo {
            println!("{}", raw);
        }

        match self.append(raw) {
            Ok(()) => {
                self.written += 1;
                debug!(bytes = raw.len(), "Appended stream payload");
                true
            }
            Err(e) => {
                self.write_failures += 1;
                error!(
                    path = %self.fetched_tweets_filename.display(),
                    failures = self.write_failures,
                    error = %e,
                    "Failed to append stream payload"
                );
                self.write_failure_policy == WriteFailurePolicy::Continue
            }
        }
    }

    fn on_error(&mut self, status: u16) -> bool {
        if status == RATE_LIMIT_STATUS {
            warn!(status, "Rate limited by stream endpoint, stopping");
            return false;
        }

        warn!(status, "Stream returned error status");
        self.error_policy == ErrorPolicy::StopOnRateLimit
    }
}
