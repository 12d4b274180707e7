//! Filtered stream client.
//!
//! A reader task owns the HTTP connection and pushes messages into a bounded
//! channel; the consumer loop hands each one to a [`StreamListener`] and
//! closes the connection once the listener asks to stop.

use futures::StreamExt;
use reqwest::Client;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::encode_params;
use crate::auth::{Authenticator, OAuthHandler};
use crate::config::Config;
use crate::error::{TwitterError, TwitterResult};
use crate::listener::StreamListener;
use crate::twitter_parser::LineBuffer;

const FILTER_PATH: &str = "/1.1/statuses/filter.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent {
    /// One raw message as delivered by the service.
    Data(String),
    /// The endpoint refused the connection with this HTTP status.
    Status(u16),
}

/// Why a stream ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamOutcome {
    /// `on_data` returned `false`.
    StoppedByListener,
    /// `on_error` returned `false` for this status.
    StoppedOnStatus(u16),
    /// The connection ended on its own.
    Disconnected,
}

/// Opens filtered streams authenticated with the configured credentials.
pub struct Streamer {
    client: Client,
    filter_url: String,
    session: OAuthHandler,
    channel_capacity: usize,
}

impl Streamer {
    pub fn new(config: &Config) -> TwitterResult<Self> {
        // No overall timeout: the response body never finishes
        let client = Client::builder()
            .connect_timeout(config.api.timeout())
            .user_agent(concat!("tweet-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            filter_url: format!(
                "{}{}",
                config.api.stream_url.trim_end_matches('/'),
                FILTER_PATH
            ),
            session: Authenticator::new(config.credentials.clone()).authenticate(),
            channel_capacity: config.stream.channel_capacity.max(1),
        })
    }

    /// Stream messages matching any of `track` into `listener` until it asks
    /// to stop or the connection ends. Does not reconnect.
    pub async fn stream<L>(&self, track: &[String], listener: &mut L) -> TwitterResult<StreamOutcome>
    where
        L: StreamListener + ?Sized,
    {
        let mut connection = self.connect(track)?;
        let outcome = drive(connection.events(), listener).await;
        match outcome {
            StreamOutcome::Disconnected => connection.finish().await?,
            StreamOutcome::StoppedByListener | StreamOutcome::StoppedOnStatus(_) => {
                connection.close()
            }
        }
        info!(?outcome, "Stream closed");
        Ok(outcome)
    }

    /// Start the reader task and return the receiving end of the connection.
    pub fn connect(&self, track: &[String]) -> TwitterResult<StreamConnection> {
        let keywords: Vec<&str> = track
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();
        if keywords.is_empty() {
            return Err(TwitterError::Config(
                "At least one track keyword is required".into(),
            ));
        }

        let params = vec![("track".to_string(), keywords.join(","))];
        let auth_header = self.session.sign("POST", &self.filter_url, &params)?;
        let request = self
            .client
            .post(&self.filter_url)
            .header("Authorization", auth_header)
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body(encode_params(&params));

        let (event_tx, event_rx) = mpsc::channel(self.channel_capacity);
        info!(url = %self.filter_url, track = %params[0].1, "Connecting to filtered stream");
        let reader = tokio::spawn(read_stream(request, event_tx));

        Ok(StreamConnection {
            events: event_rx,
            reader,
        })
    }
}

/// A live stream: the event receiver plus the task feeding it.
///
/// Dropping or closing it cancels the reader and releases the connection.
pub struct StreamConnection {
    events: mpsc::Receiver<StreamEvent>,
    reader: JoinHandle<TwitterResult<()>>,
}

impl StreamConnection {
    pub fn events(&mut self) -> &mut mpsc::Receiver<StreamEvent> {
        &mut self.events
    }

    pub fn close(mut self) {
        self.events.close();
        self.reader.abort();
    }

    /// Wait for the reader to exit and return its connect error, if any.
    pub async fn finish(mut self) -> TwitterResult<()> {
        self.events.close();
        match (&mut self.reader).await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => Err(TwitterError::Stream(format!("Stream reader failed: {e}"))),
        }
    }
}

impl Drop for StreamConnection {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

/// Hand every event to `listener` until it asks to stop or the channel closes.
pub async fn drive<L>(events: &mut mpsc::Receiver<StreamEvent>, listener: &mut L) -> StreamOutcome
where
    L: StreamListener + ?Sized,
{
    while let Some(event) = events.recv().await {
        match event {
            StreamEvent::Data(raw) => {
                if !listener.on_data(&raw) {
                    return StreamOutcome::StoppedByListener;
                }
            }
            StreamEvent::Status(status) => {
                if !listener.on_error(status) {
                    return StreamOutcome::StoppedOnStatus(status);
                }
            }
        }
    }
    StreamOutcome::Disconnected
}

/// Fails only when the connection could not be opened; a connection that
/// drops after opening ends the stream normally.
async fn read_stream(
    request: reqwest::RequestBuilder,
    event_tx: mpsc::Sender<StreamEvent>,
) -> TwitterResult<()> {
    let response = request
        .send()
        .await
        .map_err(|e| TwitterError::Stream(format!("Failed to connect to stream: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), body = %body, "Stream connection refused");
        // receiver may already be gone; nothing left to do either way
        let _ = event_tx.send(StreamEvent::Status(status.as_u16())).await;
        return Ok(());
    }

    info!("Connected to filtered stream");
    let mut body = response.bytes_stream();
    let mut lines = LineBuffer::new();

    while let Some(chunk) = body.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                warn!(error = %e, "Stream connection interrupted");
                return Ok(());
            }
        };

        for message in lines.push(&chunk) {
            if event_tx.send(StreamEvent::Data(message)).await.is_err() {
                debug!("Event receiver dropped, stopping reader");
                return Ok(());
            }
        }
    }

    if let Some(rest) = lines.finish() {
        let _ = event_tx.send(StreamEvent::Data(rest)).await;
    }
    info!("Stream ended by server");
    Ok(())
}
