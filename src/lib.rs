//! Fetch tweets from the Twitter v1.1 API, stream live tweets matching
//! keyword filters into a file, and tabulate tweet metadata.

pub mod analyzer;
pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod feeds;
pub mod listener;
pub mod stream;
pub mod twitter_message;
pub mod twitter_parser;

pub use analyzer::{TweetAnalyzer, TweetTable};
pub use auth::{Authenticator, OAuthHandler};
pub use client::TwitterClient;
pub use config::{Config, Credentials};
pub use error::{TwitterError, TwitterResult};
pub use listener::{StreamListener, TwitterListener};
pub use stream::{StreamOutcome, Streamer};
pub use twitter_message::{Tweet, TwitterUser, UserRef};
