//! Signed single-request access to the v1.1 REST API.

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::auth::{percent_encode, OAuthHandler};
use crate::config::ApiConfig;
use crate::error::{TwitterError, TwitterResult};
use crate::twitter_message::{Tweet, TwitterUser, UserRef};

const USER_TIMELINE: &str = "/1.1/statuses/user_timeline.json";
const HOME_TIMELINE: &str = "/1.1/statuses/home_timeline.json";
const FRIENDS_LIST: &str = "/1.1/friends/list.json";

/// One page of `friends/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct FriendsPage {
    pub users: Vec<TwitterUser>,
    /// Zero when there are no more pages.
    #[serde(default)]
    pub next_cursor: i64,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: OAuthHandler,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: OAuthHandler) -> TwitterResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("tweet-analyzer/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    /// Signed GET against `path`, decoding the JSON body.
    #[instrument(skip(self, params))]
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> TwitterResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let auth_header = self.session.sign("GET", &url, params)?;

        let full_url = if params.is_empty() {
            url
        } else {
            format!("{}?{}", url, encode_params(params))
        };

        debug!(url = %full_url, "Making Twitter API request");
        let response = self
            .client
            .get(&full_url)
            .header("Authorization", auth_header)
            .send()
            .await?;

        decode_response(response).await
    }

    /// Up to `count` tweets from `user`'s timeline, newest first.
    pub async fn user_timeline(
        &self,
        user: &UserRef,
        count: usize,
        max_id: Option<u64>,
    ) -> TwitterResult<Vec<Tweet>> {
        let mut params = vec![user.query_param()];
        params.extend(timeline_params(count, max_id));
        self.get(USER_TIMELINE, &params).await
    }

    /// Up to `count` tweets from the authenticated account's home timeline.
    pub async fn home_timeline(&self, count: usize, max_id: Option<u64>) -> TwitterResult<Vec<Tweet>> {
        self.get(HOME_TIMELINE, &timeline_params(count, max_id)).await
    }

    /// Accounts `user` follows; `cursor` is `-1` for the first page.
    pub async fn friends_list(
        &self,
        user: &UserRef,
        count: usize,
        cursor: i64,
    ) -> TwitterResult<FriendsPage> {
        let params = vec![
            user.query_param(),
            ("count".to_string(), count.to_string()),
            ("cursor".to_string(), cursor.to_string()),
            ("skip_status".to_string(), "true".to_string()),
        ];
        self.get(FRIENDS_LIST, &params).await
    }
}

fn timeline_params(count: usize, max_id: Option<u64>) -> Vec<(String, String)> {
    let mut params = vec![
        ("count".to_string(), count.to_string()),
        ("tweet_mode".to_string(), "extended".to_string()),
    ];
    if let Some(max_id) = max_id {
        params.push(("max_id".to_string(), max_id.to_string()));
    }
    params
}

/// Query/form encoding that matches what was signed.
pub(crate) fn encode_params(params: &[(String, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

async fn decode_response<T: DeserializeOwned>(response: Response) -> TwitterResult<T> {
    let status = response.status();
    let bytes = response.bytes().await?;

    if status.is_success() {
        return serde_json::from_slice(&bytes).map_err(TwitterError::from);
    }

    Err(TwitterError::Api {
        status: status.as_u16(),
        message: error_message(&bytes),
    })
}

/// First message from a v1.1 `{"errors": [...]}` body, or the raw body.
pub(crate) fn error_message(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody { errors }) if !errors.is_empty() => {
            let first = &errors[0];
            match first.code {
                Some(code) => format!("{} (code {})", first.message, code),
                None => first.message.clone(),
            }
        }
        _ => {
            let text = String::from_utf8_lossy(body).trim().to_string();
            if text.is_empty() {
                "Unknown error".to_string()
            } else {
                text
            }
        }
    }
}
