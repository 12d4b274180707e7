use tracing::info;

use crate::api::ApiClient;
use crate::auth::Authenticator;
use crate::config::Config;
use crate::error::{TwitterError, TwitterResult};
use crate::feeds::{collect_items, FriendsFeed, HomeTimelineFeed, UserTimelineFeed};
use crate::twitter_message::{Tweet, TwitterUser, UserRef};

/// Authenticated client for bounded timeline and friend-list fetches.
pub struct TwitterClient {
    api: ApiClient,
    twitter_user: Option<UserRef>,
    page_size: usize,
}

impl TwitterClient {
    /// `twitter_user` is the account user-scoped operations target; without it
    /// they fall back to the authenticated account where the API allows.
    pub fn new(config: &Config, twitter_user: Option<UserRef>) -> TwitterResult<Self> {
        let session = Authenticator::new(config.credentials.clone()).authenticate();
        Ok(Self {
            api: ApiClient::new(&config.api, session)?,
            twitter_user,
            page_size: config.api.page_size,
        })
    }

    /// The underlying API for single requests.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn twitter_user(&self) -> Option<&UserRef> {
        self.twitter_user.as_ref()
    }

    /// Up to `num_tweets` tweets from the target user's timeline, newest first.
    pub async fn get_user_timeline_tweets(&self, num_tweets: usize) -> TwitterResult<Vec<Tweet>> {
        let feed = UserTimelineFeed::new(&self.api, self.target()?);
        let tweets = collect_items(&feed, num_tweets, self.page_size).await?;
        info!(count = tweets.len(), "Fetched user timeline");
        Ok(tweets)
    }

    pub async fn get_friend_list(&self, num_friends: usize) -> TwitterResult<Vec<TwitterUser>> {
        let feed = FriendsFeed::new(&self.api, self.target()?);
        let friends = collect_items(&feed, num_friends, self.page_size).await?;
        info!(count = friends.len(), "Fetched friend list");
        Ok(friends)
    }

    /// Home timeline of the authenticated account; the target user is not
    /// consulted.
    pub async fn get_home_timeline_tweets(&self, num_tweets: usize) -> TwitterResult<Vec<Tweet>> {
        let feed = HomeTimelineFeed::new(&self.api);
        let tweets = collect_items(&feed, num_tweets, self.page_size).await?;
        info!(count = tweets.len(), "Fetched home timeline");
        Ok(tweets)
    }

    fn target(&self) -> TwitterResult<UserRef> {
        self.twitter_user
            .clone()
            .ok_or_else(|| TwitterError::Config("No target user set for this client".into()))
    }
}
