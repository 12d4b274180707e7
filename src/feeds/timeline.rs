use async_trait::async_trait;

use super::{Page, PagePosition, PageRequest, PagedFeed};
use crate::api::ApiClient;
use crate::error::TwitterResult;
use crate::twitter_message::{Tweet, UserRef};

pub struct UserTimelineFeed<'a> {
    api: &'a ApiClient,
    user: UserRef,
}

impl<'a> UserTimelineFeed<'a> {
    pub fn new(api: &'a ApiClient, user: UserRef) -> Self {
        Self { api, user }
    }
}

#[async_trait]
impl<'a> PagedFeed for UserTimelineFeed<'a> {
    type Item = Tweet;

    async fn fetch_page(&self, request: PageRequest) -> TwitterResult<Page<Tweet>> {
        let tweets = self
            .api
            .user_timeline(&self.user, request.count, max_id(request.position))
            .await?;
        Ok(timeline_page(tweets))
    }
}

/// The authenticated account's home timeline.
pub struct HomeTimelineFeed<'a> {
    api: &'a ApiClient,
}

impl<'a> HomeTimelineFeed<'a> {
    pub fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl<'a> PagedFeed for HomeTimelineFeed<'a> {
    type Item = Tweet;

    async fn fetch_page(&self, request: PageRequest) -> TwitterResult<Page<Tweet>> {
        let tweets = self
            .api
            .home_timeline(request.count, max_id(request.position))
            .await?;
        Ok(timeline_page(tweets))
    }
}

fn max_id(position: PagePosition) -> Option<u64> {
    match position {
        PagePosition::MaxId(id) => Some(id),
        PagePosition::Start | PagePosition::Cursor(_) => None,
    }
}

/// Next page continues just below the oldest tweet seen.
fn timeline_page(tweets: Vec<Tweet>) -> Page<Tweet> {
    let next = tweets
        .iter()
        .map(|tweet| tweet.id)
        .min()
        .and_then(|oldest| oldest.checked_sub(1))
        .map(PagePosition::MaxId);
    Page {
        items: tweets,
        next,
    }
}
