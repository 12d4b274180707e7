use async_trait::async_trait;

use super::{Page, PagePosition, PageRequest, PagedFeed};
use crate::api::ApiClient;
use crate::error::TwitterResult;
use crate::twitter_message::{TwitterUser, UserRef};

/// First-page cursor for cursored v1.1 collections.
const FIRST_CURSOR: i64 = -1;

/// Accounts followed by a user, paged by cursor.
pub struct FriendsFeed<'a> {
    api: &'a ApiClient,
    user: UserRef,
}

impl<'a> FriendsFeed<'a> {
    pub fn new(api: &'a ApiClient, user: UserRef) -> Self {
        Self { api, user }
    }
}

#[async_trait]
impl<'a> PagedFeed for FriendsFeed<'a> {
    type Item = TwitterUser;

    async fn fetch_page(&self, request: PageRequest) -> TwitterResult<Page<TwitterUser>> {
        let cursor = match request.position {
            PagePosition::Cursor(cursor) => cursor,
            PagePosition::Start | PagePosition::MaxId(_) => FIRST_CURSOR,
        };

        let page = self
            .api
            .friends_list(&self.user, request.count, cursor)
            .await?;

        Ok(Page {
            items: page.users,
            next: next_cursor(page.next_cursor),
        })
    }
}

fn next_cursor(cursor: i64) -> Option<PagePosition> {
    (cursor != 0).then_some(PagePosition::Cursor(cursor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Authenticator;
    use crate::config::{ApiConfig, Credentials};
    use crate::feeds::collect_items;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_zero_cursor_ends_paging() {
        assert_eq!(next_cursor(0), None);
        assert_eq!(next_cursor(1234), Some(PagePosition::Cursor(1234)));
    }

    #[tokio::test]
    async fn test_friends_feed_follows_cursor_until_zero() {
        let server = MockServer::start().await;
        let users = |names: &[&str]| {
            names
                .iter()
                .enumerate()
                .map(|(i, name)| serde_json::json!({"id": i, "name": name, "screen_name": name}))
                .collect::<Vec<_>>()
        };

        Mock::given(method("GET"))
            .and(path("/1.1/friends/list.json"))
            .and(query_param("cursor", "-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "users": users(&["alice", "bob"]),
                "next_cursor": 77
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/1.1/friends/list.json"))
            .and(query_param("cursor", "77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "users": users(&["carol"]),
                "next_cursor": 0
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ApiConfig {
            api_url: server.uri(),
            ..Default::default()
        };
        let session = Authenticator::new(Credentials::new("a", "b", "c", "d")).authenticate();
        let api = ApiClient::new(&config, session).unwrap();

        let feed = FriendsFeed::new(&api, UserRef::parse("someone"));
        let friends = collect_items(&feed, 10, 2).await.unwrap();
        let names: Vec<&str> = friends.iter().map(|u| u.screen_name.as_str()).collect();
        assert_eq!(names, vec!["alice", "bob", "carol"]);
    }
}
