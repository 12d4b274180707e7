use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::twitter_parser::twitter_date;

/// A tweet as returned by the v1.1 REST and streaming endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tweet {
    pub id: u64,
    /// `full_text` when requested with `tweet_mode=extended`
    #[serde(alias = "full_text")]
    pub text: String,
    #[serde(with = "twitter_date")]
    pub created_at: DateTime<Utc>,
    pub user: TwitterUser,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub favorite_count: u64,
    #[serde(default)]
    pub retweet_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterUser {
    pub id: u64,
    pub name: String,
    pub screen_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friends_count: Option<u64>,
}

/// The account an operation targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserRef {
    Id(u64),
    ScreenName(String),
}

impl UserRef {
    /// Numeric input is a user id, anything else a screen name (`@` optional).
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        match input.parse::<u64>() {
            Ok(id) => Self::Id(id),
            Err(_) => Self::ScreenName(input.trim_start_matches('@').to_string()),
        }
    }

    /// Query parameter identifying this user.
    pub fn query_param(&self) -> (String, String) {
        match self {
            Self::Id(id) => ("user_id".to_string(), id.to_string()),
            Self::ScreenName(name) => ("screen_name".to_string(), name.clone()),
        }
    }
}

impl From<&str> for UserRef {
    fn from(input: &str) -> Self {
        Self::parse(input)
    }
}

impl fmt::Display for UserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{}", id),
            Self::ScreenName(name) => write!(f, "@{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const TIMELINE_TWEET: &str = r#"{
        "created_at": "Wed Oct 10 20:19:24 +0000 2018",
        "id": 1050118621198921728,
        "id_str": "1050118621198921728",
        "full_text": "To make room for more expression, we will now count all emojis as equal",
        "source": "<a href=\"http://twitter.com\" rel=\"nofollow\">Twitter Web Client</a>",
        "user": {"id": 6253282, "name": "Twitter API", "screen_name": "TwitterAPI", "followers_count": 6133636},
        "retweet_count": 161,
        "favorite_count": 296
    }"#;

    #[test]
    fn test_deserialize_extended_tweet() {
        let tweet: Tweet = serde_json::from_str(TIMELINE_TWEET).unwrap();
        assert_eq!(tweet.id, 1050118621198921728);
        assert!(tweet.text.starts_with("To make room"));
        assert_eq!(
            tweet.created_at,
            Utc.with_ymd_and_hms(2018, 10, 10, 20, 19, 24).unwrap()
        );
        assert_eq!(tweet.user.name, "Twitter API");
        assert_eq!(tweet.user.followers_count, Some(6133636));
        assert_eq!(tweet.favorite_count, 296);
        assert_eq!(tweet.retweet_count, 161);
    }

    #[test]
    fn test_deserialize_compat_text_and_missing_counts() {
        let json = r#"{
            "created_at": "Thu Apr 06 15:24:15 +0000 2017",
            "id": 850006245121695744,
            "text": "1/ Today we are sharing our vision",
            "user": {"id": 2244994945, "name": "Twitter Dev", "screen_name": "TwitterDev"}
        }"#;
        let tweet: Tweet = serde_json::from_str(json).unwrap();
        assert_eq!(tweet.text, "1/ Today we are sharing our vision");
        assert_eq!(tweet.source, "");
        assert_eq!(tweet.favorite_count, 0);
        assert_eq!(tweet.user.friends_count, None);
    }

    #[test]
    fn test_user_ref_parse() {
        assert_eq!(UserRef::parse("gucci"), UserRef::ScreenName("gucci".into()));
        assert_eq!(UserRef::parse("@gucci"), UserRef::ScreenName("gucci".into()));
        assert_eq!(UserRef::parse("783214"), UserRef::Id(783214));
        assert_eq!(
            UserRef::parse("783214").query_param(),
            ("user_id".to_string(), "783214".to_string())
        );
        assert_eq!(UserRef::from("@jack").to_string(), "@jack");
    }
}
