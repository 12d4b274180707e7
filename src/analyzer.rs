//! Column-oriented tabulation of fetched tweets.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

use crate::twitter_message::Tweet;

/// Tweet metadata laid out one vector per column, all of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TweetTable {
    pub tweets: Vec<String>,
    pub id: Vec<u64>,
    /// Character count of the matching `tweets` entry.
    pub len: Vec<usize>,
    pub date: Vec<DateTime<Utc>>,
    pub name: Vec<String>,
    pub source: Vec<String>,
    pub likes: Vec<u64>,
    pub retweets: Vec<u64>,
}

/// Borrowed view of a single column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Column<'a> {
    Text(&'a [String]),
    Count(&'a [u64]),
    Length(&'a [usize]),
    Date(&'a [DateTime<Utc>]),
}

impl Column<'_> {
    pub fn len(&self) -> usize {
        match self {
            Column::Text(values) => values.len(),
            Column::Count(values) => values.len(),
            Column::Length(values) => values.len(),
            Column::Date(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cell at `row` rendered for display.
    pub fn cell(&self, row: usize) -> Option<String> {
        match self {
            Column::Text(values) => values.get(row).cloned(),
            Column::Count(values) => values.get(row).map(ToString::to_string),
            Column::Length(values) => values.get(row).map(ToString::to_string),
            Column::Date(values) => values
                .get(row)
                .map(|date| date.format("%Y-%m-%d %H:%M:%S").to_string()),
        }
    }
}

impl TweetTable {
    pub const COLUMNS: [&'static str; 8] = [
        "tweets", "id", "len", "date", "name", "source", "likes", "retweets",
    ];

    pub fn num_rows(&self) -> usize {
        self.tweets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweets.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<Column<'_>> {
        let column = match name {
            "tweets" => Column::Text(&self.tweets),
            "id" => Column::Count(&self.id),
            "len" => Column::Length(&self.len),
            "date" => Column::Date(&self.date),
            "name" => Column::Text(&self.name),
            "source" => Column::Text(&self.source),
            "likes" => Column::Count(&self.likes),
            "retweets" => Column::Count(&self.retweets),
            _ => return None,
        };
        Some(column)
    }

    /// Last `n` cells of `column`, one `index  value` line each.
    pub fn render_tail(&self, column: &str, n: usize) -> Option<String> {
        let values = self.column(column)?;
        let start = values.len().saturating_sub(n);
        let width = values.len().to_string().len();

        let lines: Vec<String> = (start..values.len())
            .filter_map(|row| values.cell(row).map(|cell| format_row(row, width, cell)))
            .collect();
        Some(lines.join("\n"))
    }

    fn push(&mut self, tweet: &Tweet) {
        self.tweets.push(tweet.text.clone());
        self.id.push(tweet.id);
        self.len.push(tweet.text.chars().count());
        self.date.push(tweet.created_at);
        self.name.push(tweet.user.name.clone());
        self.source.push(tweet.source.clone());
        self.likes.push(tweet.favorite_count);
        self.retweets.push(tweet.retweet_count);
    }
}

fn format_row(row: usize, width: usize, cell: impl Display) -> String {
    format!("{:<width$}    {}", row, cell, width = width)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TweetAnalyzer;

impl TweetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    /// One row per tweet, in input order.
    pub fn tweets_to_table(&self, tweets: &[Tweet]) -> TweetTable {
        let mut table = TweetTable {
            tweets: Vec::with_capacity(tweets.len()),
            id: Vec::with_capacity(tweets.len()),
            len: Vec::with_capacity(tweets.len()),
            date: Vec::with_capacity(tweets.len()),
            name: Vec::with_capacity(tweets.len()),
            source: Vec::with_capacity(tweets.len()),
            likes: Vec::with_capacity(tweets.len()),
            retweets: Vec::with_capacity(tweets.len()),
        };
        for tweet in tweets {
            table.push(tweet);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::twitter_message::TwitterUser;
    use chrono::TimeZone;

    fn tweet(id: u64, text: &str) -> Tweet {
        Tweet {
            id,
            text: text.to_string(),
            created_at: Utc.with_ymd_and_hms(2019, 3, 1, 12, 0, id as u32 % 60).unwrap(),
            user: TwitterUser {
                id: 100,
                name: format!("User {}", id),
                screen_name: "user".into(),
                description: None,
                followers_count: None,
                friends_count: None,
            },
            source: "Twitter for iPhone".into(),
            favorite_count: id * 10,
            retweet_count: id,
        }
    }

    #[test]
    fn test_len_column_counts_characters() {
        let tweets = vec![tweet(1, "a"), tweet(2, "bb"), tweet(3, "ccc")];
        let table = TweetAnalyzer::new().tweets_to_table(&tweets);

        assert_eq!(table.num_rows(), 3);
        assert_eq!(table.len, vec![1, 2, 3]);
        assert_eq!(table.tweets, vec!["a", "bb", "ccc"]);
        assert_eq!(table.id, vec![1, 2, 3]);
    }

    #[test]
    fn test_empty_input_has_all_columns() {
        let table = TweetAnalyzer::new().tweets_to_table(&[]);
        assert!(table.is_empty());
        for name in TweetTable::COLUMNS {
            let column = table.column(name).unwrap();
            assert!(column.is_empty(), "column {}", name);
        }
    }

    #[test]
    fn test_len_is_not_byte_length() {
        let table = TweetAnalyzer::new().tweets_to_table(&[tweet(1, "café ☕"), tweet(2, "日本語")]);
        assert_eq!(table.len, vec![6, 3]);
    }

    #[test]
    fn test_columns_copied_from_tweets() {
        let table = TweetAnalyzer::new().tweets_to_table(&[tweet(4, "hi"), tweet(7, "yo")]);
        assert_eq!(table.name, vec!["User 4", "User 7"]);
        assert_eq!(table.source, vec!["Twitter for iPhone"; 2]);
        assert_eq!(table.likes, vec![40, 70]);
        assert_eq!(table.retweets, vec![4, 7]);
        assert_eq!(table.date[1], Utc.with_ymd_and_hms(2019, 3, 1, 12, 0, 7).unwrap());

        // every column has one entry per row
        for name in TweetTable::COLUMNS {
            assert_eq!(table.column(name).unwrap().len(), table.num_rows());
        }
    }

    #[test]
    fn test_unknown_column() {
        let table = TweetTable::default();
        assert!(table.column("sentiment").is_none());
        assert!(table.render_tail("sentiment", 10).is_none());
    }

    #[test]
    fn test_render_tail() {
        let tweets: Vec<Tweet> = (0..12).map(|i| tweet(i, "x")).collect();
        let table = TweetAnalyzer::new().tweets_to_table(&tweets);

        let rendered = table.render_tail("name", 3).unwrap();
        assert_eq!(rendered, "9     User 9\n10    User 10\n11    User 11");

        let all = table.render_tail("likes", 100).unwrap();
        assert_eq!(all.lines().count(), 12);
        assert_eq!(table.render_tail("likes", 0).unwrap(), "");
    }

    #[test]
    fn test_table_serializes_column_wise() {
        let table = TweetAnalyzer::new().tweets_to_table(&[tweet(1, "a")]);
        let json = serde_json::to_value(&table).unwrap();
        assert_eq!(json["len"], serde_json::json!([1]));
        assert_eq!(json["tweets"], serde_json::json!(["a"]));
    }
}
