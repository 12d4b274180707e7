pub mod friends;
pub mod timeline;

use async_trait::async_trait;
use tracing::debug;

use crate::error::TwitterResult;

pub use friends::FriendsFeed;
pub use timeline::{HomeTimelineFeed, UserTimelineFeed};

/// Where the next page starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePosition {
    Start,
    /// Timelines: return items with an id at or below this one.
    MaxId(u64),
    /// Cursored collections such as friend lists.
    Cursor(i64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub count: usize,
    pub position: PagePosition,
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` once the source is exhausted.
    pub next: Option<PagePosition>,
}

/// An endpoint that returns its results one page at a time.
#[async_trait]
pub trait PagedFeed: Send + Sync {
    type Item: Send;

    async fn fetch_page(&self, request: PageRequest) -> TwitterResult<Page<Self::Item>>;
}

/// Collect up to `limit` items from `feed`, requesting at most `page_size`
/// per page.
///
/// Stops when `limit` is reached, a page comes back empty, or the feed has no
/// next page. Errors from any page are returned as-is.
pub async fn collect_items<F>(
    feed: &F,
    limit: usize,
    page_size: usize,
) -> TwitterResult<Vec<F::Item>>
where
    F: PagedFeed + ?Sized,
{
    let page_size = page_size.max(1);
    let mut items = Vec::with_capacity(limit.min(page_size));
    let mut position = PagePosition::Start;

    while items.len() < limit {
        let remaining = limit - items.len();
        let request = PageRequest {
            count: remaining.min(page_size),
            position,
        };

        let page = feed.fetch_page(request).await?;
        debug!(
            ?position,
            received = page.items.len(),
            collected = items.len(),
            "Fetched page"
        );

        if page.items.is_empty() {
            break;
        }
        items.extend(page.items.into_iter().take(remaining));

        match page.next {
            Some(next) => position = next,
            None => break,
        }
    }

    Ok(items)
}
