pub mod api;
pub mod models;

use api::{RedditAPI, MAX_PAGE_SIZE};
use common::config::RedditConfig;
use common::{CandidateRecord, FeedSource, PipelineError, PipelineResult};
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use tracing::info;

/// Paging position within one listing.
struct Cursor {
    after: Option<String>,
    remaining: usize,
    exhausted: bool,
}

const LISTING_SORT: &str = "hot";

/// Hot subreddit listing as a [`FeedSource`]; the topic is the subreddit name.
pub struct RedditFeed {
    api: RedditAPI,
}

impl RedditFeed {
    pub fn new(config: &RedditConfig) -> PipelineResult<Self> {
        Ok(Self::from_api(RedditAPI::new(config)?))
    }

    pub fn from_api(api: RedditAPI) -> Self {
        Self { api }
    }
}

impl FeedSource for RedditFeed {
    fn fetch<'a>(
        &'a self,
        topic: &'a str,
        limit: usize,
    ) -> BoxStream<'a, PipelineResult<CandidateRecord>> {
        let start = Cursor {
            after: None,
            remaining: limit,
            exhausted: false,
        };

        stream::try_unfold(start, move |cursor| async move {
            if cursor.exhausted || cursor.remaining == 0 {
                return Ok::<_, PipelineError>(None);
            }

            let listing = self
                .api
                .get_listing(
                    topic,
                    LISTING_SORT,
                    cursor.remaining.min(MAX_PAGE_SIZE),
                    cursor.after.as_deref(),
                )
                .await
                .map_err(|e| PipelineError::SourceUnavailable(format!("r/{}: {:#}", topic, e)))?;

            let (mut page, after) = listing.into_candidates();
            page.truncate(cursor.remaining);
            info!("Fetched {} posts from r/{}/{}", page.len(), topic, LISTING_SORT);

            let next = Cursor {
                exhausted: after.is_none() || page.is_empty(),
                remaining: cursor.remaining - page.len(),
                after,
            };
            Ok(Some((
                stream::iter(page.into_iter().map(Ok::<_, PipelineError>)),
                next,
            )))
        })
        .try_flatten()
        .boxed()
    }

    fn name(&self) -> &'static str {
        "Reddit"
    }
}
