use std::sync::Arc;
use std::thread;

use tracing::{debug, error, info};

use crate::cache::ItemCache;
use crate::config::ClientConfig;
use crate::error::{FetchError, FetchFailure, Fetched};
use crate::fields::{extract_i32, extract_i64, extract_string, extract_u64, parse_object};
use crate::models::{Comment, ItemId, Story, StoryDetails};
use crate::scanner::{extract_int_array, scan_int_array};
use crate::transport::{HttpTransport, Transport};

const KIDS_FIELD: &str = "kids";

/// The four lookups the presentation layer is built against.
///
/// Every method returns something usable; failures are logged and turned into
/// empty lists or zero-valued items.
pub trait DataLayer {
    fn get_top_stories(&self) -> Vec<Story>;
    fn get_specific_news(&self, id: ItemId) -> Story;
    fn get_specific_comment(&self, id: ItemId) -> Comment;
    fn get_comments_from_news(&self, news: &Story) -> Vec<Comment>;
}

/// Reads stories and comments through a session cache.
///
/// Clones share the cache and the transport, so a clone can be moved to a
/// loader thread and everything it fetches is visible to every other clone.
#[derive(Clone)]
pub struct HackerNewsClient {
    transport: Arc<dyn Transport>,
    cache: Arc<ItemCache>,
    config: Arc<ClientConfig>,
}

impl HackerNewsClient {
    pub fn new() -> Result<Self, FetchError> {
        Self::from_config(ClientConfig::default())
    }

    pub fn from_config(config: ClientConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::new(config.request_timeout, &config.user_agent)?;
        Ok(Self::with_transport(config, Arc::new(transport), ItemCache::shared()))
    }

    pub fn with_transport(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        cache: Arc<ItemCache>,
    ) -> Self {
        Self {
            transport,
            cache,
            config: Arc::new(config),
        }
    }

    pub fn cache(&self) -> &Arc<ItemCache> {
        &self.cache
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Ids of the current top stories, capped at `max_stories`, in ranking order.
    pub fn top_story_ids(&self) -> Fetched<Vec<ItemId>> {
        match self.transport.fetch(&self.config.top_stories_url) {
            Ok(raw) => {
                let mut ids = scan_int_array(&raw);
                ids.truncate(self.config.max_stories);
                info!(count = ids.len(), "loaded top story ids");
                Fetched::ok(ids)
            }
            Err(err) => {
                error!(url = %self.config.top_stories_url, error = %err, "failed to load top stories");
                Fetched::degraded(Vec::new(), None, err)
            }
        }
    }

    pub fn top_stories(&self) -> Fetched<Vec<Story>> {
        let ids = self.top_story_ids();
        let mut stories = self.fetch_ordered(&ids.value, |id| self.story(id));
        let mut failures = ids.failures;
        failures.append(&mut stories.failures);
        stories.failures = failures;
        info!(
            count = stories.value.len(),
            failed = stories.failures.len(),
            "loaded top stories"
        );
        stories
    }

    pub fn try_story(&self, id: ItemId) -> Result<Arc<Story>, FetchError> {
        debug!(id, "story lookup");
        self.cache
            .stories
            .get_or_fetch(id, |id| self.fetch_story(id))
    }

    /// The story, or a placeholder carrying only `id` if it couldn't be loaded.
    pub fn story(&self, id: ItemId) -> Fetched<Story> {
        match self.try_story(id) {
            Ok(story) => Fetched::ok((*story).clone()),
            Err(err) => {
                error!(id, error = %err, "failed to load story");
                Fetched::degraded(Story::placeholder(id), Some(id), err)
            }
        }
    }

    pub fn try_comment(&self, id: ItemId) -> Result<Arc<Comment>, FetchError> {
        debug!(id, "comment lookup");
        self.cache
            .comments
            .get_or_fetch(id, |id| self.fetch_comment(id))
    }

    /// The comment without any reply attached, or a placeholder on failure.
    pub fn comment(&self, id: ItemId) -> Fetched<Comment> {
        match self.try_comment(id) {
            Ok(comment) => Fetched::ok((*comment).clone()),
            Err(err) => {
                error!(id, error = %err, "failed to load comment");
                Fetched::degraded(Comment::placeholder(id), Some(id), err)
            }
        }
    }

    /// The first `max_comments` top-level comments, each with its first reply.
    pub fn comments_for_story(&self, story: &Story) -> Fetched<Vec<Comment>> {
        let limit = story.child_comment_ids.len().min(self.config.max_comments);
        let ids = &story.child_comment_ids[..limit];
        let comments = self.fetch_ordered(ids, |id| self.comment_with_latest_reply(id));
        info!(
            story = story.id,
            count = comments.value.len(),
            failed = comments.failures.len(),
            "loaded comments"
        );
        comments
    }

    pub fn story_details(&self, id: ItemId) -> Fetched<StoryDetails> {
        let Fetched {
            value: story,
            mut failures,
        } = self.story(id);
        let comments = self.comments_for_story(&story);
        failures.extend(comments.failures);
        Fetched {
            value: StoryDetails {
                story,
                comments: comments.value,
            },
            failures,
        }
    }

    // The copy handed back gets the reply; the cached comment never does.
    fn comment_with_latest_reply(&self, id: ItemId) -> Fetched<Comment> {
        let mut fetched = self.comment(id);
        if let Some(reply_id) = fetched.value.first_child_id() {
            match self.try_comment(reply_id) {
                Ok(reply) => fetched.value.latest_reply = Some(Box::new((*reply).clone())),
                Err(err) => {
                    error!(id, reply_id, error = %err, "failed to load latest reply");
                    fetched.failures.push(FetchFailure {
                        id: Some(reply_id),
                        error: err,
                    });
                }
            }
        }
        fetched
    }

    fn fetch_story(&self, id: ItemId) -> Result<Story, FetchError> {
        let url = self.config.item_url(id)?;
        let raw = self.transport.fetch(&url)?;
        decode_story(id, &raw)
    }

    fn fetch_comment(&self, id: ItemId) -> Result<Comment, FetchError> {
        let url = self.config.item_url(id)?;
        let raw = self.transport.fetch(&url)?;
        decode_comment(id, &raw)
    }

    /// Run `load` for every id, spread over contiguous chunks on scoped worker
    /// threads. Results come back in `ids` order.
    fn fetch_ordered<T, F>(&self, ids: &[ItemId], load: F) -> Fetched<Vec<T>>
    where
        T: Send,
        F: Fn(ItemId) -> Fetched<T> + Sync,
    {
        let workers = self.config.workers().min(ids.len());
        let results: Vec<Fetched<T>> = if workers <= 1 {
            ids.iter().map(|&id| load(id)).collect()
        } else {
            let chunk_len = ids.len().div_ceil(workers);
            let load = &load;
            thread::scope(|scope| {
                let handles: Vec<_> = ids
                    .chunks(chunk_len)
                    .map(|chunk| {
                        scope.spawn(move || chunk.iter().map(|&id| load(id)).collect::<Vec<_>>())
                    })
                    .collect();
                handles
                    .into_iter()
                    .flat_map(|handle| {
                        handle
                            .join()
                            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
                    })
                    .collect()
            })
        };

        let mut merged = Fetched::ok(Vec::with_capacity(results.len()));
        for result in results {
            merged.value.push(result.value);
            merged.failures.extend(result.failures);
        }
        merged
    }
}

impl DataLayer for HackerNewsClient {
    fn get_top_stories(&self) -> Vec<Story> {
        self.top_stories().into_value()
    }

    fn get_specific_news(&self, id: ItemId) -> Story {
        self.story(id).into_value()
    }

    fn get_specific_comment(&self, id: ItemId) -> Comment {
        self.comment(id).into_value()
    }

    fn get_comments_from_news(&self, news: &Story) -> Vec<Comment> {
        self.comments_for_story(news).into_value()
    }
}

pub fn decode_story(id: ItemId, raw: &[u8]) -> Result<Story, FetchError> {
    let object = parse_object(raw)?;
    Ok(Story {
        id,
        title: extract_string("title", &object),
        author: extract_string("by", &object),
        score: extract_i32("score", &object),
        published_at: extract_i64("time", &object),
        url: extract_string("url", &object),
        child_comment_ids: extract_int_array(KIDS_FIELD, raw),
    })
}

pub fn decode_comment(id: ItemId, raw: &[u8]) -> Result<Comment, FetchError> {
    let object = parse_object(raw)?;
    Ok(Comment {
        id,
        parent_id: extract_u64("parent", &object),
        author: extract_string("by", &object),
        body: extract_string("text", &object),
        published_at: extract_i64("time", &object),
        child_comment_ids: extract_int_array(KIDS_FIELD, raw),
        latest_reply: None,
    })
}
