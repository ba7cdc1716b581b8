use std::str::FromStr;
use std::time::Duration;

use crate::error::FetchError;
use crate::models::ItemId;

pub const TOP_STORIES_ENDPOINT: &str = "https://hacker-news.firebaseio.com/v0/topstories.json";
pub const ITEM_ENDPOINT_TEMPLATE: &str = "https://hacker-news.firebaseio.com/v0/item/{id}.json";
pub const ITEM_ID_PLACEHOLDER: &str = "{id}";

pub const MAX_STORIES: usize = 500;
pub const MAX_COMMENTS: usize = 10;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_FETCH_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub top_stories_url: String,
    /// Item URL with `{id}` where the item id goes.
    pub item_url_template: String,
    pub max_stories: usize,
    pub max_comments: usize,
    pub request_timeout: Duration,
    /// Worker threads used to fan out list loads. 1 means sequential.
    pub fetch_concurrency: usize,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            top_stories_url: TOP_STORIES_ENDPOINT.to_string(),
            item_url_template: ITEM_ENDPOINT_TEMPLATE.to_string(),
            max_stories: MAX_STORIES,
            max_comments: MAX_COMMENTS,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            fetch_concurrency: DEFAULT_FETCH_CONCURRENCY,
            user_agent: concat!("hacker_news_data/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl ClientConfig {
    /// Defaults, overridden by any `HN_*` variables that are set and parse.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            top_stories_url: env_string_or("HN_TOP_STORIES_URL", defaults.top_stories_url),
            item_url_template: env_string_or("HN_ITEM_URL_TEMPLATE", defaults.item_url_template),
            max_stories: env_var_or("HN_MAX_STORIES", defaults.max_stories),
            max_comments: env_var_or("HN_MAX_COMMENTS", defaults.max_comments),
            request_timeout: env_var("HN_REQUEST_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            fetch_concurrency: env_var_or("HN_FETCH_CONCURRENCY", defaults.fetch_concurrency),
            user_agent: env_string_or("HN_USER_AGENT", defaults.user_agent),
        }
    }

    pub fn with_endpoints(
        mut self,
        top_stories_url: impl Into<String>,
        item_url_template: impl Into<String>,
    ) -> Self {
        self.top_stories_url = top_stories_url.into();
        self.item_url_template = item_url_template.into();
        self
    }

    pub fn with_limits(mut self, max_stories: usize, max_comments: usize) -> Self {
        self.max_stories = max_stories;
        self.max_comments = max_comments;
        self
    }

    pub fn with_fetch_concurrency(mut self, workers: usize) -> Self {
        self.fetch_concurrency = workers;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn item_url(&self, id: ItemId) -> Result<String, FetchError> {
        if !self.item_url_template.contains(ITEM_ID_PLACEHOLDER) {
            return Err(FetchError::invalid_endpoint(
                &self.item_url_template,
                format!("item URL template has no {ITEM_ID_PLACEHOLDER} placeholder"),
            ));
        }
        Ok(self
            .item_url_template
            .replace(ITEM_ID_PLACEHOLDER, &id.to_string()))
    }

    pub(crate) fn workers(&self) -> usize {
        self.fetch_concurrency.max(1)
    }
}

fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_var_or<T: FromStr>(key: &str, default: T) -> T {
    env_var(key).unwrap_or(default)
}

fn env_string_or(key: &str, default: String) -> String {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => value,
        _ => default,
    }
}
