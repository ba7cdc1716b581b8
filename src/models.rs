use chrono::{DateTime, Utc};

use crate::time_format;

pub type ItemId = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Story {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub score: i32,
    /// Seconds since the Unix epoch, 0 when unknown.
    pub published_at: i64,
    /// Empty when the story has no external link (Ask HN and friends).
    pub url: String,
    pub child_comment_ids: Vec<ItemId>,
}

impl Story {
    /// A story with only its id set, returned when the real one can't be loaded.
    pub fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn has_external_link(&self) -> bool {
        !self.url.is_empty()
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        published(self.published_at)
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        time_ago(self.published_at, now)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub id: ItemId,
    pub parent_id: ItemId,
    pub author: String,
    /// Raw HTML as served, escaping is left to whoever renders it.
    pub body: String,
    pub published_at: i64,
    pub child_comment_ids: Vec<ItemId>,
    /// First reply, only filled in by `comments_for_story`.
    pub latest_reply: Option<Box<Comment>>,
}

impl Comment {
    pub fn placeholder(id: ItemId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    pub fn first_child_id(&self) -> Option<ItemId> {
        self.child_comment_ids.first().copied()
    }

    pub fn published(&self) -> Option<DateTime<Utc>> {
        published(self.published_at)
    }

    pub fn time_ago(&self, now: DateTime<Utc>) -> String {
        time_ago(self.published_at, now)
    }
}

/// A story together with the bounded comment list shown alongside it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoryDetails {
    pub story: Story,
    pub comments: Vec<Comment>,
}

fn published(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

fn time_ago(secs: i64, now: DateTime<Utc>) -> String {
    match published(secs) {
        Some(at) => {
            let elapsed = (now - at).num_milliseconds().max(0);
            time_format::format_timespan_ago_first_unit(elapsed as u64)
        }
        None => String::new(),
    }
}
