//! Bounded, memoized access to Hacker News stories and comments.
//!
//! ```no_run
//! use hacker_news_data::{HackerNewsClient, loader};
//!
//! let client = HackerNewsClient::new()?;
//! let background = client.clone();
//! let pending = loader::spawn_load(move || background.top_stories());
//!
//! if let Some(stories) = pending.wait() {
//!     for story in &stories.value {
//!         println!("{} ({} points)", story.title, story.score);
//!     }
//! }
//! # Ok::<(), hacker_news_data::FetchError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod fields;
pub mod hn_client;
pub mod loader;
pub mod models;
pub mod scanner;
pub mod telemetry;
pub mod time_format;
pub mod transport;

pub use cache::{EntityCache, ItemCache};
pub use config::{ClientConfig, MAX_COMMENTS, MAX_STORIES};
pub use error::{ErrorKind, FetchError, FetchFailure, Fetched};
pub use hn_client::{DataLayer, HackerNewsClient};
pub use models::{Comment, ItemId, Story, StoryDetails};
pub use transport::{HttpTransport, Transport};
