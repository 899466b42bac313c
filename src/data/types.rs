//! Data types persisted in the post collection.

use serde::{Deserialize, Serialize};

/// Metadata for a single post, one element of `posts.json`.
///
/// Field order is the on-disk key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// URL and file name of the post (e.g., "hello-world")
    pub slug: String,

    pub title: String,

    /// Publication date, free-form (usually "YYYY-MM-DD")
    #[serde(default)]
    pub date: String,

    /// Short summary, also used as the page description
    #[serde(default)]
    pub excerpt: String,

    /// Reading time label (e.g., "5 min read")
    #[serde(default, rename = "readTime")]
    pub read_time: String,
}

impl Post {
    /// Page description: the excerpt, or the title when there is none.
    pub fn description(&self) -> &str {
        if self.excerpt.is_empty() {
            &self.title
        } else {
            &self.excerpt
        }
    }

    /// Case-insensitive match against title and excerpt.
    ///
    /// `query` must already be lowercase.
    pub fn matches(&self, query: &str) -> bool {
        self.title.to_lowercase().contains(query) || self.excerpt.to_lowercase().contains(query)
    }
}
