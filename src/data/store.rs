//! Post collection persistence.
//!
//! Loads and saves `posts.json` and the per-post markdown bodies.

use std::{fs, io, path::PathBuf};

use serde::Serialize;
use thiserror::Error;

use super::types::Post;
use crate::{config::SiteConfig, log};

/// Indentation used when writing `posts.json`.
const JSON_INDENT: &[u8] = b"    ";

/// Extension of markdown body files.
const BODY_EXT: &str = "md";

/// Post store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error when accessing `{0}`")]
    Io(PathBuf, #[source] io::Error),

    #[error("Failed to parse post collection `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),

    #[error("Post `{0}` not found")]
    NotFound(String),
}

/// Where a saved post ended up in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Replaced the entry at this index
    Replaced(usize),
    /// Inserted at the top
    Prepended,
}

/// In-memory post collection bound to its files on disk.
#[derive(Debug)]
pub struct PostStore {
    data_path: PathBuf,
    posts_dir: PathBuf,
    posts: Vec<Post>,
}

impl PostStore {
    /// Open the store at the locations named by the config.
    pub fn open(config: &SiteConfig) -> Result<Self, StoreError> {
        Self::load(config.data_path(), config.posts_dir())
    }

    /// Load `posts.json`.
    ///
    /// A missing file is an empty collection; malformed JSON is an error.
    pub fn load(data_path: PathBuf, posts_dir: PathBuf) -> Result<Self, StoreError> {
        let posts = match fs::read_to_string(&data_path) {
            Ok(content) => serde_json::from_str(&content)
                .map_err(|err| StoreError::Json(data_path.clone(), err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log!("warn"; "{} not found, starting with no posts", data_path.display());
                Vec::new()
            }
            Err(err) => return Err(StoreError::Io(data_path, err)),
        };

        Ok(Self {
            data_path,
            posts_dir,
            posts,
        })
    }

    /// Write the collection back to `posts.json`.
    pub fn save(&self) -> Result<(), StoreError> {
        let io_err = |err| StoreError::Io(self.data_path.clone(), err);

        if let Some(parent) = self.data_path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(JSON_INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.posts
            .serialize(&mut ser)
            .map_err(|err| StoreError::Json(self.data_path.clone(), err))?;

        fs::write(&self.data_path, buf).map_err(io_err)
    }

    /// All posts in collection order.
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Find a post by slug.
    pub fn find(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    /// Like [`find`](Self::find), but a missing post is an error.
    pub fn get(&self, slug: &str) -> Result<&Post, StoreError> {
        self.find(slug)
            .ok_or_else(|| StoreError::NotFound(slug.to_owned()))
    }

    /// Posts whose title or excerpt contains `query`, ignoring case.
    pub fn search(&self, query: &str) -> Vec<&Post> {
        let query = query.to_lowercase();
        self.posts.iter().filter(|p| p.matches(&query)).collect()
    }

    /// Insert or update a post.
    ///
    /// When `original_slug` names an existing entry it is replaced in place,
    /// otherwise the post goes to the top of the collection.
    pub fn upsert(&mut self, original_slug: Option<&str>, post: Post) -> Placement {
        let index = original_slug.and_then(|slug| self.posts.iter().position(|p| p.slug == slug));

        match index {
            Some(i) => {
                self.posts[i] = post;
                Placement::Replaced(i)
            }
            None => {
                self.posts.insert(0, post);
                Placement::Prepended
            }
        }
    }

    /// Path of the markdown body for `slug`.
    pub fn body_path(&self, slug: &str) -> PathBuf {
        self.posts_dir.join(format!("{slug}.{BODY_EXT}"))
    }

    /// Read a post's markdown body; a missing file reads as empty.
    pub fn read_body(&self, slug: &str) -> Result<String, StoreError> {
        let path = self.body_path(slug);
        match fs::read_to_string(&path) {
            Ok(body) => Ok(body),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(err) => Err(StoreError::Io(path, err)),
        }
    }

    /// Write a post's markdown body, creating the posts directory if needed.
    pub fn write_body(&self, slug: &str, body: &str) -> Result<(), StoreError> {
        fs::create_dir_all(&self.posts_dir)
            .map_err(|err| StoreError::Io(self.posts_dir.clone(), err))?;

        let path = self.body_path(slug);
        fs::write(&path, body).map_err(|err| StoreError::Io(path, err))
    }
}
