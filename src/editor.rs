//! Post editing operations.
//!
//! A [`Draft`] is what the user is working on: the post fields, its markdown
//! body, and the slug it was opened under (if any). Saving a draft upserts it
//! into the collection by that original slug and writes both files.

use crate::{
    config::SiteConfig,
    data::{Placement, Post, PostStore},
    log,
    utils::slug::slugify,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Reading time given to new drafts
const DEFAULT_READ_TIME: &str = "5 min read";

/// Date format used for new drafts
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Image extensions accepted by [`Editor::insert_image`]
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("Title and slug are required")]
    MissingField,

    #[error("`{0}` is not a supported image (png, jpg, jpeg, gif, webp)")]
    UnsupportedImage(PathBuf),
}

/// A post being edited, not yet saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    /// Slug the post was opened under; `None` for a new post
    pub original_slug: Option<String>,
    pub post: Post,
    pub body: String,
}

impl Draft {
    /// Blank draft dated `today`.
    pub fn new(today: NaiveDate) -> Self {
        Self {
            original_slug: None,
            post: Post {
                date: today.format(DATE_FORMAT).to_string(),
                read_time: DEFAULT_READ_TIME.into(),
                ..Default::default()
            },
            body: String::new(),
        }
    }

    /// Set the title, deriving the slug from it while none is set.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.post.title = title.into();
        if self.post.slug.is_empty() {
            self.post.slug = slugify(&self.post.title);
        }
    }

    fn validate(&self) -> Result<(), EditorError> {
        if self.post.title.trim().is_empty() || self.post.slug.trim().is_empty() {
            return Err(EditorError::MissingField);
        }
        Ok(())
    }
}

/// Current local date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Editing session over the post store.
pub struct Editor<'a> {
    config: &'a SiteConfig,
    store: PostStore,
}

impl<'a> Editor<'a> {
    pub fn open(config: &'a SiteConfig) -> Result<Self> {
        let store = PostStore::open(config)?;
        Ok(Self { config, store })
    }

    pub fn store(&self) -> &PostStore {
        &self.store
    }

    /// Blank draft dated today.
    pub fn new_draft(&self) -> Draft {
        Draft::new(today())
    }

    /// Draft populated from an existing post and its body.
    pub fn edit(&self, slug: &str) -> Result<Draft> {
        let post = self.store.get(slug)?.clone();
        let body = self.store.read_body(slug)?;
        Ok(Draft {
            original_slug: Some(post.slug.clone()),
            post,
            body,
        })
    }

    /// Save a draft: update the collection, then write the body.
    ///
    /// Nothing is written when the title or slug is blank. The body is
    /// stored trimmed. When the slug changed, the old body file stays.
    pub fn save(&mut self, draft: Draft) -> Result<Placement> {
        draft.validate()?;

        let slug = draft.post.slug.clone();
        let placement = self
            .store
            .upsert(draft.original_slug.as_deref(), draft.post);

        self.store.save().context("Failed to save post collection")?;
        self.store
            .write_body(&slug, draft.body.trim())
            .context("Failed to save post content")?;

        match placement {
            Placement::Prepended => log!("store"; "added `{slug}`"),
            Placement::Replaced(i) => log!("store"; "updated `{slug}` at position {}", i + 1),
        }
        Ok(placement)
    }

    /// Copy an image into the assets directory and return its markdown.
    pub fn insert_image(&self, source: &Path) -> Result<String> {
        let is_image = source
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
        let filename = source
            .file_name()
            .and_then(|name| name.to_str())
            .filter(|_| is_image)
            .ok_or_else(|| EditorError::UnsupportedImage(source.to_path_buf()))?;

        let assets_dir = self.config.assets_dir();
        fs::create_dir_all(&assets_dir)
            .with_context(|| format!("Failed to create {}", assets_dir.display()))?;

        let dest = assets_dir.join(filename);
        if !same_file(source, &dest) {
            fs::copy(source, &dest).with_context(|| {
                format!("Failed to copy image {} to {}", source.display(), dest.display())
            })?;
        }

        Ok(image_markdown(&self.config.paths.assets, filename))
    }
}

/// Markdown image reference served from the assets directory.
fn image_markdown(assets: &Path, filename: &str) -> String {
    let web_dir = assets.to_string_lossy().replace('\\', "/");
    let web_dir = web_dir.trim_matches('/');
    format!("![Alt Text](/{web_dir}/{filename})")
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
