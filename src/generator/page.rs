//! Metadata stamping for a single page.
//!
//! The template is plain html whose head carries the site-wide title,
//! description and canonical url. Each generated page is the template with
//! those four literal snippets swapped for page-specific values:
//!
//! ```html
//! <title>My Personal Space</title>                                  <!-- title tag -->
//! <meta property="og:title" content="My Personal Space">            <!-- page title -->
//! <meta name="description" content="Personal Website & Blog of ..."> <!-- description -->
//! <meta property="og:url" content="https://blog.robertopatovsky.com/"> <!-- url -->
//! ```
//!
//! There is no escaping and no parsing: a snippet missing from the template
//! is simply left alone.

use crate::{
    config::{BaseConfig, PageConfig},
    data::Post,
};

/// Literal snippets searched for in the template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    pub title_tag: String,
    pub page_title: String,
    pub description: String,
    pub url: String,
}

impl Markers {
    /// Markers as the site-wide values appear in the template.
    pub fn from_base(base: &BaseConfig) -> Self {
        Self {
            title_tag: title_tag(&base.title),
            page_title: content_attr(&base.title),
            description: content_attr(&base.description),
            url: content_attr(&format!("{}/", base.url)),
        }
    }
}

/// Values stamped into one generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    /// Text of the `<title>` tag
    pub document_title: String,
    /// Replacement for the page title `content` attribute
    pub page_title: String,
    pub description: String,
    /// Canonical url of the page
    pub url: String,
}

impl PageMeta {
    /// Metadata for a post page at `<url>/<section>/<slug>`.
    pub fn for_post(post: &Post, base: &BaseConfig, section: &str) -> Self {
        Self {
            document_title: format!("{} | {}", post.title, base.author),
            page_title: post.title.clone(),
            description: post.description().to_owned(),
            url: format!("{}/{section}/{}", base.url, post.slug),
        }
    }

    /// Metadata for a fixed page at `<url>/<slug>`.
    pub fn for_page(page: &PageConfig, base: &BaseConfig) -> Self {
        let document_title = format!("{} | {}", page.title, base.author);
        Self {
            page_title: document_title.clone(),
            document_title,
            description: page.description.clone(),
            url: format!("{}/{}", base.url, page.slug),
        }
    }
}

/// Stamp `meta` into `template`, replacing every occurrence of each marker.
pub fn render(template: &str, markers: &Markers, meta: &PageMeta) -> String {
    template
        .replace(&markers.title_tag, &title_tag(&meta.document_title))
        .replace(&markers.page_title, &content_attr(&meta.page_title))
        .replace(&markers.description, &content_attr(&meta.description))
        .replace(&markers.url, &content_attr(&meta.url))
}

fn title_tag(text: &str) -> String {
    format!("<title>{text}</title>")
}

fn content_attr(value: &str) -> String {
    format!("content=\"{value}\"")
}
