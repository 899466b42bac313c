//! Static page generation.
//!
//! Writes one `index.html` per post under `<output>/<slug>/` and one per
//! fixed page under `<root>/<slug>/`, each a copy of the template with the
//! page's metadata stamped in. Existing files are overwritten; the first I/O
//! error aborts the run and leaves whatever was already written.

mod page;

pub use page::{Markers, PageMeta, render};

use crate::{config::SiteConfig, data::PostStore, log};
use anyhow::{Context, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Name of the file written into each page directory.
const INDEX_FILE: &str = "index.html";

/// Pages written by one generation run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Generated {
    pub posts: Vec<PathBuf>,
    pub pages: Vec<PathBuf>,
}

impl Generated {
    pub fn len(&self) -> usize {
        self.posts.len() + self.pages.len()
    }
}

/// Generate every post page and fixed page from the store and template.
pub fn generate_site(config: &SiteConfig) -> Result<Generated> {
    let store = PostStore::open(config)?;

    let template_path = config.template_path();
    let template = fs::read_to_string(&template_path)
        .with_context(|| format!("Failed to read template {}", template_path.display()))?;

    let markers = Markers::from_base(&config.base);
    log!("generate"; "{} posts, {} pages", store.len(), config.pages.len());
    let mut generated = Generated::default();

    let output_dir = config.output_dir();
    let section = config.post_section();
    for post in store.posts() {
        log!("generate"; "{}", post.title);
        let html = render(&template, &markers, &PageMeta::for_post(post, &config.base, &section));
        generated.posts.push(write_page(&output_dir.join(&post.slug), &html)?);
    }

    let root = config.get_root();
    for page in &config.pages {
        log!("generate"; "{}", page.title);
        let html = render(&template, &markers, &PageMeta::for_page(page, &config.base));
        generated.pages.push(write_page(&root.join(&page.slug), &html)?);
    }

    log!("generate"; "done, {} pages written", generated.len());
    Ok(generated)
}

/// Write `html` to `<dir>/index.html`, creating `dir` as needed.
fn write_page(dir: &Path, html: &str) -> Result<PathBuf> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let path = dir.join(INDEX_FILE);
    fs::write(&path, html).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Post;
    use tempfile::TempDir;

    const TEMPLATE: &str = r#"<html><head>
<title>My Personal Space</title>
<meta name="description" content="Personal Website & Blog of Robert Opatovsky">
<meta property="og:title" content="My Personal Space">
<meta property="og:url" content="https://blog.robertopatovsky.com/">
</head></html>"#;

    fn site(posts: &[(&str, &str, &str)]) -> (TempDir, SiteConfig) {
        let dir = TempDir::new().unwrap();
        let mut config = SiteConfig::default();
        config.set_root(dir.path());
        fs::write(config.template_path(), TEMPLATE).unwrap();

        let mut store = PostStore::open(&config).unwrap();
        for (slug, title, excerpt) in posts.iter().rev() {
            store.upsert(
                None,
                Post {
                    slug: (*slug).into(),
                    title: (*title).into(),
                    excerpt: (*excerpt).into(),
                    ..Default::default()
                },
            );
        }
        store.save().unwrap();
        (dir, config)
    }

    #[test]
    fn test_one_file_per_post_and_page() {
        let (dir, config) = site(&[("hello", "Hello World", ""), ("second", "Second", "More")]);
        let generated = generate_site(&config).unwrap();

        assert_eq!(
            generated.posts,
            [
                dir.path().join("post/hello/index.html"),
                dir.path().join("post/second/index.html"),
            ]
        );
        assert_eq!(
            generated.pages,
            [
                dir.path().join("home/index.html"),
                dir.path().join("posts/index.html"),
            ]
        );
        assert_eq!(generated.len(), 4);
        for path in generated.posts.iter().chain(&generated.pages) {
            assert!(path.is_file(), "{} missing", path.display());
        }
    }

    #[test]
    fn test_post_output_is_stamped() {
        let (dir, config) = site(&[("hello", "Hello World", "")]);
        generate_site(&config).unwrap();

        let html = fs::read_to_string(dir.path().join("post/hello/index.html")).unwrap();
        assert!(html.contains("<title>Hello World | Robert Opatovsky</title>"));
        assert!(html.contains(r#"<meta name="description" content="Hello World">"#));
        assert!(html.contains(r#"content="https://blog.robertopatovsky.com/post/hello""#));

        let markers = Markers::from_base(&config.base);
        for marker in [&markers.title_tag, &markers.page_title, &markers.description, &markers.url] {
            assert!(!html.contains(marker.as_str()));
        }
    }

    #[test]
    fn test_custom_output_dir_moves_files_and_urls() {
        let (dir, mut config) = site(&[("hello", "Hello World", "")]);
        config.paths.output = PathBuf::from("p");
        generate_site(&config).unwrap();

        let html = fs::read_to_string(dir.path().join("p/hello/index.html")).unwrap();
        assert!(html.contains(r#"content="https://blog.robertopatovsky.com/p/hello""#));
        assert!(!dir.path().join("post/hello").exists());
    }

    #[test]
    fn test_home_page_output_is_stamped() {
        let (dir, config) = site(&[]);
        generate_site(&config).unwrap();

        let html = fs::read_to_string(dir.path().join("home/index.html")).unwrap();
        assert!(html.contains("<title>Home | Robert Opatovsky</title>"));
        assert!(html.contains(r#"og:title" content="Home | Robert Opatovsky""#));
        assert!(html.contains(r#"content="https://blog.robertopatovsky.com/home""#));
    }

    #[test]
    fn test_existing_output_is_overwritten() {
        let (dir, config) = site(&[("hello", "Hello World", "")]);
        let stale = dir.path().join("post/hello/index.html");
        fs::create_dir_all(stale.parent().unwrap()).unwrap();
        fs::write(&stale, "stale").unwrap();

        generate_site(&config).unwrap();

        assert_ne!(fs::read_to_string(&stale).unwrap(), "stale");
    }

    #[test]
    fn test_missing_template_aborts() {
        let (_dir, mut config) = site(&[("hello", "Hello World", "")]);
        config.paths.template = PathBuf::from("missing.html");

        let err = generate_site(&config).unwrap_err();
        assert!(format!("{err:#}").contains("missing.html"));
    }

    #[test]
    fn test_malformed_collection_aborts() {
        let (dir, config) = site(&[]);
        fs::write(dir.path().join("data/posts.json"), "not json").unwrap();

        assert!(generate_site(&config).is_err());
        assert!(!dir.path().join("home/index.html").exists());
    }
}
