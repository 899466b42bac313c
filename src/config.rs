//! Project configuration management.
//!
//! Handles loading, parsing, and validating the `postkit.toml` configuration file.

use crate::cli::Cli;
use anyhow::{Context, Result};
use educe::Educe;
use serde::Deserialize;
use std::{
    fs,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default values for serde deserialization
pub mod config_defaults {
    pub mod base {
        pub fn title() -> String {
            "My Personal Space".into()
        }
        pub fn description() -> String {
            "Personal Website & Blog of Robert Opatovsky".into()
        }
        pub fn author() -> String {
            "Robert Opatovsky".into()
        }
        pub fn url() -> String {
            "https://blog.robertopatovsky.com".into()
        }
    }

    pub mod paths {
        use std::path::PathBuf;

        pub fn root() -> Option<PathBuf> {
            None
        }
        pub fn data() -> PathBuf {
            "data/posts.json".into()
        }
        pub fn posts() -> PathBuf {
            "data/posts".into()
        }
        pub fn assets() -> PathBuf {
            "assets".into()
        }
        pub fn template() -> PathBuf {
            "index.html".into()
        }
        pub fn output() -> PathBuf {
            "post".into()
        }
    }

    pub mod pages {
        use crate::config::PageConfig;

        pub fn pages() -> Vec<PageConfig> {
            vec![
                PageConfig {
                    slug: "home".into(),
                    title: "Home".into(),
                    description: "Personal Website & Blog of Robert Opatovsky".into(),
                },
                PageConfig {
                    slug: "posts".into(),
                    title: "Posts".into(),
                    description: "Latest thoughts and writings by Robert Opatovsky".into(),
                },
            ]
        }
    }

    pub mod deploy {
        pub fn remote() -> String {
            "origin".into()
        }
        pub fn branch() -> String {
            "master".into()
        }
        pub fn message() -> String {
            "Content update via postkit".into()
        }
    }
}

/// `[base]` section in postkit.toml
///
/// The title, description and url double as the markers searched for in the
/// html template, so they must match what the template literally contains.
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct BaseConfig {
    /// Site title, as written in the template's `<title>` tag
    #[serde(default = "config_defaults::base::title")]
    #[educe(Default = config_defaults::base::title())]
    pub title: String,

    /// Site description, as written in the template's description meta tags
    #[serde(default = "config_defaults::base::description")]
    #[educe(Default = config_defaults::base::description())]
    pub description: String,

    /// Author name appended to page titles, e.g.: "Bob"
    #[serde(default = "config_defaults::base::author")]
    #[educe(Default = config_defaults::base::author())]
    pub author: String,

    /// Canonical site URL without trailing slash, e.g.: "https://example.com"
    #[serde(default = "config_defaults::base::url")]
    #[educe(Default = config_defaults::base::url())]
    pub url: String,
}

/// `[paths]` section in postkit.toml
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    /// Root directory path
    #[serde(default = "config_defaults::paths::root")]
    #[educe(Default = config_defaults::paths::root())]
    pub root: Option<PathBuf>,

    /// Post collection JSON file (relative to root)
    #[serde(default = "config_defaults::paths::data")]
    #[educe(Default = config_defaults::paths::data())]
    pub data: PathBuf,

    /// Directory of markdown bodies (relative to root)
    #[serde(default = "config_defaults::paths::posts")]
    #[educe(Default = config_defaults::paths::posts())]
    pub posts: PathBuf,

    /// Image assets directory (relative to root)
    #[serde(default = "config_defaults::paths::assets")]
    #[educe(Default = config_defaults::paths::assets())]
    pub assets: PathBuf,

    /// Html template (relative to root)
    #[serde(default = "config_defaults::paths::template")]
    #[educe(Default = config_defaults::paths::template())]
    pub template: PathBuf,

    /// Directory receiving one sub-directory per post (relative to root),
    /// also the url path of post pages
    #[serde(default = "config_defaults::paths::output")]
    #[educe(Default = config_defaults::paths::output())]
    pub output: PathBuf,
}

/// `[[pages]]` entry: a fixed page rendered at `<slug>/index.html`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageConfig {
    pub slug: String,
    pub title: String,
    pub description: String,
}

/// `[deploy]` section in postkit.toml
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct DeployConfig {
    /// Remote to push to
    #[serde(default = "config_defaults::deploy::remote")]
    #[educe(Default = config_defaults::deploy::remote())]
    pub remote: String,

    /// Branch to push
    #[serde(default = "config_defaults::deploy::branch")]
    #[educe(Default = config_defaults::deploy::branch())]
    pub branch: String,

    /// Commit message used for every deploy
    #[serde(default = "config_defaults::deploy::message")]
    #[educe(Default = config_defaults::deploy::message())]
    pub message: String,
}

/// Root configuration structure representing postkit.toml
#[derive(Debug, Clone, Educe, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct SiteConfig {
    /// Basic site information
    #[serde(default)]
    pub base: BaseConfig,

    /// File locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Fixed pages generated next to the posts
    #[serde(default = "config_defaults::pages::pages")]
    #[educe(Default = config_defaults::pages::pages())]
    pub pages: Vec<PageConfig>,

    /// Deployment settings
    #[serde(default)]
    pub deploy: DeployConfig,
}

impl SiteConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: SiteConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("Failed to parse `{}`", path.display()))
    }

    /// Load the config named on the command line, falling back to defaults
    /// when the file does not exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let root = match &cli.root {
            Some(root) => expand_tilde(root),
            None => PathBuf::from("./"),
        };
        let config_path = root.join(&cli.config);

        let mut config = if config_path.exists() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        if cli.root.is_some() || config.paths.root.is_none() {
            config.set_root(&root);
        }
        config.validate()?;
        Ok(config)
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        self.paths.root.as_deref().unwrap_or(Path::new("./"))
    }

    /// Set the root directory path
    pub fn set_root(&mut self, path: &Path) {
        self.paths.root = Some(path.to_path_buf())
    }

    /// Post collection JSON file
    pub fn data_path(&self) -> PathBuf {
        self.get_root().join(&self.paths.data)
    }

    /// Directory holding `<slug>.md` bodies
    pub fn posts_dir(&self) -> PathBuf {
        self.get_root().join(&self.paths.posts)
    }

    /// Image assets directory
    pub fn assets_dir(&self) -> PathBuf {
        self.get_root().join(&self.paths.assets)
    }

    /// Html template file
    pub fn template_path(&self) -> PathBuf {
        self.get_root().join(&self.paths.template)
    }

    /// Directory receiving `<slug>/index.html` for each post
    pub fn output_dir(&self) -> PathBuf {
        self.get_root().join(&self.paths.output)
    }

    /// Url path of post pages, `[paths].output` with `/` separators
    pub fn post_section(&self) -> String {
        self.paths
            .output
            .components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        let url = &self.base.url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(validation(format!(
                "[base.url] must start with http:// or https://, got `{url}`"
            )));
        }
        if url.ends_with('/') {
            return Err(validation(format!(
                "[base.url] must not end with `/`, got `{url}`"
            )));
        }

        let output = &self.paths.output;
        if output.is_absolute() || self.post_section().is_empty() {
            return Err(validation(format!(
                "[paths.output] must be a relative directory, got `{}`",
                output.display()
            )));
        }

        for page in &self.pages {
            if page.slug.trim().is_empty() || page.title.trim().is_empty() {
                return Err(validation("[[pages]] entries need a slug and a title"));
            }
        }

        let deploy = &self.deploy;
        for (name, value) in [
            ("remote", &deploy.remote),
            ("branch", &deploy.branch),
            ("message", &deploy.message),
        ] {
            if value.trim().is_empty() {
                return Err(validation(format!("[deploy.{name}] cannot be empty")));
            }
        }

        Ok(())
    }
}

fn validation(msg: impl Into<String>) -> anyhow::Error {
    ConfigError::Validation(msg.into()).into()
}

/// Expand a leading `~` to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Commands;
    use tempfile::TempDir;

    fn cli_for(root: &Path) -> Cli {
        Cli {
            root: Some(root.to_path_buf()),
            config: PathBuf::from("postkit.toml"),
            command: Commands::Generate,
        }
    }

    #[test]
    fn test_defaults_match_blog() {
        let config = SiteConfig::default();

        assert_eq!(config.base.title, "My Personal Space");
        assert_eq!(
            config.base.description,
            "Personal Website & Blog of Robert Opatovsky"
        );
        assert_eq!(config.base.author, "Robert Opatovsky");
        assert_eq!(config.base.url, "https://blog.robertopatovsky.com");
        assert_eq!(config.paths.data, PathBuf::from("data/posts.json"));
        assert_eq!(config.paths.output, PathBuf::from("post"));
        assert_eq!(config.deploy.remote, "origin");
        assert_eq!(config.deploy.branch, "master");

        let slugs: Vec<_> = config.pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, ["home", "posts"]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = SiteConfig::from_str("").unwrap();

        assert_eq!(config.base.author, "Robert Opatovsky");
        assert_eq!(config.pages.len(), 2);
        assert_eq!(config.paths.template, PathBuf::from("index.html"));
    }

    #[test]
    fn test_parse_full_config() {
        let config = r#"
            [base]
            title = "Alice's Notes"
            description = "Things Alice wrote"
            author = "Alice"
            url = "https://alice.dev"

            [paths]
            data = "content/posts.json"
            output = "p"

            [[pages]]
            slug = "about"
            title = "About"
            description = "Who is Alice"

            [deploy]
            branch = "main"
            message = "publish"
        "#;
        let config = SiteConfig::from_str(config).unwrap();

        assert_eq!(config.base.title, "Alice's Notes");
        assert_eq!(config.base.author, "Alice");
        assert_eq!(config.paths.data, PathBuf::from("content/posts.json"));
        assert_eq!(config.paths.posts, PathBuf::from("data/posts"));
        assert_eq!(config.paths.output, PathBuf::from("p"));
        assert_eq!(config.pages.len(), 1);
        assert_eq!(config.pages[0].slug, "about");
        assert_eq!(config.deploy.remote, "origin");
        assert_eq!(config.deploy.branch, "main");
        assert_eq!(config.deploy.message, "publish");
    }

    #[test]
    fn test_unknown_field_rejection() {
        let config = r#"
            [base]
            title = "Test"
            unknown_field = "should_fail"
        "#;
        let result = SiteConfig::from_str(config);

        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let mut config = SiteConfig::default();
        config.base.url = "blog.example.com".into();
        assert!(config.validate().is_err());

        config.base.url = "https://blog.example.com/".into();
        assert!(config.validate().is_err());

        config.base.url = "http://localhost:8000".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_deploy_message() {
        let mut config = SiteConfig::default();
        config.deploy.message = "  ".into();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("deploy.message"));
    }

    #[test]
    fn test_validate_rejects_untitled_page() {
        let mut config = SiteConfig::default();
        config.pages.push(PageConfig {
            slug: "about".into(),
            title: String::new(),
            description: String::new(),
        });

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_paths_join_root() {
        let mut config = SiteConfig::default();
        config.set_root(Path::new("/srv/blog"));

        assert_eq!(config.data_path(), PathBuf::from("/srv/blog/data/posts.json"));
        assert_eq!(config.posts_dir(), PathBuf::from("/srv/blog/data/posts"));
        assert_eq!(config.assets_dir(), PathBuf::from("/srv/blog/assets"));
        assert_eq!(config.template_path(), PathBuf::from("/srv/blog/index.html"));
        assert_eq!(config.output_dir(), PathBuf::from("/srv/blog/post"));
    }

    #[test]
    fn test_post_section_follows_output() {
        let mut config = SiteConfig::default();
        assert_eq!(config.post_section(), "post");

        config.paths.output = PathBuf::from("./blog/entries/");
        assert_eq!(config.post_section(), "blog/entries");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unusable_output() {
        let mut config = SiteConfig::default();
        config.paths.output = PathBuf::from("/srv/post");
        assert!(config.validate().is_err());

        config.paths.output = PathBuf::from(".");
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("paths.output"));
    }

    #[test]
    fn test_load_without_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = SiteConfig::load(&cli_for(dir.path())).unwrap();

        assert_eq!(config.get_root(), dir.path());
        assert_eq!(config.base.title, "My Personal Space");
    }

    #[test]
    fn test_load_reads_file_from_root() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("postkit.toml"),
            "[base]\nauthor = \"Alice\"\n",
        )
        .unwrap();

        let config = SiteConfig::load(&cli_for(dir.path())).unwrap();

        assert_eq!(config.base.author, "Alice");
        assert_eq!(config.data_path(), dir.path().join("data/posts.json"));
    }

    #[test]
    fn test_config_error_display() {
        let io_err = ConfigError::Io(
            PathBuf::from("test.toml"),
            std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
        );
        let display = format!("{}", io_err);
        assert!(display.contains("IO error"));
        assert!(display.contains("test.toml"));

        let validation_err = ConfigError::Validation("Test validation error".to_string());
        let display = format!("{}", validation_err);
        assert!(display.contains("Test validation error"));
    }
}
