//! Command-line interface definitions.
//!
//! Defines all CLI arguments and subcommands using clap.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// postkit blog content toolkit CLI
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Project root directory (holds the template, data and generated pages)
    #[arg(short, long)]
    pub root: Option<PathBuf>,

    /// Config file name (default: postkit.toml)
    #[arg(short = 'C', long, default_value = "postkit.toml")]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Post fields shared by `new` and `edit`
#[derive(clap::Args, Debug, Clone, Default)]
pub struct PostArgs {
    /// Post slug, used as directory and file name
    #[arg(short, long)]
    pub slug: Option<String>,

    /// Publication date, e.g. "2024-01-01"
    #[arg(short, long)]
    pub date: Option<String>,

    /// Short summary shown in listings and page descriptions
    #[arg(short, long)]
    pub excerpt: Option<String>,

    /// Reading time label, e.g. "3 min read"
    #[arg(long = "read-time")]
    pub read_time: Option<String>,

    /// Markdown body file, `-` reads from stdin
    #[arg(short, long)]
    pub body: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// List posts in collection order
    List {
        /// Only show posts whose title or excerpt contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Print a post's metadata and markdown body
    Show {
        /// slug of the post
        slug: String,
    },

    /// Create a post and prepend it to the collection
    New {
        /// Post title
        #[arg(short, long)]
        title: String,

        #[command(flatten)]
        post: PostArgs,
    },

    /// Update an existing post in place
    Edit {
        /// current slug of the post
        slug: String,

        /// New title
        #[arg(short, long)]
        title: Option<String>,

        #[command(flatten)]
        post: PostArgs,
    },

    /// Copy an image into the assets directory and print its markdown
    Image {
        /// image file to copy
        path: PathBuf,
    },

    /// Stamp post and static page metadata into the html template
    Generate,

    /// Commit the working tree and push it
    Deploy {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Regenerate pages before committing
        #[arg(short, long)]
        generate: bool,
    },
}
