//! postkit - edit blog posts, stamp static pages, deploy with git.

mod cli;
mod config;
mod data;
mod deploy;
mod editor;
mod generator;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, PostArgs};
use config::SiteConfig;
use deploy::{confirm, deploy_site};
use editor::{Draft, Editor};
use generator::generate_site;
use std::{
    fs,
    io::{self, Read},
    path::Path,
};

fn main() {
    if let Err(err) = run() {
        utils::log::log_error(&err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::List { search } => list_posts(&config, search.as_deref()),
        Commands::Show { slug } => show_post(&config, slug),
        Commands::New { title, post } => {
            let mut editor = Editor::open(&config)?;
            let mut draft = editor.new_draft();
            apply_args(&mut draft, post)?;
            draft.set_title(title.as_str());
            editor.save(draft).map(|_| ())
        }
        Commands::Edit { slug, title, post } => {
            let mut editor = Editor::open(&config)?;
            let mut draft = editor.edit(slug)?;
            if let Some(title) = title {
                draft.post.title = title.clone();
            }
            apply_args(&mut draft, post)?;
            editor.save(draft).map(|_| ())
        }
        Commands::Image { path } => {
            let markdown = Editor::open(&config)?.insert_image(path)?;
            println!("{markdown}");
            Ok(())
        }
        Commands::Generate => generate_site(&config).map(|_| ()),
        Commands::Deploy { yes, generate } => {
            if !*yes && !confirm(&config)? {
                log!("deploy"; "cancelled");
                return Ok(());
            }
            if *generate {
                generate_site(&config)?;
            }
            deploy_site(&config)
        }
    }
}

/// Print posts in collection order, optionally filtered.
fn list_posts(config: &SiteConfig, search: Option<&str>) -> Result<()> {
    let editor = Editor::open(config)?;
    let store = editor.store();
    if store.is_empty() {
        log!("store"; "no posts yet");
        return Ok(());
    }
    let posts = match search {
        Some(query) => store.search(query),
        None => store.posts().iter().collect(),
    };

    for post in posts {
        println!("{:<10}  {:<24}  {}", post.date, post.slug, post.title);
    }
    Ok(())
}

/// Print one post's metadata followed by its body.
fn show_post(config: &SiteConfig, slug: &str) -> Result<()> {
    let draft = Editor::open(config)?.edit(slug)?;
    let post = &draft.post;

    println!("title:     {}", post.title);
    println!("slug:      {}", post.slug);
    println!("date:      {}", post.date);
    println!("excerpt:   {}", post.excerpt);
    println!("read time: {}", post.read_time);
    println!();
    println!("{}", draft.body);
    Ok(())
}

/// Copy the fields given on the command line into a draft.
fn apply_args(draft: &mut Draft, args: &PostArgs) -> Result<()> {
    let post = &mut draft.post;
    for (field, value) in [
        (&mut post.slug, &args.slug),
        (&mut post.date, &args.date),
        (&mut post.excerpt, &args.excerpt),
        (&mut post.read_time, &args.read_time),
    ] {
        if let Some(value) = value {
            *field = value.clone();
        }
    }

    if let Some(path) = &args.body {
        draft.body = read_body(path)?;
    }
    Ok(())
}

/// Read a markdown body from a file, or from stdin for `-`.
fn read_body(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut body = String::new();
        io::stdin()
            .read_to_string(&mut body)
            .context("Failed to read body from stdin")?;
        return Ok(body);
    }
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
