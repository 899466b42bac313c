//! Site deployment.
//!
//! Commits the whole working tree and pushes it, one blocking git call after
//! another. The first failing step aborts the rest; nothing is rolled back.

use crate::{config::SiteConfig, exec, log};
use anyhow::{Context, Result, bail};
use std::io::{self, BufRead, Write};

/// Git subcommand arguments, in execution order.
pub fn deploy_steps(config: &SiteConfig) -> [Vec<&str>; 3] {
    let deploy = &config.deploy;
    [
        vec!["add", "."],
        vec!["commit", "-m", deploy.message.as_str()],
        vec!["push", deploy.remote.as_str(), deploy.branch.as_str()],
    ]
}

/// Deploy the project root with git.
pub fn deploy_site(config: &SiteConfig) -> Result<()> {
    which::which("git").context("`git` not found in PATH")?;

    let root = config.get_root();
    for step in deploy_steps(config) {
        log!("git"; "{}", step.join(" "));
        let cmd: Vec<String> = std::iter::once("git")
            .chain(step)
            .map(String::from)
            .collect();
        exec!(root; cmd.as_slice();)?;
    }

    log!("deploy"; "pushed to {}/{}", config.deploy.remote, config.deploy.branch);
    Ok(())
}

/// Ask on the terminal before deploying.
pub fn confirm(config: &SiteConfig) -> Result<bool> {
    let mut stdout = io::stdout().lock();
    write!(
        stdout,
        "Deploy to {}/{}? [y/N] ",
        config.deploy.remote, config.deploy.branch
    )?;
    stdout.flush()?;

    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer)? == 0 {
        bail!("No answer on stdin, pass --yes to deploy without asking");
    }
    Ok(is_yes(&answer))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
