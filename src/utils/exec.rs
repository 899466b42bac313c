//! External command execution utilities.
//!
//! Runs commands to completion, relays their diagnostics through `log!`,
//! and turns non-zero exits into errors.

use crate::log;
use anyhow::{Context, Result, bail};
use regex::Regex;
use std::{
    ffi::OsString,
    path::Path,
    process::{Command, Output},
    sync::OnceLock,
};

/// Run an external command with arguments, blocking until it exits.
///
/// # Examples
/// ```ignore
/// // Without working directory
/// exec!(["git"]; "status", "-s")?;
///
/// // With working directory
/// exec!(root; ["git"]; "commit", "-m", message)?;
///
/// // With custom filter
/// const QUIET: FilterRule = FilterRule::new(&["hint:"]);
/// exec!(filter=&QUIET; root; ["git"]; "push")?;
/// ```
#[macro_export]
macro_rules! exec {
    (filter=$filter:expr; $($rest:tt)*) => {
        $crate::exec_internal!(@parse_root $filter; $($rest)*)
    };
    ($($rest:tt)*) => {
        $crate::exec_internal!(@parse_root &$crate::utils::exec::EMPTY_FILTER; $($rest)*)
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! exec_internal {
    // With working directory
    (@parse_root $filter:expr; $root:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::exec(
            Some($root),
            &$crate::utils::exec::internal::to_cmd_vec($cmd),
            &$crate::utils::exec::internal::filter_args(&[$(::std::ffi::OsString::from($arg)),*]),
            $filter,
        )
    };
    // Without working directory
    (@parse_root $filter:expr; $cmd:expr; $($arg:expr),* $(,)?) => {
        $crate::utils::exec::exec(
            None,
            &$crate::utils::exec::internal::to_cmd_vec($cmd),
            &$crate::utils::exec::internal::filter_args(&[$(::std::ffi::OsString::from($arg)),*]),
            $filter,
        )
    };
}

#[doc(hidden)]
pub mod internal {
    use std::ffi::OsString;

    /// Trait for converting to command vector.
    pub trait ToCmd {
        fn to_cmd(self) -> Vec<OsString>;
    }

    impl<const N: usize> ToCmd for [&str; N] {
        #[inline]
        fn to_cmd(self) -> Vec<OsString> {
            self.into_iter().map(OsString::from).collect()
        }
    }

    impl ToCmd for &[String] {
        #[inline]
        fn to_cmd(self) -> Vec<OsString> {
            self.iter().map(OsString::from).collect()
        }
    }

    /// Convert command to Vec<OsString>.
    #[inline]
    pub fn to_cmd_vec<C: ToCmd>(cmd: C) -> Vec<OsString> {
        cmd.to_cmd()
    }

    /// Filter out empty args.
    #[inline]
    pub fn filter_args(args: &[OsString]) -> Vec<OsString> {
        args.iter().filter(|a| !a.is_empty()).cloned().collect()
    }
}

/// Execute a command and capture its output.
///
/// # Errors
/// Returns error if command fails to execute or returns non-zero exit code.
pub fn exec(
    root: Option<&Path>,
    cmd: &[OsString],
    args: &[OsString],
    filter: &'static FilterRule,
) -> Result<Output> {
    let (name, mut command) = prepare(root, cmd, args)?;

    let output = command
        .output()
        .with_context(|| format!("Failed to execute `{name}`"))?;

    if !output.status.success() {
        bail!(format_error(&command_line(cmd, args), &output));
    }
    log_output(&name, &output, filter);
    Ok(output)
}

/// Command and arguments joined for display.
fn command_line(cmd: &[OsString], args: &[OsString]) -> String {
    cmd.iter()
        .chain(args)
        .map(|s| s.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prepare a Command from components.
fn prepare(root: Option<&Path>, cmd: &[OsString], args: &[OsString]) -> Result<(String, Command)> {
    let name = cmd
        .first()
        .and_then(|s| s.to_str())
        .context("Empty command")?
        .to_owned();

    let mut command = Command::new(&cmd[0]);
    command.args(&cmd[1..]).args(args);

    if let Some(dir) = root {
        command.current_dir(dir);
    }

    Ok((name, command))
}

fn strip_ansi(s: &str) -> std::borrow::Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\x1b\[[0-9;]*m").expect("valid ansi pattern"));
    re.replace_all(s, "")
}

/// Lines starting with any of these prefixes are not relayed to the log.
pub struct FilterRule {
    pub skip_prefixes: &'static [&'static str],
}

impl FilterRule {
    pub const fn new(skip_prefixes: &'static [&'static str]) -> Self {
        Self { skip_prefixes }
    }

    fn should_skip(&self, line: &str) -> bool {
        line.is_empty() || self.skip_prefixes.iter().any(|p| line.starts_with(p))
    }

    /// Relay the lines that survive filtering.
    fn log(&self, name: &str, output: &str) {
        let lines: Vec<_> = output
            .lines()
            .filter(|line| !self.should_skip(strip_ansi(line).trim()))
            .collect();

        if !lines.is_empty() {
            log!(name; "{}", lines.join("\n"));
        }
    }
}

/// Empty filter (no skipping).
pub const EMPTY_FILTER: FilterRule = FilterRule::new(&[]);

/// Relay the output of a successful command.
fn log_output(name: &str, output: &Output, filter: &'static FilterRule) {
    // git reports progress on stderr, stdout is mostly noise
    let stderr = String::from_utf8_lossy(&output.stderr);
    filter.log(name, stderr.trim());
}

/// Format command error message.
fn format_error(command_line: &str, output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);

    let mut msg = format!("Command `{command_line}` failed with {}", output.status);
    for text in [stderr.trim(), stdout.trim()] {
        if !text.is_empty() {
            msg.push('\n');
            msg.push_str(&strip_ansi(text));
        }
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::internal::*;
    use super::*;

    #[test]
    fn test_to_cmd_vec_array() {
        let cmd = to_cmd_vec(["git", "status"]);
        assert_eq!(cmd, [OsString::from("git"), OsString::from("status")]);
    }

    #[test]
    fn test_to_cmd_vec_slice() {
        let v = vec!["echo".to_string(), "hello".to_string()];
        let cmd = to_cmd_vec(v.as_slice());
        assert_eq!(cmd, [OsString::from("echo"), OsString::from("hello")]);
    }

    #[test]
    fn test_filter_args() {
        let args = [OsString::from("a"), OsString::from(""), OsString::from("b")];
        assert_eq!(filter_args(&args), [OsString::from("a"), OsString::from("b")]);
    }

    #[test]
    fn test_prepare_empty() {
        assert!(prepare(None, &[], &[]).is_err());
    }

    #[test]
    fn test_prepare_names_command() {
        let cmd = to_cmd_vec(["git", "-c", "core.pager=cat"]);
        let (name, command) = prepare(None, &cmd, &[OsString::from("log")]).unwrap();

        assert_eq!(name, "git");
        let args: Vec<_> = command.get_args().collect();
        assert_eq!(args, ["-c", "core.pager=cat", "log"]);
    }

    #[test]
    fn test_filter_rule() {
        let filter = FilterRule::new(&["hint:", "To "]);

        assert!(filter.should_skip("hint: use --force"));
        assert!(filter.should_skip("To github.com:alice/blog.git"));
        assert!(!filter.should_skip("error: failed to push"));
        assert!(filter.should_skip(""));
        assert!(!EMPTY_FILTER.should_skip("anything"));
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mRed\x1b[0m"), "Red");
        assert_eq!(strip_ansi("Start \x1b[1;33mYellow\x1b[0m End"), "Start Yellow End");
        assert_eq!(strip_ansi("Plain text"), "Plain text");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_failure_reports_status() {
        let err = exec!(["false"];).unwrap_err();
        assert!(err.to_string().contains("Command `false` failed"));
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_failure_names_arguments() {
        let message = String::from("a message");
        let err = exec!(["false", "commit"]; "-m", &message, "").unwrap_err();
        assert!(
            err.to_string().contains("Command `false commit -m a message` failed"),
            "{err}"
        );
    }

    #[test]
    fn test_command_line_joins_cmd_and_args() {
        let cmd = to_cmd_vec(["git", "push"]);
        let args = [OsString::from("origin"), OsString::from("main")];
        assert_eq!(command_line(&cmd, &args), "git push origin main");
    }

    #[cfg(unix)]
    #[test]
    fn test_exec_runs_in_root() {
        let dir = tempfile::TempDir::new().unwrap();
        static QUIET: FilterRule = FilterRule::new(&[""]);
        let output = exec!(filter=&QUIET; dir.path(); ["pwd"];).unwrap();

        let printed = String::from_utf8_lossy(&output.stdout);
        let expected = dir.path().canonicalize().unwrap();
        assert_eq!(Path::new(printed.trim()).canonicalize().unwrap(), expected);
    }
}
