//! Terminal logging with colored module prefixes.
//!
//! ```ignore
//! log!("generate"; "{} pages written", count);
//! ```

use colored::{ColoredString, Colorize};
use crossterm::{
    queue,
    terminal::{Clear, ClearType, size},
};
use std::{
    fmt::Display,
    io::{IsTerminal, Write, stderr, stdout},
    sync::OnceLock,
};

/// Cached terminal width (fetched once on first use)
static TERMINAL_WIDTH: OnceLock<u16> = OnceLock::new();

/// Length of brackets around module name: "[]"
const BRACKET_LEN: usize = 2;
/// Space after prefix: "[module] " <- this space
const SPACE_AFTER_PREFIX: usize = 1;

/// Calculate total prefix length for a module name.
///
/// Returns: `module.len() + 3` (for "[", "]", and trailing space)
#[inline]
const fn calc_prefix_len(module_len: usize) -> usize {
    module_len + BRACKET_LEN + SPACE_AFTER_PREFIX
}

/// Get terminal width, cached after first call.
/// Falls back to 120 columns if detection fails.
fn get_terminal_width() -> u16 {
    *TERMINAL_WIDTH.get_or_init(|| size().map(|(w, _)| w).unwrap_or(120))
}

/// Log a message with a colored module prefix.
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::utils::log::log($module, &format!($($arg)*))
    }};
}

/// Log a message with a colored module prefix.
///
/// On a terminal each line of a multi-line message is truncated to the
/// terminal width. Redirected output gets full lines and no escape codes.
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    let max_msg_len = stdout.is_terminal().then(|| {
        let width = get_terminal_width() as usize;
        width.saturating_sub(calc_prefix_len(module.len()))
    });
    write_lines(&mut stdout, &prefix, message, max_msg_len);
}

/// Report a fatal error on stderr with its full cause chain, never truncated.
pub fn log_error(err: &anyhow::Error) {
    let prefix = colorize_prefix("error", "error");
    let mut stderr = stderr().lock();
    write_lines(&mut stderr, &prefix, &format!("{err:#}"), None);
}

/// Write prefixed lines, clearing and truncating only when `max_len` is set.
fn write_lines<W: Write>(out: &mut W, prefix: impl Display, message: &str, max_len: Option<usize>) {
    for line in message.lines() {
        match max_len {
            Some(max_len) => {
                queue!(out, Clear(ClearType::UntilNewLine)).ok();
                writeln!(out, "{prefix} {}", truncate_str(line, max_len)).ok();
            }
            None => {
                writeln!(out, "{prefix} {line}").ok();
            }
        }
    }
    out.flush().ok();
}

/// Apply color to a module prefix based on module type.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> ColoredString {
    let prefix = format!("[{module}]");
    match module_lower {
        "git" | "deploy" => prefix.bright_blue().bold(),
        "generate" => prefix.bright_green().bold(),
        "error" => prefix.bright_red().bold(),
        _ => prefix.bright_yellow().bold(),
    }
}

/// Truncate a string to fit within max_len bytes.
///
/// Ensures the result is valid UTF-8 by finding the nearest character boundary.
#[inline]
fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
