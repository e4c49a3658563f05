//! Shared utilities for sgit.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

/// Expand a leading `~/` to the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match path.to_str().and_then(|s| s.strip_prefix("~/")) {
        Some(stripped) => match dirs::home_dir() {
            Some(home) => home.join(stripped),
            None => path.to_path_buf(),
        },
        None => path.to_path_buf(),
    }
}

/// Render an argument list the way a shell user would type it.
pub fn quote_args(args: &[String]) -> String {
    args.iter()
        .map(|arg| shell_escape::escape(Cow::Borrowed(arg.as_str())))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Indent each line of text with a given prefix.
pub fn indent_lines(text: &str, prefix: &str) -> String {
    let mut out = String::new();
    for (idx, line) in text.lines().enumerate() {
        if idx > 0 {
            out.push('\n');
        }
        out.push_str(prefix);
        out.push_str(line);
    }
    out
}

/// Format a duration in seconds as a human-readable string.
pub fn humanize_duration(secs: u64) -> String {
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs < 86400 {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    } else {
        format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
    }
}
