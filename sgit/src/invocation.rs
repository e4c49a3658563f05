//! Deciding whether an argument list belongs to sgit or goes straight to git.
//!
//! sgit only parses its own options when the first command token is one of
//! its commands (`commit`, `push`, `debug`). Anything else, including git's
//! global flags such as `--no-pager` or `-C <dir>`, is forwarded unchanged.

use sgit_common::OperationKind;

/// Options sgit accepts ahead of its command. `true` when the option takes
/// a separate value.
const OWN_OPTIONS: &[(&str, bool)] = &[
    ("--repo", true),
    ("--config", true),
    ("-v", false),
    ("--verbose", false),
    ("-q", false),
    ("--quiet", false),
];

const DEBUG_COMMAND: &str = "debug";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Parse with sgit's CLI. The command token is normalized to lowercase.
    Own(Vec<String>),
    /// Forward to git exactly as given.
    Passthrough(Vec<String>),
}

/// Route the arguments that follow the program name.
pub fn route(mut args: Vec<String>) -> Route {
    match command_position(&args) {
        Some(index) => {
            args[index] = args[index].to_ascii_lowercase();
            Route::Own(args)
        }
        None => Route::Passthrough(args),
    }
}

fn command_position(args: &[String]) -> Option<usize> {
    let mut index = 0;
    while let Some(token) = args.get(index) {
        if let Some((_, takes_value)) = OWN_OPTIONS.iter().find(|(name, _)| name == token) {
            index += if *takes_value { 2 } else { 1 };
            continue;
        }
        if is_inline_value(token) {
            index += 1;
            continue;
        }
        let owned = OperationKind::from_command(token).is_some()
            || token.eq_ignore_ascii_case(DEBUG_COMMAND);
        return owned.then_some(index);
    }
    None
}

/// `--repo=<path>` and `--config=<path>`.
fn is_inline_value(token: &str) -> bool {
    OWN_OPTIONS
        .iter()
        .filter(|(_, takes_value)| *takes_value)
        .any(|(name, _)| {
            token
                .strip_prefix(name)
                .is_some_and(|rest| rest.starts_with('='))
        })
}
