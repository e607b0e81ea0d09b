//! Removal of terminal color and formatting escape sequences.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// CSI sequences (`ESC [ ... m` and friends) and OSC sequences terminated by BEL,
/// introduced by either the 7-bit `ESC` or the 8-bit `CSI` byte.
const ANSI_PATTERN: &str = concat!(
    r"[\x{1B}\x{9B}][\[\]()#;?]*",
    r"(?:(?:(?:(?:;[-a-zA-Z0-9/#&.:=?%@~_]+)*|[a-zA-Z0-9]+(?:;[-a-zA-Z0-9/#&.:=?%@~_]*)*)?\x{07})",
    r"|(?:(?:[0-9]{1,4}(?:;[0-9]{0,4})*)?[0-9A-PR-TZcf-ntqry=><~]))",
);

static ANSI: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| Regex::new(ANSI_PATTERN));

/// Strip terminal escape sequences from `text`.
///
/// Borrows when there is nothing to strip.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    match ANSI.as_ref() {
        Ok(re) => re.replace_all(text, ""),
        Err(_) => Cow::Borrowed(text),
    }
}
