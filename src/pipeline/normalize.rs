//! Text normalisation applied to every source around line classification.
//!
//! PDF text extraction and Windows-authored Markdown both leave artefacts
//! that would otherwise leak into headings and content: `\r\n` line endings,
//! a leading BOM, zero-width joiners and soft hyphens from hyphenated
//! reflow. Line endings are normalised for the whole source up front;
//! invisible characters are stripped per line, and only outside literal
//! blocks, so fenced code keeps its bytes.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

// ── Rule 1: Normalise line endings ───────────────────────────────────────────

/// CRLF / CR → LF.
pub fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 2: Strip invisible Unicode ──────────────────────────────────────────

static RE_INVISIBLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\x{FEFF}\x{200B}\x{200C}\x{200D}\x{2060}\x{00AD}]").unwrap());

/// Remove BOMs, zero-width spaces/joiners, word joiners and soft hyphens.
pub fn strip_invisible(line: &str) -> Cow<'_, str> {
    RE_INVISIBLE.replace_all(line, "")
}
