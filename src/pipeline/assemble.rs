//! Document assembly: a title plus the ordered section list.

use crate::output::{Document, Section};
use std::path::Path;

/// Title used for Markdown documents when the caller gives none.
pub const DEFAULT_TITLE: &str = "Documentation";

/// Combine a title and sections into a [`Document`].
///
/// An empty section list is accepted as-is.
pub fn assemble(title: impl Into<String>, sections: Vec<Section>) -> Document {
    Document {
        title: title.into(),
        sections,
    }
}

/// Title for a Markdown document: the override if non-blank, else the default.
pub fn markdown_title(title_override: Option<&str>) -> String {
    title_override
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TITLE)
        .to_string()
}

/// Title for a PDF document, from its filename.
///
/// `user_guide-v2.pdf` → `user guide v2`.
pub fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .replace(['_', '-'], " ")
}
