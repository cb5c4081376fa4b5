//! Search-index generator: one compact item per section for client-side
//! fuzzy search.

use crate::error::DocTrainerError;
use crate::generate::write_json;
use crate::output::Document;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Default number of content characters kept per item.
pub const DEFAULT_PREVIEW_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndex {
    pub items: Vec<SearchItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchItem {
    pub id: String,
    pub heading: String,
    pub content: String,
    pub level: u8,
}

/// Build the index in memory.
pub fn build_index(doc: &Document, preview_chars: usize) -> SearchIndex {
    let items = doc
        .sections
        .iter()
        .map(|s| SearchItem {
            id: s.id.clone(),
            heading: s.heading.clone(),
            content: preview(&s.content, preview_chars),
            level: s.level,
        })
        .collect();
    SearchIndex { items }
}

/// Write `search-index.json` into `output_dir`.
pub fn generate(
    doc: &Document,
    output_dir: &Path,
    preview_chars: usize,
) -> Result<PathBuf, DocTrainerError> {
    let index = build_index(doc, preview_chars);
    let path = output_dir.join("search-index.json");
    write_json(&path, &index)?;
    info!("Generated search index: {} ({} items)", path.display(), index.items.len());
    Ok(path)
}

/// First `max_chars` characters of `content`, with `...` if anything was cut.
fn preview(content: &str, max_chars: usize) -> String {
    match content.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &content[..byte_idx]),
        None => content.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Section;

    #[test]
    fn test_preview_short_content_untouched() {
        assert_eq!(preview("short", 200), "short");
        assert_eq!(preview("", 200), "");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let content = "é".repeat(250);
        let p = preview(&content, 200);
        assert!(p.ends_with("..."));
        assert_eq!(p.trim_end_matches("...").chars().count(), 200);
    }

    #[test]
    fn test_preview_exact_length_not_marked() {
        let content = "x".repeat(200);
        assert_eq!(preview(&content, 200), content);
    }

    #[test]
    fn test_build_index_items() {
        let mut s = Section::new("section-3", 2, "Usage");
        s.content = "word ".repeat(100);
        s.images = vec!["ignored.png".into()];
        let doc = Document {
            title: "T".into(),
            sections: vec![s],
        };

        let index = build_index(&doc, 10);
        assert_eq!(index.items.len(), 1);
        let item = &index.items[0];
        assert_eq!(item.id, "section-3");
        assert_eq!(item.level, 2);
        assert_eq!(item.content, "word word ...");
    }
}
