//! Output types: the segmented [`Document`] and the result of a full run.
//!
//! [`Document`] is the value every downstream generator consumes. It is a
//! flat, reading-order list of [`Section`]s; hierarchy is implied only by
//! each section's `level`. Generators that want a tree (the HTML navigation,
//! for instance) derive it at output time.

use crate::error::ImageError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One contiguous span of content introduced by a heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// `"section-N"`, unique within its document.
    pub id: String,
    /// Heading depth, always in `1..=6`.
    pub level: u8,
    /// Trimmed heading text.
    pub heading: String,
    /// Body text, trimmed at flush time.
    pub content: String,
    /// Image filenames, in association order.
    pub images: Vec<String>,
}

impl Section {
    /// A new, empty section. `level` is clamped into `1..=6`.
    pub fn new(id: impl Into<String>, level: u8, heading: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            level: level.clamp(1, 6),
            heading: heading.into(),
            content: String::new(),
            images: Vec::new(),
        }
    }
}

/// A titled, ordered list of sections.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Document {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Document {
    /// Total number of image filenames across all sections.
    pub fn total_images(&self) -> usize {
        self.sections.iter().map(|s| s.images.len()).sum()
    }

    /// Look a section up by its id.
    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }
}

/// PDF information-dictionary values, as returned by [`crate::inspect`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
}

/// Counters and timings for one [`crate::process`] run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessStats {
    /// Markdown files parsed, or 1 for a PDF.
    pub source_files: usize,
    pub total_sections: usize,
    pub total_images: usize,
    pub skipped_images: usize,
    pub parse_duration_ms: u64,
    pub generate_duration_ms: u64,
    pub total_duration_ms: u64,
}

/// Everything a full run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessOutput {
    pub document: Document,
    pub stats: ProcessStats,
    /// Image references dropped along the way.
    pub skipped_images: Vec<ImageError>,
    /// Files written by the generators, in write order.
    pub written: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn section_level_is_clamped() {
        assert_eq!(Section::new("section-1", 0, "A").level, 1);
        assert_eq!(Section::new("section-2", 9, "B").level, 6);
        assert_eq!(Section::new("section-3", 3, "C").level, 3);
    }

    #[test]
    fn document_counts_images() {
        let mut a = Section::new("section-1", 1, "A");
        a.images = vec!["a.png".into(), "b.png".into()];
        let mut b = Section::new("section-2", 2, "B");
        b.images = vec!["c.png".into()];
        let doc = Document {
            title: "Guide".into(),
            sections: vec![a, b],
        };
        assert_eq!(doc.total_images(), 3);
        assert_eq!(doc.section("section-2").map(|s| s.heading.as_str()), Some("B"));
        assert!(doc.section("section-9").is_none());
    }

    #[test]
    fn section_json_field_names() {
        let s = Section::new("section-1", 2, "Overview");
        let v = serde_json::to_value(&s).expect("serialise");
        for key in ["id", "level", "heading", "content", "images"] {
            assert!(v.get(key).is_some(), "missing {key}");
        }
    }
}
