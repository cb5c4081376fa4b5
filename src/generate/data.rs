//! Structured-data generator: the document as JSON files the site loads.

use crate::error::DocTrainerError;
use crate::generate::write_json;
use crate::output::{Document, Section};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

/// Shape of `data/content.json`.
#[derive(Debug, Serialize)]
pub struct ContentData<'a> {
    pub title: &'a str,
    pub sections: &'a [Section],
    pub metadata: ContentMetadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub total_sections: usize,
    pub total_images: usize,
}

/// Write `data/content.json` and one `data/sections/<id>.json` per section.
pub fn generate(doc: &Document, output_dir: &Path) -> Result<Vec<PathBuf>, DocTrainerError> {
    let data_dir = output_dir.join("data");
    let sections_dir = data_dir.join("sections");

    let content = ContentData {
        title: &doc.title,
        sections: &doc.sections,
        metadata: ContentMetadata {
            total_sections: doc.sections.len(),
            total_images: doc.total_images(),
        },
    };

    let content_path = data_dir.join("content.json");
    write_json(&content_path, &content)?;
    info!("Generated: {}", content_path.display());

    let mut written = vec![content_path];
    for section in &doc.sections {
        let path = sections_dir.join(format!("{}.json", section.id));
        write_json(&path, section)?;
        written.push(path);
    }
    info!("Generated: {} individual section files", doc.sections.len());

    Ok(written)
}
