//! Output generators: read-only consumers of a segmented [`Document`].
//!
//! ```text
//! Document ──┬──▶ data    data/content.json + data/sections/<id>.json
//!            ├──▶ search  search-index.json
//!            └──▶ html    index.html
//! ```
//!
//! Every file is written atomically (temp file + rename) so a crashed run
//! never leaves a half-written JSON file for the site to load.

pub mod data;
pub mod html;
pub mod search;

use crate::error::DocTrainerError;
use crate::output::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Knobs shared by the generators.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Characters of section content kept in each search preview.
    pub search_preview_chars: usize,
    /// Replacement for the built-in HTML page template.
    pub template: Option<String>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            search_preview_chars: search::DEFAULT_PREVIEW_CHARS,
            template: None,
        }
    }
}

/// Run every generator into `output_dir`; returns the files written.
pub fn generate_all(
    doc: &Document,
    output_dir: &Path,
    options: &GenerateOptions,
) -> Result<Vec<PathBuf>, DocTrainerError> {
    let mut written = data::generate(doc, output_dir)?;
    written.push(search::generate(
        doc,
        output_dir,
        options.search_preview_chars,
    )?);
    written.push(html::generate(doc, output_dir, options.template.as_deref())?);
    Ok(written)
}

/// Write `bytes` to `path` via a sibling temp file and rename.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), DocTrainerError> {
    let write_err = |source| DocTrainerError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_err)?;
    }

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    std::fs::write(&tmp_path, bytes).map_err(write_err)?;
    std::fs::rename(&tmp_path, path).map_err(write_err)?;
    Ok(())
}

/// Pretty-print `value` as JSON into `path`.
pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), DocTrainerError> {
    let mut json = serde_json::to_vec_pretty(value)
        .map_err(|e| DocTrainerError::Internal(format!("JSON encoding failed: {e}")))?;
    json.push(b'\n');
    write_atomic(path, &json)
}
