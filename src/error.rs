//! Error types for the edgequake-doctrainer library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`DocTrainerError`] — **Fatal**: the document cannot be produced at all
//!   (source unreadable, not a PDF, pdfium unavailable, output not writable).
//!   Returned as `Err(DocTrainerError)` from the `parse_*` and `process*`
//!   functions. Any partially built document is discarded.
//!
//! * [`ImageError`] — **Non-fatal**: a single image reference could not be
//!   resolved, copied or extracted. The parse continues without it and the
//!   error is collected into [`crate::output::ProcessOutput::skipped_images`].
//!
//! There is no error for a malformed heading: line classification is total,
//! and anything that is not a heading is simply content.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the edgequake-doctrainer library.
///
/// Image-level failures use [`ImageError`] and never abort a parse.
#[derive(Debug, Error)]
pub enum DocTrainerError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file or directory was not found at the given path.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The source exists but reading it failed midway.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// Markdown auto-discovery found nothing to parse.
    #[error("No markdown files found in '{dir}' (README.md is skipped)")]
    NoMarkdownFiles { dir: PathBuf },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Install pdfium system-wide, or set PDFIUM_LIB_PATH=/path/to/libpdfium\n\
to point at an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write a generated output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The HTML page template failed to parse or render.
    #[error("HTML template error: {0}")]
    TemplateFailed(String),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder or config-file validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The YAML config file is not valid YAML for this schema.
    #[error("Failed to parse config '{path}': {detail}")]
    ConfigParse { path: PathBuf, detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocTrainerError {
    /// `true` for the family of errors meaning "the source could not be read".
    ///
    /// These abort the parse; no document is produced.
    pub fn is_input_unavailable(&self) -> bool {
        matches!(
            self,
            DocTrainerError::FileNotFound { .. }
                | DocTrainerError::PermissionDenied { .. }
                | DocTrainerError::ReadFailed { .. }
                | DocTrainerError::InvalidInput { .. }
                | DocTrainerError::DownloadFailed { .. }
                | DocTrainerError::DownloadTimeout { .. }
                | DocTrainerError::NotAPdf { .. }
                | DocTrainerError::NoMarkdownFiles { .. }
        )
    }

    /// Map an I/O error on a source path to the closest input error.
    pub(crate) fn from_read(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::NotFound => DocTrainerError::FileNotFound { path },
            std::io::ErrorKind::PermissionDenied => DocTrainerError::PermissionDenied { path },
            _ => DocTrainerError::ReadFailed { path, source: err },
        }
    }
}

/// A non-fatal error for a single image.
///
/// Logged with `warn!` and collected into
/// [`crate::output::ProcessOutput::skipped_images`]; the parse continues.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ImageError {
    /// A Markdown image reference points at something that cannot be read.
    #[error("Image '{reference}' unresolvable ({path}): {reason}")]
    Unresolvable {
        reference: String,
        path: PathBuf,
        reason: String,
    },

    /// The image was read but writing it to the output directory failed.
    #[error("Image '{name}' could not be copied: {detail}")]
    CopyFailed { name: String, detail: String },

    /// An embedded PDF image object could not be decoded or saved.
    #[error("Page {page}: image extraction failed: {detail}")]
    ExtractFailed { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_input_unavailable() {
        let e = DocTrainerError::FileNotFound {
            path: PathBuf::from("guide/intro.md"),
        };
        assert!(e.is_input_unavailable());
        assert!(e.to_string().contains("guide/intro.md"));
    }

    #[test]
    fn config_errors_are_not_input_unavailable() {
        let e = DocTrainerError::InvalidConfig("no input".into());
        assert!(!e.is_input_unavailable());
        assert!(e.to_string().contains("no input"));
    }

    #[test]
    fn from_read_maps_error_kinds() {
        let e = DocTrainerError::from_read(
            "a.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(e, DocTrainerError::FileNotFound { .. }));

        let e = DocTrainerError::from_read(
            "a.md",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope"),
        );
        assert!(matches!(e, DocTrainerError::PermissionDenied { .. }));

        let e = DocTrainerError::from_read(
            "a.md",
            std::io::Error::new(std::io::ErrorKind::Other, "disk"),
        );
        assert!(matches!(e, DocTrainerError::ReadFailed { .. }));
        assert!(e.is_input_unavailable());
    }

    #[test]
    fn image_error_display() {
        let e = ImageError::Unresolvable {
            reference: "img/diagram.png".into(),
            path: PathBuf::from("docs/img/diagram.png"),
            reason: "not found".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("img/diagram.png"), "got: {msg}");
        assert!(msg.contains("not found"));
    }

    #[test]
    fn extract_failed_display() {
        let e = ImageError::ExtractFailed {
            page: 4,
            detail: "unsupported filter".into(),
        };
        assert!(e.to_string().contains("Page 4"));
    }
}
