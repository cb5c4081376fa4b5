//! # edgequake-doctrainer
//!
//! Turn PDF documents and Markdown trees into a searchable, single-page
//! documentation site.
//!
//! ## What it does
//!
//! Input text is split into heading-delimited sections: a flat, reading-order
//! list where hierarchy is carried only by each section's level. Markdown
//! headings are read from `#` markup; PDF text has no markup, so headings are
//! guessed from numbering (`1.2 Setup`) and short capitalised lines. Images
//! are attached to sections: inline for Markdown (copied as they are
//! referenced), spread evenly over the sections for PDFs.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF / URL / Markdown
//!  │
//!  ├─ 1. Input      resolve local file, download URL, or discover *.md
//!  ├─ 2. Extract    PDF text + embedded images via pdfium (spawn_blocking)
//!  ├─ 3. Normalise  line endings, invisible characters
//!  ├─ 4. Classify   heading / content / ignored, per format
//!  ├─ 5. Build      section state machine, ids section-1, section-2, …
//!  ├─ 6. Images     inline copy (Markdown) or even distribution (PDF)
//!  └─ 7. Generate   data/*.json, search-index.json, index.html
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_doctrainer::{process, InputSource, ProcessConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ProcessConfig::builder()
//!         .input(InputSource::MarkdownDir("content".into()))
//!         .output_dir("docs")
//!         .build()?;
//!     let output = process(&config).await?;
//!     eprintln!("{} sections, {} images",
//!         output.stats.total_sections,
//!         output.stats.total_images);
//!     Ok(())
//! }
//! ```
//!
//! Segmentation alone, without writing anything:
//!
//! ```rust
//! let doc = edgequake_doctrainer::parse_markdown_str("# Setup\nRun it.\n## Flags\n-v", None);
//! assert_eq!(doc.sections.len(), 2);
//! assert_eq!(doc.sections[1].id, "section-2");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `doctrainer` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! edgequake-doctrainer = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod progress;
pub mod templates;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{InputSource, ProcessConfig, ProcessConfigBuilder};
pub use error::{DocTrainerError, ImageError};
pub use generate::{generate_all, GenerateOptions};
pub use output::{Document, DocumentMetadata, ProcessOutput, ProcessStats, Section};
pub use process::{
    inspect, parse_markdown_dir, parse_markdown_files, parse_markdown_str, parse_pdf,
    parse_pdf_from_bytes, parse_plain_text, process, process_sync, ParsedDocument,
};
pub use progress::{NoopProgressCallback, ProcessProgressCallback, ProgressCallback};
