//! Progress-callback trait for per-source processing events.
//!
//! Inject an [`Arc<dyn ProcessProgressCallback>`] via
//! [`crate::config::ProcessConfigBuilder::progress_callback`] to receive
//! events as the driver works through its sources. The CLI uses this to drive
//! its progress bar; library callers can forward events wherever they like.
//!
//! # Example
//!
//! ```rust
//! use edgequake_doctrainer::{InputSource, ProcessConfig, ProcessProgressCallback};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct SectionCounter {
//!     sections: AtomicUsize,
//! }
//!
//! impl ProcessProgressCallback for SectionCounter {
//!     fn on_source_complete(&self, source: &Path, sections: usize) {
//!         self.sections.fetch_add(sections, Ordering::SeqCst);
//!         eprintln!("{} -> {} sections", source.display(), sections);
//!     }
//! }
//!
//! let counter = Arc::new(SectionCounter { sections: AtomicUsize::new(0) });
//!
//! let config = ProcessConfig::builder()
//!     .input(InputSource::MarkdownDir("content".into()))
//!     .progress_callback(counter as Arc<dyn ProcessProgressCallback>)
//!     .build()
//!     .unwrap();
//! ```

use crate::error::ImageError;
use std::path::Path;
use std::sync::Arc;

/// Called by the process driver as it parses sources and generates output.
///
/// Implementations must be `Send + Sync`: parsing runs on a blocking thread,
/// not the caller's. All methods have default no-op implementations so
/// callers only override what they care about.
pub trait ProcessProgressCallback: Send + Sync {
    /// Called once before the first source is parsed.
    ///
    /// # Arguments
    /// * `total_sources` — Markdown files to parse, or 1 for a PDF
    fn on_process_start(&self, total_sources: usize) {
        let _ = total_sources;
    }

    /// Called after each source has been fed through the segmenter.
    ///
    /// # Arguments
    /// * `source`   — the file just parsed
    /// * `sections` — running section count for the whole document
    fn on_source_complete(&self, source: &Path, sections: usize) {
        let _ = (source, sections);
    }

    /// Called for every image that was dropped.
    fn on_image_skipped(&self, error: &ImageError) {
        let _ = error;
    }

    /// Called once after all output files have been written.
    ///
    /// # Arguments
    /// * `total_sections` — sections in the final document
    /// * `total_images`   — images associated with sections
    fn on_process_complete(&self, total_sections: usize, total_images: usize) {
        let _ = (total_sections, total_images);
    }
}

/// A no-op implementation for callers that don't need progress events.
///
/// This is the default when no callback is configured.
pub struct NoopProgressCallback;

impl ProcessProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::ProcessConfig`].
pub type ProgressCallback = Arc<dyn ProcessProgressCallback>;
