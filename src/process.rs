//! Process driver: parse the configured input, then generate the site.
//!
//! [`process`] is the primary entry point. The `parse_*` functions stop after
//! segmentation and return the [`Document`] without writing any site files,
//! which is what library callers embedding the segmenter usually want.
//!
//! Markdown parsing and every generator are plain blocking file I/O, so the
//! async driver runs them on `spawn_blocking`; PDF extraction does the same
//! inside [`crate::pipeline::extract`].

use crate::config::{InputSource, ProcessConfig, DEFAULT_DOWNLOAD_TIMEOUT_SECS};
use crate::error::{DocTrainerError, ImageError};
use crate::generate::{self, GenerateOptions};
use crate::output::{Document, DocumentMetadata, ProcessOutput, ProcessStats};
use crate::pipeline::assemble::{assemble, title_from_path};
use crate::pipeline::extract;
use crate::pipeline::images::{distribute_images, FsImageStore};
use crate::pipeline::input::{self, discover_markdown};
use crate::pipeline::segment::{segment_plain_text, MarkdownSegmenter};
use crate::progress::ProgressCallback;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// A segmented document plus the image references dropped on the way.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: Document,
    pub skipped_images: Vec<ImageError>,
    /// Markdown files read, or 1 for a PDF.
    pub source_files: usize,
}

/// Parse the configured input and write the full site into
/// `config.output_dir`.
///
/// # Returns
/// `Ok(ProcessOutput)` on success, even if some images were skipped
/// (check `output.skipped_images`).
///
/// # Errors
/// Returns `Err(DocTrainerError)` only for fatal errors:
/// - Input missing, unreadable, or not a PDF
/// - No Markdown files found
/// - pdfium unavailable, or the PDF is corrupt / locked
/// - An output file or the template could not be written or rendered
pub async fn process(config: &ProcessConfig) -> Result<ProcessOutput, DocTrainerError> {
    let total_start = Instant::now();
    info!("Starting run: {:?}", config.input);

    // ── Step 1: Parse ────────────────────────────────────────────────────
    let parse_start = Instant::now();
    let image_dir = config.extract_images.then(|| config.image_dir());
    let parsed = match &config.input {
        InputSource::Pdf(pdf) => {
            if let Some(ref cb) = config.progress_callback {
                cb.on_process_start(1);
            }
            let parsed = parse_pdf_with(
                pdf,
                config.password.as_deref(),
                image_dir.as_deref(),
                config.download_timeout_secs,
                config.title.as_deref(),
            )
            .await?;
            if let Some(ref cb) = config.progress_callback {
                cb.on_source_complete(Path::new(pdf), parsed.document.sections.len());
            }
            parsed
        }
        InputSource::MarkdownDir(dir) => {
            let files = discover_markdown(dir)?;
            parse_markdown_blocking(files, image_dir, config).await?
        }
        InputSource::MarkdownFiles(files) => {
            parse_markdown_blocking(files.clone(), image_dir, config).await?
        }
    };
    let parse_duration_ms = parse_start.elapsed().as_millis() as u64;

    if let Some(ref cb) = config.progress_callback {
        for err in &parsed.skipped_images {
            cb.on_image_skipped(err);
        }
    }
    info!(
        "Parsed {} sections ({} images, {} skipped) in {}ms",
        parsed.document.sections.len(),
        parsed.document.total_images(),
        parsed.skipped_images.len(),
        parse_duration_ms
    );

    // ── Step 2: Generate ─────────────────────────────────────────────────
    let options = GenerateOptions {
        search_preview_chars: config.search_preview_chars,
        template: match &config.template {
            Some(path) => Some(
                std::fs::read_to_string(path).map_err(|e| DocTrainerError::from_read(path, e))?,
            ),
            None => None,
        },
    };

    let generate_start = Instant::now();
    let output_dir = config.output_dir.clone();
    let document = parsed.document;
    let (document, written) = tokio::task::spawn_blocking(move || {
        let written = generate::generate_all(&document, &output_dir, &options)?;
        Ok::<_, DocTrainerError>((document, written))
    })
    .await
    .map_err(|e| DocTrainerError::Internal(format!("Generate task panicked: {}", e)))??;
    let generate_duration_ms = generate_start.elapsed().as_millis() as u64;

    // ── Step 3: Stats ────────────────────────────────────────────────────
    let stats = ProcessStats {
        source_files: parsed.source_files,
        total_sections: document.sections.len(),
        total_images: document.total_images(),
        skipped_images: parsed.skipped_images.len(),
        parse_duration_ms,
        generate_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Run complete: {} sections, {} files written, {}ms total",
        stats.total_sections,
        written.len(),
        stats.total_duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_process_complete(stats.total_sections, stats.total_images);
    }

    Ok(ProcessOutput {
        document,
        stats,
        skipped_images: parsed.skipped_images,
        written,
    })
}

/// Synchronous wrapper around [`process`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_sync(config: &ProcessConfig) -> Result<ProcessOutput, DocTrainerError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| DocTrainerError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process(config))
}

/// Segment a single in-memory Markdown string. Image references are ignored.
pub fn parse_markdown_str(text: &str, title: Option<&str>) -> Document {
    let mut segmenter = MarkdownSegmenter::new();
    segmenter.add_source(text, None);
    segmenter.finish(title).0
}

/// Segment Markdown files, in order, into one document.
///
/// With `image_dir`, referenced images are copied there; without it image
/// references are left alone.
///
/// # Errors
/// The first file that cannot be read aborts the whole parse.
pub fn parse_markdown_files(
    files: &[PathBuf],
    image_dir: Option<&Path>,
    title: Option<&str>,
) -> Result<ParsedDocument, DocTrainerError> {
    parse_markdown_files_with(files, image_dir, title, None)
}

/// Discover the `.md` files under `dir` and segment them.
pub fn parse_markdown_dir(
    dir: &Path,
    image_dir: Option<&Path>,
    title: Option<&str>,
) -> Result<ParsedDocument, DocTrainerError> {
    let files = discover_markdown(dir)?;
    parse_markdown_files(&files, image_dir, title)
}

/// Segment text that has no Markdown markup, such as extracted PDF text.
pub fn parse_plain_text(text: &str, title: &str) -> Document {
    assemble(title, segment_plain_text(text))
}

/// Extract and segment a PDF from a local path or URL.
///
/// With `image_dir`, embedded images are extracted there and spread over the
/// sections. The title comes from the filename.
pub async fn parse_pdf(
    input: &str,
    password: Option<&str>,
    image_dir: Option<&Path>,
) -> Result<ParsedDocument, DocTrainerError> {
    parse_pdf_with(
        input,
        password,
        image_dir,
        DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        None,
    )
    .await
}

/// Segment PDF bytes held in memory.
///
/// The bytes are written to a managed temp directory as `document.pdf`, which
/// is removed on return; the document title is therefore "document".
pub async fn parse_pdf_from_bytes(
    bytes: &[u8],
    password: Option<&str>,
    image_dir: Option<&Path>,
) -> Result<ParsedDocument, DocTrainerError> {
    let tmp = tempfile::TempDir::new()
        .map_err(|e| DocTrainerError::Internal(format!("tempdir: {e}")))?;
    let path = tmp.path().join("document.pdf");
    let mut file = std::fs::File::create(&path)
        .map_err(|e| DocTrainerError::Internal(format!("tempfile: {e}")))?;
    file.write_all(bytes)
        .map_err(|e| DocTrainerError::Internal(format!("tempfile write: {e}")))?;
    drop(file);

    let path_str = path.to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `parse_pdf` returns
    parse_pdf(&path_str, password, image_dir).await
}

/// Extract PDF metadata without reading page content.
pub async fn inspect(input: impl AsRef<str>) -> Result<DocumentMetadata, DocTrainerError> {
    let resolved = input::resolve_input(input.as_ref(), DEFAULT_DOWNLOAD_TIMEOUT_SECS).await?;
    extract::extract_metadata(resolved.path(), None).await
}

// ── Internal helpers ─────────────────────────────────────────────────────

fn parse_markdown_files_with(
    files: &[PathBuf],
    image_dir: Option<&Path>,
    title: Option<&str>,
    progress: Option<&ProgressCallback>,
) -> Result<ParsedDocument, DocTrainerError> {
    let store = image_dir.map(open_store).transpose()?;
    let mut segmenter = match &store {
        Some(store) => MarkdownSegmenter::with_images(store),
        None => MarkdownSegmenter::new(),
    };

    if let Some(cb) = progress {
        cb.on_process_start(files.len());
    }

    for file in files {
        segmenter.add_file(file)?;
        if let Some(cb) = progress {
            cb.on_source_complete(file, segmenter.section_count());
        }
    }

    let source_files = segmenter.source_count();
    let (document, skipped_images) = segmenter.finish(title);
    Ok(ParsedDocument {
        document,
        skipped_images,
        source_files,
    })
}

async fn parse_markdown_blocking(
    files: Vec<PathBuf>,
    image_dir: Option<PathBuf>,
    config: &ProcessConfig,
) -> Result<ParsedDocument, DocTrainerError> {
    let title = config.title.clone();
    let progress = config.progress_callback.clone();
    debug!("Parsing {} markdown files", files.len());

    tokio::task::spawn_blocking(move || {
        parse_markdown_files_with(
            &files,
            image_dir.as_deref(),
            title.as_deref(),
            progress.as_ref(),
        )
    })
    .await
    .map_err(|e| DocTrainerError::Internal(format!("Parse task panicked: {}", e)))?
}

async fn parse_pdf_with(
    input: &str,
    password: Option<&str>,
    image_dir: Option<&Path>,
    timeout_secs: u64,
    title: Option<&str>,
) -> Result<ParsedDocument, DocTrainerError> {
    let resolved = input::resolve_input(input, timeout_secs).await?;
    let pdf_path = resolved.path().to_path_buf();

    let store = image_dir.map(open_store).transpose()?;
    let extraction = extract::extract_pdf(&pdf_path, password, store).await?;
    debug!(
        "Extracted {} pages from {}",
        extraction.page_count,
        pdf_path.display()
    );

    let mut sections = segment_plain_text(&extraction.text);
    if sections.is_empty() && !extraction.images.is_empty() {
        warn!(
            "No text sections found; {} extracted images are not attached",
            extraction.images.len()
        );
    }
    distribute_images(&mut sections, &extraction.images);

    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| title_from_path(&pdf_path));

    Ok(ParsedDocument {
        document: assemble(title, sections),
        skipped_images: extraction.skipped_images,
        source_files: 1,
    })
}

fn open_store(dir: &Path) -> Result<FsImageStore, DocTrainerError> {
    FsImageStore::create(dir).map_err(|source| DocTrainerError::OutputWriteFailed {
        path: dir.to_path_buf(),
        source,
    })
}
