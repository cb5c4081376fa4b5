//! Configuration types for a processing run.
//!
//! All run behaviour is controlled through [`ProcessConfig`], built via its
//! [`ProcessConfigBuilder`]. A builder can also be seeded from a YAML project
//! file with [`ProcessConfigBuilder::from_yaml_file`], then adjusted further
//! (the CLI layers its flags on top this way).
//!
//! ```yaml
//! input_type: markdown        # or "pdf"
//! pdf:
//!   path: manual.pdf
//!   extract_images: true
//! markdown:
//!   directory: ./content
//!   auto_discover: true
//!   files: [intro.md, usage.md]
//! output:
//!   directory: docs
//!   title: My Docs
//! ```
//!
//! Sections this crate does not understand (`server`, `ollama`, ...) are
//! ignored.

use crate::error::DocTrainerError;
use crate::generate::search::DEFAULT_PREVIEW_CHARS;
use crate::pipeline::input::is_url;
use crate::progress::ProgressCallback;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default output directory.
pub const DEFAULT_OUTPUT_DIR: &str = "docs";

/// Default download timeout for URL inputs, in seconds.
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Where the document comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    /// Local PDF path or HTTP(S) URL.
    Pdf(String),
    /// Directory searched recursively for `.md` files.
    MarkdownDir(PathBuf),
    /// Explicit Markdown files, processed in the given order.
    MarkdownFiles(Vec<PathBuf>),
}

impl InputSource {
    /// Infer the source kind from a command-line argument: directories are
    /// Markdown trees, `.md` files are single Markdown sources, anything else
    /// (including URLs) is a PDF.
    pub fn from_arg(arg: &str) -> Self {
        if is_url(arg) {
            return InputSource::Pdf(arg.to_string());
        }
        let path = Path::new(arg);
        if path.is_dir() {
            InputSource::MarkdownDir(path.to_path_buf())
        } else if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        {
            InputSource::MarkdownFiles(vec![path.to_path_buf()])
        } else {
            InputSource::Pdf(arg.to_string())
        }
    }
}

/// Configuration for one processing run.
///
/// # Example
/// ```rust
/// use edgequake_doctrainer::{InputSource, ProcessConfig};
///
/// let config = ProcessConfig::builder()
///     .input(InputSource::MarkdownDir("content".into()))
///     .output_dir("site")
///     .title("Handbook")
///     .build()
///     .unwrap();
/// assert_eq!(config.output_dir.to_str(), Some("site"));
/// ```
#[derive(Clone)]
pub struct ProcessConfig {
    pub input: InputSource,

    /// Root of the generated site. Default: `docs`.
    pub output_dir: PathBuf,

    /// Document title override. Without it Markdown documents are titled
    /// "Documentation" and PDFs take their title from the filename.
    pub title: Option<String>,

    /// Copy referenced Markdown images / extract embedded PDF images into
    /// `<output_dir>/images`. Default: true.
    pub extract_images: bool,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Characters of content kept per search-index item. Default: 200.
    pub search_preview_chars: usize,

    /// HTML page template file replacing the built-in one.
    pub template: Option<PathBuf>,

    /// Receives per-source progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl fmt::Debug for ProcessConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfig")
            .field("input", &self.input)
            .field("output_dir", &self.output_dir)
            .field("title", &self.title)
            .field("extract_images", &self.extract_images)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("download_timeout_secs", &self.download_timeout_secs)
            .field("search_preview_chars", &self.search_preview_chars)
            .field("template", &self.template)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ProcessProgressCallback>"),
            )
            .finish()
    }
}

impl ProcessConfig {
    /// Create a new builder for `ProcessConfig`.
    pub fn builder() -> ProcessConfigBuilder {
        ProcessConfigBuilder::default()
    }

    /// Directory images are copied or extracted into.
    pub fn image_dir(&self) -> PathBuf {
        self.output_dir.join("images")
    }
}

/// Builder for [`ProcessConfig`].
pub struct ProcessConfigBuilder {
    input: Option<InputSource>,
    output_dir: PathBuf,
    title: Option<String>,
    extract_images: bool,
    password: Option<String>,
    download_timeout_secs: u64,
    search_preview_chars: usize,
    template: Option<PathBuf>,
    progress_callback: Option<ProgressCallback>,
}

impl Default for ProcessConfigBuilder {
    fn default() -> Self {
        Self {
            input: None,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            title: None,
            extract_images: true,
            password: None,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
            search_preview_chars: DEFAULT_PREVIEW_CHARS,
            template: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ProcessConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessConfigBuilder")
            .field("input", &self.input)
            .field("output_dir", &self.output_dir)
            .field("title", &self.title)
            .field("extract_images", &self.extract_images)
            .finish_non_exhaustive()
    }
}

impl ProcessConfigBuilder {
    pub fn input(mut self, input: InputSource) -> Self {
        self.input = Some(input);
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn extract_images(mut self, v: bool) -> Self {
        self.extract_images = v;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.password = Some(pwd.into());
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.download_timeout_secs = secs.max(1);
        self
    }

    pub fn search_preview_chars(mut self, n: usize) -> Self {
        self.search_preview_chars = n.max(1);
        self
    }

    pub fn template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.progress_callback = Some(cb);
        self
    }

    /// Seed a builder from YAML project-file text.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, DocTrainerError> {
        let raw: RawConfig = serde_yaml::from_str(yaml).map_err(|e| DocTrainerError::ConfigParse {
            path: PathBuf::from("<inline>"),
            detail: e.to_string(),
        })?;
        raw.into_builder()
    }

    /// Seed a builder from a YAML project file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, DocTrainerError> {
        let text = std::fs::read_to_string(path).map_err(|e| DocTrainerError::from_read(path, e))?;
        let raw: RawConfig = serde_yaml::from_str(&text).map_err(|e| DocTrainerError::ConfigParse {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        raw.into_builder()
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ProcessConfig, DocTrainerError> {
        let input = self
            .input
            .ok_or_else(|| DocTrainerError::InvalidConfig("no input specified".into()))?;

        match &input {
            InputSource::Pdf(s) if s.trim().is_empty() => {
                return Err(DocTrainerError::InvalidConfig("PDF input is empty".into()));
            }
            InputSource::MarkdownFiles(files) if files.is_empty() => {
                return Err(DocTrainerError::InvalidConfig(
                    "Markdown file list is empty".into(),
                ));
            }
            _ => {}
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(DocTrainerError::InvalidConfig(
                "output directory is empty".into(),
            ));
        }

        Ok(ProcessConfig {
            input,
            output_dir: self.output_dir,
            title: self.title.filter(|t| !t.trim().is_empty()),
            extract_images: self.extract_images,
            password: self.password,
            download_timeout_secs: self.download_timeout_secs,
            search_preview_chars: self.search_preview_chars,
            template: self.template,
            progress_callback: self.progress_callback,
        })
    }
}

// ── YAML project file ────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    input_type: Option<String>,
    pdf: RawPdf,
    markdown: RawMarkdown,
    output: RawOutput,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawPdf {
    path: Option<String>,
    extract_images: Option<bool>,
    password: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawMarkdown {
    directory: Option<PathBuf>,
    auto_discover: bool,
    files: Vec<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawOutput {
    directory: Option<PathBuf>,
    title: Option<String>,
}

impl RawConfig {
    fn into_builder(self) -> Result<ProcessConfigBuilder, DocTrainerError> {
        let mut builder = ProcessConfigBuilder::default();

        let input_type = self
            .input_type
            .as_deref()
            .map(|s| s.trim().to_ascii_lowercase())
            .ok_or_else(|| DocTrainerError::InvalidConfig("input_type is required".into()))?;

        builder = match input_type.as_str() {
            "pdf" => {
                let path = self
                    .pdf
                    .path
                    .filter(|p| !p.trim().is_empty())
                    .ok_or_else(|| {
                        DocTrainerError::InvalidConfig("pdf.path is required for input_type: pdf".into())
                    })?;
                let mut b = builder
                    .input(InputSource::Pdf(path))
                    .extract_images(self.pdf.extract_images.unwrap_or(true));
                if let Some(pwd) = self.pdf.password {
                    b = b.password(pwd);
                }
                b
            }
            "markdown" => {
                let md = self.markdown;
                let input = match (md.auto_discover, md.directory, md.files.is_empty()) {
                    (true, Some(dir), _) => InputSource::MarkdownDir(dir),
                    (true, None, _) => {
                        return Err(DocTrainerError::InvalidConfig(
                            "markdown.directory is required when auto_discover is set".into(),
                        ));
                    }
                    (false, _, false) => InputSource::MarkdownFiles(md.files),
                    (false, Some(dir), true) => InputSource::MarkdownDir(dir),
                    (false, None, true) => {
                        return Err(DocTrainerError::InvalidConfig(
                            "markdown needs either files or a directory".into(),
                        ));
                    }
                };
                builder.input(input)
            }
            other => {
                return Err(DocTrainerError::InvalidConfig(format!(
                    "invalid input_type: {other} (must be 'pdf' or 'markdown')"
                )));
            }
        };

        if let Some(dir) = self.output.directory.filter(|d| !d.as_os_str().is_empty()) {
            builder = builder.output_dir(dir);
        }
        if let Some(title) = self.output.title.filter(|t| !t.trim().is_empty()) {
            builder = builder.title(title);
        }
        Ok(builder)
    }
}
