//! CLI binary for edgequake-doctrainer.
//!
//! A thin shim over the library crate that maps CLI flags (optionally layered
//! over a YAML project file) to `ProcessConfig` and prints results.

use anyhow::{bail, Context, Result};
use clap::Parser;
use edgequake_doctrainer::{
    inspect, process, ImageError, InputSource, ProcessConfig, ProcessConfigBuilder,
    ProcessProgressCallback, ProgressCallback,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar over sources plus one log line per
/// parsed file and per skipped image.
struct CliProgressCallback {
    bar: ProgressBar,
    skipped: AtomicUsize,
}

impl CliProgressCallback {
    /// Spinner until `on_process_start` tells us how many sources there are.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Resolving input…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            skipped: AtomicUsize::new(0),
        })
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} sources  \
             ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Parsing");
    }
}

impl ProcessProgressCallback for CliProgressCallback {
    fn on_process_start(&self, total_sources: usize) {
        self.activate_bar(total_sources);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Parsing {total_sources} source(s)…"))
        ));
    }

    fn on_source_complete(&self, source: &Path, sections: usize) {
        self.bar.println(format!(
            "  {} {:<48}  {}",
            green("✓"),
            source.display(),
            dim(&format!("{sections:>4} sections so far")),
        ));
        self.bar.inc(1);
    }

    fn on_image_skipped(&self, error: &ImageError) {
        self.skipped.fetch_add(1, Ordering::SeqCst);
        let msg = error.to_string();
        let msg = match msg.char_indices().nth(90) {
            Some((idx, _)) => format!("{}\u{2026}", &msg[..idx]),
            None => msg,
        };
        self.bar.println(format!("  {} {}", yellow("!"), dim(&msg)));
    }

    fn on_process_complete(&self, total_sections: usize, total_images: usize) {
        self.bar.finish_and_clear();
        let skipped = self.skipped.load(Ordering::SeqCst);
        if skipped == 0 {
            eprintln!(
                "{} {} sections, {} images",
                green("✔"),
                bold(&total_sections.to_string()),
                total_images
            );
        } else {
            eprintln!(
                "{} {} sections, {} images  ({} skipped)",
                cyan("⚠"),
                bold(&total_sections.to_string()),
                total_images,
                yellow(&skipped.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Markdown directory → ./docs
  doctrainer content/

  # PDF into a custom output directory
  doctrainer manual.pdf -o site

  # PDF from a URL, no image extraction
  doctrainer --no-images https://example.com/guide.pdf

  # Explicit Markdown files, in this order
  doctrainer --files intro.md,usage.md,faq.md --title "User Guide"

  # Everything from a project file (CLI flags still override)
  doctrainer --config config.yaml

  # Inspect PDF metadata only
  doctrainer --inspect-only manual.pdf

  # JSON run report
  doctrainer --json content/ > report.json

OUTPUT LAYOUT:
  <out>/index.html                 single-page site
  <out>/data/content.json          whole document
  <out>/data/sections/<id>.json    one file per section
  <out>/search-index.json          search previews
  <out>/images/                    copied / extracted images

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium (else ./ then system)
  RUST_LOG          Override the log filter (e.g. edgequake_doctrainer=debug)
"#;

/// Turn PDFs and Markdown into a searchable documentation site.
#[derive(Parser, Debug)]
#[command(
    name = "doctrainer",
    version,
    about = "Turn PDFs and Markdown into a searchable documentation site",
    long_about = "Segment a PDF (local file or URL) or a set of Markdown files into \
heading-delimited sections, then generate an HTML page, JSON data files and a search index.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF path, PDF URL, Markdown file or directory of Markdown files.
    input: Option<String>,

    /// YAML project file; CLI flags override its values.
    #[arg(long, env = "DOCTRAINER_CONFIG")]
    config: Option<PathBuf>,

    /// Explicit Markdown files, comma separated, processed in order.
    #[arg(long, env = "DOCTRAINER_FILES", value_delimiter = ',', conflicts_with = "input")]
    files: Vec<PathBuf>,

    /// Output directory for the generated site.
    #[arg(short, long, env = "DOCTRAINER_OUTPUT")]
    output: Option<PathBuf>,

    /// Document title.
    #[arg(long, env = "DOCTRAINER_TITLE")]
    title: Option<String>,

    /// Do not copy or extract images.
    #[arg(long, env = "DOCTRAINER_NO_IMAGES")]
    no_images: bool,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCTRAINER_PASSWORD")]
    password: Option<String>,

    /// Print a JSON report (ProcessOutput, or metadata with --inspect-only).
    #[arg(long, env = "DOCTRAINER_JSON")]
    json: bool,

    /// Print PDF metadata only, no processing.
    #[arg(long)]
    inspect_only: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOCTRAINER_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCTRAINER_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCTRAINER_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "DOCTRAINER_DOWNLOAD_TIMEOUT")]
    download_timeout: Option<u64>,

    /// HTML template file replacing the built-in page.
    #[arg(long, env = "DOCTRAINER_TEMPLATE")]
    template: Option<PathBuf>,

    /// Characters of content kept per search-index entry.
    #[arg(long, env = "DOCTRAINER_PREVIEW_CHARS")]
    preview_chars: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json && !cli.inspect_only;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let Some(ref input) = cli.input else {
            bail!("--inspect-only needs a PDF path or URL");
        };
        let meta = inspect(input).await.context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ProcessProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = process(&config).await.context("Processing failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if !cli.quiet {
        if !show_progress {
            eprintln!(
                "Processed {} source(s): {} sections, {} images ({} skipped)",
                output.stats.source_files,
                output.stats.total_sections,
                output.stats.total_images,
                output.stats.skipped_images,
            );
        }
        eprintln!(
            "   {} files written to {}  —  {}ms total",
            dim(&output.written.len().to_string()),
            bold(&config.output_dir.display().to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}

/// Map CLI args (over an optional YAML project file) to `ProcessConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ProcessConfig> {
    let mut builder = match cli.config {
        Some(ref path) => ProcessConfigBuilder::from_yaml_file(path)
            .with_context(|| format!("Failed to load config from {:?}", path))?,
        None => ProcessConfig::builder(),
    };

    if !cli.files.is_empty() {
        builder = builder.input(InputSource::MarkdownFiles(cli.files.clone()));
    } else if let Some(ref input) = cli.input {
        builder = builder.input(InputSource::from_arg(input));
    } else if cli.config.is_none() {
        bail!("Provide an INPUT, --files, or --config");
    }

    if let Some(ref dir) = cli.output {
        builder = builder.output_dir(dir);
    }
    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }
    if cli.no_images {
        builder = builder.extract_images(false);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(secs) = cli.download_timeout {
        builder = builder.download_timeout_secs(secs);
    }
    if let Some(ref template) = cli.template {
        builder = builder.template(template);
    }
    if let Some(n) = cli.preview_chars {
        builder = builder.search_preview_chars(n);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
