//! Input resolution: turn what the user typed into local files to parse.
//!
//! * PDF inputs may be a local path or an HTTP(S) URL. pdfium needs a path,
//!   so URLs are downloaded into a `TempDir` that lives as long as the
//!   [`ResolvedInput`]. Both kinds are checked for the `%PDF` magic bytes
//!   before returning, so callers get a meaningful error rather than a
//!   pdfium failure.
//! * Markdown inputs may be a directory, walked recursively by
//!   [`discover_markdown`].

use crate::error::DocTrainerError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// The resolved input — either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub async fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, DocTrainerError> {
    if input.trim().is_empty() {
        return Err(DocTrainerError::InvalidInput {
            input: input.to_string(),
        });
    }
    if is_url(input) {
        download_url(input, timeout_secs).await
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, DocTrainerError> {
    let path = PathBuf::from(path_str);

    if !path.is_file() {
        return Err(DocTrainerError::FileNotFound { path });
    }

    match std::fs::File::open(&path) {
        Ok(mut f) => {
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(DocTrainerError::NotAPdf { path, magic });
            }
        }
        Err(e) => return Err(DocTrainerError::from_read(path, e)),
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
async fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, DocTrainerError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| DocTrainerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().await.map_err(|e| {
        if e.is_timeout() {
            DocTrainerError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            DocTrainerError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(DocTrainerError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = filename_from_url(url);

    let temp_dir = TempDir::new().map_err(|e| DocTrainerError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response
        .bytes()
        .await
        .map_err(|e| DocTrainerError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(DocTrainerError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    tokio::fs::write(&file_path, &bytes)
        .await
        .map_err(|e| DocTrainerError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Last path segment of the URL if it looks like a filename.
///
/// The filename matters: PDF document titles are derived from it.
pub fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

/// Find every `.md` file under `dir` except `README.md`, sorted by path.
pub fn discover_markdown(dir: &Path) -> Result<Vec<PathBuf>, DocTrainerError> {
    if !dir.is_dir() {
        return Err(DocTrainerError::FileNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => match walk_error(dir, e) {
                Some(err) => return Err(err),
                None => continue,
            },
        };
        if entry.file_type().is_file() && is_markdown_source(entry.path()) {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(DocTrainerError::NoMarkdownFiles {
            dir: dir.to_path_buf(),
        });
    }

    files.sort();
    info!("Found {} markdown files in {}", files.len(), dir.display());
    Ok(files)
}

fn is_markdown_source(path: &Path) -> bool {
    path.file_name()
        .map(|n| n.to_string_lossy())
        .is_some_and(|name| name.ends_with(".md") && name != "README.md")
}

/// Map a walk failure to a fatal error.
///
/// A dangling link that is not itself a Markdown source is skipped;
/// everything else aborts discovery.
fn walk_error(dir: &Path, err: walkdir::Error) -> Option<DocTrainerError> {
    let path = err.path().unwrap_or(dir).to_path_buf();
    let markdown = is_markdown_source(&path);
    match err.into_io_error() {
        Some(io) if io.kind() == std::io::ErrorKind::NotFound && !markdown => {
            warn!("Skipping dangling entry {}", path.display());
            None
        }
        Some(io) => Some(DocTrainerError::from_read(path, io)),
        None => Some(DocTrainerError::ReadFailed {
            path,
            source: std::io::Error::other("filesystem loop"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_filename_from_url() {
        assert_eq!(
            filename_from_url("https://example.com/files/user_guide.pdf"),
            "user_guide.pdf"
        );
        assert_eq!(filename_from_url("https://example.com/pdf/1706"), "downloaded.pdf");
    }

    #[test]
    fn test_resolve_local_rejects_non_pdf() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"<html>").unwrap();
        let err = resolve_local(path.to_str().unwrap()).err().unwrap();
        assert!(matches!(err, DocTrainerError::NotAPdf { .. }));
        assert!(err.is_input_unavailable());
    }

    #[test]
    fn test_resolve_local_accepts_pdf_magic() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("real.pdf");
        std::fs::write(&path, b"%PDF-1.7\n").unwrap();
        let resolved = resolve_local(path.to_str().unwrap()).unwrap();
        assert_eq!(resolved.path(), path.as_path());
    }

    #[test]
    fn test_resolve_local_missing() {
        let err = resolve_local("/no/such/file.pdf").err().unwrap();
        assert!(matches!(err, DocTrainerError::FileNotFound { .. }));
    }

    #[test]
    fn test_discover_markdown_skips_readme_and_sorts() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("b")).unwrap();
        std::fs::write(dir.path().join("README.md"), "# skip").unwrap();
        std::fs::write(dir.path().join("b/02.md"), "# two").unwrap();
        std::fs::write(dir.path().join("a.md"), "# one").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "no").unwrap();

        let files = discover_markdown(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(names, ["a.md", "b/02.md"]);
    }

    #[test]
    fn test_discover_markdown_empty_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("README.md"), "# only readme").unwrap();
        let err = discover_markdown(dir.path()).unwrap_err();
        assert!(matches!(err, DocTrainerError::NoMarkdownFiles { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_markdown_broken_source_is_fatal() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "# one").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone.md"), dir.path().join("b.md")).unwrap();

        let err = discover_markdown(dir.path()).unwrap_err();
        assert!(err.is_input_unavailable(), "got: {err:?}");
        assert!(matches!(err, DocTrainerError::FileNotFound { ref path } if path.ends_with("b.md")));
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_markdown_skips_dangling_non_markdown() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.md"), "# one").unwrap();
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("assets")).unwrap();

        let files = discover_markdown(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
    }
}
