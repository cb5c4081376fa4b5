//! Image association: which image filenames belong to which section.
//!
//! Two policies, chosen by input format:
//!
//! * **Inline** (Markdown): each `![alt](path)` reference is resolved as soon
//!   as its line is seen, copied into the output image directory, and its
//!   filename attached to the section that is open at that moment.
//! * **Distributive** (PDF): extracted images carry no position, so after
//!   segmentation they are spread evenly over the sections in order
//!   ([`distribute_images`]).
//!
//! Image bytes are never inspected. All reads and writes go through an
//! [`ImageStore`], so the segmentation code does not own any filesystem
//! policy.

use crate::error::ImageError;
use crate::output::Section;
use once_cell::sync::Lazy;
use regex::Regex;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Byte-level image I/O injected into the parsers.
pub trait ImageStore {
    /// Read the bytes of a source image.
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write image bytes under `name` in the flat output namespace.
    ///
    /// A later write with the same name replaces the earlier one.
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// [`ImageStore`] backed by a single output directory.
#[derive(Debug, Clone)]
pub struct FsImageStore {
    dir: PathBuf,
}

impl FsImageStore {
    /// Create the store, creating `dir` if needed.
    pub fn create(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }
}

impl ImageStore for FsImageStore {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        std::fs::write(self.dir.join(name), bytes)
    }
}

// ── Inline (Markdown) ────────────────────────────────────────────────────────

static RE_IMAGE_REF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Target followed by an optional quoted link title.
static RE_IMAGE_TARGET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(.*?)(?:\s+(?:"[^"]*"|'[^']*'))?$"#).unwrap());

/// Every image target referenced on `line`, in order.
///
/// An optional link title (`![a](pic.png "Caption")`) is dropped; spaces in
/// the path itself are kept.
pub fn find_image_refs(line: &str) -> Vec<&str> {
    RE_IMAGE_REF
        .captures_iter(line)
        .filter_map(|caps| caps.get(2))
        .filter_map(|m| {
            RE_IMAGE_TARGET
                .captures(m.as_str().trim())
                .and_then(|caps| caps.get(1))
                .map(|target| target.as_str().trim())
        })
        .filter(|target| !target.is_empty())
        .collect()
}

fn is_remote(reference: &str) -> bool {
    reference.starts_with("http://")
        || reference.starts_with("https://")
        || reference.starts_with("data:")
}

/// Resolves Markdown image references relative to one source file.
pub struct InlineImageResolver<'a> {
    store: &'a dyn ImageStore,
    base_dir: PathBuf,
}

impl<'a> InlineImageResolver<'a> {
    /// `source` is the Markdown file the references come from; its parent
    /// directory is the resolution base.
    pub fn new(store: &'a dyn ImageStore, source: &Path) -> Self {
        let base_dir = source
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        Self { store, base_dir }
    }

    /// Resolution base for sources without a file (in-memory strings).
    pub fn with_base_dir(store: &'a dyn ImageStore, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            base_dir: base_dir.into(),
        }
    }

    /// Copy the referenced image into the store and return its filename.
    pub fn resolve(&self, reference: &str) -> Result<String, ImageError> {
        let unresolvable = |path: PathBuf, reason: String| ImageError::Unresolvable {
            reference: reference.to_string(),
            path,
            reason,
        };

        if is_remote(reference) {
            return Err(unresolvable(
                PathBuf::from(reference),
                "remote images are not fetched".into(),
            ));
        }

        // Root and drive prefixes are dropped so the path stays under the base.
        let relative: PathBuf = Path::new(reference)
            .components()
            .filter(|c| !matches!(c, Component::Prefix(_) | Component::RootDir))
            .collect();
        let source = self.base_dir.join(relative);
        let name = match source.file_name().and_then(|n| n.to_str()) {
            Some(n) => n.to_string(),
            None => return Err(unresolvable(source, "reference has no filename".into())),
        };

        let bytes = self
            .store
            .read(&source)
            .map_err(|e| unresolvable(source.clone(), e.to_string()))?;

        self.store
            .write(&name, &bytes)
            .map_err(|e| ImageError::CopyFailed {
                name: name.clone(),
                detail: e.to_string(),
            })?;

        debug!("Copied image {} ({} bytes)", name, bytes.len());
        Ok(name)
    }

    /// Resolve every reference on `line`, logging and collecting failures.
    pub fn resolve_line(&self, line: &str, skipped: &mut Vec<ImageError>) -> Vec<String> {
        let mut names = Vec::new();
        for reference in find_image_refs(line) {
            match self.resolve(reference) {
                Ok(name) => names.push(name),
                Err(e) => {
                    warn!("Skipping image: {}", e);
                    skipped.push(e);
                }
            }
        }
        names
    }
}

// ── Distributive (PDF) ───────────────────────────────────────────────────────

/// Spread `images` over `sections` in order, `max(1, images / sections)` each.
///
/// Images beyond `per_section * sections.len()` are left unassigned. With no
/// sections or no images this does nothing.
pub fn distribute_images(sections: &mut [Section], images: &[String]) {
    if sections.is_empty() || images.is_empty() {
        return;
    }

    let per_section = (images.len() / sections.len()).max(1);
    let mut remaining = images.iter();

    for section in sections.iter_mut() {
        section
            .images
            .extend(remaining.by_ref().take(per_section).cloned());
    }

    let unassigned = remaining.count();
    if unassigned > 0 {
        debug!("{} images left unassigned after distribution", unassigned);
    }
}
