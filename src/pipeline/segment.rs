//! Segmentation driver: normalise → classify → build → associate images.
//!
//! [`segment_source`] is the single loop shared by every format; the
//! classifier decides what each line means, the [`SectionBuilder`] decides
//! what to do with it. [`MarkdownSegmenter`] and [`segment_plain_text`] wire
//! up the two formats.

use crate::error::{DocTrainerError, ImageError};
use crate::output::{Document, Section};
use crate::pipeline::assemble::{assemble, markdown_title};
use crate::pipeline::builder::SectionBuilder;
use crate::pipeline::classify::{
    ContentJoin, LineClassifier, LineEvent, MarkdownClassifier, PlainTextClassifier,
};
use crate::pipeline::images::{ImageStore, InlineImageResolver};
use crate::pipeline::normalize::{normalise_line_endings, strip_invisible};
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Run one source through `classifier` into `builder`.
///
/// Invisible characters are stripped from every line the classifier sees
/// outside a literal block. When `images` is given, image references on
/// non-literal content lines are resolved and attached to the open section;
/// failures land in `skipped`. The open section is flushed at the end of the
/// source.
pub fn segment_source<C: LineClassifier>(
    text: &str,
    classifier: &mut C,
    builder: &mut SectionBuilder,
    images: Option<&InlineImageResolver<'_>>,
    skipped: &mut Vec<ImageError>,
) {
    builder.set_join(classifier.content_join());
    let text = normalise_line_endings(text);

    for raw in text.lines() {
        let line = if classifier.in_literal_block() {
            Cow::Borrowed(raw)
        } else {
            strip_invisible(raw)
        };
        let event = classifier.classify(&line);
        let content = match event {
            LineEvent::Content(c) => Some(c),
            _ => None,
        };
        builder.push(event);

        if let (Some(content), Some(resolver)) = (content, images) {
            if classifier.in_literal_block() {
                continue;
            }
            for name in resolver.resolve_line(content, skipped) {
                builder.attach_image(name);
            }
        }
    }

    builder.end_source();
}

/// Segment PDF-extracted plain text. Images are not touched.
pub fn segment_plain_text(text: &str) -> Vec<Section> {
    let mut builder = SectionBuilder::new(ContentJoin::Reflow);
    let mut classifier = PlainTextClassifier::new();
    let mut skipped = Vec::new();
    segment_source(text, &mut classifier, &mut builder, None, &mut skipped);
    builder.finish()
}

/// Builds one [`Document`] from any number of Markdown sources.
///
/// Section ids run on across sources; each source gets a fresh classifier
/// so front matter is recognised per file.
pub struct MarkdownSegmenter<'s> {
    builder: SectionBuilder,
    store: Option<&'s dyn ImageStore>,
    skipped: Vec<ImageError>,
    sources: usize,
}

impl<'s> MarkdownSegmenter<'s> {
    /// Segmenter that ignores image references.
    pub fn new() -> Self {
        Self {
            builder: SectionBuilder::new(ContentJoin::PreserveLines),
            store: None,
            skipped: Vec::new(),
            sources: 0,
        }
    }

    /// Segmenter that copies referenced images through `store`.
    pub fn with_images(store: &'s dyn ImageStore) -> Self {
        Self {
            store: Some(store),
            ..Self::new()
        }
    }

    /// Add an in-memory source. `source` anchors relative image paths.
    pub fn add_source(&mut self, text: &str, source: Option<&Path>) {
        let mut classifier = MarkdownClassifier::new();
        let resolver = self.store.map(|store| match source {
            Some(path) => InlineImageResolver::new(store, path),
            None => InlineImageResolver::with_base_dir(store, PathBuf::new()),
        });
        segment_source(
            text,
            &mut classifier,
            &mut self.builder,
            resolver.as_ref(),
            &mut self.skipped,
        );
        self.sources += 1;
    }

    /// Read and add a Markdown file.
    ///
    /// # Errors
    /// Any read failure; the caller should discard this segmenter.
    pub fn add_file(&mut self, path: &Path) -> Result<(), DocTrainerError> {
        let bytes = std::fs::read(path).map_err(|e| DocTrainerError::from_read(path, e))?;
        let text = String::from_utf8_lossy(&bytes);
        debug!("Parsing {} ({} bytes)", path.display(), bytes.len());
        self.add_source(&text, Some(path));
        Ok(())
    }

    /// Sections produced so far across all sources.
    pub fn section_count(&self) -> usize {
        self.builder.section_count()
    }

    /// Number of sources added so far.
    pub fn source_count(&self) -> usize {
        self.sources
    }

    /// Assemble the document. Returns it with every skipped image reference.
    pub fn finish(self, title_override: Option<&str>) -> (Document, Vec<ImageError>) {
        let sections = self.builder.finish();
        info!(
            "Segmented {} markdown sources into {} sections",
            self.sources,
            sections.len()
        );
        (assemble(markdown_title(title_override), sections), self.skipped)
    }
}

impl Default for MarkdownSegmenter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::builder::IMPLICIT_SECTION_HEADING;
    use crate::pipeline::images::FsImageStore;
    use std::io;
    use tempfile::TempDir;

    /// Store whose reads succeed and whose writes always fail.
    struct FailingWrites;

    impl ImageStore for FailingWrites {
        fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
            Ok(b"png".to_vec())
        }

        fn write(&self, _name: &str, _bytes: &[u8]) -> io::Result<()> {
            Err(io::Error::other("disk full"))
        }
    }

    fn markdown(src: &str) -> Document {
        let mut seg = MarkdownSegmenter::new();
        seg.add_source(src, None);
        seg.finish(None).0
    }

    #[test]
    fn test_markdown_two_sections() {
        let doc = markdown("# Title\nBody text\n## Sub\nMore text\n");
        assert_eq!(doc.title, "Documentation");
        assert_eq!(doc.sections.len(), 2);
        let (a, b) = (&doc.sections[0], &doc.sections[1]);
        assert_eq!((a.level, a.heading.as_str(), a.content.as_str()), (1, "Title", "Body text"));
        assert_eq!((b.level, b.heading.as_str(), b.content.as_str()), (2, "Sub", "More text"));
    }

    #[test]
    fn test_fenced_heading_stays_in_content() {
        let doc = markdown("# Setup\nRun this:\n```sh\n# install deps\nmake\n```\nDone.\n");
        assert_eq!(doc.sections.len(), 1);
        let content = &doc.sections[0].content;
        assert!(content.contains("\n# install deps\n"), "got: {content:?}");
        assert!(!content.contains("```"));
        assert!(content.ends_with("Done."));
    }

    #[test]
    fn test_no_heading_yields_introduction() {
        let doc = markdown("just some text\nand more\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, IMPLICIT_SECTION_HEADING);
        assert_eq!(doc.sections[0].content, "just some text\nand more");
    }

    #[test]
    fn test_front_matter_never_reaches_content() {
        let doc = markdown("---\ntitle: Secret\n---\n# Page\nvisible\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].content, "visible");
    }

    #[test]
    fn test_plain_text_example() {
        let sections =
            segment_plain_text("INTRODUCTION\nSome content here.\n1.1 Overview\nMore content.");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].heading, "INTRODUCTION");
        assert_eq!(sections[0].content, "Some content here.");
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].heading, "1.1 Overview");
        assert_eq!(sections[1].content, "More content.");
    }

    #[test]
    fn test_plain_text_reflows_paragraphs() {
        let sections = segment_plain_text("the first half of a\nsentence continues\n\nhere.");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, IMPLICIT_SECTION_HEADING);
        assert_eq!(
            sections[0].content,
            "the first half of a sentence continues here."
        );
    }

    #[test]
    fn test_empty_input_has_no_sections() {
        assert!(markdown("").sections.is_empty());
        assert!(segment_plain_text("\n\n  \n").is_empty());
    }

    #[test]
    fn test_reparse_is_identical() {
        let src = "intro\n# A\nx\n## B\ny\n";
        assert_eq!(markdown(src), markdown(src));
    }

    #[test]
    fn test_section_count_invariant() {
        let src = "lead\n# A\n## B\n### C\ntext\n";
        let doc = markdown(src);
        // three headings plus the leading-content introduction
        assert_eq!(doc.sections.len(), 4);
    }

    #[test]
    fn test_inline_images_attach_to_open_section() {
        let src_dir = TempDir::new().unwrap();
        let out_dir = TempDir::new().unwrap();
        std::fs::write(src_dir.path().join("a.png"), b"a").unwrap();
        std::fs::write(src_dir.path().join("b.png"), b"b").unwrap();
        let md_path = src_dir.path().join("page.md");
        std::fs::write(
            &md_path,
            "![lead](a.png)\n# Figures\n![one](b.png) ![gone](nope.png)\n```\n![code](a.png)\n```\n",
        )
        .unwrap();

        let store = FsImageStore::create(out_dir.path()).unwrap();
        let mut seg = MarkdownSegmenter::with_images(&store);
        seg.add_file(&md_path).unwrap();
        let (doc, skipped) = seg.finish(Some("Album"));

        assert_eq!(doc.title, "Album");
        assert_eq!(doc.sections.len(), 2);
        assert_eq!(doc.sections[0].heading, IMPLICIT_SECTION_HEADING);
        assert_eq!(doc.sections[0].images, ["a.png"]);
        assert_eq!(doc.sections[1].images, ["b.png"]);
        assert_eq!(skipped.len(), 1);
        assert!(out_dir.path().join("b.png").exists());
    }

    #[test]
    fn test_ids_continue_across_files() {
        let dir = TempDir::new().unwrap();
        let one = dir.path().join("one.md");
        let two = dir.path().join("two.md");
        std::fs::write(&one, "# One\nfirst\n").unwrap();
        std::fs::write(&two, "---\nk: v\n---\n# Two\nsecond\n").unwrap();

        let mut seg = MarkdownSegmenter::new();
        seg.add_file(&one).unwrap();
        seg.add_file(&two).unwrap();
        assert_eq!(seg.source_count(), 2);
        let (doc, _) = seg.finish(None);

        let ids: Vec<&str> = doc.sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["section-1", "section-2"]);
        assert_eq!(doc.sections[1].content, "second");
    }

    #[test]
    fn test_missing_file_is_input_unavailable() {
        let mut seg = MarkdownSegmenter::new();
        let err = seg
            .add_file(Path::new("/definitely/not/here.md"))
            .unwrap_err();
        assert!(err.is_input_unavailable());
    }

    #[test]
    fn test_image_copy_failure_is_not_fatal() {
        let store = FailingWrites;
        let mut seg = MarkdownSegmenter::with_images(&store);
        seg.add_source("# Figures\n![chart](chart.png)\nCaption text\n", Some(Path::new("doc.md")));
        let (doc, skipped) = seg.finish(None);

        assert_eq!(doc.sections.len(), 1);
        assert!(doc.sections[0].images.is_empty());
        assert!(doc.sections[0].content.contains("Caption text"));
        assert_eq!(skipped.len(), 1);
        assert!(
            matches!(&skipped[0], ImageError::CopyFailed { name, detail } if name == "chart.png" && detail.contains("disk full")),
            "got: {skipped:?}"
        );
    }

    #[test]
    fn test_bom_and_crlf_before_heading() {
        let doc = markdown("\u{FEFF}# Title\r\nBody\r\n");
        assert_eq!(doc.sections.len(), 1);
        assert_eq!(doc.sections[0].heading, "Title");
        assert_eq!(doc.sections[0].content, "Body");
    }

    #[test]
    fn test_invisible_chars_kept_inside_fence() {
        let doc = markdown("# Code\nsoft\u{00AD}hyphen\n```\nlet s = \"a\u{00AD}b\u{200B}\";\n```\n");
        let content = &doc.sections[0].content;
        assert!(content.starts_with("softhyphen\n"), "got: {content:?}");
        assert!(content.contains("let s = \"a\u{00AD}b\u{200B}\";"));
    }

    #[test]
    fn test_plain_text_strips_soft_hyphens() {
        let sections = segment_plain_text("INTRO\u{00AD}DUCTION\nhyphen\u{00AD}ated words");
        assert_eq!(sections[0].heading, "INTRODUCTION");
        assert_eq!(sections[0].content, "hyphenated words");
    }
}
