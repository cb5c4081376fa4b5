//! Line classification: one line in, one [`LineEvent`] out.
//!
//! Each input format gets its own [`LineClassifier`]. The classifier owns
//! whatever format state it needs (code-fence and front-matter flags for
//! Markdown, nothing for plain text), so the section builder downstream
//! never has to know which format it is consuming.
//!
//! Classification is total: every possible line maps to some event, and a
//! line that does not look like a heading is content.

use once_cell::sync::Lazy;
use regex::Regex;

/// What a single line means to the section builder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent<'a> {
    /// Opens a new section.
    Heading { level: u8, text: &'a str },
    /// Body text for the open section.
    Content(&'a str),
    /// Markup with no content value (fence markers, front matter, blank
    /// plain-text lines).
    Ignored,
}

/// How the builder joins consecutive content lines of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentJoin {
    /// Keep line breaks (Markdown, so fenced code stays literal).
    PreserveLines,
    /// Join with single spaces (PDF text, whose line breaks are layout noise).
    Reflow,
}

/// Format-specific line classifier.
pub trait LineClassifier {
    /// Classify the next line of the stream.
    fn classify<'a>(&mut self, line: &'a str) -> LineEvent<'a>;

    /// The join rule the builder should use for this format.
    fn content_join(&self) -> ContentJoin;

    /// Whether the most recently classified line sat inside a literal block.
    ///
    /// Inline image references are not resolved inside literal blocks.
    fn in_literal_block(&self) -> bool {
        false
    }
}

// ── Markdown ─────────────────────────────────────────────────────────────────

static RE_MD_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})\s+(.+)$").unwrap());

const FRONT_MATTER_DELIMITER: &str = "---";
const CODE_FENCE: &str = "```";

/// Classifier for raw Markdown source.
///
/// Create one per source file: front matter is only recognised on the first
/// line the classifier sees.
#[derive(Debug, Default)]
pub struct MarkdownClassifier {
    lines_seen: usize,
    in_front_matter: bool,
    in_code_fence: bool,
}

impl MarkdownClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while between an opening and closing code fence.
    pub fn in_code_fence(&self) -> bool {
        self.in_code_fence
    }
}

impl LineClassifier for MarkdownClassifier {
    fn classify<'a>(&mut self, line: &'a str) -> LineEvent<'a> {
        self.lines_seen += 1;

        if self.lines_seen == 1 && line == FRONT_MATTER_DELIMITER {
            self.in_front_matter = true;
            return LineEvent::Ignored;
        }
        if self.in_front_matter {
            if line == FRONT_MATTER_DELIMITER {
                self.in_front_matter = false;
            }
            return LineEvent::Ignored;
        }

        if line.trim_start().starts_with(CODE_FENCE) {
            self.in_code_fence = !self.in_code_fence;
            return LineEvent::Ignored;
        }
        if self.in_code_fence {
            return LineEvent::Content(line);
        }

        match RE_MD_HEADING.captures(line) {
            Some(caps) => {
                let (Some(marks), Some(text)) = (caps.get(1), caps.get(2)) else {
                    return LineEvent::Content(line);
                };
                let text = text.as_str().trim();
                if text.is_empty() {
                    return LineEvent::Content(line);
                }
                LineEvent::Heading {
                    level: marks.as_str().len() as u8,
                    text,
                }
            }
            None => LineEvent::Content(line),
        }
    }

    fn content_join(&self) -> ContentJoin {
        ContentJoin::PreserveLines
    }

    fn in_literal_block(&self) -> bool {
        self.in_code_fence
    }
}

// ── Plain text (PDF-extracted) ───────────────────────────────────────────────

/// `1. Intro`, `1.1 Overview`, `2.3.4. Details` — integer groups then a capital.
static RE_NUMBERED_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+\.)+(\d+)?\s+[A-Z]").unwrap());

/// A capitalised run of letters and spaces, at least four characters long.
static RE_BARE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z\s]{3,}$").unwrap());

const BARE_HEADING_MAX_CHARS: usize = 100;

/// Classifier for plain text pulled out of a PDF.
///
/// PDF extraction keeps no font or layout information, so headings are
/// guessed from shape alone. The guess is deliberately simple and misfires
/// on short capitalised sentences and all-caps running text; there is no
/// confidence score.
#[derive(Debug, Default)]
pub struct PlainTextClassifier;

impl PlainTextClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl LineClassifier for PlainTextClassifier {
    fn classify<'a>(&mut self, line: &'a str) -> LineEvent<'a> {
        let line = line.trim();
        if line.is_empty() {
            return LineEvent::Ignored;
        }

        if let Some(m) = RE_NUMBERED_HEADING.find(line) {
            let number = line[..m.end()].split_whitespace().next().unwrap_or("");
            let groups = number.split('.').filter(|g| !g.is_empty()).count();
            return LineEvent::Heading {
                level: groups.clamp(1, 6) as u8,
                text: line,
            };
        }

        if line.chars().count() < BARE_HEADING_MAX_CHARS && RE_BARE_HEADING.is_match(line) {
            return LineEvent::Heading {
                level: 1,
                text: line,
            };
        }

        LineEvent::Content(line)
    }

    fn content_join(&self) -> ContentJoin {
        ContentJoin::Reflow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md_events(src: &str) -> Vec<LineEvent<'_>> {
        let mut c = MarkdownClassifier::new();
        src.lines().map(|l| c.classify(l)).collect()
    }

    #[test]
    fn test_markdown_heading_levels() {
        let mut c = MarkdownClassifier::new();
        assert_eq!(
            c.classify("# Title"),
            LineEvent::Heading {
                level: 1,
                text: "Title"
            }
        );
        assert_eq!(
            c.classify("###### Deep  "),
            LineEvent::Heading {
                level: 6,
                text: "Deep"
            }
        );
    }

    #[test]
    fn test_markdown_non_headings_are_content() {
        let mut c = MarkdownClassifier::new();
        assert_eq!(c.classify("####### seven"), LineEvent::Content("####### seven"));
        assert_eq!(c.classify("#hashtag"), LineEvent::Content("#hashtag"));
        assert_eq!(c.classify("plain"), LineEvent::Content("plain"));
        assert_eq!(c.classify(""), LineEvent::Content(""));
    }

    #[test]
    fn test_code_fence_suppresses_headings() {
        let events = md_events("```\n# not a heading\n```\n# Real");
        assert_eq!(
            events,
            vec![
                LineEvent::Ignored,
                LineEvent::Content("# not a heading"),
                LineEvent::Ignored,
                LineEvent::Heading {
                    level: 1,
                    text: "Real"
                },
            ]
        );
    }

    #[test]
    fn test_fence_with_info_string_toggles() {
        let mut c = MarkdownClassifier::new();
        assert_eq!(c.classify("```rust"), LineEvent::Ignored);
        assert!(c.in_code_fence());
        assert!(c.in_literal_block());
        assert_eq!(c.classify("## inside"), LineEvent::Content("## inside"));
        assert_eq!(c.classify("```"), LineEvent::Ignored);
        assert!(!c.in_code_fence());
    }

    #[test]
    fn test_front_matter_is_discarded() {
        let events = md_events("---\ntitle: x\n# fake\n---\n# Real");
        assert!(events[..4].iter().all(|e| *e == LineEvent::Ignored));
        assert_eq!(
            events[4],
            LineEvent::Heading {
                level: 1,
                text: "Real"
            }
        );
    }

    #[test]
    fn test_rule_after_first_line_is_content() {
        let events = md_events("Intro\n---\n# Next");
        assert_eq!(events[1], LineEvent::Content("---"));
        assert!(matches!(events[2], LineEvent::Heading { .. }));
    }

    #[test]
    fn test_plain_numbered_headings() {
        let mut c = PlainTextClassifier::new();
        assert_eq!(
            c.classify("1. Introduction"),
            LineEvent::Heading {
                level: 1,
                text: "1. Introduction"
            }
        );
        assert_eq!(
            c.classify("1.1 Overview"),
            LineEvent::Heading {
                level: 2,
                text: "1.1 Overview"
            }
        );
        assert_eq!(
            c.classify("  2.3.4. Details of the model  "),
            LineEvent::Heading {
                level: 3,
                text: "2.3.4. Details of the model"
            }
        );
    }

    #[test]
    fn test_plain_bare_heading() {
        let mut c = PlainTextClassifier::new();
        assert_eq!(
            c.classify("INTRODUCTION"),
            LineEvent::Heading {
                level: 1,
                text: "INTRODUCTION"
            }
        );
        assert_eq!(
            c.classify("Getting Started"),
            LineEvent::Heading {
                level: 1,
                text: "Getting Started"
            }
        );
    }

    #[test]
    fn test_plain_content_lines() {
        let mut c = PlainTextClassifier::new();
        assert_eq!(c.classify("Some content here."), LineEvent::Content("Some content here."));
        assert_eq!(c.classify("lowercase start"), LineEvent::Content("lowercase start"));
        assert_eq!(c.classify("Abc"), LineEvent::Content("Abc"));
        assert_eq!(c.classify("1 Overview"), LineEvent::Content("1 Overview"));
        assert_eq!(c.classify("   "), LineEvent::Ignored);
    }

    #[test]
    fn test_plain_bare_heading_length_cap() {
        let mut c = PlainTextClassifier::new();
        let long = format!("A{}", "b".repeat(99));
        assert_eq!(long.len(), 100);
        assert!(matches!(c.classify(&long), LineEvent::Content(_)));
        let short = format!("A{}", "b".repeat(98));
        assert!(matches!(c.classify(&short), LineEvent::Heading { level: 1, .. }));
    }

    #[test]
    fn test_plain_short_capitalised_sentence_misfires() {
        // Known approximation: no punctuation means it looks like a heading.
        let mut c = PlainTextClassifier::new();
        assert!(matches!(
            c.classify("This is a sentence"),
            LineEvent::Heading { level: 1, .. }
        ));
    }

    #[test]
    fn test_join_modes() {
        assert_eq!(MarkdownClassifier::new().content_join(), ContentJoin::PreserveLines);
        assert_eq!(PlainTextClassifier::new().content_join(), ContentJoin::Reflow);
        assert!(!PlainTextClassifier::new().in_literal_block());
    }
}
