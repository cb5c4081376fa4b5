//! Section builder: the single-pass state machine behind segmentation.
//!
//! ```text
//!              Heading                      Heading
//!  NoSection ───────────▶ InSection ───────────────────┐
//!      │                   ▲    │  flush + open new     │
//!      │ Content           │    └───────────────────────┘
//!      └─ open "Introduction"
//! ```
//!
//! The builder owns the section counter, so ids are unique for everything
//! one builder produces and two builders never interfere with each other.

use crate::output::Section;
use crate::pipeline::classify::{ContentJoin, LineEvent};
use tracing::debug;

/// Heading given to content that appears before any heading.
pub const IMPLICIT_SECTION_HEADING: &str = "Introduction";

/// Accumulates classified lines into an ordered list of [`Section`]s.
#[derive(Debug)]
pub struct SectionBuilder {
    join: ContentJoin,
    next_id: usize,
    current: Option<Section>,
    buffer: String,
    sections: Vec<Section>,
}

impl SectionBuilder {
    pub fn new(join: ContentJoin) -> Self {
        Self {
            join,
            next_id: 0,
            current: None,
            buffer: String::new(),
            sections: Vec::new(),
        }
    }

    /// Switch the join rule for subsequent content.
    pub fn set_join(&mut self, join: ContentJoin) {
        self.join = join;
    }

    /// Feed one classified line.
    pub fn push(&mut self, event: LineEvent<'_>) {
        match event {
            LineEvent::Heading { level, text } => self.open(level, text),
            LineEvent::Content(text) => self.append(text),
            LineEvent::Ignored => {}
        }
    }

    /// Flush the finished section (if any) and open a new one.
    pub fn open(&mut self, level: u8, heading: &str) {
        self.flush();
        self.next_id += 1;
        let section = Section::new(format!("section-{}", self.next_id), level, heading.trim());
        debug!("Opened {} (h{}): {}", section.id, section.level, section.heading);
        self.current = Some(section);
    }

    /// Append a content line, synthesising an introduction section if none
    /// is open yet. Blank lines never synthesise a section.
    pub fn append(&mut self, text: &str) {
        if self.current.is_none() {
            if text.trim().is_empty() {
                return;
            }
            self.open(1, IMPLICIT_SECTION_HEADING);
        }

        match self.join {
            ContentJoin::PreserveLines => {
                self.buffer.push_str(text);
                self.buffer.push('\n');
            }
            ContentJoin::Reflow => {
                let text = text.trim();
                if text.is_empty() {
                    return;
                }
                if !self.buffer.is_empty() {
                    self.buffer.push(' ');
                }
                self.buffer.push_str(text);
            }
        }
    }

    /// Attach an image filename to the open section.
    ///
    /// Returns `false` when no section is open.
    pub fn attach_image(&mut self, name: impl Into<String>) -> bool {
        match self.current.as_mut() {
            Some(section) => {
                section.images.push(name.into());
                true
            }
            None => false,
        }
    }

    /// Sections emitted so far, counting the open one.
    pub fn section_count(&self) -> usize {
        self.sections.len() + usize::from(self.current.is_some())
    }

    /// End of one input source: flush the open section.
    ///
    /// The id counter keeps running, so a later source continues the
    /// sequence.
    pub fn end_source(&mut self) {
        self.flush();
    }

    /// Flush and return every section, in reading order.
    pub fn finish(mut self) -> Vec<Section> {
        self.flush();
        self.sections
    }

    fn flush(&mut self) {
        if let Some(mut section) = self.current.take() {
            section.content = self.buffer.trim().to_string();
            self.sections.push(section);
        }
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(level: u8, text: &str) -> LineEvent<'_> {
        LineEvent::Heading { level, text }
    }

    #[test]
    fn test_heading_boundaries_flush() {
        let mut b = SectionBuilder::new(ContentJoin::PreserveLines);
        b.push(heading(1, "Title"));
        b.push(LineEvent::Content("Body text"));
        b.push(heading(2, "Sub"));
        b.push(LineEvent::Content("More text"));
        let sections = b.finish();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].id, "section-1");
        assert_eq!(sections[0].heading, "Title");
        assert_eq!(sections[0].content, "Body text");
        assert_eq!(sections[1].id, "section-2");
        assert_eq!(sections[1].level, 2);
        assert_eq!(sections[1].content, "More text");
    }

    #[test]
    fn test_leading_content_synthesises_introduction() {
        let mut b = SectionBuilder::new(ContentJoin::Reflow);
        b.push(LineEvent::Content("before"));
        b.push(heading(1, "First"));
        let sections = b.finish();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].heading, IMPLICIT_SECTION_HEADING);
        assert_eq!(sections[0].level, 1);
        assert_eq!(sections[0].content, "before");
        assert_eq!(sections[1].content, "");
    }

    #[test]
    fn test_leading_blank_lines_are_dropped() {
        let mut b = SectionBuilder::new(ContentJoin::PreserveLines);
        b.push(LineEvent::Content(""));
        b.push(LineEvent::Content("   "));
        b.push(heading(1, "Only"));
        let sections = b.finish();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].heading, "Only");
    }

    #[test]
    fn test_preserve_lines_keeps_breaks() {
        let mut b = SectionBuilder::new(ContentJoin::PreserveLines);
        b.push(heading(1, "Code"));
        b.push(LineEvent::Content("fn main() {"));
        b.push(LineEvent::Content("    run();"));
        b.push(LineEvent::Content("}"));
        b.push(LineEvent::Content(""));
        let sections = b.finish();
        assert_eq!(sections[0].content, "fn main() {\n    run();\n}");
    }

    #[test]
    fn test_reflow_joins_with_single_spaces() {
        let mut b = SectionBuilder::new(ContentJoin::Reflow);
        b.push(heading(1, "Prose"));
        b.push(LineEvent::Content("  first line "));
        b.push(LineEvent::Content(""));
        b.push(LineEvent::Content("second line"));
        let sections = b.finish();
        assert_eq!(sections[0].content, "first line second line");
    }

    #[test]
    fn test_ignored_has_no_effect() {
        let mut b = SectionBuilder::new(ContentJoin::Reflow);
        b.push(LineEvent::Ignored);
        assert_eq!(b.section_count(), 0);
        assert!(b.finish().is_empty());
    }

    #[test]
    fn test_ids_continue_across_sources() {
        let mut b = SectionBuilder::new(ContentJoin::PreserveLines);
        b.push(heading(1, "A"));
        b.push(LineEvent::Content("a"));
        b.end_source();
        b.push(LineEvent::Content("orphan"));
        b.push(heading(1, "B"));
        let sections = b.finish();

        let ids: Vec<&str> = sections.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["section-1", "section-2", "section-3"]);
        assert_eq!(sections[0].content, "a");
        assert_eq!(sections[1].heading, IMPLICIT_SECTION_HEADING);
        assert_eq!(sections[1].content, "orphan");
    }

    #[test]
    fn test_section_count_includes_open_section() {
        let mut b = SectionBuilder::new(ContentJoin::PreserveLines);
        assert_eq!(b.section_count(), 0);
        b.push(heading(1, "A"));
        assert_eq!(b.section_count(), 1);
        b.push(heading(2, "B"));
        b.end_source();
        assert_eq!(b.section_count(), 2);
    }

    #[test]
    fn test_attach_image_targets_open_section() {
        let mut b = SectionBuilder::new(ContentJoin::PreserveLines);
        assert!(!b.attach_image("early.png"));
        b.push(heading(1, "Figures"));
        assert!(b.attach_image("one.png"));
        assert!(b.attach_image("two.png"));
        let sections = b.finish();
        assert_eq!(sections[0].images, ["one.png", "two.png"]);
    }

    #[test]
    fn test_independent_builders_do_not_share_ids() {
        let mut a = SectionBuilder::new(ContentJoin::Reflow);
        let mut b = SectionBuilder::new(ContentJoin::Reflow);
        a.push(heading(1, "X"));
        b.push(heading(1, "Y"));
        assert_eq!(a.finish()[0].id, "section-1");
        assert_eq!(b.finish()[0].id, "section-1");
    }
}
