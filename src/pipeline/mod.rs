//! Pipeline stages for document segmentation.
//!
//! Each submodule implements one step, so each is testable on its own.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ normalize ──▶ classify ──▶ builder ──▶ assemble
//! (URL/path) (pdfium)    (text)       (per line)   (sections)  (Document)
//!                                                     ▲
//!                                          images ────┘
//! ```
//!
//! 1. [`input`]     — canonicalise a path or URL to a local PDF; discover
//!    Markdown files under a directory
//! 2. [`extract`]   — pull page text and embedded images out of a PDF; runs
//!    in `spawn_blocking` because pdfium is not async-safe
//! 3. [`normalize`] — line endings and invisible characters
//! 4. [`classify`]  — Markdown and plain-text line classifiers
//! 5. [`builder`]   — the section state machine and id counter
//! 6. [`images`]    — inline (Markdown) and distributive (PDF) image
//!    association
//! 7. [`assemble`]  — title + sections → [`crate::output::Document`]
//!
//! [`segment`] wires 3–6 into one loop per source.

pub mod assemble;
pub mod builder;
pub mod classify;
pub mod extract;
pub mod images;
pub mod input;
pub mod normalize;
pub mod segment;
