//! HTML generator: renders `index.html` from the page template.

use crate::error::DocTrainerError;
use crate::generate::write_atomic;
use crate::output::Document;
use crate::templates::DEFAULT_PAGE_TEMPLATE;
use minijinja::{context, AutoEscape, Environment, Value};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

const PAGE_TEMPLATE_NAME: &str = "index.html";

/// One entry of the sidebar navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub id: String,
    pub heading: String,
    pub level: u8,
}

/// Navigation entries in section order.
pub fn nav_items(doc: &Document) -> Vec<NavItem> {
    doc.sections
        .iter()
        .map(|s| NavItem {
            id: s.id.clone(),
            heading: s.heading.clone(),
            level: s.level,
        })
        .collect()
}

/// Render the page to a string. `template` replaces the built-in layout.
pub fn render(doc: &Document, template: Option<&str>) -> Result<String, DocTrainerError> {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_filter("format_content", format_content);
    env.add_template(PAGE_TEMPLATE_NAME, template.unwrap_or(DEFAULT_PAGE_TEMPLATE))
        .map_err(|e| DocTrainerError::TemplateFailed(e.to_string()))?;

    let page = env
        .get_template(PAGE_TEMPLATE_NAME)
        .map_err(|e| DocTrainerError::TemplateFailed(e.to_string()))?;

    page.render(context! {
        title => &doc.title,
        sections => &doc.sections,
        nav => nav_items(doc),
    })
    .map_err(|e| DocTrainerError::TemplateFailed(e.to_string()))
}

/// Write `index.html` into `output_dir`.
pub fn generate(
    doc: &Document,
    output_dir: &Path,
    template: Option<&str>,
) -> Result<PathBuf, DocTrainerError> {
    let html = render(doc, template)?;
    let path = output_dir.join(PAGE_TEMPLATE_NAME);
    write_atomic(&path, html.as_bytes())?;
    info!("Generated: {}", path.display());
    Ok(path)
}

/// Template filter: blank-line separated paragraphs become `<p>` elements,
/// single newlines become `<br>`.
fn format_content(value: String) -> Value {
    let html = value
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(|p| {
            let lines: Vec<String> = p.lines().map(escape_html).collect();
            format!("<p>{}</p>", lines.join("<br>\n"))
        })
        .collect::<Vec<_>>()
        .join("\n");
    Value::from_safe_string(html)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}
