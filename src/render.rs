use crate::document::ProbeDocument;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write;

const ERROR_COLOR: &str = "#dc3545";

/// The element whose inner HTML this crate owns. Every write replaces the
/// previous contents.
#[derive(Debug, Clone)]
pub struct OutputRegion {
    id: String,
    html: String,
    writes: u32,
}

impl OutputRegion {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            html: String::new(),
            writes: 0,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn writes(&self) -> u32 {
        self.writes
    }

    /// Number of cards currently displayed.
    pub fn card_count(&self) -> usize {
        self.html.matches(r#"<div class="result-item""#).count()
    }

    fn replace(&mut self, html: String) {
        self.html = html;
        self.writes += 1;
    }
}

pub fn welcome(region: &mut OutputRegion) {
    region.replace(card(
        "Welcome to Independence Probe Renderer",
        "This renderer displays results from independence probe analysis. \
         Load your probe data to see detailed results.",
        None,
    ));
}

/// One summary card followed by one card per result, in input order.
pub fn render(region: &mut OutputRegion, doc: &ProbeDocument) {
    let mut html = card(
        &format!("Independence Probe Results ({})", doc.probe_version),
        "Analysis completed successfully",
        None,
    );
    for result in &doc.results {
        html.push_str(&card(&result.title, &result.description, None));
    }
    region.replace(html);
}

pub fn display_error(region: &mut OutputRegion, message: &str) {
    region.replace(card("Error", message, Some(ERROR_COLOR)));
}

fn card(title: &str, description: &str, accent: Option<&str>) -> String {
    let (item_style, title_style) = match accent {
        Some(c) => (
            format!(r#" style="border-left-color: {c};""#),
            format!(r#" style="color: {c};""#),
        ),
        None => (String::new(), String::new()),
    };
    format!(
        r#"
<div class="result-item"{}>
    <div class="result-title"{}>{}</div>
    <div class="result-description">{}</div>
</div>
"#,
        item_style,
        title_style,
        encode_text(title),
        encode_text(description)
    )
}

/// Wrap the region in a standalone HTML page.
pub fn page_document(title: &str, region: &OutputRegion, generated: &str) -> String {
    let mut page = String::new();
    let title = encode_text(title);
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<style>
body {{ font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif; margin: 0; padding: 2rem; background: #f5f6f8; color: #222; }}
.container {{ max-width: 960px; margin: 0 auto; }}
.result-item {{ background: #fff; border-left: 4px solid #007bff; border-radius: 4px; padding: 1rem 1.25rem; margin-bottom: 1rem; box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08); }}
.result-title {{ font-weight: 600; margin-bottom: 0.5rem; }}
.result-description {{ color: #555; line-height: 1.5; }}
</style>
</head>
<body>
<!-- generated {generated} -->
<div class="container">
<h1>{title}</h1>
<div id="{id}">{content}</div>
</div>
</body>
</html>
"#,
        id = encode_double_quoted_attribute(region.id()),
        content = region.html(),
    );
    page
}
