use super::Paragraph;

pub(crate) const CONTAINER_ID: &str = "messages";

/// Escape text for use as element content.
///
/// Matches what assigning to a node's text does: markup in the payload is
/// shown literally, never interpreted.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

pub(crate) fn render_container(paragraphs: &[Paragraph]) -> String {
    let mut out = format!("<div id=\"{CONTAINER_ID}\">");
    for paragraph in paragraphs {
        out.push_str("<p>");
        out.push_str(&escape_text(paragraph.text()));
        out.push_str("</p>");
    }
    out.push_str("</div>");
    out
}

pub(crate) fn render_page(container: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>remoteview</title></head>\n<body>{container}</body>\n</html>\n"
    )
}
