// ABOUTME: HTML preview widget for tags
// ABOUTME: Renders a tag as a colored label span for list and detail pages

use crate::types::Tag;

impl Tag {
    /// HTML span showing the label on the tag's color
    pub fn preview_widget(&self) -> String {
        render_tag(self)
    }
}

/// Render a tag as an inline label, text color picked for contrast
pub fn render_tag(tag: &Tag) -> String {
    format!(
        r#"<span class="tag-label" style="background-color: {}; color: {};" title="{}">{}</span>"#,
        tag.color.to_hex(),
        tag.color.contrasting_text().to_hex(),
        html_escape(&tag.label),
        html_escape(&tag.label)
    )
}

/// Render several tags separated by spaces
pub fn render_tags(tags: &[Tag]) -> String {
    tags.iter().map(render_tag).collect::<Vec<_>>().join(" ")
}

fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
