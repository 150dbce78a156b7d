//! HTML for the city controls.
//!
//! Labels are escaped unless the caller opts into [`MarkupPolicy::TrustedRaw`],
//! which inserts them verbatim. Only use that for a document served with the
//! page itself; it is a trust boundary, not a convenience.

use crate::registry::CityRegistry;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum MarkupPolicy {
    #[default]
    Escaped,
    TrustedRaw,
}

pub const CONTROL_CLASS: &str = "city";

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
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

/// One control per city, in registry order.
pub fn render_controls(registry: &CityRegistry, policy: MarkupPolicy) -> String {
    registry
        .iter()
        .map(|city| {
            let label = match policy {
                MarkupPolicy::Escaped => escape_html(&city.label),
                MarkupPolicy::TrustedRaw => city.label.clone(),
            };
            format!(
                r#"<div class="{CONTROL_CLASS}" data-section="{}" role="button">{label}</div>"#,
                escape_html(&city.section)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
