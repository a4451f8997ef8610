//! [`Value`] → display forms.
//!
//! `array` returns the value itself, `string` produces the editable
//! `text [id]` form, `list` and `inline` produce HTML with anchors for
//! referenced entries. The only catalog read is `get_permalink`.

use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::{trace, warn};

use crate::catalog::Catalog;
use crate::config::{FieldConfig, ReturnFormat};
use crate::types::{Entry, Rendered, Value};

/// Render `value` in the configured return format.
pub fn format_value<C>(value: &Value, config: &FieldConfig, catalog: &C) -> Rendered
where
    C: Catalog + ?Sized,
{
    trace!(
        entries = value.len(),
        format = %config.return_format,
        "formatting value"
    );
    match config.return_format {
        ReturnFormat::Array => Rendered::Entries(value.clone()),
        ReturnFormat::String => Rendered::Text(format_string(value, config)),
        ReturnFormat::List => Rendered::Text(format_list(value, config, catalog)),
        ReturnFormat::Inline => Rendered::Text(format_inline(value, config, catalog)),
    }
}

/// Separator-joined `text` / `text [id]` tokens. Not escaped.
pub fn format_string(value: &Value, config: &FieldConfig) -> String {
    visible_entries(value, config)
        .iter()
        .map(Entry::to_string)
        .collect::<Vec<_>>()
        .join(&config.separator)
}

/// `<ul><li>…</li></ul>`, or an empty string for an empty value.
pub fn format_list<C>(value: &Value, config: &FieldConfig, catalog: &C) -> String
where
    C: Catalog + ?Sized,
{
    let entries = visible_entries(value, config);
    if entries.is_empty() {
        return String::new();
    }
    let mut out = String::from("<ul>");
    for entry in entries {
        out.push_str("<li>");
        out.push_str(&render_item(entry, config, catalog));
        out.push_str("</li>");
    }
    out.push_str("</ul>");
    out
}

/// Items joined with the separator and a space.
pub fn format_inline<C>(value: &Value, config: &FieldConfig, catalog: &C) -> String
where
    C: Catalog + ?Sized,
{
    let glue = format!("{} ", config.separator);
    visible_entries(value, config)
        .iter()
        .map(|entry| render_item(entry, config, catalog))
        .collect::<Vec<_>>()
        .join(&glue)
}

/// Plain escaped text, or an anchor when the entry has a permalink.
pub fn render_item<C>(entry: &Entry, config: &FieldConfig, catalog: &C) -> String
where
    C: Catalog + ?Sized,
{
    let text = encode_text(&entry.text);
    let Some(id) = entry.reference_id else {
        return text.into_owned();
    };

    let permalink = match catalog.get_permalink(id) {
        Ok(permalink) => permalink,
        Err(e) => {
            warn!(id, %e, "permalink lookup failed, rendering plain text");
            None
        }
    };
    let Some(permalink) = permalink else {
        trace!(id, "no permalink, rendering plain text");
        return text.into_owned();
    };

    let href = encode_double_quoted_attribute(&permalink);
    if config.link_class.is_empty() {
        format!(r#"<a href="{href}">{text}</a>"#)
    } else {
        let class = encode_double_quoted_attribute(&config.link_class);
        format!(r#"<a href="{href}" class="{class}">{text}</a>"#)
    }
}

/// A single-value field shows at most its first entry.
fn visible_entries<'a>(value: &'a Value, config: &FieldConfig) -> &'a [Entry] {
    let entries = value.entries();
    if config.multiple {
        entries
    } else {
        &entries[..entries.len().min(1)]
    }
}
