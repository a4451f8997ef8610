//! Host-facing entry points.
//!
//! A host calls [`on_save`] when persisting an edited field, [`on_display`]
//! when rendering a stored value for templates and [`on_edit_render`] to
//! fill the input control. [`TextRefField`] bundles a config and a catalog
//! so the host does not have to thread them through every call.

use tracing::debug;

use crate::catalog::Catalog;
use crate::config::{FieldConfig, ReturnFormat};
use crate::formatter::{format_string, format_value};
use crate::parser::parse_input;
use crate::types::{FieldInput, Rendered, Value};

/// Parse edited input into the value to persist.
pub fn on_save<C>(input: impl Into<FieldInput>, config: &FieldConfig, catalog: &C) -> Value
where
    C: Catalog + ?Sized,
{
    let config = config.with_return_format(ReturnFormat::Array);
    let value = parse_input(input.into(), &config, catalog);
    debug!(entries = value.len(), "field value saved");
    value
}

/// Render a stored value in the configured return format.
pub fn on_display<C>(stored: &Value, config: &FieldConfig, catalog: &C) -> Rendered
where
    C: Catalog + ?Sized,
{
    format_value(stored, config, catalog)
}

/// The editable string for the input control; the `string` return format
/// regardless of configuration.
pub fn on_edit_render(stored: &Value, config: &FieldConfig) -> String {
    format_string(stored, &config.with_return_format(ReturnFormat::String))
}

/// A configured text reference field bound to a catalog.
#[derive(Debug, Clone)]
pub struct TextRefField<C> {
    config: FieldConfig,
    catalog: C,
}

impl<C: Catalog> TextRefField<C> {
    pub fn new(config: FieldConfig, catalog: C) -> Self {
        Self { config, catalog }
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn on_save(&self, input: impl Into<FieldInput>) -> Value {
        on_save(input, &self.config, &self.catalog)
    }

    pub fn on_display(&self, stored: &Value) -> Rendered {
        on_display(stored, &self.config, &self.catalog)
    }

    pub fn on_edit_render(&self, stored: &Value) -> String {
        on_edit_render(stored, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntity, MemoryCatalog};
    use crate::types::Entry;
    use std::sync::Arc;

    fn field(format: ReturnFormat) -> TextRefField<MemoryCatalog> {
        let catalog = MemoryCatalog::from_entities(vec![
            CatalogEntity::new(10, "Dune", "book").with_permalink("/books/dune"),
            CatalogEntity::new(11, "Emma", "book"),
        ])
        .unwrap();
        let config = FieldConfig::default()
            .with_post_type("book")
            .with_multiple(true)
            .with_return_format(format);
        TextRefField::new(config, catalog)
    }

    #[test]
    fn save_ignores_display_format() {
        let field = field(ReturnFormat::List);
        let value = field.on_save("Dune; Unknown");
        assert_eq!(
            value.entries(),
            &[Entry::referenced("Dune", 10), Entry::text("Unknown")]
        );
    }

    #[test]
    fn save_passes_stored_value_through() {
        let field = field(ReturnFormat::Array);
        let stored = field.on_save("Dune; Emma");
        assert_eq!(field.on_save(stored.clone()), stored);
    }

    #[test]
    fn display_uses_configured_format() {
        let field = field(ReturnFormat::Inline);
        let stored = field.on_save("Dune; Emma");
        assert_eq!(
            field.on_display(&stored).as_text(),
            Some("<a href=\"/books/dune\">Dune</a>; Emma")
        );
    }

    #[test]
    fn edit_render_is_string_format() {
        let field = field(ReturnFormat::List);
        let stored = field.on_save("Dune;Emma [11]; Zed");
        assert_eq!(field.on_edit_render(&stored), "Dune [10];Emma [11];Zed");
    }

    #[test]
    fn edit_render_round_trips_through_save() {
        let field = field(ReturnFormat::Array);
        let stored = field.on_save(" Dune ;; Emma [11] ; Zed [99] ");
        let edited = field.on_edit_render(&stored);
        assert_eq!(field.on_save(edited.as_str()), stored);
    }

    #[test]
    fn shared_catalog_field() {
        let catalog: Arc<dyn Catalog> = Arc::new(
            MemoryCatalog::from_entities(vec![CatalogEntity::new(1, "Alpha", "post")]).unwrap(),
        );
        let field = TextRefField::new(FieldConfig::default(), Arc::clone(&catalog));
        assert_eq!(field.on_save("Alpha").entries(), &[Entry::referenced("Alpha", 1)]);
    }
}
