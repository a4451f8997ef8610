//! Raw text → [`Value`].
//!
//! The raw string is split on the configured separator, each piece trimmed
//! and empty pieces dropped. A piece ending in `" [<digits>]"` carries an
//! explicit reference; any other piece is looked up by exact name. Every
//! failure along the way degrades the piece to free text.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::config::FieldConfig;
use crate::error::CatalogResult;
use crate::types::{EntityId, Entry, FieldInput, Value};

/// `<label> [<digits>]` with the brackets as the final token. Only spaces
/// may separate label and brackets.
static ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^(.+?) +\[(\d+)\]$").expect("annotation pattern is valid"));

/// How a single piece was resolved. Only logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Referenced,
    ResolutionMiss,
    TypeMismatch,
    MalformedAnnotation,
}

impl Outcome {
    fn as_str(self) -> &'static str {
        match self {
            Outcome::Referenced => "referenced",
            Outcome::ResolutionMiss => "resolution_miss",
            Outcome::TypeMismatch => "type_mismatch",
            Outcome::MalformedAnnotation => "malformed_annotation",
        }
    }
}

/// Parse host input. Structured values pass through untouched, text is
/// parsed, anything else is empty.
pub fn parse_input<C>(input: FieldInput, config: &FieldConfig, catalog: &C) -> Value
where
    C: Catalog + ?Sized,
{
    match input {
        FieldInput::Structured(value) => value,
        FieldInput::Text(raw) => parse_text(&raw, config, catalog),
        FieldInput::Other(other) => {
            debug!(kind = json_kind(&other), "non-text input parsed as empty value");
            Value::new()
        }
    }
}

/// Parse a raw string into resolved entries, in source order.
pub fn parse_text<C>(raw: &str, config: &FieldConfig, catalog: &C) -> Value
where
    C: Catalog + ?Sized,
{
    split_pieces(raw, config)
        .into_iter()
        .map(|piece| resolve_piece(piece, config, catalog))
        .collect()
}

/// Split, trim and drop empty pieces. With `multiple` off only the first
/// non-empty piece survives.
pub fn split_pieces<'a>(raw: &'a str, config: &FieldConfig) -> Vec<&'a str> {
    let pieces: Vec<&str> = if config.separator.is_empty() {
        vec![raw.trim()]
    } else {
        raw.split(config.separator.as_str()).map(str::trim).collect()
    };
    let mut pieces: Vec<&str> = pieces.into_iter().filter(|p| !p.is_empty()).collect();

    if !config.multiple && pieces.len() > 1 {
        debug!(
            discarded = pieces.len() - 1,
            "single-value field, keeping first piece only"
        );
        pieces.truncate(1);
    }
    pieces
}

/// Resolve one trimmed piece against the catalog.
pub fn resolve_piece<C>(piece: &str, config: &FieldConfig, catalog: &C) -> Entry
where
    C: Catalog + ?Sized,
{
    let (entry, outcome) = match split_annotation(piece) {
        Annotation::Explicit { label, id } => resolve_annotated(label, id, config, catalog),
        Annotation::Malformed => {
            let (entry, _) = resolve_by_name(piece, config, catalog);
            (entry, Outcome::MalformedAnnotation)
        }
        Annotation::None => resolve_by_name(piece, config, catalog),
    };
    debug!(
        piece,
        reference_id = entry.reference_id,
        outcome = outcome.as_str(),
        "resolved piece"
    );
    entry
}

enum Annotation<'a> {
    Explicit { label: &'a str, id: EntityId },
    /// Bracket digits present but not a valid id
    Malformed,
    None,
}

fn split_annotation(piece: &str) -> Annotation<'_> {
    let Some(caps) = ANNOTATION.captures(piece) else {
        return Annotation::None;
    };
    let (Some(label), Some(digits)) = (caps.get(1), caps.get(2)) else {
        return Annotation::None;
    };
    match digits.as_str().parse::<EntityId>() {
        Ok(id) => Annotation::Explicit {
            label: label.as_str(),
            id,
        },
        Err(_) => Annotation::Malformed,
    }
}

fn resolve_annotated<C>(
    label: &str,
    id: EntityId,
    config: &FieldConfig,
    catalog: &C,
) -> (Entry, Outcome)
where
    C: Catalog + ?Sized,
{
    match fail_open(catalog.get_type(id), "get_type") {
        Some(post_type) if post_type == config.post_type => {
            match fail_open(catalog.get_name(id), "get_name") {
                Some(name) => (Entry::referenced(name, id), Outcome::Referenced),
                None => (Entry::text(label), Outcome::ResolutionMiss),
            }
        }
        Some(_) => (Entry::text(label), Outcome::TypeMismatch),
        None => (Entry::text(label), Outcome::ResolutionMiss),
    }
}

fn resolve_by_name<C>(piece: &str, config: &FieldConfig, catalog: &C) -> (Entry, Outcome)
where
    C: Catalog + ?Sized,
{
    let found = fail_open(
        catalog.find_by_exact_name(piece, &config.post_type),
        "find_by_exact_name",
    );
    let Some(id) = found else {
        return (Entry::text(piece), Outcome::ResolutionMiss);
    };

    // The catalog filters by type already; check again so a lenient store
    // cannot hand back an entity of another type.
    match fail_open(catalog.get_type(id), "get_type") {
        Some(post_type) if post_type == config.post_type => {
            (Entry::referenced(piece, id), Outcome::Referenced)
        }
        Some(_) => (Entry::text(piece), Outcome::TypeMismatch),
        None => (Entry::text(piece), Outcome::ResolutionMiss),
    }
}

/// Collapse a catalog error into "not found".
fn fail_open<T>(result: CatalogResult<Option<T>>, operation: &str) -> Option<T> {
    match result {
        Ok(found) => found,
        Err(e) => {
            warn!(operation, %e, "catalog lookup failed, treating piece as free text");
            None
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogEntity, MemoryCatalog};
    use crate::error::CatalogError;

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::from_entities(vec![
            CatalogEntity::new(123, "Alpha", "post"),
            CatalogEntity::new(7, "Beta", "post"),
            CatalogEntity::new(8, "Gamma", "page"),
        ])
        .unwrap()
    }

    fn multi() -> FieldConfig {
        FieldConfig::default().with_multiple(true)
    }

    /// A catalog whose every call fails.
    struct Offline;

    impl Catalog for Offline {
        fn find_by_exact_name(&self, _: &str, _: &str) -> CatalogResult<Option<EntityId>> {
            Err(CatalogError::unavailable("offline"))
        }
        fn get_name(&self, _: EntityId) -> CatalogResult<Option<String>> {
            Err(CatalogError::unavailable("offline"))
        }
        fn get_type(&self, _: EntityId) -> CatalogResult<Option<String>> {
            Err(CatalogError::unavailable("offline"))
        }
        fn get_permalink(&self, _: EntityId) -> CatalogResult<Option<String>> {
            Err(CatalogError::unavailable("offline"))
        }
    }

    /// Knows the type of every id but cannot read names.
    struct Nameless {
        fail: bool,
    }

    impl Catalog for Nameless {
        fn find_by_exact_name(&self, _: &str, _: &str) -> CatalogResult<Option<EntityId>> {
            Ok(None)
        }
        fn get_name(&self, _: EntityId) -> CatalogResult<Option<String>> {
            if self.fail {
                Err(CatalogError::unavailable("names offline"))
            } else {
                Ok(None)
            }
        }
        fn get_type(&self, _: EntityId) -> CatalogResult<Option<String>> {
            Ok(Some("post".into()))
        }
        fn get_permalink(&self, _: EntityId) -> CatalogResult<Option<String>> {
            Ok(None)
        }
    }

    /// Ignores the type filter on name lookups.
    struct Lenient(MemoryCatalog);

    impl Catalog for Lenient {
        fn find_by_exact_name(&self, name: &str, _: &str) -> CatalogResult<Option<EntityId>> {
            for post_type in ["post", "page"] {
                if let Some(id) = self.0.find_by_exact_name(name, post_type)? {
                    return Ok(Some(id));
                }
            }
            Ok(None)
        }
        fn get_name(&self, id: EntityId) -> CatalogResult<Option<String>> {
            self.0.get_name(id)
        }
        fn get_type(&self, id: EntityId) -> CatalogResult<Option<String>> {
            self.0.get_type(id)
        }
        fn get_permalink(&self, id: EntityId) -> CatalogResult<Option<String>> {
            self.0.get_permalink(id)
        }
    }

    #[test]
    fn empty_input_is_empty_value() {
        assert!(parse_text("", &multi(), &catalog()).is_empty());
        assert!(parse_text("  ; ;  ", &multi(), &catalog()).is_empty());
    }

    #[test]
    fn split_trims_and_drops_empty_pieces() {
        let pieces = split_pieces(" A ;; B ;", &multi());
        assert_eq!(pieces, vec!["A", "B"]);
    }

    #[test]
    fn single_value_keeps_first_non_empty_piece() {
        let pieces = split_pieces(" ; B ; C", &FieldConfig::default());
        assert_eq!(pieces, vec!["B"]);
    }

    #[test]
    fn multi_character_separator() {
        let config = multi().with_separator(" | ");
        let pieces = split_pieces("A | B|C", &config);
        assert_eq!(pieces, vec!["A", "B|C"]);
    }

    #[test]
    fn empty_separator_keeps_whole_input() {
        let config = FieldConfig::default().with_separator("");
        assert_eq!(split_pieces("  A; B ", &config), vec!["A; B"]);
    }

    #[test]
    fn annotation_uses_catalog_name() {
        let value = parse_text("A [123]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::referenced("Alpha", 123)]);
    }

    #[test]
    fn annotation_with_unknown_id_keeps_label() {
        let value = parse_text("A [999]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("A")]);
    }

    #[test]
    fn annotation_with_other_type_keeps_label() {
        let value = parse_text("Gamma [8]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("Gamma")]);
    }

    #[test]
    fn annotation_label_is_everything_before_last_bracket() {
        let value = parse_text("Best of [2020] [999]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("Best of [2020]")]);
    }

    #[test]
    fn overflowing_digits_fall_back_to_name_lookup() {
        let raw = "Alpha [99999999999999999999999]";
        let value = parse_text(raw, &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text(raw)]);
    }

    #[test]
    fn non_numeric_brackets_are_plain_text() {
        let value = parse_text("Alpha [abc]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("Alpha [abc]")]);
    }

    #[test]
    fn tab_before_bracket_is_not_an_annotation() {
        let value = parse_text("X\t[123]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("X\t[123]")]);
    }

    #[test]
    fn several_spaces_before_bracket_still_annotate() {
        let value = parse_text("X   [123]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::referenced("Alpha", 123)]);
    }

    #[test]
    fn annotation_without_readable_name_keeps_label() {
        let value = parse_text("Label [5]", &multi(), &Nameless { fail: false });
        assert_eq!(value.entries(), &[Entry::text("Label")]);
    }

    #[test_log::test]
    fn annotation_with_failing_name_lookup_keeps_label() {
        let value = parse_text("Label [5]", &multi(), &Nameless { fail: true });
        assert_eq!(value.entries(), &[Entry::text("Label")]);
    }

    #[test]
    fn bare_bracket_is_not_an_annotation() {
        let value = parse_text("[123]", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("[123]")]);
    }

    #[test]
    fn exact_name_match_resolves() {
        let value = parse_text("Beta", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::referenced("Beta", 7)]);
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let value = parse_text("beta", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("beta")]);
    }

    #[test]
    fn name_match_respects_post_type() {
        let value = parse_text("Gamma", &multi(), &catalog());
        assert_eq!(value.entries(), &[Entry::text("Gamma")]);

        let pages = multi().with_post_type("page");
        let value = parse_text("Gamma", &pages, &catalog());
        assert_eq!(value.entries(), &[Entry::referenced("Gamma", 8)]);
    }

    #[test]
    fn lenient_catalog_is_type_checked() {
        let value = parse_text("Gamma", &multi(), &Lenient(catalog()));
        assert_eq!(value.entries(), &[Entry::text("Gamma")]);
    }

    #[test]
    fn keeps_source_order() {
        let value = parse_text("Gamma; Beta ;Unknown;A [123]", &multi(), &catalog());
        assert_eq!(
            value.entries(),
            &[
                Entry::text("Gamma"),
                Entry::referenced("Beta", 7),
                Entry::text("Unknown"),
                Entry::referenced("Alpha", 123),
            ]
        );
    }

    #[test]
    fn structured_input_passes_through() {
        let stored = Value::from(vec![Entry::referenced("Renamed", 7), Entry::text("x")]);
        let value = parse_input(FieldInput::Structured(stored.clone()), &multi(), &catalog());
        assert_eq!(value, stored);
    }

    #[test]
    fn non_text_input_is_empty() {
        let value = parse_input(
            FieldInput::Other(serde_json::json!({"a": 1})),
            &multi(),
            &catalog(),
        );
        assert!(value.is_empty());
    }

    #[test_log::test]
    fn offline_catalog_fails_open() {
        let value = parse_text("Alpha [123]; Beta", &multi(), &Offline);
        assert_eq!(value.entries(), &[Entry::text("Alpha"), Entry::text("Beta")]);
    }
}
