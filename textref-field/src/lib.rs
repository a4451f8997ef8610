//! Text reference field
//!
//! `textref-field` converts between a human-editable string such as
//! `"Title [42]; Other Title"` and a structured list of
//! `{text, reference_id}` entries, resolving free text against an external
//! catalog of named entities and rendering resolved entries as links.
//!
//! # Architecture
//!
//! - **Parser**: raw text → [`Value`]. Splits on the configured separator,
//!   honours explicit `"<label> [<id>]"` annotations, falls back to exact
//!   name lookup in the [`Catalog`].
//! - **Formatter**: [`Value`] → [`Rendered`]. Delimited string, HTML list,
//!   inline HTML or the structured value itself.
//! - **Fail open**: catalog failures never reach the caller; an unresolvable
//!   piece is kept as free text.
//! - **Host entry points**: [`TextRefField`] bundles a [`FieldConfig`] and a
//!   catalog and exposes `on_save`, `on_display` and `on_edit_render`.

pub mod catalog;
pub mod config;
pub mod error;
pub mod field;
pub mod formatter;
pub mod parser;
pub mod types;

pub use catalog::{Catalog, CatalogEntity, MemoryCatalog};
pub use config::{ConfigLoader, FieldConfig, ReturnFormat};
pub use error::{CatalogError, CatalogResult, ConfigError, ConfigResult};
pub use field::{on_display, on_edit_render, on_save, TextRefField};
pub use formatter::format_value;
pub use parser::{parse_input, parse_text};
pub use types::{EntityId, Entry, FieldInput, Rendered, Value};
