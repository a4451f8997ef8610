//! Core value types for the text reference field.
//!
//! An [`Entry`] is one `{text, reference_id}` pair; a [`Value`] is the
//! ordered list of entries that gets persisted. Both serialize via serde to
//! the shape hosts store: a list of objects with an optional `reference_id`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a catalog entity.
pub type EntityId = u64;

/// One resolved piece of a text reference field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Entry {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<EntityId>,
}

impl Entry {
    /// A free-text entry with no backing entity.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            reference_id: None,
        }
    }

    /// An entry referencing catalog entity `id`.
    pub fn referenced(text: impl Into<String>, id: EntityId) -> Self {
        Self {
            text: text.into(),
            reference_id: Some(id),
        }
    }

    pub fn is_referenced(&self) -> bool {
        self.reference_id.is_some()
    }
}

/// Renders the editable token: `text` or `text [id]`.
impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.reference_id {
            Some(id) => write!(f, "{} [{}]", self.text, id),
            None => f.write_str(&self.text),
        }
    }
}

/// Ordered list of entries; the persisted form of the field.
///
/// Order follows the order pieces appeared in the source string. An empty
/// input yields an empty `Value`, never an absent one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Value(Vec<Entry>);

impl Value {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn entries(&self) -> &[Entry] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Entry> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&Entry> {
        self.0.first()
    }

    pub fn into_entries(self) -> Vec<Entry> {
        self.0
    }
}

impl From<Vec<Entry>> for Value {
    fn from(entries: Vec<Entry>) -> Self {
        Self(entries)
    }
}

impl FromIterator<Entry> for Value {
    fn from_iter<I: IntoIterator<Item = Entry>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Value {
    type Item = Entry;
    type IntoIter = std::vec::IntoIter<Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Value {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Whatever a host hands to the save path.
///
/// Deserializes untagged from any JSON value: a list of entries passes
/// through, a string is parsed, anything else yields an empty [`Value`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldInput {
    Structured(Value),
    Text(String),
    Other(serde_json::Value),
}

impl From<&str> for FieldInput {
    fn from(text: &str) -> Self {
        FieldInput::Text(text.to_string())
    }
}

impl From<String> for FieldInput {
    fn from(text: String) -> Self {
        FieldInput::Text(text)
    }
}

impl From<Value> for FieldInput {
    fn from(value: Value) -> Self {
        FieldInput::Structured(value)
    }
}

/// Formatter output: the structured value for `array`, markup or a
/// delimited string otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rendered {
    Entries(Value),
    Text(String),
}

impl Rendered {
    /// The rendered string, if this is a textual form.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Rendered::Text(text) => Some(text),
            Rendered::Entries(_) => None,
        }
    }

    /// The structured value, if this is the `array` form.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Rendered::Entries(value) => Some(value),
            Rendered::Text(_) => None,
        }
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rendered::Text(text) => f.write_str(text),
            Rendered::Entries(value) => {
                let json = serde_json::to_string(value).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}
