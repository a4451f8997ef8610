//! The catalog capability consumed by the parser and formatter.
//!
//! A [`Catalog`] is the external store of named entities that text pieces
//! resolve against. The core only reads from it. [`MemoryCatalog`] is the
//! bundled implementation, built in code or loaded from a YAML document:
//!
//! ```yaml
//! entities:
//!   - id: 1
//!     name: Alpha
//!     type: post
//!     permalink: https://example.com/alpha
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CatalogError, CatalogResult};
use crate::types::EntityId;

/// Read-only access to a store of named, typed entities.
///
/// Errors are allowed so that networked stores can report outages; callers
/// in this crate treat every error as "no match".
pub trait Catalog {
    /// Id of the entity of type `post_type` whose name equals `name`
    /// exactly. When several match, the implementation picks one
    /// deterministically.
    fn find_by_exact_name(&self, name: &str, post_type: &str) -> CatalogResult<Option<EntityId>>;

    fn get_name(&self, id: EntityId) -> CatalogResult<Option<String>>;

    fn get_type(&self, id: EntityId) -> CatalogResult<Option<String>>;

    /// Public location of the entity, if it has one.
    fn get_permalink(&self, id: EntityId) -> CatalogResult<Option<String>>;
}

impl<T: Catalog + ?Sized> Catalog for &T {
    fn find_by_exact_name(&self, name: &str, post_type: &str) -> CatalogResult<Option<EntityId>> {
        (**self).find_by_exact_name(name, post_type)
    }

    fn get_name(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_name(id)
    }

    fn get_type(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_type(id)
    }

    fn get_permalink(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_permalink(id)
    }
}

impl<T: Catalog + ?Sized> Catalog for Box<T> {
    fn find_by_exact_name(&self, name: &str, post_type: &str) -> CatalogResult<Option<EntityId>> {
        (**self).find_by_exact_name(name, post_type)
    }

    fn get_name(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_name(id)
    }

    fn get_type(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_type(id)
    }

    fn get_permalink(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_permalink(id)
    }
}

impl<T: Catalog + ?Sized> Catalog for Arc<T> {
    fn find_by_exact_name(&self, name: &str, post_type: &str) -> CatalogResult<Option<EntityId>> {
        (**self).find_by_exact_name(name, post_type)
    }

    fn get_name(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_name(id)
    }

    fn get_type(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_type(id)
    }

    fn get_permalink(&self, id: EntityId) -> CatalogResult<Option<String>> {
        (**self).get_permalink(id)
    }
}

/// One named entity in a [`MemoryCatalog`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub id: EntityId,
    pub name: String,
    #[serde(rename = "type")]
    pub post_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permalink: Option<String>,
}

impl CatalogEntity {
    pub fn new(id: EntityId, name: impl Into<String>, post_type: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            post_type: post_type.into(),
            permalink: None,
        }
    }

    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    entities: Vec<CatalogEntity>,
}

/// In-memory catalog indexed by id and by `(type, name)`.
///
/// Exact-name lookups that match several entities return the lowest id.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    entities: Vec<CatalogEntity>,
    id_index: HashMap<EntityId, usize>,
    name_index: HashMap<(String, String), usize>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from entities, rejecting duplicate ids.
    pub fn from_entities(entities: impl IntoIterator<Item = CatalogEntity>) -> CatalogResult<Self> {
        let mut catalog = Self::new();
        for entity in entities {
            catalog.insert(entity)?;
        }
        Ok(catalog)
    }

    pub fn from_yaml_str(yaml: &str) -> CatalogResult<Self> {
        let document: CatalogDocument = serde_yaml::from_str(yaml)?;
        let catalog = Self::from_entities(document.entities)?;
        debug!(entities = catalog.len(), "catalog loaded");
        Ok(catalog)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Add an entity. Ids are unique.
    pub fn insert(&mut self, entity: CatalogEntity) -> CatalogResult<()> {
        if self.id_index.contains_key(&entity.id) {
            return Err(CatalogError::DuplicateId { id: entity.id });
        }
        let idx = self.entities.len();
        self.index_name(&entity.post_type, &entity.name, entity.id, idx);
        self.id_index.insert(entity.id, idx);
        self.entities.push(entity);
        Ok(())
    }

    /// Remove an entity by id.
    pub fn remove(&mut self, id: EntityId) -> Option<CatalogEntity> {
        let idx = self.id_index.get(&id).copied()?;
        let removed = self.entities.remove(idx);
        self.reindex();
        Some(removed)
    }

    pub fn get(&self, id: EntityId) -> Option<&CatalogEntity> {
        self.id_index.get(&id).map(|&i| &self.entities[i])
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    fn index_name(&mut self, post_type: &str, name: &str, id: EntityId, idx: usize) {
        let key = (post_type.to_string(), name.to_string());
        let keep_existing = self
            .name_index
            .get(&key)
            .is_some_and(|&existing| self.entities[existing].id < id);
        if !keep_existing {
            self.name_index.insert(key, idx);
        }
    }

    fn reindex(&mut self) {
        self.id_index.clear();
        self.name_index.clear();
        for idx in 0..self.entities.len() {
            let entity = &self.entities[idx];
            let (id, post_type, name) = (entity.id, entity.post_type.clone(), entity.name.clone());
            self.id_index.insert(id, idx);
            self.index_name(&post_type, &name, id, idx);
        }
    }
}

impl Catalog for MemoryCatalog {
    fn find_by_exact_name(&self, name: &str, post_type: &str) -> CatalogResult<Option<EntityId>> {
        Ok(self
            .name_index
            .get(&(post_type.to_string(), name.to_string()))
            .map(|&i| self.entities[i].id))
    }

    fn get_name(&self, id: EntityId) -> CatalogResult<Option<String>> {
        Ok(self.get(id).map(|e| e.name.clone()))
    }

    fn get_type(&self, id: EntityId) -> CatalogResult<Option<String>> {
        Ok(self.get(id).map(|e| e.post_type.clone()))
    }

    fn get_permalink(&self, id: EntityId) -> CatalogResult<Option<String>> {
        Ok(self.get(id).and_then(|e| e.permalink.clone()))
    }
}
