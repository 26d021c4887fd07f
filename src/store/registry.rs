use super::collection::EntityCollection;
use crate::entity::TypeMetadata;
use crate::types::TypeName;
use std::collections::HashMap;

/// Mapping from entity type to its collection. Collections are created on
/// first use and live as long as the store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    collections: HashMap<TypeName, EntityCollection>,
}

impl RecordStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The collection for `meta`, created empty when the type has not been seen yet.
    pub fn collection_mut(&mut self, meta: &TypeMetadata) -> &mut EntityCollection {
        self.collections.entry(meta.name.clone()).or_insert_with(|| {
            log::debug!("creating collection for type {}", meta.name);
            EntityCollection::new()
        })
    }

    /// Read-only lookup; never creates.
    #[must_use]
    pub fn collection(&self, type_name: &str) -> Option<&EntityCollection> {
        self.collections.get(type_name)
    }

    #[must_use]
    pub fn type_names(&self) -> Vec<TypeName> {
        let mut names: Vec<TypeName> = self.collections.keys().cloned().collect();
        names.sort();
        names
    }
}
