use crate::types::EntityId;
use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

/// A record held by the provider: an identity plus its top-level fields.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: EntityId,
    pub data: BsonDocument,
}

impl Entity {
    #[must_use]
    pub fn new(data: BsonDocument) -> Self {
        Self { id: EntityId::new(), data }
    }

    #[must_use]
    pub const fn with_id(id: EntityId, data: BsonDocument) -> Self {
        Self { id, data }
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Bson> {
        self.data.get(field)
    }

    /// Overwrite fields in place, returning `self` for chaining in tests and builders.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Bson>) -> &mut Self {
        self.data.insert(field.into(), value.into());
        self
    }

    /// Shallow merge: every top-level field of `source` is copied onto `self`.
    /// Fields missing from `source` are kept. The identity never changes.
    pub fn assign(&mut self, source: &BsonDocument) {
        for (k, v) in source {
            self.data.insert(k.clone(), v.clone());
        }
    }
}
