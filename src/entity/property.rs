use super::core::Entity;
use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

pub(crate) const MAX_PATH_DEPTH: usize = 32;
const MAX_PATH_LEN: usize = 1024;

/// Reference to a property of an entity, addressed by a dotted path into its fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyRef {
    path: String,
}

impl PropertyRef {
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The value this property holds on `entity`, or `None` when absent.
    #[must_use]
    pub fn extract<'a>(&self, entity: &'a Entity) -> Option<&'a Bson> {
        get_path(&entity.data, &self.path)
    }
}

impl From<&str> for PropertyRef {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for PropertyRef {
    fn from(path: String) -> Self {
        Self::new(path)
    }
}

impl std::fmt::Display for PropertyRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

fn get_path<'a>(doc: &'a BsonDocument, path: &str) -> Option<&'a Bson> {
    if path.is_empty() || path.len() > MAX_PATH_LEN {
        return None;
    }
    let mut cur = doc;
    let mut parts = path.split('.').peekable();
    let mut segs = 0usize;
    while let Some(part) = parts.next() {
        segs += 1;
        if segs > MAX_PATH_DEPTH {
            return None;
        }
        let v = cur.get(part)?;
        if parts.peek().is_none() {
            return Some(v);
        }
        match v {
            Bson::Document(d) => cur = d,
            _ => return None,
        }
    }
    None
}
