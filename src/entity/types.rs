use crate::types::TypeName;
use serde::{Deserialize, Serialize};

/// One declared property of an entity type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMetadata {
    pub name: String,
    #[serde(default)]
    pub key: bool,
}

/// Identity and declared shape of an entity type. The name keys the store;
/// the declaration order of properties drives positional key lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeMetadata {
    pub name: TypeName,
    #[serde(default)]
    pub properties: Vec<PropertyMetadata>,
}

impl TypeMetadata {
    #[must_use]
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self { name: name.into(), properties: Vec::new() }
    }

    /// Declare a key-bearing property.
    #[must_use]
    pub fn with_key(mut self, name: impl Into<String>) -> Self {
        self.properties.push(PropertyMetadata { name: name.into(), key: true });
        self
    }

    /// Declare a plain property.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>) -> Self {
        self.properties.push(PropertyMetadata { name: name.into(), key: false });
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key-bearing properties in declaration order.
    pub fn key_properties(&self) -> impl Iterator<Item = &PropertyMetadata> {
        self.properties.iter().filter(|p| p.key)
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.key_properties().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_properties_keep_declaration_order() {
        let meta = TypeMetadata::new("orders")
            .with_key("region")
            .with_property("total")
            .with_key("number");
        let keys: Vec<&str> = meta.key_properties().map(|p| p.name.as_str()).collect();
        assert_eq!(keys, vec!["region", "number"]);
        assert_eq!(meta.key_count(), 2);
        assert_eq!(meta.name(), "orders");
    }
}
