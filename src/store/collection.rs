use crate::entity::Entity;
use crate::types::EntityId;
use bson::Document as BsonDocument;
use std::collections::HashMap;

/// Ordered collection of the entities of one type.
///
/// Entities live in an id-addressed arena; `order` records insertion order,
/// which is the default browse order.
#[derive(Debug, Clone, Default)]
pub struct EntityCollection {
    order: Vec<EntityId>,
    slots: HashMap<EntityId, Entity>,
}

impl EntityCollection {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn contains(&self, id: &EntityId) -> bool {
        self.slots.contains_key(id)
    }

    #[must_use]
    pub fn get(&self, id: &EntityId) -> Option<&Entity> {
        self.slots.get(id)
    }

    pub fn get_mut(&mut self, id: &EntityId) -> Option<&mut Entity> {
        self.slots.get_mut(id)
    }

    /// Append `entity` unless its id is already resident. Returns whether it was appended.
    pub fn push(&mut self, entity: Entity) -> bool {
        if self.slots.contains_key(&entity.id) {
            return false;
        }
        self.order.push(entity.id);
        self.slots.insert(entity.id, entity);
        true
    }

    /// Shallow-merge `fields` onto the resident entity with `id`. Returns whether one was found.
    pub fn assign(&mut self, id: &EntityId, fields: &BsonDocument) -> bool {
        match self.slots.get_mut(id) {
            Some(resident) => {
                resident.assign(fields);
                true
            }
            None => false,
        }
    }

    /// Excise the entity with `id`, returning it when it was resident.
    pub fn remove(&mut self, id: &EntityId) -> Option<Entity> {
        let removed = self.slots.remove(id)?;
        if let Some(pos) = self.order.iter().position(|x| x == id) {
            self.order.remove(pos);
        }
        Some(removed)
    }

    /// Entities in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.order.iter().filter_map(|id| self.slots.get(id))
    }

    /// Ids in insertion order.
    #[must_use]
    pub fn ids(&self) -> &[EntityId] {
        &self.order
    }

    /// Owned copy of the entities in insertion order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Entity> {
        self.iter().cloned().collect()
    }
}
