use bson::{Bson, Document as BsonDocument};
use serde::{Deserialize, Serialize};

use super::EntityProvider;
use crate::entity::{Entity, TypeMetadata};
use crate::errors::Result;
use crate::query::{BatchReport, BrowseOptions, PaginatedResult};

/// One provider operation, addressed to the entity type it carries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "camelCase")]
pub enum Command {
    Add { meta: TypeMetadata, entity: Entity },
    BulkAdd { meta: TypeMetadata, entities: Vec<Entity> },
    Update { meta: TypeMetadata, entity: Entity },
    BulkUpdate { meta: TypeMetadata, entities: Vec<Entity> },
    BatchUpdate {
        meta: TypeMetadata,
        #[serde(default)]
        options: BrowseOptions,
        fields: BsonDocument,
    },
    Save { meta: TypeMetadata, entity: Entity },
    BulkSave { meta: TypeMetadata, entities: Vec<Entity> },
    Remove { meta: TypeMetadata, entity: Entity },
    BulkRemove { meta: TypeMetadata, entities: Vec<Entity> },
    BatchRemove {
        meta: TypeMetadata,
        #[serde(default)]
        options: BrowseOptions,
    },
    QueryOne {
        meta: TypeMetadata,
        key_values: Vec<Bson>,
        #[serde(default)]
        options: BrowseOptions,
    },
    QueryMany {
        meta: TypeMetadata,
        #[serde(default)]
        options: BrowseOptions,
    },
}

impl Command {
    #[must_use]
    pub const fn meta(&self) -> &TypeMetadata {
        match self {
            Self::Add { meta, .. }
            | Self::BulkAdd { meta, .. }
            | Self::Update { meta, .. }
            | Self::BulkUpdate { meta, .. }
            | Self::BatchUpdate { meta, .. }
            | Self::Save { meta, .. }
            | Self::BulkSave { meta, .. }
            | Self::Remove { meta, .. }
            | Self::BulkRemove { meta, .. }
            | Self::BatchRemove { meta, .. }
            | Self::QueryOne { meta, .. }
            | Self::QueryMany { meta, .. } => meta,
        }
    }

    /// Operation name as used in audit lines.
    #[must_use]
    pub const fn op(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::BulkAdd { .. } => "bulk_add",
            Self::Update { .. } => "update",
            Self::BulkUpdate { .. } => "bulk_update",
            Self::BatchUpdate { .. } => "batch_update",
            Self::Save { .. } => "save",
            Self::BulkSave { .. } => "bulk_save",
            Self::Remove { .. } => "remove",
            Self::BulkRemove { .. } => "bulk_remove",
            Self::BatchRemove { .. } => "batch_remove",
            Self::QueryOne { .. } => "query_one",
            Self::QueryMany { .. } => "query_many",
        }
    }
}

#[derive(Debug, Clone)]
pub enum CommandResult {
    Entity(Entity),
    Entities(Vec<Entity>),
    Batch(BatchReport),
    Found(Option<Entity>),
    Page(PaginatedResult),
}

impl EntityProvider {
    /// Dispatch `command` to the matching operation.
    ///
    /// # Errors
    /// Propagates the error of the dispatched operation.
    pub fn execute(&mut self, command: Command) -> Result<CommandResult> {
        log::debug!("execute {} on {}", command.op(), command.meta().name());
        Ok(match command {
            Command::Add { meta, entity } => CommandResult::Entity(self.add(&meta, entity)),
            Command::BulkAdd { meta, entities } => CommandResult::Entities(self.bulk_add(&meta, entities)),
            Command::Update { meta, entity } => CommandResult::Entity(self.update(&meta, entity)),
            Command::BulkUpdate { meta, entities } => {
                CommandResult::Entities(self.bulk_update(&meta, entities))
            }
            Command::BatchUpdate { meta, options, fields } => {
                CommandResult::Batch(self.batch_update(&meta, &options, &fields)?)
            }
            Command::Save { meta, entity } => CommandResult::Entity(self.save(&meta, entity)),
            Command::BulkSave { meta, entities } => {
                CommandResult::Entities(self.bulk_save(&meta, entities))
            }
            Command::Remove { meta, entity } => CommandResult::Entity(self.remove(&meta, entity)),
            Command::BulkRemove { meta, entities } => {
                CommandResult::Entities(self.bulk_remove(&meta, entities))
            }
            Command::BatchRemove { meta, options } => {
                CommandResult::Batch(self.batch_remove(&meta, &options)?)
            }
            Command::QueryOne { meta, key_values, options } => {
                CommandResult::Found(self.query_one(&meta, &key_values, &options)?)
            }
            Command::QueryMany { meta, options } => {
                CommandResult::Page(self.query_many(&meta, &options)?)
            }
        })
    }
}
