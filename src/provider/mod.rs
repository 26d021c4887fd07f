//! Mutation executor: CRUD and browse orchestration over a [`RecordStore`].
//!
//! Entities are matched by identity ([`crate::types::EntityId`]), never by
//! value. Mutations that find nothing to act on are silent no-ops; the only
//! failures are unsupported pagination and, when enabled, key arity mismatches.

mod command;
mod exec;

pub use command::{Command, CommandResult};

use crate::config::ProviderConfig;
use crate::query::{FilterEvaluator, PaginateEvaluator, SortEvaluator};
use crate::store::RecordStore;

#[derive(Debug)]
pub struct EntityProvider {
    store: RecordStore,
    filter: FilterEvaluator,
    sort: SortEvaluator,
    paginate: PaginateEvaluator,
    config: ProviderConfig,
}

impl Default for EntityProvider {
    fn default() -> Self {
        Self::with_config(ProviderConfig::default())
    }
}

impl EntityProvider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: ProviderConfig) -> Self {
        Self {
            store: RecordStore::new(),
            filter: FilterEvaluator::new(),
            sort: SortEvaluator::new(),
            paginate: PaginateEvaluator::with_default_page_size(config.default_page_size),
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Read-only view of the underlying store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Number of resident entities of `type_name`; zero for an unseen type.
    #[must_use]
    pub fn collection_len(&self, type_name: &str) -> usize {
        self.store.collection(type_name).map_or(0, crate::store::EntityCollection::len)
    }
}
