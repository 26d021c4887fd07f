//! In-memory entity provider.
//!
//! Entities of each logical type live in an ordered, identity-addressed
//! collection inside a [`store::RecordStore`]. The [`provider::EntityProvider`]
//! applies add/update/save/remove (single, bulk and predicate-scoped batch) and
//! browses collections through compiled filter, sort and paginate expressions.
//!
//! ```
//! use bson::doc;
//! use entity_memstore::{BrowseOptions, Entity, EntityProvider, FilterExpression, TypeMetadata};
//!
//! let users = TypeMetadata::new("users").with_key("name");
//! let mut provider = EntityProvider::new();
//! provider.add(&users, Entity::new(doc! {"name": "a"}));
//! provider.add(&users, Entity::new(doc! {"name": "b"}));
//! let page = provider
//!     .query_many(&users, &BrowseOptions::new().filter(FilterExpression::eq("name", "b")))
//!     .unwrap();
//! assert_eq!(page.len(), 1);
//! ```

pub mod config;
pub mod entity;
pub mod errors;
pub mod provider;
pub mod query;
pub mod store;
pub mod telemetry;
pub mod types;
pub mod utils;

pub use config::{LogConfig, ProviderConfig};
pub use entity::{Entity, PropertyMetadata, PropertyRef, TypeMetadata};
pub use errors::{Result, StoreError};
pub use provider::{Command, CommandResult, EntityProvider};
pub use query::{
    BatchReport, BrowseOptions, FilterExpression, PaginateExpression, PaginatedResult, SortExpression,
};
pub use types::{EntityId, TypeName};

/// Install logging from `MEMSTORE_LOG_*` environment variables.
///
/// # Errors
/// Returns an error if the log directory or files cannot be created.
pub fn init() -> Result<()> {
    utils::logger::configure_from_env()
}

/// Load configuration (see [`ProviderConfig::load`]), install logging from its
/// `log` section, and build a provider.
///
/// # Errors
/// Returns configuration and logging setup errors.
pub fn open(config_path: Option<&std::path::Path>) -> Result<EntityProvider> {
    let cfg = ProviderConfig::load(config_path)?;
    utils::logger::configure_from(&cfg.log)?;
    log::info!("entity provider ready (default_page_size={})", cfg.default_page_size);
    Ok(EntityProvider::with_config(cfg))
}
