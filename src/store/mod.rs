//! Record store: one ordered, identity-addressed collection per entity type.
mod collection;
mod registry;

pub use collection::EntityCollection;
pub use registry::RecordStore;
