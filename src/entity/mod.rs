//! Entities, their identities and the type metadata the provider keys collections by.
pub mod core;
pub mod property;
pub mod types;

pub use self::core::Entity;
pub use property::PropertyRef;
pub use types::{PropertyMetadata, TypeMetadata};
