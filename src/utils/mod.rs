//! Utility modules: developer log sink and logger configuration.
pub mod devlog;
pub mod logger;
