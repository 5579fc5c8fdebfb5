//! TOML configuration for dialects and the owner cache.

pub mod loader;
pub mod schema;

pub use loader::{discover, load_from_path, load_from_str, ConfigError, CONFIG_FILE_NAME};
pub use schema::{
    CacheSettings, DialectSettings, LookupConfig, ValidationError, ValidationIssue,
};
