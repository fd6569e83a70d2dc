//! Intake configuration: column schema, storage keys, and validation bounds.
//!
//! A configuration is loaded once per session and frozen behind an `Arc`; when
//! no configuration can be loaded the readiness gate installs the fallback.
/// Current schema version for `config.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// File name of the configuration inside an asset directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

mod fallback;
mod load;
mod types;

pub use fallback::fallback_config;
pub use load::load_config;
pub use types::*;
