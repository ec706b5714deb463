//! Configuration system for AppLens.
//!
//! Provides TOML-based configuration with:
//! - `[llm]` model selection, `[search]` result cap, `[chat]` context budget
//! - Config file layering (user config dir + project-local override)
//! - Range validation of the merged result

pub mod discovery;
pub mod error;
pub mod types;

pub use discovery::{
    ConfigSource, LoadedConfig, load_config, load_config_file, load_config_with_options,
    save_config, user_config_dir, user_config_path,
};
pub use error::{ConfigError, Result};
pub use types::*;
