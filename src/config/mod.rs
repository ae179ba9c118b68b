// Core configuration types
mod core;
mod loader;

pub use core::{CompdispConfig, OutputConfig};
pub use loader::{
    directory_ancestors, discover_config, load_config, load_config_from,
    parse_and_validate_config, ConfigSource, CONFIG_FILE_NAME,
};
