use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::core::CompdispConfig;
use crate::core::errors::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".compdisp.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Where the active configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Defaults,
    File(PathBuf),
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Defaults => write!(f, "built-in defaults"),
            ConfigSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

pub(crate) fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse a TOML document and check every scorer parameter.
pub fn parse_and_validate_config(contents: &str) -> Result<CompdispConfig> {
    let config = toml::from_str::<CompdispConfig>(contents)?;
    config.validate()?;
    Ok(config)
}

/// Load an explicitly requested file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<CompdispConfig> {
    let contents = read_config_file(path)
        .map_err(|e| Error::file_system("Failed to read config file", path, e))?;
    parse_and_validate_config(&contents).map_err(|e| {
        Error::Configuration(format!("{}: {}", path.display(), e))
    })
}

/// Try one candidate during discovery; problems are logged, not raised.
pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<CompdispConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!(
                "Ignoring invalid config {}: {}. Using defaults.",
                config_path.display(),
                e
            );
            None
        }
    }
}

pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.compdisp.toml`.
pub fn discover_config(start: PathBuf) -> (CompdispConfig, ConfigSource) {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path).map(|config| (config, path)))
        .map(|(config, path)| (config, ConfigSource::File(path)))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            (CompdispConfig::default(), ConfigSource::Defaults)
        })
}

/// Explicit path if given, otherwise discovery from the working directory.
pub fn load_config(explicit: Option<&Path>) -> Result<(CompdispConfig, ConfigSource)> {
    if let Some(path) = explicit {
        let config = load_config_from(path)?;
        return Ok((config, ConfigSource::File(path.to_path_buf())));
    }

    match std::env::current_dir() {
        Ok(dir) => Ok(discover_config(dir)),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            Ok((CompdispConfig::default(), ConfigSource::Defaults))
        }
    }
}
