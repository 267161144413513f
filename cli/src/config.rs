use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

/// Overrides the directory holding `config.toml`.
pub const HOME_ENV_VAR: &str = "JOBTRACK_HOME";

/// Settings read from `config.toml`. Every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Table location. Relative paths are resolved against the config
    /// file's directory.
    pub file: Option<PathBuf>,
    /// Default tracing filter, e.g. `info` or `jobtrack_store=debug`.
    pub log_level: Option<String>,
}

impl Config {
    /// Load `explicit` if given (it must exist), otherwise the default
    /// location if present.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let (path, required) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => match default_config_path() {
                Some(path) => (path, false),
                None => return Ok(Self::default()),
            },
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read config {}", path.display()));
            }
        };
        Self::parse(&text, &path)
    }

    fn parse(text: &str, path: &Path) -> anyhow::Result<Self> {
        let mut config: Config = toml::from_str(text)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        if let Some(file) = &config.file
            && file.is_relative()
            && let Some(dir) = path.parent()
        {
            config.file = Some(dir.join(file));
        }
        Ok(config)
    }
}

/// `$JOBTRACK_HOME/config.toml`, else `~/.jobtrack/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    if let Some(home) = std::env::var_os(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(home).join("config.toml"));
    }
    dirs::home_dir().map(|home| home.join(".jobtrack").join("config.toml"))
}
