use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pick the telemetry source for this invocation, in priority order:
///
/// 1. the `--source` flag
/// 2. the config file's `source` entry
/// 3. the `TESTMETRY_PATH` environment variable
/// 4. `telemetry.db` under the data directory
pub fn resolve_source(flag: Option<&str>) -> Result<String> {
    if let Some(source) = flag {
        return Ok(expand_tilde(source));
    }

    let config = Config::load_from(&Config::default_path()?)?;
    if let Some(source) = config.source {
        return Ok(expand_tilde(&source));
    }

    if let Ok(source) = std::env::var("TESTMETRY_PATH") {
        return Ok(expand_tilde(&source));
    }

    Ok(data_dir()?.join("telemetry.db").display().to_string())
}

/// The per-user directory holding the config file and the default store.
///
/// `TESTMETRY_HOME` overrides it outright; otherwise the platform data
/// directory is used, with `~/.testmetry` as a last resort.
pub fn data_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TESTMETRY_HOME") {
        return Ok(PathBuf::from(dir));
    }

    if let Some(dir) = dirs::data_dir() {
        return Ok(dir.join("testmetry"));
    }

    if let Some(home) = std::env::var_os("HOME") {
        return Ok(PathBuf::from(home).join(".testmetry"));
    }

    bail!("could not determine a data directory: neither a platform data dir nor HOME is set")
}

/// Expand a leading tilde to the user's home directory. Server URLs and
/// plain paths pass through untouched.
fn expand_tilde(source: &str) -> String {
    if let Some(stripped) = source.strip_prefix("~/")
        && let Some(home) = std::env::var_os("HOME")
    {
        return Path::new(&home).join(stripped).display().to_string();
    }
    source.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Telemetry source queried when `--source` is not given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Config {
    /// Read the config at `path`. A missing file is an empty config, a
    /// malformed one is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_file_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config.source, None);
    }

    #[test]
    fn config_survives_a_save_and_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested/config.toml");

        let config = Config {
            source: Some("https://metrics.example.org".to_string()),
        };
        config.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.source.as_deref(), Some("https://metrics.example.org"));
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "source = [not toml").expect("write");

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn tilde_expansion_leaves_urls_and_plain_paths_alone() {
        assert_eq!(expand_tilde("http://host:8080"), "http://host:8080");
        assert_eq!(expand_tilde("/var/lib/telemetry.db"), "/var/lib/telemetry.db");
        assert_eq!(expand_tilde("relative/telemetry.db"), "relative/telemetry.db");
    }

    #[test]
    fn tilde_expansion_resolves_against_home() {
        if std::env::var_os("HOME").is_none() {
            return;
        }
        let expanded = expand_tilde("~/ci/telemetry.db");
        assert!(!expanded.starts_with('~'));
        assert!(expanded.ends_with("ci/telemetry.db"));
    }
}
