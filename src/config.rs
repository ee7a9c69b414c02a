use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::debug;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MAX_RESULTS: u32 = 20;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub model: Option<String>,
    pub max_results: Option<u32>,
}

impl Config {
    /// Read the TOML config file; a missing file yields the defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("ytseo config {} absent, using defaults", path.display());
                return Ok(Config::default());
            }
            Err(e) => return Err(e).wrap_err_with(|| format!("reading {}", path.display())),
        };
        let config: Config = toml::from_str(&content).wrap_err_with(|| format!("parsing {}", path.display()))?;
        debug!("ytseo config {} loaded: {config:?}", path.display());
        Ok(config)
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or("0.0.0.0")
    }

    /// PORT from the environment wins over the config file
    pub fn port(&self) -> u16 {
        port_from(std::env::var("PORT").ok().as_deref()).unwrap_or(self.port.unwrap_or(DEFAULT_PORT))
    }

    pub fn max_results(&self) -> u32 {
        self.max_results.unwrap_or(DEFAULT_MAX_RESULTS)
    }
}

fn port_from(value: Option<&str>) -> Option<u16> {
    value.and_then(|v| v.trim().parse().ok())
}

pub fn config_path() -> PathBuf {
    let dir = dirs::config_dir().map_or_else(|| PathBuf::from(".ytseo"), |d| d.join("ytseo"));
    dir.join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
host = "127.0.0.1"
port = 3000
model = "gpt-4o-mini"
max_results = 10
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.host(), "127.0.0.1");
        assert_eq!(config.port, Some(3000));
        assert_eq!(config.model.as_deref(), Some("gpt-4o-mini"));
        assert_eq!(config.max_results(), 10);
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.host(), "0.0.0.0");
        assert!(config.model.is_none());
        assert_eq!(config.max_results(), DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: Config = toml::from_str("port = 9000").unwrap();
        assert_eq!(config.port, Some(9000));
        assert!(config.host.is_none());
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("ytseo-no-such-dir").join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert!(config.port.is_none());
        assert_eq!(config.max_results(), DEFAULT_MAX_RESULTS);
    }

    #[test]
    fn test_load_from_invalid_file() {
        let path = std::env::temp_dir().join(format!("ytseo-bad-config-{}.toml", std::process::id()));
        std::fs::write(&path, "port = \"ocho mil\"").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(err.to_string().starts_with("parsing "));
    }

    #[test]
    fn test_port_from_env_value() {
        assert_eq!(port_from(Some("5000")), Some(5000));
        assert_eq!(port_from(Some(" 5001 ")), Some(5001));
        assert_eq!(port_from(Some("not-a-port")), None);
        assert_eq!(port_from(None), None);
    }
}
