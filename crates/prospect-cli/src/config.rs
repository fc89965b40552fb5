use crate::cli::Cli;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Runtime configuration: TOML file values overridden by CLI flags and
/// environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory the producer writes CSV exports into.
    pub exports_dir: PathBuf,
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Quiet period before a written file is considered stable.
    pub debounce_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            exports_dir: PathBuf::from("exports"),
            host: "127.0.0.1".to_string(),
            port: 5000,
            debounce_ms: 500,
        }
    }
}

impl AppConfig {
    /// Load the config file if given, then apply CLI overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(dir) = &cli.exports_dir {
            config.exports_dir = dir.clone();
        }
        if let Some(host) = &cli.host {
            config.host = host.clone();
        }
        if let Some(port) = cli.port {
            config.port = port;
        }
        if let Some(debounce_ms) = cli.debounce_ms {
            config.debounce_ms = debounce_ms;
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("prospect").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults_without_config_file() {
        let config = AppConfig::load(&cli(&[])).unwrap();
        assert_eq!(config.exports_dir, PathBuf::from("exports"));
        assert_eq!(config.port, 5000);
        assert_eq!(config.debounce_ms, 500);
    }

    #[test]
    fn test_cli_flags_override_file_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 8080\nexports_dir = \"/data/exports\"").unwrap();

        let config_path = file.path().to_str().unwrap().to_string();
        let config = AppConfig::load(&cli(&["--config", &config_path, "--port", "9090"])).unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.exports_dir, PathBuf::from("/data/exports"));
        // Untouched values keep their defaults.
        assert_eq!(config.host, "127.0.0.1");
    }

    #[test]
    fn test_unknown_config_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "prot = 8080").unwrap();

        let config_path = file.path().to_str().unwrap().to_string();
        assert!(AppConfig::load(&cli(&["--config", &config_path])).is_err());
    }
}
