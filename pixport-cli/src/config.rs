use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cli::Cli;

/// Resolved run configuration: defaults, then config file, then CLI flags.
#[derive(Debug, Clone)]
pub struct Config {
    pub input_root: PathBuf,
    pub output_root: PathBuf,
}

impl Config {
    pub fn load(provided: Option<&Path>) -> Result<Self> {
        let loaded = if let Some(explicit) = provided {
            if !explicit.exists() {
                anyhow::bail!("config file {} does not exist", explicit.display());
            }
            Some(load_raw_config(explicit)?)
        } else {
            default_config_path()
                .filter(|path| path.exists())
                .map(|path| load_raw_config(&path))
                .transpose()?
        };

        let raw = loaded.unwrap_or_default();
        Ok(Self {
            input_root: raw
                .paths
                .input_root
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("pixnet")),
            output_root: raw
                .paths
                .output_root
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("out")),
        })
    }

    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(input) = &cli.input {
            self.input_root = input.clone();
        }
        if let Some(output) = &cli.output {
            self.output_root = output.clone();
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    paths: RawPaths,
}

#[derive(Debug, Deserialize, Default)]
struct RawPaths {
    #[serde(default)]
    input_root: Option<String>,
    #[serde(default)]
    output_root: Option<String>,
}

fn load_raw_config(path: &Path) -> Result<RawConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    toml::from_str(&data).with_context(|| format!("failed to parse config file {}", path.display()))
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".pixport").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn defaults_without_config_file() {
        // A developer machine may carry a real ~/.pixport/config.toml.
        if default_config_path().map(|path| path.exists()).unwrap_or(false) {
            return;
        }
        let config = Config::load(None).unwrap();
        assert_eq!(config.input_root, PathBuf::from("pixnet"));
        assert_eq!(config.output_root, PathBuf::from("out"));
    }

    #[test]
    fn config_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[paths]\ninput_root = \"exports\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.input_root, PathBuf::from("exports"));
        assert_eq!(config.output_root, PathBuf::from("out"));
    }

    #[test]
    fn cli_flags_override_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[paths]\noutput_root = \"from-config\"\n").unwrap();

        let cli = Cli::parse_from(["pixport", "--output", "from-cli"]);
        let mut config = Config::load(Some(&path)).unwrap();
        config.apply_cli(&cli);
        assert_eq!(config.output_root, PathBuf::from("from-cli"));
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        assert!(Config::load(Some(Path::new("/nonexistent/config.toml"))).is_err());
    }
}
