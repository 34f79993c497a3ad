//! Configuration system for the `CryptoLab` CLI.
//!
//! Supports layered configuration with the following priority (highest
//! first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attribute)
//! 3. TOML config file (`~/.config/cryptolab/config.toml`)
//! 4. Compiled defaults

use std::path::PathBuf;

use cryptolab_core::analysis::brute_force::DEFAULT_TOP_K;

/// Errors that can occur when loading CLI configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse the TOML configuration.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

// ---------------------------------------------------------------------------
// TOML file structs (all fields Option for partial overrides)
// ---------------------------------------------------------------------------

/// Top-level TOML config file structure.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct LabConfigFile {
    output: OutputFileConfig,
}

/// `[output]` section of the config file.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct OutputFileConfig {
    show_steps: Option<bool>,
    top_k: Option<usize>,
}

// ---------------------------------------------------------------------------
// Resolved configuration
// ---------------------------------------------------------------------------

/// Fully resolved CLI configuration.
#[derive(Debug, Clone)]
pub struct LabConfig {
    /// Whether to print step traces for cipher operations.
    pub show_steps: bool,
    /// How many brute-force candidates / most-common letters to display.
    pub top_k: usize,
    /// Log level filter string.
    pub log_level: String,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            show_steps: false,
            top_k: DEFAULT_TOP_K,
            log_level: "warn".to_string(),
        }
    }
}

/// The subset of CLI arguments the config layer consumes.
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    /// Explicit config file path (`--config`).
    pub config: Option<PathBuf>,
    /// `--steps` flag.
    pub show_steps: bool,
    /// `--top` override.
    pub top_k: Option<usize>,
    /// `--log-level` / `CRYPTOLAB_LOG`.
    pub log_level: String,
}

impl LabConfig {
    /// Load configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// If `--config` is given and the file does not exist, returns an
    /// error. If no `--config` is given, the default path is tried and a
    /// missing file is treated as empty config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the explicit config file cannot be read
    /// or parsed.
    pub fn load(cli: &ConfigOverrides) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve a `LabConfig` from CLI args and a parsed config file.
    ///
    /// Priority: CLI > file > default.
    #[must_use]
    fn resolve(cli: &ConfigOverrides, file: &LabConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            // --steps is a flag: absent means "fall through to the file".
            show_steps: cli.show_steps
                || file.output.show_steps.unwrap_or(defaults.show_steps),
            top_k: cli
                .top_k
                .or(file.output.top_k)
                .unwrap_or(defaults.top_k),
            log_level: cli.log_level.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

/// Load and parse the TOML config file.
fn load_config_file(
    explicit_path: Option<&std::path::Path>,
) -> Result<LabConfigFile, ConfigError> {
    let path = if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    } else {
        let Some(config_dir) = dirs::config_dir() else {
            return Ok(LabConfigFile::default());
        };
        config_dir.join("cryptolab").join("config.toml")
    };

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(LabConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_quiet_and_top_10() {
        let config = LabConfig::default();
        assert!(!config.show_steps);
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn toml_parsing_full() {
        let toml_str = r#"
[output]
show_steps = true
top_k = 5
"#;
        let file: LabConfigFile = toml::from_str(toml_str).unwrap();
        let cli = ConfigOverrides::default();
        let config = LabConfig::resolve(&cli, &file);

        assert!(config.show_steps);
        assert_eq!(config.top_k, 5);
    }

    #[test]
    fn toml_parsing_partial() {
        let toml_str = r#"
[output]
top_k = 3
"#;
        let file: LabConfigFile = toml::from_str(toml_str).unwrap();
        let cli = ConfigOverrides::default();
        let config = LabConfig::resolve(&cli, &file);

        assert!(!config.show_steps); // default
        assert_eq!(config.top_k, 3); // from file
    }

    #[test]
    fn cli_overrides_file() {
        let toml_str = r#"
[output]
show_steps = false
top_k = 5
"#;
        let file: LabConfigFile = toml::from_str(toml_str).unwrap();
        let cli = ConfigOverrides {
            show_steps: true,
            top_k: Some(26),
            ..Default::default()
        };
        let config = LabConfig::resolve(&cli, &file);

        assert!(config.show_steps); // from CLI
        assert_eq!(config.top_k, 26); // from CLI
    }

    #[test]
    fn missing_default_config_file_is_fine() {
        assert!(load_config_file(None).is_ok());
    }

    #[test]
    fn explicit_missing_config_file_is_an_error() {
        let result = load_config_file(Some(std::path::Path::new("/nonexistent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
