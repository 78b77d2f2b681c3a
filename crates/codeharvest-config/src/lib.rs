use codeharvest_engine::ParserOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid value for {field} in {config_path}: {reason}")]
    InvalidValue {
        config_path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

/// User settings, stored as TOML.
///
/// Every field is optional in the file; a missing `[parser]` table keeps the
/// engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Where `--export` writes projects when no directory is given.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
    #[serde(default)]
    pub parser: ParserOptions,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        config.validate(config_path)?;

        // Expand shell variables and tilde in the output directory
        config.output_dir = config
            .output_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/codeharvest");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }

    fn validate(&self, config_path: &Path) -> Result<(), ConfigError> {
        let invalid = |field, reason: &str| ConfigError::InvalidValue {
            config_path: config_path.to_path_buf(),
            field,
            reason: reason.to_string(),
        };
        let parser = &self.parser;

        if !(0.0..=1.0).contains(&parser.prose_long_token_ratio) {
            return Err(invalid(
                "parser.prose_long_token_ratio",
                "must be between 0 and 1",
            ));
        }
        if parser.min_block_chars == 0 {
            return Err(invalid("parser.min_block_chars", "must be positive"));
        }
        if parser.dedup_prefix_chars == 0 {
            return Err(invalid("parser.dedup_prefix_chars", "must be positive"));
        }
        if parser.max_filename_chars == 0 {
            return Err(invalid("parser.max_filename_chars", "must be positive"));
        }
        if parser.default_project_name.trim().is_empty() {
            return Err(invalid("parser.default_project_name", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, content).unwrap();
        (temp_dir, config_file)
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/codeharvest/config.toml"));
    }

    #[test]
    fn test_empty_file_gives_defaults() {
        let (_dir, config_file) = write_config("");

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.parser.max_filename_chars, 100);
    }

    #[test]
    fn test_partial_parser_table() {
        let (_dir, config_file) = write_config(
            r#"
[parser]
min_block_chars = 12
default_project_name = "scratch"
"#,
        );

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.parser.min_block_chars, 12);
        assert_eq!(config.parser.default_project_name, "scratch");
        assert_eq!(config.parser.dedup_prefix_chars, 50);
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let expanded = Config::expand_path(Path::new("~/test/path")).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("test/path"));
    }

    #[test]
    fn test_expand_path_leaves_plain_paths() {
        assert_eq!(
            Config::expand_path(Path::new("/absolute/path")).unwrap(),
            PathBuf::from("/absolute/path")
        );
        assert_eq!(
            Config::expand_path(Path::new("relative/path")).unwrap(),
            PathBuf::from("relative/path")
        );
    }

    #[test]
    fn test_output_dir_env_var_is_expanded() {
        unsafe {
            env::set_var("CODEHARVEST_TEST_OUT", "/custom/out");
        }

        let (_dir, config_file) = write_config(r#"output_dir = "$CODEHARVEST_TEST_OUT/projects""#);
        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("/custom/out/projects")));

        unsafe {
            env::remove_var("CODEHARVEST_TEST_OUT");
        }
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_file_is_a_parse_error() {
        let (_dir, config_file) = write_config("[parser\nmin_block_chars = ");

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_out_of_range_ratio_is_rejected() {
        let (_dir, config_file) = write_config("[parser]\nprose_long_token_ratio = 1.5\n");

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(err.to_string().contains("prose_long_token_ratio"));
    }

    #[test]
    fn test_zero_counts_are_rejected() {
        for field in ["min_block_chars", "dedup_prefix_chars", "max_filename_chars"] {
            let (_dir, config_file) = write_config(&format!("[parser]\n{field} = 0\n"));

            let err = Config::load_from_path(&config_file).unwrap_err();

            assert!(
                matches!(&err, ConfigError::InvalidValue { field: f, .. } if f.ends_with(field)),
                "{field} = 0 was accepted"
            );
            assert!(err.to_string().contains("must be positive"));
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested").join("config.toml");
        let mut test_config = Config {
            output_dir: Some(PathBuf::from("/tmp/projects")),
            ..Config::default()
        };
        test_config.parser.prose_min_tokens = 8;

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }
}
