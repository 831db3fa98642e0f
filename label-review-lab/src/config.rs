use anyhow::{Context, Result};
use config::{Config as ConfigLoader, Environment, File};
use label_review_core::{DEFAULT_DATASET_NAME, DEFAULT_USER, TAG_DELIMITER};
use label_review_metrics::AlertThresholds;
use label_review_storage::{TabularImporter, DEFAULT_BACKUP_DIR};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "LABEL_REVIEW";

const MAX_DATASET_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportSettings {
    pub delimiter: char,
    pub tag_delimiter: char,
}

impl Default for ImportSettings {
    fn default() -> Self {
        Self {
            delimiter: ',',
            tag_delimiter: TAG_DELIMITER,
        }
    }
}

impl ImportSettings {
    /// Build the importer; the field delimiter must be a single ASCII character.
    pub fn importer(&self) -> Result<TabularImporter> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("Import delimiter {:?} is not ASCII", self.delimiter))?;

        Ok(TabularImporter::new()
            .with_delimiter(delimiter)
            .with_tag_delimiter(self.tag_delimiter))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabConfig {
    pub dataset_name: String,
    pub user: String,
    pub backup_dir: PathBuf,
    pub log_level: String,
    pub log_format: LogFormat,
    pub import: ImportSettings,
    pub alerts: AlertThresholds,
}

impl LabConfig {
    /// Layered load: `config/default`, `config/local`, `LABEL_REVIEW__*`
    /// environment variables, then `explicit` when given.
    pub fn load_from(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(path) = explicit {
            builder = builder.add_source(File::from(path).required(true));
        }

        let config = builder
            .build()
            .context("Failed to load configuration")?;
        let config: Self = config
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would only fail later, such as a dataset name
    /// that exports fine but cannot be read back.
    pub fn validate(&self) -> Result<()> {
        let name_len = self.dataset_name.chars().count();
        anyhow::ensure!(
            (1..=MAX_DATASET_NAME_LEN).contains(&name_len),
            "Invalid configuration: dataset_name must be 1 to {} characters, got {}",
            MAX_DATASET_NAME_LEN,
            name_len
        );
        self.import.importer()?;
        Ok(())
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            dataset_name: DEFAULT_DATASET_NAME.to_string(),
            user: DEFAULT_USER.to_string(),
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            import: ImportSettings::default(),
            alerts: AlertThresholds::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = LabConfig::default();
        assert_eq!(config.backup_dir, PathBuf::from("backups/"));
        assert_eq!(config.alerts.imbalance_threshold, 0.3);
        assert_eq!(config.alerts.length_ratio_threshold, 2.0);
        assert_eq!(config.import.delimiter, ',');
    }

    #[test]
    fn test_explicit_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "user = \"bob\"\n[alerts]\nimbalance_threshold = 0.5\n[import]\ndelimiter = \";\""
        )
        .unwrap();

        let config = LabConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.user, "bob");
        assert_eq!(config.alerts.imbalance_threshold, 0.5);
        assert_eq!(config.alerts.length_ratio_threshold, 2.0);
        assert_eq!(config.import.importer().unwrap().delimiter(), b';');
    }

    #[test]
    fn test_explicit_file_with_empty_dataset_name_rejected() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "dataset_name = \"\"").unwrap();

        let err = LabConfig::load_from(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("dataset_name"), "{err:#}");
    }

    #[test]
    fn test_dataset_name_length_bounds() {
        let mut config = LabConfig::default();
        config.dataset_name = "é".repeat(255);
        assert!(config.validate().is_ok());

        config.dataset_name = "é".repeat(256);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_ascii_delimiter_rejected() {
        let settings = ImportSettings {
            delimiter: 'é',
            ..ImportSettings::default()
        };
        assert!(settings.importer().is_err());
    }
}
