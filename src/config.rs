use crate::error::InvoiceError;
use config::{Config, ConfigError, Environment, File, FileFormat, FileSourceFile};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub rates: RatesConfig,
    pub output: OutputConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesConfig {
    /// CSV file with the state tax rates
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Invoices land in `<dir>/<id>/<id>.pdf`
    pub dir: PathBuf,
    pub invoice_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    pub dir: PathBuf,
    pub file_name: String,
    pub level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rates: RatesConfig {
                path: PathBuf::from("data/tax_rates.csv"),
            },
            output: OutputConfig {
                dir: PathBuf::from("invoices"),
                invoice_prefix: "GS".to_string(),
            },
            log: LogConfig {
                dir: PathBuf::from("logs"),
                file_name: "invoice_generator.log".to_string(),
                level: "info".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Defaults, then `invoice.{toml,yaml,json,...}` if present, then `INVOICE_*` env vars
    pub fn load() -> Result<Self, InvoiceError> {
        Ok(Self::build(File::with_name("invoice").required(false))?)
    }

    /// Same layering with an explicit settings file
    pub fn load_from(path: &Path) -> Result<Self, InvoiceError> {
        Ok(Self::build(File::from(path).required(false))?)
    }

    fn build(file: File<FileSourceFile, FileFormat>) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(Config::try_from(&AppConfig::default())?)
            .add_source(file)
            .add_source(
                Environment::with_prefix("INVOICE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Full path of the append-only log file
    pub fn log_path(&self) -> PathBuf {
        self.log.dir.join(&self.log.file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_layout() {
        let config = AppConfig::default();
        assert_eq!(config.rates.path, PathBuf::from("data/tax_rates.csv"));
        assert_eq!(config.output.dir, PathBuf::from("invoices"));
        assert_eq!(config.output.invoice_prefix, "GS");
        assert_eq!(config.log_path(), PathBuf::from("logs/invoice_generator.log"));
    }

    #[test]
    fn settings_file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "[output]\ndir = \"out\"\ninvoice_prefix = \"INV\"").expect("write");
        file.flush().expect("flush");

        let config = AppConfig::load_from(file.path()).expect("load");
        assert_eq!(config.output.dir, PathBuf::from("out"));
        assert_eq!(config.output.invoice_prefix, "INV");
        assert_eq!(config.rates, AppConfig::default().rates);
    }

    #[test]
    fn malformed_settings_file_is_a_config_error() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("tempfile");
        writeln!(file, "[output\ndir = ").expect("write");
        file.flush().expect("flush");

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, InvoiceError::Config(_)));
    }

    #[test]
    fn missing_settings_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = AppConfig::load_from(&dir.path().join("absent.toml")).expect("load");
        assert_eq!(config.output, AppConfig::default().output);
    }
}
