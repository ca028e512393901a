#[cfg(feature = "cli")]
pub mod cli;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod toml_config;

use crate::domain::model::ConversionOptions;
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};

#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::domain::model::DEFAULT_OUTPUT_FILENAME;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
pub const DEFAULT_OUTPUT_DIR: &str = "./output";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "size-grid-etl")]
#[command(about = "Converts vendor size-grid CSV exports into the flat catalog schema")]
pub struct CliConfig {
    #[arg(short, long, help = "Size-grid CSV export to convert")]
    pub input: String,

    // 未指定時依序採用 TOML、預設值
    #[arg(long, help = "Output directory [default: ./output]")]
    pub output_path: Option<String>,

    #[arg(long, help = "Output file name [default: output.csv]")]
    pub output_file: Option<String>,

    #[arg(short, long, help = "Optional TOML file with conversion settings")]
    pub config: Option<String>,

    #[arg(long, help = "Keep measurement values as written instead of normalizing numbers")]
    pub raw_numbers: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(skip)]
    pub options: ConversionOptions,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the TOML settings under the command line flags, then fills in
    /// the defaults for anything still unset.
    pub fn resolve(mut self) -> Result<Self> {
        if let Some(path) = &self.config {
            let file = toml_config::TomlConfig::from_file(path)?;
            self.options = file.conversion_options();
            if let Some(output) = file.output {
                if self.output_path.is_none() {
                    self.output_path = output.path;
                }
                if self.output_file.is_none() {
                    self.output_file = output.filename;
                }
            }
        }

        self.output_path
            .get_or_insert_with(|| DEFAULT_OUTPUT_DIR.to_string());
        self.output_file
            .get_or_insert_with(|| DEFAULT_OUTPUT_FILENAME.to_string());

        if self.raw_numbers {
            self.options.normalize_numbers = false;
        }

        Ok(self)
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_DIR)
    }

    fn output_filename(&self) -> &str {
        self.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILENAME)
    }

    fn conversion_options(&self) -> &ConversionOptions {
        &self.options
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_path("input", &self.input)?;
        validate_file_extension("input", &self.input, &["csv", "txt"])?;
        validate_path("output_path", self.output_path())?;
        validate_file_name("output_file", self.output_filename())?;
        self.options.validate()?;

        tracing::debug!("✅ CLI configuration validation passed");
        Ok(())
    }
}

impl Validate for ConversionOptions {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("filter.column", &self.filter_column)?;
        // 空字串會排除所有資料列
        validate_non_empty_string("filter.contains", &self.filter_token)?;
        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn settings_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_cli_defaults() {
        let config = CliConfig::parse_from(["size-grid-etl", "--input", "grid.csv"])
            .resolve()
            .unwrap();
        assert_eq!(config.output_path(), "./output");
        assert_eq!(config.output_filename(), "output.csv");
        assert!(config.options.normalize_numbers);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cli_flags_override_toml_output() {
        let settings = settings_file(
            r#"
[output]
path = "from_toml"
filename = "toml.csv"
"#,
        );
        let config_path = settings.path().to_string_lossy().to_string();

        let config = CliConfig::parse_from([
            "size-grid-etl",
            "-i",
            "grid.csv",
            "--output-path",
            "from_cli",
            "--output-file",
            "cli.csv",
            "--config",
            config_path.as_str(),
        ])
        .resolve()
        .unwrap();

        assert_eq!(config.output_path(), "from_cli");
        assert_eq!(config.output_filename(), "cli.csv");
    }

    #[test]
    fn test_toml_output_applies_without_flags() {
        let settings = settings_file(
            r#"
[output]
path = "from_toml"
"#,
        );
        let config_path = settings.path().to_string_lossy().to_string();

        let config =
            CliConfig::parse_from(["size-grid-etl", "-i", "grid.csv", "-c", config_path.as_str()])
                .resolve()
                .unwrap();

        assert_eq!(config.output_path(), "from_toml");
        assert_eq!(config.output_filename(), "output.csv");
    }

    #[test]
    fn test_raw_numbers_override() {
        let config = CliConfig::parse_from(["size-grid-etl", "-i", "grid.csv", "--raw-numbers"])
            .resolve()
            .unwrap();
        assert!(!config.conversion_options().normalize_numbers);
    }

    #[test]
    fn test_validation_rejects_non_csv_input() {
        let config = CliConfig::parse_from(["size-grid-etl", "--input", "grid.xlsx"]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_filter_token_is_invalid() {
        let options = ConversionOptions {
            filter_token: String::new(),
            ..ConversionOptions::default()
        };
        assert!(options.validate().is_err());
    }
}
