use crate::domain::model::ConversionOptions;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

/// Conversion settings file. Every section and key is optional.
///
/// ```toml
/// [conversion]
/// normalize_numbers = true
///
/// [filter]
/// column = "TGL_FILTER_CODE"
/// contains = "ACC"
///
/// [output]
/// path = "${OUTPUT_DIR}"
/// filename = "output.csv"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub conversion: Option<ConversionSection>,
    pub filter: Option<FilterSection>,
    pub output: Option<OutputSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionSection {
    pub normalize_numbers: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSection {
    pub column: Option<String>,
    pub contains: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub filename: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn conversion_options(&self) -> ConversionOptions {
        let mut options = ConversionOptions::default();

        if let Some(normalize) = self
            .conversion
            .as_ref()
            .and_then(|conversion| conversion.normalize_numbers)
        {
            options.normalize_numbers = normalize;
        }

        if let Some(filter) = &self.filter {
            if let Some(column) = &filter.column {
                options.filter_column = column.clone();
            }
            if let Some(token) = &filter.contains {
                options.filter_token = token.clone();
            }
        }

        options
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        self.conversion_options().validate()?;

        if let Some(output) = &self.output {
            if let Some(path) = &output.path {
                validate_path("output.path", path)?;
            }
            if let Some(filename) = &output.filename {
                validate_file_name("output.filename", filename)?;
                validate_file_extension("output.filename", filename, &["csv"])?;
            }
        }

        Ok(())
    }
}
