use crate::core::presets::TierPresetCatalog;
use crate::domain::model::{RateConfiguration, DEFAULT_TOLERANCE};
use crate::utils::error::{CommissionError, Result};
use crate::utils::validation::{validate_one_of, validate_path, validate_range, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SUPPORTED_OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub commission: CommissionSection,
    pub store: StoreSection,
    pub settlement: SettlementSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommissionSection {
    pub tolerance: f64,
    /// 沒有儲存設定時使用的方案
    pub default_tier: String,
}

impl Default for CommissionSection {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            default_tier: "basic".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreSection {
    pub path: String,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            path: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettlementSection {
    pub output_path: String,
    pub output_formats: Vec<String>,
    pub skip_invalid_rows: bool,
}

impl Default for SettlementSection {
    fn default() -> Self {
        Self {
            output_path: "./output".to_string(),
            output_formats: SUPPORTED_OUTPUT_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            skip_invalid_rows: false,
        }
    }
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CommissionError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 檔案不存在時回傳預設配置
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            tracing::debug!(
                "Config file {} not found, using defaults",
                path.as_ref().display()
            );
            Ok(Self::default())
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CommissionError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${STORE_PATH})，未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            CommissionError::ConfigValidationError {
                field: "env_substitution".to_string(),
                message: e.to_string(),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if !(self.commission.tolerance > 0.0) {
            return Err(CommissionError::InvalidConfigValueError {
                field: "commission.tolerance".to_string(),
                value: self.commission.tolerance.to_string(),
                reason: "must be greater than 0 and at most 0.01".to_string(),
            });
        }
        validate_range("commission.tolerance", self.commission.tolerance, 0.0, 0.01)?;
        TierPresetCatalog::apply_preset(&self.commission.default_tier)?;

        validate_path("store.path", &self.store.path)?;
        validate_path("settlement.output_path", &self.settlement.output_path)?;

        if self.settlement.output_formats.is_empty() {
            return Err(CommissionError::MissingConfigError {
                field: "settlement.output_formats".to_string(),
            });
        }
        validate_one_of(
            "settlement.output_formats",
            &self.settlement.output_formats,
            &SUPPORTED_OUTPUT_FORMATS,
        )?;

        Ok(())
    }

    /// 取得預設方案的費率
    pub fn default_rates(&self) -> Result<RateConfiguration> {
        TierPresetCatalog::apply_preset(&self.commission.default_tier)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
