use crate::utils::error::{EnrichError, Result};
use crate::utils::validation::{validate_positive_number, validate_range, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_GITHUB_BASE: &str = "https://api.github.com";
pub const DEFAULT_PEOPLE_DATA_BASE: &str = "https://api.peopledatalabs.com/v5";
pub const DEFAULT_GENERATIVE_BASE: &str = "https://api.openai.com/v1";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichConfig {
    pub github: GithubSettings,
    pub people_data: PeopleDataSettings,
    pub generative: GenerativeSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub repo_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PeopleDataSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerativeSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub model: String,
    pub max_tokens: usize,
    pub temperature: f32,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GITHUB_BASE.to_string(),
            api_key: None,
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            repo_page_size: 100,
        }
    }
}

impl Default for PeopleDataSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_PEOPLE_DATA_BASE.to_string(),
            api_key: None,
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
        }
    }
}

impl Default for GenerativeSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GENERATIVE_BASE.to_string(),
            api_key: None,
            timeout_seconds: 30,
            connect_timeout_seconds: 5,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 500,
            temperature: 0.7,
        }
    }
}

/// Connection limits shared by every adapter's HTTP client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request: Duration,
    pub connect: Duration,
}

impl Timeouts {
    fn from_secs(request: u64, connect: u64) -> Self {
        Self {
            request: Duration::from_secs(request),
            connect: Duration::from_secs(connect),
        }
    }
}

impl GithubSettings {
    pub fn credential(&self) -> Option<String> {
        resolve_credential(self.api_key.as_deref())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts::from_secs(self.timeout_seconds, self.connect_timeout_seconds)
    }
}

impl PeopleDataSettings {
    pub fn credential(&self) -> Option<String> {
        resolve_credential(self.api_key.as_deref())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts::from_secs(self.timeout_seconds, self.connect_timeout_seconds)
    }
}

impl GenerativeSettings {
    pub fn credential(&self) -> Option<String> {
        resolve_credential(self.api_key.as_deref())
    }

    pub fn timeouts(&self) -> Timeouts {
        Timeouts::from_secs(self.timeout_seconds, self.connect_timeout_seconds)
    }
}

/// 空字串或未替換的 `${VAR}` 都視為沒有憑證
pub fn resolve_credential(raw: Option<&str>) -> Option<String> {
    let value = raw?.trim();
    if value.is_empty() || (value.starts_with("${") && value.ends_with('}')) {
        return None;
    }
    Some(value.to_string())
}

impl EnrichConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EnrichError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EnrichError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GITHUB_API_KEY})，找不到的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EnrichError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 載入配置：有檔案就讀檔，缺少的憑證再從環境變數補上
    pub fn load<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        match path {
            Some(path) => {
                let mut config = Self::from_file(path)?;
                config.fill_credentials_from_env();
                Ok(config)
            }
            None => Self::from_env(),
        }
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("github.base_url", &self.github.base_url)?;
        validate_url("people_data.base_url", &self.people_data.base_url)?;
        validate_url("generative.base_url", &self.generative.base_url)?;

        for (field, value) in [
            ("github.timeout_seconds", self.github.timeout_seconds),
            ("github.connect_timeout_seconds", self.github.connect_timeout_seconds),
            ("people_data.timeout_seconds", self.people_data.timeout_seconds),
            (
                "people_data.connect_timeout_seconds",
                self.people_data.connect_timeout_seconds,
            ),
            ("generative.timeout_seconds", self.generative.timeout_seconds),
            (
                "generative.connect_timeout_seconds",
                self.generative.connect_timeout_seconds,
            ),
        ] {
            validate_range(field, value, 1, 300)?;
        }

        validate_range("github.repo_page_size", self.github.repo_page_size, 1, 100)?;
        validate_positive_number("generative.max_tokens", self.generative.max_tokens, 1)?;
        validate_range("generative.temperature", self.generative.temperature, 0.0, 2.0)?;

        if self.generative.model.trim().is_empty() {
            return Err(EnrichError::MissingConfigError {
                field: "generative.model".to_string(),
            });
        }

        Ok(())
    }
}

impl Validate for EnrichConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
