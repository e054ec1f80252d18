use crate::config::toml_config::EnrichConfig;
use crate::utils::error::Result;
use std::env;

pub const GITHUB_API_KEY: &str = "GITHUB_API_KEY";
pub const PDL_API_KEY: &str = "PDL_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

const GITHUB_API_BASE: &str = "GITHUB_API_BASE";
const PDL_API_BASE: &str = "PDL_API_BASE";
const OPENAI_API_BASE: &str = "OPENAI_API_BASE";
const OPENAI_MODEL: &str = "OPENAI_MODEL";

impl EnrichConfig {
    /// 只用環境變數建立配置，其餘使用預設值
    pub fn from_env() -> Result<Self> {
        Ok(Self::from_lookup(|key| env::var(key).ok()))
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = EnrichConfig::default();

        if let Some(base) = lookup(GITHUB_API_BASE) {
            config.github.base_url = base;
        }
        if let Some(base) = lookup(PDL_API_BASE) {
            config.people_data.base_url = base;
        }
        if let Some(base) = lookup(OPENAI_API_BASE) {
            config.generative.base_url = base;
        }
        if let Some(model) = lookup(OPENAI_MODEL) {
            config.generative.model = model;
        }

        config.fill_credentials_with(&lookup);
        config
    }

    /// Fills credentials that are absent (or unresolved placeholders) from the
    /// process environment.
    pub fn fill_credentials_from_env(&mut self) {
        self.fill_credentials_with(&|key: &str| env::var(key).ok());
    }

    fn fill_credentials_with<F>(&mut self, lookup: &F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.github.credential().is_none() {
            self.github.api_key = lookup(GITHUB_API_KEY);
        }
        if self.people_data.credential().is_none() {
            self.people_data.api_key = lookup(PDL_API_KEY);
        }
        if self.generative.credential().is_none() {
            self.generative.api_key = lookup(OPENAI_API_KEY);
        }
    }
}
