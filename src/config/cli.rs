use crate::config::toml_config::EnrichConfig;
use crate::domain::model::EnrichmentRequest;
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "profile-enricher")]
#[command(about = "Build a consolidated professional profile from a name and an email")]
pub struct CliConfig {
    #[arg(long, help = "Full name of the person")]
    pub name: String,

    #[arg(long, help = "Email address of the person")]
    pub email: String,

    #[arg(short, long, help = "Path to a TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "GitHub token, overrides config and GITHUB_API_KEY")]
    pub github_token: Option<String>,

    #[arg(long, help = "People Data Labs key, overrides config and PDL_API_KEY")]
    pub pdl_api_key: Option<String>,

    #[arg(long, help = "OpenAI key, overrides config and OPENAI_API_KEY")]
    pub openai_api_key: Option<String>,

    #[arg(long, help = "Pretty-print the profile JSON")]
    pub pretty: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl CliConfig {
    pub fn request(&self) -> EnrichmentRequest {
        EnrichmentRequest::new(self.name.clone(), self.email.clone())
    }

    /// 命令列參數覆蓋配置檔中的憑證
    pub fn apply_overrides(&self, config: &mut EnrichConfig) {
        if let Some(token) = &self.github_token {
            config.github.api_key = Some(token.clone());
        }
        if let Some(key) = &self.pdl_api_key {
            config.people_data.api_key = Some(key.clone());
        }
        if let Some(key) = &self.openai_api_key {
            config.generative.api_key = Some(key.clone());
        }
    }
}
