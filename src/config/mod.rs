#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use toml_config::{
    EnrichConfig, GenerativeSettings, GithubSettings, PeopleDataSettings, Timeouts,
};
