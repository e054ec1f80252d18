pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::EnrichConfig;
pub use core::{merge, synthesize, ProfileAggregator};
pub use domain::model::{EnrichmentRequest, PartialProfile, Profile};
pub use domain::ports::{ProfileEnhancer, ProfileSource};
pub use utils::error::{EnrichError, Result};
