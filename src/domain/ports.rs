use crate::domain::model::{PartialProfile, Profile};
use crate::utils::error::Result;
use async_trait::async_trait;

/// A primary data provider keyed only by the requested identity.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Whether a credential was configured when the source was built.
    fn is_configured(&self) -> bool;

    async fn fetch(&self, name: &str, email: &str) -> Result<PartialProfile>;
}

/// A provider that refines an already merged profile.
#[async_trait]
pub trait ProfileEnhancer: Send + Sync {
    fn source_name(&self) -> &'static str;

    fn is_configured(&self) -> bool;

    async fn enhance(&self, name: &str, email: &str, context: &Profile) -> Result<PartialProfile>;
}
