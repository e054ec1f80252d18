// Adapters layer: one module per external provider, each mapping its own
// response shape into a PartialProfile.

pub mod generative;
pub mod github;
pub mod people_data;

pub use generative::GenerativeTextAdapter;
pub use github::DeveloperNetworkAdapter;
pub use people_data::PeopleDataAdapter;

use crate::config::Timeouts;
use crate::utils::error::Result;
use reqwest::Client;

pub const USER_AGENT: &str = "Profile-Enrichment-Platform";

/// 每個 adapter 自己的 client，逾時在這裡統一設定
pub(crate) fn build_client(timeouts: Timeouts) -> Result<Client> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeouts.request)
        .connect_timeout(timeouts.connect)
        .build()?;
    Ok(client)
}

pub(crate) fn trim_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}
