use crate::adapters::{build_client, trim_base_url};
use crate::config::GithubSettings;
use crate::core::fallback::handle_from_email;
use crate::domain::model::{non_empty, PartialGithubStats, PartialProfile, PartialSocials};
use crate::domain::ports::ProfileSource;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

const SOURCE_NAME: &str = "developer-network";

#[derive(Debug, Deserialize)]
struct GithubUser {
    login: Option<String>,
    name: Option<String>,
    avatar_url: Option<String>,
    html_url: Option<String>,
    bio: Option<String>,
    company: Option<String>,
    location: Option<String>,
    blog: Option<String>,
    twitter_username: Option<String>,
    public_repos: Option<u64>,
    followers: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct GithubRepo {
    stargazers_count: Option<u64>,
}

/// 單一候選帳號的查詢結果
enum Lookup {
    Found(GithubUser),
    Miss,
    TransportError(reqwest::Error),
}

/// GitHub REST adapter: resolves a handle from the requested identity and
/// reports account data plus aggregate repository stars.
pub struct DeveloperNetworkAdapter {
    client: Client,
    base_url: String,
    credential: Option<String>,
    repo_page_size: usize,
}

impl DeveloperNetworkAdapter {
    pub fn new(settings: &GithubSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeouts())?,
            base_url: trim_base_url(&settings.base_url),
            credential: settings.credential(),
            repo_page_size: settings.repo_page_size.clamp(1, 100),
        })
    }

    /// Handles tried in order: email local part, then the name joined
    /// without separators, with hyphens and with underscores.
    pub fn candidate_handles(name: &str, email: &str) -> Vec<String> {
        let lowered = name.to_lowercase();
        let words: Vec<&str> = lowered.split_whitespace().collect();

        let mut candidates: Vec<String> = Vec::with_capacity(4);
        for candidate in [
            handle_from_email(email),
            words.join(""),
            words.join("-"),
            words.join("_"),
        ] {
            let usable = !candidate.is_empty()
                && candidate
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if usable && !candidates.contains(&candidate) {
                candidates.push(candidate);
            }
        }
        candidates
    }

    async fn lookup_user(&self, handle: &str, token: &str) -> Lookup {
        let url = format!("{}/users/{}", self.base_url, handle);
        tracing::debug!("🐙 Looking up GitHub user: {}", handle);

        let response = match self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", token))
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("🐙 GitHub lookup for '{}' failed: {}", handle, e);
                return Lookup::TransportError(e);
            }
        };

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::debug!("🐙 No GitHub account named '{}'", handle);
            return Lookup::Miss;
        }
        if !status.is_success() {
            tracing::warn!("🐙 GitHub returned {} for '{}', trying next handle", status, handle);
            return Lookup::Miss;
        }

        match response.json::<GithubUser>().await {
            Ok(user) => Lookup::Found(user),
            Err(e) => {
                tracing::warn!("🐙 Unreadable GitHub user record for '{}': {}", handle, e);
                Lookup::Miss
            }
        }
    }

    async fn total_stars(&self, login: &str, token: &str) -> Result<u64> {
        let url = format!("{}/users/{}/repos", self.base_url, login);
        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("token {}", token))
            .header(ACCEPT, "application/vnd.github+json")
            .query(&[
                ("per_page", self.repo_page_size.to_string()),
                ("sort", "updated".to_string()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::ProviderError {
                provider: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                message: format!("repository listing for '{}' failed", login),
            });
        }

        let repos: Vec<GithubRepo> = response.json().await?;
        Ok(repos.iter().filter_map(|r| r.stargazers_count).sum())
    }

    fn to_partial(user: GithubUser, stars: u64) -> PartialProfile {
        let socials = PartialSocials {
            linkedin: None,
            github: non_empty(user.html_url),
            twitter: non_empty(user.twitter_username)
                .map(|handle| format!("https://twitter.com/{}", handle)),
            website: non_empty(user.blog),
        };

        PartialProfile {
            name: non_empty(user.name),
            bio: non_empty(user.bio),
            profile_image: non_empty(user.avatar_url),
            location: non_empty(user.location),
            company: non_empty(user.company),
            socials: Some(socials),
            github_stats: Some(PartialGithubStats {
                repos: user.public_repos,
                stars: Some(stars),
                followers: user.followers,
            }),
            ..Default::default()
        }
    }
}

#[async_trait]
impl ProfileSource for DeveloperNetworkAdapter {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn fetch(&self, name: &str, email: &str) -> Result<PartialProfile> {
        let Some(token) = self.credential.as_deref() else {
            tracing::warn!("⚠️ GITHUB_API_KEY not configured, skipping GitHub enrichment");
            return Ok(PartialProfile::default());
        };

        tracing::info!("🐙 Fetching GitHub data...");

        let candidates = Self::candidate_handles(name, email);
        let mut transport_errors = Vec::new();
        let mut resolved = None;

        for handle in &candidates {
            match self.lookup_user(handle, token).await {
                Lookup::Found(user) => {
                    resolved = Some((handle.clone(), user));
                    break;
                }
                Lookup::Miss => continue,
                Lookup::TransportError(e) => transport_errors.push(e),
            }
        }

        let Some((handle, user)) = resolved else {
            // 每個候選都連不上才算供應商錯誤，交給上層隔離
            if !candidates.is_empty() && transport_errors.len() == candidates.len() {
                if let Some(e) = transport_errors.pop() {
                    return Err(EnrichError::ApiError(e));
                }
            }
            tracing::info!("ℹ️ No GitHub user found for {} candidate handles", candidates.len());
            return Ok(PartialProfile::default());
        };

        let login = user.login.clone().unwrap_or(handle);
        tracing::info!("✅ Found GitHub user: {}", login);

        let stars = match self.total_stars(&login, token).await {
            Ok(stars) => stars,
            Err(e) => {
                tracing::warn!("Failed to fetch repository stats: {}", e);
                0
            }
        };

        Ok(Self::to_partial(user, stars))
    }
}
