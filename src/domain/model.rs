use serde::{Deserialize, Serialize};

/// 對外輸出的完整個人檔案，每個欄位都一定存在
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub headline: String,
    pub company: String,
    pub location: String,
    pub bio: String,
    pub profile_image: String,
    pub socials: Socials,
    pub skills: Vec<String>,
    pub work_history: Vec<WorkEntry>,
    pub github_stats: GithubStats,
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Socials {
    pub linkedin: String,
    pub github: String,
    pub twitter: String,
    pub website: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    pub company: String,
    pub title: String,
    pub duration: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubStats {
    pub repos: u64,
    pub stars: u64,
    pub followers: u64,
}

/// Output of a single provider. `None` means the provider did not supply
/// the field; the merge never treats it as a zero or empty value.
///
/// No `email` field: the requested email is the identity key and no
/// provider may replace it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialProfile {
    pub name: Option<String>,
    pub headline: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub profile_image: Option<String>,
    pub summary: Option<String>,
    pub socials: Option<PartialSocials>,
    pub skills: Option<Vec<String>>,
    pub work_history: Option<Vec<WorkEntry>>,
    pub github_stats: Option<PartialGithubStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSocials {
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub twitter: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartialGithubStats {
    pub repos: Option<u64>,
    pub stars: Option<u64>,
    pub followers: Option<u64>,
}

impl PartialProfile {
    pub fn is_empty(&self) -> bool {
        *self == PartialProfile::default()
    }
}

impl PartialSocials {
    pub fn is_empty(&self) -> bool {
        *self == PartialSocials::default()
    }
}

/// Enrichment input as handed over by the request boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentRequest {
    pub name: String,
    pub email: String,
}

impl EnrichmentRequest {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }

    /// 去除前後空白，email 轉小寫
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_lowercase(),
        }
    }
}

/// 空字串視為「沒有提供」
pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
