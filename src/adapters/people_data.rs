use crate::adapters::{build_client, trim_base_url};
use crate::config::PeopleDataSettings;
use crate::domain::model::{non_empty, PartialProfile, PartialSocials, WorkEntry};
use crate::domain::ports::ProfileSource;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

const SOURCE_NAME: &str = "people-data";
const MAX_SKILLS: usize = 10;
const MAX_WORK_HISTORY: usize = 5;

#[derive(Debug, Serialize)]
struct EnrichQuery<'a> {
    email: &'a str,
    name: &'a str,
}

#[derive(Debug, Deserialize)]
struct EnrichResponse {
    data: Option<Person>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Person {
    full_name: Option<String>,
    job_title: Option<String>,
    job_company_name: Option<String>,
    location_names: Option<Vec<String>>,
    summary: Option<String>,
    skills: Option<Vec<Labelled>>,
    experience: Option<Vec<Experience>>,
    profiles: Option<Vec<SocialProfile>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Experience {
    company: Option<Labelled>,
    title: Option<Labelled>,
    start_date: Option<String>,
    end_date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SocialProfile {
    network: Option<String>,
    url: Option<String>,
}

/// Values the provider sends either as a bare string or as `{ "name": … }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Labelled {
    Text(String),
    Named { name: Option<String> },
}

impl Labelled {
    fn label(&self) -> Option<&str> {
        let label = match self {
            Labelled::Text(text) => Some(text.as_str()),
            Labelled::Named { name } => name.as_deref(),
        };
        label.filter(|l| !l.trim().is_empty())
    }
}

/// People Data Labs person-enrichment adapter.
pub struct PeopleDataAdapter {
    client: Client,
    base_url: String,
    credential: Option<String>,
}

impl PeopleDataAdapter {
    pub fn new(settings: &PeopleDataSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeouts())?,
            base_url: trim_base_url(&settings.base_url),
            credential: settings.credential(),
        })
    }

    fn to_partial(person: Person) -> PartialProfile {
        let experience = person.experience.unwrap_or_default();
        let latest = experience.first();

        let headline = non_empty(person.job_title).or_else(|| {
            latest
                .and_then(|e| e.title.as_ref())
                .and_then(Labelled::label)
                .map(str::to_string)
        });
        let company = non_empty(person.job_company_name).or_else(|| {
            latest
                .and_then(|e| e.company.as_ref())
                .and_then(Labelled::label)
                .map(str::to_string)
        });

        let skills: Vec<String> = person
            .skills
            .unwrap_or_default()
            .iter()
            .filter_map(Labelled::label)
            .take(MAX_SKILLS)
            .map(str::to_string)
            .collect();

        let work_history: Vec<WorkEntry> = experience
            .iter()
            .take(MAX_WORK_HISTORY)
            .filter(|e| e.company.is_some() && e.title.is_some())
            .map(|e| WorkEntry {
                company: e
                    .company
                    .as_ref()
                    .and_then(Labelled::label)
                    .unwrap_or("Unknown Company")
                    .to_string(),
                title: e
                    .title
                    .as_ref()
                    .and_then(Labelled::label)
                    .unwrap_or("Unknown Title")
                    .to_string(),
                duration: format_date_range(e.start_date.as_deref(), e.end_date.as_deref()),
            })
            .collect();

        PartialProfile {
            name: non_empty(person.full_name),
            headline,
            company,
            location: person
                .location_names
                .and_then(|names| names.into_iter().next())
                .and_then(|n| non_empty(Some(n))),
            bio: non_empty(person.summary),
            socials: Some(extract_socials(person.profiles.unwrap_or_default())),
            skills: Some(skills).filter(|s| !s.is_empty()),
            work_history: Some(work_history).filter(|w| !w.is_empty()),
            ..Default::default()
        }
    }
}

/// 每個網路只取第一個出現的 URL
fn extract_socials(profiles: Vec<SocialProfile>) -> PartialSocials {
    let mut socials = PartialSocials::default();

    for profile in profiles {
        let (Some(network), Some(url)) = (profile.network, non_empty(profile.url)) else {
            continue;
        };
        let slot = match network.to_lowercase().as_str() {
            "linkedin" => &mut socials.linkedin,
            "github" => &mut socials.github,
            "twitter" => &mut socials.twitter,
            _ => continue,
        };
        if slot.is_none() {
            *slot = Some(url);
        }
    }

    socials
}

/// `"<start-year> - <end-year|Present>"`, or `"Unknown"` without a start date.
pub fn format_date_range(start: Option<&str>, end: Option<&str>) -> String {
    let Some(start) = start.filter(|s| !s.trim().is_empty()) else {
        return "Unknown".to_string();
    };

    let start_year = year_of(start).unwrap_or_else(|| "Unknown".to_string());
    let end_year = end
        .filter(|e| !e.trim().is_empty())
        .map(|e| year_of(e).unwrap_or_else(|| "Unknown".to_string()))
        .unwrap_or_else(|| "Present".to_string());

    format!("{} - {}", start_year, end_year)
}

/// 支援 `YYYY`、`YYYY-MM`、`YYYY-MM-DD`
fn year_of(date: &str) -> Option<String> {
    let date = date.trim();
    if let Ok(parsed) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return Some(parsed.year().to_string());
    }

    let year = date.split('-').next()?;
    if year.len() == 4 && year.chars().all(|c| c.is_ascii_digit()) {
        Some(year.to_string())
    } else {
        None
    }
}

#[async_trait]
impl ProfileSource for PeopleDataAdapter {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn fetch(&self, name: &str, email: &str) -> Result<PartialProfile> {
        let Some(api_key) = self.credential.as_deref() else {
            tracing::warn!("⚠️ PDL_API_KEY not configured, skipping People Data Labs enrichment");
            return Ok(PartialProfile::default());
        };

        tracing::info!("👤 Fetching People Data Labs data...");

        let response = self
            .client
            .post(format!("{}/person/enrich", self.base_url))
            .header("X-Api-Key", api_key)
            .json(&EnrichQuery { email, name })
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            tracing::info!("ℹ️ No PDL data found for this person");
            return Ok(PartialProfile::default());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichError::ProviderError {
                provider: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            });
        }

        let body: EnrichResponse = response.json().await?;
        let Some(person) = body.data else {
            tracing::info!("ℹ️ No person data found from PDL");
            return Ok(PartialProfile::default());
        };

        tracing::info!("✅ Found PDL data");
        Ok(Self::to_partial(person))
    }
}
