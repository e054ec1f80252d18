use crate::domain::model::{GithubStats, Profile, Socials, WorkEntry};
use url::form_urlencoded;

const AVATAR_ENDPOINT: &str = "https://ui-avatars.com/api/";
const DEFAULT_TITLE: &str = "Professional";
const DEFAULT_DURATION: &str = "2020 - Present";
const DEFAULT_LOCATION: &str = "Remote";
const DEFAULT_SKILLS: [&str; 3] = ["Communication", "Problem Solving", "Leadership"];

/// 只用 name 與 email 產生完整的預設檔案，所有供應商都失敗時就是最終結果
pub fn synthesize(name: &str, email: &str) -> Profile {
    let handle = handle_from_email(email);
    let company = company_from_email(email);

    Profile {
        name: name.to_string(),
        email: email.to_string(),
        headline: DEFAULT_TITLE.to_string(),
        company: company.clone(),
        location: DEFAULT_LOCATION.to_string(),
        bio: format!(
            "{} is a professional with experience in technology and innovation.",
            name
        ),
        profile_image: avatar_url(name),
        socials: Socials {
            linkedin: format!("https://linkedin.com/in/{}", handle),
            github: format!("https://github.com/{}", handle),
            twitter: format!("https://twitter.com/{}", handle),
            website: String::new(),
        },
        skills: DEFAULT_SKILLS.iter().map(|s| s.to_string()).collect(),
        work_history: vec![WorkEntry {
            company,
            title: DEFAULT_TITLE.to_string(),
            duration: DEFAULT_DURATION.to_string(),
        }],
        github_stats: GithubStats::default(),
        summary: format!(
            "{} is a dedicated professional with a passion for innovation and continuous learning.",
            name
        ),
    }
}

/// Lower-cased email local part with everything outside `[a-z0-9]` removed.
pub fn handle_from_email(email: &str) -> String {
    let local = email.split('@').next().unwrap_or_default();
    local
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// First label of the email domain, capitalized.
pub fn company_from_email(email: &str) -> String {
    let domain = email.split('@').nth(1).unwrap_or_default();
    let label = domain.split('.').next().unwrap_or_default();

    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Deterministic generated-avatar URL keyed only by name.
pub fn avatar_url(name: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("name", name)
        .append_pair("size", "200")
        .append_pair("background", "3b82f6")
        .append_pair("color", "fff")
        .append_pair("bold", "true")
        .finish();
    format!("{}?{}", AVATAR_ENDPOINT, query)
}
