use crate::adapters::{build_client, trim_base_url};
use crate::config::GenerativeSettings;
use crate::domain::model::{non_empty, PartialProfile, Profile};
use crate::domain::ports::ProfileEnhancer;
use crate::utils::error::{EnrichError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

const SOURCE_NAME: &str = "generative-text";

const SYSTEM_PROMPT: &str = "You are a professional profile analyst. Generate realistic, \
professional content based on the provided information. Always respond with valid JSON.";

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// The object the model is asked to return. Keys it leaves out stay absent.
#[derive(Debug, Default, Deserialize)]
struct GeneratedFields {
    headline: Option<String>,
    bio: Option<String>,
    summary: Option<String>,
    skills: Option<Vec<String>>,
}

/// OpenAI-compatible chat-completions adapter that rewrites headline, bio,
/// summary and skills from the merged profile.
pub struct GenerativeTextAdapter {
    client: Client,
    base_url: String,
    credential: Option<String>,
    model: String,
    max_tokens: usize,
    temperature: f32,
}

impl GenerativeTextAdapter {
    pub fn new(settings: &GenerativeSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(settings.timeouts())?,
            base_url: trim_base_url(&settings.base_url),
            credential: settings.credential(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
            temperature: settings.temperature,
        })
    }

    pub fn build_prompt(name: &str, email: &str, context: &Profile) -> String {
        let or_unknown = |value: &str, missing: &str| {
            if value.trim().is_empty() {
                missing.to_string()
            } else {
                value.to_string()
            }
        };
        let skills = if context.skills.is_empty() {
            "Unknown".to_string()
        } else {
            context.skills.join(", ")
        };
        let stats = &context.github_stats;

        format!(
            r#"Based on the following information about {name}, generate professional profile enhancements:

Name: {name}
Email: {email}
Current Company: {company}
Current Role: {role}
Location: {location}
Bio: {bio}
Skills: {skills}
GitHub Stats: {repos} repos, {stars} stars, {followers} followers

Please provide:
1. A professional headline (if current one is weak or missing)
2. An enhanced professional bio (2-3 sentences, professional tone)
3. A comprehensive professional summary (3-4 sentences highlighting key strengths)
4. Relevant skills array (if current skills are limited)

Respond with valid JSON in this format:
{{
  "headline": "Professional headline here",
  "bio": "Enhanced professional bio here",
  "summary": "Comprehensive professional summary here",
  "skills": ["skill1", "skill2", "skill3"]
}}"#,
            name = name,
            email = email,
            company = or_unknown(&context.company, "Unknown"),
            role = or_unknown(&context.headline, "Unknown"),
            location = or_unknown(&context.location, "Unknown"),
            bio = or_unknown(&context.bio, "None provided"),
            skills = skills,
            repos = stats.repos,
            stars = stats.stars,
            followers = stats.followers,
        )
    }

    /// Parses the model's reply; `None` when it is not the expected object.
    fn parse_generated(content: &str) -> Option<PartialProfile> {
        let fields: GeneratedFields = match serde_json::from_str(strip_code_fence(content)) {
            Ok(fields) => fields,
            Err(e) => {
                tracing::warn!("Failed to parse AI response: {}", e);
                return None;
            }
        };

        let skills = fields.skills.map(|skills| {
            skills
                .into_iter()
                .filter(|s| !s.trim().is_empty())
                .collect::<Vec<_>>()
        });

        Some(PartialProfile {
            headline: non_empty(fields.headline),
            bio: non_empty(fields.bio),
            summary: non_empty(fields.summary),
            skills: skills.filter(|s| !s.is_empty()),
            ..Default::default()
        })
    }
}

/// 模型有時會用 ```json 包住回覆
fn strip_code_fence(content: &str) -> &str {
    let trimmed = content.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[async_trait]
impl ProfileEnhancer for GenerativeTextAdapter {
    fn source_name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn is_configured(&self) -> bool {
        self.credential.is_some()
    }

    async fn enhance(&self, name: &str, email: &str, context: &Profile) -> Result<PartialProfile> {
        let Some(api_key) = self.credential.as_deref() else {
            tracing::warn!("⚠️ OPENAI_API_KEY not configured, skipping AI enrichment");
            return Ok(PartialProfile::default());
        };

        tracing::info!("🤖 Generating AI enhancements...");

        let payload = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": Self::build_prompt(name, email, context) }
            ],
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
        });

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::ProviderError {
                provider: SOURCE_NAME.to_string(),
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_string(),
            });
        }

        let body: ChatResponse = match response.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Unreadable AI completion payload: {}", e);
                return Ok(PartialProfile::default());
            }
        };

        let Some(content) = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
        else {
            tracing::warn!("AI completion did not include any content");
            return Ok(PartialProfile::default());
        };

        match Self::parse_generated(&content) {
            Some(partial) => {
                tracing::info!("✅ AI enrichment completed");
                Ok(partial)
            }
            None => Ok(PartialProfile::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fallback::synthesize;
    use httpmock::prelude::*;

    fn adapter(base_url: String, api_key: Option<&str>) -> GenerativeTextAdapter {
        let settings = GenerativeSettings {
            base_url,
            api_key: api_key.map(|k| k.to_string()),
            ..Default::default()
        };
        GenerativeTextAdapter::new(&settings).unwrap()
    }

    fn completion(content: &str) -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }
            ]
        })
    }

    #[test]
    fn test_prompt_uses_merged_context() {
        let mut context = synthesize("Jane Doe", "jane@acme.com");
        context.bio = String::new();
        context.github_stats.repos = 12;
        context.github_stats.stars = 42;

        let prompt = GenerativeTextAdapter::build_prompt("Jane Doe", "jane@acme.com", &context);

        assert!(prompt.contains("Current Company: Acme"));
        assert!(prompt.contains("Current Role: Professional"));
        assert!(prompt.contains("Bio: None provided"));
        assert!(prompt.contains("Skills: Communication, Problem Solving, Leadership"));
        assert!(prompt.contains("GitHub Stats: 12 repos, 42 stars"));
        assert!(prompt.contains("\"headline\": \"Professional headline here\""));
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n{\"bio\": \"x\"}\n```"), "{\"bio\": \"x\"}");
        assert_eq!(strip_code_fence("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fence("  {}  "), "{}");
    }

    #[test]
    fn test_parse_keeps_only_supplied_fields() {
        let partial = GenerativeTextAdapter::parse_generated(
            r#"{"headline": "Staff Platform Engineer", "summary": "", "skills": ["Rust", " "], "mood": "great"}"#,
        )
        .unwrap();

        assert_eq!(partial.headline.as_deref(), Some("Staff Platform Engineer"));
        assert_eq!(partial.bio, None);
        assert_eq!(partial.summary, None);
        assert_eq!(partial.skills, Some(vec!["Rust".to_string()]));
        assert_eq!(partial.company, None);
    }

    #[test]
    fn test_parse_rejects_non_object() {
        assert!(GenerativeTextAdapter::parse_generated("Sure! Here is a bio...").is_none());
        assert!(GenerativeTextAdapter::parse_generated("[1, 2, 3]").is_none());
    }

    #[tokio::test]
    async fn test_enhance_returns_generated_fields() {
        let server = MockServer::start();
        let generated = serde_json::json!({
            "headline": "Staff Platform Engineer at Acme",
            "bio": "Jane builds reliable systems.",
            "summary": "Jane leads platform work across teams.",
            "skills": ["Rust", "Distributed Systems"]
        })
        .to_string();

        let chat = server.mock(|when, then| {
            when.method(POST)
                .path("/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("gpt-3.5-turbo");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(completion(&generated));
        });

        let adapter = adapter(server.base_url(), Some("sk-test"));
        let context = synthesize("Jane Doe", "jane@acme.com");
        let result = adapter
            .enhance("Jane Doe", "jane@acme.com", &context)
            .await
            .unwrap();

        chat.assert();
        assert_eq!(result.headline.as_deref(), Some("Staff Platform Engineer at Acme"));
        assert_eq!(result.bio.as_deref(), Some("Jane builds reliable systems."));
        assert_eq!(
            result.summary.as_deref(),
            Some("Jane leads platform work across teams.")
        );
        assert_eq!(
            result.skills,
            Some(vec!["Rust".to_string(), "Distributed Systems".to_string()])
        );
    }

    #[tokio::test]
    async fn test_unparsable_content_is_empty_result() {
        let server = MockServer::start();
        let _chat = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200)
                .json_body(completion("I'm sorry, I can't help with that."));
        });

        let adapter = adapter(server.base_url(), Some("sk-test"));
        let context = synthesize("Jane Doe", "jane@acme.com");
        let result = adapter
            .enhance("Jane Doe", "jane@acme.com", &context)
            .await
            .unwrap();

        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_is_provider_error() {
        let server = MockServer::start();
        let _chat = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(429);
        });

        let adapter = adapter(server.base_url(), Some("sk-test"));
        let context = synthesize("Jane Doe", "jane@acme.com");
        let err = adapter
            .enhance("Jane Doe", "jane@acme.com", &context)
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichError::ProviderError { status: 429, .. }));
    }

    #[tokio::test]
    async fn test_unconfigured_adapter_skips_request() {
        let server = MockServer::start();
        let chat = server.mock(|when, then| {
            when.method(POST).path("/chat/completions");
            then.status(200).json_body(completion("{}"));
        });

        let adapter = adapter(server.base_url(), None);
        let context = synthesize("Jane Doe", "jane@acme.com");
        let result = adapter
            .enhance("Jane Doe", "jane@acme.com", &context)
            .await
            .unwrap();

        assert!(result.is_empty());
        chat.assert_hits(0);
    }
}
