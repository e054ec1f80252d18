use crate::adapters::{DeveloperNetworkAdapter, GenerativeTextAdapter, PeopleDataAdapter};
use crate::config::EnrichConfig;
use crate::core::fallback::synthesize;
use crate::core::merge::{merge, merge_all};
use crate::domain::model::{PartialProfile, Profile};
use crate::domain::ports::{ProfileEnhancer, ProfileSource};
use crate::utils::error::Result;
use std::future::Future;
use std::sync::Arc;

/// Runs one provider call on its own task and turns any error, or a panic,
/// into an empty partial result.
pub async fn isolate<F>(source: &'static str, call: F) -> PartialProfile
where
    F: Future<Output = Result<PartialProfile>> + Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(Ok(partial)) => partial,
        Ok(Err(e)) => {
            tracing::warn!("{} enrichment failed: {}", source, e);
            PartialProfile::default()
        }
        Err(join_error) => {
            tracing::error!("{} enrichment aborted: {}", source, join_error);
            PartialProfile::default()
        }
    }
}

/// The pipeline entry point: fallback, then developer-network and
/// people-data concurrently, then generative text on the merged result.
#[derive(Clone)]
pub struct ProfileAggregator {
    developer: Arc<dyn ProfileSource>,
    people: Arc<dyn ProfileSource>,
    generative: Arc<dyn ProfileEnhancer>,
}

impl ProfileAggregator {
    pub fn new(
        developer: Arc<dyn ProfileSource>,
        people: Arc<dyn ProfileSource>,
        generative: Arc<dyn ProfileEnhancer>,
    ) -> Self {
        Self {
            developer,
            people,
            generative,
        }
    }

    pub fn from_config(config: &EnrichConfig) -> Result<Self> {
        let aggregator = Self::new(
            Arc::new(DeveloperNetworkAdapter::new(&config.github)?),
            Arc::new(PeopleDataAdapter::new(&config.people_data)?),
            Arc::new(GenerativeTextAdapter::new(&config.generative)?),
        );

        tracing::debug!(
            "Providers configured: {}={}, {}={}, {}={}",
            aggregator.developer.source_name(),
            aggregator.developer.is_configured(),
            aggregator.people.source_name(),
            aggregator.people.is_configured(),
            aggregator.generative.source_name(),
            aggregator.generative.is_configured()
        );

        Ok(aggregator)
    }

    pub async fn aggregate(&self, name: &str, email: &str) -> Profile {
        tracing::info!("🚀 Starting enrichment for {} ({})", name, email);

        let base = synthesize(name, email);

        let (developer_result, people_result) = tokio::join!(
            isolate(
                self.developer.source_name(),
                Self::fetch_owned(self.developer.clone(), name, email)
            ),
            isolate(
                self.people.source_name(),
                Self::fetch_owned(self.people.clone(), name, email)
            ),
        );

        // 合併順序固定：developer-network 先、people-data 後
        let combined = merge_all(base, [&developer_result, &people_result]);

        let generative_result = isolate(
            self.generative.source_name(),
            Self::enhance_owned(self.generative.clone(), name, email, combined.clone()),
        )
        .await;

        let profile = merge(combined, &generative_result);

        tracing::info!("✨ Enrichment complete for {}", name);
        profile
    }

    fn fetch_owned(
        source: Arc<dyn ProfileSource>,
        name: &str,
        email: &str,
    ) -> impl Future<Output = Result<PartialProfile>> + Send + 'static {
        let name = name.to_string();
        let email = email.to_string();
        async move { source.fetch(&name, &email).await }
    }

    fn enhance_owned(
        enhancer: Arc<dyn ProfileEnhancer>,
        name: &str,
        email: &str,
        context: Profile,
    ) -> impl Future<Output = Result<PartialProfile>> + Send + 'static {
        let name = name.to_string();
        let email = email.to_string();
        async move { enhancer.enhance(&name, &email, &context).await }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{GithubStats, PartialGithubStats, PartialSocials, WorkEntry};
    use crate::utils::error::EnrichError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CannedSource {
        name: &'static str,
        result: PartialProfile,
        delay: Duration,
    }

    #[async_trait]
    impl ProfileSource for CannedSource {
        fn source_name(&self) -> &'static str {
            self.name
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn fetch(&self, _name: &str, _email: &str) -> Result<PartialProfile> {
            tokio::time::sleep(self.delay).await;
            Ok(self.result.clone())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProfileSource for FailingSource {
        fn source_name(&self) -> &'static str {
            "failing"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn fetch(&self, _name: &str, _email: &str) -> Result<PartialProfile> {
            Err(EnrichError::ProviderError {
                provider: "failing".to_string(),
                status: 503,
                message: "Service Unavailable".to_string(),
            })
        }
    }

    struct PanickingSource;

    #[async_trait]
    impl ProfileSource for PanickingSource {
        fn source_name(&self) -> &'static str {
            "panicking"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn fetch(&self, _name: &str, _email: &str) -> Result<PartialProfile> {
            panic!("provider adapter bug");
        }
    }

    /// Records the context it was given and returns a fixed overlay.
    struct RecordingEnhancer {
        calls: AtomicUsize,
        seen_company: std::sync::Mutex<Option<String>>,
        result: PartialProfile,
    }

    impl RecordingEnhancer {
        fn new(result: PartialProfile) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                seen_company: std::sync::Mutex::new(None),
                result,
            }
        }
    }

    #[async_trait]
    impl ProfileEnhancer for RecordingEnhancer {
        fn source_name(&self) -> &'static str {
            "recording"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn enhance(
            &self,
            _name: &str,
            _email: &str,
            context: &Profile,
        ) -> Result<PartialProfile> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Ok(mut seen) = self.seen_company.lock() {
                *seen = Some(context.company.clone());
            }
            Ok(self.result.clone())
        }
    }

    struct FailingEnhancer;

    #[async_trait]
    impl ProfileEnhancer for FailingEnhancer {
        fn source_name(&self) -> &'static str {
            "failing-enhancer"
        }

        fn is_configured(&self) -> bool {
            true
        }

        async fn enhance(
            &self,
            _name: &str,
            _email: &str,
            _context: &Profile,
        ) -> Result<PartialProfile> {
            Err(EnrichError::ParseError {
                provider: "failing-enhancer".to_string(),
                message: "not json".to_string(),
            })
        }
    }

    fn canned(name: &'static str, result: PartialProfile, delay_ms: u64) -> Arc<dyn ProfileSource> {
        Arc::new(CannedSource {
            name,
            result,
            delay: Duration::from_millis(delay_ms),
        })
    }

    fn developer_partial() -> PartialProfile {
        PartialProfile {
            headline: Some("Open source maintainer".to_string()),
            company: Some("@initech".to_string()),
            location: Some("Berlin".to_string()),
            socials: Some(PartialSocials {
                github: Some("https://github.com/janedoe".to_string()),
                ..Default::default()
            }),
            github_stats: Some(PartialGithubStats {
                repos: Some(12),
                stars: Some(42),
                followers: Some(87),
            }),
            ..Default::default()
        }
    }

    fn people_partial() -> PartialProfile {
        PartialProfile {
            headline: Some("Staff Engineer".to_string()),
            company: Some("Acme Corp".to_string()),
            socials: Some(PartialSocials {
                linkedin: Some("https://linkedin.com/in/jane-doe".to_string()),
                ..Default::default()
            }),
            work_history: Some(vec![WorkEntry {
                company: "Acme Corp".to_string(),
                title: "Staff Engineer".to_string(),
                duration: "2021 - Present".to_string(),
            }]),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_all_sources_empty_returns_fallback() {
        let aggregator = ProfileAggregator::new(
            canned("developer", PartialProfile::default(), 0),
            canned("people", PartialProfile::default(), 0),
            Arc::new(RecordingEnhancer::new(PartialProfile::default())),
        );

        let profile = aggregator.aggregate("Jane Doe", "jane@acme.com").await;

        assert_eq!(profile, synthesize("Jane Doe", "jane@acme.com"));
    }

    #[tokio::test]
    async fn test_people_data_wins_regardless_of_completion_order() {
        // developer 比較慢完成，但合併順序不變
        let enhancer = Arc::new(RecordingEnhancer::new(PartialProfile::default()));
        let aggregator = ProfileAggregator::new(
            canned("developer", developer_partial(), 50),
            canned("people", people_partial(), 0),
            enhancer.clone(),
        );

        let profile = aggregator.aggregate("Jane Doe", "jane@acme.com").await;

        assert_eq!(profile.headline, "Staff Engineer");
        assert_eq!(profile.company, "Acme Corp");
        assert_eq!(profile.location, "Berlin");
        assert_eq!(profile.socials.github, "https://github.com/janedoe");
        assert_eq!(profile.socials.linkedin, "https://linkedin.com/in/jane-doe");
        assert_eq!(
            profile.github_stats,
            GithubStats {
                repos: 12,
                stars: 42,
                followers: 87
            }
        );
        assert_eq!(profile.work_history.len(), 1);
        assert_eq!(profile.email, "jane@acme.com");

        assert_eq!(enhancer.calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            enhancer.seen_company.lock().unwrap().as_deref(),
            Some("Acme Corp")
        );
    }

    #[tokio::test]
    async fn test_generative_overrides_only_what_it_supplies() {
        let aggregator = ProfileAggregator::new(
            canned("developer", developer_partial(), 0),
            canned("people", people_partial(), 0),
            Arc::new(RecordingEnhancer::new(PartialProfile {
                headline: Some("Staff Platform Engineer at Acme".to_string()),
                skills: Some(vec!["Rust".to_string(), "Kubernetes".to_string()]),
                ..Default::default()
            })),
        );

        let profile = aggregator.aggregate("Jane Doe", "jane@acme.com").await;

        assert_eq!(profile.headline, "Staff Platform Engineer at Acme");
        assert_eq!(profile.skills, vec!["Rust", "Kubernetes"]);
        assert_eq!(profile.company, "Acme Corp");
        assert_eq!(profile.github_stats.stars, 42);
    }

    #[tokio::test]
    async fn test_failing_developer_source_is_isolated() {
        let enhancer = Arc::new(RecordingEnhancer::new(PartialProfile::default()));
        let aggregator = ProfileAggregator::new(
            Arc::new(FailingSource),
            canned("people", people_partial(), 0),
            enhancer.clone(),
        );

        let profile = aggregator.aggregate("Jane Doe", "jane@acme.com").await;

        assert_eq!(profile.headline, "Staff Engineer");
        assert_eq!(profile.socials.linkedin, "https://linkedin.com/in/jane-doe");
        // 其他欄位來自 fallback
        assert_eq!(profile.socials.github, "https://github.com/jane");
        assert_eq!(profile.github_stats, GithubStats::default());
        assert_eq!(enhancer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_panicking_source_is_isolated() {
        let aggregator = ProfileAggregator::new(
            Arc::new(PanickingSource),
            canned("people", people_partial(), 0),
            Arc::new(FailingEnhancer),
        );

        let profile = aggregator.aggregate("Jane Doe", "jane@acme.com").await;

        assert_eq!(profile.company, "Acme Corp");
        assert_eq!(profile.summary, synthesize("Jane Doe", "jane@acme.com").summary);
    }

    #[tokio::test]
    async fn test_isolate_passes_through_success() {
        let partial = isolate("ok", async { Ok::<_, EnrichError>(developer_partial()) }).await;
        assert_eq!(partial, developer_partial());

        let empty = isolate("err", async {
            Err::<PartialProfile, _>(EnrichError::ConfigError {
                message: "boom".to_string(),
            })
        })
        .await;
        assert!(empty.is_empty());
    }
}
