use clap::Parser;
use profile_enricher::config::LogFormat;
use profile_enricher::utils::error::{EnrichError, ErrorSeverity};
use profile_enricher::utils::{logger, validation::Validate};
use profile_enricher::{CliConfig, EnrichConfig, ProfileAggregator};

fn exit_with(e: &EnrichError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    match cli.log_format {
        LogFormat::Compact => logger::init_cli_logger(cli.verbose),
        LogFormat::Json => logger::init_json_logger(cli.verbose),
    }

    tracing::info!("Starting profile-enricher");

    // 驗證並正規化請求
    let request = cli.request().normalized();
    if let Err(e) = request.validate() {
        exit_with(&e);
    }

    let mut config = match EnrichConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };
    cli.apply_overrides(&mut config);

    if let Err(e) = config.validate() {
        exit_with(&e);
    }
    if cli.verbose {
        tracing::debug!(
            "Base URLs: github={}, people_data={}, generative={}",
            config.github.base_url,
            config.people_data.base_url,
            config.generative.base_url
        );
    }

    let aggregator = match ProfileAggregator::from_config(&config) {
        Ok(aggregator) => aggregator,
        Err(e) => exit_with(&e),
    };

    let profile = aggregator.aggregate(&request.name, &request.email).await;

    let output = if cli.pretty {
        serde_json::to_string_pretty(&profile)?
    } else {
        serde_json::to_string(&profile)?
    };
    println!("{}", output);

    Ok(())
}
