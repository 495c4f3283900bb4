use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vsv_ranker_rust::config::{Config, OutputFormat};
use vsv_ranker_rust::formatters::{render_failure, render_json, render_no_data, render_table};
use vsv_rust_core::clients::AnthropicClient;
use vsv_rust_core::providers::{FixtureProvider, MatchDataProvider, ResearchProvider};
use vsv_rust_core::{RankingPipeline, RunOutcome};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr so stdout carries only the ranking
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting VSV ranker...");

    let config = Config::from_env().context("Failed to load configuration")?;

    let outcome = match (&config.fixture_path, config.anthropic()) {
        (Some(path), _) => {
            info!("Offline run against fixture {}", path.display());
            let provider = FixtureProvider::load(path)?;
            run(provider, &config).await?
        }
        (None, Some(anthropic)) => {
            info!("Using research model {}", anthropic.model);
            let provider =
                ResearchProvider::new(AnthropicClient::new(anthropic), config.research.clone());
            run(provider, &config).await?
        }
        (None, None) => bail!("No ANTHROPIC_API_KEY and no VSV_FIXTURE_PATH configured"),
    };

    match outcome {
        RunOutcome::Succeeded(report) => {
            let rendered = match config.output_format {
                OutputFormat::Table => render_table(&report),
                OutputFormat::Json => render_json(&report)?,
            };
            println!("{}", rendered);
        }
        RunOutcome::NoData { leagues } => {
            println!("{}", render_no_data(&leagues));
        }
        RunOutcome::Failed(failure) => {
            eprintln!("{}", render_failure(&failure));
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn run<P: MatchDataProvider>(provider: P, config: &Config) -> Result<RunOutcome> {
    let pipeline = RankingPipeline::new(provider, config.leagues.clone(), config.engine)
        .context("Invalid pipeline configuration")?;
    Ok(pipeline.run().await)
}
