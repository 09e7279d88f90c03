// Command-line front end: compare one archived page against the live site
// and print the result as JSON on stdout.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kodegen_tools_pagediff::{
    Comparator, CompareConfig, ComparisonRequest, ExtractionMode, OutputMode, StrategyPolicy,
    utils::{ensure_scheme, url_authority},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    Flat,
    Hierarchical,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Instructions,
    Html,
}

#[derive(Debug, Parser)]
#[command(name = "kodegen-pagediff", version, about = "Compare an archived page with its live version")]
struct Cli {
    /// Archived snapshot URL
    archived_url: String,

    /// Live page URL
    live_url: String,

    /// Host the archived URL must live on; defaults to the archived URL's own host
    #[arg(long)]
    caller_host: Option<String>,

    /// Official live domain
    #[arg(long, env = "PAGEDIFF_LIVE_DOMAIN")]
    live_domain: Option<String>,

    #[arg(long, value_enum, default_value = "flat")]
    mode: ModeArg,

    #[arg(long, value_enum, default_value = "instructions")]
    format: FormatArg,

    /// Plain HTTP GET for both sides, no headless browser
    #[arg(long = "static")]
    static_only: bool,

    /// Wrap an HTML result in the comparison table instead of printing JSON
    #[arg(long)]
    table: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let archived_url = ensure_scheme(&cli.archived_url);
    let live_url = ensure_scheme(&cli.live_url);
    let caller_host = match cli.caller_host {
        Some(host) => host,
        None => url_authority(&archived_url)
            .with_context(|| format!("Cannot determine host of {archived_url}"))?,
    };

    let mut builder = CompareConfig::builder_from_env()?;
    if let Some(domain) = cli.live_domain {
        builder = builder.live_domain(domain);
    }
    builder = builder
        .extraction_mode(match cli.mode {
            ModeArg::Flat => ExtractionMode::Flat,
            ModeArg::Hierarchical => ExtractionMode::Hierarchical,
        })
        .output_mode(match cli.format {
            FormatArg::Instructions => OutputMode::Instructions,
            FormatArg::Html => OutputMode::HtmlFragment,
        });
    if cli.static_only {
        builder = builder.strategy(StrategyPolicy::StaticOnly);
    }
    let config = builder.build().context("Invalid configuration")?;

    let comparator = Comparator::new(config)?;
    let request = ComparisonRequest::new(archived_url, live_url, caller_host);
    let result = comparator.compare(&request).await;

    if cli.table
        && let Some(table) = result.html_table()
    {
        println!("{table}");
    } else {
        println!("{}", serde_json::to_string_pretty(&result)?);
    }

    if result.is_error {
        std::process::exit(1);
    }
    Ok(())
}
