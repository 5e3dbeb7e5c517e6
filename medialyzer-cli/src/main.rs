mod output;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crossterm::style::Color;
use medialyzer_core::user_agent::classify;
use medialyzer_core::{FeatureDetector, HostProfile};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "medialyzer")]
#[command(about = "Browser media capability detection for user-agent strings and host profiles")]
#[command(version)]
struct Cli {
    /// Tracing filter used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "medialyzer=info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a user-agent string
    Classify {
        /// User-agent string to classify
        user_agent: String,

        /// Treat the host as exposing the `chrome` global
        #[arg(long)]
        chrome_global: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Run every capability query against a JSON host profile
    Report {
        /// Path to the host profile
        profile: PathBuf,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match cli.command {
        Commands::Classify {
            user_agent,
            chrome_global,
            json,
        } => {
            info!("Classifying user agent");
            classify_user_agent(&user_agent, chrome_global, json)?;
        }
        Commands::Report { profile, json } => {
            info!("Reporting capabilities for {}", profile.display());
            report_profile(&profile, json)?;
        }
    }

    Ok(())
}

fn classify_user_agent(user_agent: &str, chrome_global: bool, json: bool) -> Result<()> {
    let classification = classify(user_agent, chrome_global);
    let mut stdout = io::stdout();

    if json {
        let text = serde_json::to_string_pretty(&classification)
            .context("serializing classification")?;
        println!("{}", text);
        return Ok(());
    }

    output::print_box(&mut stdout, "User Agent", &output::classification_rows(&classification))
        .context("writing classification")?;
    Ok(())
}

fn report_profile(path: &Path, json: bool) -> Result<()> {
    let profile = HostProfile::load(path)
        .with_context(|| format!("loading host profile {}", path.display()))?;
    let report = FeatureDetector::new(profile).report();
    let mut stdout = io::stdout();

    if json {
        let text = serde_json::to_string_pretty(&report).context("serializing report")?;
        println!("{}", text);
        return Ok(());
    }

    output::print_colored(&mut stdout, "MediaLyzer Capability Report\n", Color::Magenta)
        .context("writing report")?;
    for section in output::report_sections(&report) {
        println!();
        output::print_box(&mut stdout, section.title, &section.rows).context("writing report")?;
    }
    Ok(())
}
