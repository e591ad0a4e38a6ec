//! `data-guardian`: score the privacy risk of web domains and suggest mitigations.
//!
//! # Flow (`score`)
//! 1. Parse CLI arguments and install logging.
//! 2. Load configuration.
//! 3. Read one or more scan requests.
//! 4. Score each one: remote backends first when configured, otherwise the
//!    local engine.
//! 5. Render the requested report.
//! 6. Exit `0`, or `1` when any domain reaches the `fail_on` band.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use futures::future::join_all;

use data_guardian::blocklist::{self, compact::HybridLimits, Blocklist};
use data_guardian::cli::{Cli, Command, ReportFormat};
use data_guardian::config::{load_config, Config};
use data_guardian::detector::Detector;
use data_guardian::models::{Band, PageCapture, ScoredScan};
use data_guardian::{input, logging, remote, report, service};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let cwd = std::env::current_dir()?;
    let config = load_config(&cwd, cli.config.as_deref())?;

    match cli.command {
        Command::Score { input: input_path, report: format, pdf, fail_on, remote: urls } => {
            let fail_on = fail_on.map(Band::from).unwrap_or(config.report.fail_on);
            let mut backends = urls;
            backends.extend(config.remote.backends.iter().cloned());

            let breached = run_score(
                &input_path,
                format,
                pdf,
                fail_on,
                &backends,
                &config,
                cli.verbose,
                cli.quiet,
            )
            .await?;
            if breached {
                std::process::exit(1);
            }
        }
        Command::Detect { capture, blocklist, score } => {
            run_detect(&capture, blocklist.as_deref(), score)?;
        }
        Command::Blocklist { dry_run, hybrid, output } => {
            let output = output.unwrap_or_else(|| config.blocklist.output.clone());
            run_blocklist(&config, &output, dry_run, hybrid, cli.quiet).await?;
        }
        Command::Health => {
            println!("{}", serde_json::to_string(&service::health())?);
        }
    }

    Ok(())
}

/// Returns `true` when any scored domain is at or above `fail_on`.
#[allow(clippy::too_many_arguments)]
async fn run_score(
    input_path: &Path,
    format: ReportFormat,
    pdf: Option<PathBuf>,
    fail_on: Band,
    backends: &[String],
    config: &Config,
    verbose: bool,
    quiet: bool,
) -> Result<bool> {
    let batch = input::load_requests(input_path)?;

    if !quiet {
        eprintln!(
            "  {} scoring {} domain{}",
            "→".cyan(),
            batch.requests.len(),
            if batch.requests.len() == 1 { "" } else { "s" }
        );
    }

    let scans: Vec<ScoredScan> = if backends.is_empty() {
        batch.requests.iter().map(remote::score_locally).collect()
    } else {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.remote.timeout_secs))
            .build()?;
        let futures: Vec<_> = batch
            .requests
            .iter()
            .map(|req| remote::score_with_fallback(&client, backends, req))
            .collect();
        join_all(futures).await
    };

    // --pdf implies PDF format
    let report_format = match &pdf {
        Some(_) => ReportFormat::Pdf,
        None => format,
    };
    let pdf_path = pdf.unwrap_or_else(|| PathBuf::from("privacy-report.pdf"));

    match report_format {
        ReportFormat::Terminal => report::terminal::render(&scans, verbose, quiet)?,
        ReportFormat::Json => {
            let responses: Vec<_> = scans.iter().map(|s| &s.response).collect();
            let json = if batch.is_array {
                serde_json::to_string_pretty(&responses)?
            } else {
                serde_json::to_string_pretty(&responses[0])?
            };
            println!("{}", json);
        }
        ReportFormat::Pdf => report::pdf::render(&scans, &pdf_path)?,
    }

    Ok(scans.iter().any(|s| s.response.band >= fail_on))
}

fn run_detect(capture_path: &Path, blocklist_path: Option<&Path>, score: bool) -> Result<()> {
    let capture: PageCapture = input::load_json(capture_path)?;
    let blocklist = match blocklist_path {
        Some(path) => Blocklist::load(path)?,
        None => Blocklist::default(),
    };

    let request = Detector::new(blocklist)?.detect(&capture);
    let json = if score {
        serde_json::to_string_pretty(&service::handle_scan(&request))?
    } else {
        serde_json::to_string_pretty(&request)?
    };
    println!("{}", json);
    Ok(())
}

async fn run_blocklist(config: &Config, output: &Path, dry_run: bool, hybrid: bool, quiet: bool) -> Result<()> {
    let settings = &config.blocklist;
    if !quiet {
        eprintln!(
            "  {} fetching {} source{}{}",
            "→".cyan(),
            settings.sources.len(),
            if settings.sources.len() == 1 { "" } else { "s" },
            if dry_run { " (dry run)" } else { "" }
        );
    }

    let fetched = blocklist::fetch::fetch_sources(
        &settings.sources,
        Duration::from_secs(settings.timeout_secs),
        quiet,
    )
    .await?;

    let entries = if hybrid {
        blocklist::fetch::build_hybrid(
            &fetched,
            HybridLimits {
                top_trackers: settings.top_trackers,
                pixel_patterns: settings.pixel_patterns,
                script_patterns: settings.script_patterns,
            },
        )?
    } else {
        blocklist::fetch::build_merged(&fetched, settings.min_length)?
    };

    if dry_run {
        println!("{} entries; first {} shown:", entries.len(), entries.len().min(50));
        for entry in entries.iter().take(50) {
            println!("{}", entry);
        }
        return Ok(());
    }

    let count = entries.len();
    Blocklist::from_entries(entries).save(output)?;
    println!(
        "{} {} updated ({} entries)",
        "✔".green(),
        output.display(),
        count
    );
    Ok(())
}
