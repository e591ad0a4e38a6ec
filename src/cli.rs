use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::models::Band;

#[derive(Parser, Debug)]
#[command(
    name = "data-guardian",
    about = "Estimate a privacy risk score for a web domain and suggest mitigations",
    version
)]
pub struct Cli {
    /// Config file [default: ./.data-guardian/config.toml, fallback ~/.config/data-guardian/config.toml]
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Show every breakdown row and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print summary lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Score one scan request (or a JSON array of them)
    Score {
        /// JSON input file; `-` reads stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Report format
        #[arg(long, default_value = "terminal", value_name = "FORMAT")]
        report: ReportFormat,

        /// PDF output path; use without value to default to privacy-report.pdf
        #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "privacy-report.pdf")]
        pdf: Option<PathBuf>,

        /// Exit with code 1 when any domain reaches this band [default: from config, high]
        #[arg(long, value_name = "BAND")]
        fail_on: Option<BandArg>,

        /// Remote /score endpoint to try before local scoring (repeatable)
        #[arg(long = "remote", value_name = "URL")]
        remote: Vec<String>,
    },

    /// Derive a scan request from a captured page
    Detect {
        /// Page capture JSON file; `-` reads stdin
        #[arg(default_value = "-")]
        capture: PathBuf,

        /// Blocklist file to match request URLs against
        #[arg(long, value_name = "FILE")]
        blocklist: Option<PathBuf>,

        /// Print the scored response instead of the scan request
        #[arg(long)]
        score: bool,
    },

    /// Rebuild the tracker blocklist from the configured sources
    Blocklist {
        /// Print a preview instead of writing the file
        #[arg(long)]
        dry_run: bool,

        /// Build a frequency-ranked list with pixel and script patterns
        #[arg(long)]
        hybrid: bool,

        /// Output path [default: from config, blocklist.txt]
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Print the liveness status
    Health,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Pdf,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum BandArg {
    Low,
    Medium,
    High,
}

impl From<BandArg> for Band {
    fn from(arg: BandArg) -> Self {
        match arg {
            BandArg::Low => Band::Low,
            BandArg::Medium => Band::Medium,
            BandArg::High => Band::High,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_defaults() {
        let cli = Cli::try_parse_from(["data-guardian", "score"]).unwrap();
        match cli.command {
            Command::Score { input, report, pdf, fail_on, remote } => {
                assert_eq!(input, PathBuf::from("-"));
                assert!(matches!(report, ReportFormat::Terminal));
                assert!(pdf.is_none());
                assert!(fail_on.is_none());
                assert!(remote.is_empty());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_pdf_without_value() {
        let cli = Cli::try_parse_from(["data-guardian", "score", "scan.json", "--pdf"]).unwrap();
        match cli.command {
            Command::Score { pdf, .. } => assert_eq!(pdf, Some(PathBuf::from("privacy-report.pdf"))),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "data-guardian", "score", "-q", "--fail-on", "medium", "--remote", "http://a/score",
            "--remote", "http://b/score",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Command::Score { fail_on, remote, .. } => {
                assert_eq!(fail_on.map(Band::from), Some(Band::Medium));
                assert_eq!(remote, vec!["http://a/score", "http://b/score"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_band_rejected() {
        assert!(Cli::try_parse_from(["data-guardian", "score", "--fail-on", "severe"]).is_err());
    }
}
