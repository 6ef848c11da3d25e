//! Command line argument parsing for the compsim CLI using clap.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::scoring::method::SimilarityMethod;

/// compsim - explainable similarity between annotated documents
#[derive(Parser, Debug, Clone)]
#[command(name = "compsim")]
#[command(about = "Explainable compositional similarity between annotated documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(long_about = None)]
pub struct CompsimArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", value_enum, default_value = "human")]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl CompsimArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Score one document against a query and explain the result
    Score(ScoreArgs),

    /// Rank a JSON Lines file of documents against a query
    Rank(RankArgs),
}

/// Arguments for scoring a single pair
#[derive(Parser, Debug, Clone)]
pub struct ScoreArgs {
    /// Annotated query document (JSON)
    #[arg(value_name = "QUERY_FILE")]
    pub query: PathBuf,

    /// Annotated document to compare against (JSON)
    #[arg(value_name = "DOCUMENT_FILE")]
    pub document: PathBuf,

    /// Similarity method
    #[arg(short, long, value_enum, default_value_t = SimilarityMethod::Complex)]
    pub method: SimilarityMethod,

    /// Scoring configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Divide by the query's self-similarity
    #[arg(long)]
    pub normalize: bool,
}

/// Arguments for ranking many documents
#[derive(Parser, Debug, Clone)]
pub struct RankArgs {
    /// Annotated query document (JSON)
    #[arg(value_name = "QUERY_FILE")]
    pub query: PathBuf,

    /// Annotated documents, one JSON object per line
    #[arg(value_name = "DOCUMENTS_FILE")]
    pub documents: PathBuf,

    /// Similarity method
    #[arg(short, long, value_enum, default_value_t = SimilarityMethod::Complex)]
    pub method: SimilarityMethod,

    /// Scoring configuration file (JSON)
    #[arg(short, long, value_name = "CONFIG_FILE")]
    pub config: Option<PathBuf>,

    /// Only report the best N documents
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_defaults() {
        let args = CompsimArgs::parse_from(["compsim", "score", "q.json", "d.json"]);
        assert_eq!(args.verbosity(), 1);
        assert_eq!(args.output_format, OutputFormat::Human);
        match args.command {
            Command::Score(score) => {
                assert_eq!(score.method, SimilarityMethod::Complex);
                assert!(!score.normalize);
                assert!(score.config.is_none());
            }
            _ => panic!("expected score command"),
        }
    }

    #[test]
    fn test_parse_rank_options() {
        let args = CompsimArgs::parse_from([
            "compsim",
            "-q",
            "-f",
            "json",
            "rank",
            "q.json",
            "docs.jsonl",
            "--method",
            "information-weighted",
            "-k",
            "5",
        ]);
        assert_eq!(args.verbosity(), 0);
        assert_eq!(args.output_format, OutputFormat::Json);
        match args.command {
            Command::Rank(rank) => {
                assert_eq!(rank.method, SimilarityMethod::InformationWeighted);
                assert_eq!(rank.top_k, Some(5));
            }
            _ => panic!("expected rank command"),
        }
    }
}
