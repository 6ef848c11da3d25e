//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::cli::args::{CompsimArgs, OutputFormat};
use crate::error::Result;

/// One retained link, rendered with token texts.
#[derive(Debug, Serialize, Deserialize)]
pub struct LinkReport {
    pub query: Vec<String>,
    pub document: Vec<String>,
    pub score: f32,
    pub explanation: String,
}

/// One late-interaction alignment, rendered with token texts.
#[derive(Debug, Serialize, Deserialize)]
pub struct AlignmentReport {
    pub query_index: usize,
    pub query_token: String,
    pub document_index: usize,
    pub document_token: String,
    pub similarity: f32,
}

/// Result structure for the score command.
#[derive(Debug, Serialize, Deserialize)]
pub struct ScoreReport {
    pub method: String,
    pub score: f32,
    pub normalized_score: Option<f32>,
    pub links: Vec<LinkReport>,
    pub alignments: Vec<AlignmentReport>,
}

/// One entry of the rank command.
#[derive(Debug, Serialize, Deserialize)]
pub struct RankEntry {
    pub rank: usize,
    pub position: usize,
    pub document_id: Uuid,
    pub score: f32,
    pub preview: String,
}

/// Result structure for the rank command.
#[derive(Debug, Serialize, Deserialize)]
pub struct RankReport {
    pub method: String,
    pub total_documents: usize,
    pub results: Vec<RankEntry>,
}

/// Human-readable rendering of a report.
pub trait HumanOutput {
    fn print_human(&self);
}

impl HumanOutput for ScoreReport {
    fn print_human(&self) {
        println!("Similarity ({}): {:.3}", self.method, self.score);
        if let Some(normalized) = self.normalized_score {
            println!("Normalized by self-similarity: {normalized:.3}");
        }

        if !self.links.is_empty() {
            println!();
            println!("Links:");
            println!("──────");
            for (i, link) in self.links.iter().enumerate() {
                println!(
                    "{}. [{}] -> [{}] ({:.3})",
                    i + 1,
                    link.query.join(" + "),
                    link.document.join(" + "),
                    link.score
                );
                println!("   {}", link.explanation);
            }
        }

        if !self.alignments.is_empty() {
            println!();
            println!("Alignments:");
            println!("───────────");
            for alignment in &self.alignments {
                println!(
                    "{}:{} -> {}:{} ({:.3})",
                    alignment.query_index,
                    alignment.query_token,
                    alignment.document_index,
                    alignment.document_token,
                    alignment.similarity
                );
            }
        }
    }
}

impl HumanOutput for RankReport {
    fn print_human(&self) {
        println!("Ranking ({}) of {} documents:", self.method, self.total_documents);
        println!("═══════════════");
        for entry in &self.results {
            println!(
                "{:>3}. #{:<4} {:.3}  {}",
                entry.rank, entry.position, entry.score, entry.preview
            );
        }
    }
}

/// Output a result in the specified format.
pub fn output_result<T: Serialize + HumanOutput>(result: &T, args: &CompsimArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            result.print_human();
            Ok(())
        }
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &CompsimArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}
