//! Command implementations for the compsim CLI.

use std::path::Path;
use std::time::Instant;

use log::info;

use crate::cli::args::*;
use crate::cli::output::*;
use crate::document::document::Document;
use crate::document::parser::DocumentParser;
use crate::error::{CompsimError, Result};
use crate::ranking::rank_documents;
use crate::scoring::aggregator::CompositeScorer;
use crate::scoring::config::ScoringConfig;
use crate::scoring::late_interaction::LateInteractionScorer;
use crate::scoring::link::Unit;
use crate::scoring::method::SimilarityMethod;

const PREVIEW_CHARS: usize = 60;

/// Execute a CLI command.
pub fn execute_command(args: CompsimArgs) -> Result<()> {
    match &args.command {
        Command::Score(score_args) => score_pair(score_args, &args),
        Command::Rank(rank_args) => rank(rank_args, &args),
    }
}

fn load_config(path: Option<&Path>) -> Result<ScoringConfig> {
    match path {
        Some(path) => {
            info!("Loading scoring configuration from {}", path.display());
            ScoringConfig::from_file(path)
        }
        None => Ok(ScoringConfig::default()),
    }
}

fn unit_texts(units: &[Unit], doc: &Document) -> Vec<String> {
    units.iter().map(|u| u.text(doc)).collect()
}

/// Build the score report for one query/document pair.
pub fn build_score_report(
    query: &Document,
    document: &Document,
    method: SimilarityMethod,
    composite: &CompositeScorer,
    normalize: bool,
) -> Result<ScoreReport> {
    let mut report = ScoreReport {
        method: method.name().to_string(),
        score: 0.0,
        normalized_score: None,
        links: Vec::new(),
        alignments: Vec::new(),
    };

    match method {
        SimilarityMethod::Complex => {
            let result = composite.score(query, document)?;
            report.score = result.score;
            report.links = result
                .links
                .iter()
                .map(|link| LinkReport {
                    query: unit_texts(&link.query, query),
                    document: unit_texts(&link.document, document),
                    score: link.score,
                    explanation: link.explanation.clone(),
                })
                .collect();
        }
        SimilarityMethod::LateInteraction | SimilarityMethod::InformationWeighted => {
            let scorer = LateInteractionScorer {
                filter_low_information: method == SimilarityMethod::InformationWeighted,
            };
            let result = scorer.score(query, document)?;
            report.score = result.score;
            report.alignments = result
                .alignments
                .iter()
                .map(|a| AlignmentReport {
                    query_index: a.query_index,
                    query_token: Unit::Token(a.query_index).text(query),
                    document_index: a.document_index,
                    document_token: Unit::Token(a.document_index).text(document),
                    similarity: a.similarity,
                })
                .collect();
        }
    }

    if normalize {
        let self_score = method.score(query, query, composite)?;
        report.normalized_score = Some(if self_score == 0.0 {
            0.0
        } else {
            report.score / self_score
        });
    }

    Ok(report)
}

/// Score a single document against a query.
fn score_pair(args: &ScoreArgs, cli_args: &CompsimArgs) -> Result<()> {
    let parser = DocumentParser::new();
    let query = parser.parse_file(&args.query)?;
    let document = parser.parse_file(&args.document)?;
    let config = load_config(args.config.as_deref())?;
    let composite = CompositeScorer::from_config(&config);

    let start = Instant::now();
    let report = build_score_report(&query, &document, args.method, &composite, args.normalize)?;
    info!("Scored in {:?}", start.elapsed());

    output_result(&report, cli_args)
}

/// Number of ranked results to print.
fn result_limit(top_k: Option<usize>, total: usize) -> Result<usize> {
    match top_k {
        Some(0) => Err(CompsimError::invalid_argument("--top-k must be at least 1")),
        Some(k) => Ok(k.min(total)),
        None => Ok(total),
    }
}

/// Rank a batch of documents against a query.
fn rank(args: &RankArgs, cli_args: &CompsimArgs) -> Result<()> {
    result_limit(args.top_k, 0)?;
    let parser = DocumentParser::new();
    let query = parser.parse_file(&args.query)?;
    let documents = parser.parse_jsonl_file(&args.documents)?;
    let config = load_config(args.config.as_deref())?;
    let composite = CompositeScorer::from_config(&config);

    let start = Instant::now();
    let ranked = rank_documents(&query, &documents, args.method, &composite)?;
    info!("Ranked {} documents in {:?}", documents.len(), start.elapsed());

    let limit = result_limit(args.top_k, ranked.len())?;
    let report = RankReport {
        method: args.method.name().to_string(),
        total_documents: documents.len(),
        results: ranked
            .into_iter()
            .take(limit)
            .enumerate()
            .map(|(i, r)| RankEntry {
                rank: i + 1,
                position: r.position,
                document_id: r.document_id,
                score: r.score,
                preview: documents[r.position].text_preview(PREVIEW_CHARS),
            })
            .collect(),
    };

    output_result(&report, cli_args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::token::Token;

    fn doc(vectors: &[[f32; 2]]) -> Document {
        Document::builder()
            .tokens(
                vectors
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Token::new(format!("w{i}")).with_vector(v.to_vec())),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_complex_report_lists_links() {
        let query = doc(&[[1.0, 0.0]]);
        let document = doc(&[[0.0, 1.0], [1.0, 0.0]]);
        let report = build_score_report(
            &query,
            &document,
            SimilarityMethod::Complex,
            &CompositeScorer::default(),
            true,
        )
        .unwrap();

        assert_eq!(report.links.len(), 1);
        assert_eq!(report.links[0].query, vec!["w0"]);
        assert_eq!(report.links[0].document, vec!["w1"]);
        assert_eq!(report.links[0].explanation, "same token");
        assert!(report.alignments.is_empty());
        assert_eq!(report.normalized_score, Some(1.0));
    }

    #[test]
    fn test_late_interaction_report_lists_alignments() {
        let query = doc(&[[1.0, 0.0], [0.0, 1.0]]);
        let document = doc(&[[0.0, 1.0]]);
        let report = build_score_report(
            &query,
            &document,
            SimilarityMethod::LateInteraction,
            &CompositeScorer::default(),
            false,
        )
        .unwrap();

        assert!(report.links.is_empty());
        assert_eq!(report.alignments.len(), 2);
        assert_eq!(report.alignments[1].query_token, "w1");
        assert_eq!(report.alignments[1].document_token, "w0");
        assert!((report.score - 0.5).abs() < 1e-6);
        assert!(report.normalized_score.is_none());
    }

    #[test]
    fn test_result_limit() {
        assert_eq!(result_limit(None, 7).unwrap(), 7);
        assert_eq!(result_limit(Some(3), 7).unwrap(), 3);
        assert_eq!(result_limit(Some(10), 7).unwrap(), 7);

        let err = result_limit(Some(0), 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Error: Invalid argument: --top-k must be at least 1"
        );
    }
}
