use std::fs;

use tempfile::TempDir;

use compsim::document::parser::DocumentParser;
use compsim::error::{CompsimError, Result};
use compsim::prelude::*;

const QUERY: &str = r#"{
  "tokens": [
    {"text": "I", "vector": [0.1, 0.1, 0.9, 0.0], "dep": "nsubj", "head": 1, "information_content": 0.0},
    {"text": "have", "vector": [0.2, 0.0, 0.8, 0.1], "dep": "ROOT", "head": 1, "information_content": 0.0},
    {"text": "a", "vector": [0.0, 0.1, 0.9, 0.1], "dep": "det", "head": 3, "information_content": 0.0},
    {"text": "cat", "vector": [0.9, 0.3, 0.0, 0.1], "entity_id": "0", "dep": "dobj", "head": 1, "information_content": 4.1}
  ],
  "entities": [{"start": 3, "end": 4}],
  "noun_chunks": [{"start": 2, "end": 4}]
}"#;

const DOCUMENTS: &str = concat!(
    r#"{"tokens": [{"text": "dogs", "vector": [0.1, 0.9, 0.0, 0.2], "entity_id": "1", "information_content": 3.0}], "entities": [{"start": 0, "end": 1}]}"#,
    "\n",
    r#"{"tokens": [{"text": "a", "vector": [0.0, 0.1, 0.9, 0.1], "information_content": 0.0}, {"text": "feline", "vector": [0.85, 0.35, 0.05, 0.1], "entity_id": "0", "information_content": 5.0}], "entities": [{"start": 1, "end": 2}]}"#,
    "\n",
    r#"{"tokens": [{"text": "xabalef", "entity_id": "2"}], "entities": [{"start": 0, "end": 1}]}"#,
    "\n",
);

fn write_inputs() -> Result<(TempDir, std::path::PathBuf, std::path::PathBuf)> {
    let dir = TempDir::new()?;
    let query_path = dir.path().join("query.json");
    let documents_path = dir.path().join("documents.jsonl");
    fs::write(&query_path, QUERY)?;
    fs::write(&documents_path, DOCUMENTS)?;
    Ok((dir, query_path, documents_path))
}

#[test]
fn ranks_documents_loaded_from_disk() -> Result<()> {
    let (_dir, query_path, documents_path) = write_inputs()?;
    let parser = DocumentParser::new();
    let query = parser.parse_file(&query_path)?;
    let documents = parser.parse_jsonl_file(&documents_path)?;
    assert_eq!(documents.len(), 3);
    assert_eq!(query.noun_chunks()[0].root, 3);

    let composite = CompositeScorer::default();
    for method in [
        SimilarityMethod::Complex,
        SimilarityMethod::LateInteraction,
        SimilarityMethod::InformationWeighted,
    ] {
        let ranked = rank_documents(&query, &documents, method, &composite)?;
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].position, 1, "{method:?}");
        assert_eq!(ranked[2].position, 2, "{method:?}");
        assert_eq!(ranked[2].score, 0.0);
    }
    Ok(())
}

#[test]
fn information_weighting_ignores_function_words() -> Result<()> {
    let (_dir, query_path, documents_path) = write_inputs()?;
    let parser = DocumentParser::new();
    let query = parser.parse_file(&query_path)?;
    let documents = parser.parse_jsonl_file(&documents_path)?;

    let plain = late_interaction_similarity(&query, &documents[1])?;
    let weighted = information_weighted_late_interaction(&query, &documents[1])?;

    assert_eq!(plain.alignments.len(), 4);
    assert_eq!(weighted.alignments.len(), 1);
    assert_eq!(weighted.alignments[0].query_index, 3);
    assert_eq!(weighted.alignments[0].document_index, 1);
    Ok(())
}

#[test]
fn malformed_documents_are_fatal() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("bad.json");
    fs::write(
        &path,
        r#"{"tokens": [{"text": "a", "vector": [1.0]}, {"text": "b", "vector": [1.0, 0.0]}]}"#,
    )?;

    let result = DocumentParser::new().parse_file(&path);
    assert!(matches!(
        result,
        Err(CompsimError::DimensionMismatch {
            expected: 1,
            actual: 2
        })
    ));

    let missing = DocumentParser::new().parse_file(dir.path().join("missing.json"));
    assert!(matches!(missing, Err(CompsimError::Io(_))));
    Ok(())
}
