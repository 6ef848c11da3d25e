//! Configuration for the element scorers.
//!
//! Every threshold and toggle is a named field with a documented default,
//! and every section tolerates missing keys, so a configuration file only
//! needs to mention what it changes.
//!
//! # Examples
//!
//! ```
//! use compsim::scoring::config::ScoringConfig;
//!
//! let config = ScoringConfig::default();
//! assert_eq!(config.token_vector.threshold, 0.0);
//! assert!(config.token_vector.allow_entities);
//! assert_eq!(config.syntactic_relation.root_threshold, 0.5);
//!
//! let custom = ScoringConfig::from_json_str(
//!     r#"{"syntactic_relation": {"threshold": 0.8}}"#,
//! ).unwrap();
//! assert_eq!(custom.syntactic_relation.threshold, 0.8);
//! assert_eq!(custom.syntactic_relation.root_threshold, 0.5);
//! assert_eq!(custom.elements().len(), 3);
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompsimError, Result};
use crate::scoring::element::ElementScorer;
use crate::scoring::entity_identity::EntityIdentityScorer;
use crate::scoring::hierarchical_entity::{ConceptHierarchy, HierarchicalEntityScorer};
use crate::scoring::syntactic_relation::SyntacticRelationScorer;
use crate::scoring::token_vector::TokenVectorScorer;

/// Token-vector matcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenVectorConfig {
    /// Links scoring at or below this are dropped.
    pub threshold: f32,
    /// Offer document entity spans (with a vector) as candidates.
    pub allow_entities: bool,
    /// Offer document noun chunks as candidates.
    pub allow_chunks: bool,
}

impl Default for TokenVectorConfig {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            allow_entities: true,
            allow_chunks: true,
        }
    }
}

impl TokenVectorConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_entities(mut self, allow: bool) -> Self {
        self.allow_entities = allow;
        self
    }

    pub fn with_chunks(mut self, allow: bool) -> Self {
        self.allow_chunks = allow;
        self
    }
}

/// Entity-identity matcher settings.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityIdentityConfig {
    /// Links scoring at or below this are dropped; 0 keeps exact matches only.
    pub threshold: f32,
}

impl EntityIdentityConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Syntactic-relation booster settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntacticRelationConfig {
    /// Only links scoring above this are considered for boosting.
    pub threshold: f32,
    /// Head-to-head similarity must exceed this.
    pub root_threshold: f32,
}

impl Default for SyntacticRelationConfig {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            root_threshold: 0.5,
        }
    }
}

impl SyntacticRelationConfig {
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_root_threshold(mut self, root_threshold: f32) -> Self {
        self.root_threshold = root_threshold;
        self
    }
}

/// Hierarchical entity matcher settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HierarchicalEntityConfig {
    pub hierarchy: ConceptHierarchy,
    /// Credit multiplier per hierarchy edge, in `(0, 1]`.
    pub decay: f32,
    pub threshold: f32,
}

impl Default for HierarchicalEntityConfig {
    fn default() -> Self {
        Self {
            hierarchy: ConceptHierarchy::default(),
            decay: 0.5,
            threshold: 0.0,
        }
    }
}

impl HierarchicalEntityConfig {
    pub fn new(hierarchy: ConceptHierarchy) -> Self {
        Self {
            hierarchy,
            ..Self::default()
        }
    }

    pub fn with_decay(mut self, decay: f32) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Settings for the default composite scoring pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub token_vector: TokenVectorConfig,
    pub entity_identity: EntityIdentityConfig,
    /// Enables the hierarchical entity matcher when present.
    pub hierarchical_entity: Option<HierarchicalEntityConfig>,
    pub syntactic_relation: SyntacticRelationConfig,
}

impl ScoringConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: ScoringConfig = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Check that thresholds are finite and the decay is in range.
    pub fn validate(&self) -> Result<()> {
        let thresholds = [
            ("token_vector.threshold", self.token_vector.threshold),
            ("entity_identity.threshold", self.entity_identity.threshold),
            ("syntactic_relation.threshold", self.syntactic_relation.threshold),
            (
                "syntactic_relation.root_threshold",
                self.syntactic_relation.root_threshold,
            ),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() {
                return Err(CompsimError::config(format!("{name} must be finite")));
            }
        }
        if let Some(hierarchical) = &self.hierarchical_entity {
            if !hierarchical.threshold.is_finite() {
                return Err(CompsimError::config(
                    "hierarchical_entity.threshold must be finite",
                ));
            }
            if !(hierarchical.decay > 0.0 && hierarchical.decay <= 1.0) {
                return Err(CompsimError::config(format!(
                    "hierarchical_entity.decay must be in (0, 1], got {}",
                    hierarchical.decay
                )));
            }
        }
        Ok(())
    }

    /// The ordered element list: token vectors, entity identity, the
    /// optional hierarchical matcher, then the syntactic booster.
    pub fn elements(&self) -> Vec<Box<dyn ElementScorer>> {
        let mut elements: Vec<Box<dyn ElementScorer>> = vec![
            Box::new(TokenVectorScorer::new(self.token_vector.clone())),
            Box::new(EntityIdentityScorer::new(self.entity_identity.clone())),
        ];
        if let Some(hierarchical) = &self.hierarchical_entity {
            elements.push(Box::new(HierarchicalEntityScorer::new(hierarchical.clone())));
        }
        elements.push(Box::new(SyntacticRelationScorer::new(
            self.syntactic_relation.clone(),
        )));
        elements
    }
}
