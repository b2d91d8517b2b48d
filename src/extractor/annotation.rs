//! Sentence annotations from the external linguistic-analysis service.
//!
//! Segmentation, POS tagging, NER tagging and dependency parsing are a
//! heavyweight model stack owned by the caller. The pipeline consumes
//! per-sentence output through the `Annotator` trait and never loads or
//! releases the models itself: one long-lived instance per worker,
//! injected into every `process()` call.

use serde::{Deserialize, Serialize};

// =============================================================================
// Types
// =============================================================================

/// One dependency arc. `head` is 1-based; 0 marks the sentence root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyArc {
    pub head: usize,
    pub relation: String,
}

impl DependencyArc {
    pub fn new(head: usize, relation: &str) -> Self {
        DependencyArc {
            head,
            relation: relation.to_string(),
        }
    }
}

/// Index-aligned linguistic annotations for a single sentence.
///
/// Invariant: `tokens`, `postags`, `nertags` and `arcs` all have the
/// same length. `validate()` enforces this at the collaborator seam.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceAnnotation {
    /// The raw sentence string the annotations were produced from.
    pub sentence: String,
    pub tokens: Vec<String>,
    pub postags: Vec<String>,
    pub nertags: Vec<String>,
    pub arcs: Vec<DependencyArc>,
}

impl SentenceAnnotation {
    /// Check the alignment contract. A mismatch is a contract violation
    /// by the annotator: the sentence is dropped, the document is not.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.tokens.len();
        if self.postags.len() != n || self.nertags.len() != n || self.arcs.len() != n {
            return Err(format!(
                "misaligned annotation: {} tokens, {} postags, {} nertags, {} arcs",
                n,
                self.postags.len(),
                self.nertags.len(),
                self.arcs.len()
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Annotator seam
// =============================================================================

/// External linguistic-analysis collaborator, one call per sentence.
pub trait Annotator {
    fn analyze(&self, sentence: &str) -> Result<SentenceAnnotation, String>;
}

// =============================================================================
// Tests
// =============================================================================
