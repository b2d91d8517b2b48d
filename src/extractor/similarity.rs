//! Sentence vectors for the cross-sentence continuation decision.
//!
//! Reported content often spills into the next sentence. The decider
//! compares term-weight vectors computed jointly over the whole
//! document's sentence set; anything strictly above the (deliberately
//! permissive) threshold pulls the next sentence into the content span.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Similarity strictly above this appends the next sentence.
pub const CONTINUATION_THRESHOLD: f32 = 0.05;

// =============================================================================
// Sparse vectors
// =============================================================================

/// Sparse term-weight vector; `(term id, weight)` sorted by term id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SparseVector(pub Vec<(usize, f32)>);

impl SparseVector {
    pub fn magnitude(&self) -> f32 {
        self.0.iter().map(|(_, w)| w * w).sum::<f32>().sqrt()
    }
}

/// Cosine similarity over two sparse vectors, clamped to [0, 1].
/// Zero-magnitude vectors compare as 0.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f32 {
    let mut dot = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.0.len() && j < b.0.len() {
        match a.0[i].0.cmp(&b.0[j].0) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                dot += a.0[i].1 * b.0[j].1;
                i += 1;
                j += 1;
            }
        }
    }

    let ma = a.magnitude();
    let mb = b.magnitude();
    if ma == 0.0 || mb == 0.0 {
        return 0.0;
    }
    (dot / (ma * mb)).clamp(0.0, 1.0)
}

// =============================================================================
// Vectorizer seam
// =============================================================================

/// Produces one vector per sentence, computed jointly over the whole
/// document so weights are comparable across pairs.
pub trait SentenceVectorizer {
    fn vectorize(&self, sentences: &[String]) -> Vec<SparseVector>;

    fn similarity(&self, a: &SparseVector, b: &SparseVector) -> f32 {
        cosine_similarity(a, b)
    }
}

// =============================================================================
// TfIdfVectorizer
// =============================================================================

/// Default vectorizer: TF-IDF over the document's sentences.
///
/// Sentences are cleaned down to word characters, segmented on unicode
/// word boundaries (CJK ideographs fall out as unigrams), and weighted
/// `tf * idf` with the BM25 IDF form.
#[derive(Debug, Clone, Copy, Default)]
pub struct TfIdfVectorizer;

impl TfIdfVectorizer {
    fn terms(sentence: &str) -> Vec<String> {
        let cleaned: String = sentence
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect();
        cleaned.unicode_words().map(str::to_string).collect()
    }

    /// IDF = ln(1 + (N - df + 0.5) / (df + 0.5)), never negative.
    fn idf(total_sentences: f32, doc_frequency: usize) -> f32 {
        if doc_frequency == 0 {
            return 0.0;
        }
        let df = doc_frequency as f32;
        let ratio = (total_sentences - df + 0.5) / (df + 0.5);
        (1.0 + ratio.max(0.0)).ln()
    }
}

impl SentenceVectorizer for TfIdfVectorizer {
    fn vectorize(&self, sentences: &[String]) -> Vec<SparseVector> {
        let term_lists: Vec<Vec<String>> =
            sentences.iter().map(|s| Self::terms(s)).collect();

        let mut vocab: HashMap<String, usize> = HashMap::new();
        let mut doc_frequency: Vec<usize> = Vec::new();
        for terms in &term_lists {
            let mut seen = HashSet::new();
            for term in terms {
                let next_id = vocab.len();
                let id = *vocab.entry(term.clone()).or_insert(next_id);
                if id == doc_frequency.len() {
                    doc_frequency.push(0);
                }
                if seen.insert(id) {
                    doc_frequency[id] += 1;
                }
            }
        }

        let total = sentences.len() as f32;
        term_lists
            .iter()
            .map(|terms| {
                let mut counts: HashMap<usize, f32> = HashMap::new();
                for term in terms {
                    *counts.entry(vocab[term]).or_insert(0.0) += 1.0;
                }
                let mut weights: Vec<(usize, f32)> = counts
                    .into_iter()
                    .map(|(id, tf)| (id, tf * Self::idf(total, doc_frequency[id])))
                    .collect();
                weights.sort_by_key(|(id, _)| *id);
                SparseVector(weights)
            })
            .collect()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_cosine_identical_direction() {
        let a = SparseVector(vec![(0, 1.0), (2, 2.0)]);
        let b = SparseVector(vec![(0, 2.0), (2, 4.0)]);
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_disjoint_terms() {
        let a = SparseVector(vec![(0, 1.0)]);
        let b = SparseVector(vec![(1, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_empty_vector() {
        let a = SparseVector::default();
        let b = SparseVector(vec![(0, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_cosine_symmetric() {
        let a = SparseVector(vec![(0, 1.0), (1, 3.0)]);
        let b = SparseVector(vec![(1, 2.0), (2, 1.0)]);
        assert_eq!(cosine_similarity(&a, &b), cosine_similarity(&b, &a));
    }

    #[test]
    fn test_vectorize_one_vector_per_sentence() {
        let vectors = TfIdfVectorizer.vectorize(&sentences(&["你好。", "再见。", ""]));
        assert_eq!(vectors.len(), 3);
        assert!(vectors[2].0.is_empty());
    }

    #[test]
    fn test_identical_sentences_fully_similar() {
        let vectors =
            TfIdfVectorizer.vectorize(&sentences(&["香港升旗礼很庄严。", "香港升旗礼很庄严。"]));
        let sim = cosine_similarity(&vectors[0], &vectors[1]);
        assert!((sim - 1.0).abs() < 1e-5, "got {}", sim);
        assert!(sim > CONTINUATION_THRESHOLD);
    }

    #[test]
    fn test_unrelated_sentences_dissimilar() {
        let vectors = TfIdfVectorizer.vectorize(&sentences(&["天气很好。", "股市下跌。"]));
        let sim = cosine_similarity(&vectors[0], &vectors[1]);
        assert!(sim <= CONTINUATION_THRESHOLD, "got {}", sim);
    }

    #[test]
    fn test_punctuation_ignored() {
        let vectors = TfIdfVectorizer.vectorize(&sentences(&["你好！！！", "你好。"]));
        let sim = cosine_similarity(&vectors[0], &vectors[1]);
        assert!((sim - 1.0).abs() < 1e-5, "got {}", sim);
    }

    #[test]
    fn test_similarity_in_unit_interval() {
        let vectors = TfIdfVectorizer.vectorize(&sentences(&[
            "升旗队护送国旗到操场。",
            "国旗伴随国歌升起。",
            "大家合唱一首歌。",
        ]));
        for a in &vectors {
            for b in &vectors {
                let sim = cosine_similarity(a, b);
                assert!((0.0..=1.0).contains(&sim));
            }
        }
    }
}
