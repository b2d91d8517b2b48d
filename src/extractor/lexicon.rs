//! SpeechLexicon: the closed set of speech-denoting verbs.
//!
//! Loaded once (one verb per line, UTF-8) and read-only for the life of
//! a pipeline run. An Aho-Corasick automaton over the verb set gives
//! O(n) sentence prefiltering, so only sentences that mention a speech
//! verb at all are sent to the heavyweight annotator.

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

// =============================================================================
// SpeechLexicon
// =============================================================================

#[derive(Debug)]
pub struct SpeechLexicon {
    verbs: HashSet<String>,
    automaton: Option<AhoCorasick>,
}

impl Default for SpeechLexicon {
    fn default() -> Self {
        Self::from_words(Vec::<String>::new())
    }
}

impl SpeechLexicon {
    /// Build from an iterator of verb strings. Entries are trimmed and
    /// blanks are dropped; order is irrelevant.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let verbs: HashSet<String> = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        let automaton = if verbs.is_empty() {
            None
        } else {
            AhoCorasickBuilder::new()
                .match_kind(MatchKind::LeftmostLongest)
                .build(verbs.iter())
                .ok()
        };
        SpeechLexicon { verbs, automaton }
    }

    /// Load from a one-verb-per-line UTF-8 file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = fs::read_to_string(path.as_ref()).map_err(|e| {
            format!("failed to read lexicon {}: {}", path.as_ref().display(), e)
        })?;
        Ok(Self::from_words(contents.lines()))
    }

    pub fn len(&self) -> usize {
        self.verbs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verbs.is_empty()
    }

    /// Exact membership test for a token.
    pub fn contains(&self, word: &str) -> bool {
        self.verbs.contains(word)
    }

    /// Does the raw sentence mention any lexicon verb as a substring?
    pub fn mentions(&self, sentence: &str) -> bool {
        match &self.automaton {
            Some(automaton) => automaton.is_match(sentence),
            None => false,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_words_trims_and_drops_blanks() {
        let lexicon = SpeechLexicon::from_words(["说", " 表示 ", "", "  "]);
        assert_eq!(lexicon.len(), 2);
        assert!(lexicon.contains("说"));
        assert!(lexicon.contains("表示"));
        assert!(!lexicon.contains(""));
    }

    #[test]
    fn test_mentions_substring() {
        let lexicon = SpeechLexicon::from_words(["说", "指出"]);
        assert!(lexicon.mentions("他说这很重要。"));
        assert!(lexicon.mentions("报告指出了问题。"));
        assert!(!lexicon.mentions("大家都同意。"));
    }

    #[test]
    fn test_empty_lexicon_mentions_nothing() {
        let lexicon = SpeechLexicon::default();
        assert!(lexicon.is_empty());
        assert!(!lexicon.mentions("他说这很重要。"));
        assert!(!lexicon.contains("说"));
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join("quotecore_lexicon_test.txt");
        fs::write(&path, "说\n表示\n\n回应\n").unwrap();
        let lexicon = SpeechLexicon::load(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(lexicon.len(), 3);
        assert!(lexicon.contains("回应"));
    }

    #[test]
    fn test_load_missing_file_errors() {
        let err = SpeechLexicon::load("/nonexistent/lexicon.txt").unwrap_err();
        assert!(err.contains("failed to read lexicon"));
    }
}
