//! Subject-verb attribution and speaker phrase resolution.
//!
//! # Heuristics
//! 1. **Latest subject wins**: among SBV arcs pointing at the same
//!    verb, the arc with the highest token index is selected — an
//!    explicit max-index reduction, replicated by index order.
//! 2. **Nearest left entity**: when the subject token is not itself an
//!    entity span start, the closest span start strictly left of both
//!    the verb and the subject stands in for the speaker. Parses often
//!    attach a pronoun or placeholder as the subject; the nearest
//!    preceding mention is the best available proxy for the referent.

use std::collections::BTreeMap;

use crate::extractor::annotation::SentenceAnnotation;
use crate::extractor::entity::is_entity_tag;
use crate::extractor::lexicon::SpeechLexicon;

// =============================================================================
// Types
// =============================================================================

/// The dependency relation connecting a subject to its verb.
pub const SUBJECT_RELATION: &str = "SBV";

/// POS tags accepted for a subject token when NER says nothing:
/// abbreviation, common noun, person, pronoun, organization, place,
/// other proper noun.
const NOMINAL_POSTAGS: [&str; 7] = ["j", "n", "nh", "r", "ni", "ns", "nz"];

/// A resolved speech-verb occurrence within one sentence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerbAttribution {
    /// Verb token index as found in the token sequence.
    pub verb_index: usize,
    /// Index anchoring boundary extraction; moves one right of
    /// `verb_index` when an aspect particle was merged into the verb.
    pub boundary_index: usize,
    /// Verb string, including a merged aspect particle when present.
    pub verb: String,
    /// Subject token index selected by the max-index reduction.
    pub subject_index: usize,
}

/// A resolved speaker phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerPhrase {
    pub text: String,
    /// Start of the span the phrase was read from; feeds the
    /// sentence-final-verb boundary case.
    pub span_start: usize,
}

// =============================================================================
// Subject-verb resolution
// =============================================================================

/// Token indices that count as speech-verb occurrences: lexicon entry,
/// verbal POS tag, and dependency root.
pub fn speech_verb_indices(ann: &SentenceAnnotation, lexicon: &SpeechLexicon) -> Vec<usize> {
    (0..ann.tokens.len())
        .filter(|&v| {
            lexicon.contains(&ann.tokens[v])
                && ann.postags[v].contains('v')
                && ann.arcs[v].head == 0
        })
        .collect()
}

fn is_nominal(ann: &SentenceAnnotation, index: usize) -> bool {
    is_entity_tag(&ann.nertags[index]) || NOMINAL_POSTAGS.contains(&ann.postags[index].as_str())
}

/// Map each speech-verb occurrence to its authoritative subject index.
///
/// One left-to-right pass over the arcs; a later candidate for the same
/// verb overwrites an earlier one, so the highest arc index wins.
pub fn resolve_attributions(
    ann: &SentenceAnnotation,
    lexicon: &SpeechLexicon,
) -> BTreeMap<usize, usize> {
    let mut selected = BTreeMap::new();
    for &v in &speech_verb_indices(ann, lexicon) {
        for (j, arc) in ann.arcs.iter().enumerate() {
            if arc.relation == SUBJECT_RELATION && arc.head == v + 1 && is_nominal(ann, j) {
                selected.insert(v, j);
            }
        }
    }
    selected
}

/// Resolve the single attribution a sentence contributes, or `None`.
///
/// When several verbs resolve, the highest verb index fills the
/// per-sentence slot. An aspect particle (`u` POS tag) right after the
/// verb is folded into the verb string, e.g. 说过.
pub fn attribute_sentence(
    ann: &SentenceAnnotation,
    lexicon: &SpeechLexicon,
) -> Option<VerbAttribution> {
    let selected = resolve_attributions(ann, lexicon);
    let (&verb_index, &subject_index) = selected.iter().next_back()?;

    let mut verb = ann.tokens[verb_index].clone();
    let mut boundary_index = verb_index;
    if let (Some(token), Some(postag)) =
        (ann.tokens.get(verb_index + 1), ann.postags.get(verb_index + 1))
    {
        if postag.contains('u') {
            verb.push_str(token);
            boundary_index = verb_index + 1;
        }
    }

    Some(VerbAttribution {
        verb_index,
        boundary_index,
        verb,
        subject_index,
    })
}

// =============================================================================
// Speaker phrase resolution
// =============================================================================

/// Expand a bare subject token into the full speaker phrase.
pub fn resolve_speaker(
    ann: &SentenceAnnotation,
    spans: &BTreeMap<usize, usize>,
    verb_index: usize,
    subject_index: usize,
) -> SpeakerPhrase {
    if let Some(&end) = spans.get(&subject_index) {
        return SpeakerPhrase {
            text: join_tokens(ann, subject_index, end),
            span_start: subject_index,
        };
    }

    // Nearest span start strictly left of both the verb and the
    // subject minimizes the distance `subject_index - start`.
    let limit = verb_index.min(subject_index);
    if let Some((&start, &end)) = spans.range(..limit).next_back() {
        return SpeakerPhrase {
            text: join_tokens(ann, start, end),
            span_start: start,
        };
    }

    SpeakerPhrase {
        text: ann.tokens[subject_index].clone(),
        span_start: subject_index,
    }
}

fn join_tokens(ann: &SentenceAnnotation, start: usize, end: usize) -> String {
    let end = end.min(ann.tokens.len().saturating_sub(1));
    ann.tokens[start..=end].concat()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::annotation::DependencyArc;
    use crate::extractor::entity::reconstruct_entity_spans;

    /// (token, postag, nertag, head, relation) per position.
    fn annotation(rows: &[(&str, &str, &str, usize, &str)]) -> SentenceAnnotation {
        SentenceAnnotation {
            sentence: rows.iter().map(|r| r.0).collect(),
            tokens: rows.iter().map(|r| r.0.to_string()).collect(),
            postags: rows.iter().map(|r| r.1.to_string()).collect(),
            nertags: rows.iter().map(|r| r.2.to_string()).collect(),
            arcs: rows.iter().map(|r| DependencyArc::new(r.3, r.4)).collect(),
        }
    }

    fn lexicon() -> SpeechLexicon {
        SpeechLexicon::from_words(["说", "表示"])
    }

    #[test]
    fn test_basic_attribution() {
        let ann = annotation(&[
            ("他", "r", "O", 2, "SBV"),
            ("说", "v", "O", 0, "HED"),
            ("好", "a", "O", 2, "VOB"),
        ]);
        let attribution = attribute_sentence(&ann, &lexicon()).unwrap();
        assert_eq!(attribution.verb_index, 1);
        assert_eq!(attribution.subject_index, 0);
        assert_eq!(attribution.verb, "说");
    }

    #[test]
    fn test_latest_subject_wins() {
        // Two SBV arcs point at the same verb; the higher index wins.
        let ann = annotation(&[
            ("甲", "nh", "O", 4, "SBV"),
            ("和", "c", "O", 4, "ADV"),
            ("乙", "nh", "O", 4, "SBV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        let selected = resolve_attributions(&ann, &lexicon());
        assert_eq!(selected[&3], 2);
    }

    #[test]
    fn test_non_lexicon_verb_discarded() {
        let ann = annotation(&[
            ("他", "r", "O", 2, "SBV"),
            ("跑", "v", "O", 0, "HED"),
        ]);
        assert!(attribute_sentence(&ann, &lexicon()).is_none());
    }

    #[test]
    fn test_non_root_verb_discarded() {
        let ann = annotation(&[
            ("他", "r", "O", 2, "SBV"),
            ("说", "v", "O", 3, "ATT"),
            ("话", "n", "O", 0, "HED"),
        ]);
        assert!(attribute_sentence(&ann, &lexicon()).is_none());
    }

    #[test]
    fn test_non_verbal_postag_discarded() {
        // Same surface string, nominal POS tag.
        let ann = annotation(&[
            ("他", "r", "O", 2, "SBV"),
            ("说", "n", "O", 0, "HED"),
        ]);
        assert!(attribute_sentence(&ann, &lexicon()).is_none());
    }

    #[test]
    fn test_non_nominal_subject_discarded() {
        let ann = annotation(&[
            ("快", "d", "O", 2, "SBV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        assert!(attribute_sentence(&ann, &lexicon()).is_none());
    }

    #[test]
    fn test_no_subject_arc_yields_nothing() {
        // Silent non-event, not an error.
        let ann = annotation(&[
            ("据", "p", "O", 2, "ADV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        assert!(attribute_sentence(&ann, &lexicon()).is_none());
    }

    #[test]
    fn test_aspect_particle_merged_into_verb() {
        let ann = annotation(&[
            ("习近平", "nh", "S-Nh", 2, "SBV"),
            ("说", "v", "O", 0, "HED"),
            ("过", "u", "O", 2, "RAD"),
            ("这", "r", "O", 2, "VOB"),
        ]);
        let attribution = attribute_sentence(&ann, &lexicon()).unwrap();
        assert_eq!(attribution.verb, "说过");
        assert_eq!(attribution.verb_index, 1);
        assert_eq!(attribution.boundary_index, 2);
    }

    #[test]
    fn test_highest_verb_index_fills_sentence_slot() {
        let ann = annotation(&[
            ("他", "r", "O", 2, "SBV"),
            ("说", "v", "O", 0, "HED"),
            ("她", "r", "O", 4, "SBV"),
            ("表示", "v", "O", 0, "HED"),
        ]);
        let attribution = attribute_sentence(&ann, &lexicon()).unwrap();
        assert_eq!(attribution.verb_index, 3);
        assert_eq!(attribution.subject_index, 2);
    }

    #[test]
    fn test_speaker_from_span_start() {
        let ann = annotation(&[
            ("香港", "ns", "B-Ni", 3, "ATT"),
            ("升旗队", "n", "E-Ni", 3, "SBV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        let spans = reconstruct_entity_spans(&ann.nertags);
        // Subject index 1 is inside the span but not its start; the
        // nearest span start to the left (0) expands the phrase.
        let speaker = resolve_speaker(&ann, &spans, 2, 1);
        assert_eq!(speaker.text, "香港升旗队");
        assert_eq!(speaker.span_start, 0);
    }

    #[test]
    fn test_speaker_exact_span_start() {
        let ann = annotation(&[
            ("周世耀", "nh", "S-Nh", 2, "SBV"),
            ("在", "p", "O", 3, "ADV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        let spans = reconstruct_entity_spans(&ann.nertags);
        let speaker = resolve_speaker(&ann, &spans, 2, 0);
        assert_eq!(speaker.text, "周世耀");
        assert_eq!(speaker.span_start, 0);
    }

    #[test]
    fn test_speaker_nearest_left_entity_fallback() {
        let ann = annotation(&[
            ("郭紫晴", "nh", "S-Nh", 0, "IS"),
            ("昨天", "nt", "O", 4, "ADV"),
            ("赵颖贤", "nh", "S-Nh", 0, "IS"),
            ("她", "r", "O", 5, "SBV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        let spans = reconstruct_entity_spans(&ann.nertags);
        // Subject is a pronoun; span starts 0 and 2 both qualify, 2 is
        // nearer to the subject.
        let speaker = resolve_speaker(&ann, &spans, 4, 3);
        assert_eq!(speaker.text, "赵颖贤");
        assert_eq!(speaker.span_start, 2);
    }

    #[test]
    fn test_speaker_degrades_to_bare_token() {
        let ann = annotation(&[
            ("他", "r", "O", 2, "SBV"),
            ("说", "v", "O", 0, "HED"),
        ]);
        let spans = reconstruct_entity_spans(&ann.nertags);
        let speaker = resolve_speaker(&ann, &spans, 1, 0);
        assert_eq!(speaker.text, "他");
        assert_eq!(speaker.span_start, 0);
    }
}
