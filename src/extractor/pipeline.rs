//! SpeechCortex: the per-document reported-speech pipeline.
//!
//! Single `process()` call per document:
//! 1. Split the text into sentences.
//! 2. Prefilter: only sentences mentioning a lexicon verb reach the
//!    heavyweight annotator (one synchronous call per sentence).
//! 3. Resolve subject-verb attributions and speaker phrases.
//! 4. Delimit content spans, with cross-sentence continuation.
//!
//! Sentences are processed strictly in order; all state is owned by one
//! invocation except the read-only lexicon and the injected
//! collaborators. A failing sentence is recorded as a non-fatal error
//! and never aborts the rest of the document.

use instant::Instant;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use wasm_bindgen::prelude::*;

use crate::extractor::annotation::{Annotator, SentenceAnnotation};
use crate::extractor::attribution::{attribute_sentence, resolve_speaker};
use crate::extractor::boundary::{BoundaryContext, BoundaryCortex};
use crate::extractor::entity::reconstruct_entity_spans;
use crate::extractor::lexicon::SpeechLexicon;
use crate::extractor::segment::split_sentences;
use crate::extractor::similarity::{SentenceVectorizer, TfIdfVectorizer};

// =============================================================================
// Types
// =============================================================================

/// Timing statistics for each pipeline phase
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractTimings {
    pub total_us: u64,
    pub split_us: u64,
    pub annotate_us: u64,
    pub resolve_us: u64,
}

/// Aggregate statistics
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractStats {
    pub timings: ExtractTimings,
    pub sentences_total: usize,
    /// Sentences that passed the lexicon prefilter.
    pub sentences_matched: usize,
    pub events_found: usize,
}

/// Error during one sentence's processing (non-fatal)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractError {
    pub sentence: usize,
    pub phase: String,
    pub message: String,
}

/// The output unit: who said what.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeechEvent {
    pub speaker: String,
    pub verb: String,
    pub content: String,
    /// Index of the originating sentence within the document.
    pub sentence_index: usize,
}

/// Full pipeline result
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ExtractResult {
    pub events: Vec<SpeechEvent>,
    pub stats: ExtractStats,
    pub errors: Vec<ExtractError>,
}

/// Caller-facing outcome: events, or the input text unchanged when
/// nothing was extracted (documented degenerate fallback, not an error).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtractOutcome {
    Events(Vec<SpeechEvent>),
    Passthrough(String),
}

// =============================================================================
// SpeechCortex
// =============================================================================

#[wasm_bindgen]
pub struct SpeechCortex {
    lexicon: SpeechLexicon,
    boundary: BoundaryCortex,
}

impl Default for SpeechCortex {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl SpeechCortex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            lexicon: SpeechLexicon::default(),
            boundary: BoundaryCortex::new(),
        }
    }

    /// Number of verbs in the hydrated lexicon
    #[wasm_bindgen(js_name = lexiconSize)]
    pub fn lexicon_size(&self) -> usize {
        self.lexicon.len()
    }

    /// Hydrate the speech-verb lexicon (JS binding)
    #[wasm_bindgen(js_name = hydrateLexicon)]
    pub fn js_hydrate_lexicon(&mut self, words: JsValue) -> Result<(), JsValue> {
        let words: Vec<String> = serde_wasm_bindgen::from_value(words)
            .map_err(|e| JsValue::from_str(&format!("Failed to parse lexicon: {}", e)))?;
        self.hydrate_lexicon(words);
        Ok(())
    }

    /// Extract over pre-annotated sentences (JS binding); the
    /// linguistic service lives on the caller's side of the boundary.
    ///
    /// `annotations` is an array of
    /// `{ sentence, tokens, postags, nertags, arcs: [{head, relation}] }`.
    #[wasm_bindgen(js_name = extractAnnotated)]
    pub fn js_extract_annotated(&self, annotations: JsValue) -> JsValue {
        let annotations: Vec<SentenceAnnotation> =
            match serde_wasm_bindgen::from_value(annotations) {
                Ok(a) => a,
                Err(e) => {
                    web_sys::console::error_1(
                        &format!("[SpeechCortex] Failed to parse annotations: {}", e).into(),
                    );
                    return JsValue::NULL;
                }
            };
        let result = self.extract_annotated(&annotations, &TfIdfVectorizer);
        serde_wasm_bindgen::to_value(&result).unwrap_or(JsValue::NULL)
    }
}

impl SpeechCortex {
    pub fn with_lexicon(lexicon: SpeechLexicon) -> Self {
        Self {
            lexicon,
            boundary: BoundaryCortex::new(),
        }
    }

    /// Replace the lexicon wholesale.
    pub fn hydrate_lexicon<I, S>(&mut self, words: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.lexicon = SpeechLexicon::from_words(words);
    }

    pub fn lexicon(&self) -> &SpeechLexicon {
        &self.lexicon
    }

    /// Run the full pipeline over one document.
    ///
    /// The annotator and vectorizer are externally owned, long-lived
    /// collaborators; the cortex never loads or releases them.
    pub fn process(
        &self,
        text: &str,
        annotator: &dyn Annotator,
        vectorizer: &dyn SentenceVectorizer,
    ) -> ExtractResult {
        let overall_start = Instant::now();
        let mut result = ExtractResult::default();

        let split_start = Instant::now();
        let sentences = split_sentences(text);
        result.stats.timings.split_us = split_start.elapsed().as_micros() as u64;
        result.stats.sentences_total = sentences.len();

        let annotate_start = Instant::now();
        let mut annotations: BTreeMap<usize, SentenceAnnotation> = BTreeMap::new();
        for (i, sentence) in sentences.iter().enumerate() {
            if !self.lexicon.mentions(sentence) {
                continue;
            }
            result.stats.sentences_matched += 1;
            match annotator.analyze(sentence).and_then(|ann| {
                ann.validate()?;
                Ok(ann)
            }) {
                Ok(ann) => {
                    annotations.insert(i, ann);
                }
                Err(message) => result.errors.push(ExtractError {
                    sentence: i,
                    phase: "annotate".to_string(),
                    message,
                }),
            }
        }
        result.stats.timings.annotate_us = annotate_start.elapsed().as_micros() as u64;

        self.resolve(&sentences, &annotations, vectorizer, &mut result);
        result.stats.timings.total_us = overall_start.elapsed().as_micros() as u64;
        result
    }

    /// `process`, with the documented caller fallback: no events means
    /// the original text comes back unchanged.
    pub fn process_or_echo(
        &self,
        text: &str,
        annotator: &dyn Annotator,
        vectorizer: &dyn SentenceVectorizer,
    ) -> ExtractOutcome {
        let result = self.process(text, annotator, vectorizer);
        if result.events.is_empty() {
            ExtractOutcome::Passthrough(text.to_string())
        } else {
            ExtractOutcome::Events(result.events)
        }
    }

    /// Run attribution and boundary resolution over sentences that were
    /// annotated outside the pipeline.
    pub fn extract_annotated(
        &self,
        annotations: &[SentenceAnnotation],
        vectorizer: &dyn SentenceVectorizer,
    ) -> ExtractResult {
        let overall_start = Instant::now();
        let mut result = ExtractResult::default();

        let sentences: Vec<String> =
            annotations.iter().map(|a| a.sentence.clone()).collect();
        result.stats.sentences_total = sentences.len();

        let mut validated: BTreeMap<usize, SentenceAnnotation> = BTreeMap::new();
        for (i, ann) in annotations.iter().enumerate() {
            if !self.lexicon.mentions(&ann.sentence) {
                continue;
            }
            result.stats.sentences_matched += 1;
            match ann.validate() {
                Ok(()) => {
                    validated.insert(i, ann.clone());
                }
                Err(message) => result.errors.push(ExtractError {
                    sentence: i,
                    phase: "annotate".to_string(),
                    message,
                }),
            }
        }

        self.resolve(&sentences, &validated, vectorizer, &mut result);
        result.stats.timings.total_us = overall_start.elapsed().as_micros() as u64;
        result
    }

    /// Shared back half: attribution, speaker phrase, content boundary.
    fn resolve(
        &self,
        sentences: &[String],
        annotations: &BTreeMap<usize, SentenceAnnotation>,
        vectorizer: &dyn SentenceVectorizer,
        result: &mut ExtractResult,
    ) {
        let resolve_start = Instant::now();
        let vectors = vectorizer.vectorize(sentences);

        for (&i, ann) in annotations {
            let Some(attribution) = attribute_sentence(ann, &self.lexicon) else {
                // Normal non-event: no lexicon verb with a subject arc.
                continue;
            };
            let spans = reconstruct_entity_spans(&ann.nertags);
            let speaker =
                resolve_speaker(ann, &spans, attribution.verb_index, attribution.subject_index);
            let ctx = BoundaryContext {
                sentences,
                index: i,
                vectors: &vectors,
                vectorizer,
            };
            let content =
                self.boundary
                    .extract_content(ann, attribution.boundary_index, speaker.span_start, &ctx);
            result.events.push(SpeechEvent {
                speaker: speaker.text,
                verb: attribution.verb,
                content,
                sentence_index: i,
            });
        }

        result.stats.events_found = result.events.len();
        result.stats.timings.resolve_us = resolve_start.elapsed().as_micros() as u64;
    }
}

// =============================================================================
// Tests
// =============================================================================
