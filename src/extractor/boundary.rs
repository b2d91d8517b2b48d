//! BoundaryCortex: content span delimitation for reported speech.
//!
//! An ordered decision table picks the initial span, highest priority
//! first:
//! 1. **Quotation-adjacent**: an opening quote within 3 tokens of the
//!    verb anchors the content; an unclosed quote scans up to 5
//!    following sentences for a closing glyph.
//! 2. **Sentence-final verb**: the speech precedes the verb
//!    (`"X," said Y.`); a closing quote ending the previous sentence
//!    scans up to 5 preceding sentences for the opening glyph.
//! 3. **Separator-introduced**: content starts after a colon/comma.
//! 4. **Default**: content is everything after the verb.
//!
//! A verb with no successor token falls back to the preceding raw
//! sentence. Every neighbor-index overrun is recovered locally; nothing
//! here returns an error.

use regex::Regex;

use crate::extractor::annotation::SentenceAnnotation;
use crate::extractor::similarity::{SentenceVectorizer, SparseVector, CONTINUATION_THRESHOLD};

// =============================================================================
// Glyph sets
// =============================================================================

pub const OPENING_QUOTES: [&str; 4] = ["\"", "'", "“", "‘"];
pub const CLOSING_QUOTES: [&str; 4] = ["\"", "'", "”", "’"];
pub const TERMINAL_PUNCTUATION: [&str; 8] = ["。", "！", "？", "!", "?", "…", ".", "……"];
pub const CLAUSE_SEPARATORS: [&str; 4] = [":", "：", ",", "，"];

/// How far (in token positions) an opening quote may sit from the verb
/// and still anchor the content.
const QUOTE_WINDOW: usize = 3;

/// Neighbor sentences scanned when a quote is left unclosed.
const QUOTE_SCAN_LIMIT: usize = 5;

fn contains_any(text: &str, glyphs: &[&str]) -> bool {
    glyphs.iter().any(|g| text.contains(g))
}

fn ends_with_any(text: &str, glyphs: &[&str]) -> bool {
    glyphs.iter().any(|g| text.ends_with(g))
}

// =============================================================================
// Context
// =============================================================================

/// Document-level surroundings of the sentence being delimited.
pub struct BoundaryContext<'a> {
    pub sentences: &'a [String],
    /// Index of the current sentence within `sentences`.
    pub index: usize,
    /// One vector per sentence, computed jointly over the document.
    pub vectors: &'a [SparseVector],
    pub vectorizer: &'a dyn SentenceVectorizer,
}

// =============================================================================
// BoundaryCortex
// =============================================================================

pub struct BoundaryCortex {
    terminal_clause: Regex,
    trailing_clause: Regex,
}

impl Default for BoundaryCortex {
    fn default() -> Self {
        Self::new()
    }
}

impl BoundaryCortex {
    pub fn new() -> Self {
        // Trailing clause through its terminal stop, e.g. 要关心国家。
        let terminal_clause = Regex::new(r"[^，,：:]*[。！？!?….]+$")
            .expect("terminal clause regex should compile");
        // Everything after the last clause separator.
        let trailing_clause =
            Regex::new(r"[^，,：:]*$").expect("trailing clause regex should compile");

        Self {
            terminal_clause,
            trailing_clause,
        }
    }

    /// Delimit the reported content for one resolved attribution.
    ///
    /// `verb_index` is the boundary anchor (particle-merged), and
    /// `speaker_start` the start of the resolved speaker span.
    pub fn extract_content(
        &self,
        ann: &SentenceAnnotation,
        verb_index: usize,
        speaker_start: usize,
        ctx: &BoundaryContext,
    ) -> String {
        let tokens = &ann.tokens;
        let mut front = String::new();
        let mut back = String::new();

        let body = if let Some(q) = opening_quote_near(tokens, verb_index) {
            // Case 1: quotation-adjacent.
            if !tokens.iter().any(|t| CLOSING_QUOTES.contains(&t.as_str())) {
                for offset in 0..QUOTE_SCAN_LIMIT {
                    let Some(next) = ctx.sentences.get(ctx.index + 1 + offset) else {
                        break;
                    };
                    back.push_str(next);
                    if contains_any(next, &CLOSING_QUOTES) {
                        break;
                    }
                }
            }
            tokens[q..].concat()
        } else if verb_index + 1 >= tokens.len() {
            // Verb is the final token: the preceding sentence stands in.
            if ctx.index > 0 {
                front.push_str(&ctx.sentences[ctx.index - 1]);
            }
            String::new()
        } else if TERMINAL_PUNCTUATION.contains(&tokens[verb_index + 1].as_str()) {
            // Case 2: sentence-final verb, speech precedes the subject.
            if ctx.index > 0 && ends_with_any(&ctx.sentences[ctx.index - 1], &CLOSING_QUOTES) {
                for offset in 0..QUOTE_SCAN_LIMIT {
                    let Some(prev_index) = ctx.index.checked_sub(1 + offset) else {
                        break;
                    };
                    front.insert_str(0, &ctx.sentences[prev_index]);
                    if contains_any(&ctx.sentences[prev_index], &OPENING_QUOTES) {
                        break;
                    }
                }
            }
            tokens[..speaker_start.min(tokens.len())].concat()
        } else if CLAUSE_SEPARATORS.contains(&tokens[verb_index + 1].as_str()) {
            // Case 3: colon/comma-introduced.
            tokens[verb_index + 2..].concat()
        } else {
            // Case 4: default.
            tokens[verb_index + 1..].concat()
        };

        let mut content = format!("{front}{body}{back}");

        // Continuation: topical overlap with the next sentence pulls it in.
        if let (Some(current), Some(next_vector), Some(next)) = (
            ctx.vectors.get(ctx.index),
            ctx.vectors.get(ctx.index + 1),
            ctx.sentences.get(ctx.index + 1),
        ) {
            if ctx.vectorizer.similarity(current, next_vector) > CONTINUATION_THRESHOLD {
                content.push_str(next);
            }
        }

        self.trim_trailing_clause(&content)
    }

    /// Clause-extraction pass over the assembled content. Edge quote
    /// glyphs are stripped; an empty yield keeps the assembly verbatim.
    pub fn trim_trailing_clause(&self, content: &str) -> String {
        let stripped = content
            .trim_matches(|c: char| matches!(c, '"' | '\'' | '“' | '”' | '‘' | '’'));

        let trimmed = if ends_with_any(stripped, &TERMINAL_PUNCTUATION) {
            self.terminal_clause.find(stripped)
        } else {
            self.trailing_clause.find(stripped)
        };

        match trimmed {
            Some(m) if !m.as_str().is_empty() => m.as_str().to_string(),
            _ => content.to_string(),
        }
    }
}

/// First opening-quote token within the window around the verb.
fn opening_quote_near(tokens: &[String], verb_index: usize) -> Option<usize> {
    tokens.iter().enumerate().find_map(|(q, token)| {
        let is_opening = OPENING_QUOTES.contains(&token.as_str());
        (is_opening && q.abs_diff(verb_index) <= QUOTE_WINDOW).then_some(q)
    })
}

// =============================================================================
// Tests
// =============================================================================
