//! QuoteCore: Reported-Speech Attribution Engine
//!
//! A Rust/WASM implementation of the reported-speech extraction
//! pipeline: given free-form narrative text, find sentences anchored by
//! a speech-denoting verb, resolve the speaker phrase attached to that
//! verb, and delimit the span of quoted/reported content.
//!
//! # Architecture
//!
//! ## Extractor Components
//! - `pipeline.rs` - SpeechCortex: **orchestrator** - single process() per document
//! - `segment.rs` - Rule-based sentence splitting
//! - `lexicon.rs` - SpeechLexicon: speech-verb set + Aho-Corasick prefilter
//! - `annotation.rs` - Annotator seam: tokens, POS, NER, dependency arcs
//! - `entity.rs` - Named-entity span reconstruction from NER tags
//! - `attribution.rs` - Subject-verb attribution + speaker phrase resolution
//! - `boundary.rs` - BoundaryCortex: content span delimitation
//! - `similarity.rs` - TF-IDF sentence vectors for continuation decisions
//!
//! # Usage (WASM)
//! ```javascript,ignore
//! import init, { SpeechCortex } from 'quotecore';
//!
//! await init();
//!
//! const cortex = new SpeechCortex();
//! cortex.hydrateLexicon(['说', '表示', '指出']);
//!
//! // The linguistic service (segmentation, POS, NER, parsing) lives on
//! // the caller's side; hand the cortex pre-annotated sentences.
//! const result = cortex.extractAnnotated([
//!   {
//!     sentence: 'A说：“B很重要。”',
//!     tokens: ['A', '说', '：', '“', 'B', '很', '重要', '。', '”'],
//!     postags: ['nh', 'v', 'wp', 'wp', 'n', 'd', 'a', 'wp', 'wp'],
//!     nertags: ['S-Nh', 'O', 'O', 'O', 'O', 'O', 'O', 'O', 'O'],
//!     arcs: [{ head: 2, relation: 'SBV' }, { head: 0, relation: 'HED' }, ...]
//!   }
//! ]);
//!
//! // Result contains: events (speaker/verb/content), stats, errors
//! console.log(result.events);
//! ```

pub mod extractor;

pub use extractor::*;

use wasm_bindgen::prelude::*;

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator for smaller WASM bundle size.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get version information
#[wasm_bindgen]
pub fn version() -> String {
    format!("quotecore v{}", env!("CARGO_PKG_VERSION"))
}
