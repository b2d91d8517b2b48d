//! Named-entity span reconstruction from per-token NER tags.
//!
//! Tags use the LTP position/subtype scheme: a position prefix in
//! `{B, I, E, S}` and a subtype suffix in `{Nh (person), Ni
//! (organization), Ns (place)}`, e.g. `B-Ni`. Everything else (`O`) is
//! unrecognized. Maximal runs of recognized tags are merged into spans.

use std::collections::BTreeMap;

/// Position prefixes that mark a token as part of an entity mention.
const ENTITY_PREFIXES: [char; 4] = ['B', 'I', 'E', 'S'];

/// Entity subtypes the extractor cares about.
const ENTITY_SUBTYPES: [&str; 3] = ["Nh", "Ni", "Ns"];

/// Whether a NER tag marks a token inside a recognized entity mention.
pub fn is_entity_tag(tag: &str) -> bool {
    let Some(prefix) = tag.chars().next() else {
        return false;
    };
    if !ENTITY_PREFIXES.contains(&prefix) {
        return false;
    }
    match tag.split_once('-') {
        Some((_, subtype)) => ENTITY_SUBTYPES.contains(&subtype),
        None => false,
    }
}

/// Merge maximal runs of recognized tags into spans.
///
/// Returns span-start index -> span-end index (inclusive). Spans never
/// overlap and never have length zero. Pure and deterministic.
pub fn reconstruct_entity_spans(nertags: &[String]) -> BTreeMap<usize, usize> {
    let mut spans = BTreeMap::new();
    let mut i = 0;
    while i < nertags.len() {
        if !is_entity_tag(&nertags[i]) {
            i += 1;
            continue;
        }
        let start = i;
        while i + 1 < nertags.len() && is_entity_tag(&nertags[i + 1]) {
            i += 1;
        }
        spans.insert(start, i);
        i += 1;
    }
    spans
}

// =============================================================================
// Tests
// =============================================================================
