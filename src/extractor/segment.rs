//! Rule-based sentence splitting.
//!
//! Each input line is split at terminal punctuation. A run of
//! terminators (`……`, `?!`) and any closing quote glyphs immediately
//! after it stay attached to the sentence they end. Latin full stops
//! are left alone to avoid cutting decimals and abbreviations.

/// Glyphs that end a sentence.
const SENTENCE_TERMINATORS: [char; 6] = ['。', '！', '？', '!', '?', '…'];

/// Closing quote glyphs that trail a terminator.
const TRAILING_QUOTES: [char; 4] = ['"', '\'', '”', '’'];

/// Split raw text into its ordered, non-empty sentence sequence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut current = String::new();
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            if SENTENCE_TERMINATORS.contains(&c) {
                while let Some(&next) = chars.peek() {
                    if SENTENCE_TERMINATORS.contains(&next) || TRAILING_QUOTES.contains(&next) {
                        current.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let sentence = current.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                current.clear();
            }
        }
        let tail = current.trim();
        if !tail.is_empty() {
            sentences.push(tail.to_string());
        }
    }
    sentences
}

// =============================================================================
// Tests
// =============================================================================
