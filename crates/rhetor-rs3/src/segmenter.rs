//! Sentence segmentation over the segment token stream.
//!
//! Segments are visited in document order. Each one receives the current
//! sentence id and the global id of its first token; a segment whose last
//! token looks sentence-final closes the sentence for the next segment.

use std::sync::OnceLock;

use regex::Regex;

/// Sentence id and first-token id assigned to one segment (both 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentencePosition {
    pub sentence_id: usize,
    pub initial_token_id: usize,
}

fn sentence_final() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"[.?!]['"]?\s*$"#).expect("sentence-final pattern"))
}

/// Whether `token` ends with `.`, `?` or `!`, optionally followed by a
/// closing quote.
pub fn closes_sentence(token: &str) -> bool {
    sentence_final().is_match(token)
}

/// Whitespace tokenisation used everywhere a segment's text is split.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

/// Assigns positions to segment texts given in document order.
pub fn segment_sentences<'a, I>(texts: I) -> Vec<SentencePosition>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut sentence_id = 1;
    let mut initial_token_id = 1;
    let mut positions = Vec::new();

    for text in texts {
        positions.push(SentencePosition {
            sentence_id,
            initial_token_id,
        });

        let mut count = 0;
        let mut last = None;
        for token in tokenize(text) {
            count += 1;
            last = Some(token);
        }
        if last.is_some_and(closes_sentence) {
            sentence_id += 1;
        }
        initial_token_id += count;
    }

    positions
}
