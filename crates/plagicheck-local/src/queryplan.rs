//! Derives a handful of representative search phrases from submitted text.
//!
//! The planner is deterministic: the same text always yields the same
//! queries. Chunks are sampled at an even stride so the queries cover the
//! beginning, middle and end of the document rather than just the opening.

/// Words taken per candidate chunk.
const CHUNK_WORDS: usize = 8;
/// Chunks shorter than this are too generic to be useful queries.
const MIN_CHUNK_WORDS: usize = 6;
/// Fallback query length (chars) when no chunk qualifies.
const FALLBACK_CHARS: usize = 200;

#[derive(Debug, Clone)]
pub struct QueryPlanner {
    /// Wrap each query in quotes to bias the provider toward literal
    /// substring matches. Materially improves copy-paste recall; on by
    /// default.
    pub exact_match: bool,
}

impl Default for QueryPlanner {
    fn default() -> Self {
        Self { exact_match: true }
    }
}

impl QueryPlanner {
    /// Split `text` into up to `max_queries` search phrases.
    ///
    /// - Empty text yields no queries.
    /// - Chunks of up to 8 consecutive words are sampled every
    ///   `max(1, words/3)` positions; only chunks of ≥6 words qualify.
    /// - If nothing qualifies, a single query is built from the first 200
    ///   chars of the text.
    pub fn plan(&self, text: &str, max_queries: usize) -> Vec<String> {
        let words: Vec<&str> = text.split_whitespace().collect();
        if words.is_empty() || max_queries == 0 {
            return Vec::new();
        }

        let step = (words.len() / 3).max(1);
        let mut chunks: Vec<String> = Vec::new();
        let mut i = 0usize;
        while i < words.len() {
            let end = (i + CHUNK_WORDS).min(words.len());
            if end - i >= MIN_CHUNK_WORDS {
                chunks.push(words[i..end].join(" "));
            }
            if chunks.len() >= max_queries {
                break;
            }
            i += step;
        }

        if chunks.is_empty() {
            chunks.push(text.chars().take(FALLBACK_CHARS).collect::<String>());
        }

        if self.exact_match {
            chunks.into_iter().map(|c| format!("\"{c}\"")).collect()
        } else {
            chunks
        }
    }
}
