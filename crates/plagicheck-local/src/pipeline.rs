//! End-to-end check service: validation → extraction → evidence → score →
//! report persistence.
//!
//! Validation failures are the only errors a caller ever sees. Once input
//! is accepted, a check always produces a [`ScoreResult`]: provider
//! unavailability and every downstream failure route to the fallback
//! heuristic instead of surfacing.

use crate::evidence::EvidenceAggregator;
use crate::extract::extract_text_any;
use crate::gateway::SearchGateway;
use crate::provider::CloudSearchProvider;
use crate::render::render_report;
use crate::score;
use crate::store::{count_words_chars, doc_hash};
use plagicheck_core::{
    CandidateSource, DeferredSearchProvider, Error, ReportKind, ReportMeta, ReportStore, Result,
    ScoreResult, MAX_INPUT_BYTES, MIN_TEXT_CHARS,
};
use serde::Serialize;
use uuid::Uuid;

/// What a check hands back to the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct CheckResponse {
    pub originality: f64,
    pub plagiarism: f64,
    pub report_id: Uuid,
    pub sources: Vec<CandidateSource>,
}

pub struct CheckService<P, S> {
    aggregator: EvidenceAggregator<P>,
    store: S,
}

impl<S: ReportStore> CheckService<CloudSearchProvider, S> {
    /// Build from the environment: with credentials present the evidence
    /// pipeline is live, otherwise every check takes the fallback path.
    pub fn from_env(client: reqwest::Client, store: S) -> Self {
        let aggregator = match CloudSearchProvider::from_env(client) {
            Ok(provider) => EvidenceAggregator::new(SearchGateway::new(provider)),
            Err(e) => {
                tracing::debug!(reason = %e, "search provider disabled, using fallback scoring");
                EvidenceAggregator::disabled()
            }
        };
        Self::new(aggregator, store)
    }
}

impl<P: DeferredSearchProvider, S: ReportStore> CheckService<P, S> {
    pub fn new(aggregator: EvidenceAggregator<P>, store: S) -> Self {
        Self { aggregator, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Check pasted text. Limits: non-empty, ≤ 10 MB UTF-8, ≥ 500 chars.
    pub async fn check_text(&self, text: &str) -> Result<CheckResponse> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput("no text submitted".to_string()));
        }
        if text.len() > MAX_INPUT_BYTES {
            return Err(Error::InvalidInput(
                "text exceeds the 10 MB limit".to_string(),
            ));
        }
        let (words, chars) = count_words_chars(text);
        if chars < MIN_TEXT_CHARS {
            return Err(Error::InvalidInput(format!(
                "text too short to assess originality (minimum {MIN_TEXT_CHARS} characters)"
            )));
        }

        let result = self.run_check(text, chars).await;
        let meta = ReportMeta {
            word_count: words,
            char_count: chars,
            doc_hash: doc_hash(text.as_bytes()),
            ..Default::default()
        };
        self.persist(ReportKind::Text, meta, result)
    }

    /// Check an uploaded file (TXT, PDF with a text layer, DOCX).
    pub async fn check_file(
        &self,
        raw: &[u8],
        filename: &str,
        mimetype: Option<&str>,
    ) -> Result<CheckResponse> {
        if raw.len() > MAX_INPUT_BYTES {
            return Err(Error::InvalidInput(
                "file exceeds the 10 MB limit".to_string(),
            ));
        }
        let text = extract_text_any(raw, filename);
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::InvalidInput(
                "could not extract text from the file (supported: TXT, PDF, DOCX)".to_string(),
            ));
        }
        let (words, chars) = count_words_chars(text);
        if chars < MIN_TEXT_CHARS {
            return Err(Error::InvalidInput(format!(
                "text too short to assess originality (minimum {MIN_TEXT_CHARS} characters)"
            )));
        }

        let result = self.run_check(text, chars).await;
        let meta = ReportMeta {
            word_count: words,
            char_count: chars,
            doc_hash: doc_hash(raw),
            filename: Some(filename.to_string()),
            mimetype: mimetype.map(str::to_string),
            size_bytes: Some(raw.len()),
        };
        self.persist(ReportKind::File, meta, result)
    }

    /// Render the report document for an id string. Unknown, malformed and
    /// expired ids all render the default report rather than failing.
    pub fn report_document(&self, report_id: &str) -> Vec<u8> {
        let record = Uuid::parse_str(report_id)
            .ok()
            .and_then(|id| self.store.get(id));
        render_report(report_id, record.as_ref())
    }

    /// Failure-opaque scoring step: always yields a result.
    async fn run_check(&self, text: &str, chars: usize) -> ScoreResult {
        if !self.aggregator.is_enabled() {
            return score::fallback(chars, &mut rand::thread_rng());
        }
        let sources = self.aggregator.gather(text).await;
        score::score(chars, sources, &mut rand::thread_rng())
    }

    fn persist(
        &self,
        kind: ReportKind,
        meta: ReportMeta,
        result: ScoreResult,
    ) -> Result<CheckResponse> {
        let report_id = self.store.put(kind, meta)?;
        self.store.attach_result(report_id, result.clone())?;
        Ok(CheckResponse {
            originality: result.originality,
            plagiarism: result.plagiarism,
            report_id,
            sources: result.sources,
        })
    }
}
