use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("search failed: {0}")]
    Search(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
    #[error("extraction failed: {0}")]
    Extract(String),
    #[error("report store error: {0}")]
    Store(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Minimum text length (chars) accepted for an originality check.
pub const MIN_TEXT_CHARS: usize = 500;
/// Hard cap on submitted text / uploaded file size.
pub const MAX_INPUT_BYTES: usize = 10 * 1024 * 1024;
/// How many representative queries a single check derives from the text.
pub const MAX_QUERIES: usize = 2;
/// Global cap on candidate sources surfaced per check.
pub const MAX_SOURCES: usize = 2;
/// Cap on links harvested from a single query's result markup.
pub const MAX_LINKS_PER_QUERY: usize = 2;
/// Report records expire after this many seconds (24h).
pub const REPORT_TTL_SECS: i64 = 24 * 60 * 60;

/// One candidate source surfaced by the external search provider.
///
/// Uniqueness is enforced at the URL-domain level within a single check:
/// at most one `CandidateSource` per authority component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateSource {
    pub title: String,
    pub url: String,
}

/// Final verdict of a check: an originality/plagiarism percentage pair plus
/// the evidence that produced it. The pair always sums to 100.0 after
/// one-decimal rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub originality: f64,
    pub plagiarism: f64,
    pub sources: Vec<CandidateSource>,
}

impl ScoreResult {
    /// Defensive result returned when the scorer is invoked on text that
    /// should have been rejected upstream.
    pub fn zeroed() -> Self {
        Self {
            originality: 0.0,
            plagiarism: 0.0,
            sources: Vec::new(),
        }
    }
}

/// Text-length classification driving the scoring heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthBucket {
    Short,
    Medium,
    Long,
}

impl LengthBucket {
    /// Classify by char count. Texts under [`MIN_TEXT_CHARS`] have no bucket.
    pub fn from_chars(chars: usize) -> Option<Self> {
        match chars {
            0..=499 => None,
            500..=1199 => Some(Self::Short),
            1200..=3999 => Some(Self::Medium),
            _ => Some(Self::Long),
        }
    }

    /// Base originality percentage in evidence mode.
    pub fn base(self) -> f64 {
        match self {
            Self::Short => 78.0,
            Self::Medium => 86.0,
            Self::Long => 92.0,
        }
    }

    /// Originality penalty per surfaced source.
    pub fn penalty_per_source(self) -> f64 {
        match self {
            Self::Short => 12.0,
            Self::Medium => 6.0,
            Self::Long => 3.0,
        }
    }

    /// Inclusive originality range sampled when no provider is available.
    pub fn fallback_range(self) -> (f64, f64) {
        match self {
            Self::Short => (65.0, 80.0),
            Self::Medium => (75.0, 90.0),
            Self::Long => (85.0, 95.0),
        }
    }
}

/// The external provider's asynchronous job handle, as observed by one
/// status fetch. `raw_data` is the opaque encoded payload, present only once
/// the operation reports done.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOperation {
    pub id: String,
    pub done: bool,
    pub raw_data: Option<String>,
}

/// A deferred (submit-then-poll) web search backend.
///
/// Implementations talk to one concrete provider; the gateway owns the poll
/// loop and timeout policy on top of this trait.
#[async_trait::async_trait]
pub trait DeferredSearchProvider: Send + Sync {
    fn name(&self) -> &'static str;
    /// Submit a search request; returns the opaque operation id.
    async fn submit(&self, query: &str) -> Result<String>;
    /// Fetch the current state of a previously submitted operation.
    async fn operation(&self, id: &str) -> Result<SearchOperation>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Text,
    File,
}

/// Metadata captured alongside a check. File checks carry the upload
/// details; text checks leave them unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportMeta {
    pub word_count: usize,
    pub char_count: usize,
    pub doc_hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_bytes: Option<usize>,
}

/// Short-lived report record. Owned and mutated by the report store; the
/// pipeline only supplies the [`ScoreResult`] to attach.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: Uuid,
    pub kind: ReportKind,
    pub created_at: DateTime<Utc>,
    pub meta: ReportMeta,
    pub result: Option<ScoreResult>,
}

/// Keyed report storage with TTL-based expiry.
pub trait ReportStore: Send + Sync {
    /// Create a fresh record and return its id.
    fn put(&self, kind: ReportKind, meta: ReportMeta) -> Result<Uuid>;
    /// Look up a record; expired records are absent.
    fn get(&self, id: Uuid) -> Option<ReportRecord>;
    /// Attach the check verdict to an existing record.
    fn attach_result(&self, id: Uuid, result: ScoreResult) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_boundaries() {
        assert_eq!(LengthBucket::from_chars(0), None);
        assert_eq!(LengthBucket::from_chars(499), None);
        assert_eq!(LengthBucket::from_chars(500), Some(LengthBucket::Short));
        assert_eq!(LengthBucket::from_chars(1199), Some(LengthBucket::Short));
        assert_eq!(LengthBucket::from_chars(1200), Some(LengthBucket::Medium));
        assert_eq!(LengthBucket::from_chars(3999), Some(LengthBucket::Medium));
        assert_eq!(LengthBucket::from_chars(4000), Some(LengthBucket::Long));
        assert_eq!(LengthBucket::from_chars(100_000), Some(LengthBucket::Long));
    }

    #[test]
    fn bucket_table_matches_heuristic() {
        assert_eq!(LengthBucket::Short.base(), 78.0);
        assert_eq!(LengthBucket::Medium.penalty_per_source(), 6.0);
        assert_eq!(LengthBucket::Long.fallback_range(), (85.0, 95.0));
    }

    #[test]
    fn zeroed_result_is_empty() {
        let r = ScoreResult::zeroed();
        assert_eq!(r.originality, 0.0);
        assert_eq!(r.plagiarism, 0.0);
        assert!(r.sources.is_empty());
    }

    #[test]
    fn report_record_roundtrips_through_json() {
        let rec = ReportRecord {
            id: Uuid::new_v4(),
            kind: ReportKind::File,
            created_at: Utc::now(),
            meta: ReportMeta {
                word_count: 10,
                char_count: 60,
                doc_hash: "abc".into(),
                filename: Some("essay.docx".into()),
                mimetype: None,
                size_bytes: Some(1234),
            },
            result: Some(ScoreResult {
                originality: 74.0,
                plagiarism: 26.0,
                sources: vec![CandidateSource {
                    title: "Example".into(),
                    url: "https://example.com/a".into(),
                }],
            }),
        };
        let js = serde_json::to_string(&rec).unwrap();
        let back: ReportRecord = serde_json::from_str(&js).unwrap();
        assert_eq!(back.id, rec.id);
        assert_eq!(back.kind, ReportKind::File);
        assert_eq!(back.meta, rec.meta);
        assert_eq!(back.result.unwrap().sources.len(), 1);
    }
}
