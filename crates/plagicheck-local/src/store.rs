//! In-memory [`ReportStore`] with TTL expiry.
//!
//! Reports are short-lived by design (24h): the map is the system of
//! record, expiry is enforced lazily on read plus an explicit [`sweep`]
//! for callers that want a background cleanup pass.
//!
//! [`sweep`]: MemoryReportStore::sweep

use chrono::{Duration, Utc};
use plagicheck_core::{
    Error, ReportKind, ReportMeta, ReportRecord, ReportStore, Result, ScoreResult,
    REPORT_TTL_SECS,
};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

pub struct MemoryReportStore {
    records: RwLock<HashMap<Uuid, ReportRecord>>,
    ttl: Duration,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::with_ttl(Duration::seconds(REPORT_TTL_SECS))
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    fn expired(&self, rec: &ReportRecord) -> bool {
        Utc::now() - rec.created_at >= self.ttl
    }

    /// Drop every expired record; returns how many were removed.
    pub fn sweep(&self) -> usize {
        let mut map = self.records.write().expect("report store poisoned");
        let before = map.len();
        let cutoff = Utc::now() - self.ttl;
        map.retain(|_, rec| rec.created_at > cutoff);
        before - map.len()
    }

    pub fn len(&self) -> usize {
        self.records.read().expect("report store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportStore for MemoryReportStore {
    fn put(&self, kind: ReportKind, meta: ReportMeta) -> Result<Uuid> {
        let id = Uuid::new_v4();
        let rec = ReportRecord {
            id,
            kind,
            created_at: Utc::now(),
            meta,
            result: None,
        };
        self.records
            .write()
            .map_err(|_| Error::Store("report store poisoned".to_string()))?
            .insert(id, rec);
        Ok(id)
    }

    fn get(&self, id: Uuid) -> Option<ReportRecord> {
        {
            let map = self.records.read().ok()?;
            match map.get(&id) {
                Some(rec) if !self.expired(rec) => return Some(rec.clone()),
                None => return None,
                Some(_) => {}
            }
        }
        // Expired: evict lazily.
        if let Ok(mut map) = self.records.write() {
            map.remove(&id);
        }
        None
    }

    fn attach_result(&self, id: Uuid, result: ScoreResult) -> Result<()> {
        let mut map = self
            .records
            .write()
            .map_err(|_| Error::Store("report store poisoned".to_string()))?;
        let rec = map
            .get_mut(&id)
            .ok_or_else(|| Error::Store(format!("no report {id}")))?;
        rec.result = Some(result);
        Ok(())
    }
}

/// Hex sha256 of the checked document, stored in report metadata.
pub fn doc_hash(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

/// Word/char counts reported back to the caller alongside the verdict.
pub fn count_words_chars(text: &str) -> (usize, usize) {
    (text.split_whitespace().count(), text.chars().count())
}
