use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// What a commit-reveal round decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundPurpose {
    FirstMove,
    ComputerThrow,
    UserThrow,
}

/// Audit record of one commit-reveal round: everything the human needs to
/// re-check the HMAC offline.
#[derive(Debug, Clone, Serialize)]
pub struct TranscriptEntry {
    pub purpose: RoundPurpose,
    pub range: u64,
    pub tag: String,
    pub value: u64,
    pub key: String,
    pub user_value: u64,
    pub result: u64,
    pub verified: bool,
    pub at: DateTime<Utc>,
}

/// Fairness transcript for one game session.
#[derive(Debug, Serialize)]
pub struct Transcript {
    pub session: Uuid,
    pub started_at: DateTime<Utc>,
    pub entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            session: Uuid::new_v4(),
            started_at: Utc::now(),
            entries: Vec::new(),
        }
    }

    pub fn record(&mut self, entry: TranscriptEntry) {
        tracing::debug!(
            session = %self.session,
            purpose = ?entry.purpose,
            tag = %entry.tag,
            "recorded fair round"
        );
        self.entries.push(entry);
    }

    pub fn all_verified(&self) -> bool {
        self.entries.iter().all(|e| e.verified)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}
