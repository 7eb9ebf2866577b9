use serde::{Deserialize, Serialize};

/// One participant's bid on a course, as materialized from a terminal task
/// result.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BidEntry {
    pub participant_name: String,
    pub participant_id: String,
    pub committed_amount: f64,
}

impl BidEntry {
    pub fn new(
        participant_name: impl Into<String>,
        participant_id: impl Into<String>,
        committed_amount: f64,
    ) -> Self {
        Self {
            participant_name: participant_name.into(),
            participant_id: participant_id.into(),
            committed_amount,
        }
    }
}

/// Bid entries sorted by committed amount, highest first; ties keep the
/// server-provided order. Contains exactly the records of the raw result,
/// none dropped, none fabricated.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RankedResultSet {
    entries: Vec<BidEntry>,
}

impl RankedResultSet {
    pub fn new(entries: Vec<BidEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[BidEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> Vec<BidEntry> {
        self.entries
    }
}
