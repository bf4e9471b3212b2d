use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use shared::PredictionResult;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryEntry {
    pub label: String,
    pub confidence: f32,
    pub image_hash: String,
    pub recorded_at: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn new(result: &PredictionResult, image_data: &[u8]) -> Self {
        Self {
            label: result.label.clone(),
            confidence: result.confidence,
            image_hash: calculate_image_hash(image_data),
            recorded_at: Utc::now(),
        }
    }
}

/// Append-only log of past predictions. Nothing reads it back over HTTP.
#[derive(Debug, Default)]
pub struct PredictionHistory {
    entries: Vec<HistoryEntry>,
}

impl PredictionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }
}

pub fn calculate_image_hash(image_data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image_data);
    hex::encode(hasher.finalize())
}
