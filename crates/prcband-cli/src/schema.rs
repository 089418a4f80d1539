use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Envelope shared by every JSON report
#[derive(Debug, Clone, Serialize)]
pub struct Report<T> {
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Report<T> {
    pub fn new(dataset: Option<PathBuf>, body: T) -> Self {
        Self {
            generated_at: Utc::now(),
            dataset,
            body,
        }
    }
}
