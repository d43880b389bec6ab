//! Analyzed document records.
//!
//! A document is written once, after its upload has been stored on disk and
//! the analysis provider has answered. There is no update or delete path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted record of one analyzed upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Store-assigned identifier.
    pub id: String,
    /// Filename as supplied by the client.
    pub filename: String,
    /// Where the raw bytes were written.
    pub path: String,
    /// When the row was created.
    pub created_at: DateTime<Utc>,
    /// Caller-supplied instruction.
    pub prompt: Option<String>,
    /// Preset key used to pick the system instruction.
    pub analysis_type: Option<String>,
    /// Text returned by the analysis provider.
    pub result: Option<String>,
}

/// Metadata for a document about to be inserted.
#[derive(Debug, Clone, Default)]
pub struct NewDocument {
    pub filename: String,
    pub path: String,
    pub prompt: Option<String>,
    pub analysis_type: Option<String>,
    pub result: Option<String>,
}
