//! Service layer for Codex business logic.
//!
//! Services sit between the HTTP handlers (or CLI) and the repositories.

pub mod analysis;
pub mod mqtt;
pub mod storage;

pub use analysis::{AnalysisService, AnalyzeError, Upload};
pub use mqtt::MqttClient;
pub use storage::{sanitize_filename, UploadStorage};
