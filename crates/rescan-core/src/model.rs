//! Normalised scan requests handed to downstream processors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unit of work produced by a trigger: a folder to rescan plus metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanRequest {
    /// Canonical directory to rescan, after path rewriting.
    pub folder: String,
    /// Priority configured on the trigger that produced the request.
    pub priority: i32,
    /// Whether the sender asked for deep analysis of the folder.
    pub analyze: bool,
    /// Time at which the trigger created the request.
    pub time: DateTime<Utc>,
}
