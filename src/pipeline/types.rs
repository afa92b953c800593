use serde::{Deserialize, Serialize};

use crate::audit::AuditTrail;
use crate::inference::InferredCode;

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    /// The text the run was asked about.
    pub input_text: String,
    /// Ranked inferred codes, best first.
    pub inferred: Vec<InferredCode>,
    /// Snapshot of the audit trail as of the end of the run, when the
    /// caller supplied one.
    pub audit: Option<AuditTrail>,
}
