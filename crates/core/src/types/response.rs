//! JSON bodies exchanged by the user API besides the record itself.

use serde::{Deserialize, Serialize};

/// Result of a delete request.
///
/// `success` is always true for a well-formed request; `deleted` says whether
/// a record was actually removed, so a repeated delete is non-fatal but still
/// distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteOutcome {
    pub success: bool,
    #[serde(default)]
    pub deleted: bool,
}

/// Error body returned by the API for non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
