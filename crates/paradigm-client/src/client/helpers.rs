//! Pure helpers: status decoding, upload naming (no HTTP).

use serde_json::Value;
use tracing::warn;

use crate::types::{JobStatus, StatusResponse};

/// Fresh unique name for an upload.
pub(crate) fn generate_upload_name() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether a `result` payload counts as present.
///
/// `null`, `false`, `0` and empty strings, lists and objects all mean the
/// run is still going.
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Map a status body onto the job state machine.
///
/// Precedence: `error_message` key, then `status == "Failed"`, then `result`.
pub(crate) fn decode_status(response: StatusResponse) -> JobStatus {
    if let Some(message) = response.error_message() {
        return JobStatus::Failed {
            message: Some(message),
        };
    }
    if response.is_failed() {
        return JobStatus::Failed { message: None };
    }
    match response.result() {
        Some(result) if is_truthy(result) => JobStatus::Done(result.clone()),
        Some(_) => JobStatus::Pending,
        None => {
            let keys: Vec<&String> = response.fields.keys().collect();
            warn!(?keys, "status body has no result field");
            JobStatus::Pending
        }
    }
}
