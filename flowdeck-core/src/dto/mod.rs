//! Data transfer objects for the engine REST API

pub mod flow;
pub mod snapshot;

use serde::{Deserialize, Serialize};

/// Standard response envelope used by every non-blob engine endpoint
///
/// Success payloads live in `data`; error responses reuse the same shape
/// with a human-readable `message`, which the client's error normalization
/// extracts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiEnvelope<T> {
    pub status_code: i64,
    pub message: String,
    pub data: T,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_roundtrip() {
        let raw = r#"{
            "statusCode": 200,
            "message": "ok",
            "data": [1, 2, 3],
            "timestamp": "2025-01-01T00:00:00Z"
        }"#;

        let envelope: ApiEnvelope<Vec<i32>> = serde_json::from_str(raw).unwrap();
        assert_eq!(envelope.status_code, 200);
        assert_eq!(envelope.data, vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_null_data() {
        let raw = r#"{
            "statusCode": 200,
            "message": "ok",
            "data": null,
            "timestamp": "2025-01-01T00:00:00Z"
        }"#;

        let envelope: ApiEnvelope<Option<serde_json::Value>> = serde_json::from_str(raw).unwrap();
        assert!(envelope.data.is_none());
    }
}
