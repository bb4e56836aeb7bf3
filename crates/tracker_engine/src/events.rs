use serde::Deserialize;
use serde_json::Value;
use tracker_logging::tracker_warn;

/// One JSON-encoded event from the per-job push stream, discriminated by
/// the `type` field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireEvent {
    JobStarted,
    BatchSummary {
        total: u64,
    },
    FileFound {
        file: String,
        ordinal: u64,
        #[serde(default)]
        total: Option<u64>,
    },
    LabelResolved {
        file: String,
        display_name: String,
    },
    FileStarted {
        file: String,
        #[serde(default)]
        display_name: Option<String>,
    },
    FileCompleted {
        file: String,
        #[serde(default)]
        display_name: Option<String>,
        #[serde(default)]
        run_id: Option<String>,
        #[serde(default)]
        metrics: Option<Value>,
    },
    Error {
        message: String,
        #[serde(default)]
        file: Option<String>,
    },
    JobCompleted {
        total: u64,
        success: u64,
        failed: u64,
    },
}

const KNOWN_TYPES: &[&str] = &[
    "job_started",
    "batch_summary",
    "file_found",
    "label_resolved",
    "file_started",
    "file_completed",
    "error",
    "job_completed",
];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("event is not valid JSON: {0}")]
    InvalidJson(String),
    #[error("event has no type discriminator")]
    MissingType,
    #[error("malformed {kind} event: {message}")]
    MalformedEvent { kind: String, message: String },
}

/// Decode one stream payload. Unknown variants are logged and skipped
/// (`Ok(None)`) rather than silently dropped or guessed at; anything else
/// that fails to decode is an error.
pub fn decode_event(payload: &str) -> Result<Option<WireEvent>, DecodeError> {
    let value: Value =
        serde_json::from_str(payload).map_err(|err| DecodeError::InvalidJson(err.to_string()))?;
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::MissingType)?;
    if !KNOWN_TYPES.contains(&kind) {
        tracker_warn!("ignoring unknown stream event type={kind}");
        return Ok(None);
    }
    let kind = kind.to_string();
    serde_json::from_value(value)
        .map(Some)
        .map_err(|err| DecodeError::MalformedEvent {
            kind,
            message: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_tagged_variants() {
        let event = decode_event(r#"{"type":"batch_summary","total":3}"#)
            .unwrap()
            .unwrap();
        assert_eq!(event, WireEvent::BatchSummary { total: 3 });

        let event = decode_event(
            r#"{"type":"file_completed","file":"a.json","run_id":"r-9","metrics":{"tasks":4}}"#,
        )
        .unwrap()
        .unwrap();
        match event {
            WireEvent::FileCompleted { file, run_id, .. } => {
                assert_eq!(file, "a.json");
                assert_eq!(run_id.as_deref(), Some("r-9"));
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_type_is_skipped() {
        let event = decode_event(r#"{"type":"heartbeat","at":12}"#).unwrap();
        assert_eq!(event, None);
    }

    #[test]
    fn missing_type_is_an_error() {
        assert_eq!(
            decode_event(r#"{"total":3}"#).unwrap_err(),
            DecodeError::MissingType
        );
    }

    #[test]
    fn malformed_known_event_is_an_error() {
        let err = decode_event(r#"{"type":"batch_summary"}"#).unwrap_err();
        assert!(matches!(err, DecodeError::MalformedEvent { kind, .. } if kind == "batch_summary"));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(matches!(
            decode_event("not json"),
            Err(DecodeError::InvalidJson(_))
        ));
    }
}
