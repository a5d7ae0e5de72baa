//! # Outcome classification.
//!
//! Pure mapping from a [`RawOutcome`] to the caller-visible result:
//!
//! ```text
//! Returned(v), ok_tuple off          ──► Ok(v)
//! Returned(["ok", v]), ok_tuple on   ──► Ok(v)
//! Returned({"ok": true, "value": v}) ──► Ok(v)        (ok_tuple on)
//! Returned(other), ok_tuple on       ──► Err(Rejected { other })
//! Raised { error, trace }            ──► Err(Raised { error, trace })
//! Terminated(reason)                 ──► Err(Terminated { reason })
//! ```

use serde_json::Value;

use crate::error::Failure;
use crate::outcome::RawOutcome;

/// Classifies one attempt's raw outcome.
pub fn classify(raw: RawOutcome, ok_tuple: bool) -> Result<Value, Failure> {
    match raw {
        RawOutcome::Returned(value) if !ok_tuple => Ok(value),
        RawOutcome::Returned(value) => unwrap_marker(value).map_err(|value| Failure::Rejected { value }),
        RawOutcome::Raised { error, trace } => Err(Failure::Raised { error, trace }),
        RawOutcome::Terminated(reason) => Err(Failure::Terminated { reason }),
    }
}

/// Returns the inner value of a success marker, or the value unchanged.
fn unwrap_marker(value: Value) -> Result<Value, Value> {
    match value {
        Value::Array(items) => match <[Value; 2]>::try_from(items) {
            Ok([tag, inner]) if tag == "ok" => Ok(inner),
            Ok(pair) => Err(Value::Array(pair.into())),
            Err(items) => Err(Value::Array(items)),
        },
        Value::Object(mut map) if map.len() == 2 && map.get("ok") == Some(&Value::Bool(true)) => {
            match map.remove("value") {
                Some(inner) => Ok(inner),
                None => Err(Value::Object(map)),
            }
        }
        other => Err(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::outcome::Termination;

    #[test]
    fn test_plain_mode_accepts_anything() {
        let v = classify(RawOutcome::Returned(json!(["error", "looks bad"])), false).unwrap();
        assert_eq!(v, json!(["error", "looks bad"]));
    }

    #[test]
    fn test_ok_tuple_unwraps_markers() {
        let v = classify(RawOutcome::Returned(json!(["ok", 5])), true).unwrap();
        assert_eq!(v, json!(5));

        let v = classify(RawOutcome::Returned(json!({"ok": true, "value": 5})), true).unwrap();
        assert_eq!(v, json!(5));
    }

    #[test]
    fn test_ok_tuple_rejects_mismatch() {
        for value in [
            json!(5),
            json!(["error", 5]),
            json!(["ok", 5, 6]),
            json!({"ok": false, "value": 5}),
            json!({"ok": true, "other": 5}),
        ] {
            let err = classify(RawOutcome::Returned(value.clone()), true).unwrap_err();
            assert!(
                matches!(&err, Failure::Rejected { value: v } if v == &value),
                "{value} should be rejected unchanged, got {err:?}"
            );
        }
    }

    #[test]
    fn test_termination_forwarded_verbatim() {
        let reason = Termination::Exit(json!({"oom": true}));
        let err = classify(RawOutcome::Terminated(reason.clone()), true).unwrap_err();
        assert!(matches!(err, Failure::Terminated { reason: r } if r == reason));
    }

    #[test]
    fn test_raised_keeps_error() {
        let err = classify(
            RawOutcome::Raised {
                error: "x".into(),
                trace: None,
            },
            false,
        )
        .unwrap_err();
        assert!(matches!(err, Failure::Raised { error, trace: None } if error == "x"));
    }
}
