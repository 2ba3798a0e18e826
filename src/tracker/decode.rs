//! Frame decoding - raw network frames to position-update batches.
//!
//! A frame is a structured text payload in one of two shapes:
//!
//! - [`FrameFormat::Array`] - a JSON array of records (datagram variant)
//! - [`FrameFormat::Record`] - a single JSON object (stream variant,
//!   one record per newline-terminated line)
//!
//! Decoding is pure and non-blocking. A record missing fields or with
//! wrong types is dropped individually; the rest of the batch is still
//! produced. A frame that is not well-formed at all yields an empty
//! batch. Neither case ever terminates the connection - decode errors
//! are logged and recovered locally.

use serde::Deserialize;
use serde_json::Value;

/// Entity name used when a stream-variant record omits its `id`.
pub const DEFAULT_TARGET_ID: &str = "TrackerEmpty";

/// One decoded position update for a target entity.
///
/// Immutable after creation; consumed exactly once by the scene
/// consumer.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionUpdate {
    /// Target entity identifier.
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// Ordered group of position updates decoded from one frame.
///
/// Order is preserved end to end; if the same id appears twice in one
/// batch the consumer applies both in sequence, so the last occurrence
/// wins.
pub type Batch = Vec<PositionUpdate>;

/// Payload shape of a frame, fixed per transport variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameFormat {
    /// One JSON array of records per frame.
    Array,
    /// One JSON object per frame; `id` is optional.
    Record,
}

/// Wire-level record shape.
///
/// `id` accepts both strings and integers: the stream peer historically
/// sent integer ids, rendered as `Tracker_<n>`. A missing id defaults
/// to [`DEFAULT_TARGET_ID`].
#[derive(Debug, Deserialize)]
struct WireRecord {
    #[serde(default)]
    id: Option<Value>,
    x: f64,
    y: f64,
    z: f64,
}

impl WireRecord {
    fn into_update(self) -> Option<PositionUpdate> {
        let id = match self.id {
            None | Some(Value::Null) => DEFAULT_TARGET_ID.to_string(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) if n.is_i64() || n.is_u64() => format!("Tracker_{}", n),
            Some(other) => {
                tracing::debug!(id = %other, "Dropping record with malformed id");
                return None;
            }
        };
        Some(PositionUpdate {
            id,
            x: self.x,
            y: self.y,
            z: self.z,
        })
    }
}

/// Decode one raw frame into a batch.
///
/// Never fails: malformed records are dropped and a malformed frame
/// yields an empty batch, both logged as non-fatal decode errors.
pub fn decode_frame(payload: &[u8], format: FrameFormat) -> Batch {
    let text = match std::str::from_utf8(payload) {
        Ok(text) => text.trim(),
        Err(e) => {
            tracing::warn!(error = %e, len = payload.len(), "Frame is not valid UTF-8");
            return Batch::new();
        }
    };

    match format {
        FrameFormat::Array => decode_array(text),
        FrameFormat::Record => decode_record(text).into_iter().collect(),
    }
}

/// Decode a JSON array frame, isolating per-record failures.
fn decode_array(text: &str) -> Batch {
    let values: Vec<Value> = match serde_json::from_str(text) {
        Ok(values) => values,
        Err(e) => {
            tracing::warn!(error = %e, "Frame is not a well-formed JSON array");
            return Batch::new();
        }
    };

    let total = values.len();
    let batch: Batch = values
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<WireRecord>(value) {
            Ok(record) => record.into_update(),
            Err(e) => {
                tracing::debug!(error = %e, "Dropping malformed record");
                None
            }
        })
        .collect();

    if batch.len() < total {
        tracing::debug!(
            kept = batch.len(),
            dropped = total - batch.len(),
            "Partial batch decoded"
        );
    }
    batch
}

/// Decode a single-object frame.
fn decode_record(text: &str) -> Option<PositionUpdate> {
    match serde_json::from_str::<WireRecord>(text) {
        Ok(record) => record.into_update(),
        Err(e) => {
            tracing::warn!(error = %e, "Frame is not a well-formed JSON record");
            None
        }
    }
}
