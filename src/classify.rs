use std::fmt;

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::{FeedError, Result};
use crate::events::{Kind, Record, Stream};
use crate::i18n::Lang;

/// Offset-less layouts tried after RFC 3339, read in the display time zone.
const NAIVE_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];

/// `{ timestamp, value: { value: { sender, message, type, receiver, variant } } }`
#[derive(Debug, Deserialize)]
struct WireFrame {
    timestamp: WireTimestamp,
    value: WireEnvelope,
}

#[derive(Debug, Deserialize)]
struct WireEnvelope {
    value: WirePayload,
}

/// Scalar fields are coerced loosely: numbers and booleans become text, and
/// anything else is treated as absent. Only `message` must be present.
#[derive(Debug, Deserialize)]
struct WirePayload {
    #[serde(default, deserialize_with = "lenient_text")]
    sender: Option<String>,
    #[serde(deserialize_with = "required_text")]
    message: String,
    #[serde(default, rename = "type", deserialize_with = "lenient_kind")]
    kind: Option<Kind>,
    #[serde(default, deserialize_with = "lenient_text")]
    receiver: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    variant: Option<String>,
}

fn scalar_text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<String>, D::Error> {
    Value::deserialize(de).map(scalar_text)
}

fn required_text<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<String, D::Error> {
    let value = Value::deserialize(de)?;
    scalar_text(value).ok_or_else(|| serde::de::Error::custom("message is not a scalar"))
}

fn lenient_kind<'de, D: Deserializer<'de>>(de: D) -> std::result::Result<Option<Kind>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null => None,
        Value::String(s) => Some(Kind::deserialize(Value::String(s)).unwrap_or_default()),
        _ => Some(Kind::Default),
    })
}

/// Epoch milliseconds (integer or fractional) or a date string.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireTimestamp {
    Millis(i64),
    FractionalMillis(f64),
    Text(String),
}

impl WireTimestamp {
    /// Offset-less strings are read as wall-clock time in `tz`.
    fn resolve<Tz: TimeZone>(&self, tz: &Tz) -> Result<DateTime<Utc>> {
        match self {
            WireTimestamp::Millis(ms) => from_millis(*ms),
            WireTimestamp::FractionalMillis(ms) if ms.is_finite() => from_millis(ms.trunc() as i64),
            WireTimestamp::FractionalMillis(ms) => {
                Err(FeedError::MalformedFrame(format!("timestamp {ms} is not finite")))
            }
            WireTimestamp::Text(s) => parse_text(s.trim(), tz),
        }
    }
}

fn parse_text<Tz: TimeZone>(s: &str, tz: &Tz) -> Result<DateTime<Utc>> {
    if let Ok(ms) = s.parse::<i64>() {
        return from_millis(ms);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(|| FeedError::MalformedFrame(format!("timestamp {s:?} is not a date")))?;
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| FeedError::MalformedFrame(format!("timestamp {s:?} does not exist locally")))
}

fn from_millis(ms: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| FeedError::MalformedFrame(format!("timestamp {ms} out of range")))
}

/// A record together with the stream it belongs to.
#[derive(Debug, Clone)]
pub struct Classified {
    pub record: Record,
    pub stream: Stream,
}

/// Parse a raw frame and route it, formatting the timestamp in local time.
pub fn classify(raw: &str, lang: Lang) -> Result<Classified> {
    classify_in(raw, lang, &Local)
}

/// Same as [`classify`] with an explicit display time zone.
pub fn classify_in<Tz>(raw: &str, lang: Lang, tz: &Tz) -> Result<Classified>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let frame: WireFrame = serde_json::from_str(raw)?;
    let instant = frame.timestamp.resolve(tz)?;
    let timestamp = lang.format_timestamp(&instant.with_timezone(tz));

    let WirePayload {
        sender,
        message,
        kind,
        receiver,
        variant,
    } = frame.value.value;

    let record = Record::new(
        sender.unwrap_or_default(),
        message,
        timestamp,
        kind.unwrap_or_default(),
        variant,
    )
    .with_receiver(receiver);

    Ok(Classified {
        stream: record.stream(),
        record,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn frame(variant: &str) -> String {
        json!({
            "timestamp": 1_792_335_840_000_i64,
            "value": {
                "value": {
                    "sender": "ops",
                    "message": "disk almost full",
                    "type": "warning",
                    "receiver": "alice",
                    "variant": variant,
                }
            }
        })
        .to_string()
    }

    #[test]
    fn message_variant_lands_in_messages() {
        let classified = classify_in(&frame("message"), Lang::En, &Utc).unwrap();
        assert_eq!(classified.stream, Stream::Messages);
        let record = classified.record;
        assert_eq!(record.sender, "ops");
        assert_eq!(record.message, "disk almost full");
        assert_eq!(record.kind, Kind::Warning);
        assert_eq!(record.receiver.as_deref(), Some("alice"));
        assert!(!record.read);
    }

    #[test]
    fn alert_variant_lands_in_notifications() {
        let classified = classify_in(&frame("alert"), Lang::En, &Utc).unwrap();
        assert_eq!(classified.stream, Stream::Notifications);
        assert_eq!(classified.record.variant.as_deref(), Some("alert"));
    }

    #[test]
    fn missing_variant_lands_in_notifications() {
        let raw = json!({
            "timestamp": 0,
            "value": { "value": { "message": "hi" } }
        })
        .to_string();
        let classified = classify_in(&raw, Lang::En, &Utc).unwrap();
        assert_eq!(classified.stream, Stream::Notifications);
        assert_eq!(classified.record.sender, "");
        assert_eq!(classified.record.kind, Kind::Default);
    }

    #[test]
    fn epoch_millis_are_formatted_per_language() {
        let en = classify_in(&frame("message"), Lang::En, &Utc).unwrap();
        assert_eq!(en.record.timestamp, "October 18, 2026 3:04 PM");
        let fr = classify_in(&frame("message"), Lang::Fr, &Utc).unwrap();
        assert_eq!(fr.record.timestamp, "18 octobre 2026 15:04");
    }

    #[test]
    fn iso_timestamps_are_accepted() {
        let raw = json!({
            "timestamp": "2026-10-18T15:04:00Z",
            "value": { "value": { "message": "hi", "variant": "message" } }
        })
        .to_string();
        let classified = classify_in(&raw, Lang::En, &Utc).unwrap();
        assert_eq!(classified.record.timestamp, "October 18, 2026 3:04 PM");
    }

    #[test]
    fn null_type_defaults() {
        let raw = json!({
            "timestamp": 0,
            "value": { "value": { "message": "hi", "type": null } }
        })
        .to_string();
        let classified = classify_in(&raw, Lang::En, &Utc).unwrap();
        assert_eq!(classified.record.kind, Kind::Default);
    }

    fn at(timestamp: serde_json::Value) -> String {
        json!({
            "timestamp": timestamp,
            "value": { "value": { "message": "hi", "variant": "message" } }
        })
        .to_string()
    }

    #[test]
    fn unknown_type_defaults() {
        let raw = json!({
            "timestamp": 0,
            "value": { "value": { "message": "hi", "type": "critical" } }
        })
        .to_string();
        let classified = classify_in(&raw, Lang::En, &Utc).unwrap();
        assert_eq!(classified.record.kind, Kind::Default);
    }

    #[test]
    fn explicit_default_type_maps_by_name() {
        let raw = json!({
            "timestamp": 0,
            "value": { "value": { "message": "hi", "type": "default" } }
        })
        .to_string();
        let classified = classify_in(&raw, Lang::En, &Utc).unwrap();
        assert_eq!(classified.record.kind, Kind::Default);
    }

    #[test]
    fn offsetless_timestamps_read_in_display_zone() {
        for ts in ["2026-10-18T15:04:00", "2026-10-18 15:04:00", "2026-10-18T15:04:00.250"] {
            let classified = classify_in(&at(json!(ts)), Lang::En, &Utc).unwrap();
            assert_eq!(classified.record.timestamp, "October 18, 2026 3:04 PM", "{ts}");
        }
    }

    #[test]
    fn date_only_timestamp_is_midnight() {
        let classified = classify_in(&at(json!("2026-10-18")), Lang::Fr, &Utc).unwrap();
        assert_eq!(classified.record.timestamp, "18 octobre 2026 00:00");
    }

    #[test]
    fn fractional_and_string_millis_are_accepted() {
        for ts in [json!(1_792_335_840_000.0_f64), json!("1792335840000")] {
            let classified = classify_in(&at(ts.clone()), Lang::En, &Utc).unwrap();
            assert_eq!(classified.record.timestamp, "October 18, 2026 3:04 PM", "{ts}");
        }
    }

    #[test]
    fn non_string_scalars_are_coerced() {
        let raw = json!({
            "timestamp": 0,
            "value": { "value": {
                "sender": 42,
                "message": 7,
                "type": 3,
                "receiver": ["x"],
                "variant": "message",
            }}
        })
        .to_string();
        let classified = classify_in(&raw, Lang::En, &Utc).unwrap();
        assert_eq!(classified.stream, Stream::Messages);
        assert_eq!(classified.record.sender, "42");
        assert_eq!(classified.record.message, "7");
        assert_eq!(classified.record.kind, Kind::Default);
        assert_eq!(classified.record.receiver, None);
    }

    #[test]
    fn structured_message_is_malformed() {
        let raw = json!({
            "timestamp": 0,
            "value": { "value": { "message": { "text": "hi" } } }
        })
        .to_string();
        let err = classify_in(&raw, Lang::En, &Utc).unwrap_err();
        assert!(matches!(err, FeedError::MalformedFrame(_)));
    }

    #[test]
    fn not_json_is_malformed() {
        let err = classify_in("not json", Lang::En, &Utc).unwrap_err();
        assert!(matches!(err, FeedError::MalformedFrame(_)));
    }

    #[test]
    fn missing_nested_value_is_malformed() {
        let raw = json!({ "timestamp": 0, "value": { "sender": "ops" } }).to_string();
        let err = classify_in(&raw, Lang::En, &Utc).unwrap_err();
        assert!(matches!(err, FeedError::MalformedFrame(_)));
    }

    #[test]
    fn bad_timestamp_is_malformed() {
        let raw = json!({
            "timestamp": "yesterday",
            "value": { "value": { "message": "hi" } }
        })
        .to_string();
        let err = classify_in(&raw, Lang::En, &Utc).unwrap_err();
        assert!(matches!(err, FeedError::MalformedFrame(_)));
    }
}
