use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Deserialize;

/// Visual severity carried by the `type` field of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Success,
    Danger,
    Warning,
    Info,
    /// Also used for missing or unrecognized values.
    #[default]
    #[serde(other)]
    Default,
}

/// The two logical streams a record can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Messages,
    Notifications,
}

impl Stream {
    /// Binary partition on the raw discriminant: only `"message"` is a message.
    pub fn from_variant(variant: Option<&str>) -> Self {
        match variant {
            Some("message") => Stream::Messages,
            _ => Stream::Notifications,
        }
    }
}

/// Process-unique identifier of a record, used to key per-toast timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(u64);

impl RecordId {
    pub fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// One classified inbound item.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub id: RecordId,
    pub sender: String,
    pub receiver: Option<String>,
    pub message: String,
    /// Already formatted for display in the configured language.
    pub timestamp: String,
    pub kind: Kind,
    pub variant: Option<String>,
    /// Starts false; only ever set to true.
    pub read: bool,
    pub received_at: Instant,
}

impl Record {
    pub fn new(
        sender: impl Into<String>,
        message: impl Into<String>,
        timestamp: impl Into<String>,
        kind: Kind,
        variant: Option<String>,
    ) -> Self {
        Self {
            id: RecordId::next(),
            sender: sender.into(),
            receiver: None,
            message: message.into(),
            timestamp: timestamp.into(),
            kind,
            variant,
            read: false,
            received_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn with_receiver(mut self, receiver: Option<String>) -> Self {
        self.receiver = receiver;
        self
    }

    pub fn stream(&self) -> Stream {
        Stream::from_variant(self.variant.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_variant_routes_to_messages() {
        assert_eq!(Stream::from_variant(Some("message")), Stream::Messages);
    }

    #[test]
    fn other_variants_route_to_notifications() {
        assert_eq!(Stream::from_variant(Some("alert")), Stream::Notifications);
        assert_eq!(Stream::from_variant(Some("Message")), Stream::Notifications);
        assert_eq!(Stream::from_variant(Some("")), Stream::Notifications);
        assert_eq!(Stream::from_variant(None), Stream::Notifications);
    }

    #[test]
    fn kind_parses_known_values() {
        let kinds: Vec<Kind> =
            serde_json::from_str(r#"["default","success","danger","warning","info"]"#).unwrap();
        assert_eq!(
            kinds,
            vec![
                Kind::Default,
                Kind::Success,
                Kind::Danger,
                Kind::Warning,
                Kind::Info
            ]
        );
    }

    #[test]
    fn kind_falls_back_to_default() {
        let kind: Kind = serde_json::from_str(r#""critical""#).unwrap();
        assert_eq!(kind, Kind::Default);
    }

    #[test]
    fn record_ids_are_unique() {
        let a = Record::new("a", "x", "now", Kind::Info, None);
        let b = Record::new("a", "x", "now", Kind::Info, None);
        assert_ne!(a.id, b.id);
        assert!(!a.read);
    }
}
