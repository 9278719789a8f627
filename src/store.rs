//! Immutable store for the two record streams.
//!
//! Every operation takes `&self` and returns the next store value. Only the
//! collection an operation touches is copied; the other stays shared with the
//! previous snapshot. State-changing operations bump `version`, so consumers
//! can tell snapshots apart without comparing contents. Operations that end up
//! changing nothing (stale index, already read) return an identical value.

use std::collections::VecDeque;
use std::sync::Arc;

use serde::Deserialize;
use tracing::debug;

use crate::events::{Record, Stream};

/// Insertion policy, selected by the embedding application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Newest first, records persist in the drawer.
    Drawer,
    /// Oldest first, records render as transient toasts.
    #[default]
    Inline,
}

impl DisplayMode {
    pub fn from_is_drawer(is_drawer: bool) -> Self {
        if is_drawer {
            DisplayMode::Drawer
        } else {
            DisplayMode::Inline
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StreamStore {
    messages: Arc<VecDeque<Record>>,
    notifications: Arc<VecDeque<Record>>,
    /// Maximum records kept per stream; `None` keeps everything.
    capacity: Option<usize>,
    version: u64,
}

impl StreamStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity_bound(capacity: Option<usize>) -> Self {
        Self {
            capacity: capacity.map(|c| c.max(1)),
            ..Self::default()
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn records(&self, stream: Stream) -> &VecDeque<Record> {
        match stream {
            Stream::Messages => &self.messages,
            Stream::Notifications => &self.notifications,
        }
    }

    pub fn messages(&self) -> &VecDeque<Record> {
        &self.messages
    }

    pub fn notifications(&self) -> &VecDeque<Record> {
        &self.notifications
    }

    pub fn len(&self, stream: Stream) -> usize {
        self.records(stream).len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.notifications.is_empty()
    }

    /// Unread records in `stream`, or across both streams when `None`.
    pub fn count_unread(&self, stream: Option<Stream>) -> usize {
        let unread = |records: &VecDeque<Record>| records.iter().filter(|r| !r.read).count();
        match stream {
            Some(s) => unread(self.records(s)),
            None => unread(&self.messages) + unread(&self.notifications),
        }
    }

    /// Next snapshot: shallow copy of the outer value with a bumped version.
    fn bumped(&self) -> Self {
        Self {
            version: self.version + 1,
            ..self.clone()
        }
    }

    /// Uniquely owned inner collection; copies it if still shared.
    fn records_mut(&mut self, stream: Stream) -> &mut VecDeque<Record> {
        match stream {
            Stream::Messages => Arc::make_mut(&mut self.messages),
            Stream::Notifications => Arc::make_mut(&mut self.notifications),
        }
    }

    #[must_use]
    pub fn append(&self, record: Record, stream: Stream, mode: DisplayMode) -> Self {
        let mut next = self.bumped();
        let capacity = next.capacity;
        let records = next.records_mut(stream);
        match mode {
            DisplayMode::Drawer => records.push_front(record),
            DisplayMode::Inline => records.push_back(record),
        }
        if let Some(cap) = capacity {
            while records.len() > cap {
                let evicted = match mode {
                    DisplayMode::Drawer => records.pop_back(),
                    DisplayMode::Inline => records.pop_front(),
                };
                if let Some(r) = evicted {
                    debug!(?stream, id = ?r.id, "evicted oldest record");
                }
            }
        }
        next
    }

    #[must_use]
    pub fn mark_one_read(&self, stream: Stream, index: usize) -> Self {
        match self.records(stream).get(index) {
            Some(record) if !record.read => {}
            Some(_) => return self.clone(),
            None => {
                debug!(?stream, index, "mark read: index out of range");
                return self.clone();
            }
        }
        let mut next = self.bumped();
        if let Some(record) = next.records_mut(stream).get_mut(index) {
            record.read = true;
        }
        next
    }

    #[must_use]
    pub fn mark_all_read(&self) -> Self {
        let unread_messages = self.count_unread(Some(Stream::Messages)) > 0;
        let unread_notifications = self.count_unread(Some(Stream::Notifications)) > 0;
        if !unread_messages && !unread_notifications {
            return self.clone();
        }
        let mut next = self.bumped();
        for (stream, has_unread) in [
            (Stream::Messages, unread_messages),
            (Stream::Notifications, unread_notifications),
        ] {
            if has_unread {
                next.records_mut(stream).iter_mut().for_each(|r| r.read = true);
            }
        }
        next
    }

    /// Remove a message. Notifications have no removal path.
    #[must_use]
    pub fn dismiss_message(&self, index: usize) -> Self {
        if index >= self.messages.len() {
            debug!(index, "dismiss: index out of range");
            return self.clone();
        }
        let mut next = self.bumped();
        next.records_mut(Stream::Messages).remove(index);
        next
    }
}
