//! State owner between the feed core and the views.
//!
//! Views never see the store mutably: they read a [`FeedContext`] and emit
//! [`FeedAction`]s, which [`Bridge::apply`] turns into new store snapshots.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::classify;
use crate::config::Settings;
use crate::error::{FeedError, Result};
use crate::events::Stream;
use crate::i18n::Lang;
use crate::store::{DisplayMode, StreamStore};
use crate::transport::{ConnectionState, TransportEvent};

pub const BANNER_TIMEOUT: Duration = Duration::from_secs(5);

/// Mutation callbacks available to views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedAction {
    ToggleReadMessage(usize),
    ToggleReadNotification(usize),
    MarkAllAsRead,
    ToggleDrawerOpen,
    DismissMessage(usize),
    DismissError,
}

/// Which view the overlay should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveSurface {
    /// Drawer mode, drawer open.
    Drawer,
    /// Inline mode, regardless of the drawer flag.
    Inline,
    /// Drawer mode, drawer closed: only the toggle button.
    Toggle,
}

#[derive(Debug, Clone)]
pub struct Banner {
    pub text: String,
    pub raised_at: Instant,
}

#[derive(Debug, Clone, Default)]
pub struct FeedState {
    pub store: StreamStore,
    pub drawer_open: bool,
    pub mode: DisplayMode,
    pub connection: ConnectionState,
    pub error: Option<Banner>,
}

/// Read-only view handed to consumers.
#[derive(Debug, Clone, Copy)]
pub struct FeedContext<'a> {
    pub store: &'a StreamStore,
    pub mode: DisplayMode,
    pub drawer_open: bool,
    pub connection: ConnectionState,
    pub error: Option<&'a Banner>,
    pub lang: Lang,
    pub app_messages_location: Option<&'a str>,
}

impl FeedContext<'_> {
    pub fn unread(&self) -> usize {
        self.store.count_unread(None)
    }

    pub fn unread_messages(&self) -> usize {
        self.store.count_unread(Some(Stream::Messages))
    }

    pub fn unread_notifications(&self) -> usize {
        self.store.count_unread(Some(Stream::Notifications))
    }

    pub fn surface(&self) -> ActiveSurface {
        match (self.mode, self.drawer_open) {
            (DisplayMode::Inline, _) => ActiveSurface::Inline,
            (DisplayMode::Drawer, true) => ActiveSurface::Drawer,
            (DisplayMode::Drawer, false) => ActiveSurface::Toggle,
        }
    }
}

pub struct Bridge {
    state: FeedState,
    lang: Lang,
    app_messages_location: Option<String>,
}

impl Bridge {
    pub fn new(settings: &Settings) -> Self {
        Self {
            state: FeedState {
                store: StreamStore::with_capacity_bound(settings.max_records_per_stream),
                mode: settings.mode,
                ..FeedState::default()
            },
            lang: settings.lang,
            app_messages_location: settings.app_messages_location.clone(),
        }
    }

    pub fn context(&self) -> FeedContext<'_> {
        FeedContext {
            store: &self.state.store,
            mode: self.state.mode,
            drawer_open: self.state.drawer_open,
            connection: self.state.connection,
            error: self.state.error.as_ref(),
            lang: self.lang,
            app_messages_location: self.app_messages_location.as_deref(),
        }
    }

    pub fn apply(&mut self, action: FeedAction) {
        let store = &self.state.store;
        let next = match action {
            FeedAction::ToggleReadMessage(idx) => store.mark_one_read(Stream::Messages, idx),
            FeedAction::ToggleReadNotification(idx) => {
                store.mark_one_read(Stream::Notifications, idx)
            }
            FeedAction::MarkAllAsRead => store.mark_all_read(),
            FeedAction::DismissMessage(idx) => store.dismiss_message(idx),
            FeedAction::ToggleDrawerOpen => {
                self.state.drawer_open = !self.state.drawer_open;
                debug!(open = self.state.drawer_open, "drawer toggled");
                return;
            }
            FeedAction::DismissError => {
                self.state.error = None;
                return;
            }
        };
        self.state.store = next;
    }

    /// Classify one raw frame and install the resulting snapshot.
    ///
    /// A malformed frame is logged and dropped; the store is left untouched.
    pub fn ingest(&mut self, raw: &str) -> Result<Stream> {
        match classify::classify(raw, self.lang) {
            Ok(classified) => {
                let stream = classified.stream;
                self.state.store = self
                    .state
                    .store
                    .append(classified.record, stream, self.state.mode);
                debug!(?stream, version = self.state.store.version(), "record ingested");
                Ok(stream)
            }
            Err(e) => {
                warn!("dropping frame: {e}");
                Err(e)
            }
        }
    }

    pub fn on_transport(&mut self, event: TransportEvent) {
        self.state.connection = self.state.connection.on_event(&event);
        match event {
            TransportEvent::Frame(raw) => {
                let _ = self.ingest(&raw);
            }
            TransportEvent::Error(detail) => {
                let err = FeedError::Connection(detail);
                warn!("{err}");
                self.raise(self.lang.strings().connection_error);
            }
            TransportEvent::Open => info!("feed open"),
            TransportEvent::Closed => info!("feed closed"),
            TransportEvent::Connecting => {}
        }
    }

    /// External prop: switch between drawer and inline rendering.
    pub fn set_mode(&mut self, mode: DisplayMode) {
        if self.state.mode != mode {
            info!(?mode, "display mode changed");
            self.state.mode = mode;
        }
    }

    fn raise(&mut self, text: &str) {
        self.state.error = Some(Banner {
            text: text.to_string(),
            raised_at: Instant::now(),
        });
    }

    /// Drop the error banner once it has been visible for [`BANNER_TIMEOUT`].
    pub fn expire_banner(&mut self, now: Instant) {
        if self
            .state
            .error
            .as_ref()
            .is_some_and(|b| now.duration_since(b.raised_at) >= BANNER_TIMEOUT)
        {
            self.state.error = None;
        }
    }
}
