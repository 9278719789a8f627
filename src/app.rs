use std::time::{Duration, Instant};

use iced::widget::Column;
use iced::{Color, Element, Subscription, Task};
use iced_layershell::build_pattern::daemon;
use iced_layershell::settings::{LayerShellSettings, StartMode};
use iced_layershell::to_layer_message;
use tracing::info;

use crate::bridge::{ActiveSurface, Bridge, FeedAction};
use crate::config::Settings;
use crate::events::{Record, Stream};
use crate::ipc;
use crate::store::DisplayMode;
use crate::surface::settings_for;
use crate::theme::{self, ThemeColors};
use crate::transport::{TransportEvent, TransportKey};
use crate::util;

pub(crate) type IcedId = iced_layershell::reexport::IcedId;

pub(crate) const EDGE_MARGIN: u16 = 16;
pub(crate) const TOAST_TIMEOUT: Duration = Duration::from_secs(8);
pub(crate) const TOAST_EXCERPT_CHARS: usize = 150;

const TICK_MS: u64 = 250;

// --- Feed overlay state ---

pub(crate) struct Feed {
    pub(crate) bridge: Bridge,
    pub(crate) surface_id: Option<IcedId>,
    pub(crate) surface: Option<ActiveSurface>,
    pub(crate) target_output: Option<String>,
    pub(crate) transport_key: TransportKey,
    pub(crate) colors: ThemeColors,
    pub(crate) notifications_expanded: bool,
    pub(crate) messages_expanded: bool,
    pub(crate) menu_open: bool,
    pub(crate) now: Instant,
}

impl Feed {
    fn new(settings: Settings) -> Self {
        if let Some(ref name) = settings.output {
            info!("target screen: {name}");
        }
        Self {
            bridge: Bridge::new(&settings),
            surface_id: None,
            surface: None,
            target_output: settings.output.clone(),
            transport_key: TransportKey {
                uri: settings.uri.clone(),
                ping_interval_ms: settings.ping_interval_ms,
                generation: 0,
            },
            colors: theme::resolve(settings.theme),
            notifications_expanded: false,
            messages_expanded: false,
            menu_open: false,
            now: Instant::now(),
        }
    }

    /// Messages still inside their toast window, with their store index.
    pub(crate) fn visible_toasts(&self) -> Vec<(usize, &Record)> {
        self.bridge
            .context()
            .store
            .messages()
            .iter()
            .enumerate()
            .filter(|(_, r)| self.now.saturating_duration_since(r.received_at) < TOAST_TIMEOUT)
            .collect()
    }

    /// The surface that should be mapped right now, if any. Inline mode
    /// unmaps once every toast has expired and no banner is showing.
    pub(crate) fn desired_surface(&self) -> Option<ActiveSurface> {
        let ctx = self.bridge.context();
        match ctx.surface() {
            ActiveSurface::Inline
                if ctx.error.is_none() && self.visible_toasts().is_empty() =>
            {
                None
            }
            surface => Some(surface),
        }
    }

    /// Reopen the layer surface when the wanted kind changed.
    fn sync_surface(&mut self) -> Task<Message> {
        let desired = self.desired_surface();
        if desired == self.surface {
            return Task::none();
        }
        let remove_task = if let Some(id) = self.surface_id.take() {
            Task::done(Message::RemoveWindow(id))
        } else {
            Task::none()
        };
        info!("surface {:?} -> {:?}", self.surface, desired);
        self.surface = desired;
        let Some(surface) = desired else {
            return remove_task;
        };
        let (id, open_task) =
            Message::layershell_open(settings_for(surface, self.target_output.as_deref()));
        self.surface_id = Some(id);
        Task::batch([remove_task, open_task])
    }

    fn needs_tick(&self) -> bool {
        self.bridge.context().error.is_some() || self.surface == Some(ActiveSurface::Inline)
    }
}

#[to_layer_message(multi)]
#[derive(Debug, Clone)]
pub(crate) enum Message {
    Transport(TransportEvent),
    Feed(FeedAction),
    SetMode(DisplayMode),
    Reconnect,
    ToggleGroup(Stream),
    ToggleMenu,
    OpenSeeAll,
    Tick,
}

pub(crate) fn run(settings: Settings) -> Result<(), iced_layershell::Error> {
    info!(
        "v{} ({}) starting in background mode",
        env!("NOTIFY_HUD_VERSION"),
        env!("NOTIFY_HUD_COMMIT")
    );

    let layer_settings = LayerShellSettings {
        start_mode: StartMode::Background,
        ..Default::default()
    };

    daemon(
        move || Feed::boot(settings.clone()),
        Feed::namespace,
        Feed::update,
        Feed::view,
    )
    .style(Feed::style)
    .subscription(Feed::subscription)
    .layer_settings(layer_settings)
    .run()
}

impl Feed {
    fn boot(settings: Settings) -> (Self, Task<Message>) {
        let mut feed = Self::new(settings);
        let task = feed.sync_surface();
        (feed, task)
    }

    fn namespace() -> String {
        String::from("notify-hud")
    }

    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Transport(event) => {
                self.now = Instant::now();
                self.bridge.on_transport(event);
            }
            Message::Feed(action) => {
                if action == FeedAction::MarkAllAsRead {
                    self.menu_open = false;
                }
                self.bridge.apply(action);
            }
            Message::SetMode(mode) => {
                self.now = Instant::now();
                self.bridge.set_mode(mode);
            }
            Message::Reconnect => {
                self.transport_key.generation += 1;
                info!(
                    generation = self.transport_key.generation,
                    "remounting transport"
                );
            }
            Message::ToggleGroup(stream) => match stream {
                Stream::Notifications => {
                    self.notifications_expanded = !self.notifications_expanded
                }
                Stream::Messages => self.messages_expanded = !self.messages_expanded,
            },
            Message::ToggleMenu => self.menu_open = !self.menu_open,
            Message::OpenSeeAll => {
                self.menu_open = false;
                if let Some(url) = self.bridge.context().app_messages_location {
                    util::open_link(url);
                }
            }
            Message::Tick => {
                self.now = Instant::now();
                self.bridge.expire_banner(self.now);
            }
            _ => {}
        }
        self.sync_surface()
    }

    fn view(&self, window_id: IcedId) -> Element<'_, Message> {
        if self.surface_id != Some(window_id) {
            return Column::new().into();
        }
        match self.surface {
            Some(ActiveSurface::Drawer) => self.view_drawer(),
            Some(ActiveSurface::Inline) => self.view_toasts(),
            Some(ActiveSurface::Toggle) => self.view_toggle(),
            None => Column::new().into(),
        }
    }

    fn subscription(state: &Self) -> Subscription<Message> {
        let mut subs = vec![
            Subscription::run(ipc::socket_listener),
            Subscription::run_with(state.transport_key.clone(), ipc::transport_stream),
        ];

        if state.needs_tick() {
            subs.push(Subscription::run_with(TICK_MS, ipc::tick_stream));
        }

        Subscription::batch(subs)
    }

    fn style(&self, _theme: &iced::Theme) -> iced::theme::Style {
        iced::theme::Style {
            background_color: Color::TRANSPARENT,
            text_color: self.colors.text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Kind;
    use serde_json::json;

    fn feed(mode: DisplayMode) -> Feed {
        Feed::new(Settings {
            mode,
            ..Settings::for_uri("ws://localhost/feed")
        })
    }

    fn frame(variant: &str) -> TransportEvent {
        TransportEvent::Frame(
            json!({
                "timestamp": 0,
                "value": { "value": { "sender": "ops", "message": "m", "variant": variant } }
            })
            .to_string(),
        )
    }

    #[test]
    fn inline_without_toasts_maps_nothing() {
        let feed = feed(DisplayMode::Inline);
        assert_eq!(feed.desired_surface(), None);
    }

    #[test]
    fn inline_message_maps_toast_surface() {
        let mut feed = feed(DisplayMode::Inline);
        feed.bridge.on_transport(frame("message"));
        assert_eq!(feed.desired_surface(), Some(ActiveSurface::Inline));
        assert_eq!(feed.visible_toasts().len(), 1);
    }

    #[test]
    fn inline_notification_shows_no_toast() {
        let mut feed = feed(DisplayMode::Inline);
        feed.bridge.on_transport(frame("alert"));
        assert!(feed.visible_toasts().is_empty());
        assert_eq!(feed.desired_surface(), None);
    }

    #[test]
    fn toasts_expire_without_touching_the_store() {
        let mut feed = feed(DisplayMode::Inline);
        feed.bridge.on_transport(frame("message"));
        feed.now = Instant::now() + TOAST_TIMEOUT;
        assert!(feed.visible_toasts().is_empty());
        assert_eq!(feed.bridge.context().store.len(Stream::Messages), 1);
        assert_eq!(feed.desired_surface(), None);
    }

    #[test]
    fn banner_keeps_inline_surface_mapped() {
        let mut feed = feed(DisplayMode::Inline);
        feed.bridge
            .on_transport(TransportEvent::Error("refused".into()));
        assert_eq!(feed.desired_surface(), Some(ActiveSurface::Inline));
        assert!(feed.needs_tick());
    }

    #[test]
    fn drawer_mode_starts_with_toggle() {
        let mut feed = feed(DisplayMode::Drawer);
        assert_eq!(feed.desired_surface(), Some(ActiveSurface::Toggle));
        feed.bridge.apply(FeedAction::ToggleDrawerOpen);
        assert_eq!(feed.desired_surface(), Some(ActiveSurface::Drawer));
    }

    #[test]
    fn toast_indices_match_store_indices() {
        let mut feed = feed(DisplayMode::Inline);
        feed.bridge.on_transport(frame("message"));
        feed.bridge.on_transport(frame("message"));
        let toasts = feed.visible_toasts();
        assert_eq!(toasts.iter().map(|(i, _)| *i).collect::<Vec<_>>(), [0, 1]);
        assert!(toasts.iter().all(|(_, r)| r.kind == Kind::Default));
    }
}
