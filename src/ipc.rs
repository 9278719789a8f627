use std::io::BufRead;
use std::os::unix::net::UnixListener;
use std::path::PathBuf;
use std::time::Duration;

use futures::StreamExt;
use futures::channel::mpsc;
use tracing::{info, warn};

use crate::app::Message;
use crate::bridge::FeedAction;
use crate::store::DisplayMode;
use crate::transport::{self, TransportKey};

pub(crate) const SOCKET_NAME: &str = "notify-hud.sock";

pub(crate) fn socket_path() -> PathBuf {
    let runtime_dir = std::env::var("XDG_RUNTIME_DIR").unwrap_or_else(|_| "/tmp".to_string());
    PathBuf::from(runtime_dir).join(SOCKET_NAME)
}

/// Map one control line to an application message.
pub(crate) fn parse_command(line: &str) -> Option<Message> {
    match line.trim() {
        "drawer-toggle" => Some(Message::Feed(FeedAction::ToggleDrawerOpen)),
        "mark-all-read" => Some(Message::Feed(FeedAction::MarkAllAsRead)),
        "mode drawer" => Some(Message::SetMode(DisplayMode::Drawer)),
        "mode inline" => Some(Message::SetMode(DisplayMode::Inline)),
        "reconnect" => Some(Message::Reconnect),
        _ => None,
    }
}

pub(crate) fn socket_listener() -> impl futures::Stream<Item = Message> {
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || {
        let path = socket_path();
        let _ = std::fs::remove_file(&path);
        let listener = match UnixListener::bind(&path) {
            Ok(l) => l,
            Err(e) => {
                warn!("failed to bind socket {path:?}: {e}");
                return;
            }
        };
        info!("listening on {path:?}");
        for stream in listener.incoming().flatten() {
            let mut buf = String::new();
            if std::io::BufReader::new(stream).read_line(&mut buf).is_ok() {
                let Some(msg) = parse_command(&buf) else {
                    warn!("unknown command: {:?}", buf.trim());
                    continue;
                };
                if tx.unbounded_send(msg).is_err() {
                    break;
                }
            }
        }
    });
    rx
}

pub(crate) fn tick_stream(ms: &u64) -> mpsc::UnboundedReceiver<Message> {
    let ms = *ms;
    let (tx, rx) = mpsc::unbounded();
    std::thread::spawn(move || loop {
        std::thread::sleep(Duration::from_millis(ms));
        if tx.unbounded_send(Message::Tick).is_err() {
            break;
        }
    });
    rx
}

// --- Transport subscription bridge ---

pub(crate) fn transport_stream(key: &TransportKey) -> impl futures::Stream<Item = Message> + use<> {
    transport::connect(key).map(Message::Transport)
}
