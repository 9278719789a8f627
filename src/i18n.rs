use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Locale, TimeZone};
use serde::Deserialize;

/// Display language. Affects timestamp formatting and the bundled strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    #[default]
    En,
    Fr,
}

impl Lang {
    pub fn strings(self) -> &'static Strings {
        match self {
            Lang::En => &EN,
            Lang::Fr => &FR,
        }
    }

    fn locale(self) -> Locale {
        match self {
            Lang::En => Locale::en_US,
            Lang::Fr => Locale::fr_FR,
        }
    }

    /// Long date-time pattern, e.g. `October 18, 2026 3:04 PM`.
    fn long_datetime_pattern(self) -> &'static str {
        match self {
            Lang::En => "%B %-d, %Y %-I:%M %p",
            Lang::Fr => "%-d %B %Y %H:%M",
        }
    }

    pub fn format_timestamp<Tz>(self, instant: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        instant
            .format_localized(self.long_datetime_pattern(), self.locale())
            .to_string()
    }
}

impl FromStr for Lang {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Lang::En),
            "fr" => Ok(Lang::Fr),
            other => Err(format!("unsupported language {other:?} (expected en or fr)")),
        }
    }
}

/// User-visible strings for one language.
pub struct Strings {
    pub unread: &'static str,
    pub see_all: &'static str,
    pub mark_all_read: &'static str,
    pub notifications: &'static str,
    pub messages: &'static str,
    pub no_notifications: &'static str,
    pub no_notifications_body: &'static str,
    pub no_messages: &'static str,
    pub no_messages_body: &'static str,
    pub connection_error: &'static str,
    pub more: &'static str,
    pub unknown_sender: &'static str,
}

static EN: Strings = Strings {
    unread: " unread",
    see_all: "See all",
    mark_all_read: "Mark all as read",
    notifications: "Notifications",
    messages: "Messages",
    no_notifications: "No notifications",
    no_notifications_body: "There are currently no notifications alerts for you at the moment.",
    no_messages: "No messages",
    no_messages_body: "There are currently no messages alerts for you at the moment.",
    connection_error: "Connection Error reconnecting...",
    more: "More...",
    unknown_sender: "NAN",
};

static FR: Strings = Strings {
    unread: " non lu",
    see_all: "Voir tout",
    mark_all_read: "Marquer tous comme lu",
    notifications: "Notifications",
    messages: "Messages",
    no_notifications: "Aucune notification",
    no_notifications_body: "Il n'y a actuellement aucune alerte de notification pour vous à l'instant.",
    no_messages: "Aucun message",
    no_messages_body: "Il n'y a actuellement aucune alerte de message pour vous à l'instant.",
    connection_error: "Erreur de connexion, reconnexion...",
    more: "Plus...",
    unknown_sender: "NAN",
};
