use std::str::FromStr;

use iced::{Background, Border, Color};
use serde::Deserialize;

use crate::events::Kind;

/// How the theme is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Dark,
    Light,
}

impl FromStr for ThemeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(ThemeMode::Dark),
            "light" => Ok(ThemeMode::Light),
            other => Err(format!("unknown theme {other:?} (expected dark or light)")),
        }
    }
}

/// All colors and font sizes used by the drawer and toasts.
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Text
    pub text: Color,
    pub muted: Color,
    pub link: Color,
    pub error: Color,
    // Backgrounds
    pub panel_bg: Color,
    pub unread_bg: Color,
    pub badge_bg: Color,
    pub banner_bg: Color,
    // Record kinds
    pub success: Color,
    pub danger: Color,
    pub warning: Color,
    pub info: Color,
    // Font sizes (logical pixels)
    pub title_text: f32,
    pub body_text: f32,
    pub meta_text: f32,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            text: Color::from_rgba(1.0, 1.0, 1.0, 0.9),
            muted: Color::from_rgba(1.0, 1.0, 1.0, 0.5),
            link: Color::from_rgb(0.45, 0.7, 1.0),
            error: Color::from_rgb(0.9, 0.2, 0.2),
            panel_bg: Color::from_rgba(0.05, 0.05, 0.08, 0.92),
            unread_bg: Color::from_rgba(0.15, 0.15, 0.22, 0.8),
            badge_bg: Color::from_rgb(0.85, 0.2, 0.25),
            banner_bg: Color::from_rgba(0.35, 0.05, 0.05, 0.95),
            success: Color::from_rgb(0.3, 0.8, 0.45),
            danger: Color::from_rgb(0.95, 0.3, 0.3),
            warning: Color::from_rgb(1.0, 0.7, 0.15),
            info: Color::from_rgb(0.35, 0.65, 1.0),
            title_text: 16.0,
            body_text: 13.0,
            meta_text: 10.0,
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color::from_rgba(0.08, 0.08, 0.08, 0.9),
            muted: Color::from_rgba(0.35, 0.35, 0.35, 0.8),
            link: Color::from_rgb(0.1, 0.35, 0.8),
            error: Color::from_rgb(0.75, 0.1, 0.1),
            panel_bg: Color::from_rgba(0.95, 0.95, 0.97, 0.95),
            unread_bg: Color::from_rgba(0.85, 0.88, 0.95, 0.9),
            badge_bg: Color::from_rgb(0.8, 0.1, 0.15),
            banner_bg: Color::from_rgba(0.98, 0.85, 0.85, 0.97),
            success: Color::from_rgb(0.1, 0.55, 0.25),
            danger: Color::from_rgb(0.75, 0.1, 0.1),
            warning: Color::from_rgb(0.7, 0.4, 0.0),
            info: Color::from_rgb(0.1, 0.4, 0.8),
            title_text: 16.0,
            body_text: 13.0,
            meta_text: 10.0,
        }
    }

    /// Accent color for a record kind; `Default` uses the muted text color.
    pub fn kind_color(&self, kind: Kind) -> Color {
        match kind {
            Kind::Default => self.muted,
            Kind::Success => self.success,
            Kind::Danger => self.danger,
            Kind::Warning => self.warning,
            Kind::Info => self.info,
        }
    }

    pub fn panel_style(&self) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let color = self.panel_bg;
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(color)),
            border: Border {
                radius: 6.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn unread_style(&self) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let color = self.unread_bg;
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(color)),
            ..Default::default()
        }
    }

    /// Toast card bordered in the record's kind color.
    pub fn toast_style(&self, kind: Kind) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let background = self.panel_bg;
        let accent = self.kind_color(kind);
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(background)),
            border: Border {
                color: accent,
                width: 1.5,
                radius: 6.0.into(),
            },
            ..Default::default()
        }
    }

    pub fn badge_style(&self) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let color = self.badge_bg;
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(color)),
            text_color: Some(Color::WHITE),
            border: Border {
                radius: 8.0.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn banner_style(&self) -> impl Fn(&iced::Theme) -> iced::widget::container::Style {
        let background = self.banner_bg;
        let border = self.error;
        move |_theme: &iced::Theme| iced::widget::container::Style {
            background: Some(Background::Color(background)),
            border: Border {
                color: border,
                width: 1.0,
                radius: 4.0.into(),
            },
            ..Default::default()
        }
    }
}

pub fn resolve(mode: ThemeMode) -> ThemeColors {
    match mode {
        ThemeMode::Dark => ThemeColors::dark(),
        ThemeMode::Light => ThemeColors::light(),
    }
}
