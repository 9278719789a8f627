use iced::widget::text::Shaping;
use iced::widget::{column, container, mouse_area, row, scrollable, space, text};
use iced::{mouse, Element, Font, Length};

use crate::app::{Feed, Message};
use crate::bridge::FeedAction;
use crate::events::{Kind, Record, Stream};
use crate::i18n::Strings;

pub(crate) const ICON_BELL: &str = "\u{1f514}";
const ICON_INFO: &str = "\u{2139}";
const ICON_WARNING: &str = "\u{26a0}";
const ICON_ENVELOPE: &str = "\u{2709}";
const ICON_ENVELOPE_OPEN: &str = "\u{1f4ed}";
const ICON_MENU: &str = "\u{22ee}";
pub(crate) const ICON_CLOSE: &str = "\u{2715}";

pub(crate) const BOLD: Font = Font {
    weight: iced::font::Weight::Bold,
    ..Font::DEFAULT
};

pub(crate) fn notification_icon(kind: Kind) -> &'static str {
    match kind {
        Kind::Info => ICON_INFO,
        Kind::Danger => ICON_WARNING,
        _ => ICON_BELL,
    }
}

pub(crate) fn message_icon(read: bool) -> &'static str {
    if read { ICON_ENVELOPE_OPEN } else { ICON_ENVELOPE }
}

fn empty_state(stream: Stream, strings: &Strings) -> (&'static str, &'static str, &'static str) {
    match stream {
        Stream::Notifications => (
            ICON_BELL,
            strings.no_notifications,
            strings.no_notifications_body,
        ),
        Stream::Messages => (ICON_ENVELOPE, strings.no_messages, strings.no_messages_body),
    }
}

impl Feed {
    pub(crate) fn view_drawer(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let ctx = self.bridge.context();
        let strings = ctx.lang.strings();
        let shaped = Shaping::Advanced;

        let clickable = |label: &'static str, msg: Message| {
            mouse_area(
                text(label)
                    .size(colors.title_text)
                    .color(colors.text)
                    .shaping(shaped),
            )
            .on_press(msg)
            .interaction(mouse::Interaction::Pointer)
        };

        // --- Header: unread count, menu, close ---
        let header = row![
            text(strings.notifications)
                .size(colors.title_text)
                .color(colors.text)
                .font(BOLD),
            text(format!("  {}{}", ctx.unread(), strings.unread))
                .size(colors.meta_text)
                .color(colors.muted),
            space::horizontal(),
            clickable(ICON_MENU, Message::ToggleMenu),
            text("  "),
            clickable(ICON_CLOSE, Message::Feed(FeedAction::ToggleDrawerOpen)),
        ]
        .align_y(iced::Alignment::Center);

        let mut panel = column![header].spacing(8);

        if self.menu_open {
            let mut menu = column![].spacing(6);
            if ctx.app_messages_location.is_some() {
                menu = menu.push(
                    mouse_area(
                        text(strings.see_all)
                            .size(colors.body_text)
                            .color(colors.link),
                    )
                    .on_press(Message::OpenSeeAll)
                    .interaction(mouse::Interaction::Pointer),
                );
            }
            menu = menu.push(
                mouse_area(
                    text(strings.mark_all_read)
                        .size(colors.body_text)
                        .color(colors.text),
                )
                .on_press(Message::Feed(FeedAction::MarkAllAsRead))
                .interaction(mouse::Interaction::Pointer),
            );
            panel = panel.push(
                container(menu)
                    .padding(8)
                    .width(Length::Fill)
                    .style(colors.unread_style()),
            );
        }

        let groups = column![
            self.view_group(Stream::Notifications, self.notifications_expanded),
            self.view_group(Stream::Messages, self.messages_expanded),
        ]
        .spacing(10);

        panel = panel.push(scrollable(groups).height(Length::Fill));

        let mut content = column![].spacing(8);
        if let Some(banner) = self.view_banner() {
            content = content.push(banner);
        }
        content = content.push(
            container(panel)
                .padding(12)
                .width(Length::Fill)
                .height(Length::Fill)
                .style(colors.panel_style()),
        );
        content.width(Length::Fill).height(Length::Fill).into()
    }

    fn view_group(&self, stream: Stream, expanded: bool) -> Element<'_, Message> {
        let colors = &self.colors;
        let ctx = self.bridge.context();
        let strings = ctx.lang.strings();
        let records = ctx.store.records(stream);
        let all_read = match stream {
            Stream::Notifications => ctx.unread_notifications() == 0,
            Stream::Messages => ctx.unread_messages() == 0,
        };

        let title = match stream {
            Stream::Notifications => strings.notifications,
            Stream::Messages => strings.messages,
        };
        let chevron = if expanded { "\u{25be}" } else { "\u{25b8}" };
        let title_color = if all_read { colors.muted } else { colors.text };

        let group_header = mouse_area(
            row![
                text(format!("{chevron} ")).size(colors.body_text).color(title_color),
                text(title).size(colors.body_text).color(title_color).font(BOLD),
                space::horizontal(),
                container(text(records.len().to_string()).size(colors.meta_text))
                    .padding([1, 6])
                    .style(colors.badge_style()),
            ]
            .align_y(iced::Alignment::Center),
        )
        .on_press(Message::ToggleGroup(stream))
        .interaction(mouse::Interaction::Pointer);

        let mut group = column![group_header].spacing(4);
        if !expanded {
            return group.into();
        }

        if records.is_empty() {
            let (icon, heading, body) = empty_state(stream, strings);
            group = group.push(
                container(
                    column![
                        text(icon).size(colors.title_text * 1.5).shaping(Shaping::Advanced),
                        text(heading).size(colors.title_text).color(colors.text),
                        text(body).size(colors.body_text).color(colors.muted),
                    ]
                    .spacing(6)
                    .align_x(iced::Alignment::Center),
                )
                .padding(16)
                .center_x(Length::Fill),
            );
            return group.into();
        }

        for (idx, record) in records.iter().enumerate() {
            let action = match stream {
                Stream::Notifications => FeedAction::ToggleReadNotification(idx),
                Stream::Messages => FeedAction::ToggleReadMessage(idx),
            };
            group = group.push(
                mouse_area(self.view_item(stream, record))
                    .on_press(Message::Feed(action))
                    .interaction(mouse::Interaction::Pointer),
            );
        }
        group.into()
    }

    fn view_item<'a>(&'a self, stream: Stream, record: &'a Record) -> Element<'a, Message> {
        let colors = &self.colors;
        let icon = match stream {
            Stream::Notifications => notification_icon(record.kind),
            Stream::Messages => message_icon(record.read),
        };
        let accent = colors.kind_color(record.kind);

        let item = column![
            row![
                text(format!("{icon} "))
                    .size(colors.body_text)
                    .color(accent)
                    .shaping(Shaping::Advanced),
                text(&record.sender)
                    .size(colors.body_text)
                    .color(colors.text)
                    .font(BOLD),
            ],
            text(&record.message)
                .size(colors.body_text)
                .color(colors.text)
                .shaping(Shaping::Advanced),
            text(&record.timestamp)
                .size(colors.meta_text)
                .color(colors.muted),
        ]
        .spacing(2);

        let item = container(item).padding(8).width(Length::Fill);
        if record.read {
            item.into()
        } else {
            item.style(colors.unread_style()).into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Lang;

    #[test]
    fn notification_icons_follow_kind() {
        assert_eq!(notification_icon(Kind::Info), ICON_INFO);
        assert_eq!(notification_icon(Kind::Danger), ICON_WARNING);
        assert_eq!(notification_icon(Kind::Success), ICON_BELL);
        assert_eq!(notification_icon(Kind::Default), ICON_BELL);
    }

    #[test]
    fn message_icons_follow_read_state() {
        assert_eq!(message_icon(false), ICON_ENVELOPE);
        assert_eq!(message_icon(true), ICON_ENVELOPE_OPEN);
    }

    #[test]
    fn empty_state_is_localized() {
        let (_, heading, _) = empty_state(Stream::Messages, Lang::Fr.strings());
        assert_eq!(heading, "Aucun message");
        let (icon, heading, _) = empty_state(Stream::Notifications, Lang::En.strings());
        assert_eq!(icon, ICON_BELL);
        assert_eq!(heading, "No notifications");
    }
}
