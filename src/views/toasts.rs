use iced::widget::text::Shaping;
use iced::widget::{column, container, mouse_area, row, space, text};
use iced::{mouse, Element, Length};

use crate::app::{Feed, Message, TOAST_EXCERPT_CHARS};
use crate::bridge::FeedAction;
use crate::events::Record;
use crate::util;
use crate::views::drawer::{BOLD, ICON_BELL, ICON_CLOSE};

impl Feed {
    /// Connection error banner, when one is raised.
    pub(crate) fn view_banner(&self) -> Option<Element<'_, Message>> {
        let colors = &self.colors;
        let banner = self.bridge.context().error?;
        Some(
            container(
                row![
                    text(&banner.text)
                        .size(colors.body_text)
                        .color(colors.error)
                        .font(BOLD),
                    space::horizontal(),
                    mouse_area(text(ICON_CLOSE).size(colors.body_text).color(colors.error))
                        .on_press(Message::Feed(FeedAction::DismissError))
                        .interaction(mouse::Interaction::Pointer),
                ]
                .align_y(iced::Alignment::Center),
            )
            .padding(8)
            .width(Length::Fill)
            .style(colors.banner_style())
            .into(),
        )
    }

    /// Inline mode: one toast per message still inside its display window.
    pub(crate) fn view_toasts(&self) -> Element<'_, Message> {
        let mut col = column![].spacing(8).width(Length::Fill);
        if let Some(banner) = self.view_banner() {
            col = col.push(banner);
        }
        for (idx, record) in self.visible_toasts() {
            col = col.push(self.view_toast(idx, record));
        }
        col.into()
    }

    fn view_toast<'a>(&'a self, idx: usize, record: &'a Record) -> Element<'a, Message> {
        let colors = &self.colors;
        let ctx = self.bridge.context();
        let strings = ctx.lang.strings();

        let title = util::sender_or(&record.sender, strings.unknown_sender);
        let header = row![
            text(title)
                .size(colors.title_text)
                .color(colors.kind_color(record.kind))
                .font(BOLD),
            space::horizontal(),
            mouse_area(text(ICON_CLOSE).size(colors.body_text).color(colors.muted))
                .on_press(Message::Feed(FeedAction::DismissMessage(idx)))
                .interaction(mouse::Interaction::Pointer),
        ]
        .align_y(iced::Alignment::Center);

        let mut body = column![
            header,
            text(&record.timestamp)
                .size(colors.meta_text)
                .color(colors.muted),
            text(util::excerpt(&record.message, TOAST_EXCERPT_CHARS))
                .size(colors.body_text)
                .color(colors.text)
                .shaping(Shaping::Advanced),
        ]
        .spacing(4);

        if ctx.app_messages_location.is_some() {
            body = body.push(
                mouse_area(text(strings.more).size(colors.body_text).color(colors.link))
                    .on_press(Message::OpenSeeAll)
                    .interaction(mouse::Interaction::Pointer),
            );
        }

        container(body)
            .padding(10)
            .width(Length::Fill)
            .style(colors.toast_style(record.kind))
            .into()
    }

    /// Drawer mode with the drawer closed: bell button with the unread count.
    pub(crate) fn view_toggle(&self) -> Element<'_, Message> {
        let colors = &self.colors;
        let unread = self.bridge.context().unread();

        let mut bell = row![
            text(ICON_BELL)
                .size(colors.title_text)
                .color(colors.text)
                .shaping(Shaping::Advanced)
        ]
        .spacing(6)
        .align_y(iced::Alignment::Center);
        if unread > 0 {
            bell = bell.push(
                container(text(unread.to_string()).size(colors.meta_text))
                    .padding([1, 6])
                    .style(colors.badge_style()),
            );
        }

        let button = mouse_area(container(bell).padding(8).style(colors.panel_style()))
            .on_press(Message::Feed(FeedAction::ToggleDrawerOpen))
            .interaction(mouse::Interaction::Pointer);

        let mut col = column![row![space::horizontal(), button]].spacing(8);
        if let Some(banner) = self.view_banner() {
            col = col.push(banner);
        }
        col.width(Length::Fill).into()
    }
}
