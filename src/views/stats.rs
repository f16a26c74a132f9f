use iced::{
    Alignment, Element, Length,
    widget::{column, container, row, space, text},
};

use crate::app::message::Message;
use crate::core::model::DashboardStats;
use crate::styles::{self, font_size, spacing};

pub fn view<'a>(stats: &DashboardStats) -> Element<'a, Message> {
    row![
        stat_card("Total Profiles", stats.total_profiles),
        stat_card("Active Profiles", stats.active_profiles),
        stat_card("Total Users", stats.total_users),
        stat_card("Active Users", stats.active_users),
    ]
    .spacing(spacing::MD)
    .width(Length::Fill)
    .into()
}

fn stat_card<'a>(label: &'a str, value: u64) -> Element<'a, Message> {
    let accent_bar = container(space().width(4).height(Length::Fill))
        .style(styles::stat_card_accent_left)
        .height(Length::Fill);

    let card_content = column![
        text(value.to_string()).size(font_size::DISPLAY),
        text(label).size(font_size::SMALL),
    ]
    .spacing(spacing::XXS)
    .align_x(Alignment::Center)
    .width(Length::Fill);

    container(
        row![accent_bar, container(card_content).padding(spacing::LG)]
            .height(Length::Shrink)
            .width(Length::Fill),
    )
    .style(styles::card)
    .width(Length::Fill)
    .into()
}
