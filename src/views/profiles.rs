use std::collections::HashSet;

use iced::{
    Alignment, Element, Length, Theme,
    widget::{button, column, container, pick_list, row, scrollable, space, text, text_input},
};

use crate::app::message::{Message, ProfilesMessage};
use crate::core::{
    filter::{ProfileFilter, StatusFilter},
    model::{self, PortalUser, Profile, ProfileId},
};
use crate::styles::{self, font_size, spacing};

/// Renderer-side state: the profile snapshot, the live filter inputs,
/// and which cards have their user list expanded.
#[derive(Debug, Default)]
pub struct ProfilesState {
    pub profiles: Vec<Profile>,
    pub loading: bool,
    pub loaded: bool,
    pub expanded: HashSet<ProfileId>,
    /// Live text-input value; the applied filter lags behind it by the
    /// debounce interval.
    pub query_input: String,
    pub filter: ProfileFilter,
    pub filter_epoch: u64,
}

impl ProfilesState {
    /// Replace the snapshot after a full reload. Expansion state does
    /// not survive a reload.
    pub fn apply_snapshot(&mut self, profiles: Vec<Profile>) {
        self.profiles = profiles;
        self.loaded = true;
        self.expanded.clear();
    }
}

pub fn view<'a>(state: &'a ProfilesState, toggling: &'a Option<String>) -> Element<'a, Message> {
    let search = text_input("Search customers...", &state.query_input)
        .on_input(|query| Message::Profiles(ProfilesMessage::QueryChanged(query)))
        .padding(10)
        .size(font_size::BODY)
        .width(Length::FillPortion(3));

    let status = pick_list(&StatusFilter::ALL[..], Some(state.filter.status), |status| {
        Message::Profiles(ProfilesMessage::StatusChanged(status))
    })
    .width(Length::FillPortion(1));

    let filter_row = row![search, status]
        .spacing(spacing::MD)
        .align_y(Alignment::Center)
        .width(Length::Fill);

    let content: Element<'_, Message> = if state.loading {
        container(text("Loading customer profiles...").size(font_size::BODY))
            .center_x(Length::Fill)
            .center_y(Length::Fill)
            .into()
    } else if state.profiles.is_empty() {
        if state.loaded {
            empty_state()
        } else {
            container(text("Loading...").size(font_size::BODY))
                .center_x(Length::Fill)
                .center_y(Length::Fill)
                .into()
        }
    } else {
        let cards: Vec<Element<'_, Message>> = state
            .profiles
            .iter()
            .filter(|profile| state.filter.matches(profile))
            .map(|profile| profile_card(profile, state.expanded.contains(&profile.name), toggling))
            .collect();

        scrollable(column(cards).spacing(spacing::SM).width(Length::Fill)).height(Length::Fill).into()
    };

    column![filter_row, content]
        .spacing(spacing::MD)
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
}

fn empty_state<'a>() -> Element<'a, Message> {
    container(
        column![
            text("\u{2205}").size(font_size::DISPLAY * 1.5),
            text("No customer profiles found").size(font_size::TITLE),
            text("Create a new profile to get started.").size(font_size::SMALL),
            button(text("Create Profile").size(font_size::SMALL).center())
                .padding([spacing::SM, spacing::LG])
                .style(button::primary)
                .on_press(Message::NewProfile),
        ]
        .spacing(spacing::MD)
        .align_x(Alignment::Center),
    )
    .center_x(Length::Fill)
    .center_y(Length::Fill)
    .into()
}

fn profile_card<'a>(
    profile: &'a Profile,
    expanded: bool,
    toggling: &'a Option<String>,
) -> Element<'a, Message> {
    let name_block = column![
        text(profile.company_name.as_str()).size(font_size::HEADING),
        status_badge(profile.enabled),
    ]
    .spacing(spacing::XXS);

    let edit_btn = button(text("Edit").size(font_size::CAPTION + 1.0).center())
        .padding([spacing::XXS, spacing::MD])
        .style(styles::ghost_button)
        .on_press(Message::Profiles(ProfilesMessage::EditProfile(
            profile.name.clone(),
        )));

    let add_user_btn = button(text("Add User").size(font_size::CAPTION + 1.0).center())
        .padding([spacing::XXS, spacing::MD])
        .style(styles::outlined_button)
        .on_press(Message::Profiles(ProfilesMessage::AddUser {
            customer: profile.customer.clone(),
        }));

    let toggle_btn = toggle_button(
        profile.enabled,
        toggling,
        &profile.name,
        Message::Profiles(ProfilesMessage::ToggleProfile {
            profile: profile.name.clone(),
            company_name: profile.company_name.clone(),
            enable: !profile.enabled,
        }),
    );

    let header = row![
        monogram_avatar(&profile.company_name, 44.0, font_size::HEADING),
        name_block,
        space().width(Length::Fill),
        row![edit_btn, add_user_btn, toggle_btn]
            .spacing(spacing::XS)
            .align_y(Alignment::Center),
    ]
    .spacing(spacing::MD)
    .align_y(Alignment::Center);

    let commercial = column![
        info_row("Commercial Reg.", model::text_or_dash(&profile.commercial_number)),
        info_row("Tax ID", model::text_or_dash(&profile.tax_id)),
    ]
    .spacing(spacing::XXS);

    let users_toggle_label = if expanded { "Hide Users" } else { "Show Users" };
    let count_row = row![
        text(format!(
            "{} Users ({} active)",
            profile.user_count, profile.active_user_count
        ))
        .size(font_size::SMALL),
        space().width(Length::Fill),
        button(text(users_toggle_label).size(font_size::CAPTION + 1.0).center())
            .padding([spacing::XXS, spacing::MD])
            .style(styles::outlined_button)
            .on_press(Message::Profiles(ProfilesMessage::ToggleUsers(
                profile.name.clone(),
            ))),
    ]
    .align_y(Alignment::Center);

    let mut body = column![header, commercial, count_row].spacing(spacing::MD);

    if expanded {
        body = body.push(users_section(&profile.users, toggling));
    }

    let card_style: fn(&Theme) -> container::Style = if profile.enabled {
        styles::card
    } else {
        styles::card_muted
    };

    container(body)
        .padding(spacing::LG)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn users_section<'a>(
    users: &'a [PortalUser],
    toggling: &'a Option<String>,
) -> Element<'a, Message> {
    if users.is_empty() {
        return container(text("No users assigned").size(font_size::SMALL))
            .center_x(Length::Fill)
            .padding(spacing::MD)
            .into();
    }

    let cards: Vec<Element<'_, Message>> =
        users.iter().map(|user| user_card(user, toggling)).collect();

    column(cards).spacing(spacing::SM).width(Length::Fill).into()
}

fn user_card<'a>(user: &'a PortalUser, toggling: &'a Option<String>) -> Element<'a, Message> {
    let meta = row![
        container(text(user.role_label()).size(font_size::BADGE))
            .padding([spacing::XXXS, spacing::XS])
            .style(styles::badge_neutral),
        text(user.start_date_label()).size(font_size::CAPTION),
    ]
    .spacing(spacing::SM)
    .align_y(Alignment::Center);

    let details = column![
        text(user.full_name.as_str()).size(font_size::BODY),
        text(user.email()).size(font_size::CAPTION),
        meta,
        module_tag_row(user),
    ]
    .spacing(spacing::XXS)
    .width(Length::Fill);

    let edit_btn = button(text("Edit").size(font_size::CAPTION + 1.0).center())
        .padding([spacing::XXS, spacing::MD])
        .style(styles::ghost_button)
        .on_press(Message::Profiles(ProfilesMessage::EditUser(
            user.name.clone(),
        )));

    let toggle_btn = toggle_button(
        user.enabled,
        toggling,
        &user.name,
        Message::Profiles(ProfilesMessage::ToggleUser {
            user: user.name.clone(),
            full_name: user.full_name.clone(),
            enable: !user.enabled,
        }),
    );

    let content = row![
        monogram_avatar(&user.full_name, 32.0, font_size::SMALL),
        details,
        status_badge(user.enabled),
        edit_btn,
        toggle_btn,
    ]
    .spacing(spacing::MD)
    .align_y(Alignment::Center);

    let card_style: fn(&Theme) -> container::Style = if user.enabled {
        styles::card
    } else {
        styles::card_muted
    };

    container(content)
        .padding(spacing::MD)
        .width(Length::Fill)
        .style(card_style)
        .into()
}

fn module_tag_row<'a>(user: &'a PortalUser) -> Element<'a, Message> {
    let (tags, overflow) = model::module_tags(&user.modules);

    if tags.is_empty() {
        return text("No modules").size(font_size::CAPTION).into();
    }

    let mut parts: Vec<Element<'_, Message>> = tags
        .into_iter()
        .map(|tag| {
            container(text(tag).size(font_size::BADGE))
                .padding([spacing::XXXS, spacing::XS])
                .style(styles::badge_primary)
                .into()
        })
        .collect();

    if let Some(more) = overflow {
        parts.push(
            container(text(format!("+{more}")).size(font_size::BADGE))
                .padding([spacing::XXXS, spacing::XS])
                .style(styles::badge_neutral)
                .into(),
        );
    }

    row(parts).spacing(spacing::XXS).align_y(Alignment::Center).into()
}

/// Enable/disable control. Shows a busy label for the in-flight record
/// and withholds `on_press` while any toggle is pending.
fn toggle_button<'a>(
    enabled: bool,
    toggling: &'a Option<String>,
    record: &str,
    on_press: Message,
) -> Element<'a, Message> {
    if toggling.as_deref() == Some(record) {
        return button(text("Working...").size(font_size::CAPTION + 1.0).center())
            .padding([spacing::XXS, spacing::MD])
            .style(button::secondary)
            .into();
    }

    let label = if enabled { "Disable" } else { "Enable" };
    let mut btn = button(text(label).size(font_size::CAPTION + 1.0).center())
        .padding([spacing::XXS, spacing::MD]);

    btn = if enabled {
        btn.style(styles::pill_button_danger)
    } else {
        btn.style(styles::outlined_button)
    };

    if toggling.is_none() {
        btn = btn.on_press(on_press);
    }

    btn.into()
}

fn status_badge<'a>(enabled: bool) -> Element<'a, Message> {
    let style: fn(&Theme) -> container::Style = if enabled {
        styles::badge_success
    } else {
        styles::badge_danger
    };

    container(text(model::status_label(enabled)).size(font_size::BADGE))
        .padding([spacing::XXXS, spacing::XS])
        .style(style)
        .into()
}

fn info_row<'a>(label: &'a str, value: &'a str) -> Element<'a, Message> {
    row![
        text(label).size(font_size::CAPTION),
        space().width(Length::Fill),
        text(value).size(font_size::SMALL),
    ]
    .align_y(Alignment::Center)
    .into()
}

fn monogram_avatar<'a>(name: &str, side: f32, size: f32) -> Element<'a, Message> {
    container(text(monogram(name)).size(size))
        .width(side)
        .height(side)
        .align_x(Alignment::Center)
        .align_y(Alignment::Center)
        .style(styles::avatar)
        .into()
}

/// Up to two initials, uppercased; "?" when the name is empty.
fn monogram(name: &str) -> String {
    let initials: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .collect();

    if initials.is_empty() {
        "?".to_string()
    } else {
        initials.to_uppercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monogram_takes_two_initials() {
        assert_eq!(monogram("Acme Industries Ltd"), "AI");
        assert_eq!(monogram("acme"), "A");
        assert_eq!(monogram(""), "?");
        assert_eq!(monogram("  "), "?");
    }

    #[test]
    fn snapshot_replacement_recollapses_cards() {
        let mut state = ProfilesState::default();
        state.expanded.insert("P1".to_string());

        state.apply_snapshot(Vec::new());

        assert!(state.loaded);
        assert!(state.expanded.is_empty());
    }
}
