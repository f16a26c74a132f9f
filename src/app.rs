pub mod message;

use std::sync::Arc;
use std::time::Duration;

use iced::{
    Alignment, Element, Length, Task, Theme,
    widget::{
        button, center, column, container, mouse_area, opaque, pick_list, row, space, stack, text,
    },
};

use crate::adapters::frappe::FrappeStore;
use crate::config::PortdeskConfig;
use crate::core::{
    model::{ActionResponse, DashboardStats},
    store::{PortalStore, RecordKind},
};
use crate::styles::{self, font_size, spacing};
use crate::views::{self, create_user::CreateUserState, profiles::ProfilesState};

pub use message::Message;
use message::{ConfirmAction, CreateUserMessage, ProfilesMessage};

pub const APP_NAME: &str = "Portdesk";

/// Text filter input settles for this long before the predicate applies.
const FILTER_DEBOUNCE: Duration = Duration::from_millis(300);
const ALERT_TTL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppTheme {
    #[default]
    System,
    Light,
    Dark,
}

impl AppTheme {
    pub const ALL: [AppTheme; 3] = [AppTheme::System, AppTheme::Light, AppTheme::Dark];
}

impl std::fmt::Display for AppTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppTheme::System => write!(f, "System"),
            AppTheme::Light => write!(f, "Light"),
            AppTheme::Dark => write!(f, "Dark"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertLevel {
    Success,
    Failure,
}

/// Transient notification shown at the bottom of the window until its
/// expiry timer fires.
#[derive(Debug, Clone)]
pub struct Alert {
    pub id: u64,
    pub title: Option<String>,
    pub message: String,
    pub level: AlertLevel,
}

pub struct App {
    config: PortdeskConfig,
    selected_theme: AppTheme,
    store: Arc<dyn PortalStore>,
    stats: DashboardStats,
    profiles: ProfilesState,
    create_user: Option<CreateUserState>,
    confirm: Option<ConfirmAction>,
    /// Record id of the toggle currently in flight. Toggle controls are
    /// withheld while this is set, so mutations never overlap.
    toggling: Option<String>,
    alerts: Vec<Alert>,
    alert_seq: u64,
}

impl App {
    pub fn new() -> (Self, Task<Message>) {
        let config = PortdeskConfig::load();
        let store: Arc<dyn PortalStore> = Arc::new(FrappeStore::new(&config));

        let mut app = Self::with_store(config, store);
        let load = app.load_data();
        (app, load)
    }

    fn with_store(config: PortdeskConfig, store: Arc<dyn PortalStore>) -> Self {
        Self {
            selected_theme: config.theme(),
            config,
            store,
            stats: DashboardStats::default(),
            profiles: ProfilesState::default(),
            create_user: None,
            confirm: None,
            toggling: None,
            alerts: Vec::new(),
            alert_seq: 0,
        }
    }

    pub fn title(&self) -> String {
        format!("{APP_NAME} - Customer Portal Management")
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::ThemeChanged(theme) => {
                self.selected_theme = theme;
                self.config.set_theme(theme);
                if let Err(e) = self.config.save() {
                    log::warn!("Failed to save config: {e}");
                }
            }
            Message::Refresh => return self.load_data(),
            Message::NewProfile => {
                let url = self.store.record_url(RecordKind::Profile, None);
                return self.open_in_shell(url);
            }
            Message::BrowseProfiles => {
                let url = self.store.list_url(RecordKind::Profile);
                return self.open_in_shell(url);
            }
            Message::BrowseUsers => {
                let url = self.store.list_url(RecordKind::PortalUser);
                return self.open_in_shell(url);
            }
            Message::LoadComplete(result) => {
                self.profiles.loading = false;
                match result {
                    Ok((stats, profiles)) => {
                        self.stats = stats;
                        self.profiles.apply_snapshot(profiles);
                    }
                    Err(e) => {
                        log::error!("Failed to load dashboard data: {e}");
                        return self.push_alert(
                            AlertLevel::Failure,
                            Some("Error"),
                            format!("Failed to load data: {e}"),
                        );
                    }
                }
            }
            Message::Profiles(msg) => return self.update_profiles(msg),
            Message::CreateUser(msg) => return self.update_create_user(msg),
            Message::ConfirmToggle => {
                if let Some(action) = self.confirm.take() {
                    return self.execute_confirmed(action);
                }
            }
            Message::CancelToggle => {
                self.confirm = None;
            }
            Message::ToggleComplete(result) => {
                self.toggling = None;
                return self.finish_toggle(result);
            }
            Message::FilterTick(epoch) => {
                if epoch == self.profiles.filter_epoch {
                    self.profiles.filter.query = self.profiles.query_input.clone();
                }
            }
            Message::AlertExpired(id) => {
                self.alerts.retain(|alert| alert.id != id);
            }
        }
        Task::none()
    }

    fn update_profiles(&mut self, msg: ProfilesMessage) -> Task<Message> {
        match msg {
            ProfilesMessage::QueryChanged(query) => {
                self.profiles.query_input = query;
                self.profiles.filter_epoch += 1;
                let epoch = self.profiles.filter_epoch;
                return Task::perform(
                    async move {
                        tokio::time::sleep(FILTER_DEBOUNCE).await;
                        epoch
                    },
                    Message::FilterTick,
                );
            }
            ProfilesMessage::StatusChanged(status) => {
                self.profiles.filter.status = status;
            }
            ProfilesMessage::ToggleUsers(profile) => {
                if !self.profiles.expanded.remove(&profile) {
                    self.profiles.expanded.insert(profile);
                }
            }
            ProfilesMessage::EditProfile(profile) => {
                let url = self.store.record_url(RecordKind::Profile, Some(&profile));
                return self.open_in_shell(url);
            }
            ProfilesMessage::EditUser(user) => {
                let url = self.store.record_url(RecordKind::PortalUser, Some(&user));
                return self.open_in_shell(url);
            }
            ProfilesMessage::AddUser { customer } => {
                let module_selection = self.config.module_selection();
                self.create_user = Some(CreateUserState::new(customer, module_selection));
                if module_selection {
                    let store = self.store.clone();
                    return Task::perform(
                        async move { store.available_modules().await.map_err(|e| e.to_string()) },
                        |result| Message::CreateUser(CreateUserMessage::CatalogLoaded(result)),
                    );
                }
            }
            ProfilesMessage::ToggleProfile {
                profile,
                company_name,
                enable,
            } => {
                self.confirm = Some(ConfirmAction::ToggleProfile {
                    profile,
                    company_name,
                    enable,
                });
            }
            ProfilesMessage::ToggleUser {
                user,
                full_name,
                enable,
            } => {
                self.confirm = Some(ConfirmAction::ToggleUser {
                    user,
                    full_name,
                    enable,
                });
            }
        }
        Task::none()
    }

    fn update_create_user(&mut self, msg: CreateUserMessage) -> Task<Message> {
        let msg = match msg {
            CreateUserMessage::SubmitComplete(result) => return self.finish_create_user(result),
            other => other,
        };

        let Some(dialog) = self.create_user.as_mut() else {
            return Task::none();
        };

        match msg {
            CreateUserMessage::UserChanged(value) => {
                dialog.user = value;
                dialog.error = None;
            }
            CreateUserMessage::RoleChanged(value) => {
                dialog.role = value;
            }
            CreateUserMessage::ModuleToggled(key, selected) => {
                dialog.toggle_module(&key, selected);
            }
            CreateUserMessage::CatalogLoaded(Ok(catalog)) => {
                dialog.set_catalog(catalog);
            }
            CreateUserMessage::CatalogLoaded(Err(e)) => {
                // Submission works without the checklist.
                log::warn!("Failed to load module catalog: {e}");
            }
            CreateUserMessage::Submit => {
                if let Err(error) = dialog.validate() {
                    dialog.error = Some(error);
                    return Task::none();
                }
                dialog.submitting = true;
                dialog.error = None;
                let request = dialog.request();
                let store = self.store.clone();
                return Task::perform(
                    async move {
                        store
                            .create_portal_user(request)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    |result| Message::CreateUser(CreateUserMessage::SubmitComplete(result)),
                );
            }
            CreateUserMessage::Cancel => {
                let submitting = dialog.submitting;
                if !submitting {
                    self.create_user = None;
                }
            }
            _ => {}
        }
        Task::none()
    }

    fn finish_create_user(&mut self, result: Result<ActionResponse, String>) -> Task<Message> {
        match result {
            Ok(response) if response.success => {
                self.create_user = None;
                let message = if response.message.is_empty() {
                    "Portal user created".to_string()
                } else {
                    response.message
                };
                let alert = self.push_alert(AlertLevel::Success, None, message);
                let reload = self.load_data();
                Task::batch([alert, reload])
            }
            Ok(response) => {
                if let Some(dialog) = self.create_user.as_mut() {
                    dialog.submitting = false;
                }
                log::error!("Create portal user rejected: {}", response.message);
                let message = if response.message.is_empty() {
                    "Could not create portal user".to_string()
                } else {
                    response.message
                };
                self.push_alert(AlertLevel::Failure, None, message)
            }
            Err(e) => {
                if let Some(dialog) = self.create_user.as_mut() {
                    dialog.submitting = false;
                }
                log::error!("Create portal user failed: {e}");
                self.push_alert(AlertLevel::Failure, None, e)
            }
        }
    }

    fn execute_confirmed(&mut self, action: ConfirmAction) -> Task<Message> {
        let store = self.store.clone();
        match action {
            ConfirmAction::ToggleProfile {
                profile, enable, ..
            } => {
                log::info!("Toggling profile {profile} to enabled={enable}");
                self.toggling = Some(profile.clone());
                Task::perform(
                    async move {
                        store
                            .toggle_profile_status(&profile, enable)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::ToggleComplete,
                )
            }
            ConfirmAction::ToggleUser { user, enable, .. } => {
                log::info!("Toggling portal user {user} to enabled={enable}");
                self.toggling = Some(user.clone());
                Task::perform(
                    async move {
                        store
                            .toggle_user_status(&user, enable)
                            .await
                            .map_err(|e| e.to_string())
                    },
                    Message::ToggleComplete,
                )
            }
        }
    }

    fn finish_toggle(&mut self, result: Result<ActionResponse, String>) -> Task<Message> {
        match result {
            Ok(response) if response.success => {
                let message = if response.message.is_empty() {
                    "Updated".to_string()
                } else {
                    response.message
                };
                let alert = self.push_alert(AlertLevel::Success, None, message);
                let reload = self.load_data();
                Task::batch([alert, reload])
            }
            Ok(response) => {
                log::error!("Toggle rejected: {}", response.message);
                let message = if response.message.is_empty() {
                    "The requested change was rejected".to_string()
                } else {
                    response.message
                };
                self.push_alert(AlertLevel::Failure, None, message)
            }
            Err(e) => {
                log::error!("Toggle failed: {e}");
                self.push_alert(AlertLevel::Failure, None, e)
            }
        }
    }

    /// Joint stats + profiles fetch. Completes only when both legs
    /// resolve and fails as a whole if either leg fails.
    fn load_data(&mut self) -> Task<Message> {
        self.profiles.loading = true;
        let store = self.store.clone();
        Task::perform(
            async move {
                tokio::try_join!(store.dashboard_stats(), store.portal_profiles())
                    .map_err(|e| e.to_string())
            },
            Message::LoadComplete,
        )
    }

    fn open_in_shell(&mut self, url: String) -> Task<Message> {
        log::info!("Opening {url}");
        if let Err(e) = crate::shell::open_url(&url) {
            log::error!("Failed to open {url}: {e}");
            return self.push_alert(AlertLevel::Failure, None, format!("Could not open {url}"));
        }
        Task::none()
    }

    fn push_alert(
        &mut self,
        level: AlertLevel,
        title: Option<&str>,
        message: impl Into<String>,
    ) -> Task<Message> {
        self.alert_seq += 1;
        let id = self.alert_seq;
        self.alerts.push(Alert {
            id,
            title: title.map(str::to_string),
            message: message.into(),
            level,
        });

        Task::perform(
            async move {
                tokio::time::sleep(ALERT_TTL).await;
                id
            },
            Message::AlertExpired,
        )
    }

    pub fn view(&self) -> Element<'_, Message> {
        let header = self.header_view();

        let content = container(
            column![
                header,
                views::stats::view(&self.stats),
                views::profiles::view(&self.profiles, &self.toggling),
            ]
            .spacing(spacing::XL)
            .width(Length::Fill)
            .height(Length::Fill),
        )
        .padding(spacing::XL)
        .width(Length::Fill)
        .height(Length::Fill);

        let base: Element<'_, Message> = if self.alerts.is_empty() {
            content.into()
        } else {
            column![content.height(Length::Fill), self.alerts_view()]
                .width(Length::Fill)
                .height(Length::Fill)
                .into()
        };

        if let Some(action) = &self.confirm {
            modal(base, self.confirm_view(action), Message::CancelToggle)
        } else if let Some(dialog) = &self.create_user {
            modal(
                base,
                views::create_user::view(dialog),
                Message::CreateUser(CreateUserMessage::Cancel),
            )
        } else {
            base
        }
    }

    fn header_view(&self) -> Element<'_, Message> {
        let title_block = column![
            text(APP_NAME).size(font_size::TITLE),
            text("Customer Portal Management").size(font_size::SMALL),
        ]
        .spacing(spacing::XXXS);

        let browse_profiles = button(text("View Profiles").size(font_size::SMALL).center())
            .padding([spacing::XS, 14.0])
            .style(styles::ghost_button)
            .on_press(Message::BrowseProfiles);

        let browse_users = button(text("View Users").size(font_size::SMALL).center())
            .padding([spacing::XS, 14.0])
            .style(styles::ghost_button)
            .on_press(Message::BrowseUsers);

        let refresh = button(text("Refresh").size(font_size::SMALL).center())
            .padding([spacing::XS, 14.0])
            .style(button::secondary)
            .on_press(Message::Refresh);

        let new_profile = button(text("New Profile").size(font_size::SMALL).center())
            .padding([spacing::XS, 14.0])
            .style(button::primary)
            .on_press(Message::NewProfile);

        let theme_picker = pick_list(
            &AppTheme::ALL[..],
            Some(self.selected_theme),
            Message::ThemeChanged,
        );

        row![
            title_block,
            space().width(Length::Fill),
            row![browse_profiles, browse_users, refresh, new_profile, theme_picker]
                .spacing(spacing::SM)
                .align_y(Alignment::Center),
        ]
        .align_y(Alignment::Center)
        .width(Length::Fill)
        .into()
    }

    fn alerts_view(&self) -> Element<'_, Message> {
        let banners: Vec<Element<'_, Message>> = self.alerts.iter().map(alert_banner).collect();

        column(banners)
            .spacing(spacing::XXS)
            .width(Length::Fill)
            .into()
    }

    fn confirm_view(&self, action: &ConfirmAction) -> Element<'_, Message> {
        let (title, description, destructive) = match action {
            ConfirmAction::ToggleProfile {
                company_name,
                enable,
                ..
            } => (
                if *enable { "Enable Profile" } else { "Disable Profile" },
                format!(
                    "Are you sure you want to {} the portal profile for {}?",
                    verb(*enable),
                    company_name
                ),
                !*enable,
            ),
            ConfirmAction::ToggleUser {
                full_name, enable, ..
            } => (
                if *enable { "Enable User" } else { "Disable User" },
                format!(
                    "Are you sure you want to {} portal access for {}?",
                    verb(*enable),
                    full_name
                ),
                !*enable,
            ),
        };

        let cancel_btn = button(text("Cancel").size(font_size::BODY).center())
            .on_press(Message::CancelToggle)
            .style(button::secondary)
            .padding([spacing::SM, spacing::LG]);

        let confirm_btn = button(text("Confirm").size(font_size::BODY).center())
            .on_press(Message::ConfirmToggle)
            .padding([spacing::SM, spacing::LG]);

        let confirm_btn = if destructive {
            confirm_btn.style(button::danger)
        } else {
            confirm_btn.style(button::primary)
        };

        container(
            column![
                text(title).size(font_size::TITLE - 2.0),
                text(description).size(font_size::BODY),
                row![cancel_btn, confirm_btn].spacing(spacing::SM),
            ]
            .spacing(spacing::LG)
            .padding(spacing::XXL)
            .align_x(Alignment::Center),
        )
        .style(styles::modal_card)
        .width(360)
        .into()
    }

    pub fn theme(&self) -> Option<Theme> {
        crate::theme::resolve_theme(self.selected_theme)
    }
}

fn verb(enable: bool) -> &'static str {
    if enable { "enable" } else { "disable" }
}

fn alert_banner(alert: &Alert) -> Element<'_, Message> {
    let style: fn(&Theme) -> container::Style = match alert.level {
        AlertLevel::Success => styles::success_banner,
        AlertLevel::Failure => styles::error_banner,
    };

    let mut line = row![].spacing(spacing::SM).align_y(Alignment::Center);
    if let Some(title) = alert.title.as_deref() {
        line = line.push(text(title).size(font_size::SMALL));
    }
    line = line.push(text(alert.message.as_str()).size(font_size::SMALL));

    container(line)
        .padding([spacing::SM, spacing::MD])
        .width(Length::Fill)
        .style(style)
        .into()
}

fn modal<'a>(
    base: impl Into<Element<'a, Message>>,
    content: impl Into<Element<'a, Message>>,
    on_blur: Message,
) -> Element<'a, Message> {
    stack![
        base.into(),
        opaque(mouse_area(center(opaque(content)).style(styles::modal_backdrop)).on_press(on_blur))
    ]
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{AvailableModule, Profile};
    use crate::core::store::{CreateUserRequest, Result as StoreResult};

    struct StubStore;

    #[async_trait::async_trait]
    impl PortalStore for StubStore {
        async fn dashboard_stats(&self) -> StoreResult<DashboardStats> {
            Ok(DashboardStats::default())
        }

        async fn portal_profiles(&self) -> StoreResult<Vec<Profile>> {
            Ok(Vec::new())
        }

        async fn available_modules(&self) -> StoreResult<Vec<AvailableModule>> {
            Ok(Vec::new())
        }

        async fn create_portal_user(
            &self,
            _request: CreateUserRequest,
        ) -> StoreResult<ActionResponse> {
            Ok(ActionResponse {
                success: true,
                message: String::new(),
            })
        }

        async fn toggle_profile_status(
            &self,
            _profile: &str,
            _enabled: bool,
        ) -> StoreResult<ActionResponse> {
            Ok(ActionResponse {
                success: true,
                message: String::new(),
            })
        }

        async fn toggle_user_status(
            &self,
            _portal_user: &str,
            _enabled: bool,
        ) -> StoreResult<ActionResponse> {
            Ok(ActionResponse {
                success: true,
                message: String::new(),
            })
        }

        fn record_url(&self, _kind: RecordKind, _name: Option<&str>) -> String {
            String::new()
        }

        fn list_url(&self, _kind: RecordKind) -> String {
            String::new()
        }
    }

    fn app() -> App {
        App::with_store(PortdeskConfig::default(), Arc::new(StubStore))
    }

    fn profile(name: &str, company: &str, enabled: bool) -> Profile {
        serde_json::from_value(serde_json::json!({
            "name": name,
            "customer": format!("CUST-{name}"),
            "company_name": company,
            "enabled": enabled,
        }))
        .unwrap()
    }

    fn loaded_app() -> App {
        let mut app = app();
        let _ = app.update(Message::LoadComplete(Ok((
            DashboardStats::default(),
            vec![profile("P1", "Acme", true)],
        ))));
        app
    }

    fn response(success: bool) -> ActionResponse {
        ActionResponse {
            success,
            message: "done".to_string(),
        }
    }

    #[test]
    fn refresh_enters_loading_state() {
        let mut app = app();
        assert!(!app.profiles.loading);

        let _ = app.update(Message::Refresh);
        assert!(app.profiles.loading);
    }

    #[test]
    fn toggle_requires_confirmation() {
        let mut app = loaded_app();
        let _ = app.update(Message::Profiles(ProfilesMessage::ToggleProfile {
            profile: "P1".into(),
            company_name: "Acme".into(),
            enable: false,
        }));
        assert!(app.confirm.is_some());
        assert!(app.toggling.is_none());

        let _ = app.update(Message::CancelToggle);
        assert!(app.confirm.is_none());
        assert!(app.toggling.is_none());
        assert!(!app.profiles.loading);
    }

    #[test]
    fn confirming_marks_the_target_in_flight() {
        let mut app = loaded_app();
        let _ = app.update(Message::Profiles(ProfilesMessage::ToggleProfile {
            profile: "P1".into(),
            company_name: "Acme".into(),
            enable: false,
        }));
        let _ = app.update(Message::ConfirmToggle);

        assert!(app.confirm.is_none());
        assert_eq!(app.toggling.as_deref(), Some("P1"));
    }

    #[test]
    fn toggle_success_triggers_exactly_one_reload() {
        let mut app = loaded_app();
        app.toggling = Some("P1".into());

        let _ = app.update(Message::ToggleComplete(Ok(response(true))));

        assert!(app.toggling.is_none());
        assert!(app.profiles.loading);
        assert!(app.alerts.iter().any(|a| a.level == AlertLevel::Success));
    }

    #[test]
    fn rejected_toggle_does_not_reload() {
        let mut app = loaded_app();
        app.toggling = Some("P1".into());

        let _ = app.update(Message::ToggleComplete(Ok(response(false))));

        assert!(app.toggling.is_none());
        assert!(!app.profiles.loading);
        assert!(app.alerts.iter().any(|a| a.level == AlertLevel::Failure));
    }

    #[test]
    fn failed_toggle_does_not_reload() {
        let mut app = loaded_app();
        app.toggling = Some("P1".into());

        let _ = app.update(Message::ToggleComplete(Err("connection reset".into())));

        assert!(!app.profiles.loading);
        assert!(app.alerts.iter().any(|a| a.level == AlertLevel::Failure));
    }

    #[test]
    fn load_failure_keeps_previous_snapshot() {
        let mut app = loaded_app();
        assert_eq!(app.profiles.profiles.len(), 1);

        let _ = app.update(Message::LoadComplete(Err("boom".into())));

        assert_eq!(app.profiles.profiles.len(), 1);
        assert!(!app.profiles.loading);
        let alert = app.alerts.last().expect("alert pushed");
        assert_eq!(alert.title.as_deref(), Some("Error"));
        assert_eq!(alert.level, AlertLevel::Failure);
    }

    #[test]
    fn reload_recollapses_expanded_cards() {
        let mut app = loaded_app();
        let _ = app.update(Message::Profiles(ProfilesMessage::ToggleUsers("P1".into())));
        assert!(app.profiles.expanded.contains("P1"));

        let _ = app.update(Message::LoadComplete(Ok((
            DashboardStats::default(),
            vec![profile("P1", "Acme", true)],
        ))));
        assert!(app.profiles.expanded.is_empty());
    }

    #[test]
    fn empty_user_submit_keeps_dialog_open_and_idle() {
        let mut app = app();
        let _ = app.update(Message::Profiles(ProfilesMessage::AddUser {
            customer: "CUST-0001".into(),
        }));

        let _ = app.update(Message::CreateUser(CreateUserMessage::Submit));

        let dialog = app.create_user.as_ref().expect("dialog still open");
        assert!(!dialog.submitting);
        assert!(dialog.error.is_some());
        assert!(!app.profiles.loading);
    }

    #[test]
    fn successful_create_closes_dialog_and_reloads() {
        let mut app = app();
        let _ = app.update(Message::Profiles(ProfilesMessage::AddUser {
            customer: "CUST-0001".into(),
        }));
        let _ = app.update(Message::CreateUser(CreateUserMessage::UserChanged(
            "jane@example.com".into(),
        )));
        let _ = app.update(Message::CreateUser(CreateUserMessage::Submit));
        assert!(app.create_user.as_ref().is_some_and(|d| d.submitting));

        let _ = app.update(Message::CreateUser(CreateUserMessage::SubmitComplete(Ok(
            response(true),
        ))));

        assert!(app.create_user.is_none());
        assert!(app.profiles.loading);
    }

    #[test]
    fn rejected_create_keeps_dialog_open_without_reload() {
        let mut app = app();
        let _ = app.update(Message::Profiles(ProfilesMessage::AddUser {
            customer: "CUST-0001".into(),
        }));
        let _ = app.update(Message::CreateUser(CreateUserMessage::UserChanged(
            "jane@example.com".into(),
        )));
        let _ = app.update(Message::CreateUser(CreateUserMessage::Submit));

        let _ = app.update(Message::CreateUser(CreateUserMessage::SubmitComplete(Ok(
            response(false),
        ))));

        let dialog = app.create_user.as_ref().expect("dialog still open");
        assert!(!dialog.submitting);
        assert!(!app.profiles.loading);
    }

    #[test]
    fn catalog_failure_leaves_checklist_empty() {
        let mut app = app();
        let _ = app.update(Message::Profiles(ProfilesMessage::AddUser {
            customer: "CUST-0001".into(),
        }));

        let _ = app.update(Message::CreateUser(CreateUserMessage::CatalogLoaded(Err(
            "catalog unavailable".into(),
        ))));

        let dialog = app.create_user.as_ref().expect("dialog still open");
        assert!(dialog.modules.is_empty());
    }

    #[test]
    fn cancel_is_ignored_while_submitting() {
        let mut app = app();
        let _ = app.update(Message::Profiles(ProfilesMessage::AddUser {
            customer: "CUST-0001".into(),
        }));
        let _ = app.update(Message::CreateUser(CreateUserMessage::UserChanged(
            "jane@example.com".into(),
        )));
        let _ = app.update(Message::CreateUser(CreateUserMessage::Submit));

        let _ = app.update(Message::CreateUser(CreateUserMessage::Cancel));
        assert!(app.create_user.is_some());
    }

    #[test]
    fn query_applies_only_after_matching_tick() {
        let mut app = loaded_app();
        let _ = app.update(Message::Profiles(ProfilesMessage::QueryChanged("ac".into())));
        let stale = app.profiles.filter_epoch;
        let _ = app.update(Message::Profiles(ProfilesMessage::QueryChanged(
            "acme".into(),
        )));

        let _ = app.update(Message::FilterTick(stale));
        assert_eq!(app.profiles.filter.query, "");

        let current = app.profiles.filter_epoch;
        let _ = app.update(Message::FilterTick(current));
        assert_eq!(app.profiles.filter.query, "acme");
    }

    #[test]
    fn alerts_expire_by_id() {
        let mut app = loaded_app();
        app.toggling = Some("P1".into());
        let _ = app.update(Message::ToggleComplete(Err("nope".into())));
        let id = app.alerts.last().map(|a| a.id).expect("alert pushed");

        let _ = app.update(Message::AlertExpired(id));
        assert!(app.alerts.is_empty());
    }
}
