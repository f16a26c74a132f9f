use crate::core::{
    filter::StatusFilter,
    model::{ActionResponse, AvailableModule, DashboardStats, Profile},
};

use super::AppTheme;

/// Pending toggle confirmation, carrying the display name the prompt
/// shows for the target.
#[derive(Debug, Clone)]
pub enum ConfirmAction {
    ToggleProfile {
        profile: String,
        company_name: String,
        enable: bool,
    },
    ToggleUser {
        user: String,
        full_name: String,
        enable: bool,
    },
}

#[derive(Debug, Clone)]
pub enum Message {
    ThemeChanged(AppTheme),

    Refresh,
    NewProfile,
    BrowseProfiles,
    BrowseUsers,

    /// Joint stats + profiles fetch resolved (or failed as a whole).
    LoadComplete(Result<(DashboardStats, Vec<Profile>), String>),

    Profiles(ProfilesMessage),
    CreateUser(CreateUserMessage),

    ConfirmToggle,
    CancelToggle,
    ToggleComplete(Result<ActionResponse, String>),

    FilterTick(u64),
    AlertExpired(u64),
}

#[derive(Debug, Clone)]
pub enum ProfilesMessage {
    QueryChanged(String),
    StatusChanged(StatusFilter),
    ToggleUsers(String),
    EditProfile(String),
    EditUser(String),
    AddUser {
        customer: String,
    },
    ToggleProfile {
        profile: String,
        company_name: String,
        enable: bool,
    },
    ToggleUser {
        user: String,
        full_name: String,
        enable: bool,
    },
}

#[derive(Debug, Clone)]
pub enum CreateUserMessage {
    UserChanged(String),
    RoleChanged(String),
    ModuleToggled(String, bool),
    CatalogLoaded(Result<Vec<AvailableModule>, String>),
    Submit,
    SubmitComplete(Result<ActionResponse, String>),
    Cancel,
}
