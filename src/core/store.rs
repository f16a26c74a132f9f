use super::model::{ActionResponse, AvailableModule, DashboardStats, ModuleGrant, Profile};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server returned status {0}")]
    Status(u16),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Record types the dashboard can navigate to in the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Profile,
    PortalUser,
}

#[derive(Debug, Clone)]
pub struct CreateUserRequest {
    pub customer: String,
    pub user: String,
    pub role: Option<String>,
    /// `None` omits the argument entirely (module selection disabled).
    pub modules: Option<Vec<ModuleGrant>>,
}

/// The fixed RPC contract between the dashboard and the remote record
/// store. Reads return fully nested snapshots; mutations return an
/// [`ActionResponse`] and never change anything client-side on their own.
#[async_trait::async_trait]
pub trait PortalStore: Send + Sync {
    async fn dashboard_stats(&self) -> Result<DashboardStats>;

    /// Full profile sequence, each profile pre-populated with its users
    /// and each user with its module grants.
    async fn portal_profiles(&self) -> Result<Vec<Profile>>;

    async fn available_modules(&self) -> Result<Vec<AvailableModule>>;

    async fn create_portal_user(&self, request: CreateUserRequest) -> Result<ActionResponse>;

    async fn toggle_profile_status(&self, profile: &str, enabled: bool) -> Result<ActionResponse>;

    async fn toggle_user_status(&self, portal_user: &str, enabled: bool) -> Result<ActionResponse>;

    /// URL of the record form in the host shell; `None` targets the
    /// new-record view.
    fn record_url(&self, kind: RecordKind, name: Option<&str>) -> String;

    /// URL of the record list view in the host shell.
    fn list_url(&self, kind: RecordKind) -> String;
}
