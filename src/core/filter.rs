use super::model::Profile;

/// Status leg of the card filter. An explicit tri-state instead of the
/// empty-string/"0"/"1" select values the status dropdown produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    ActiveOnly,
    DisabledOnly,
}

impl StatusFilter {
    pub const ALL: [StatusFilter; 3] = [
        StatusFilter::Any,
        StatusFilter::ActiveOnly,
        StatusFilter::DisabledOnly,
    ];

    pub fn admits(self, enabled: bool) -> bool {
        match self {
            StatusFilter::Any => true,
            StatusFilter::ActiveOnly => enabled,
            StatusFilter::DisabledOnly => !enabled,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::Any => write!(f, "All Status"),
            StatusFilter::ActiveOnly => write!(f, "Active"),
            StatusFilter::DisabledOnly => write!(f, "Disabled"),
        }
    }
}

/// The applied card filter: free-text AND status. Pure over the profile
/// snapshot, so re-applying it is always idempotent.
#[derive(Debug, Clone, Default)]
pub struct ProfileFilter {
    pub query: String,
    pub status: StatusFilter,
}

impl ProfileFilter {
    /// Case-insensitive substring match against the customer reference
    /// and the company name, vacuously true on an empty query, ANDed
    /// with the status leg.
    pub fn matches(&self, profile: &Profile) -> bool {
        let query = self.query.to_lowercase();
        let text_ok = query.is_empty()
            || profile.customer.to_lowercase().contains(&query)
            || profile.company_name.to_lowercase().contains(&query);

        text_ok && self.status.admits(profile.enabled)
    }
}
