use serde::{Deserialize, Deserializer, Serialize};

pub type ProfileId = String;
pub type PortalUserId = String;

/// How many enabled-module tags a user card shows before collapsing the
/// rest into a single overflow tag.
pub const MODULE_TAG_LIMIT: usize = 3;

/// One customer organization's portal access grant, delivered with its
/// portal users and their module grants already nested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub name: ProfileId,
    pub customer: String,
    pub company_name: String,
    #[serde(default)]
    pub company_logo: Option<String>,
    #[serde(default)]
    pub commercial_number: Option<String>,
    #[serde(default)]
    pub tax_id: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub enabled: bool,
    #[serde(default)]
    pub user_count: u64,
    #[serde(default)]
    pub active_user_count: u64,
    #[serde(default)]
    pub users: Vec<PortalUser>,
}

/// One portal login, scoped to exactly one profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalUser {
    pub name: PortalUserId,
    pub user: String,
    pub full_name: String,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_image: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "de_flag")]
    pub enabled: bool,
    #[serde(default)]
    pub modules: Vec<ModuleGrant>,
}

impl PortalUser {
    /// Display email, falling back to the owning account identifier.
    pub fn email(&self) -> &str {
        match self.user_email.as_deref() {
            Some(email) if !email.is_empty() => email,
            _ => &self.user,
        }
    }

    pub fn role_label(&self) -> &str {
        match self.role.as_deref() {
            Some(role) if !role.is_empty() => role,
            _ => "No Role",
        }
    }

    /// Start date in day-month-year display form, "-" when absent or
    /// not an ISO date.
    pub fn start_date_label(&self) -> String {
        match self.start_date.as_deref() {
            Some(raw) if !raw.is_empty() => chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(|date| date.format("%d-%m-%Y").to_string())
                .unwrap_or_else(|_| raw.to_string()),
            _ => "-".to_string(),
        }
    }
}

/// A named feature flag granted to a portal user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleGrant {
    pub module_key: String,
    pub module_name: String,
    #[serde(default, deserialize_with = "de_flag")]
    pub enabled: bool,
}

/// Catalog entry offered in the create-user dialog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailableModule {
    pub module_key: String,
    pub module_name: String,
}

/// Aggregate counters shown at the top of the dashboard. Every field
/// defaults to zero so an empty response renders as all zeros.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_profiles: u64,
    #[serde(default)]
    pub active_profiles: u64,
    #[serde(default)]
    pub total_users: u64,
    #[serde(default)]
    pub active_users: u64,
}

/// Outcome of a mutating call. A missing response body deserializes to
/// the default, which counts as failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(default, deserialize_with = "de_flag")]
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

pub fn status_label(enabled: bool) -> &'static str {
    if enabled { "Active" } else { "Disabled" }
}

/// "-" for absent or empty optional display fields.
pub fn text_or_dash(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => "-",
    }
}

/// Names of the enabled modules to show as tags, capped at
/// [`MODULE_TAG_LIMIT`], plus the overflow count when more are enabled.
pub fn module_tags(modules: &[ModuleGrant]) -> (Vec<&str>, Option<usize>) {
    let enabled: Vec<&str> = modules
        .iter()
        .filter(|grant| grant.enabled)
        .map(|grant| grant.module_name.as_str())
        .collect();

    let overflow = enabled.len().checked_sub(MODULE_TAG_LIMIT).filter(|n| *n > 0);
    let mut visible = enabled;
    visible.truncate(MODULE_TAG_LIMIT);
    (visible, overflow)
}

/// The store encodes boolean flags as 0/1 integers; accept both forms.
fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => value,
        Flag::Int(value) => value != 0,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grant(name: &str, enabled: bool) -> ModuleGrant {
        ModuleGrant {
            module_key: name.to_lowercase(),
            module_name: name.to_string(),
            enabled,
        }
    }

    #[test]
    fn stats_default_to_zero_on_empty_response() {
        let stats: DashboardStats = serde_json::from_str("{}").unwrap();
        assert_eq!(stats.total_profiles, 0);
        assert_eq!(stats.active_profiles, 0);
        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.active_users, 0);
    }

    #[test]
    fn flags_accept_ints_and_bools() {
        let profile: Profile = serde_json::from_value(serde_json::json!({
            "name": "P1",
            "customer": "CUST-0001",
            "company_name": "Acme",
            "enabled": 1,
        }))
        .unwrap();
        assert!(profile.enabled);

        let profile: Profile = serde_json::from_value(serde_json::json!({
            "name": "P1",
            "customer": "CUST-0001",
            "company_name": "Acme",
            "enabled": false,
        }))
        .unwrap();
        assert!(!profile.enabled);
    }

    #[test]
    fn missing_action_response_body_counts_as_failure() {
        let response = ActionResponse::default();
        assert!(!response.success);
    }

    #[test]
    fn status_labels() {
        assert_eq!(status_label(true), "Active");
        assert_eq!(status_label(false), "Disabled");
    }

    #[test]
    fn email_falls_back_to_account_id() {
        let mut user: PortalUser = serde_json::from_value(serde_json::json!({
            "name": "PU-0001",
            "user": "jane@example.com",
            "full_name": "Jane Doe",
        }))
        .unwrap();
        assert_eq!(user.email(), "jane@example.com");

        user.user_email = Some("jane.doe@acme.example".into());
        assert_eq!(user.email(), "jane.doe@acme.example");

        user.user_email = Some(String::new());
        assert_eq!(user.email(), "jane@example.com");
    }

    #[test]
    fn start_date_display() {
        let mut user: PortalUser = serde_json::from_value(serde_json::json!({
            "name": "PU-0001",
            "user": "jane@example.com",
            "full_name": "Jane Doe",
        }))
        .unwrap();
        assert_eq!(user.start_date_label(), "-");

        user.start_date = Some("2024-01-15".into());
        assert_eq!(user.start_date_label(), "15-01-2024");

        user.start_date = Some("soon".into());
        assert_eq!(user.start_date_label(), "soon");
    }

    #[test]
    fn dash_fallback_for_absent_fields() {
        assert_eq!(text_or_dash(&None), "-");
        assert_eq!(text_or_dash(&Some(String::new())), "-");
        assert_eq!(text_or_dash(&Some("1234567890".into())), "1234567890");
    }

    #[test]
    fn module_tags_cap_at_three() {
        let (visible, overflow) = module_tags(&[]);
        assert!(visible.is_empty());
        assert_eq!(overflow, None);

        let grants = vec![grant("Orders", true), grant("Invoices", false), grant("Reports", true)];
        let (visible, overflow) = module_tags(&grants);
        assert_eq!(visible, vec!["Orders", "Reports"]);
        assert_eq!(overflow, None);

        let grants = vec![
            grant("Orders", true),
            grant("Invoices", true),
            grant("Reports", true),
            grant("Payments", true),
            grant("Support", true),
        ];
        let (visible, overflow) = module_tags(&grants);
        assert_eq!(visible, vec!["Orders", "Invoices", "Reports"]);
        assert_eq!(overflow, Some(2));
    }
}
