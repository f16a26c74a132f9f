use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::PortdeskConfig;
use crate::core::{
    model::{ActionResponse, AvailableModule, DashboardStats, ModuleGrant, Profile},
    store::{CreateUserRequest, PortalStore, RecordKind, Result, StoreError},
};

/// Frappe-style method responses arrive wrapped in a `message` envelope.
/// An absent body is not an error at this layer; callers pick the default
/// that matches the operation.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(default = "Option::default")]
    message: Option<T>,
}

/// HTTP implementation of [`PortalStore`] against a Frappe-style server.
/// All calls are blocking `ureq` round trips, moved off the UI executor
/// with `spawn_blocking`.
#[derive(Clone)]
pub struct FrappeStore {
    agent: ureq::Agent,
    base_url: String,
    namespace: String,
    auth_header: Option<String>,
}

impl FrappeStore {
    pub fn new(config: &PortdeskConfig) -> Self {
        let auth_header = match (&config.api_key, &config.api_secret) {
            (Some(key), Some(secret)) => Some(format!("token {key}:{secret}")),
            _ => None,
        };

        Self {
            agent: ureq::Agent::new_with_defaults(),
            base_url: config.server_url().trim_end_matches('/').to_string(),
            namespace: config.api_namespace(),
            auth_header,
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/api/method/{}.{}", self.base_url, self.namespace, method)
    }

    fn call<T: DeserializeOwned>(&self, method: &str, args: &Value) -> Result<Option<T>> {
        let url = self.method_url(method);

        let mut request = self.agent.post(&url);
        if let Some(header) = &self.auth_header {
            request = request.header("Authorization", header);
        }

        let mut response = request.send_json(args).map_err(map_transport_error)?;

        let envelope: Envelope<T> = response
            .body_mut()
            .read_json()
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        Ok(envelope.message)
    }
}

fn map_transport_error(error: ureq::Error) -> StoreError {
    match error {
        ureq::Error::StatusCode(code) => StoreError::Status(code),
        other => StoreError::Network(other.to_string()),
    }
}

/// 0/1 wire form for boolean arguments.
fn flag(enabled: bool) -> u8 {
    if enabled { 1 } else { 0 }
}

fn record_slug(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Profile => "customer-portal-profile",
        RecordKind::PortalUser => "customer-portal-user",
    }
}

async fn run_blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| StoreError::Other(e.to_string()))?
}

#[async_trait::async_trait]
impl PortalStore for FrappeStore {
    async fn dashboard_stats(&self) -> Result<DashboardStats> {
        let store = self.clone();
        run_blocking(move || {
            store
                .call::<DashboardStats>("get_dashboard_stats", &json!({}))
                .map(Option::unwrap_or_default)
        })
        .await
    }

    async fn portal_profiles(&self) -> Result<Vec<Profile>> {
        let store = self.clone();
        run_blocking(move || {
            store
                .call::<Vec<Profile>>("get_portal_profiles", &json!({}))
                .map(Option::unwrap_or_default)
        })
        .await
    }

    async fn available_modules(&self) -> Result<Vec<AvailableModule>> {
        let store = self.clone();
        run_blocking(move || {
            store
                .call::<Vec<AvailableModule>>("get_available_modules", &json!({}))
                .map(Option::unwrap_or_default)
        })
        .await
    }

    async fn create_portal_user(&self, request: CreateUserRequest) -> Result<ActionResponse> {
        let store = self.clone();
        run_blocking(move || {
            let mut args = json!({
                "customer": request.customer,
                "user": request.user,
            });
            if let Some(role) = &request.role {
                args["role"] = json!(role);
            }
            if let Some(modules) = &request.modules {
                args["modules"] = json!(modules.iter().map(grant_payload).collect::<Vec<_>>());
            }

            store
                .call::<ActionResponse>("create_portal_user", &args)
                .map(Option::unwrap_or_default)
        })
        .await
    }

    async fn toggle_profile_status(&self, profile: &str, enabled: bool) -> Result<ActionResponse> {
        let store = self.clone();
        let args = json!({ "profile_name": profile, "enabled": flag(enabled) });
        run_blocking(move || {
            store
                .call::<ActionResponse>("toggle_profile_status", &args)
                .map(Option::unwrap_or_default)
        })
        .await
    }

    async fn toggle_user_status(&self, portal_user: &str, enabled: bool) -> Result<ActionResponse> {
        let store = self.clone();
        let args = json!({ "portal_user_name": portal_user, "enabled": flag(enabled) });
        run_blocking(move || {
            store
                .call::<ActionResponse>("toggle_user_status", &args)
                .map(Option::unwrap_or_default)
        })
        .await
    }

    fn record_url(&self, kind: RecordKind, name: Option<&str>) -> String {
        let slug = record_slug(kind);
        match name {
            Some(name) => format!("{}/app/{}/{}", self.base_url, slug, name.replace(' ', "%20")),
            None => format!("{}/app/{}/new", self.base_url, slug),
        }
    }

    fn list_url(&self, kind: RecordKind) -> String {
        format!("{}/app/{}", self.base_url, record_slug(kind))
    }
}

fn grant_payload(grant: &ModuleGrant) -> Value {
    json!({
        "module_key": grant.module_key,
        "module_name": grant.module_name,
        "enabled": flag(grant.enabled),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FrappeStore {
        let config = PortdeskConfig {
            server_url: Some("https://portal.example.com/".into()),
            api_key: Some("key".into()),
            api_secret: Some("secret".into()),
            ..Default::default()
        };
        FrappeStore::new(&config)
    }

    #[test]
    fn trailing_slash_is_trimmed_from_base_url() {
        let store = store();
        assert_eq!(
            store.method_url("get_dashboard_stats"),
            "https://portal.example.com/api/method/customer_portal_manager.api.portal_api.get_dashboard_stats"
        );
    }

    #[test]
    fn auth_header_requires_both_token_parts() {
        let store = store();
        assert_eq!(store.auth_header.as_deref(), Some("token key:secret"));

        let anonymous = FrappeStore::new(&PortdeskConfig {
            api_key: Some("key".into()),
            ..Default::default()
        });
        assert_eq!(anonymous.auth_header, None);
    }

    #[test]
    fn record_urls() {
        let store = store();
        assert_eq!(
            store.record_url(RecordKind::Profile, Some("Acme Portal")),
            "https://portal.example.com/app/customer-portal-profile/Acme%20Portal"
        );
        assert_eq!(
            store.record_url(RecordKind::Profile, None),
            "https://portal.example.com/app/customer-portal-profile/new"
        );
        assert_eq!(
            store.list_url(RecordKind::PortalUser),
            "https://portal.example.com/app/customer-portal-user"
        );
    }

    #[test]
    fn empty_envelope_parses_to_none() {
        let envelope: Envelope<DashboardStats> = serde_json::from_str("{}").unwrap();
        assert!(envelope.message.is_none());
    }

    #[test]
    fn grant_payload_encodes_flags_as_ints() {
        let payload = grant_payload(&ModuleGrant {
            module_key: "crm".into(),
            module_name: "CRM".into(),
            enabled: true,
        });
        assert_eq!(payload["enabled"], 1);
        assert_eq!(payload["module_key"], "crm");
        assert_eq!(payload["module_name"], "CRM");
    }
}
