use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::app::AppTheme;

const CONFIG_PATH: &str = "~/.config/portdesk/config.toml";
const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const DEFAULT_API_NAMESPACE: &str = "customer_portal_manager.api.portal_api";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PortdeskConfig {
    pub server_url: Option<String>,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub api_namespace: Option<String>,
    pub theme: Option<String>,
    /// Gates the module checklist in the create-user dialog. With the
    /// gate off, create requests omit the module list entirely.
    pub module_selection: Option<bool>,
}

impl PortdeskConfig {
    pub fn config_path() -> PathBuf {
        PathBuf::from(shellexpand::tilde(CONFIG_PATH).into_owned())
    }

    pub fn load() -> Self {
        let path = Self::config_path();
        match std::fs::read_to_string(&path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    pub fn save(&self) -> Result<(), String> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| e.to_string())?;
        }

        let contents = toml::to_string_pretty(self).map_err(|e| e.to_string())?;

        std::fs::write(&path, contents).map_err(|e| e.to_string())
    }

    pub fn server_url(&self) -> String {
        self.server_url
            .clone()
            .unwrap_or_else(|| DEFAULT_SERVER_URL.to_string())
    }

    pub fn api_namespace(&self) -> String {
        self.api_namespace
            .clone()
            .unwrap_or_else(|| DEFAULT_API_NAMESPACE.to_string())
    }

    pub fn module_selection(&self) -> bool {
        self.module_selection.unwrap_or(true)
    }

    pub fn theme(&self) -> AppTheme {
        match self.theme.as_deref() {
            Some("light") => AppTheme::Light,
            Some("dark") => AppTheme::Dark,
            _ => AppTheme::System,
        }
    }

    pub fn set_theme(&mut self, theme: AppTheme) {
        self.theme = Some(match theme {
            AppTheme::System => "system".to_string(),
            AppTheme::Light => "light".to_string(),
            AppTheme::Dark => "dark".to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = PortdeskConfig::default();
        assert_eq!(config.server_url(), DEFAULT_SERVER_URL);
        assert_eq!(config.api_namespace(), DEFAULT_API_NAMESPACE);
        assert!(config.module_selection());
        assert_eq!(config.theme(), AppTheme::System);
    }

    #[test]
    fn theme_round_trip() {
        let mut config = PortdeskConfig::default();
        config.set_theme(AppTheme::Dark);
        assert_eq!(config.theme(), AppTheme::Dark);
    }
}
