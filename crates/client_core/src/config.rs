use std::{fs, path::Path, sync::Arc, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use url::Url;

use crate::{
    credentials::{CredentialProvider, SessionCredentialStore},
    DEFAULT_API_PREFIX,
};

pub const DEFAULT_SETTINGS_FILE: &str = "dashboard.toml";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    pub app_name: String,
    pub server_url: String,
    pub api_prefix: String,
    pub access_token: Option<String>,
    pub notification_timeout_ms: u64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            app_name: "Product Dashboard".into(),
            server_url: "http://127.0.0.1:3000".into(),
            api_prefix: DEFAULT_API_PREFIX.into(),
            access_token: None,
            notification_timeout_ms: 6000,
        }
    }
}

impl DashboardSettings {
    pub fn page_title(&self) -> String {
        format!("Product List | Dashboard - {}", self.app_name)
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_millis(self.notification_timeout_ms)
    }

    /// Session store seeded with the configured access token, if any.
    pub fn credentials(&self) -> Arc<dyn CredentialProvider> {
        let store = SessionCredentialStore::new();
        if let Some(token) = self.access_token.as_deref().filter(|t| !t.trim().is_empty()) {
            store.insert(crate::ACCESS_TOKEN_KEY, token);
        }
        Arc::new(store)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.server_url)
            .with_context(|| format!("invalid server_url '{}'", self.server_url))?;
        anyhow::ensure!(
            matches!(url.scheme(), "http" | "https"),
            "server_url '{}' must use http or https",
            self.server_url
        );
        Ok(())
    }
}

/// Loads settings: defaults, then the TOML file, then `APP__*` env vars.
///
/// An explicitly requested file must exist; the default `dashboard.toml` is
/// optional.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<DashboardSettings> {
    let mut settings = match path {
        Some(path) => read_settings_file(path)?,
        None if Path::new(DEFAULT_SETTINGS_FILE).exists() => {
            read_settings_file(Path::new(DEFAULT_SETTINGS_FILE))?
        }
        None => DashboardSettings::default(),
    };
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());
    settings.validate()?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> anyhow::Result<DashboardSettings> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read settings file '{}'", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("failed to parse settings file '{}'", path.display()))
}

pub fn apply_env_overrides(
    settings: &mut DashboardSettings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    if let Some(v) = lookup("APP__APP_NAME") {
        settings.app_name = v;
    }
    if let Some(v) = lookup("APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = lookup("APP__API_PREFIX") {
        settings.api_prefix = v;
    }
    if let Some(v) = lookup("APP__ACCESS_TOKEN") {
        settings.access_token = Some(v);
    }
    if let Some(v) = lookup("APP__NOTIFICATION_TIMEOUT_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.notification_timeout_ms = parsed;
        }
    }
}
