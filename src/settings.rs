use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

use crate::theme::ThemeMode;

pub const DEFAULT_API_BASE_URL: &str = "https://api.verdant.garden/v1";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserSettings {
    pub theme_mode: ThemeMode,
    pub api_base_url: String,
    /// Bearer token from the last successful login/registration.
    pub auth_token: Option<String>,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::default(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            auth_token: None,
        }
    }
}

pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<UserSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            match serde_json::from_str(&contents) {
                Ok(settings) => settings,
                Err(err) => {
                    warn!("settings file unreadable, falling back to defaults: {err}");
                    UserSettings::default()
                }
            }
        } else {
            UserSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn snapshot(&self) -> UserSettings {
        self.data.read().unwrap().clone()
    }

    pub fn theme_mode(&self) -> ThemeMode {
        self.data.read().unwrap().theme_mode
    }

    pub fn update_theme_mode(&self, mode: ThemeMode) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.theme_mode = mode;
        self.persist(&guard)
    }

    pub fn api_base_url(&self) -> String {
        self.data.read().unwrap().api_base_url.clone()
    }

    pub fn auth_token(&self) -> Option<String> {
        self.data.read().unwrap().auth_token.clone()
    }

    pub fn update_auth_token(&self, token: Option<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.auth_token = token;
        self.persist(&guard)
    }

    fn persist(&self, data: &UserSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}
