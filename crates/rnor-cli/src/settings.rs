use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::tui::themes::ThemeName;

pub const API_URL_ENV: &str = "RNOR_API_URL";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub theme: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: ThemeName::Teal.as_str().to_string(),
            api_url: None,
        }
    }
}

impl Settings {
    fn config_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?
            .join("rnor"))
    }

    pub fn load() -> Self {
        Self::config_dir()
            .ok()
            .and_then(|dir| fs::read_to_string(dir.join("settings.json")).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) -> Result<()> {
        let dir = Self::config_dir()?;
        if !dir.exists() {
            fs::create_dir_all(&dir)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(dir.join("settings.json"), content)?;
        Ok(())
    }

    pub fn theme_name(&self) -> ThemeName {
        self.theme.parse().unwrap_or(ThemeName::Teal)
    }

    pub fn set_theme(&mut self, theme: ThemeName) {
        self.theme = theme.as_str().to_string();
    }

    /// Priority: `--api-url` > `RNOR_API_URL` > settings.json > placeholder.
    pub fn resolve_api_url(&self, cli_override: Option<&str>) -> String {
        let env_value = std::env::var(API_URL_ENV).ok();
        pick_api_url(cli_override, env_value.as_deref(), self.api_url.as_deref())
    }
}

fn pick_api_url(cli: Option<&str>, env: Option<&str>, saved: Option<&str>) -> String {
    [cli, env, saved]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|url| !url.is_empty())
        .unwrap_or(DEFAULT_API_URL)
        .to_string()
}
