use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

use ratatui::style::Color;
use rnor_core::Residency;
use serde::Deserialize;

static CONFIG: OnceLock<RnorConfig> = OnceLock::new();

/// `~/.rnor`, e.g.
///
/// ```toml
/// [colors]
/// rnor = "#1ee1c2"
/// nri = "#8c8c8c"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RnorConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
}

impl RnorConfig {
    fn config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".rnor"))
    }

    pub fn load() -> &'static RnorConfig {
        CONFIG.get_or_init(|| {
            Self::config_path()
                .and_then(|path| fs::read_to_string(path).ok())
                .and_then(|content| toml::from_str(&content).ok())
                .unwrap_or_default()
        })
    }

    /// Keys match either the status code or its display label.
    pub fn get_status_color(&self, status: Residency) -> Option<Color> {
        [status.code(), status.display_label()]
            .iter()
            .find_map(|key| self.colors.get(&key.to_lowercase()))
            .and_then(|hex| parse_hex_color(hex))
    }
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#1ee1c2"), Some(Color::Rgb(30, 225, 194)));
        assert_eq!(parse_hex_color("fdb04f"), Some(Color::Rgb(253, 176, 79)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#zzzzzz"), None);
    }

    #[test]
    fn test_status_color_accepts_label_key() {
        let config: RnorConfig = toml::from_str("[colors]\nnri = \"#010203\"\n").unwrap();
        assert_eq!(config.get_status_color(Residency::Nr), Some(Color::Rgb(1, 2, 3)));
        assert_eq!(config.get_status_color(Residency::Rnor), None);
    }
}
