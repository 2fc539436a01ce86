use ratatui::style::Color;
use rnor_core::Residency;

use super::config::RnorConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeName {
    Teal,
    Blue,
    Green,
    Orange,
    Monochrome,
}

impl ThemeName {
    pub fn all() -> &'static [ThemeName] {
        &[
            ThemeName::Teal,
            ThemeName::Blue,
            ThemeName::Green,
            ThemeName::Orange,
            ThemeName::Monochrome,
        ]
    }

    pub fn next(self) -> ThemeName {
        let themes = Self::all();
        let idx = themes.iter().position(|&t| t == self).unwrap_or(0);
        themes[(idx + 1) % themes.len()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeName::Teal => "teal",
            ThemeName::Blue => "blue",
            ThemeName::Green => "green",
            ThemeName::Orange => "orange",
            ThemeName::Monochrome => "monochrome",
        }
    }
}

impl std::str::FromStr for ThemeName {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "teal" => Ok(ThemeName::Teal),
            "blue" => Ok(ThemeName::Blue),
            "green" => Ok(ThemeName::Green),
            "orange" => Ok(ThemeName::Orange),
            "monochrome" => Ok(ThemeName::Monochrome),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: ThemeName,
    pub background: Color,
    pub foreground: Color,
    pub border: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub rnor: Color,
    pub nr: Color,
    pub ror: Color,
}

impl Theme {
    pub fn from_name(name: ThemeName) -> Self {
        Self::with_config(name, RnorConfig::load())
    }

    pub fn with_config(name: ThemeName, config: &RnorConfig) -> Self {
        let accent = match name {
            ThemeName::Teal => Color::Rgb(29, 201, 169),
            ThemeName::Blue => Color::Rgb(57, 83, 211),
            ThemeName::Green => Color::Rgb(57, 211, 83),
            ThemeName::Orange => Color::Rgb(211, 83, 57),
            ThemeName::Monochrome => Color::Rgb(200, 205, 212),
        };

        let mut theme = Self {
            name,
            background: Color::Reset,
            foreground: Color::Rgb(230, 237, 243),
            border: Color::Rgb(48, 54, 61),
            accent,
            muted: Color::Rgb(139, 148, 158),
            error: Color::Rgb(248, 81, 73),
            rnor: Color::Rgb(30, 225, 194),
            nr: Color::Rgb(140, 140, 140),
            ror: Color::Rgb(253, 176, 79),
        };

        for status in Residency::all() {
            if let Some(color) = config.get_status_color(*status) {
                *theme.status_slot(*status) = color;
            }
        }
        theme
    }

    fn status_slot(&mut self, status: Residency) -> &mut Color {
        match status {
            Residency::Rnor => &mut self.rnor,
            Residency::Nr => &mut self.nr,
            Residency::Ror => &mut self.ror,
        }
    }

    pub fn status_color(&self, status: Residency) -> Color {
        match status {
            Residency::Rnor => self.rnor,
            Residency::Nr => self.nr,
            Residency::Ror => self.ror,
        }
    }
}
