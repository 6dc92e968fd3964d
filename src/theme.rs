//! Type-driven colour theme for the detail screen.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }

    /// Blend toward black; `factor` of 1.0 keeps the colour.
    pub fn dimmed(self, factor: f32) -> Rgb {
        let scale = |channel: u8| (f32::from(channel) * factor.clamp(0.0, 1.0)).round() as u8;
        Rgb(scale(self.0), scale(self.1), scale(self.2))
    }

    pub fn to_color(self) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(self.0, self.1, self.2)
    }
}

pub const DEFAULT_ACCENT: Rgb = Rgb(0x68, 0xA0, 0x90);

pub const TYPE_COLORS: [(&str, Rgb); 18] = [
    ("normal", Rgb(0xA8, 0xA8, 0x78)),
    ("fire", Rgb(0xF0, 0x80, 0x30)),
    ("water", Rgb(0x68, 0x90, 0xF0)),
    ("electric", Rgb(0xF8, 0xD0, 0x30)),
    ("grass", Rgb(0x78, 0xC8, 0x50)),
    ("ice", Rgb(0x98, 0xD8, 0xD8)),
    ("fighting", Rgb(0xC0, 0x30, 0x28)),
    ("poison", Rgb(0xA0, 0x40, 0xA0)),
    ("ground", Rgb(0xE0, 0xC0, 0x68)),
    ("flying", Rgb(0xA8, 0x90, 0xF0)),
    ("psychic", Rgb(0xF8, 0x58, 0x88)),
    ("bug", Rgb(0xA8, 0xB8, 0x20)),
    ("rock", Rgb(0xB8, 0xA0, 0x38)),
    ("ghost", Rgb(0x70, 0x58, 0x98)),
    ("dragon", Rgb(0x70, 0x38, 0xF8)),
    ("dark", Rgb(0x70, 0x58, 0x48)),
    ("steel", Rgb(0xB8, 0xB8, 0xD0)),
    ("fairy", Rgb(0xEE, 0x99, 0xAC)),
];

pub fn canonical_types() -> impl Iterator<Item = &'static str> {
    TYPE_COLORS.iter().map(|(name, _)| *name)
}

pub fn type_color(name: &str) -> Option<Rgb> {
    let name = name.trim().to_ascii_lowercase();
    TYPE_COLORS
        .iter()
        .find(|(known, _)| *known == name)
        .map(|(_, color)| *color)
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub primary_type: Option<String>,
    pub accent: Rgb,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_type: None,
            accent: DEFAULT_ACCENT,
        }
    }
}

impl Theme {
    /// Theme from the first listed type. Unmapped or missing types fall back
    /// to the default accent and are reported, never raised.
    pub fn for_types(types: &[String]) -> Theme {
        let Some(primary) = types.first() else {
            tracing::warn!("no type listed; using default accent");
            return Theme::default();
        };
        match type_color(primary) {
            Some(accent) => Theme {
                primary_type: Some(primary.clone()),
                accent,
            },
            None => {
                tracing::warn!(type_name = %primary, "color not defined for type");
                Theme {
                    primary_type: Some(primary.clone()),
                    accent: DEFAULT_ACCENT,
                }
            }
        }
    }
}
