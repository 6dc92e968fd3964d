//! Display model for the detail screen, built once per render from a loaded
//! detail and its theme. Widgets only read from it.

use crate::state::{PokemonDetail, PokemonStat};
use crate::theme::{Rgb, Theme};
use crate::units;

pub const PROGRESS_MAX: u16 = 100;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Badge {
    pub label: String,
    pub class: String,
    pub color: Rgb,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatRow {
    pub label: String,
    pub value: String,
    pub raw: u16,
    /// Fill in `0..=PROGRESS_MAX`; the raw stat is left untouched.
    pub progress: u16,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailView {
    pub title: String,
    pub name: String,
    pub number: String,
    pub artwork_url: String,
    pub badges: Vec<Badge>,
    pub height_metric: String,
    pub height_imperial: String,
    pub weight_metric: String,
    pub weight_imperial: String,
    pub abilities: Vec<String>,
    pub stats: Vec<StatRow>,
    pub flavor_text: String,
    pub genus: Option<String>,
    pub accent: Rgb,
}

impl DetailView {
    pub fn build(detail: &PokemonDetail, theme: &Theme) -> Self {
        let accent = theme.accent;
        let name = capitalize(&detail.name);
        Self {
            title: format!("{name} | Pokedex"),
            number: format!("#{:03}", detail.id),
            artwork_url: detail.artwork_url.clone(),
            badges: detail
                .types
                .iter()
                .map(|type_name| Badge {
                    label: display_name(type_name),
                    class: format!("type-{}", type_name.to_lowercase()),
                    color: accent,
                })
                .collect(),
            height_metric: format!("{} m", units::height_meters(detail.height)),
            height_imperial: units::height_feet_inches(detail.height),
            weight_metric: format!("{} kg", units::weight_kg(detail.weight)),
            weight_imperial: format!("{} lbs", units::weight_lbs(detail.weight)),
            abilities: detail.abilities.iter().map(|a| display_name(a)).collect(),
            stats: detail.stats.iter().map(stat_row).collect(),
            flavor_text: detail
                .flavor_text
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
            genus: detail.genus.clone(),
            name,
            accent,
        }
    }
}

fn stat_row(stat: &PokemonStat) -> StatRow {
    StatRow {
        label: stat_abbreviation(&stat.name),
        value: format!("{:03}", stat.value),
        raw: stat.value,
        progress: stat.value.min(PROGRESS_MAX),
    }
}

pub fn stat_abbreviation(name: &str) -> String {
    match name {
        "hp" => "HP".to_string(),
        "attack" => "ATK".to_string(),
        "defense" => "DEF".to_string(),
        "special-attack" => "SATK".to_string(),
        "special-defense" => "SDEF".to_string(),
        "speed" => "SPD".to_string(),
        _ => name.to_ascii_uppercase(),
    }
}

/// First letter upper-cased, the rest untouched.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `solar-power` -> `Solar Power`.
pub fn display_name(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::DEFAULT_ACCENT;

    fn charizard() -> PokemonDetail {
        PokemonDetail {
            id: 6,
            name: "charizard".into(),
            height: 17,
            weight: 905,
            types: vec!["fire".into(), "flying".into()],
            abilities: vec!["blaze".into(), "solar-power".into()],
            stats: vec![
                PokemonStat { name: "hp".into(), value: 78 },
                PokemonStat { name: "special-attack".into(), value: 109 },
                PokemonStat { name: "speed".into(), value: 100 },
                PokemonStat { name: "accuracy".into(), value: 5 },
            ],
            flavor_text: "Spits fire that\nis hot.".into(),
            genus: Some("Flame Pokémon".into()),
            artwork_url: "art/6.png".into(),
        }
    }

    #[test]
    fn builds_header_and_measurements() {
        let detail = charizard();
        let view = DetailView::build(&detail, &Theme::for_types(&detail.types));
        assert_eq!(view.name, "Charizard");
        assert_eq!(view.number, "#006");
        assert_eq!(view.title, "Charizard | Pokedex");
        assert_eq!(view.height_metric, "1.7 m");
        assert_eq!(view.height_imperial, "5'7\"");
        assert_eq!(view.weight_metric, "90.5 kg");
        assert_eq!(view.weight_imperial, "199.5 lbs");
        assert_eq!(view.abilities, vec!["Blaze", "Solar Power"]);
        assert_eq!(view.flavor_text, "Spits fire that is hot.");
    }

    #[test]
    fn badges_share_the_primary_type_colour() {
        let detail = charizard();
        let theme = Theme::for_types(&detail.types);
        let view = DetailView::build(&detail, &theme);
        assert_eq!(view.badges.len(), 2);
        assert_eq!(view.badges[1].label, "Flying");
        assert_eq!(view.badges[1].class, "type-flying");
        assert!(view.badges.iter().all(|badge| badge.color == theme.accent));
        assert_eq!(view.accent, Rgb(0xF0, 0x80, 0x30));
    }

    #[test]
    fn stat_progress_is_clamped_for_display_only() {
        let detail = charizard();
        let view = DetailView::build(&detail, &Theme::default());
        let satk = &view.stats[1];
        assert_eq!(satk.label, "SATK");
        assert_eq!(satk.value, "109");
        assert_eq!(satk.raw, 109);
        assert_eq!(satk.progress, 100);
        assert_eq!(view.stats[0].value, "078");
        assert_eq!(view.stats[3].label, "ACCURACY");
        assert_eq!(view.stats[3].value, "005");
        assert_eq!(detail.stats[1].value, 109);
    }

    #[test]
    fn unknown_type_uses_default_accent() {
        let mut detail = charizard();
        detail.types = vec!["shadow".into()];
        let view = DetailView::build(&detail, &Theme::for_types(&detail.types));
        assert_eq!(view.accent, DEFAULT_ACCENT);
        assert_eq!(view.badges[0].color, DEFAULT_ACCENT);
    }

    #[test]
    fn names_are_capitalised() {
        assert_eq!(capitalize("mr-mime"), "Mr-mime");
        assert_eq!(display_name("mr-mime"), "Mr Mime");
        assert_eq!(capitalize(""), "");
    }
}
