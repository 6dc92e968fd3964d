//! Roster filtering: comma-separated terms matched in one of three modes.

use serde::{Deserialize, Serialize};

use crate::state::PokemonSummary;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterMode {
    #[default]
    Number,
    Name,
    Type,
}

impl FilterMode {
    pub fn next(self) -> Self {
        match self {
            FilterMode::Number => FilterMode::Name,
            FilterMode::Name => FilterMode::Type,
            FilterMode::Type => FilterMode::Number,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            FilterMode::Number => "Number",
            FilterMode::Name => "Name",
            FilterMode::Type => "Type",
        }
    }
}

/// Splits a raw query into lowercase terms, dropping blanks.
pub fn terms(query: &str) -> Vec<String> {
    query
        .split(',')
        .map(|term| term.trim().to_lowercase())
        .filter(|term| !term.is_empty())
        .collect()
}

pub fn matches_term(entry: &PokemonSummary, mode: FilterMode, term: &str) -> bool {
    match mode {
        FilterMode::Number => entry.id.to_string().starts_with(term),
        FilterMode::Name => entry.name.to_lowercase().starts_with(term),
        FilterMode::Type => entry
            .types
            .iter()
            .any(|type_name| type_name.to_lowercase().contains(term)),
    }
}

/// A record matches when any term matches. No terms keeps everything.
pub fn matches(entry: &PokemonSummary, mode: FilterMode, terms: &[String]) -> bool {
    terms.is_empty() || terms.iter().any(|term| matches_term(entry, mode, term))
}

pub fn filter_indices(entries: &[PokemonSummary], mode: FilterMode, query: &str) -> Vec<usize> {
    let terms = terms(query);
    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches(entry, mode, &terms))
        .map(|(idx, _)| idx)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u16, name: &str, types: &[&str]) -> PokemonSummary {
        PokemonSummary {
            id,
            name: name.to_string(),
            image_url: format!("art/{id}.png"),
            types: types.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn roster() -> Vec<PokemonSummary> {
        let mut entries: Vec<PokemonSummary> = (1..=300)
            .map(|id| entry(id, &format!("mon{id}"), &["normal"]))
            .collect();
        entries[0] = entry(1, "bulbasaur", &["grass", "poison"]);
        entries[3] = entry(4, "charmander", &["fire"]);
        entries[5] = entry(6, "charizard", &["fire", "flying"]);
        entries[24] = entry(25, "pikachu", &["electric"]);
        entries
    }

    fn ids(entries: &[PokemonSummary], indices: &[usize]) -> Vec<u16> {
        indices.iter().map(|idx| entries[*idx].id).collect()
    }

    #[test]
    fn number_terms_are_ored_prefixes() {
        let entries = roster();
        let found = ids(&entries, &filter_indices(&entries, FilterMode::Number, "25,150"));
        assert!(found.contains(&25));
        assert!(found.contains(&150));
        assert!(found.contains(&251));
        assert!(found.contains(&250));
        assert!(!found.contains(&24));
        assert!(!found.contains(&15));
        assert!(!found.contains(&2));
        assert_eq!(found.len(), 1 + 10 + 1);
    }

    #[test]
    fn name_prefix_is_case_insensitive() {
        let entries = roster();
        let found = ids(&entries, &filter_indices(&entries, FilterMode::Name, " CHAR "));
        assert_eq!(found, vec![4, 6]);
        let found = ids(&entries, &filter_indices(&entries, FilterMode::Name, "izard"));
        assert!(found.is_empty());
    }

    #[test]
    fn type_terms_match_substrings() {
        let entries = roster();
        let found = ids(&entries, &filter_indices(&entries, FilterMode::Type, "FLY, elec"));
        assert_eq!(found, vec![6, 25]);
        let found = ids(&entries, &filter_indices(&entries, FilterMode::Type, "ire"));
        assert_eq!(found, vec![4, 6]);
    }

    #[test]
    fn blank_terms_are_ignored() {
        let entries = roster();
        assert_eq!(terms(" , ,"), Vec::<String>::new());
        assert_eq!(filter_indices(&entries, FilterMode::Name, " , ").len(), entries.len());
        let found = ids(&entries, &filter_indices(&entries, FilterMode::Name, ",pika,"));
        assert_eq!(found, vec![25]);
    }

    #[test]
    fn mode_cycles() {
        assert_eq!(FilterMode::default(), FilterMode::Number);
        assert_eq!(FilterMode::Number.next().next().next(), FilterMode::Number);
    }
}
