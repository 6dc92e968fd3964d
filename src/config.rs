//! Runtime configuration: dataset scope and the URL templates it reads from.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE: &str = "https://pokeapi.co/api/v2";
pub const DEFAULT_ARTWORK_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/sprites/master/sprites/pokemon/other/official-artwork";
pub const DEFAULT_CRY_LEGACY_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/legacy";
pub const DEFAULT_CRY_LATEST_BASE: &str =
    "https://raw.githubusercontent.com/PokeAPI/cries/main/cries/pokemon/latest";
pub const DEFAULT_MAX_ID: u16 = 386;
pub const DEFAULT_DATASET: &str = "gen3";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CryVariant {
    Legacy,
    Latest,
}

impl CryVariant {
    pub fn label(self) -> &'static str {
        match self {
            CryVariant::Legacy => "legacy",
            CryVariant::Latest => "latest",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    api_base: String,
    artwork_base: String,
    cry_legacy_base: String,
    cry_latest_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(
            DEFAULT_API_BASE,
            DEFAULT_ARTWORK_BASE,
            DEFAULT_CRY_LEGACY_BASE,
            DEFAULT_CRY_LATEST_BASE,
        )
    }
}

impl Endpoints {
    pub fn new(api: &str, artwork: &str, cry_legacy: &str, cry_latest: &str) -> Self {
        Self {
            api_base: trim_base(api),
            artwork_base: trim_base(artwork),
            cry_legacy_base: trim_base(cry_legacy),
            cry_latest_base: trim_base(cry_latest),
        }
    }

    pub fn pokemon_url(&self, id: u16) -> String {
        format!("{}/pokemon/{id}", self.api_base)
    }

    pub fn species_url(&self, id: u16) -> String {
        format!("{}/pokemon-species/{id}", self.api_base)
    }

    pub fn roster_url(&self, limit: u16) -> String {
        format!("{}/pokemon?limit={limit}", self.api_base)
    }

    pub fn type_url(&self, name: &str) -> String {
        format!("{}/type/{name}", self.api_base)
    }

    pub fn artwork_url(&self, id: u16) -> String {
        format!("{}/{id}.png", self.artwork_base)
    }

    pub fn cry_url(&self, variant: CryVariant, id: u16) -> String {
        let base = match variant {
            CryVariant::Legacy => &self.cry_legacy_base,
            CryVariant::Latest => &self.cry_latest_base,
        };
        format!("{base}/{id}.ogg")
    }
}

#[derive(Clone, Debug)]
pub struct Config {
    pub max_id: u16,
    pub dataset: String,
    pub endpoints: Endpoints,
    pub cache_dir: PathBuf,
    pub log_dir: PathBuf,
    pub audio: bool,
}

impl Config {
    /// Cache key for the persisted detail blob, safe to use as a file stem.
    pub fn cache_namespace(&self) -> String {
        namespace_for(&self.dataset)
    }
}

pub fn namespace_for(dataset: &str) -> String {
    let cleaned: String = dataset
        .trim()
        .to_ascii_lowercase()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "pokedex-default".to_string()
    } else {
        format!("pokedex-{cleaned}")
    }
}

pub fn default_cache_dir() -> PathBuf {
    dirs_next::cache_dir()
        .map(|dir| dir.join("pokedex"))
        .unwrap_or_else(|| PathBuf::from(".cache").join("pokedex"))
}

pub fn default_log_dir() -> PathBuf {
    default_cache_dir().join("logs")
}

fn trim_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}
