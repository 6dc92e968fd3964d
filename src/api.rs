use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::audio::ClipSource;
use crate::config::Endpoints;
use crate::error::FetchError;
use crate::state::{PokemonDetail, PokemonStat, PokemonSummary};
use crate::theme;

const TYPE_LISTING_CONCURRENCY: usize = 6;

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypeDetailResponse {
    pokemon: Vec<TypePokemonEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct TypePokemonEntry {
    slot: u8,
    pokemon: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    height: u16,
    weight: u16,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    abilities: Vec<PokemonAbilitySlot>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    slot: u8,
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonAbilitySlot {
    ability: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonSpeciesResponse {
    #[serde(default)]
    flavor_text_entries: Vec<FlavorTextEntry>,
    #[serde(default)]
    genera: Vec<GenusEntry>,
}

#[derive(Clone, Debug, Deserialize)]
struct FlavorTextEntry {
    flavor_text: String,
    language: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct GenusEntry {
    genus: String,
    language: NamedResource,
}

/// An HTTP response that has not been judged yet.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Fetches one full detail record. Implementations fail as a unit.
#[async_trait]
pub trait DetailSource: Send + Sync {
    async fn fetch_detail(&self, id: u16) -> Result<PokemonDetail, FetchError>;
}

#[derive(Clone, Debug)]
pub struct PokeClient {
    http: reqwest::Client,
    endpoints: Endpoints,
    cache_root: PathBuf,
}

impl PokeClient {
    pub fn new(endpoints: Endpoints, cache_root: PathBuf) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoints,
            cache_root,
        }
    }

    /// Roster of `1..=max_id`, each entry carrying its types in slot order.
    pub async fn fetch_roster(&self, max_id: u16) -> Result<Vec<PokemonSummary>, FetchError> {
        let url = self.endpoints.roster_url(max_id);
        let response: ListResponse = self.fetch_json_cached(&url).await?;
        let mut roster = roster_from_listing(response, max_id, &self.endpoints);
        let memberships = self.fetch_type_memberships().await;
        apply_type_memberships(&mut roster, memberships);
        tracing::info!(entries = roster.len(), "roster loaded");
        Ok(roster)
    }

    async fn fetch_type_memberships(&self) -> Vec<(String, Vec<(u16, u8)>)> {
        let semaphore = Arc::new(Semaphore::new(TYPE_LISTING_CONCURRENCY));
        let mut join_set = JoinSet::new();
        for (order, type_name) in theme::canonical_types().enumerate() {
            let client = self.clone();
            let semaphore = semaphore.clone();
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let url = client.endpoints.type_url(type_name);
                let result: Result<TypeDetailResponse, FetchError> =
                    client.fetch_json_cached(&url).await;
                (order, type_name, result)
            });
        }

        let mut listings = Vec::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((order, type_name, Ok(response))) => {
                    let members = response
                        .pokemon
                        .into_iter()
                        .filter_map(|entry| {
                            id_from_resource_url(&entry.pokemon.url).map(|id| (id, entry.slot))
                        })
                        .collect();
                    listings.push((order, type_name.to_string(), members));
                }
                Ok((_, type_name, Err(err))) => {
                    tracing::warn!(type_name, error = %err, "type listing failed; skipping");
                }
                Err(err) => {
                    tracing::warn!(error = %err, "type listing task failed");
                }
            }
        }
        listings.sort_by_key(|(order, _, _)| *order);
        listings
            .into_iter()
            .map(|(_, name, members)| (name, members))
            .collect()
    }

    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch_bytes_cached(url).await
    }

    async fn get_raw(&self, url: &str) -> Result<RawResponse, FetchError> {
        let transport = |err: reqwest::Error| FetchError::Transport {
            url: url.to_string(),
            message: err.to_string(),
        };
        let response = self.http.get(url).send().await.map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport)?.to_vec();
        Ok(RawResponse {
            url: url.to_string(),
            status,
            body,
        })
    }

    async fn fetch_json_cached<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, FetchError> {
        let bytes = self.fetch_bytes_cached(url).await?;
        match serde_json::from_slice(&bytes) {
            Ok(value) => Ok(value),
            Err(err) => {
                let _ = fs::remove_file(self.cache_path(url)).await;
                Err(FetchError::Decode {
                    url: url.to_string(),
                    message: err.to_string(),
                })
            }
        }
    }

    async fn fetch_bytes_cached(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let cache_path = self.cache_path(url);
        if let Some(bytes) = read_cache(&cache_path).await {
            return Ok(bytes);
        }
        let response = self.get_raw(url).await?;
        if !response.is_success() {
            return Err(FetchError::Http {
                url: response.url,
                status: response.status,
            });
        }
        write_cache(&cache_path, &response.body).await;
        Ok(response.body)
    }

    fn cache_path(&self, url: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(url.as_bytes());
        let digest = hex::encode(hasher.finalize());
        self.cache_root.join("http").join(digest)
    }
}

#[async_trait]
impl DetailSource for PokeClient {
    async fn fetch_detail(&self, id: u16) -> Result<PokemonDetail, FetchError> {
        let core_url = self.endpoints.pokemon_url(id);
        let species_url = self.endpoints.species_url(id);
        let (core, species) = tokio::join!(self.get_raw(&core_url), self.get_raw(&species_url));
        assemble_detail(id, &core?, &species?, self.endpoints.artwork_url(id))
    }
}

#[async_trait]
impl ClipSource for PokeClient {
    async fn fetch_clip(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        self.fetch_bytes_cached(url).await
    }
}

/// Joins the core and species responses. Either one failing fails the whole
/// record, reporting both status codes.
pub fn assemble_detail(
    id: u16,
    core: &RawResponse,
    species: &RawResponse,
    artwork_url: String,
) -> Result<PokemonDetail, FetchError> {
    if !core.is_success() || !species.is_success() {
        return Err(FetchError::Status {
            id,
            core: core.status,
            species: species.status,
        });
    }
    let decode = |url: &str, err: serde_json::Error| FetchError::Decode {
        url: url.to_string(),
        message: err.to_string(),
    };
    let pokemon: PokemonResponse =
        serde_json::from_slice(&core.body).map_err(|err| decode(&core.url, err))?;
    let species_record: PokemonSpeciesResponse =
        serde_json::from_slice(&species.body).map_err(|err| decode(&species.url, err))?;

    let mut types = pokemon.types;
    types.sort_by_key(|slot| slot.slot);

    Ok(PokemonDetail {
        id: pokemon.id,
        name: pokemon.name,
        height: pokemon.height,
        weight: pokemon.weight,
        types: types.into_iter().map(|slot| slot.type_info.name).collect(),
        abilities: pokemon
            .abilities
            .into_iter()
            .map(|slot| slot.ability.name)
            .collect(),
        stats: pokemon
            .stats
            .into_iter()
            .map(|slot| PokemonStat {
                name: slot.stat.name,
                value: slot.base_stat,
            })
            .collect(),
        flavor_text: english_flavor_text(&species_record.flavor_text_entries),
        genus: species_record
            .genera
            .iter()
            .find(|entry| entry.language.name == "en")
            .map(|entry| entry.genus.clone()),
        artwork_url,
    })
}

fn english_flavor_text(entries: &[FlavorTextEntry]) -> String {
    entries
        .iter()
        .find(|entry| entry.language.name == "en")
        .map(|entry| entry.flavor_text.replace('\u{000C}', " "))
        .unwrap_or_default()
}

/// Trailing numeric path segment of a resource URL (`.../pokemon/25/` -> 25).
pub fn id_from_resource_url(url: &str) -> Option<u16> {
    url.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
}

fn roster_from_listing(
    listing: ListResponse,
    max_id: u16,
    endpoints: &Endpoints,
) -> Vec<PokemonSummary> {
    let mut roster: Vec<PokemonSummary> = listing
        .results
        .into_iter()
        .filter_map(|entry| {
            let id = id_from_resource_url(&entry.url)?;
            if id == 0 || id > max_id {
                return None;
            }
            Some(PokemonSummary {
                id,
                name: entry.name,
                image_url: endpoints.artwork_url(id),
                types: Vec::new(),
            })
        })
        .collect();
    roster.sort_by_key(|entry| entry.id);
    roster.dedup_by_key(|entry| entry.id);
    roster
}

fn apply_type_memberships(
    roster: &mut [PokemonSummary],
    memberships: Vec<(String, Vec<(u16, u8)>)>,
) {
    let mut by_id: HashMap<u16, Vec<(u8, String)>> = HashMap::new();
    for (type_name, members) in memberships {
        for (id, slot) in members {
            by_id.entry(id).or_default().push((slot, type_name.clone()));
        }
    }
    for entry in roster.iter_mut() {
        if let Some(mut slots) = by_id.remove(&entry.id) {
            slots.sort_by_key(|(slot, _)| *slot);
            entry.types = slots.into_iter().map(|(_, name)| name).collect();
        }
    }
}

async fn read_cache(path: &Path) -> Option<Vec<u8>> {
    fs::read(path).await.ok()
}

async fn write_cache(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent).await;
    }
    if let Err(err) = fs::write(path, bytes).await {
        tracing::debug!(path = %path.display(), error = %err, "http cache write failed");
    }
}
