use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tui_dispatch::DataResource;
use tui_dispatch_debug::debug::{ron_string, DebugSection, DebugState};

use crate::artwork::Artwork;
use crate::filter::{self, FilterMode};
use crate::navigator::Navigator;
use crate::route::LIST_LOCATION;
use crate::theme::Theme;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonSummary {
    pub id: u16,
    pub name: String,
    pub image_url: String,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonStat {
    pub name: String,
    pub value: u16,
}

/// Core record joined with its species record. Heights are decimeters,
/// weights hectograms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PokemonDetail {
    pub id: u16,
    pub name: String,
    pub height: u16,
    pub weight: u16,
    pub types: Vec<String>,
    pub abilities: Vec<String>,
    pub stats: Vec<PokemonStat>,
    pub flavor_text: String,
    #[serde(default)]
    pub genus: Option<String>,
    pub artwork_url: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub active: bool,
    pub query: String,
    pub mode: FilterMode,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    List,
    Detail,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppState {
    pub terminal_size: (u16, u16),
    pub screen: Screen,
    /// Visible location, `list` or `detail?id=N`.
    pub location: String,
    pub max_id: u16,

    pub roster: Vec<PokemonSummary>,
    pub list_loading: bool,
    pub list_error: Option<String>,
    pub search: SearchState,
    pub filtered_indices: Vec<usize>,
    pub selected_index: usize,

    pub navigator: Option<Navigator>,
    /// Most recently requested detail id; responses for any other id are stale.
    pub pending_id: Option<u16>,
    pub detail: DataResource<PokemonDetail>,
    pub theme: Theme,
    pub artwork: HashMap<u16, Artwork>,
    pub artwork_loading: bool,

    pub cry_playing: bool,
    /// Passive, non-blocking notice (cache or audio trouble).
    pub notice: Option<String>,
    pub message: Option<String>,
    pub tick: u64,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_MAX_ID)
    }
}

impl AppState {
    pub fn new(max_id: u16) -> Self {
        Self {
            terminal_size: (80, 24),
            screen: Screen::List,
            location: LIST_LOCATION.to_string(),
            max_id,
            roster: Vec::new(),
            list_loading: false,
            list_error: None,
            search: SearchState::default(),
            filtered_indices: Vec::new(),
            selected_index: 0,
            navigator: None,
            pending_id: None,
            detail: DataResource::Empty,
            theme: Theme::default(),
            artwork: HashMap::new(),
            artwork_loading: false,
            cry_playing: false,
            notice: None,
            message: None,
            tick: 0,
        }
    }

    /// Starts on the detail screen for an already validated id.
    pub fn with_detail(max_id: u16, id: u16) -> Self {
        let mut state = Self::new(max_id);
        if let Ok(navigator) = Navigator::new(id, max_id) {
            state.screen = Screen::Detail;
            state.navigator = Some(navigator);
            state.pending_id = Some(id);
            state.detail = DataResource::Loading;
            state.location = crate::route::detail_location(id);
        }
        state
    }

    pub fn selected_entry(&self) -> Option<&PokemonSummary> {
        self.filtered_indices
            .get(self.selected_index)
            .and_then(|idx| self.roster.get(*idx))
    }

    pub fn set_selected_index(&mut self, index: usize) -> bool {
        if self.filtered_indices.is_empty() {
            self.selected_index = 0;
            return false;
        }
        let bounded = index.min(self.filtered_indices.len() - 1);
        if bounded != self.selected_index {
            self.selected_index = bounded;
            return true;
        }
        false
    }

    pub fn rebuild_filtered(&mut self) {
        self.filtered_indices =
            filter::filter_indices(&self.roster, self.search.mode, &self.search.query);
        if self.selected_index >= self.filtered_indices.len() {
            self.selected_index = 0;
        }
    }

    /// Roster loaded but nothing matches the current query.
    pub fn not_found(&self) -> bool {
        !self.list_loading && !self.roster.is_empty() && self.filtered_indices.is_empty()
    }

    pub fn current_id(&self) -> Option<u16> {
        self.navigator.map(|nav| nav.current())
    }

    pub fn current_detail(&self) -> Option<&PokemonDetail> {
        self.detail.data()
    }

    pub fn current_artwork(&self) -> Option<&Artwork> {
        let id = self.current_detail()?.id;
        self.artwork.get(&id)
    }

    pub fn can_prev(&self) -> bool {
        self.navigator.map(|nav| nav.can_prev()).unwrap_or(false)
    }

    pub fn can_next(&self) -> bool {
        self.navigator.map(|nav| nav.can_next()).unwrap_or(false)
    }
}

impl DebugState for AppState {
    fn debug_sections(&self) -> Vec<DebugSection> {
        vec![
            DebugSection::new("Dex")
                .entry("screen", ron_string(&self.screen))
                .entry("location", ron_string(&self.location))
                .entry("total", ron_string(&self.roster.len()))
                .entry("filtered", ron_string(&self.filtered_indices.len()))
                .entry("selected", ron_string(&self.selected_index)),
            DebugSection::new("Search")
                .entry("query", ron_string(&self.search.query))
                .entry("active", ron_string(&self.search.active))
                .entry("mode", ron_string(&self.search.mode)),
            DebugSection::new("Navigator")
                .entry("current", ron_string(&self.current_id()))
                .entry("pending", ron_string(&self.pending_id))
                .entry("max", ron_string(&self.max_id))
                .entry("accent", ron_string(&self.theme.accent.hex())),
            DebugSection::new("Status")
                .entry("list_loading", ron_string(&self.list_loading))
                .entry("detail_loading", ron_string(&self.detail.is_loading()))
                .entry("artwork_loading", ron_string(&self.artwork_loading))
                .entry("cry_playing", ron_string(&self.cry_playing))
                .entry("notice", ron_string(&self.notice))
                .entry("message", ron_string(&self.message)),
        ]
    }
}
