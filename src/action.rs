use serde::{Deserialize, Serialize};

use crate::artwork::Artwork;
use crate::config::CryVariant;
use crate::navigator::Direction;
use crate::state::{PokemonDetail, PokemonSummary};

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[action(infer_categories)]
pub enum Action {
    Init,
    RosterDidLoad(Vec<PokemonSummary>),
    RosterDidError(String),

    SearchStart,
    SearchCancel,
    SearchSubmit,
    SearchInput(char),
    SearchBackspace,
    FilterModeNext,

    SelectionMove(i16),
    SelectionPage(i16),
    SelectionJumpTop,
    SelectionJumpBottom,
    DexSelect(usize),
    CardActivate(u16),

    Navigate(Direction),
    GoHome,
    DetailDidLoad {
        id: u16,
        detail: PokemonDetail,
        notice: Option<String>,
    },
    DetailDidError {
        id: u16,
        error: String,
    },
    ArtworkDidLoad {
        id: u16,
        artwork: Artwork,
    },
    ArtworkDidError {
        id: u16,
        error: String,
    },

    PlayCry,
    CryDidPlay {
        id: u16,
        variant: CryVariant,
    },
    CryDidFinish,
    CryDidError(String),

    CacheClear,
    CacheDidClear,
    CacheDidError(String),

    UiTerminalResize(u16, u16),
    Tick,
    Quit,
}
