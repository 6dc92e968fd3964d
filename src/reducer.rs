use tui_dispatch::{DataResource, DispatchResult};

use crate::action::Action;
use crate::effect::Effect;
use crate::navigator::Navigator;
use crate::route::{detail_location, LIST_LOCATION};
use crate::state::{AppState, Screen};
use crate::theme::Theme;

pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        Action::Init => {
            let mut effects = Vec::new();
            if state.roster.is_empty() {
                state.list_loading = true;
                state.list_error = None;
                effects.push(Effect::LoadRoster);
            }
            if state.screen == Screen::Detail {
                if let Some(id) = state.pending_id {
                    state.detail = DataResource::Loading;
                    effects.push(Effect::LoadDetail { id });
                }
            }
            DispatchResult::changed_with_many(effects)
        }

        Action::RosterDidLoad(entries) => {
            state.roster = entries;
            state.list_loading = false;
            state.list_error = None;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::RosterDidError(error) => {
            state.list_loading = false;
            state.list_error = Some(error.clone());
            state.message = Some(format!("Roster error: {error}"));
            DispatchResult::changed()
        }

        Action::SearchStart => {
            if state.screen != Screen::List || state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = true;
            DispatchResult::changed()
        }

        Action::SearchCancel => {
            if !state.search.active && state.search.query.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.search.query.clear();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchSubmit => {
            if !state.search.active {
                return DispatchResult::unchanged();
            }
            state.search.active = false;
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchInput(ch) => {
            state.search.query.push(ch);
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SearchBackspace => {
            if state.search.query.pop().is_none() {
                return DispatchResult::unchanged();
            }
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::FilterModeNext => {
            if state.screen != Screen::List {
                return DispatchResult::unchanged();
            }
            state.search.mode = state.search.mode.next();
            state.rebuild_filtered();
            DispatchResult::changed()
        }

        Action::SelectionMove(delta) => {
            let index = (state.selected_index as i32 + i32::from(delta)).max(0);
            changed_if(state.set_selected_index(index as usize))
        }

        Action::SelectionPage(delta) => {
            let page = list_page_size(state) as i32;
            let index = (state.selected_index as i32 + i32::from(delta) * page).max(0);
            changed_if(state.set_selected_index(index as usize))
        }

        Action::SelectionJumpTop => changed_if(state.set_selected_index(0)),

        Action::SelectionJumpBottom => {
            let last = state.filtered_indices.len().saturating_sub(1);
            changed_if(state.set_selected_index(last))
        }

        Action::DexSelect(index) => changed_if(state.set_selected_index(index)),

        Action::CardActivate(id) => {
            let navigator = match Navigator::new(id, state.max_id) {
                Ok(navigator) => navigator,
                Err(err) => {
                    tracing::warn!(id, error = %err, "card id rejected");
                    return DispatchResult::unchanged();
                }
            };
            state.search.active = false;
            state.screen = Screen::Detail;
            state.navigator = Some(navigator);
            state.location = detail_location(id);
            request_detail(state, id)
        }

        Action::Navigate(direction) => {
            if state.screen != Screen::Detail {
                return DispatchResult::unchanged();
            }
            let Some(navigator) = state.navigator else {
                return DispatchResult::unchanged();
            };
            let from = state.pending_id.unwrap_or(navigator.current());
            let Some(target) = navigator.step_from(from, direction) else {
                return DispatchResult::unchanged();
            };
            request_detail(state, target)
        }

        Action::GoHome => {
            if state.screen == Screen::List {
                return DispatchResult::unchanged();
            }
            state.screen = Screen::List;
            state.location = LIST_LOCATION.to_string();
            state.navigator = None;
            state.pending_id = None;
            state.detail = DataResource::Empty;
            state.message = None;
            DispatchResult::changed()
        }

        Action::DetailDidLoad { id, detail, notice } => {
            if state.pending_id != Some(id) {
                tracing::debug!(id, pending = ?state.pending_id, "discarding stale detail");
                return DispatchResult::unchanged();
            }
            state.pending_id = None;
            match state.navigator.as_mut() {
                Some(navigator) => {
                    navigator.commit(id);
                }
                None => state.navigator = Navigator::new(id, state.max_id).ok(),
            }
            state.theme = Theme::for_types(&detail.types);
            state.location = detail_location(id);
            state.message = None;
            state.notice = notice;

            let mut effects = vec![Effect::PlayCry { id }];
            state.artwork_loading = !state.artwork.contains_key(&id);
            if state.artwork_loading {
                effects.push(Effect::LoadArtwork {
                    id,
                    url: detail.artwork_url.clone(),
                });
            }
            state.detail = DataResource::Loaded(detail);
            DispatchResult::changed_with_many(effects)
        }

        Action::DetailDidError { id, error } => {
            if state.pending_id != Some(id) {
                tracing::debug!(id, pending = ?state.pending_id, "discarding stale detail error");
                return DispatchResult::unchanged();
            }
            state.pending_id = None;
            state.message = Some(format!("Could not load #{id:03}"));
            state.detail = DataResource::Failed(error);
            DispatchResult::changed()
        }

        Action::ArtworkDidLoad { id, artwork } => {
            state.artwork.insert(id, artwork);
            if state.current_id() == Some(id) {
                state.artwork_loading = false;
            }
            DispatchResult::changed()
        }

        Action::ArtworkDidError { id, error } => {
            tracing::debug!(id, error = %error, "artwork unavailable");
            if state.current_id() == Some(id) {
                state.artwork_loading = false;
            }
            DispatchResult::changed()
        }

        Action::PlayCry => {
            let Some(detail) = state.current_detail() else {
                return DispatchResult::unchanged();
            };
            DispatchResult::changed_with(Effect::PlayCry { id: detail.id })
        }

        Action::CryDidPlay { .. } => {
            state.cry_playing = true;
            DispatchResult::changed_with(Effect::WatchCry)
        }

        Action::CryDidFinish => {
            if !state.cry_playing {
                return DispatchResult::unchanged();
            }
            state.cry_playing = false;
            DispatchResult::changed()
        }

        Action::CryDidError(error) => {
            state.cry_playing = false;
            state.notice = Some(format!("No cry: {error}"));
            DispatchResult::changed()
        }

        Action::CacheClear => {
            state.notice = Some("Clearing cache...".to_string());
            DispatchResult::changed_with(Effect::ClearCache)
        }

        Action::CacheDidClear => {
            state.notice = Some("Cache cleared".to_string());
            DispatchResult::changed()
        }

        Action::CacheDidError(error) => {
            state.notice = Some(format!("Cache error: {error}"));
            DispatchResult::changed()
        }

        Action::UiTerminalResize(width, height) => {
            if state.terminal_size != (width, height) {
                state.terminal_size = (width, height);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Tick => {
            state.tick = state.tick.wrapping_add(1);
            changed_if(state.list_loading || state.detail.is_loading() || state.artwork_loading)
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Last write wins: the newest request replaces `pending_id`, and only a
/// response for that id is rendered.
fn request_detail(state: &mut AppState, id: u16) -> DispatchResult<Effect> {
    state.pending_id = Some(id);
    state.detail = DataResource::Loading;
    state.message = None;
    state.notice = None;
    DispatchResult::changed_with(Effect::LoadDetail { id })
}

fn changed_if(changed: bool) -> DispatchResult<Effect> {
    if changed {
        DispatchResult::changed()
    } else {
        DispatchResult::unchanged()
    }
}

fn list_page_size(state: &AppState) -> usize {
    state.terminal_size.1.saturating_sub(6).max(1) as usize
}
