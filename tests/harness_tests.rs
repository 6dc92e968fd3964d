//! Reducer flows driven through EffectStoreTestHarness, with async results
//! completed by hand.

use tui_dispatch::testing::*;

use pokedex::action::Action;
use pokedex::effect::Effect;
use pokedex::navigator::Direction;
use pokedex::reducer::reducer;
use pokedex::state::{AppState, PokemonDetail, PokemonSummary, Screen};
use pokedex::theme::DEFAULT_ACCENT;

fn roster(count: u16) -> Vec<PokemonSummary> {
    (1..=count)
        .map(|id| PokemonSummary {
            id,
            name: format!("mon{id}"),
            image_url: format!("art/{id}.png"),
            types: vec![if id % 2 == 0 { "water" } else { "fire" }.to_string()],
        })
        .collect()
}

fn detail(id: u16, primary: &str) -> PokemonDetail {
    PokemonDetail {
        id,
        name: format!("mon{id}"),
        height: 10,
        weight: 100,
        types: vec![primary.to_string()],
        abilities: Vec::new(),
        stats: Vec::new(),
        flavor_text: String::new(),
        genus: None,
        artwork_url: format!("art/{id}.png"),
    }
}

#[test]
fn list_card_opens_detail_without_waiting() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);

    harness.dispatch_collect(Action::Init);
    harness.assert_state(|s| s.list_loading);
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadRoster));

    harness.complete_action(Action::RosterDidLoad(roster(40)));
    harness.process_emitted();
    harness.assert_state(|s| s.filtered_indices.len() == 40);

    harness.dispatch_collect(Action::CardActivate(25));
    harness.assert_state(|s| s.screen == Screen::Detail);
    harness.assert_state(|s| s.location == "detail?id=25");
    harness.assert_state(|s| s.detail.is_loading());
    let effects = harness.drain_effects();
    effects.effects_count(1);
    effects.effects_first_matches(|e| matches!(e, Effect::LoadDetail { id: 25 }));

    harness.complete_action(Action::DetailDidLoad {
        id: 25,
        detail: detail(25, "electric"),
        notice: None,
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 1));
    harness.assert_state(|s| s.current_id() == Some(25));
    harness.assert_state(|s| s.theme.primary_type.as_deref() == Some("electric"));
}

#[test]
fn rapid_navigation_renders_only_the_last_request() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 10), reducer);
    harness.dispatch_collect(Action::Init);
    harness.drain_effects();
    harness.complete_action(Action::DetailDidLoad {
        id: 10,
        detail: detail(10, "bug"),
        notice: None,
    });
    harness.process_emitted();
    harness.drain_effects();

    let results = harness.dispatch_all([
        Action::Navigate(Direction::Next),
        Action::Navigate(Direction::Next),
        Action::Navigate(Direction::Next),
    ]);
    assert_eq!(results, vec![true, true, true]);
    harness.drain_effects().effects_count(3);
    harness.assert_state(|s| s.pending_id == Some(13));

    harness.complete_action(Action::DetailDidLoad {
        id: 13,
        detail: detail(13, "water"),
        notice: None,
    });
    harness.complete_action(Action::DetailDidLoad {
        id: 11,
        detail: detail(11, "fire"),
        notice: None,
    });
    harness.complete_action(Action::DetailDidError {
        id: 12,
        error: "timeout".into(),
    });
    let (changed, total) = harness.process_emitted();
    assert_eq!((changed, total), (1, 3));

    harness.assert_state(|s| s.current_id() == Some(13));
    harness.assert_state(|s| s.location == "detail?id=13");
    harness.assert_state(|s| s.theme.primary_type.as_deref() == Some("water"));
    harness.assert_state(|s| s.detail.data().map(|d| d.id) == Some(13));
}

#[test]
fn unmapped_type_falls_back_to_default_accent() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 1), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::DetailDidLoad {
        id: 1,
        detail: detail(1, "shadow"),
        notice: None,
    });
    harness.process_emitted();
    harness.assert_state(|s| s.theme.accent == DEFAULT_ACCENT);
    harness.assert_state(|s| s.detail.is_loaded());
}

#[test]
fn persistence_notice_does_not_block_the_detail() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 4), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::DetailDidLoad {
        id: 4,
        detail: detail(4, "fire"),
        notice: Some("Cache unavailable: quota exceeded".into()),
    });
    harness.process_emitted();
    harness.assert_state(|s| s.detail.is_loaded());
    harness.assert_state(|s| s.notice.as_deref() == Some("Cache unavailable: quota exceeded"));
}

#[test]
fn load_failure_outranks_an_earlier_cry_notice() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 1), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::DetailDidLoad {
        id: 1,
        detail: detail(1, "grass"),
        notice: None,
    });
    harness.process_emitted();
    harness.complete_action(Action::CryDidError("audio output unavailable".into()));
    harness.process_emitted();
    harness.assert_state(|s| s.notice.as_deref() == Some("No cry: audio output unavailable"));
    harness.drain_effects();

    harness.dispatch_collect(Action::Navigate(Direction::Next));
    harness.assert_state(|s| s.notice.is_none());
    harness.complete_action(Action::DetailDidError {
        id: 2,
        error: "HTTP 500".into(),
    });
    harness.process_emitted();
    harness.assert_state(|s| pokedex::ui::footer_status(s) == "Could not load #002");
    harness.assert_state(|s| s.current_id() == Some(1));
}

#[test]
fn late_cry_error_does_not_mask_a_load_failure() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 1), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::DetailDidLoad {
        id: 1,
        detail: detail(1, "grass"),
        notice: None,
    });
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::Navigate(Direction::Next));
    harness.complete_action(Action::DetailDidError {
        id: 2,
        error: "HTTP 500".into(),
    });
    harness.complete_action(Action::CryDidError("decode failed".into()));
    harness.process_emitted();
    harness.assert_state(|s| pokedex::ui::footer_status(s) == "Could not load #002");
}

#[test]
fn clean_load_drops_an_old_notice() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 4), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::DetailDidLoad {
        id: 4,
        detail: detail(4, "fire"),
        notice: Some("Cache unavailable: quota exceeded".into()),
    });
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::Navigate(Direction::Next));
    harness.complete_action(Action::DetailDidLoad {
        id: 5,
        detail: detail(5, "fire"),
        notice: None,
    });
    harness.process_emitted();
    harness.assert_state(|s| s.notice.is_none());
    harness.assert_state(|s| !pokedex::ui::footer_status(s).starts_with("Cache"));
}

#[test]
fn search_by_type_and_back_to_everything() {
    let mut harness = EffectStoreTestHarness::new(AppState::default(), reducer);
    harness.dispatch_collect(Action::RosterDidLoad(roster(10)));

    harness.dispatch_all([Action::FilterModeNext, Action::FilterModeNext, Action::SearchStart]);
    for ch in "WAT".chars() {
        harness.dispatch_collect(Action::SearchInput(ch));
    }
    harness.assert_state(|s| s.filtered_indices.len() == 5);
    harness.assert_state(|s| !s.not_found());

    harness.dispatch_collect(Action::SearchInput('z'));
    harness.assert_state(|s| s.not_found());

    harness.dispatch_collect(Action::SearchCancel);
    harness.assert_state(|s| s.filtered_indices.len() == 10);
    harness.assert_state(|s| !s.not_found());
}

#[test]
fn cry_lifecycle_clears_playing_flag() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 7), reducer);
    harness.dispatch_collect(Action::Init);
    harness.complete_action(Action::DetailDidLoad {
        id: 7,
        detail: detail(7, "water"),
        notice: None,
    });
    harness.process_emitted();
    harness.drain_effects();

    harness.dispatch_collect(Action::PlayCry);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::PlayCry { id: 7 }));

    harness.complete_action(Action::CryDidPlay {
        id: 7,
        variant: pokedex::config::CryVariant::Legacy,
    });
    harness.process_emitted();
    harness.assert_state(|s| s.cry_playing);
    harness
        .drain_effects()
        .effects_first_matches(|e| matches!(e, Effect::WatchCry));

    harness.complete_action(Action::CryDidFinish);
    harness.process_emitted();
    harness.assert_state(|s| !s.cry_playing);
}

#[test]
fn go_home_returns_to_list() {
    let mut harness = EffectStoreTestHarness::new(AppState::with_detail(386, 5), reducer);
    harness.dispatch_collect(Action::GoHome);
    harness.assert_state(|s| s.screen == Screen::List);
    harness.assert_state(|s| s.location == "list");
    harness.assert_state(|s| s.navigator.is_none());

    // a late response for the abandoned id is ignored
    harness.complete_action(Action::DetailDidLoad {
        id: 5,
        detail: detail(5, "fire"),
        notice: None,
    });
    let (changed, _) = harness.process_emitted();
    assert_eq!(changed, 0);
}
