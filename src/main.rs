use std::cell::RefCell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tokio::sync::Mutex;
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventKind,
    HandlerResponse, Keybindings, TaskKey,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

use pokedex::action::Action;
use pokedex::api::PokeClient;
use pokedex::artwork::{self, ARTWORK_EDGE};
use pokedex::audio::{CryPlayer, RodioOutput};
use pokedex::cache::{DetailCache, DetailLoader, FileStore};
use pokedex::config::{self, Config, Endpoints};
use pokedex::effect::Effect;
use pokedex::logging;
use pokedex::reducer::reducer;
use pokedex::route::{self, Route};
use pokedex::state::{AppState, Screen};
use pokedex::ui::{DexComponentId, DexContext, DexUi};

const CRY_POLL: Duration = Duration::from_millis(200);

#[derive(Parser, Debug)]
#[command(name = "pokedex")]
#[command(about = "Pokedex list and detail browser over PokeAPI")]
struct Args {
    /// Open the detail screen for this id (`25` or `?id=25`).
    #[arg(long)]
    id: Option<String>,

    /// Highest id in the dataset.
    #[arg(long, env = "POKEDEX_MAX_ID", default_value_t = config::DEFAULT_MAX_ID,
          value_parser = clap::value_parser!(u16).range(1..))]
    max_id: u16,

    /// Dataset name; namespaces the persisted cache.
    #[arg(long, env = "POKEDEX_DATASET", default_value = config::DEFAULT_DATASET)]
    dataset: String,

    #[arg(long, default_value = config::DEFAULT_API_BASE)]
    api_base: String,

    #[arg(long, default_value = config::DEFAULT_ARTWORK_BASE)]
    artwork_base: String,

    #[arg(long, default_value = config::DEFAULT_CRY_LEGACY_BASE)]
    cry_legacy_base: String,

    #[arg(long, default_value = config::DEFAULT_CRY_LATEST_BASE)]
    cry_latest_base: String,

    #[arg(long)]
    cache_dir: Option<PathBuf>,

    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Never open an audio device.
    #[arg(long)]
    no_audio: bool,

    #[command(flatten)]
    debug: DebugCliArgs,
}

impl Args {
    fn config(&self) -> Config {
        Config {
            max_id: self.max_id,
            dataset: self.dataset.clone(),
            endpoints: Endpoints::new(
                &self.api_base,
                &self.artwork_base,
                &self.cry_legacy_base,
                &self.cry_latest_base,
            ),
            cache_dir: self
                .cache_dir
                .clone()
                .unwrap_or_else(config::default_cache_dir),
            log_dir: self.log_dir.clone().unwrap_or_else(config::default_log_dir),
            audio: !self.no_audio,
        }
    }
}

type SharedPlayer = Arc<Mutex<CryPlayer<PokeClient, RodioOutput>>>;

/// Everything effect tasks need; cloned into each task.
#[derive(Clone)]
struct Services {
    client: PokeClient,
    loader: Arc<DetailLoader<PokeClient, FileStore>>,
    player: Option<SharedPlayer>,
    max_id: u16,
}

impl Services {
    async fn start(config: &Config) -> Self {
        let client = PokeClient::new(config.endpoints.clone(), config.cache_dir.clone());
        let store = FileStore::new(config.cache_dir.join("store"));
        let cache = DetailCache::open(store, config.cache_namespace()).await;
        let loader = Arc::new(DetailLoader::new(client.clone(), cache));

        let player = if config.audio {
            match RodioOutput::open() {
                Ok(output) => Some(Arc::new(Mutex::new(CryPlayer::new(
                    client.clone(),
                    output,
                    config.endpoints.clone(),
                )))),
                Err(err) => {
                    tracing::warn!(error = %err, "audio output unavailable; cries disabled");
                    None
                }
            }
        } else {
            tracing::info!("audio disabled by flag");
            None
        };

        Self {
            client,
            loader,
            player,
            max_id: config.max_id,
        }
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    let config = args.config();
    let _log_guard = logging::init(&config.log_dir)?;
    tracing::info!(max_id = config.max_id, dataset = %config.dataset, "starting pokedex");

    let initial = initial_state(args.id.as_deref(), config.max_id);
    let debug = DebugSession::new(args.debug);

    let state = debug
        .load_state_or_else_async(|| {
            let initial = initial.clone();
            async move { Ok::<AppState, io::Error>(initial) }
        })
        .await
        .map_err(debug_error)?;
    let replay_actions = debug.load_replay_items().map_err(debug_error)?;
    let (middleware, recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);
    let services = Services::start(&config).await;

    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    if use_alt_screen {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
    }

    let run_output = result?;
    run_output.write_render_output()?;
    debug.save_actions(recorder.as_ref()).map_err(debug_error)?;
    tracing::info!("pokedex exited");
    Ok(())
}

fn initial_state(raw_id: Option<&str>, max_id: u16) -> AppState {
    match route::resolve(raw_id, max_id) {
        Route::Detail(id) => AppState::with_detail(max_id, id),
        Route::List => AppState::new(max_id),
    }
}

fn debug_error(error: DebugSessionError) -> io::Error {
    io::Error::other(format!("debug session error: {error}"))
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    debug: &DebugSession,
    store: impl EffectStoreLike<AppState, Action, Effect>,
    replay_actions: Vec<ReplayItem<Action>>,
    services: Services,
) -> io::Result<DebugRunOutput<AppState>> {
    let ui = Rc::new(RefCell::new(DexUi::new()));
    let mut bus: EventBus<AppState, Action, DexComponentId, DexContext> = EventBus::new();
    let keybindings: Keybindings<DexContext> = Keybindings::new();

    let ui_list = Rc::clone(&ui);
    bus.register(DexComponentId::DexList, move |event, state| {
        ui_list
            .borrow_mut()
            .handle_list_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(DexComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_detail = Rc::clone(&ui);
    bus.register(DexComponentId::Detail, move |event, state| {
        ui_detail
            .borrow_mut()
            .handle_detail_event(&event.kind, state)
    });

    bus.register_global(|event, state| match event.kind {
        EventKind::Resize(width, height) => {
            HandlerResponse::action(Action::UiTerminalResize(width, height)).with_render()
        }
        EventKind::Key(key) if !state.search.active => match key.code {
            crossterm::event::KeyCode::Char('q') => HandlerResponse::action(Action::Quit),
            crossterm::event::KeyCode::Char('/') if state.screen == Screen::List => {
                HandlerResponse::action(Action::SearchStart)
            }
            crossterm::event::KeyCode::Char('C') => HandlerResponse::action(Action::CacheClear),
            _ => HandlerResponse::ignored(),
        },
        _ => HandlerResponse::ignored(),
    });

    debug
        .run_effect_app_with_bus(
            terminal,
            store,
            DebugLayer::simple(),
            replay_actions,
            Some(Action::Init),
            Some(Action::Quit),
            |runtime| {
                if debug.render_once() {
                    return;
                }
                runtime
                    .subscriptions()
                    .interval("tick", Duration::from_millis(90), || Action::Tick);
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, &services),
        )
        .await
}

fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: &Services) {
    match effect {
        Effect::LoadRoster => {
            let client = services.client.clone();
            let max_id = services.max_id;
            ctx.tasks().spawn(TaskKey::new("roster"), async move {
                match client.fetch_roster(max_id).await {
                    Ok(entries) => Action::RosterDidLoad(entries),
                    Err(err) => {
                        tracing::error!(error = %err, "roster load failed");
                        Action::RosterDidError(err.to_string())
                    }
                }
            });
        }
        Effect::LoadDetail { id } => {
            let loader = Arc::clone(&services.loader);
            ctx.tasks().spawn(TaskKey::new("detail"), async move {
                match loader.load(id).await {
                    Ok(loaded) => Action::DetailDidLoad {
                        id,
                        detail: loaded.detail,
                        notice: loaded
                            .persist_error
                            .map(|err| format!("Cache unavailable: {err}")),
                    },
                    Err(err) => {
                        tracing::error!(id, error = %err, "detail load failed");
                        Action::DetailDidError {
                            id,
                            error: err.to_string(),
                        }
                    }
                }
            });
        }
        Effect::LoadArtwork { id, url } => {
            let client = services.client.clone();
            ctx.tasks().spawn(TaskKey::new("artwork"), async move {
                let decoded = match client.fetch_bytes(&url).await {
                    Ok(bytes) => artwork::decode_artwork(&bytes, ARTWORK_EDGE),
                    Err(err) => Err(err.to_string()),
                };
                match decoded {
                    Ok(artwork) => Action::ArtworkDidLoad { id, artwork },
                    Err(error) => {
                        tracing::warn!(id, error = %error, "artwork unavailable");
                        Action::ArtworkDidError { id, error }
                    }
                }
            });
        }
        Effect::PlayCry { id } => {
            let Some(player) = services.player.clone() else {
                tracing::debug!(id, "audio disabled; cry skipped");
                return;
            };
            ctx.tasks().spawn(TaskKey::new("cry"), async move {
                match player.lock().await.play(id).await {
                    Ok(variant) => Action::CryDidPlay { id, variant },
                    Err(err) => {
                        tracing::warn!(id, error = %err, "cry playback failed");
                        Action::CryDidError(err.to_string())
                    }
                }
            });
        }
        Effect::WatchCry => {
            let player = services.player.clone();
            ctx.tasks().spawn(TaskKey::new("cry-watch"), async move {
                if let Some(player) = player {
                    loop {
                        tokio::time::sleep(CRY_POLL).await;
                        if player.lock().await.reap_finished() {
                            break;
                        }
                    }
                }
                Action::CryDidFinish
            });
        }
        Effect::ClearCache => {
            let loader = Arc::clone(&services.loader);
            ctx.tasks().spawn(TaskKey::new("cache"), async move {
                match loader.clear().await {
                    Ok(()) => Action::CacheDidClear,
                    Err(err) => {
                        tracing::warn!(error = %err, "cache clear failed");
                        Action::CacheDidError(err.to_string())
                    }
                }
            });
        }
    }
}
