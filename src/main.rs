//! Skytab - current weather for your location or any city

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Frame, Terminal, backend::CrosstermBackend, layout::Rect};
use skytab::action::Action;
use skytab::api::{DEFAULT_API_URL, WeatherClient};
use skytab::components::{
    AlertDialog, AlertDialogProps, Component, SearchForm, SearchFormProps, WeatherDisplay,
    WeatherDisplayProps, display_layout,
};
use skytab::effect::Effect;
use skytab::geolocation::{DEFAULT_GEO_URL, GeolocationMode, LocationProvider, provider_for};
use skytab::reducer::reducer;
use skytab::session::SessionStore;
use skytab::state::{AppState, Coordinates, ImageKind, LOADING_ANIM_TICK_MS};
use skytab::thumbnail::Thumbnail;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use tui_dispatch::{
    EffectContext, EffectStoreLike, EffectStoreWithMiddleware, EventBus, EventContext, EventKind,
    EventRoutingState, HandlerResponse, Keybindings, RenderContext,
};
use tui_dispatch_debug::debug::DebugLayer;
use tui_dispatch_debug::{
    DebugCliArgs, DebugRunOutput, DebugSession, DebugSessionError, ReplayItem,
};

/// Current weather for your location or any city
#[derive(Parser, Debug)]
#[command(name = "skytab")]
#[command(about = "Current weather for your location or any city, in the terminal")]
struct Args {
    /// OpenWeatherMap API key
    #[arg(long, env = "OPENWEATHER_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Weather API base URL
    #[arg(long, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// How to find your position when you grant access
    #[arg(long, value_enum, default_value = "ip")]
    geolocation: GeolocationMode,

    /// IP geolocation endpoint
    #[arg(long, default_value = DEFAULT_GEO_URL)]
    geo_url: String,

    /// Fixed latitude (use with --lon)
    #[arg(long, requires = "lon", allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Fixed longitude (use with --lat)
    #[arg(long, requires = "lat", allow_hyphen_values = true)]
    lon: Option<f64>,

    /// Where remembered coordinates are kept
    #[arg(long)]
    session_file: Option<PathBuf>,

    /// Forget remembered coordinates before starting
    #[arg(long)]
    reset_session: bool,

    /// Write logs here (RUST_LOG filters, default skytab=info)
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(flatten)]
    debug: DebugCliArgs,
}

/// Everything effect tasks need to talk to the outside world
struct Services {
    weather: WeatherClient,
    session: SessionStore,
    locator: Option<Arc<dyn LocationProvider>>,
}

#[derive(tui_dispatch::ComponentId, Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum SkytabComponentId {
    Display,
    Search,
    Alert,
}

#[derive(tui_dispatch::BindingContext, Clone, Copy, PartialEq, Eq, Hash)]
enum SkytabContext {
    Main,
    Search,
    Alert,
}

impl EventRoutingState<SkytabComponentId, SkytabContext> for AppState {
    fn focused(&self) -> Option<SkytabComponentId> {
        if self.alert.is_some() {
            Some(SkytabComponentId::Alert)
        } else if self.search_form_visible() {
            Some(SkytabComponentId::Search)
        } else {
            Some(SkytabComponentId::Display)
        }
    }

    fn modal(&self) -> Option<SkytabComponentId> {
        self.alert.as_ref().map(|_| SkytabComponentId::Alert)
    }

    fn binding_context(&self, id: SkytabComponentId) -> SkytabContext {
        match id {
            SkytabComponentId::Display => SkytabContext::Main,
            SkytabComponentId::Search => SkytabContext::Search,
            SkytabComponentId::Alert => SkytabContext::Alert,
        }
    }

    fn default_context(&self) -> SkytabContext {
        SkytabContext::Main
    }
}

#[tokio::main]
async fn main() -> io::Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let debug = DebugSession::new(args.debug);

    // Export JSON schemas if requested
    debug.save_state_schema::<AppState>().map_err(debug_error)?;
    debug.save_actions_schema::<Action>().map_err(debug_error)?;

    let http = reqwest::Client::new();
    let fixed = match (args.lat, args.lon) {
        (Some(lat), Some(lon)) => Some(Coordinates::new(lat, lon)),
        _ => None,
    };
    let session = SessionStore::new(args.session_file.unwrap_or_else(SessionStore::default_path));
    if args.reset_session {
        session.clear().await.map_err(io::Error::other)?;
        info!(path = %session.path().display(), "session cleared");
    }

    let services = Services {
        weather: WeatherClient::new(http.clone(), args.api_key).with_base_url(args.api_url),
        session,
        locator: provider_for(args.geolocation, fixed, http, &args.geo_url),
    };

    let state = debug
        .load_state_or_else_async(|| async { Ok::<AppState, io::Error>(AppState::new()) })
        .await
        .map_err(debug_error)?;

    let replay_actions = debug.load_replay_items().map_err(debug_error)?;

    let (middleware, action_recorder) = debug.middleware_with_recorder();
    let store = EffectStoreWithMiddleware::new(state, reducer, middleware);

    // ===== Terminal setup =====
    let use_alt_screen = debug.use_alt_screen();
    let mut stdout = io::stdout();
    if use_alt_screen {
        enable_raw_mode()?;
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &debug, store, replay_actions, services).await;

    // ===== Cleanup =====
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
    debug
        .save_actions(action_recorder.as_ref())
        .map_err(debug_error)?;

    Ok(())
}

/// Logs go to a file or nowhere; the terminal belongs to the UI.
fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skytab=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .try_init()
        .map_err(io::Error::other)
}

struct SkytabUi {
    display: WeatherDisplay,
    search: SearchForm,
    alert: AlertDialog,
}

impl SkytabUi {
    fn new() -> Self {
        Self {
            display: WeatherDisplay::new(),
            search: SearchForm::new(),
            alert: AlertDialog::new(),
        }
    }

    fn search_props<'a>(state: &'a AppState, is_focused: bool) -> SearchFormProps<'a> {
        SearchFormProps {
            query: &state.search_query,
            tab: state.tab,
            is_focused,
            on_query_change: Action::SearchQueryChange,
            on_query_submit: Action::SearchSubmit,
        }
    }

    fn render(
        &mut self,
        frame: &mut Frame,
        area: Rect,
        state: &AppState,
        render_ctx: RenderContext,
        event_ctx: &mut EventContext<SkytabComponentId>,
    ) {
        event_ctx.set_component_area(SkytabComponentId::Display, area);
        let focused = state.focused();

        let props = WeatherDisplayProps {
            state,
            is_focused: render_ctx.is_focused() && focused == Some(SkytabComponentId::Display),
        };
        self.display.render(frame, area, props);

        let layout = display_layout(area, state);
        self.search.set_visible(layout.form.is_some());
        match layout.form {
            Some(form_area) => {
                event_ctx.set_component_area(SkytabComponentId::Search, form_area);
                let is_focused =
                    render_ctx.is_focused() && focused == Some(SkytabComponentId::Search);
                self.search
                    .render(frame, form_area, Self::search_props(state, is_focused));
            }
            None => {
                event_ctx
                    .component_areas
                    .remove(&SkytabComponentId::Search);
            }
        }

        match state.alert.as_deref() {
            Some(message) => {
                event_ctx.set_component_area(SkytabComponentId::Alert, area);
                let props = AlertDialogProps {
                    message,
                    is_focused: render_ctx.is_focused(),
                };
                self.alert.render(frame, area, props);
            }
            None => {
                event_ctx.component_areas.remove(&SkytabComponentId::Alert);
            }
        }
    }

    fn handle_display_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        let actions: Vec<_> = self
            .display
            .handle_event(event, props)
            .into_iter()
            .collect();
        consumed_if_any(actions)
    }

    fn handle_search_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        self.search.set_visible(state.search_form_visible());
        let actions: Vec<_> = self
            .search
            .handle_event(event, Self::search_props(state, true))
            .into_iter()
            .collect();
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }

    fn handle_alert_event(
        &mut self,
        event: &EventKind,
        state: &AppState,
    ) -> HandlerResponse<Action> {
        let Some(message) = state.alert.as_deref() else {
            return HandlerResponse::ignored();
        };
        let props = AlertDialogProps {
            message,
            is_focused: true,
        };
        let actions: Vec<_> = self.alert.handle_event(event, props).into_iter().collect();
        // Modal: swallow everything while open
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
    }
}

fn consumed_if_any(actions: Vec<Action>) -> HandlerResponse<Action> {
    if actions.is_empty() {
        HandlerResponse::ignored()
    } else {
        HandlerResponse {
            actions,
            consumed: true,
            needs_render: false,
        }
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
    let services = Arc::new(services);
    let ui = Rc::new(RefCell::new(SkytabUi::new()));
    let mut bus: EventBus<AppState, Action, SkytabComponentId, SkytabContext> = EventBus::new();
    let keybindings: Keybindings<SkytabContext> = Keybindings::new();

    let ui_display = Rc::clone(&ui);
    bus.register(SkytabComponentId::Display, move |event, state| {
        ui_display
            .borrow_mut()
            .handle_display_event(&event.kind, state)
    });

    let ui_search = Rc::clone(&ui);
    bus.register(SkytabComponentId::Search, move |event, state| {
        ui_search
            .borrow_mut()
            .handle_search_event(&event.kind, state)
    });

    let ui_alert = Rc::clone(&ui);
    bus.register(SkytabComponentId::Alert, move |event, state| {
        ui_alert.borrow_mut().handle_alert_event(&event.kind, state)
    });

    // Re-render on terminal resize (no action needed, just redraw)
    bus.register_global(|event, _state| match event.kind {
        EventKind::Resize(_, _) => HandlerResponse::ignored().with_render(),
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

                runtime.subscriptions().interval(
                    "tick",
                    Duration::from_millis(LOADING_ANIM_TICK_MS),
                    || Action::Tick,
                );
            },
            &mut bus,
            &keybindings,
            |frame, area, state, render_ctx, event_ctx| {
                ui.borrow_mut()
                    .render(frame, area, state, render_ctx, event_ctx);
            },
            |action| matches!(action, Action::Quit),
            move |effect, ctx| handle_effect(effect, ctx, Arc::clone(&services)),
        )
        .await
}

/// Handle effects by spawning tasks
fn handle_effect(effect: Effect, ctx: &mut EffectContext<Action>, services: Arc<Services>) {
    match effect {
        Effect::LoadSession => {
            ctx.tasks().spawn("session", async move {
                match services.session.coordinates().await {
                    Ok(coordinates) => Action::SessionDidLoad(coordinates),
                    Err(e) => {
                        warn!(error = %e, "ignoring unreadable session entry");
                        Action::SessionDidLoad(None)
                    }
                }
            });
        }
        Effect::SaveCoordinates(coordinates) => {
            ctx.tasks().spawn("save", async move {
                if let Err(e) = services.session.store_coordinates(&coordinates).await {
                    warn!(error = %e, "failed to remember coordinates");
                }
                Action::SessionDidSave
            });
        }
        Effect::AcquireLocation => {
            ctx.tasks().spawn("locate", async move {
                let Some(locator) = services.locator.as_ref() else {
                    info!("geolocation is disabled");
                    return Action::LocationUnavailable;
                };
                match locator.current_position().await {
                    Ok(coordinates) => Action::LocationDidGrant(coordinates),
                    Err(e) => {
                        warn!(error = %e, "geolocation failed");
                        Action::LocationUnavailable
                    }
                }
            });
        }
        Effect::FetchByCoordinates(coordinates) => {
            ctx.tasks().spawn("weather", async move {
                match services.weather.fetch_by_coordinates(coordinates).await {
                    Ok(report) => Action::WeatherDidLoad(report),
                    Err(e) => {
                        warn!(error = %e, "weather by coordinates failed");
                        Action::WeatherDidError
                    }
                }
            });
        }
        Effect::FetchByCity { city } => {
            ctx.tasks().spawn("weather", async move {
                match services.weather.fetch_by_city(&city).await {
                    Ok(report) => Action::WeatherDidLoad(report),
                    Err(e) => {
                        warn!(error = %e, %city, "weather by city failed");
                        Action::WeatherDidError
                    }
                }
            });
        }
        Effect::FetchImage { kind, url } => {
            let key = match kind {
                ImageKind::Flag => "flag",
                ImageKind::Icon => "icon",
            };
            ctx.tasks().spawn(key, async move {
                let (max_width, max_height) = Thumbnail::max_size(kind);
                let loaded = match services.weather.fetch_bytes(&url).await {
                    Ok(bytes) => Thumbnail::decode(&bytes, max_width, max_height),
                    Err(e) => Err(e.into()),
                };
                match loaded {
                    Ok(thumbnail) => Action::ImageDidLoad {
                        kind,
                        url,
                        thumbnail,
                    },
                    Err(e) => {
                        warn!(error = %e, %url, "image unavailable");
                        Action::ImageDidError { kind, url }
                    }
                }
            });
        }
    }
}
