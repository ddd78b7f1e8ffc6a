//! Reducer transitions and the actions components emit for key presses

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use skytab::{
    action::Action,
    components::{Component, SearchForm, SearchFormProps, WeatherDisplay, WeatherDisplayProps},
    effect::Effect,
    reducer::reducer,
    state::{AppState, Coordinates, Panel, Tab, WeatherReport},
};
use tui_dispatch::testing::*;
use tui_dispatch::{
    EffectStore, EventKind, NumericComponentId, assert_emitted, assert_not_emitted,
};

fn bengaluru() -> WeatherReport {
    WeatherReport {
        city: "Bengaluru".into(),
        country: Some("in".into()),
        description: Some("clear sky".into()),
        icon: Some("01d".into()),
        temperature: Some(25.0),
        wind_speed: Some(3.0),
        humidity: Some(60.0),
        cloudiness: Some(10.0),
    }
}

fn search_props(state: &AppState) -> SearchFormProps<'_> {
    SearchFormProps {
        query: &state.search_query,
        tab: state.tab,
        is_focused: true,
        on_query_change: Action::SearchQueryChange,
        on_query_submit: Action::SearchSubmit,
    }
}

#[test]
fn test_init_checks_session() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    let result = store.dispatch(Action::Init);
    assert!(result.changed);
    assert_eq!(store.state().panel, Panel::Loading);
    assert_eq!(result.effects, vec![Effect::LoadSession]);
}

#[test]
fn test_stored_coordinates_fetch_immediately() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    let coordinates = Coordinates::new(12.9, 77.6);

    store.dispatch(Action::Init);
    let result = store.dispatch(Action::SessionDidLoad(Some(coordinates)));

    assert_eq!(store.state().panel, Panel::Loading);
    assert_eq!(result.effects, vec![Effect::FetchByCoordinates(coordinates)]);
}

#[test]
fn test_no_stored_coordinates_prompts() {
    let mut store = EffectStore::new(AppState::default(), reducer);

    store.dispatch(Action::Init);
    let result = store.dispatch(Action::SessionDidLoad(None));

    assert!(result.effects.is_empty());
    assert_eq!(store.state().panel, Panel::AwaitingPermission);
}

#[test]
fn test_grant_saves_then_fetches() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::SessionDidLoad(None));

    let result = store.dispatch(Action::LocationRequest);
    assert_eq!(result.effects, vec![Effect::AcquireLocation]);
    assert!(store.state().locating);

    let coordinates = Coordinates::new(12.9, 77.6);
    let result = store.dispatch(Action::LocationDidGrant(coordinates));
    assert_eq!(
        result.effects,
        vec![
            Effect::SaveCoordinates(coordinates),
            Effect::FetchByCoordinates(coordinates),
        ]
    );
    assert!(!store.state().locating);
    assert_eq!(store.state().panel, Panel::Loading);
}

#[test]
fn test_missing_capability_alerts() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::SessionDidLoad(None));
    store.dispatch(Action::LocationRequest);

    store.dispatch(Action::LocationUnavailable);
    assert_eq!(
        store.state().alert.as_deref(),
        Some("We require access to your location")
    );
    // The prompt stays so the user can try again
    assert_eq!(store.state().panel, Panel::AwaitingPermission);

    store.dispatch(Action::AlertDismiss);
    assert_eq!(store.state().alert, None);
}

#[test]
fn test_same_tab_switch_is_noop() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::WeatherDidLoad(bengaluru()));
    let before = store.state().clone();

    let result = store.dispatch(Action::TabSwitch(Tab::MyLocation));
    assert!(!result.changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().tab, before.tab);
    assert_eq!(store.state().panel, before.panel);
}

#[test]
fn test_failed_fetch_shows_error_panel() {
    let mut store = EffectStore::new(AppState::default(), reducer);
    store.dispatch(Action::SessionDidLoad(Some(Coordinates::new(0.0, 0.0))));

    store.dispatch(Action::WeatherDidError);
    assert_eq!(store.state().panel, Panel::Error);
    assert!(store.state().report.is_none());
}

#[test]
fn test_component_grant_key() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState {
        panel: Panel::AwaitingPermission,
        ..Default::default()
    });
    let mut component = WeatherDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("g", |state, event| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_count(1);
    actions.assert_first(Action::LocationRequest);
}

#[test]
fn test_component_ignores_when_unfocused() {
    let mut harness = TestHarness::<AppState, Action>::default();
    let mut component = WeatherDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("g 2 q", |state, event| {
        let props = WeatherDisplayProps {
            state,
            is_focused: false,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    actions.assert_empty();
}

#[test]
fn test_action_categories() {
    let did_load = Action::WeatherDidLoad(WeatherReport::default());
    let submit = Action::SearchSubmit("Paris".into());
    let tick = Action::Tick;

    assert_eq!(did_load.category(), Some("weather_did"));
    assert_eq!(submit.category(), Some("search"));
    assert_eq!(tick.category(), None);

    assert!(did_load.is_weather_did());
    assert!(submit.is_search());
}

#[test]
fn test_display_keys_on_prompt() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState {
        panel: Panel::AwaitingPermission,
        ..Default::default()
    });
    let mut component = WeatherDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("2 g q", |state, event| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    assert_emitted!(actions, Action::TabSwitch(Tab::Search));
    assert_emitted!(actions, Action::LocationRequest);
    assert_emitted!(actions, Action::Quit);
}

#[test]
fn test_display_grant_key_ignored_on_results() {
    let mut harness = TestHarness::<AppState, Action>::new(AppState {
        panel: Panel::Results,
        report: Some(bengaluru()),
        ..Default::default()
    });
    let mut component = WeatherDisplay::new();

    let actions = harness.send_keys::<NumericComponentId, _, _>("g 1", |state, event| {
        let props = WeatherDisplayProps {
            state,
            is_focused: true,
        };
        component
            .handle_event(&event.kind, props)
            .into_iter()
            .collect::<Vec<_>>()
    });

    assert_not_emitted!(actions, Action::LocationRequest);
    assert_emitted!(actions, Action::TabSwitch(Tab::MyLocation));
}

#[test]
fn test_search_form_keys() {
    let state = AppState {
        tab: Tab::Search,
        panel: Panel::SearchEntry,
        search_query: "Pune".into(),
        ..Default::default()
    };
    let mut harness = TestHarness::<AppState, Action>::new(state.clone());
    let mut form = SearchForm::new();
    form.set_visible(true);

    let actions = harness.send_keys::<NumericComponentId, _, _>("x", |state, event| {
        form.handle_event(&event.kind, search_props(state))
            .into_iter()
            .collect::<Vec<_>>()
    });
    assert_emitted!(actions, Action::SearchQueryChange(_));
    assert_not_emitted!(actions, Action::SearchSubmit(_));

    let enter = EventKind::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
    let actions: Vec<_> = form
        .handle_event(&enter, search_props(&state))
        .into_iter()
        .collect();
    assert_emitted!(actions, Action::SearchSubmit(_));
    actions.assert_first(Action::SearchSubmit("Pune".into()));

    let esc = EventKind::Key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
    let actions: Vec<_> = form
        .handle_event(&esc, search_props(&state))
        .into_iter()
        .collect();
    assert_emitted!(actions, Action::TabSwitch(Tab::MyLocation));
    assert_not_emitted!(actions, Action::Quit);
}
