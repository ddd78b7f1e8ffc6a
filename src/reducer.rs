//! Reducer - pure function: (state, action) -> DispatchResult

use tui_dispatch::DispatchResult;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, ImageKind, Panel, Tab};

const LOCATION_REQUIRED: &str = "We require access to your location";

/// The reducer handles all state transitions
pub fn reducer(state: &mut AppState, action: Action) -> DispatchResult<Effect> {
    match action {
        // ===== Tab actions =====
        Action::TabSwitch(target) => switch_tab(state, target),

        // ===== Session actions =====
        Action::SessionDidLoad(coordinates) => {
            // A late answer must not pull the search tab back to location panels
            if state.tab != Tab::MyLocation {
                return DispatchResult::unchanged();
            }
            match coordinates {
                Some(coordinates) => {
                    state.panel = Panel::Loading;
                    state.tick_count = 0;
                    DispatchResult::changed_with(Effect::FetchByCoordinates(coordinates))
                }
                None => {
                    state.panel = Panel::AwaitingPermission;
                    DispatchResult::changed()
                }
            }
        }

        Action::SessionDidSave => DispatchResult::unchanged(),

        // ===== Location actions =====
        Action::LocationRequest => {
            if state.panel != Panel::AwaitingPermission || state.locating {
                return DispatchResult::unchanged();
            }
            state.locating = true;
            DispatchResult::changed_with(Effect::AcquireLocation)
        }

        Action::LocationDidGrant(coordinates) => {
            state.locating = false;
            state.panel = Panel::Loading;
            state.tick_count = 0;
            DispatchResult::changed_with_many(vec![
                Effect::SaveCoordinates(coordinates),
                Effect::FetchByCoordinates(coordinates),
            ])
        }

        Action::LocationUnavailable => {
            state.locating = false;
            state.alert = Some(LOCATION_REQUIRED.to_string());
            DispatchResult::changed()
        }

        // ===== Search actions =====
        Action::SearchQueryChange(query) => {
            if state.search_query == query {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            DispatchResult::changed()
        }

        Action::SearchSubmit(query) => {
            let city = query.trim().to_string();
            if city.is_empty() {
                return DispatchResult::unchanged();
            }
            state.search_query = query;
            state.panel = Panel::Loading;
            state.tick_count = 0;
            DispatchResult::changed_with(Effect::FetchByCity { city })
        }

        // ===== Weather actions =====
        Action::WeatherDidLoad(report) => {
            let effects = [ImageKind::Flag, ImageKind::Icon]
                .into_iter()
                .filter_map(|kind| {
                    report
                        .image_url(kind)
                        .map(|url| Effect::FetchImage { kind, url })
                })
                .collect::<Vec<_>>();
            state.report = Some(report);
            state.flag = None;
            state.icon = None;
            state.panel = Panel::Results;
            DispatchResult::changed_with_many(effects)
        }

        Action::WeatherDidError => {
            state.report = None;
            state.flag = None;
            state.icon = None;
            state.panel = Panel::Error;
            DispatchResult::changed()
        }

        // ===== Image actions =====
        Action::ImageDidLoad {
            kind,
            url,
            thumbnail,
        } => {
            let current = state.report.as_ref().and_then(|r| r.image_url(kind));
            if current.as_deref() != Some(url.as_str()) {
                return DispatchResult::unchanged();
            }
            *state.thumbnail_slot(kind) = Some(thumbnail);
            DispatchResult::changed()
        }

        // The text fallback is already on screen
        Action::ImageDidError { .. } => DispatchResult::unchanged(),

        // ===== Alert actions =====
        Action::AlertDismiss => {
            if state.alert.take().is_some() {
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        // ===== Global actions =====
        Action::Init => {
            state.panel = Panel::Loading;
            state.tick_count = 0;
            DispatchResult::changed_with(Effect::LoadSession)
        }

        Action::Render => DispatchResult::changed(),

        Action::Tick => {
            if state.is_loading() {
                state.tick_count = state.tick_count.wrapping_add(1);
                DispatchResult::changed()
            } else {
                DispatchResult::unchanged()
            }
        }

        Action::Quit => DispatchResult::unchanged(),
    }
}

/// Move to `target`, then choose the panel.
///
/// The search-form check comes first: if the form is hidden it is shown,
/// otherwise it is hidden along with any results and session storage is
/// consulted again to decide between the permission prompt and a fetch.
fn switch_tab(state: &mut AppState, target: Tab) -> DispatchResult<Effect> {
    if state.tab == target {
        return DispatchResult::unchanged();
    }
    let form_visible = state.search_form_visible();
    let leaving_error = state.panel == Panel::Error && target == Tab::MyLocation;
    state.tab = target;
    state.locating = false;

    if !form_visible && !leaving_error {
        state.panel = Panel::SearchEntry;
        return DispatchResult::changed();
    }

    state.panel = Panel::Loading;
    state.tick_count = 0;
    DispatchResult::changed_with(Effect::LoadSession)
}
