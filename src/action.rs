//! Actions: user intents and async results

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::state::{Coordinates, ImageKind, Tab, WeatherReport};
use crate::thumbnail::Thumbnail;

#[derive(tui_dispatch::Action, Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[action(infer_categories)]
pub enum Action {
    // ===== Tab category =====
    /// Select a tab (no-op if already active)
    TabSwitch(Tab),

    // ===== Session category =====
    /// Result: session storage checked for saved coordinates
    SessionDidLoad(Option<Coordinates>),

    /// Result: coordinate write finished (failures are logged)
    SessionDidSave,

    // ===== Location category =====
    /// Grant access to the current location
    LocationRequest,

    /// Result: the location provider answered
    LocationDidGrant(Coordinates),

    /// Result: no location capability (or the provider failed)
    LocationUnavailable,

    // ===== Search category =====
    /// Search field text changed
    SearchQueryChange(String),

    /// Search form submitted
    SearchSubmit(String),

    // ===== Weather category =====
    /// Result: weather report parsed
    WeatherDidLoad(WeatherReport),

    /// Result: network, parse, or missing-data failure
    WeatherDidError,

    // ===== Image category =====
    ImageDidLoad {
        kind: ImageKind,
        url: String,
        thumbnail: Thumbnail,
    },

    ImageDidError {
        kind: ImageKind,
        url: String,
    },

    // ===== Alert category =====
    AlertDismiss,

    // ===== Uncategorized (global) =====
    /// Startup: check the session like a fresh page load
    Init,

    /// Force a re-render (cursor movement in the search field)
    Render,

    /// Spinner tick
    Tick,

    Quit,
}
