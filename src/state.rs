//! Application state - single source of truth

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::thumbnail::Thumbnail;

/// Base URL for country flag images, keyed by lowercase ISO country code
pub const FLAG_CDN_URL: &str = "https://flagcdn.com/144x108";

/// Base URL for OpenWeatherMap condition icons
pub const ICON_URL: &str = "https://openweathermap.org/img/w";

/// Spinner timing for the loading panel.
pub const LOADING_ANIM_TICK_MS: u64 = 80;
pub const SPINNER_FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// A geographic position, stored in the session as `{"lat":..,"lon":..}`
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Lookup mode selected in the tab bar
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Tab {
    #[default]
    MyLocation,
    Search,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::MyLocation, Tab::Search];

    pub fn other(&self) -> Self {
        match self {
            Tab::MyLocation => Tab::Search,
            Tab::Search => Tab::MyLocation,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Tab::MyLocation => "Your Weather",
            Tab::Search => "Search Weather",
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Tab::MyLocation => 0,
            Tab::Search => 1,
        }
    }
}

/// The one content panel currently on screen
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum Panel {
    /// Asking the user to share their location
    AwaitingPermission,
    /// City search form, nothing fetched yet
    SearchEntry,
    /// A weather report is displayed
    Results,
    /// The last fetch failed
    Error,
    /// A session check or weather request is in flight
    #[default]
    Loading,
}

/// Which image slot of the results card a thumbnail belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum ImageKind {
    Flag,
    Icon,
}

/// Current conditions for one place, normalized from the weather API
///
/// Only the city name is guaranteed; everything else may be missing from
/// the provider's response and renders as `--`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WeatherReport {
    pub city: String,
    pub country: Option<String>,
    pub description: Option<String>,
    pub icon: Option<String>,
    /// Degrees Celsius
    pub temperature: Option<f64>,
    /// Metres per second
    pub wind_speed: Option<f64>,
    /// Percent
    pub humidity: Option<f64>,
    /// Percent
    pub cloudiness: Option<f64>,
}

const MISSING: &str = "--";

fn number_or_missing(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_string(), |v| v.to_string())
}

impl WeatherReport {
    pub fn temperature_text(&self) -> String {
        format!("{} °C", number_or_missing(self.temperature))
    }

    pub fn wind_speed_text(&self) -> String {
        format!("{} m/s", number_or_missing(self.wind_speed))
    }

    pub fn humidity_text(&self) -> String {
        format!("{}%", number_or_missing(self.humidity))
    }

    pub fn cloudiness_text(&self) -> String {
        format!("{}%", number_or_missing(self.cloudiness))
    }

    pub fn description_text(&self) -> &str {
        self.description.as_deref().unwrap_or(MISSING)
    }

    /// "City, CC" caption shown next to the flag
    pub fn place_label(&self) -> String {
        match &self.country {
            Some(country) => format!("{}, {}", self.city, country.to_uppercase()),
            None => self.city.clone(),
        }
    }

    pub fn flag_url(&self) -> Option<String> {
        self.country
            .as_ref()
            .map(|country| format!("{}/{}.png", FLAG_CDN_URL, country.to_lowercase()))
    }

    pub fn icon_url(&self) -> Option<String> {
        self.icon
            .as_ref()
            .map(|icon| format!("{}/{}.png", ICON_URL, icon))
    }

    pub fn image_url(&self, kind: ImageKind) -> Option<String> {
        match kind {
            ImageKind::Flag => self.flag_url(),
            ImageKind::Icon => self.icon_url(),
        }
    }
}

/// Application state - everything the UI needs to render
#[derive(Clone, Debug, Default, tui_dispatch::DebugState, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AppState {
    #[debug(section = "View", label = "Tab", debug_fmt)]
    pub tab: Tab,

    #[debug(section = "View", label = "Panel", debug_fmt)]
    pub panel: Panel,

    /// Last successfully fetched report (cleared on error)
    #[debug(section = "Weather", label = "Report", debug_fmt)]
    pub report: Option<WeatherReport>,

    /// Waiting for the location provider to answer
    #[debug(section = "Location", label = "Locating")]
    pub locating: bool,

    /// Blocking message shown in a dialog until dismissed
    #[debug(section = "View", label = "Alert", debug_fmt)]
    pub alert: Option<String>,

    /// Text in the city search field
    #[debug(skip)]
    pub search_query: String,

    #[debug(skip)]
    pub flag: Option<Thumbnail>,

    #[debug(skip)]
    pub icon: Option<Thumbnail>,

    /// Spinner frame counter
    #[debug(skip)]
    pub tick_count: u32,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the city search form is on screen.
    ///
    /// The form stays above a search's loading and result panels, so it is
    /// visible for more than just `Panel::SearchEntry`.
    pub fn search_form_visible(&self) -> bool {
        match self.panel {
            Panel::SearchEntry => true,
            Panel::Loading | Panel::Results => self.tab == Tab::Search,
            Panel::AwaitingPermission | Panel::Error => false,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.panel == Panel::Loading
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.tick_count as usize % SPINNER_FRAMES.len()]
    }

    pub fn thumbnail(&self, kind: ImageKind) -> Option<&Thumbnail> {
        match kind {
            ImageKind::Flag => self.flag.as_ref(),
            ImageKind::Icon => self.icon.as_ref(),
        }
    }

    pub fn thumbnail_slot(&mut self, kind: ImageKind) -> &mut Option<Thumbnail> {
        match kind {
            ImageKind::Flag => &mut self.flag,
            ImageKind::Icon => &mut self.icon,
        }
    }
}
