pub mod alert_dialog;
pub mod city_header;
pub mod grant_access;
pub mod search_form;
pub mod tab_bar;
pub mod weather_card;
pub mod weather_display;

// Re-export core Component trait
pub use tui_dispatch::Component;

pub use alert_dialog::{AlertDialog, AlertDialogProps};
pub use city_header::{CityHeader, CityHeaderProps};
pub use grant_access::{GrantAccess, GrantAccessProps};
pub use search_form::{SearchForm, SearchFormProps};
pub use tab_bar::{TabBar, TabBarProps};
pub use weather_card::{WeatherCard, WeatherCardProps};
pub use weather_display::{
    DisplayLayout, ERROR_ICON, WeatherDisplay, WeatherDisplayProps, display_layout,
};
