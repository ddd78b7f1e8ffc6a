//! OpenWeatherMap client

use serde::Deserialize;
use tracing::debug;

use crate::state::{Coordinates, WeatherReport};

pub const DEFAULT_API_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Every way a weather lookup can fail. The UI shows them all as one error.
#[derive(thiserror::Error, Debug)]
pub enum WeatherError {
    #[error("weather request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("weather response is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("weather response has no city name")]
    NoData,
}

// ============================================================================
// Wire format
// ============================================================================

/// Current weather response. Everything is optional on the wire.
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    name: Option<String>,
    sys: Option<Sys>,
    #[serde(default)]
    weather: Vec<Condition>,
    main: Option<Main>,
    wind: Option<Wind>,
    clouds: Option<Clouds>,
}

#[derive(Debug, Deserialize)]
struct Sys {
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: Option<String>,
    icon: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Main {
    temp: Option<f64>,
    humidity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Clouds {
    all: Option<f64>,
}

/// Parse a current-weather body into a report.
///
/// A body without `name` (including the API's own error bodies) is
/// [`WeatherError::NoData`].
pub fn parse_report(body: &str) -> Result<WeatherReport, WeatherError> {
    let data: WeatherResponse = serde_json::from_str(body)?;
    let city = data.name.ok_or(WeatherError::NoData)?;
    let condition = data.weather.into_iter().next();
    let (description, icon) = match condition {
        Some(c) => (c.description, c.icon),
        None => (None, None),
    };

    Ok(WeatherReport {
        city,
        country: data.sys.and_then(|s| s.country),
        description,
        icon,
        temperature: data.main.as_ref().and_then(|m| m.temp),
        humidity: data.main.as_ref().and_then(|m| m.humidity),
        wind_speed: data.wind.and_then(|w| w.speed),
        cloudiness: data.clouds.and_then(|c| c.all),
    })
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct WeatherClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    pub fn new(http: reqwest::Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            base_url: DEFAULT_API_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn coordinates_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/weather?lat={}&lon={}&appid={}&units=metric",
            self.base_url,
            coordinates.lat,
            coordinates.lon,
            urlencoding::encode(&self.api_key)
        )
    }

    pub fn city_url(&self, city: &str) -> String {
        format!(
            "{}/weather?q={}&appid={}&units=metric",
            self.base_url,
            urlencoding::encode(city),
            urlencoding::encode(&self.api_key)
        )
    }

    pub async fn fetch_by_coordinates(
        &self,
        coordinates: Coordinates,
    ) -> Result<WeatherReport, WeatherError> {
        debug!(lat = coordinates.lat, lon = coordinates.lon, "fetching weather by coordinates");
        self.fetch(&self.coordinates_url(coordinates)).await
    }

    pub async fn fetch_by_city(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        debug!(%city, "fetching weather by city");
        self.fetch(&self.city_url(city)).await
    }

    async fn fetch(&self, url: &str) -> Result<WeatherReport, WeatherError> {
        let body = self.http.get(url).send().await?.text().await?;
        parse_report(&body)
    }

    /// Raw bytes of an image (flag or icon); non-2xx is an error.
    pub async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, reqwest::Error> {
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BENGALURU: &str = r#"{
        "name": "Bengaluru",
        "sys": {"country": "in"},
        "weather": [{"description": "clear sky", "icon": "01d"}],
        "main": {"temp": 25, "humidity": 60},
        "wind": {"speed": 3},
        "clouds": {"all": 10}
    }"#;

    #[test]
    fn test_parse_full_report() {
        let report = parse_report(BENGALURU).unwrap();

        assert_eq!(report.city, "Bengaluru");
        assert_eq!(report.country.as_deref(), Some("in"));
        assert_eq!(report.description.as_deref(), Some("clear sky"));
        assert_eq!(report.icon.as_deref(), Some("01d"));
        assert_eq!(report.temperature_text(), "25 °C");
        assert_eq!(report.wind_speed_text(), "3 m/s");
        assert_eq!(report.humidity_text(), "60%");
        assert_eq!(report.cloudiness_text(), "10%");
        assert!(report.flag_url().unwrap().ends_with("/in.png"));
    }

    #[test]
    fn test_parse_missing_name_is_no_data() {
        let result = parse_report(r#"{"cod":"404","message":"city not found"}"#);
        assert!(matches!(result, Err(WeatherError::NoData)));
    }

    #[test]
    fn test_parse_invalid_json() {
        let result = parse_report("<html>502 Bad Gateway</html>");
        assert!(matches!(result, Err(WeatherError::Parse(_))));
    }

    #[test]
    fn test_parse_name_only() {
        let report = parse_report(r#"{"name":"Atlantis","weather":[]}"#).unwrap();
        assert_eq!(report.city, "Atlantis");
        assert_eq!(report.description, None);
        assert_eq!(report.temperature, None);
    }

    #[test]
    fn test_urls() {
        let client = WeatherClient::new(reqwest::Client::new(), "k3y")
            .with_base_url("http://localhost:9000/");

        assert_eq!(
            client.coordinates_url(Coordinates::new(12.9, 77.6)),
            "http://localhost:9000/weather?lat=12.9&lon=77.6&appid=k3y&units=metric"
        );
        assert_eq!(
            client.city_url("São Paulo"),
            "http://localhost:9000/weather?q=S%C3%A3o%20Paulo&appid=k3y&units=metric"
        );
    }
}
