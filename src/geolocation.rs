//! Location providers
//!
//! A terminal has no device geolocation API, so the position comes from a
//! [`LocationProvider`]. The binary picks one from the command line; having
//! no provider at all is how "geolocation not supported" is expressed.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use crate::state::Coordinates;

pub const DEFAULT_GEO_URL: &str = "http://ip-api.com/json";

#[derive(thiserror::Error, Debug)]
pub enum GeolocationError {
    #[error("geolocation request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("geolocation lookup failed: {0}")]
    Lookup(String),
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Resolve the current position once.
    async fn current_position(&self) -> Result<Coordinates, GeolocationError>;
}

/// How the current position is obtained
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GeolocationMode {
    /// Approximate position from the public IP address
    #[default]
    Ip,
    /// No location capability
    Off,
}

/// Pick the provider for the given configuration.
///
/// Fixed coordinates win over the mode; `Off` without them yields `None`.
pub fn provider_for(
    mode: GeolocationMode,
    fixed: Option<Coordinates>,
    http: reqwest::Client,
    geo_url: &str,
) -> Option<Arc<dyn LocationProvider>> {
    if let Some(coordinates) = fixed {
        return Some(Arc::new(FixedLocation(coordinates)));
    }
    match mode {
        GeolocationMode::Ip => Some(Arc::new(IpLocator::new(http).with_url(geo_url))),
        GeolocationMode::Off => None,
    }
}

/// Always answers with the same coordinates
#[derive(Clone, Copy, Debug)]
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        Ok(self.0)
    }
}

/// ip-api.com style lookup: `{"status":"success","lat":..,"lon":..}`
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    message: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    city: Option<String>,
}

#[derive(Clone, Debug)]
pub struct IpLocator {
    http: reqwest::Client,
    url: String,
}

impl IpLocator {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            url: DEFAULT_GEO_URL.to_string(),
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait]
impl LocationProvider for IpLocator {
    async fn current_position(&self) -> Result<Coordinates, GeolocationError> {
        debug!(url = %self.url, "requesting ip geolocation");
        let data: IpLookupResponse = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if data.status != "success" {
            let reason = data.message.unwrap_or(data.status);
            return Err(GeolocationError::Lookup(reason));
        }
        match (data.lat, data.lon) {
            (Some(lat), Some(lon)) => {
                info!(lat, lon, city = ?data.city, "ip geolocation resolved");
                Ok(Coordinates::new(lat, lon))
            }
            _ => Err(GeolocationError::Lookup("response has no coordinates".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fixed_location() {
        let provider = FixedLocation(Coordinates::new(12.9, 77.6));
        let position = provider.current_position().await.unwrap();
        assert_eq!(position, Coordinates::new(12.9, 77.6));
    }

    #[test]
    fn test_provider_for_off_is_none() {
        let http = reqwest::Client::new();
        assert!(provider_for(GeolocationMode::Off, None, http.clone(), DEFAULT_GEO_URL).is_none());
        assert!(provider_for(
            GeolocationMode::Off,
            Some(Coordinates::new(1.0, 2.0)),
            http,
            DEFAULT_GEO_URL
        )
        .is_some());
    }

    #[tokio::test]
    async fn test_ip_locator_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "success",
                "city": "Bengaluru",
                "lat": 12.9,
                "lon": 77.6
            })))
            .mount(&server)
            .await;

        let locator =
            IpLocator::new(reqwest::Client::new()).with_url(format!("{}/json", server.uri()));
        let position = locator.current_position().await.unwrap();

        assert_eq!(position, Coordinates::new(12.9, 77.6));
    }

    #[tokio::test]
    async fn test_ip_locator_failed_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "status": "fail",
                "message": "private range"
            })))
            .mount(&server)
            .await;

        let locator =
            IpLocator::new(reqwest::Client::new()).with_url(format!("{}/json", server.uri()));
        let error = locator.current_position().await.unwrap_err();

        assert!(matches!(error, GeolocationError::Lookup(ref m) if m == "private range"));
    }
}
