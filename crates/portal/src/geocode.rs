use serde::Deserialize;
use shared_types::PortalSettings;

pub const NO_LOCATION_FOUND: &str = "No location found for that address.";
pub const NO_ADDRESS_FOUND: &str = "No address found for those coordinates.";

/// A resolved position with its formatted address.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeResult {
    pub latitude: f64,
    pub longitude: f64,
    pub address: String,
}

/// Address lookup in both directions. Errors are the message shown to the user.
#[allow(async_fn_in_trait)]
pub trait GeocodingProvider: Send + Sync {
    async fn forward_geocode(&self, address: &str) -> Result<GeocodeResult, String>;

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String, String>;
}

// ── Mapbox ──────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct FeatureCollection {
    #[serde(default)]
    features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
struct Feature {
    /// `[longitude, latitude]`
    center: [f64; 2],
    place_name: String,
}

/// First feature of a Mapbox places response as a [`GeocodeResult`].
fn parse_forward(body: &str) -> Option<GeocodeResult> {
    let collection: FeatureCollection = serde_json::from_str(body).ok()?;
    collection.features.into_iter().next().map(|f| GeocodeResult {
        latitude: f.center[1],
        longitude: f.center[0],
        address: f.place_name,
    })
}

fn parse_reverse(body: &str) -> Option<String> {
    let collection: FeatureCollection = serde_json::from_str(body).ok()?;
    collection.features.into_iter().next().map(|f| f.place_name)
}

/// Mapbox places API client (`limit=1`).
#[derive(Clone)]
pub struct MapboxGeocoder {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl MapboxGeocoder {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    /// Token from `MAPBOX_TOKEN`, or `None` when it is not set.
    pub fn from_env(base_url: impl Into<String>) -> Option<Self> {
        let token = std::env::var("MAPBOX_TOKEN").ok().filter(|t| !t.is_empty())?;
        Some(Self::new(base_url, token))
    }

    /// `MAPBOX_TOKEN` against the configured `mapbox_base_url`.
    pub fn from_settings(settings: &PortalSettings) -> Option<Self> {
        Self::from_env(settings.mapbox_base_url.as_str())
    }

    fn places_url(&self, query: &str) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{}.json",
            self.base_url,
            urlencoding::encode(query)
        )
    }

    fn reverse_url(&self, latitude: f64, longitude: f64) -> String {
        format!(
            "{}/geocoding/v5/mapbox.places/{longitude},{latitude}.json",
            self.base_url
        )
    }

    async fn fetch(&self, url: &str) -> Result<String, reqwest::Error> {
        self.http
            .get(url)
            .query(&[("access_token", self.token.as_str()), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

impl GeocodingProvider for MapboxGeocoder {
    async fn forward_geocode(&self, address: &str) -> Result<GeocodeResult, String> {
        let body = self.fetch(&self.places_url(address.trim())).await.map_err(|e| {
            tracing::warn!(error = %e, "Forward geocoding request failed");
            NO_LOCATION_FOUND.to_string()
        })?;
        parse_forward(&body).ok_or_else(|| {
            tracing::warn!(%address, "No geocoding match");
            NO_LOCATION_FOUND.to_string()
        })
    }

    async fn reverse_geocode(&self, latitude: f64, longitude: f64) -> Result<String, String> {
        let body = self.fetch(&self.reverse_url(latitude, longitude)).await.map_err(|e| {
            tracing::warn!(error = %e, "Reverse geocoding request failed");
            NO_ADDRESS_FOUND.to_string()
        })?;
        parse_reverse(&body).ok_or_else(|| {
            tracing::warn!(latitude, longitude, "No reverse geocoding match");
            NO_ADDRESS_FOUND.to_string()
        })
    }
}
