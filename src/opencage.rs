// OpenCage geocoding adapter
use crate::client::{check_status, ApiError, ClientError, Geocoder};
use crate::geo::Coordinates;
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

pub const OPENCAGE_URL: &str = "https://api.opencagedata.com";

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

pub struct OpenCageGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl OpenCageGeocoder {
    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        Self::with_base_url(OPENCAGE_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        let timeout_ms = 10_000;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout_ms,
        })
    }
}

#[async_trait]
impl Geocoder for OpenCageGeocoder {
    async fn coordinates(&self, iata_code: &str) -> Result<Option<Coordinates>, ApiError> {
        let url = format!("{}/geocode/v1/json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("q", iata_code),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_ms))?;

        let body: GeocodeResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))?;

        let coordinates = body
            .results
            .first()
            .map(|result| Coordinates::new(result.geometry.lat, result.geometry.lng));
        if coordinates.is_none() {
            tracing::warn!(iata_code, "No coordinates found for airport");
        }
        Ok(coordinates)
    }
}
