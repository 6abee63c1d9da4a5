// Ports to the external collaborators: flight search, seat maps, geocoding, fuel prices
use crate::geo::Coordinates;
use crate::offer::OfferRecord;
use crate::seatmap::SeatMapResponse;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("API error: {status_code} - {message}")]
    ApiResponseError { status_code: u16, message: String },

    #[error("Could not decode response: {0}")]
    DecodeError(String),

    #[error("No access token, authentication failed earlier")]
    Unauthenticated,
}

impl ApiError {
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout_ms: u64) -> Self {
        if err.is_timeout() {
            ApiError::Timeout(timeout_ms)
        } else if err.is_decode() {
            ApiError::DecodeError(err.to_string())
        } else {
            ApiError::NetworkError(err.to_string())
        }
    }
}

// Turns non-success statuses into `ApiResponseError` carrying the body text
pub(crate) async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ApiError::ApiResponseError {
        status_code: status.as_u16(),
        message,
    })
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Initialization error: {0}")]
    InitError(String),
}

pub const AMADEUS_TEST_URL: &str = "https://test.api.amadeus.com";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub api_secret: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: AMADEUS_TEST_URL.to_string(),
            api_key: String::new(),
            api_secret: String::new(),
            timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.api_key.is_empty() || self.api_secret.is_empty() {
            return Err(ClientError::ConfigError(
                "Amadeus API key and secret are required".to_string(),
            ));
        }
        if !self.base_url.starts_with("http") {
            return Err(ClientError::ConfigError(format!(
                "Invalid base URL: {}",
                self.base_url
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub adults: u32,
    pub max_results: Option<u32>,
    pub currency_code: Option<String>,
}

impl SearchRequest {
    pub fn one_way(origin: &str, destination: &str, departure_date: NaiveDate) -> Self {
        Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            departure_date,
            return_date: None,
            adults: 1,
            max_results: None,
            currency_code: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FuelPrice {
    pub date: NaiveDate,
    pub price_per_gallon: f64,
}

#[async_trait]
pub trait FlightSearch: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<OfferRecord>, ApiError>;
}

#[async_trait]
pub trait SeatMapSource: Send + Sync {
    async fn fetch_seat_map(&self, offer: &OfferRecord) -> Result<SeatMapResponse, ApiError>;
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    // Ok(None) when the service answers but knows no such place
    async fn coordinates(&self, iata_code: &str) -> Result<Option<Coordinates>, ApiError>;
}

#[async_trait]
pub trait FuelPriceSource: Send + Sync {
    async fn jet_fuel_prices(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FuelPrice>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_credentials() {
        let config = ClientConfig::default();
        assert!(matches!(config.validate(), Err(ClientError::ConfigError(_))));

        let config = ClientConfig {
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_bad_url() {
        let config = ClientConfig {
            base_url: "test.api.amadeus.com".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_one_way_defaults() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 26).unwrap();
        let request = SearchRequest::one_way("CDG", "ALG", date);
        assert_eq!(request.adults, 1);
        assert!(request.return_date.is_none());
        assert!(request.max_results.is_none());
    }

    #[test]
    fn test_api_error_messages() {
        let err = ApiError::ApiResponseError {
            status_code: 401,
            message: "invalid_client".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 401 - invalid_client");
        assert_eq!(
            ApiError::Timeout(5000).to_string(),
            "Request timeout after 5000ms"
        );
    }
}
