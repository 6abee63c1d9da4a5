// Amadeus self-service adapter for flight offers and seat maps
use crate::client::{
    check_status, ApiError, ClientConfig, ClientError, FlightSearch, SearchRequest, SeatMapSource,
};
use crate::offer::OfferRecord;
use crate::seatmap::SeatMapResponse;
use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

const AMADEUS_JSON: &str = "application/vnd.amadeus+json";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct OffersEnvelope {
    #[serde(default)]
    data: Vec<Value>,
}

pub struct AmadeusClient {
    http: reqwest::Client,
    config: ClientConfig,
    access_token: Option<String>,
}

impl AmadeusClient {
    /// Builds the client and fetches a bearer token once.
    ///
    /// A failed token fetch is logged; the client is still returned and every
    /// later call reports `ApiError::Unauthenticated`.
    pub async fn connect(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::InitError(e.to_string()))?;

        let mut client = Self {
            http,
            config,
            access_token: None,
        };

        match client.fetch_access_token().await {
            Ok(token) => client.access_token = Some(token),
            Err(err) => tracing::error!(error = %err, "Failed to obtain access token"),
        }
        Ok(client)
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    async fn fetch_access_token(&self) -> Result<String, ApiError> {
        let url = format!("{}/v1/security/oauth2/token", self.config.base_url);
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.config.api_key.as_str()),
            ("client_secret", self.config.api_secret.as_str()),
        ];

        let response = self
            .http
            .post(&url)
            .form(&form)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.config.timeout_ms))?;
        let token: TokenResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))?;

        tracing::info!(expires_in = ?token.expires_in, "Obtained Amadeus access token");
        Ok(token.access_token)
    }

    fn bearer(&self) -> Result<String, ApiError> {
        self.access_token
            .as_ref()
            .map(|token| format!("Bearer {token}"))
            .ok_or(ApiError::Unauthenticated)
    }
}

fn search_query(request: &SearchRequest) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("originLocationCode", request.origin.clone()),
        ("destinationLocationCode", request.destination.clone()),
        ("departureDate", request.departure_date.format("%Y-%m-%d").to_string()),
        ("adults", request.adults.to_string()),
    ];
    if let Some(return_date) = request.return_date {
        query.push(("returnDate", return_date.format("%Y-%m-%d").to_string()));
    }
    if let Some(max) = request.max_results {
        query.push(("max", max.to_string()));
    }
    if let Some(currency) = &request.currency_code {
        query.push(("currencyCode", currency.clone()));
    }
    query
}

// Offers that do not fit the record model are dropped individually
fn decode_offers(envelope: OffersEnvelope) -> Vec<OfferRecord> {
    envelope
        .data
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<OfferRecord>(value.clone()) {
            Ok(mut offer) => {
                offer.raw = Some(value);
                Some(offer)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Skipping malformed flight offer");
                None
            }
        })
        .collect()
}

/// Request body for the seat-map endpoint, replaying the offer as received.
pub fn seat_map_body(offer: &OfferRecord) -> Result<Value, ApiError> {
    let offer_json = match &offer.raw {
        Some(raw) => raw.clone(),
        None => serde_json::to_value(offer).map_err(|e| ApiError::DecodeError(e.to_string()))?,
    };
    Ok(json!({ "data": [offer_json] }))
}

#[async_trait]
impl FlightSearch for AmadeusClient {
    async fn search(&self, request: &SearchRequest) -> Result<Vec<OfferRecord>, ApiError> {
        let url = format!("{}/v2/shopping/flight-offers", self.config.base_url);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.bearer()?)
            .query(&search_query(request))
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.config.timeout_ms))?;

        let envelope: OffersEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))?;

        let offers = decode_offers(envelope);
        tracing::info!(
            origin = %request.origin,
            destination = %request.destination,
            count = offers.len(),
            "Flight search completed"
        );
        Ok(offers)
    }
}

#[async_trait]
impl SeatMapSource for AmadeusClient {
    async fn fetch_seat_map(&self, offer: &OfferRecord) -> Result<SeatMapResponse, ApiError> {
        let url = format!("{}/v1/shopping/seatmaps", self.config.base_url);
        let body = serde_json::to_vec(&seat_map_body(offer)?)
            .map_err(|e| ApiError::DecodeError(e.to_string()))?;

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.bearer()?)
            .header(CONTENT_TYPE, AMADEUS_JSON)
            .body(body)
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.config.timeout_ms))?;

        check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))
    }
}
