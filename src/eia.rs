// EIA open-data adapter for weekly jet fuel spot prices
use crate::client::{check_status, ApiError, ClientError, FuelPrice, FuelPriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;
use std::time::Duration;

pub const EIA_URL: &str = "https://api.eia.gov";

// U.S. Gulf Coast kerosene-type jet fuel spot price FOB, dollars per gallon
pub const JET_FUEL_SERIES: &str = "EER_EPJK_PF4_RGC_DPG";

pub const LITRES_PER_GALLON: f64 = 3.785411784;

pub fn price_per_litre(price_per_gallon: f64) -> f64 {
    price_per_gallon / LITRES_PER_GALLON
}

#[derive(Debug, Deserialize)]
struct SeriesEnvelope {
    response: SeriesResponse,
}

#[derive(Debug, Deserialize)]
struct SeriesResponse {
    #[serde(default)]
    data: Vec<SeriesPoint>,
}

#[derive(Debug, Deserialize)]
struct SeriesPoint {
    period: NaiveDate,
    #[serde(with = "crate::offer::amount")]
    value: f64,
}

pub struct EiaClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl EiaClient {
    pub fn new(api_key: &str) -> Result<Self, ClientError> {
        Self::with_base_url(EIA_URL, api_key)
    }

    pub fn with_base_url(base_url: &str, api_key: &str) -> Result<Self, ClientError> {
        let timeout_ms = 30_000;
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
impl FuelPriceSource for EiaClient {
    async fn jet_fuel_prices(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<FuelPrice>, ApiError> {
        let url = format!("{}/v2/petroleum/pri/spt/data/", self.base_url);
        let start = start.format("%Y-%m-%d").to_string();
        let end = end.format("%Y-%m-%d").to_string();

        let response = self
            .http
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("frequency", "weekly"),
                ("data[0]", "value"),
                ("facets[series][]", JET_FUEL_SERIES),
                ("start", start.as_str()),
                ("end", end.as_str()),
                ("sort[0][column]", "period"),
                ("sort[0][direction]", "desc"),
                ("offset", "0"),
                ("length", "5000"),
            ])
            .send()
            .await
            .map_err(|e| ApiError::from_reqwest(e, self.timeout_ms))?;

        let envelope: SeriesEnvelope = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::DecodeError(e.to_string()))?;

        let prices: Vec<FuelPrice> = envelope
            .response
            .data
            .into_iter()
            .map(|point| FuelPrice {
                date: point.period,
                price_per_gallon: point.value,
            })
            .collect();
        tracing::debug!(count = prices.len(), "Fetched jet fuel prices");
        Ok(prices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_price_per_litre() {
        assert!((price_per_litre(LITRES_PER_GALLON) - 1.0).abs() < 1e-12);
        assert!((price_per_litre(2.5) - 0.660430).abs() < 1e-6);
    }

    #[test]
    fn test_constructor_returns_configured_client() {
        let client = EiaClient::with_base_url("http://localhost:8080/", "eia_key").unwrap();
        assert_eq!(client.base_url, "http://localhost:8080");
        assert_eq!(client.timeout_ms, 30_000);
        assert!(EiaClient::new("eia_key").is_ok());
    }

    #[tokio::test]
    async fn test_jet_fuel_prices() {
        let server = MockServer::start_async().await;
        let series = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/v2/petroleum/pri/spt/data/")
                    .query_param("api_key", "eia_key")
                    .query_param("frequency", "weekly")
                    .query_param("start", "2024-01-01")
                    .query_param("end", "2024-08-16");
                then.status(200).json_body(json!({
                    "response": {
                        "total": 2,
                        "data": [
                            {"period": "2024-08-16", "series": JET_FUEL_SERIES, "value": "2.213", "units": "$/GAL"},
                            {"period": "2024-08-09", "series": JET_FUEL_SERIES, "value": 2.301, "units": "$/GAL"}
                        ]
                    }
                }));
            })
            .await;

        let client = EiaClient::with_base_url(&server.base_url(), "eia_key").unwrap();
        let prices = client
            .jet_fuel_prices(date("2024-01-01"), date("2024-08-16"))
            .await
            .unwrap();
        series.assert_async().await;

        assert_eq!(
            prices,
            vec![
                FuelPrice {
                    date: date("2024-08-16"),
                    price_per_gallon: 2.213
                },
                FuelPrice {
                    date: date("2024-08-09"),
                    price_per_gallon: 2.301
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_unexpected_body_is_decode_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/v2/petroleum/pri/spt/data/");
                then.status(200).json_body(json!({"error": "invalid api_key"}));
            })
            .await;

        let client = EiaClient::with_base_url(&server.base_url(), "eia_key").unwrap();
        assert!(matches!(
            client
                .jet_fuel_prices(date("2024-01-01"), date("2024-08-16"))
                .await,
            Err(ApiError::DecodeError(_))
        ));
    }
}
