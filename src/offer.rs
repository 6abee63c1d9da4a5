// Flight offer records as returned by the flight-search collaborator
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cabin reported for a segment that no traveler pricing references.
pub const UNKNOWN_CABIN: &str = "Unknown";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OfferError {
    #[error("Unsupported ISO-8601 duration: {0}")]
    UnsupportedDuration(String),
}

// Amounts arrive as numeric strings ("123.45"); some feeds send plain numbers
pub(crate) mod amount {
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawAmount {
        Text(String),
        Number(f64),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = match RawAmount::deserialize(deserializer)? {
            RawAmount::Number(value) => value,
            RawAmount::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|_| de::Error::custom(format!("invalid amount: {text}")))?,
        };
        // "NaN" and "inf" parse as f64 but are not prices
        if !value.is_finite() {
            return Err(de::Error::custom(format!("non-finite amount: {value}")));
        }
        Ok(value)
    }

    pub fn serialize<S>(value: &f64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{value:.2}"))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub validating_airline_codes: Vec<String>,
    pub price: OfferPrice,
    #[serde(default)]
    pub itineraries: Vec<Itinerary>,
    #[serde(default)]
    pub number_of_bookable_seats: u32,
    #[serde(default)]
    pub traveler_pricings: Vec<TravelerPricing>,
    /// Upstream JSON this record was decoded from. The seat-map endpoint
    /// expects the offer back exactly as it was priced.
    #[serde(skip)]
    pub raw: Option<serde_json::Value>,
}

// `total` excludes some fees that `grand_total` includes; the two are not interchangeable
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPrice {
    pub currency: String,
    #[serde(with = "amount")]
    pub total: f64,
    #[serde(with = "amount")]
    pub grand_total: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Itinerary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default)]
    pub segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: String,
    pub departure: Endpoint,
    pub arrival: Endpoint,
    pub carrier_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    pub aircraft: Aircraft,
    pub duration: String,
    #[serde(default)]
    pub number_of_stops: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub iata_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub terminal: Option<String>,
    // Local airport time, no offset
    pub at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Aircraft {
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TravelerPricing {
    #[serde(default)]
    pub traveler_id: String,
    pub price: TravelerPrice,
    #[serde(default)]
    pub fare_details_by_segment: Vec<FareDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TravelerPrice {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(with = "amount")]
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FareDetail {
    pub segment_id: String,
    pub cabin: String,
}

impl OfferRecord {
    /// First validating carrier, the airline an offer is grouped under.
    pub fn validating_airline(&self) -> Option<&str> {
        self.validating_airline_codes.first().map(String::as_str)
    }

    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.itineraries
            .iter()
            .flat_map(|itinerary| itinerary.segments.iter())
    }

    /// Cabin class booked on `segment_id`.
    ///
    /// When several travelers quote the same segment with different cabins,
    /// the traveler listed last in `traveler_pricings` decides.
    pub fn cabin_for_segment(&self, segment_id: &str) -> &str {
        self.traveler_pricings
            .iter()
            .rev()
            .flat_map(|traveler| traveler.fare_details_by_segment.iter().rev())
            .find(|detail| detail.segment_id == segment_id)
            .map(|detail| detail.cabin.as_str())
            .unwrap_or(UNKNOWN_CABIN)
    }

    /// True when any traveler books `cabin` on any segment.
    pub fn offers_cabin(&self, cabin: &str) -> bool {
        self.traveler_pricings.iter().any(|traveler| {
            traveler
                .fare_details_by_segment
                .iter()
                .any(|detail| detail.cabin == cabin)
        })
    }
}

impl Itinerary {
    // Falls back to the sum of segment durations when the itinerary omits its own
    pub fn duration_minutes(&self) -> Result<u32, OfferError> {
        match &self.duration {
            Some(duration) => duration_minutes(duration),
            None => self
                .segments
                .iter()
                .map(|segment| duration_minutes(&segment.duration))
                .sum(),
        }
    }
}

/// Parses durations of the form `PT[nH][nM]` into minutes.
///
/// Day, second and fractional components are rejected rather than dropped.
pub fn duration_minutes(iso: &str) -> Result<u32, OfferError> {
    let unsupported = || OfferError::UnsupportedDuration(iso.to_string());

    let mut rest = iso.strip_prefix("PT").ok_or_else(unsupported)?;
    if rest.is_empty() {
        return Err(unsupported());
    }

    let mut hours: Option<u32> = None;
    let mut minutes: Option<u32> = None;

    while !rest.is_empty() {
        let digits_end = rest
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(unsupported)?;
        if digits_end == 0 {
            return Err(unsupported());
        }
        let value: u32 = rest[..digits_end].parse().map_err(|_| unsupported())?;
        let unit = rest[digits_end..].chars().next().ok_or_else(unsupported)?;

        match unit {
            'H' if hours.is_none() && minutes.is_none() => hours = Some(value),
            'M' if minutes.is_none() => minutes = Some(value),
            _ => return Err(unsupported()),
        }
        rest = &rest[digits_end + unit.len_utf8()..];
    }

    hours
        .unwrap_or(0)
        .checked_mul(60)
        .and_then(|total| total.checked_add(minutes.unwrap_or(0)))
        .ok_or_else(unsupported)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;
    use test_case::test_case;

    #[test_case("PT2H30M", 150; "hours and minutes")]
    #[test_case("PT45M", 45; "minutes only")]
    #[test_case("PT3H", 180; "hours only")]
    #[test_case("PT0H5M", 5; "zero hours")]
    #[test_case("PT26H", 1560; "more than a day in hours")]
    fn test_duration_minutes(iso: &str, expected: u32) {
        assert_eq!(duration_minutes(iso), Ok(expected));
    }

    #[test_case("P1DT2H"; "days component")]
    #[test_case("PT2H30M15S"; "seconds component")]
    #[test_case("PT1.5H"; "fractional hours")]
    #[test_case("PT30M2H"; "minutes before hours")]
    #[test_case("PT"; "no components")]
    #[test_case("2H30M"; "missing prefix")]
    #[test_case("PTH"; "unit without value")]
    fn test_duration_minutes_rejects(iso: &str) {
        assert_eq!(
            duration_minutes(iso),
            Err(OfferError::UnsupportedDuration(iso.to_string()))
        );
    }

    #[test]
    fn test_decode_sample_offers() {
        let offers = sample_offers();
        assert_eq!(offers.len(), 4);

        let first = &offers[0];
        assert_eq!(first.validating_airline(), Some("AF"));
        assert_eq!(first.price.total, 155.40);
        assert_eq!(first.price.grand_total, 171.40);
        assert_eq!(first.price.currency, "EUR");
        assert_eq!(first.number_of_bookable_seats, 9);
        assert_eq!(first.itineraries[0].segments[0].departure.iata_code, "CDG");
        assert_eq!(first.itineraries[0].segments[0].aircraft.code, "320");
        assert_eq!(first.cabin_for_segment("1"), "ECONOMY");
    }

    #[test]
    fn test_amount_rejects_non_numeric_text() {
        let json = r#"{"currency": "EUR", "total": "abc", "grandTotal": "1.00"}"#;
        assert!(serde_json::from_str::<OfferPrice>(json).is_err());
    }

    #[test_case("NaN"; "not a number")]
    #[test_case("inf"; "infinity")]
    #[test_case("-infinity"; "negative infinity")]
    fn test_amount_rejects_non_finite_text(amount: &str) {
        let json = format!(r#"{{"currency": "EUR", "total": "{amount}", "grandTotal": "1.00"}}"#);
        let err = serde_json::from_str::<OfferPrice>(&json).unwrap_err();
        assert!(err.to_string().contains("non-finite amount"));
    }

    #[test]
    fn test_offer_with_non_finite_price_is_rejected() {
        let mut value = serde_json::to_value(offer("1", "AF", 100.0, 110.0)).unwrap();
        value["price"]["total"] = serde_json::json!("NaN");
        value["price"]["grandTotal"] = serde_json::json!("inf");
        assert!(serde_json::from_value::<OfferRecord>(value).is_err());
    }

    #[test]
    fn test_amount_accepts_numbers_and_serializes_as_text() {
        let json = r#"{"currency": "EUR", "total": 99.5, "grandTotal": "101.25"}"#;
        let price: OfferPrice = serde_json::from_str(json).unwrap();
        assert_eq!(price.total, 99.5);
        assert_eq!(price.grand_total, 101.25);

        let encoded = serde_json::to_value(&price).unwrap();
        assert_eq!(encoded["grandTotal"], "101.25");
    }

    #[test]
    fn test_cabin_for_unknown_segment() {
        let record = offer("1", "AF", 100.0, 110.0);
        assert_eq!(record.cabin_for_segment("42"), UNKNOWN_CABIN);
    }

    #[test]
    fn test_cabin_for_segment_last_traveler_wins() {
        let mut record = offer("1", "AF", 100.0, 110.0);
        record.traveler_pricings = vec![
            traveler(100.0, &[("1", "ECONOMY")]),
            traveler(300.0, &[("1", "BUSINESS")]),
        ];
        assert_eq!(record.cabin_for_segment("1"), "BUSINESS");
    }

    #[test]
    fn test_itinerary_duration_falls_back_to_segments() {
        let mut record = offer("1", "AF", 100.0, 110.0);
        let departs = at("2025-03-26", "18:00");
        record.itineraries[0].duration = None;
        record.itineraries[0]
            .segments
            .push(segment("2", "ALG", "ORN", departs, 0));
        assert_eq!(record.itineraries[0].duration_minutes(), Ok(300));
    }
}
