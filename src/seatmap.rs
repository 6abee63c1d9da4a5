// Seat map responses from the seat-map collaborator
use serde::{Deserialize, Serialize};
use std::fmt;

// Missing keys decode as empty collections so shape problems surface in `count_seats`
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SeatMapResponse {
    pub data: Vec<SeatMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SeatMap {
    pub flight_offer_id: Option<String>,
    pub segment_id: Option<String>,
    pub decks: Vec<Deck>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Deck {
    pub deck_type: Option<String>,
    pub seats: Vec<Seat>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Seat {
    pub number: Option<String>,
    pub traveler_pricing: Vec<SeatTravelerPricing>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatTravelerPricing {
    #[serde(default)]
    pub traveler_id: Option<String>,
    // Entries without a status never make the seat available
    #[serde(default)]
    pub seat_availability_status: SeatStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SeatStatus {
    Available,
    Blocked,
    Occupied,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeatCount {
    pub available: usize,
    pub total: usize,
}

impl fmt::Display for SeatCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} seats available", self.available, self.total)
    }
}

impl Seat {
    pub fn is_available(&self) -> bool {
        self.traveler_pricing
            .iter()
            .any(|pricing| pricing.seat_availability_status == SeatStatus::Available)
    }
}

/// Counts seats on the first seat map of the response.
///
/// A seat is available when at least one traveler pricing marks it so.
/// A response without any seat map yields `0/0` and a warning.
pub fn count_seats(response: &SeatMapResponse) -> SeatCount {
    let Some(seat_map) = response.data.first() else {
        tracing::warn!("Unexpected seat map data structure or empty data");
        return SeatCount::default();
    };

    seat_map
        .decks
        .iter()
        .flat_map(|deck| deck.seats.iter())
        .fold(SeatCount::default(), |mut count, seat| {
            count.total += 1;
            if seat.is_available() {
                count.available += 1;
            }
            count
        })
}
