// Facade wiring the external collaborators to the pipeline
//
// Upstream failures stop here: callers get empty results or placeholders
// and the failure is logged.
use crate::client::{FlightSearch, FuelPrice, FuelPriceSource, Geocoder, SearchRequest, SeatMapSource};
use crate::cost::{self, AircraftProfile, CostEstimate, EstimateError};
use crate::offer::OfferRecord;
use crate::report::{flight_option, DisplayOptions, FlightOption, SeatAvailability};
use crate::route_map::{route_endpoints, RouteMap};
use crate::seatmap::count_seats;
use chrono::NaiveDate;
use std::sync::Arc;

// Every collaborator is optional; a missing one disables its feature
#[derive(Default)]
pub struct AnalysisSession {
    search: Option<Arc<dyn FlightSearch>>,
    seat_maps: Option<Arc<dyn SeatMapSource>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    fuel_prices: Option<Arc<dyn FuelPriceSource>>,
    profile: AircraftProfile,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_flight_search(mut self, search: Arc<dyn FlightSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn with_seat_maps(mut self, seat_maps: Arc<dyn SeatMapSource>) -> Self {
        self.seat_maps = Some(seat_maps);
        self
    }

    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_fuel_prices(mut self, source: Arc<dyn FuelPriceSource>) -> Self {
        self.fuel_prices = Some(source);
        self
    }

    pub fn has_geocoder(&self) -> bool {
        self.geocoder.is_some()
    }

    /// Offers for the request; a failed search yields an empty list.
    pub async fn search_flights(&self, request: &SearchRequest) -> Vec<OfferRecord> {
        let Some(search) = self.search.as_deref() else {
            tracing::warn!("No flight search service configured");
            return Vec::new();
        };
        match search.search(request).await {
            Ok(offers) => offers,
            Err(err) => {
                tracing::warn!(
                    origin = %request.origin,
                    destination = %request.destination,
                    error = %err,
                    "Flight search failed"
                );
                Vec::new()
            }
        }
    }

    pub async fn seat_availability(&self, offer: &OfferRecord) -> SeatAvailability {
        let Some(seat_maps) = self.seat_maps.as_deref() else {
            return SeatAvailability::Unavailable;
        };
        match seat_maps.fetch_seat_map(offer).await {
            Ok(response) => count_seats(&response).into(),
            Err(err) => {
                tracing::warn!(offer_id = %offer.id, error = %err, "Seat map unavailable");
                SeatAvailability::Unavailable
            }
        }
    }

    /// Seat availability for every offer, in input order.
    pub async fn aggregate_seat_data(&self, offers: &[OfferRecord]) -> Vec<SeatAvailability> {
        let mut availability = Vec::with_capacity(offers.len());
        for offer in offers {
            availability.push(self.seat_availability(offer).await);
        }
        availability
    }

    /// Display records for the offers within `options.limit`.
    ///
    /// Seat maps are only requested when seat availability is shown.
    pub async fn flight_options(
        &self,
        offers: &[OfferRecord],
        options: &DisplayOptions,
    ) -> Vec<FlightOption> {
        let mut displayed = Vec::new();
        for (i, offer) in options.displayed(offers).iter().enumerate() {
            let seats = if options.show_seat_availability {
                Some(self.seat_availability(offer).await)
            } else {
                None
            };
            displayed.push(flight_option(i + 1, offer, options, seats));
        }
        displayed
    }

    pub async fn estimate_flight_cost(
        &self,
        passengers: u32,
        departure_airport: &str,
        arrival_airport: &str,
        fuel_price_per_litre: f64,
    ) -> Result<CostEstimate, EstimateError> {
        let geocoder = self
            .geocoder
            .as_deref()
            .ok_or(EstimateError::GeocoderUnavailable)?;
        cost::estimate_flight_cost(
            geocoder,
            &self.profile,
            passengers,
            departure_airport,
            arrival_airport,
            fuel_price_per_litre,
        )
        .await
    }

    /// Route map of the offer's first itinerary, or `None` when either
    /// endpoint cannot be located.
    pub async fn route_map(&self, offer: &OfferRecord) -> Option<RouteMap> {
        let Some(geocoder) = self.geocoder.as_deref() else {
            tracing::warn!("No geocoding service configured, cannot draw route");
            return None;
        };
        let Some((departure, arrival)) = route_endpoints(offer) else {
            tracing::warn!(offer_id = %offer.id, "Offer has no segments to draw");
            return None;
        };

        let mut coordinates = Vec::with_capacity(2);
        for airport in [departure, arrival] {
            match geocoder.coordinates(airport).await {
                Ok(Some(found)) => coordinates.push(found),
                Ok(None) => return None,
                Err(err) => {
                    tracing::warn!(airport, error = %err, "Airport lookup failed");
                    return None;
                }
            }
        }
        Some(RouteMap::new(departure, coordinates[0], arrival, coordinates[1]))
    }

    /// Weekly jet fuel prices, or `None` when the source is missing or fails.
    pub async fn fuel_prices(&self, start: NaiveDate, end: NaiveDate) -> Option<Vec<FuelPrice>> {
        let Some(source) = self.fuel_prices.as_deref() else {
            tracing::warn!("No fuel price service configured");
            return None;
        };
        match source.jet_fuel_prices(start, end).await {
            Ok(prices) => Some(prices),
            Err(err) => {
                tracing::warn!(error = %err, "Jet fuel prices unavailable");
                None
            }
        }
    }
}
