// Fixed-coefficient flight operating cost estimate
use crate::client::{ApiError, Geocoder};
use crate::geo::great_circle_km;
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error("Cannot compute distance, missing coordinates for {0}")]
    MissingRouteData(String),

    #[error("Cost per passenger is undefined for zero passengers")]
    NoPassengers,

    #[error("Geocoding failed: {0}")]
    Upstream(#[from] ApiError),

    #[error("No geocoding service configured")]
    GeocoderUnavailable,

    #[error("Invalid fuel price per litre: {0}")]
    InvalidFuelPrice(f64),
}

/// Constants for a narrow-body jet (Boeing 737-class brochure figures).
#[derive(Debug, Clone, PartialEq)]
pub struct AircraftProfile {
    pub base_fuel_litres_per_hour: f64,
    pub average_speed_kmh: f64,
    pub crew_cost_per_hour: f64,
    pub maintenance_cost_per_hour: f64,
    pub airport_fees: f64,
    pub empty_weight_kg: f64,
    pub max_takeoff_weight_kg: f64,
    // One passenger plus baggage
    pub weight_per_passenger_kg: f64,
    // Fuel burn grows 0.5% per 1% of extra weight
    pub fuel_weight_sensitivity: f64,
}

impl Default for AircraftProfile {
    fn default() -> Self {
        Self {
            base_fuel_litres_per_hour: 2500.0,
            average_speed_kmh: 850.0,
            crew_cost_per_hour: 500.0,
            maintenance_cost_per_hour: 800.0,
            airport_fees: 2000.0,
            empty_weight_kg: 41413.0,
            max_takeoff_weight_kg: 70534.0,
            weight_per_passenger_kg: 100.0,
            fuel_weight_sensitivity: 0.005,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CostEstimate {
    pub distance_km: f64,
    pub total_cost: f64,
    pub cost_per_passenger: f64,
    pub flight_duration_hours: f64,
    pub fuel_needed_litres: f64,
}

impl AircraftProfile {
    /// Operating cost of flying `passengers` over `distance_km`.
    pub fn estimate(
        &self,
        passengers: u32,
        distance_km: f64,
        fuel_price_per_litre: f64,
    ) -> Result<CostEstimate, EstimateError> {
        if passengers == 0 {
            return Err(EstimateError::NoPassengers);
        }
        if !fuel_price_per_litre.is_finite() {
            return Err(EstimateError::InvalidFuelPrice(fuel_price_per_litre));
        }

        let flight_duration_hours = distance_km / self.average_speed_kmh;

        let loaded_weight =
            self.empty_weight_kg + f64::from(passengers) * self.weight_per_passenger_kg;
        if loaded_weight > self.max_takeoff_weight_kg {
            tracing::warn!(
                passengers,
                loaded_weight,
                max = self.max_takeoff_weight_kg,
                "Load exceeds maximum takeoff weight"
            );
        }
        let weight_factor = loaded_weight / self.empty_weight_kg;
        let fuel_litres_per_hour = self.base_fuel_litres_per_hour
            * (1.0 + self.fuel_weight_sensitivity * (weight_factor - 1.0));

        let fuel_needed_litres = fuel_litres_per_hour * flight_duration_hours;
        let fuel_cost = fuel_needed_litres * fuel_price_per_litre;
        let crew_cost = self.crew_cost_per_hour * flight_duration_hours;
        let maintenance_cost = self.maintenance_cost_per_hour * flight_duration_hours;

        let total_cost = fuel_cost + crew_cost + self.airport_fees + maintenance_cost;

        Ok(CostEstimate {
            distance_km,
            total_cost,
            cost_per_passenger: total_cost / f64::from(passengers),
            flight_duration_hours,
            fuel_needed_litres,
        })
    }
}

/// Estimates the cost of flying between two airports resolved by `geocoder`.
pub async fn estimate_flight_cost(
    geocoder: &dyn Geocoder,
    profile: &AircraftProfile,
    passengers: u32,
    departure_airport: &str,
    arrival_airport: &str,
    fuel_price_per_litre: f64,
) -> Result<CostEstimate, EstimateError> {
    if passengers == 0 {
        return Err(EstimateError::NoPassengers);
    }
    if !fuel_price_per_litre.is_finite() {
        return Err(EstimateError::InvalidFuelPrice(fuel_price_per_litre));
    }

    let from = geocoder
        .coordinates(departure_airport)
        .await?
        .ok_or_else(|| EstimateError::MissingRouteData(departure_airport.to_string()))?;
    let to = geocoder
        .coordinates(arrival_airport)
        .await?
        .ok_or_else(|| EstimateError::MissingRouteData(arrival_airport.to_string()))?;

    let distance_km = great_circle_km(&from, &to);
    tracing::debug!(departure_airport, arrival_airport, distance_km, "Resolved route distance");

    profile.estimate(passengers, distance_km, fuel_price_per_litre)
}
