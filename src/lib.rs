// Flight offer search, price analysis and cost estimation

// Offer and seat map models
pub mod offer;
pub mod seatmap;

// Pure aggregation and estimation
pub mod analysis;
pub mod cost;
pub mod geo;

// External collaborators
pub mod amadeus;
pub mod client;
pub mod eia;
pub mod opencage;

// Presentation
pub mod airlines;
pub mod chart;
pub mod report;
pub mod route_map;

pub mod cli;
pub mod session;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

// Re-export key types for convenience
pub use amadeus::AmadeusClient;
pub use analysis::{FilterCriteria, PriceStats, WeekdayAverage};
pub use client::{
    ApiError, ClientConfig, ClientError, FlightSearch, FuelPrice, FuelPriceSource, Geocoder,
    SearchRequest, SeatMapSource,
};
pub use cost::{AircraftProfile, CostEstimate, EstimateError};
pub use offer::{OfferError, OfferRecord};
pub use report::{DisplayOptions, FlightOption, SeatAvailability};
pub use seatmap::{SeatCount, SeatMapResponse};
pub use session::AnalysisSession;

/// Logs go to stderr so report output on stdout stays clean.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("flight_scanner=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}
