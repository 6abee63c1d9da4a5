use crate::analysis::FilterCriteria;
use crate::client::{ClientConfig, SearchRequest, AMADEUS_TEST_URL};
use crate::report::DisplayOptions;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "flight-scanner", version, about = "Flight offer search and price analysis")]
pub struct Cli {
    #[command(flatten)]
    pub credentials: Credentials,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Amadeus API key
    #[arg(long, env = "AMADEUS_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Amadeus API secret
    #[arg(long, env = "AMADEUS_API_SECRET", global = true, hide_env_values = true)]
    pub api_secret: Option<String>,

    /// Amadeus base URL
    #[arg(long, env = "AMADEUS_BASE_URL", global = true, default_value = AMADEUS_TEST_URL)]
    pub base_url: String,

    /// OpenCage key, enables airport geocoding
    #[arg(long, env = "OPENCAGE_API_KEY", global = true, hide_env_values = true)]
    pub opencage_key: Option<String>,

    /// EIA open-data key, enables jet fuel prices
    #[arg(long, env = "EIA_API_KEY", global = true, hide_env_values = true)]
    pub eia_key: Option<String>,

    /// Request timeout in milliseconds
    #[arg(long, global = true, default_value = "30000")]
    pub timeout_ms: u64,
}

impl Credentials {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone().unwrap_or_default(),
            api_secret: self.api_secret.clone().unwrap_or_default(),
            timeout_ms: self.timeout_ms,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Origin airport IATA code
    #[arg(long)]
    pub origin: String,

    /// Destination airport IATA code
    #[arg(long)]
    pub destination: String,

    /// Departure date (YYYY-MM-DD)
    #[arg(long)]
    pub date: NaiveDate,

    /// Return date (YYYY-MM-DD)
    #[arg(long)]
    pub return_date: Option<NaiveDate>,

    #[arg(long, default_value = "1")]
    pub adults: u32,

    /// Maximum number of offers requested
    #[arg(long)]
    pub max_results: Option<u32>,

    /// Currency of the quoted prices
    #[arg(long)]
    pub currency: Option<String>,
}

impl SearchArgs {
    pub fn request(&self) -> SearchRequest {
        SearchRequest {
            origin: self.origin.to_uppercase(),
            destination: self.destination.to_uppercase(),
            departure_date: self.date,
            return_date: self.return_date,
            adults: self.adults,
            max_results: self.max_results,
            currency_code: self.currency.clone(),
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct DisplayArgs {
    #[arg(long)]
    pub hide_cabin: bool,

    #[arg(long)]
    pub hide_seats: bool,

    #[arg(long)]
    pub hide_price: bool,

    #[arg(long)]
    pub hide_airline: bool,

    /// Show at most this many offers
    #[arg(long)]
    pub limit: Option<usize>,
}

impl DisplayArgs {
    pub fn options(&self) -> DisplayOptions {
        DisplayOptions {
            show_cabin_class: !self.hide_cabin,
            show_seat_availability: !self.hide_seats,
            show_price: !self.hide_price,
            show_airline: !self.hide_airline,
            limit: self.limit,
        }
    }
}

#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Maximum itinerary duration in minutes
    #[arg(long)]
    pub max_duration: Option<u32>,

    /// Maximum stops per segment
    #[arg(long)]
    pub max_stops: Option<u32>,

    /// Allowed validating airline, may be repeated
    #[arg(long = "airline")]
    pub airlines: Vec<String>,

    /// Required cabin class, e.g. ECONOMY
    #[arg(long)]
    pub cabin: Option<String>,
}

impl FilterArgs {
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            max_duration_minutes: self.max_duration,
            max_stops: self.max_stops,
            airlines: (!self.airlines.is_empty())
                .then(|| self.airlines.iter().map(|a| a.to_uppercase()).collect()),
            cabin_class: self.cabin.as_ref().map(|c| c.to_uppercase()),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Search and display flight options with airline price statistics
    Search {
        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        display: DisplayArgs,

        /// Also dump every offer as JSON
        #[arg(long)]
        raw: bool,
    },

    /// List the cheapest offers
    Cheapest {
        #[command(flatten)]
        search: SearchArgs,

        #[arg(short = 'n', long, default_value = "10")]
        top: usize,
    },

    /// List the cabin booked on each segment
    Cabins {
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Filter offers and report weekday, airline and cabin statistics
    Analyze {
        #[command(flatten)]
        search: SearchArgs,

        #[command(flatten)]
        filter: FilterArgs,
    },

    /// Seat availability for each offer
    Seats {
        #[command(flatten)]
        search: SearchArgs,
    },

    /// Write an HTML map of the first offer's route
    RouteMap {
        #[command(flatten)]
        search: SearchArgs,

        #[arg(short, long, default_value = crate::route_map::DEFAULT_MAP_FILE)]
        output: PathBuf,
    },

    /// Estimate the operating cost of a flight
    Estimate {
        #[arg(long, default_value = "150")]
        passengers: u32,

        /// Departure airport IATA code
        #[arg(long)]
        from: String,

        /// Arrival airport IATA code
        #[arg(long)]
        to: String,

        /// Jet fuel price per litre
        #[arg(long, default_value = "0.8")]
        fuel_price: f64,
    },

    /// Weekly jet fuel spot prices
    FuelPrices {
        #[arg(long, default_value = "2024-01-01")]
        start: NaiveDate,

        #[arg(long, default_value = "2024-08-16")]
        end: NaiveDate,
    },
}

impl Commands {
    pub fn search_args(&self) -> Option<&SearchArgs> {
        match self {
            Commands::Search { search, .. }
            | Commands::Cheapest { search, .. }
            | Commands::Cabins { search }
            | Commands::Analyze { search, .. }
            | Commands::Seats { search }
            | Commands::RouteMap { search, .. } => Some(search),
            Commands::Estimate { .. } | Commands::FuelPrices { .. } => None,
        }
    }
}
