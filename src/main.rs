use anyhow::{Context, Result};
use clap::Parser;
use flight_scanner::analysis::{filter_offers, price_statistics_by_airline};
use flight_scanner::chart::{airline_price_chart, itinerary_charts, ChartRenderer, TextChartRenderer};
use flight_scanner::cli::{Cli, Commands};
use flight_scanner::eia::{price_per_litre, EiaClient};
use flight_scanner::opencage::OpenCageGeocoder;
use flight_scanner::report::{
    format_cabin_classes, format_cheapest, format_flight_options, format_full_data,
    format_market_analysis, format_price_statistics, format_seat_availability,
};
use flight_scanner::{init_tracing, AmadeusClient, AnalysisSession, DisplayOptions, OfferRecord};
use std::sync::Arc;

const DEFAULT_CURRENCY: &str = "EUR";
const GEOCODER_HINT: &str = "Set OPENCAGE_API_KEY to enable airport geocoding.";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let session = build_session(&args).await;
    let offers = match args.command.search_args() {
        Some(search) => session.search_flights(&search.request()).await,
        None => Vec::new(),
    };
    let currency = offers
        .first()
        .map_or(DEFAULT_CURRENCY, |offer| offer.price.currency.as_str());
    let renderer = TextChartRenderer::default();

    match args.command {
        Commands::Search { display, raw, .. } => {
            let options = display.options();
            let shown = session.flight_options(&offers, &options).await;
            print!("{}", format_flight_options(&shown));
            if raw {
                print!("{}", format_full_data(options.displayed(&offers)));
            }

            let statistics = price_statistics_by_airline(&offers);
            println!("\nPrice statistics by airline:");
            print!("{}", format_price_statistics(&statistics, currency));
            print!("{}", renderer.render(&airline_price_chart(&statistics, currency)));
        }
        Commands::Cheapest { top, .. } => {
            print!("{}", format_cheapest(&offers, top));
        }
        Commands::Cabins { .. } => {
            print!("{}", format_cabin_classes(&offers));
        }
        Commands::Analyze { filter, .. } => {
            let criteria = filter.criteria();
            let filtered = filter_offers(&offers, &criteria);
            if !criteria.is_empty() {
                tracing::info!(kept = filtered.len(), total = offers.len(), "Applied filters");
            }
            print_analysis(&session, &offers, &filtered, currency, &renderer).await;
        }
        Commands::Seats { .. } => {
            let availability = session.aggregate_seat_data(&offers).await;
            if availability.is_empty() {
                println!("No flight options found.");
            }
            print!("{}", format_seat_availability(&availability));
        }
        Commands::RouteMap { .. } if !session.has_geocoder() => println!("{GEOCODER_HINT}"),
        Commands::RouteMap { output, .. } => match offers.first() {
            None => println!("No flight options found."),
            Some(offer) => match session.route_map(offer).await {
                Some(map) => {
                    map.save(&output)
                        .await
                        .with_context(|| format!("Cannot write {}", output.display()))?;
                    println!("Route map written to {}", output.display());
                }
                None => println!("Airport coordinates could not be found."),
            },
        },
        Commands::Estimate { .. } if !session.has_geocoder() => println!("{GEOCODER_HINT}"),
        Commands::Estimate {
            passengers,
            from,
            to,
            fuel_price,
        } => {
            let from = from.to_uppercase();
            let to = to.to_uppercase();
            match session
                .estimate_flight_cost(passengers, &from, &to, fuel_price)
                .await
            {
                Ok(estimate) => {
                    println!("Route: {from} -> {to}");
                    println!("Distance: {:.2} km", estimate.distance_km);
                    println!("Flight duration: {:.2} h", estimate.flight_duration_hours);
                    println!("Fuel needed: {:.2} L", estimate.fuel_needed_litres);
                    println!("Total cost: {:.2}", estimate.total_cost);
                    println!("Cost per passenger: {:.2}", estimate.cost_per_passenger);
                }
                Err(err) => println!("Cannot compute flight cost: {err}"),
            }
        }
        Commands::FuelPrices { start, end } => match session.fuel_prices(start, end).await {
            Some(prices) if prices.is_empty() => println!("No jet fuel prices for {start} to {end}."),
            Some(prices) => {
                for price in prices {
                    println!(
                        "{}: {:.3} $/gal ({:.3} $/L)",
                        price.date,
                        price.price_per_gallon,
                        price_per_litre(price.price_per_gallon)
                    );
                }
            }
            None => println!("Jet fuel prices unavailable."),
        },
    }

    Ok(())
}

// Missing or invalid credentials disable the matching feature instead of failing
async fn build_session(args: &Cli) -> AnalysisSession {
    let credentials = &args.credentials;
    let mut session = AnalysisSession::new();

    if args.command.search_args().is_some() {
        match AmadeusClient::connect(credentials.client_config()).await {
            Ok(amadeus) => {
                if !amadeus.is_authenticated() {
                    tracing::warn!("Continuing without access token, searches will return no offers");
                }
                let amadeus = Arc::new(amadeus);
                session = session
                    .with_flight_search(amadeus.clone())
                    .with_seat_maps(amadeus);
            }
            Err(err) => tracing::error!(error = %err, "Flight search disabled"),
        }
    }

    match credentials.opencage_key.as_deref().map(OpenCageGeocoder::new) {
        Some(Ok(geocoder)) => session = session.with_geocoder(Arc::new(geocoder)),
        Some(Err(err)) => tracing::error!(error = %err, "Geocoding disabled"),
        None => tracing::debug!("OPENCAGE_API_KEY not set, geocoding disabled"),
    }
    match credentials.eia_key.as_deref().map(EiaClient::new) {
        Some(Ok(client)) => session = session.with_fuel_prices(Arc::new(client)),
        Some(Err(err)) => tracing::error!(error = %err, "Fuel prices disabled"),
        None => tracing::debug!("EIA_API_KEY not set, fuel prices disabled"),
    }

    session
}

async fn print_analysis(
    session: &AnalysisSession,
    offers: &[OfferRecord],
    filtered: &[OfferRecord],
    currency: &str,
    renderer: &TextChartRenderer,
) {
    let shown = session
        .flight_options(filtered, &DisplayOptions::default())
        .await;
    print!("{}", format_flight_options(&shown));
    if offers.is_empty() {
        return;
    }

    print!("{}", format_market_analysis(offers, filtered, currency));

    println!();
    for chart in itinerary_charts(filtered) {
        print!("{}", renderer.render(&chart));
    }
}
