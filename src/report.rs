// Presentation layer: display records and text reports
use crate::airlines::airline_name;
use crate::analysis::{
    average_grand_total_by_airline, average_price_by_weekday, cheapest_cabin_per_offer,
    cheapest_offers, PriceStats, WeekdayAverage,
};
use crate::offer::OfferRecord;
use crate::seatmap::SeatCount;
use chrono::{NaiveDateTime, Weekday};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

const SEPARATOR: &str = "----------------------------------------";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayOptions {
    pub show_cabin_class: bool,
    pub show_seat_availability: bool,
    pub show_price: bool,
    pub show_airline: bool,
    // None shows every offer
    pub limit: Option<usize>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            show_cabin_class: true,
            show_seat_availability: true,
            show_price: true,
            show_airline: true,
            limit: None,
        }
    }
}

impl DisplayOptions {
    pub fn displayed<'a>(&self, offers: &'a [OfferRecord]) -> &'a [OfferRecord] {
        let shown = self.limit.map_or(offers.len(), |limit| limit.min(offers.len()));
        &offers[..shown]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeatAvailability {
    Known { available: usize, total: usize },
    Unavailable,
}

impl From<SeatCount> for SeatAvailability {
    fn from(count: SeatCount) -> Self {
        SeatAvailability::Known {
            available: count.available,
            total: count.total,
        }
    }
}

impl fmt::Display for SeatAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeatAvailability::Known { available, total } => {
                write!(f, "{available}/{total} seats available")
            }
            SeatAvailability::Unavailable => write!(f, "Seat map data not available"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentDetails {
    pub departure: String,
    pub arrival: String,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub operating_airline: String,
    pub aircraft: String,
    pub number_of_bookable_seats: u32,
    pub cabin_class: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FlightOption {
    // 1-based position in the displayed list
    pub index: usize,
    pub seat_info: Option<SeatAvailability>,
    pub airline: Option<String>,
    pub price: Option<String>,
    pub segments: Vec<SegmentDetails>,
}

/// Builds the display record for one offer.
///
/// `seats` is only consulted when seat availability is shown; a missing
/// lookup renders as the "not available" placeholder.
pub fn flight_option(
    index: usize,
    offer: &OfferRecord,
    options: &DisplayOptions,
    seats: Option<SeatAvailability>,
) -> FlightOption {
    let segments = offer
        .segments()
        .map(|segment| SegmentDetails {
            departure: segment.departure.iata_code.clone(),
            arrival: segment.arrival.iata_code.clone(),
            departure_time: segment.departure.at,
            arrival_time: segment.arrival.at,
            operating_airline: segment.carrier_code.clone(),
            aircraft: segment.aircraft.code.clone(),
            number_of_bookable_seats: offer.number_of_bookable_seats,
            cabin_class: options
                .show_cabin_class
                .then(|| offer.cabin_for_segment(&segment.id).to_string()),
        })
        .collect();

    FlightOption {
        index,
        seat_info: options
            .show_seat_availability
            .then(|| seats.unwrap_or(SeatAvailability::Unavailable)),
        airline: if options.show_airline {
            offer.validating_airline().map(str::to_string)
        } else {
            None
        },
        price: options
            .show_price
            .then(|| format!("{:.2} {}", offer.price.grand_total, offer.price.currency)),
        segments,
    }
}

fn format_time(at: &NaiveDateTime) -> String {
    at.format(TIME_FORMAT).to_string()
}

impl fmt::Display for FlightOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.seat_info {
            Some(seats) => writeln!(f, "Option {}: {}", self.index, seats)?,
            None => writeln!(f, "Option {}:", self.index)?,
        }
        if let Some(airline) = &self.airline {
            writeln!(f, "  Airline: {} ({})", airline, airline_name(airline))?;
        }
        if let Some(price) = &self.price {
            writeln!(f, "  Price: {}", price)?;
        }
        for segment in &self.segments {
            writeln!(
                f,
                "  Segment: {} ({}) -> {} ({})",
                segment.departure,
                format_time(&segment.departure_time),
                segment.arrival,
                format_time(&segment.arrival_time)
            )?;
            writeln!(
                f,
                "    Operating Airline: {} ({})",
                segment.operating_airline,
                airline_name(&segment.operating_airline)
            )?;
            writeln!(f, "    Aircraft: {}", segment.aircraft)?;
            writeln!(
                f,
                "    Number of Bookable Seats: {}",
                segment.number_of_bookable_seats
            )?;
            if let Some(cabin) = &segment.cabin_class {
                writeln!(f, "    Cabin Class: {}", cabin)?;
            }
        }
        writeln!(f, "{}", SEPARATOR)
    }
}

pub fn format_flight_options(options: &[FlightOption]) -> String {
    if options.is_empty() {
        return "No flight options found.\n".to_string();
    }
    options.iter().map(FlightOption::to_string).collect()
}

fn first_itinerary_lines(offer: &OfferRecord, with_cabin: bool) -> Vec<String> {
    let mut lines = Vec::new();
    let Some(itinerary) = offer.itineraries.first() else {
        return lines;
    };
    for segment in &itinerary.segments {
        lines.push(format!(
            "  Segment: {} ({}) -> {} ({})",
            segment.departure.iata_code,
            format_time(&segment.departure.at),
            segment.arrival.iata_code,
            format_time(&segment.arrival.at)
        ));
        if with_cabin {
            lines.push(format!(
                "    Cabin Class: {}",
                offer.cabin_for_segment(&segment.id)
            ));
        }
    }
    lines
}

fn airline_label(offer: &OfferRecord) -> &str {
    offer.validating_airline().unwrap_or("Unknown")
}

/// Airline and first-itinerary segments with their cabin, per offer.
pub fn format_cabin_classes(offers: &[OfferRecord]) -> String {
    if offers.is_empty() {
        return "No flight options found.\n".to_string();
    }
    let mut lines = Vec::new();
    for (i, offer) in offers.iter().enumerate() {
        lines.push(format!("Option {}:", i + 1));
        lines.push(format!("  Airline: {}", airline_label(offer)));
        lines.extend(first_itinerary_lines(offer, true));
        lines.push(SEPARATOR.to_string());
    }
    lines.join("\n") + "\n"
}

/// The `limit` cheapest offers by `price.total`.
pub fn format_cheapest(offers: &[OfferRecord], limit: usize) -> String {
    if offers.is_empty() {
        return "No flight options found.\n".to_string();
    }
    let mut lines = Vec::new();
    for (i, offer) in cheapest_offers(offers, limit).into_iter().enumerate() {
        lines.push(format!("Option {}:", i + 1));
        lines.push(format!("  Airline: {}", airline_label(offer)));
        lines.push(format!(
            "  Price: {:.2} {}",
            offer.price.total, offer.price.currency
        ));
        lines.extend(first_itinerary_lines(offer, false));
        lines.push(SEPARATOR.to_string());
    }
    lines.join("\n") + "\n"
}

pub fn format_price_statistics(statistics: &BTreeMap<String, PriceStats>, currency: &str) -> String {
    statistics
        .iter()
        .map(|(airline, stats)| {
            format!(
                "{} ({}): mean {:.2} {currency}, median {:.2} {currency}\n",
                airline,
                airline_name(airline),
                stats.mean,
                stats.median
            )
        })
        .collect()
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn format_weekday_averages(averages: &[WeekdayAverage], currency: &str) -> String {
    averages
        .iter()
        .map(|day| {
            format!(
                "{}: {:.2} {} on average\n",
                weekday_name(day.weekday),
                day.average,
                currency
            )
        })
        .collect()
}

pub fn format_airline_averages(averages: &BTreeMap<String, f64>, currency: &str) -> String {
    averages
        .iter()
        .map(|(airline, average)| format!("{}: {:.2} {} on average\n", airline, average, currency))
        .collect()
}

pub fn format_cabin_comparisons(comparisons: &[BTreeMap<String, f64>]) -> String {
    comparisons
        .iter()
        .enumerate()
        .map(|(i, cabins)| {
            let prices: Vec<String> = cabins
                .iter()
                .map(|(cabin, price)| format!("{cabin} {price:.2}"))
                .collect();
            format!("Option {}: {}\n", i + 1, prices.join(", "))
        })
        .collect()
}

/// Market averages come from every offer, cabin prices only from `filtered`.
pub fn format_market_analysis(
    offers: &[OfferRecord],
    filtered: &[OfferRecord],
    currency: &str,
) -> String {
    let mut out = String::from("\nAverage price by weekday:\n");
    out += &format_weekday_averages(&average_price_by_weekday(offers), currency);
    out += "\nAverage price by airline:\n";
    out += &format_airline_averages(&average_grand_total_by_airline(offers), currency);
    out += "\nCheapest price per cabin:\n";
    out += &format_cabin_comparisons(&cheapest_cabin_per_offer(filtered));
    out
}

pub fn format_seat_availability(availability: &[SeatAvailability]) -> String {
    availability
        .iter()
        .enumerate()
        .map(|(i, seats)| format!("Option {}: {}\n", i + 1, seats))
        .collect()
}

/// Every offer as pretty-printed JSON, upstream fields included.
pub fn format_full_data(offers: &[OfferRecord]) -> String {
    if offers.is_empty() {
        return "No flight options found.\n".to_string();
    }
    let mut lines = Vec::new();
    for (i, offer) in offers.iter().enumerate() {
        let json = match &offer.raw {
            Some(raw) => serde_json::to_string_pretty(raw),
            None => serde_json::to_string_pretty(offer),
        }
        .unwrap_or_else(|err| format!("<unprintable offer: {err}>"));
        lines.push(format!("Option {}:", i + 1));
        lines.push(format!("Full flight data: {json}"));
        lines.push("-".repeat(40));
    }
    lines.join("\n") + "\n"
}
