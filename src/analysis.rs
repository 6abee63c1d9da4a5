// Aggregation pipeline over flight offers
//
// Every function here is pure: it borrows the offers, never mutates them,
// and returns an empty result for an empty input.
use crate::offer::{duration_minutes, OfferRecord};
use chrono::{Datelike, Weekday};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceStats {
    pub mean: f64,
    pub median: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeekdayAverage {
    pub weekday: Weekday,
    pub average: f64,
    pub samples: usize,
}

// Every active criterion must hold for the offer to be kept
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub max_duration_minutes: Option<u32>,
    pub max_stops: Option<u32>,
    pub airlines: Option<Vec<String>>,
    pub cabin_class: Option<String>,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self == &FilterCriteria::default()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

fn group_by_airline(
    offers: &[OfferRecord],
    price: impl Fn(&OfferRecord) -> f64,
) -> BTreeMap<String, Vec<f64>> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for offer in offers {
        match offer.validating_airline() {
            Some(airline) => groups
                .entry(airline.to_string())
                .or_default()
                .push(price(offer)),
            None => tracing::debug!(offer_id = %offer.id, "Skipping offer without validating airline"),
        }
    }
    groups
}

/// Mean and median of `price.total` per validating airline.
pub fn price_statistics_by_airline(offers: &[OfferRecord]) -> BTreeMap<String, PriceStats> {
    group_by_airline(offers, |offer| offer.price.total)
        .into_iter()
        .map(|(airline, prices)| {
            let stats = PriceStats {
                mean: mean(&prices),
                median: median(&prices),
            };
            (airline, stats)
        })
        .collect()
}

/// Mean of `price.grand_total` per validating airline.
pub fn average_grand_total_by_airline(offers: &[OfferRecord]) -> BTreeMap<String, f64> {
    group_by_airline(offers, |offer| offer.price.grand_total)
        .into_iter()
        .map(|(airline, prices)| (airline, mean(&prices)))
        .collect()
}

/// Weekday samples an offer contributes to [`average_price_by_weekday`].
///
/// The offer's whole `grand_total` is counted once per segment, on the
/// segment's departure weekday, so multi-segment offers weigh more.
pub fn weekday_price_samples(offer: &OfferRecord) -> impl Iterator<Item = (Weekday, f64)> + '_ {
    offer
        .segments()
        .map(move |segment| (segment.departure.at.weekday(), offer.price.grand_total))
}

/// Mean offer `grand_total` per departure weekday, Monday first.
pub fn average_price_by_weekday(offers: &[OfferRecord]) -> Vec<WeekdayAverage> {
    // (sum, count) indexed by days from Monday
    let mut buckets = [(0.0_f64, 0_usize); 7];
    for (weekday, price) in offers.iter().flat_map(|offer| weekday_price_samples(offer)) {
        let bucket = &mut buckets[weekday.num_days_from_monday() as usize];
        bucket.0 += price;
        bucket.1 += 1;
    }

    let mut weekday = Weekday::Mon;
    let mut averages = Vec::new();
    for (sum, count) in buckets {
        if count > 0 {
            averages.push(WeekdayAverage {
                weekday,
                average: sum / count as f64,
                samples: count,
            });
        }
        weekday = weekday.succ();
    }
    averages
}

/// Lowest traveler price quoted per cabin, one map per offer in input order.
pub fn cheapest_cabin_per_offer(offers: &[OfferRecord]) -> Vec<BTreeMap<String, f64>> {
    offers
        .iter()
        .map(|offer| {
            let mut cheapest: BTreeMap<String, f64> = BTreeMap::new();
            for traveler in &offer.traveler_pricings {
                let price = traveler.price.total;
                for detail in &traveler.fare_details_by_segment {
                    cheapest
                        .entry(detail.cabin.clone())
                        .and_modify(|current| *current = current.min(price))
                        .or_insert(price);
                }
            }
            cheapest
        })
        .collect()
}

fn itineraries_within(offer: &OfferRecord, criteria: &FilterCriteria) -> bool {
    offer.itineraries.iter().all(|itinerary| {
        let duration_ok = criteria.max_duration_minutes.map_or(true, |max| {
            match itinerary.duration_minutes() {
                Ok(minutes) => minutes <= max,
                Err(err) => {
                    tracing::warn!(offer_id = %offer.id, error = %err, "Cannot check itinerary duration");
                    false
                }
            }
        });

        let stops_ok = criteria.max_stops.map_or(true, |max| {
            itinerary
                .segments
                .iter()
                .all(|segment| segment.number_of_stops <= max)
        });

        duration_ok && stops_ok
    })
}

/// Keeps offers whose every itinerary satisfies the duration and stop limits,
/// whose validating airline is allowed, and where at least one traveler books
/// the requested cabin on some segment. Input order is preserved.
pub fn filter_offers(offers: &[OfferRecord], criteria: &FilterCriteria) -> Vec<OfferRecord> {
    let mut filtered = Vec::new();

    for offer in offers {
        if !itineraries_within(offer, criteria) {
            continue;
        }

        if !criteria.airlines.as_ref().map_or(true, |airlines| {
            offer
                .validating_airline()
                .map_or(false, |airline| airlines.iter().any(|a| a == airline))
        }) {
            continue;
        }

        if !criteria
            .cabin_class
            .as_ref()
            .map_or(true, |cabin| offer.offers_cabin(cabin))
        {
            continue;
        }

        filtered.push(offer.clone());
    }

    tracing::debug!(kept = filtered.len(), total = offers.len(), "Filtered offers");
    filtered
}

/// The `limit` offers with the lowest `price.total`, cheapest first.
pub fn cheapest_offers(offers: &[OfferRecord], limit: usize) -> Vec<&OfferRecord> {
    let mut sorted: Vec<&OfferRecord> = offers.iter().collect();
    // Stable sort keeps search order between equal prices
    sorted.sort_by(|a, b| a.price.total.total_cmp(&b.price.total));
    sorted.truncate(limit);
    sorted
}

/// `("DEP -> ARR", minutes)` for every segment of the offer.
///
/// Segments with an unsupported duration are reported as zero minutes.
pub fn segment_durations(offer: &OfferRecord) -> Vec<(String, u32)> {
    offer
        .segments()
        .map(|segment| {
            let label = format!(
                "{} -> {}",
                segment.departure.iata_code, segment.arrival.iata_code
            );
            let minutes = duration_minutes(&segment.duration).unwrap_or_else(|err| {
                tracing::warn!(segment_id = %segment.id, error = %err, "Segment duration ignored");
                0
            });
            (label, minutes)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::fixtures::*;
    use crate::offer::Itinerary;
    use test_case::test_case;

    fn ids(offers: &[OfferRecord]) -> Vec<&str> {
        offers.iter().map(|offer| offer.id.as_str()).collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_empty_inputs() {
        assert!(price_statistics_by_airline(&[]).is_empty());
        assert!(average_grand_total_by_airline(&[]).is_empty());
        assert!(average_price_by_weekday(&[]).is_empty());
        assert!(cheapest_cabin_per_offer(&[]).is_empty());
        assert!(filter_offers(&[], &FilterCriteria::default()).is_empty());
        assert!(cheapest_offers(&[], 10).is_empty());
    }

    #[test]
    fn test_price_statistics_even_group() {
        let offers = vec![
            offer("1", "AF", 100.0, 0.0),
            offer("2", "AF", 400.0, 0.0),
            offer("3", "AF", 200.0, 0.0),
            offer("4", "AF", 300.0, 0.0),
            offer("5", "AH", 50.0, 0.0),
        ];
        let stats = price_statistics_by_airline(&offers);

        assert_eq!(stats.len(), 2);
        assert_close(stats["AF"].mean, 250.0);
        assert_close(stats["AF"].median, 250.0);
        assert_close(stats["AH"].mean, 50.0);
        assert_close(stats["AH"].median, 50.0);
    }

    #[test]
    fn test_price_statistics_odd_group_uses_middle_value() {
        let offers = vec![
            offer("1", "AF", 90.0, 0.0),
            offer("2", "AF", 10.0, 0.0),
            offer("3", "AF", 20.0, 0.0),
        ];
        let stats = price_statistics_by_airline(&offers);
        assert_close(stats["AF"].mean, 40.0);
        assert_close(stats["AF"].median, 20.0);
    }

    #[test]
    fn test_statistics_skip_offers_without_airline() {
        let mut orphan = offer("1", "AF", 100.0, 110.0);
        orphan.validating_airline_codes.clear();
        let offers = vec![orphan, offer("2", "AF", 300.0, 330.0)];

        let stats = price_statistics_by_airline(&offers);
        assert_close(stats["AF"].mean, 300.0);
        assert_eq!(average_grand_total_by_airline(&offers)["AF"], 330.0);
    }

    #[test]
    fn test_total_and_grand_total_are_separate_statistics() {
        let offers = sample_offers();
        let stats = price_statistics_by_airline(&offers);
        let averages = average_grand_total_by_airline(&offers);

        assert_close(stats["AF"].mean, (155.40 + 210.00) / 2.0);
        assert_close(averages["AF"], (171.40 + 226.00) / 2.0);
        assert_close(averages["AH"], 135.50);
        assert_close(averages["5O"], 112.99);
    }

    #[test]
    fn test_weekday_counts_offer_once_per_segment() {
        let averages = average_price_by_weekday(&sample_offers());
        let weekdays: Vec<Weekday> = averages.iter().map(|a| a.weekday).collect();
        assert_eq!(weekdays, vec![Weekday::Wed, Weekday::Thu, Weekday::Fri]);

        // Offer 2 has two Wednesday segments and is counted twice
        assert_eq!(averages[0].samples, 3);
        assert_close(averages[0].average, (171.40 + 226.00 + 226.00) / 3.0);
        assert_close(averages[1].average, 135.50);
        assert_close(averages[2].average, 112.99);
    }

    #[test]
    fn test_cheapest_cabin_takes_minimum_across_travelers() {
        let mut record = offer("1", "AF", 480.0, 480.0);
        record.traveler_pricings = vec![
            traveler(100.0, &[("1", "ECONOMY")]),
            traveler(80.0, &[("1", "ECONOMY")]),
            traveler(300.0, &[("1", "BUSINESS")]),
        ];

        let comparison = cheapest_cabin_per_offer(&[record]);
        assert_eq!(comparison.len(), 1);
        assert_eq!(comparison[0].len(), 2);
        assert_eq!(comparison[0]["ECONOMY"], 80.0);
        assert_eq!(comparison[0]["BUSINESS"], 300.0);
    }

    #[test]
    fn test_cheapest_cabin_preserves_order() {
        let comparison = cheapest_cabin_per_offer(&sample_offers());
        assert_eq!(comparison.len(), 4);
        assert_eq!(comparison[0]["ECONOMY"], 171.40);
        assert_eq!(comparison[3]["PREMIUM_ECONOMY"], 112.99);
    }

    #[test]
    fn test_filter_without_criteria_is_identity() {
        let offers = sample_offers();
        let criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        assert_eq!(filter_offers(&offers, &criteria), offers);
    }

    #[test_case(FilterCriteria { max_stops: Some(0), ..Default::default() },
        vec!["1", "2", "3"]; "#1 direct only")]
    #[test_case(FilterCriteria { max_stops: Some(1), ..Default::default() },
        vec!["1", "2", "3", "4"]; "#2 at most one stop")]
    #[test_case(FilterCriteria { max_duration_minutes: Some(150), ..Default::default() },
        vec!["1", "3"]; "#3 max duration")]
    #[test_case(FilterCriteria { airlines: Some(vec!["AF".to_string(), "5O".to_string()]), ..Default::default() },
        vec!["1", "2", "4"]; "#4 allowed airlines")]
    #[test_case(FilterCriteria { cabin_class: Some("PREMIUM_ECONOMY".to_string()), ..Default::default() },
        vec!["4"]; "#5 cabin class")]
    #[test_case(FilterCriteria { max_stops: Some(1), airlines: Some(vec!["AF".to_string(), "5O".to_string()]), max_duration_minutes: Some(200), ..Default::default() },
        vec!["1", "4"]; "#6 combined")]
    #[test_case(FilterCriteria { cabin_class: Some("FIRST".to_string()), ..Default::default() },
        vec![]; "#7 cabin nobody books")]
    fn test_criteria_filter_offers(criteria: FilterCriteria, expected_ids: Vec<&str>) {
        let offers = sample_offers();
        let filtered = filter_offers(&offers, &criteria);
        assert_eq!(ids(&filtered), expected_ids);
    }

    #[test]
    fn test_max_stops_excludes_offer_with_any_violating_itinerary() {
        let mut round_trip = offer("1", "AF", 300.0, 320.0);
        let back = at("2025-04-02", "09:00");
        round_trip.itineraries.push(Itinerary {
            duration: Some("PT6H".to_string()),
            segments: vec![segment("9", "ALG", "CDG", back, 2)],
        });
        let offers = vec![round_trip, offer("2", "AF", 150.0, 160.0)];

        let criteria = FilterCriteria {
            max_stops: Some(1),
            ..Default::default()
        };
        assert_eq!(ids(&filter_offers(&offers, &criteria)), vec!["2"]);
    }

    #[test]
    fn test_cabin_filter_is_existential() {
        let mut mixed = offer("1", "AF", 400.0, 420.0);
        mixed.traveler_pricings = vec![
            traveler(100.0, &[("1", "ECONOMY")]),
            traveler(300.0, &[("1", "BUSINESS")]),
        ];
        let criteria = FilterCriteria {
            cabin_class: Some("BUSINESS".to_string()),
            ..Default::default()
        };
        assert_eq!(filter_offers(&[mixed], &criteria).len(), 1);
    }

    #[test]
    fn test_unparseable_duration_fails_duration_filter_only() {
        let mut record = offer("1", "AF", 100.0, 110.0);
        record.itineraries[0].duration = Some("P1DT2H".to_string());
        let offers = vec![record];

        let by_duration = FilterCriteria {
            max_duration_minutes: Some(10_000),
            ..Default::default()
        };
        assert!(filter_offers(&offers, &by_duration).is_empty());

        let by_stops = FilterCriteria {
            max_stops: Some(0),
            ..Default::default()
        };
        assert_eq!(filter_offers(&offers, &by_stops).len(), 1);
    }

    #[test]
    fn test_cheapest_offers_sorted_and_limited() {
        let offers = sample_offers();
        let cheapest = cheapest_offers(&offers, 2);
        let cheapest_ids: Vec<&str> = cheapest.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(cheapest_ids, vec!["4", "3"]);
        assert_eq!(cheapest_offers(&offers, 10).len(), 4);
    }

    #[test]
    fn test_segment_durations() {
        let offers = sample_offers();
        assert_eq!(
            segment_durations(&offers[1]),
            vec![
                ("CDG -> MRS".to_string(), 80),
                ("MRS -> ALG".to_string(), 70)
            ]
        );
    }
}
