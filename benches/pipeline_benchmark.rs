use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flight_scanner::analysis::{
    average_price_by_weekday, cheapest_cabin_per_offer, cheapest_offers, filter_offers,
    price_statistics_by_airline, FilterCriteria,
};
use flight_scanner::OfferRecord;
use rand::{seq::SliceRandom, thread_rng, Rng};
use serde_json::json;

const AIRLINES: &[&str] = &["AF", "AH", "5O", "TO", "TU", "LH"];
const AIRPORTS: &[&str] = &["CDG", "ORY", "ALG", "MRS", "LYS", "ORN"];
const CABINS: &[&str] = &["ECONOMY", "PREMIUM_ECONOMY", "BUSINESS"];

fn random_offers(count: usize) -> Vec<OfferRecord> {
    let mut rng = thread_rng();
    (0..count)
        .map(|i| {
            let airline = AIRLINES.choose(&mut rng).unwrap();
            let segment_count = rng.gen_range(1..=3);
            let day = rng.gen_range(1..=28);
            let total: f64 = rng.gen_range(50.0..900.0);

            let segments: Vec<_> = (0..segment_count)
                .map(|s| {
                    let hour = 6 + s * 4;
                    json!({
                        "id": format!("{i}-{s}"),
                        "departure": {
                            "iataCode": AIRPORTS.choose(&mut rng).unwrap(),
                            "at": format!("2025-06-{day:02}T{hour:02}:00:00")
                        },
                        "arrival": {
                            "iataCode": AIRPORTS.choose(&mut rng).unwrap(),
                            "at": format!("2025-06-{day:02}T{:02}:30:00", hour + 2)
                        },
                        "carrierCode": airline,
                        "aircraft": {"code": "320"},
                        "duration": "PT2H30M",
                        "numberOfStops": rng.gen_range(0..=1)
                    })
                })
                .collect();
            let fare_details: Vec<_> = (0..segment_count)
                .map(|s| json!({"segmentId": format!("{i}-{s}"), "cabin": CABINS.choose(&mut rng).unwrap()}))
                .collect();

            serde_json::from_value(json!({
                "id": i.to_string(),
                "validatingAirlineCodes": [airline],
                "price": {
                    "currency": "EUR",
                    "total": format!("{total:.2}"),
                    "grandTotal": format!("{:.2}", total * 1.1)
                },
                "itineraries": [{
                    "duration": format!("PT{}H", segment_count * 4),
                    "segments": segments
                }],
                "numberOfBookableSeats": rng.gen_range(1..=9),
                "travelerPricings": [{
                    "travelerId": "1",
                    "price": {"currency": "EUR", "total": format!("{total:.2}")},
                    "fareDetailsBySegment": fare_details
                }]
            }))
            .unwrap()
        })
        .collect()
}

pub fn pipeline_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("offer_pipeline");

    for size in [100, 1_000, 10_000].iter() {
        let offers = random_offers(*size);
        let criteria = FilterCriteria {
            max_duration_minutes: Some(600),
            max_stops: Some(0),
            airlines: Some(vec!["AF".to_string(), "AH".to_string()]),
            cabin_class: Some("ECONOMY".to_string()),
        };

        group.bench_with_input(BenchmarkId::new("statistics", size), &offers, |b, offers| {
            b.iter(|| {
                black_box(price_statistics_by_airline(offers));
                black_box(average_price_by_weekday(offers));
                black_box(cheapest_cabin_per_offer(offers));
            })
        });

        group.bench_with_input(BenchmarkId::new("filter", size), &offers, |b, offers| {
            b.iter(|| black_box(filter_offers(offers, &criteria)))
        });

        group.bench_with_input(BenchmarkId::new("cheapest", size), &offers, |b, offers| {
            b.iter(|| black_box(cheapest_offers(offers, 10).len()))
        });
    }

    group.finish();
}

criterion_group!(benches, pipeline_benchmark);
criterion_main!(benches);
