// Charting collaborator: bar charts rendered to terminal text
use crate::airlines::airline_name;
use crate::analysis::{segment_durations, PriceStats};
use crate::offer::OfferRecord;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BarRow {
    pub label: String,
    // One value per entry of `BarChart::series`
    pub values: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub title: String,
    pub unit: String,
    pub series: Vec<String>,
    pub rows: Vec<BarRow>,
}

impl BarChart {
    fn max_value(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| row.values.iter().copied())
            .fold(0.0, f64::max)
    }
}

pub trait ChartRenderer {
    fn render(&self, chart: &BarChart) -> String;
}

/// Horizontal `#` bars scaled so the largest value fills `width` columns.
pub struct TextChartRenderer {
    pub width: usize,
}

impl Default for TextChartRenderer {
    fn default() -> Self {
        Self { width: 40 }
    }
}

impl ChartRenderer for TextChartRenderer {
    fn render(&self, chart: &BarChart) -> String {
        let mut lines = vec![chart.title.clone()];
        if chart.rows.is_empty() {
            lines.push("  (no data)".to_string());
            return lines.join("\n") + "\n";
        }

        let max = chart.max_value();
        let label_width = chart.rows.iter().map(|r| r.label.len()).max().unwrap_or(0);
        let series_width = chart.series.iter().map(String::len).max().unwrap_or(0);

        for row in &chart.rows {
            for (i, value) in row.values.iter().enumerate() {
                let label = if i == 0 { row.label.as_str() } else { "" };
                let series = chart.series.get(i).map_or("", String::as_str);
                let bar_len = if max > 0.0 {
                    ((value / max) * self.width as f64).round() as usize
                } else {
                    0
                };
                let line = format!(
                    "  {label:<label_width$}  {series:<series_width$}  {} {value:.2} {}",
                    "#".repeat(bar_len),
                    chart.unit
                );
                lines.push(line.trim_end().to_string());
            }
        }
        lines.join("\n") + "\n"
    }
}

/// Mean and median price per airline, labelled by airline name.
pub fn airline_price_chart(statistics: &BTreeMap<String, PriceStats>, currency: &str) -> BarChart {
    BarChart {
        title: "Mean and Median Flight Prices by Airline".to_string(),
        unit: currency.to_string(),
        series: vec!["Mean Price".to_string(), "Median Price".to_string()],
        rows: statistics
            .iter()
            .map(|(code, stats)| BarRow {
                label: airline_name(code).to_string(),
                values: vec![stats.mean, stats.median],
            })
            .collect(),
    }
}

/// One duration chart per offer, a bar per segment.
pub fn itinerary_charts(offers: &[OfferRecord]) -> Vec<BarChart> {
    offers
        .iter()
        .enumerate()
        .map(|(i, offer)| BarChart {
            title: format!("Itinerary {}", i + 1),
            unit: "min".to_string(),
            series: vec!["Duration".to_string()],
            rows: segment_durations(offer)
                .into_iter()
                .map(|(label, minutes)| BarRow {
                    label,
                    values: vec![f64::from(minutes)],
                })
                .collect(),
        })
        .collect()
}
