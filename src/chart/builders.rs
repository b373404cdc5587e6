//! Chart builders.
//!
//! Every builder is a pure function of its inputs: same rows and selection,
//! same `ChartSpec`.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::chart::spec::{
    BarMode, BarTrace, ChartSpec, Datum, GeoTrace, LayoutSpec, Marker, Orientation, SizeMode, Trace,
};
use crate::data::DatasetSnapshot;
use crate::domain::{Category, ConsumptionRow, MapMetric, Metric, WORLD};
use crate::error::DataError;

/// Number of bars in the top-N panels.
pub const DEFAULT_TOP_N: usize = 10;

/// Stacked per-source consumption bars for one country over time.
pub fn country_trend_chart(snapshot: &DatasetSnapshot, country: &str) -> Result<ChartSpec, DataError> {
    let mut traces = Vec::with_capacity(Category::SOURCES.len());
    for category in Category::SOURCES {
        let doc = snapshot
            .series_for(country, category)
            .ok_or_else(|| DataError::MissingSeries {
                category,
                country: country.to_string(),
            })?;

        let (x, y) = doc
            .observations
            .iter()
            .map(|obs| (Datum::Date(obs.date), obs.value.map_or(Datum::Missing, Datum::Number)))
            .unzip();

        traces.push(Trace::Bar(BarTrace {
            name: Some(doc.label.clone()),
            orientation: Orientation::Vertical,
            x,
            y,
            hoverinfo: Some("name+y".to_string()),
        }));
    }

    let mut layout = LayoutSpec::world_bars();
    layout.barmode = Some(BarMode::Stack);
    layout.title = Some(format!("Total energy consumption: {country}"));
    layout.yaxis_title = Some("QBtu".to_string());

    Ok(ChartSpec { traces, layout })
}

/// Sorted union of the dates across all bar traces; the shared x axis of a
/// stacked chart.
pub fn aligned_dates(chart: &ChartSpec) -> Vec<NaiveDate> {
    let mut dates = BTreeSet::new();
    for trace in &chart.traces {
        if let Trace::Bar(bar) = trace {
            for x in &bar.x {
                if let Datum::Date(d) = x {
                    dates.insert(*d);
                }
            }
        }
    }
    dates.into_iter().collect()
}

/// Horizontal bars for the `n` largest values of `metric` within `category`.
///
/// Bars run smallest to largest, so the largest value ends up at the top when
/// the first bar is drawn at the bottom. Rows without a value are skipped.
pub fn top_n_chart(rows: &[ConsumptionRow], category: Category, metric: Metric, n: usize) -> ChartSpec {
    let mut subset: Vec<(&str, f64)> = rows
        .iter()
        .filter(|r| r.label == category)
        .filter_map(|r| r.metric(metric).map(|v| (r.country.as_str(), v)))
        .collect();
    // Stable sort keeps file order among equal values.
    subset.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
    let start = subset.len().saturating_sub(n);
    let top = &subset[start..];

    let trace = BarTrace {
        name: None,
        orientation: Orientation::Horizontal,
        x: top.iter().map(|(_, v)| Datum::Number(*v)).collect(),
        y: top.iter().map(|(c, _)| Datum::Text((*c).to_string())).collect(),
        hoverinfo: None,
    };

    ChartSpec {
        traces: vec![Trace::Bar(trace)],
        layout: LayoutSpec::simple_bars(),
    }
}

/// Bubble map of total energy use per country, sized by the selected metric.
pub fn world_map_chart(rows: &[ConsumptionRow], map_metric: MapMetric) -> ChartSpec {
    let metric = map_metric.metric();
    let mut geo = GeoTrace {
        lon: Vec::new(),
        lat: Vec::new(),
        text: Vec::new(),
        hoverinfo: "text".to_string(),
        marker: Marker {
            size: Vec::new(),
            line_width: 0.5,
            sizemode: SizeMode::Area,
        },
    };

    let located = rows
        .iter()
        .filter(|r| r.country != WORLD && r.label == Category::TotalEnergyConsumption);
    for row in located {
        let (Some(lat), Some(lon), Some(value)) = (row.lat, row.long, row.metric(metric)) else {
            continue;
        };
        geo.lat.push(lat);
        geo.lon.push(lon);
        geo.text.push(format!(
            "{}<br>{}: {} {}",
            row.country,
            map_metric.label(),
            round2(value),
            map_metric.unit()
        ));
        geo.marker.size.push(map_metric.scale() * value);
    }

    ChartSpec {
        traces: vec![Trace::ScatterGeo(geo)],
        layout: LayoutSpec::world_map(),
    }
}

/// Round to two decimals and print without trailing zeros (`12.3`, `4`).
fn round2(v: f64) -> String {
    let r = (v * 100.0).round() / 100.0;
    if r.fract() == 0.0 {
        format!("{r:.1}")
    } else {
        format!("{r}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Observation, SeriesDocument};
    use crate::report::fixtures::row;

    fn series(country: &str, category: Category, values: &[Option<f64>]) -> SeriesDocument {
        SeriesDocument {
            raw_name: String::new(),
            category,
            label: category.label().to_string(),
            country: country.to_string(),
            observations: values
                .iter()
                .enumerate()
                .map(|(i, v)| Observation {
                    date: NaiveDate::from_ymd_opt(1980 + i as i32, 1, 1).unwrap(),
                    value: *v,
                })
                .collect(),
            last_value: 1.0,
        }
    }

    fn world_snapshot() -> DatasetSnapshot {
        let mut docs = Vec::new();
        for (i, category) in Category::ALL.into_iter().enumerate() {
            let values: Vec<Option<f64>> = (0..38).map(|y| Some((i * 100 + y) as f64)).collect();
            docs.push(series(WORLD, category, &values));
        }
        docs.push(series("Chile", Category::Coal, &[Some(1.0)]));
        DatasetSnapshot::from_parts(Vec::new(), Vec::new(), docs)
    }

    #[test]
    fn world_trend_has_one_full_series_per_source() {
        let chart = country_trend_chart(&world_snapshot(), WORLD).unwrap();
        assert_eq!(chart.traces.len(), 4);
        let names: Vec<_> = chart
            .traces
            .iter()
            .map(|t| match t {
                Trace::Bar(b) => {
                    assert_eq!(b.x.len(), 38);
                    assert_eq!(b.y.len(), 38);
                    b.name.clone().unwrap()
                }
                Trace::ScatterGeo(_) => panic!("unexpected geo trace"),
            })
            .collect();
        assert_eq!(
            names,
            ["Petroleum and other liquids", "Coal", "Natural gas", "Nuclear, renewables, and other"]
        );
        assert_eq!(chart.layout.barmode, Some(BarMode::Stack));
        assert_eq!(chart.layout.title.as_deref(), Some("Total energy consumption: World"));
        assert_eq!(chart.layout.yaxis_title.as_deref(), Some("QBtu"));
    }

    #[test]
    fn aligned_dates_have_no_gaps() {
        let chart = country_trend_chart(&world_snapshot(), WORLD).unwrap();
        let dates = aligned_dates(&chart);
        assert_eq!(dates.len(), 38);
        for pair in dates.windows(2) {
            assert_eq!(pair[1].years_since(pair[0]), Some(1));
        }
    }

    #[test]
    fn trend_keeps_missing_observations_as_gaps_in_y() {
        let mut docs = Vec::new();
        for category in Category::SOURCES {
            docs.push(series("Chile", category, &[Some(1.0), None, Some(2.0)]));
        }
        let snapshot = DatasetSnapshot::from_parts(Vec::new(), Vec::new(), docs);
        let chart = country_trend_chart(&snapshot, "Chile").unwrap();
        let Trace::Bar(first) = &chart.traces[0] else { panic!() };
        assert_eq!(first.y[1], Datum::Missing);
    }

    #[test]
    fn trend_requires_all_four_sources() {
        let err = country_trend_chart(&world_snapshot(), "Chile").unwrap_err();
        assert!(matches!(err, DataError::MissingSeries { .. }));
    }

    #[test]
    fn top_n_keeps_the_largest_in_ascending_order() {
        let rows: Vec<_> = (0..15)
            .map(|i| row(&format!("C{i:02}"), Category::Coal, ((i * 7) % 15) as f64))
            .chain(std::iter::once(row("Other", Category::NaturalGas, 1000.0)))
            .collect();
        let chart = top_n_chart(&rows, Category::Coal, Metric::LastValue, DEFAULT_TOP_N);
        let Trace::Bar(bar) = &chart.traces[0] else { panic!() };
        assert_eq!(bar.orientation, Orientation::Horizontal);
        let values: Vec<f64> = bar.x.iter().filter_map(Datum::as_number).collect();
        assert_eq!(values, (5..15).map(|v| v as f64).collect::<Vec<_>>());
        assert_eq!(bar.y.len(), 10);
    }

    #[test]
    fn top_n_with_fewer_rows_returns_all() {
        let rows = vec![row("A", Category::Coal, 2.0), row("B", Category::Coal, 1.0)];
        let chart = top_n_chart(&rows, Category::Coal, Metric::LastValue, 10);
        let Trace::Bar(bar) = &chart.traces[0] else { panic!() };
        assert_eq!(bar.y, vec![Datum::Text("B".into()), Datum::Text("A".into())]);
    }

    #[test]
    fn world_map_excludes_world_and_scales_markers() {
        let mut world = row(WORLD, Category::TotalEnergyConsumption, 570.0);
        world.lat = Some(0.0);
        world.long = Some(0.0);
        let mut chile = row("Chile", Category::TotalEnergyConsumption, 1.666);
        chile.lat = Some(-35.7);
        chile.long = Some(-71.5);
        chile.mbtu_pp = Some(90.0);
        let mut coal = row("Chile", Category::Coal, 0.3);
        coal.lat = Some(-35.7);
        coal.long = Some(-71.5);
        let unlocated = row("Peru", Category::TotalEnergyConsumption, 1.0);

        let rows = vec![world, chile, coal, unlocated];
        let chart = world_map_chart(&rows, MapMetric::Total);
        let Trace::ScatterGeo(geo) = &chart.traces[0] else { panic!() };
        assert_eq!(geo.lat, vec![-35.7]);
        assert!((geo.marker.size[0] - 16.66).abs() < 1e-9);
        assert_eq!(geo.text[0], "Chile<br>Total energy consumption: 1.67 QBtu");
        assert_eq!(chart.layout.geo.as_ref().unwrap().projection, "natural earth");

        let chart = world_map_chart(&rows, MapMetric::PerCapita);
        let Trace::ScatterGeo(geo) = &chart.traces[0] else { panic!() };
        assert_eq!(geo.marker.size, vec![90.0]);
        assert_eq!(geo.text[0], "Chile<br>Energy consumption per capita: 90.0 MBtu per person");
    }

    #[test]
    fn builders_are_deterministic() {
        let rows = vec![row("A", Category::Coal, 2.0), row("B", Category::Coal, 2.0)];
        assert_eq!(
            top_n_chart(&rows, Category::Coal, Metric::LastValue, 10),
            top_n_chart(&rows, Category::Coal, Metric::LastValue, 10)
        );
    }

    #[test]
    fn missing_values_serialize_as_null() {
        let json = serde_json::to_value(Datum::Missing).unwrap();
        assert!(json.is_null());
    }
}
