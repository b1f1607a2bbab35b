use std::collections::{BTreeMap, HashMap};

use crate::analyzers::correlation::correlate_yearly;
use crate::analyzers::types::{DatasetAggregate, RankedAggregate, Summary, YearlyAggregate};
use crate::analyzers::utility::{mean, share};
use crate::dataset::{Dataset, IncidentRecord, UNKNOWN_LINE};

/// Default length of the station ranking.
pub const TOP_STATIONS: usize = 10;
/// Default length of the borough ranking.
pub const TOP_BOROUGHS: usize = 15;

/// Sums counts per year, ascending by year.
pub fn yearly_totals(dataset: &Dataset) -> Vec<YearlyAggregate> {
    let mut by_year: BTreeMap<i32, f64> = BTreeMap::new();
    for record in dataset.records() {
        *by_year.entry(record.year).or_default() += record.count;
    }

    let grand_total: f64 = by_year.values().sum();

    by_year
        .into_iter()
        .map(|(year, total)| YearlyAggregate {
            year,
            total,
            share: share(total, grand_total),
        })
        .collect()
}

/// Groups records by `key`, sums counts and ranks groups by total.
///
/// Records for which `key` returns `None` are left out of both the groups and
/// the share denominator. Groups are ordered by total descending, then by
/// key ascending. Shares are computed before `limit` truncates the ranking.
pub fn rank_by<F>(dataset: &Dataset, key: F, limit: Option<usize>) -> Vec<RankedAggregate>
where
    F: Fn(&IncidentRecord) -> Option<&str>,
{
    let mut groups: HashMap<&str, f64> = HashMap::new();
    for record in dataset.records() {
        if let Some(k) = key(record) {
            *groups.entry(k).or_default() += record.count;
        }
    }

    let group_total: f64 = groups.values().sum();

    let mut ranked: Vec<(&str, f64)> = groups.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    if let Some(limit) = limit {
        ranked.truncate(limit);
    }

    ranked
        .into_iter()
        .map(|(key, total)| RankedAggregate {
            key: key.to_string(),
            total,
            share: share(total, group_total),
        })
        .collect()
}

pub fn top_stations(dataset: &Dataset, n: usize) -> Vec<RankedAggregate> {
    rank_by(dataset, |r| Some(r.station.as_str()), Some(n))
}

pub fn top_boroughs(dataset: &Dataset, n: usize) -> Vec<RankedAggregate> {
    rank_by(dataset, |r| Some(r.borough.as_str()), Some(n))
}

/// Totals per line, leaving out rows whose line is unknown. Not truncated.
pub fn line_totals(dataset: &Dataset) -> Vec<RankedAggregate> {
    rank_by(
        dataset,
        |r| (r.line != UNKNOWN_LINE).then_some(r.line.as_str()),
        None,
    )
}

/// Computes every aggregate for `dataset`. `None` if the dataset is empty.
pub fn aggregate_dataset(
    dataset: &Dataset,
    station_limit: usize,
    borough_limit: usize,
) -> Option<DatasetAggregate> {
    let yearly = yearly_totals(dataset);
    let first_year = yearly.first()?.year;
    let last_year = yearly.last()?.year;

    let totals: Vec<f64> = yearly.iter().map(|y| y.total).collect();

    let summary = Summary {
        grand_total: dataset.total_count(),
        record_count: dataset.len(),
        first_year,
        last_year,
        average_per_year: mean(&totals),
    };

    let correlation = correlate_yearly(&yearly);

    Some(DatasetAggregate {
        summary,
        top_stations: top_stations(dataset, station_limit),
        top_boroughs: top_boroughs(dataset, borough_limit),
        lines: line_totals(dataset),
        yearly,
        correlation,
    })
}
