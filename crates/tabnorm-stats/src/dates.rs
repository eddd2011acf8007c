//! Coverage of the main date series.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use tabnorm_model::{DateAnalysis, DateSource, Frequency, NormalizedTable};

/// Analyzes the datetime index if there is one, otherwise the first
/// datetime column. `None` when the table has no dates.
pub fn analyze_dates(table: &NormalizedTable) -> Option<DateAnalysis> {
    let (source, values): (DateSource, Vec<NaiveDateTime>) =
        if let Some(values) = table.index().as_datetime() {
            let name = table.index().name().unwrap_or_default().to_string();
            (DateSource::Index(name), values.to_vec())
        } else {
            let column = table
                .columns()
                .iter()
                .find(|column| column.as_datetime().is_some())?;
            let values = column.as_datetime()?.iter().flatten().copied().collect();
            (DateSource::Column(column.name.clone()), values)
        };

    let min = values.iter().min().copied()?;
    let max = values.iter().max().copied()?;
    let distinct: BTreeSet<NaiveDateTime> = values.iter().copied().collect();
    let duplicates = values.len() - distinct.len();

    // Intraday stamps have no supported frequency.
    let days: Vec<NaiveDate> = distinct.iter().map(NaiveDateTime::date).collect();
    let frequency = share_time_of_day(&distinct)
        .then(|| infer_frequency(&days))
        .flatten();
    let missing_periods = frequency.map(|f| expected_periods(min.date(), max.date(), f).saturating_sub(days.len()));

    tracing::debug!(%source, ?frequency, distinct = distinct.len(), "dates analyzed");
    Some(DateAnalysis {
        source,
        min,
        max,
        distinct: distinct.len(),
        frequency,
        missing_periods,
        duplicates,
    })
}

/// Infers the spacing of sorted, distinct dates.
///
/// The most common gap picks the candidate frequency; every gap must then be
/// a whole number of those periods. Month-based frequencies also need every
/// date on the same day of the month, or every date on a month end.
/// Needs at least three dates.
pub fn infer_frequency(dates: &[NaiveDate]) -> Option<Frequency> {
    if dates.len() < 3 {
        return None;
    }
    let gaps: Vec<i64> = dates
        .windows(2)
        .map(|pair| (pair[1] - pair[0]).num_days())
        .collect();

    let mut counts: HashMap<i64, usize> = HashMap::new();
    for gap in &gaps {
        *counts.entry(*gap).or_default() += 1;
    }
    // Smaller gap wins equal counts.
    let (modal, _) = counts
        .into_iter()
        .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)))?;

    let candidate = match modal {
        1 => Frequency::Daily,
        7 => Frequency::Weekly,
        28..=31 => Frequency::Monthly,
        89..=92 => Frequency::Quarterly,
        365..=366 => Frequency::Annual,
        _ => return None,
    };

    let aligned = match candidate {
        Frequency::Daily => true,
        Frequency::Weekly => gaps.iter().all(|gap| gap % 7 == 0),
        Frequency::Monthly | Frequency::Quarterly | Frequency::Annual => {
            let step = month_step(candidate);
            let day = dates[0].day();
            (dates.iter().all(|date| date.day() == day)
                || dates.iter().copied().all(is_month_end))
                && dates
                    .windows(2)
                    .all(|pair| (month_index(pair[1]) - month_index(pair[0])) % step == 0)
        }
    };
    aligned.then_some(candidate)
}

/// Number of periods from `min` to `max` inclusive at frequency `f`.
fn expected_periods(min: NaiveDate, max: NaiveDate, f: Frequency) -> usize {
    let span = match f {
        Frequency::Daily => (max - min).num_days(),
        Frequency::Weekly => (max - min).num_days() / 7,
        Frequency::Monthly | Frequency::Quarterly | Frequency::Annual => {
            (month_index(max) - month_index(min)) / month_step(f)
        }
    };
    usize::try_from(span).map_or(0, |span| span + 1)
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().is_none_or(|next| next.month() != date.month())
}

fn share_time_of_day(values: &BTreeSet<NaiveDateTime>) -> bool {
    let mut times = values.iter().map(NaiveDateTime::time);
    let first = times.next();
    times.all(|time| Some(time) == first)
}

fn month_step(f: Frequency) -> i64 {
    match f {
        Frequency::Quarterly => 3,
        Frequency::Annual => 12,
        _ => 1,
    }
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}
