use crate::timeseries::series::TimeSeries;

/// Project `series` onto `timeline`, carrying the latest row at or before each date.
///
/// The timeline is sorted and de-duplicated first. Dates before the series'
/// first observation map to `None`. Both sides are walked once.
pub fn reindex_forward_fill<K, R>(
    series: &TimeSeries<K, R>,
    timeline: &[K],
) -> TimeSeries<K, Option<R>>
where
    K: Ord + Clone,
    R: Clone,
{
    let mut dates: Vec<&K> = timeline.iter().collect();
    dates.sort_unstable();
    dates.dedup();

    let mut rows: Vec<(&K, &R)> = series.iter().collect();
    if !series.is_sorted() {
        rows.sort_by(|a, b| a.0.cmp(b.0));
    }

    let mut out = Vec::with_capacity(dates.len());
    let mut cursor = 0;
    let mut carried: Option<&R> = None;
    for date in dates {
        while cursor < rows.len() && rows[cursor].0 <= date {
            carried = Some(rows[cursor].1);
            cursor += 1;
        }
        out.push((date.clone(), carried.cloned()));
    }
    TimeSeries::from_sorted_unique(out)
}

/// Fill leading `None` rows with the first observed row.
///
/// Interior gaps are left alone; a series with no observation stays all `None`.
#[must_use]
pub fn backfill_leading<K, R>(series: TimeSeries<K, Option<R>>) -> TimeSeries<K, Option<R>>
where
    K: Ord,
    R: Clone,
{
    let series = series.sorted();
    let Some(first) = series.values().find_map(Clone::clone) else {
        return series;
    };
    let mut leading = true;
    series.map_values(|row| {
        if row.is_some() {
            leading = false;
        }
        if leading { Some(first.clone()) } else { row }
    })
}
