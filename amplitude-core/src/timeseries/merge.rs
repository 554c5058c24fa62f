use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::AmplitudeError;
use crate::timeseries::series::TimeSeries;
use amplitude_types::DuplicatePolicy;

/// Reduce repeated keys according to `policy`, returning entries sorted by key.
///
/// - `KeepFirst`: the earliest entry for a key (in input order) wins.
/// - `KeepLast`: the latest entry for a key wins.
/// - `Reject`: any repeat is an error.
///
/// # Errors
/// Returns `AmplitudeError::DuplicateKey` under `DuplicatePolicy::Reject`.
pub fn dedup_entries<K, R>(
    mut entries: Vec<(K, R)>,
    policy: DuplicatePolicy,
) -> Result<Vec<(K, R)>, AmplitudeError>
where
    K: Ord + Debug,
{
    // Stable: equal keys keep their input order, so run heads are first occurrences.
    entries.sort_by(|a, b| a.0.cmp(&b.0));

    let mut out: Vec<(K, R)> = Vec::with_capacity(entries.len());
    for (k, r) in entries {
        let repeated = out.last().is_some_and(|(last, _)| *last == k);
        if !repeated {
            out.push((k, r));
            continue;
        }
        match policy {
            DuplicatePolicy::KeepFirst => {}
            DuplicatePolicy::KeepLast => {
                if let Some(last) = out.last_mut() {
                    last.1 = r;
                }
            }
            DuplicatePolicy::Reject => return Err(AmplitudeError::duplicate_key("series", &k)),
        }
    }
    Ok(out)
}

/// Result of merging fresh rows into a stored series.
#[derive(Debug, Clone, PartialEq)]
pub struct MergeOutcome<K, R> {
    /// Merged series, sorted ascending.
    pub series: TimeSeries<K, R>,
    /// True when the merged series differs from the stored one.
    pub changed: bool,
}

/// Merge `fresh` into `existing`; fresh rows overwrite stored rows on the same key.
///
/// - Output is sorted by key.
/// - When `end` is given, keys after it are dropped.
/// - `changed` compares against the stored series in sorted order.
pub fn merge_update<K, R>(
    existing: TimeSeries<K, R>,
    fresh: TimeSeries<K, R>,
    end: Option<&K>,
) -> MergeOutcome<K, R>
where
    K: Ord + Clone,
    R: Clone + PartialEq,
{
    let existing = existing.sorted();
    let mut map: BTreeMap<K, R> = existing
        .iter()
        .map(|(k, r)| (k.clone(), r.clone()))
        .collect();
    for (k, r) in fresh {
        map.insert(k, r);
    }

    let merged: Vec<(K, R)> = map
        .into_iter()
        .filter(|(k, _)| end.is_none_or(|e| k <= e))
        .collect();
    let changed = merged.as_slice() != existing.entries();

    MergeOutcome {
        series: TimeSeries::from_sorted_unique(merged),
        changed,
    }
}

/// Decide whether a stored series already covers the requested period.
///
/// Returns `true` when the last stored key reaches either the requested end or
/// the last key the upstream provider can deliver. With no stored data an
/// update is always needed.
#[must_use]
pub fn should_skip_update<K: Ord>(
    last_existing: Option<&K>,
    requested_end: &K,
    provider_end: &K,
) -> bool {
    last_existing.is_some_and(|last| last >= requested_end || last >= provider_end)
}
