use std::fmt::Debug;

use crate::AmplitudeError;
use crate::timeseries::merge::dedup_entries;
use amplitude_types::DuplicatePolicy;

/// Key-unique sequence of `(key, row)` entries.
///
/// Entries keep their insertion order, so a series may be unsorted; operations
/// that need order (`align`, `merge_update`, `reindex_forward_fill`) sort a
/// copy of the entries first. Keys are guaranteed unique: every constructor
/// either rejects or reduces duplicates.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries<K, R> {
    entries: Vec<(K, R)>,
    // strictly ascending keys; enables binary search in `get`
    sorted: bool,
}

impl<K, R> Default for TimeSeries<K, R> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            sorted: true,
        }
    }
}

impl<K: Ord, R> TimeSeries<K, R> {
    /// Empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a series from entries whose keys are already known to be unique.
    ///
    /// # Errors
    /// Returns `AmplitudeError::DuplicateKey` naming the first repeated key.
    pub fn from_entries(entries: Vec<(K, R)>) -> Result<Self, AmplitudeError>
    where
        K: Debug,
    {
        let mut keys: Vec<&K> = entries.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        if let Some(w) = keys.windows(2).find(|w| w[0] == w[1]) {
            return Err(AmplitudeError::duplicate_key("series", w[0]));
        }
        Ok(Self::from_unique(entries))
    }

    /// Build a series, reducing repeated keys according to `policy`.
    ///
    /// The result is sorted ascending. With `DuplicatePolicy::KeepFirst` the
    /// earliest entry for a key (in input order) survives.
    ///
    /// # Errors
    /// Returns `AmplitudeError::DuplicateKey` only under `DuplicatePolicy::Reject`.
    pub fn from_entries_dedup(
        entries: Vec<(K, R)>,
        policy: DuplicatePolicy,
    ) -> Result<Self, AmplitudeError>
    where
        K: Debug,
    {
        let entries = dedup_entries(entries, policy)?;
        Ok(Self {
            entries,
            sorted: true,
        })
    }

    // Callers guarantee uniqueness.
    pub(crate) fn from_unique(entries: Vec<(K, R)>) -> Self {
        let sorted = entries.windows(2).all(|w| w[0].0 < w[1].0);
        Self { entries, sorted }
    }

    pub(crate) const fn from_sorted_unique(entries: Vec<(K, R)>) -> Self {
        Self {
            entries,
            sorted: true,
        }
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the series holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when keys are in strictly ascending order.
    #[must_use]
    pub const fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// Iterate over `(key, row)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &R)> {
        self.entries.iter().map(|(k, r)| (k, r))
    }

    /// Iterate over keys in storage order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.iter().map(|(k, _)| k)
    }

    /// Iterate over rows in storage order.
    pub fn values(&self) -> impl Iterator<Item = &R> {
        self.entries.iter().map(|(_, r)| r)
    }

    /// Borrow the raw entries.
    #[must_use]
    pub fn entries(&self) -> &[(K, R)] {
        &self.entries
    }

    /// Consume the series and return its entries in storage order.
    #[must_use]
    pub fn into_entries(self) -> Vec<(K, R)> {
        self.entries
    }

    /// Row stored under `key`.
    pub fn get(&self, key: &K) -> Option<&R> {
        if self.sorted {
            self.entries
                .binary_search_by(|(k, _)| k.cmp(key))
                .ok()
                .map(|i| &self.entries[i].1)
        } else {
            self.entries.iter().find(|(k, _)| k == key).map(|(_, r)| r)
        }
    }

    /// Same series with entries ordered by ascending key.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        if !self.sorted {
            self.entries.sort_by(|a, b| a.0.cmp(&b.0));
            self.sorted = true;
        }
        self
    }

    /// Smallest key.
    pub fn first_key(&self) -> Option<&K> {
        if self.sorted {
            self.entries.first().map(|(k, _)| k)
        } else {
            self.keys().min()
        }
    }

    /// Largest key.
    pub fn last_key(&self) -> Option<&K> {
        if self.sorted {
            self.entries.last().map(|(k, _)| k)
        } else {
            self.keys().max()
        }
    }

    /// Keep only the `n` entries with the largest keys (sorted ascending).
    #[must_use]
    pub fn tail(self, n: usize) -> Self {
        let mut s = self.sorted();
        let skip = s.entries.len().saturating_sub(n);
        s.entries.drain(..skip);
        s
    }

    /// Keep only entries with keys `<= end`.
    #[must_use]
    pub fn truncate_after(mut self, end: &K) -> Self {
        self.entries.retain(|(k, _)| k <= end);
        self
    }

    /// Drop the entry with the largest key when `pred` holds for it.
    ///
    /// Used to discard an incomplete final session (e.g. a zero-volume row
    /// written before the market closed).
    #[must_use]
    pub fn drop_last_if(self, pred: impl FnOnce(&R) -> bool) -> Self {
        let mut s = self.sorted();
        if s.entries.last().is_some_and(|(_, r)| pred(r)) {
            s.entries.pop();
        }
        s
    }

    /// Largest key whose row satisfies `pred`.
    pub fn last_key_where(&self, mut pred: impl FnMut(&R) -> bool) -> Option<&K> {
        self.entries
            .iter()
            .filter(|(_, r)| pred(r))
            .map(|(k, _)| k)
            .max()
    }

    /// Transform every row, keeping keys and order.
    #[must_use]
    pub fn map_values<S>(self, mut f: impl FnMut(R) -> S) -> TimeSeries<K, S> {
        TimeSeries {
            entries: self.entries.into_iter().map(|(k, r)| (k, f(r))).collect(),
            sorted: self.sorted,
        }
    }
}

impl<K, R> IntoIterator for TimeSeries<K, R> {
    type Item = (K, R);
    type IntoIter = std::vec::IntoIter<(K, R)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
