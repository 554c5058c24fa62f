use std::cmp::Ordering;

use crate::timeseries::series::TimeSeries;

/// Sorted keys present in both series.
///
/// Borrows both inputs; keys are cloned only for the intersection.
pub fn common_keys<K, A, B>(a: &TimeSeries<K, A>, b: &TimeSeries<K, B>) -> Vec<K>
where
    K: Ord + Clone,
{
    let mut left: Vec<&K> = a.keys().collect();
    let mut right: Vec<&K> = b.keys().collect();
    left.sort_unstable();
    right.sort_unstable();

    let mut out = Vec::with_capacity(left.len().min(right.len()));
    let (mut i, mut j) = (0, 0);
    while i < left.len() && j < right.len() {
        match left[i].cmp(right[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                out.push(left[i].clone());
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// Restrict two series to their common keys.
///
/// Both outputs carry exactly the sorted intersection of the input key sets,
/// each row paired with its original key. Row types may differ, so an index
/// series can be aligned against a panel's row series directly.
///
/// Sorting is O(n log n + m log m); the walk that follows compares each key at
/// most once per step, for at most `n + m` comparisons. Disjoint inputs give
/// two empty series.
pub fn align<K, A, B>(
    a: TimeSeries<K, A>,
    b: TimeSeries<K, B>,
) -> (TimeSeries<K, A>, TimeSeries<K, B>)
where
    K: Ord,
{
    let a = a.sorted();
    let b = b.sorted();
    let cap = a.len().min(b.len());

    let mut out_a: Vec<(K, A)> = Vec::with_capacity(cap);
    let mut out_b: Vec<(K, B)> = Vec::with_capacity(cap);

    let mut left = a.into_iter().peekable();
    let mut right = b.into_iter().peekable();

    loop {
        let ord = match (left.peek(), right.peek()) {
            (Some((ka, _)), Some((kb, _))) => ka.cmp(kb),
            _ => break,
        };
        match ord {
            Ordering::Less => {
                left.next();
            }
            Ordering::Greater => {
                right.next();
            }
            Ordering::Equal => {
                if let (Some(ea), Some(eb)) = (left.next(), right.next()) {
                    out_a.push(ea);
                    out_b.push(eb);
                }
            }
        }
    }

    (
        TimeSeries::from_sorted_unique(out_a),
        TimeSeries::from_sorted_unique(out_b),
    )
}
