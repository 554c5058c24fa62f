//! Date-keyed series and the operations the loader and pipeline run on them.
//!
//! - `series`: the key-unique `TimeSeries` container
//! - `align`: restrict two series to their common keys
//! - `merge`: duplicate reduction and update merges
//! - `reindex`: forward-fill a series onto another timeline
/// Intersection alignment of two series.
pub mod align;
/// Duplicate reduction and merge utilities.
pub mod merge;
/// Projection of a series onto a foreign timeline.
pub mod reindex;
/// The `TimeSeries` container.
pub mod series;
