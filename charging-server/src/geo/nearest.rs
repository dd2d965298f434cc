//! Nearest-N selection.

use std::fmt;

use tracing::trace;

use super::{Coordinate, distance};

/// Anything that sits at a point on the map.
pub trait Located {
    /// Identifier used when reporting on a record.
    type Id: fmt::Debug;

    fn id(&self) -> Self::Id;

    /// The record's position, or `None` if its source data is unusable.
    fn coordinate(&self) -> Option<Coordinate>;
}

/// The `limit` records closest to `origin`, nearest first, with their
/// distances in kilometres.
///
/// Ties keep their input order. Records without a usable coordinate are
/// skipped. The input is never modified.
pub fn nearest_with_distance<T: Located>(
    origin: Coordinate,
    records: &[T],
    limit: usize,
) -> Vec<(&T, f64)> {
    if limit == 0 {
        return Vec::new();
    }

    let mut ranked: Vec<(&T, f64)> = records
        .iter()
        .filter_map(|record| match record.coordinate() {
            Some(at) => Some((record, distance(origin, at))),
            None => {
                trace!(id = ?record.id(), "skipping record without a usable coordinate");
                None
            }
        })
        .collect();

    // sort_by is stable, which gives the input-order tie-break
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));
    ranked.truncate(limit);
    ranked
}

/// The `limit` records closest to `origin`, nearest first.
///
/// See [`nearest_with_distance`] for ordering and filtering rules.
pub fn nearest<T: Located>(origin: Coordinate, records: &[T], limit: usize) -> Vec<&T> {
    nearest_with_distance(origin, records, limit)
        .into_iter()
        .map(|(record, _)| record)
        .collect()
}
