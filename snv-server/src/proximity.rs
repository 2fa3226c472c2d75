//! Ordered index over a continuous key (km mark, station offset).
//!
//! Supports nearest-key lookup, inclusive range retrieval and a "range, or
//! else the nearest" fallback. Ties always go to the lower key (for
//! [`ProximityIndex::nearest`]) or to the start of the requested range (for
//! [`ProximityIndex::range_or_nearest`]).
//!
//! [`stationing`] builds on the index to bucket items into fixed-width
//! stations along a road.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;
use tracing::debug;

/// Step used to move a colliding key to a free slot.
pub const KEY_PERTURBATION: f64 = 1e-5;

/// Number of slots probed before an insert is dropped.
pub const MAX_PROBES: usize = 500;

/// Error from querying an index.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ProximityError {
    #[error("proximity index is empty")]
    Empty,

    #[error("station interval must be positive and finite, got {0}")]
    InvalidInterval(f64),
}

/// Map from a unique `f64` key to a value, ordered by key.
#[derive(Debug, Clone)]
pub struct ProximityIndex<T> {
    entries: BTreeMap<OrderedFloat<f64>, T>,
}

impl<T> Default for ProximityIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ProximityIndex<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert `value` at `key`.
    ///
    /// If `key` is taken, the value goes to the first free slot among
    /// `key + 1e-5`, `key + 2e-5`, ... Returns `false` without storing
    /// anything when no slot is free within [`MAX_PROBES`] probes, or when
    /// `key` is NaN.
    pub fn insert(&mut self, key: f64, value: T) -> bool {
        if key.is_nan() {
            debug!("dropping insert with NaN key");
            return false;
        }

        let mut slot = key;
        for _ in 0..MAX_PROBES {
            if !self.entries.contains_key(&OrderedFloat(slot)) {
                self.entries.insert(OrderedFloat(slot), value);
                return true;
            }
            slot += KEY_PERTURBATION;
        }

        debug!(key, probes = MAX_PROBES, "no free slot, dropping insert");
        false
    }

    /// Value whose key is closest to `key`; the lower key wins a tie.
    pub fn nearest(&self, key: f64) -> Result<&T, ProximityError> {
        self.closest_entry(key)
            .map(|(_, value)| value)
            .ok_or(ProximityError::Empty)
    }

    /// Values with keys in `[min(a, b), max(a, b)]`, in key order.
    pub fn range_inclusive(&self, a: f64, b: f64) -> Vec<&T> {
        let (lo, hi) = (a.min(b), a.max(b));
        if lo.is_nan() {
            return Vec::new();
        }

        self.entries
            .range(OrderedFloat(lo)..=OrderedFloat(hi))
            .map(|(_, value)| value)
            .collect()
    }

    /// The inclusive range if it has anything in it; otherwise a single
    /// value chosen from the entries nearest to each end.
    ///
    /// When both ends resolve to the same entry, that entry is returned.
    /// Otherwise the one closer to the midpoint `(a + b) / 2` is, with the
    /// entry nearest to `a` winning a tie. Empty only if the index is.
    pub fn range_or_nearest(&self, a: f64, b: f64) -> Vec<&T> {
        let in_range = self.range_inclusive(a, b);
        if !in_range.is_empty() {
            return in_range;
        }

        let (start, end) = match (self.closest_entry(a), self.closest_entry(b)) {
            (Some(start), Some(end)) => (start, end),
            (Some((_, value)), None) | (None, Some((_, value))) => return vec![value],
            (None, None) => return Vec::new(),
        };

        if start.0 == end.0 {
            return vec![start.1];
        }

        let midpoint = (a + b) / 2.0;
        if (midpoint - start.0).abs() <= (midpoint - end.0).abs() {
            vec![start.1]
        } else {
            vec![end.1]
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in key order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (f64, &T)> {
        self.entries.iter().map(|(key, value)| (key.0, value))
    }

    /// Smallest stored key `>= key`.
    fn first_key_from(&self, key: f64) -> Option<f64> {
        self.entries
            .range(OrderedFloat(key)..)
            .next()
            .map(|(k, _)| k.0)
    }

    /// Compare the floor (largest key <= `key`) and the ceiling (smallest
    /// key >= `key`); the floor wins a tie.
    fn closest_entry(&self, key: f64) -> Option<(f64, &T)> {
        let floor = self.entries.range(..=OrderedFloat(key)).next_back();
        let ceiling = self.entries.range(OrderedFloat(key)..).next();

        match (floor, ceiling) {
            (Some((lo, lo_value)), Some((hi, hi_value))) => {
                if (key - lo.0).abs() <= (key - hi.0).abs() {
                    Some((lo.0, lo_value))
                } else {
                    Some((hi.0, hi_value))
                }
            }
            (Some((k, value)), None) | (None, Some((k, value))) => Some((k.0, value)),
            (None, None) => None,
        }
    }
}

/// Tolerance for deciding that a value sits exactly on a station boundary.
pub const STATION_EPSILON: f64 = 1e-5;

/// Start of the next station after `value`.
///
/// A value on a boundary (within [`STATION_EPSILON`]) belongs to the
/// station starting there, so the next one begins a full interval later.
pub fn next_interval(value: f64, interval: f64) -> f64 {
    let ceiled = (value / interval).ceil() * interval;

    if value + STATION_EPSILON >= ceiled {
        value + interval
    } else {
        ceiled
    }
}

/// Start of the station containing `value`.
pub fn current_interval(value: f64, interval: f64) -> f64 {
    next_interval(value, interval) - interval
}

/// Items falling in `[start, end)` along a road.
#[derive(Debug, Clone, PartialEq)]
pub struct Station<T> {
    pub start: f64,
    pub end: f64,
    /// Items in key order
    pub items: Vec<T>,
}

/// Bucket `items` into stations of width `interval`, keyed by `key_fn`.
///
/// Only stations holding at least one item are returned, in ascending
/// order. Items with a NaN key are dropped, as are items sharing a key
/// with more than [`MAX_PROBES`] others.
pub fn stationing<T, F>(
    interval: f64,
    items: impl IntoIterator<Item = T>,
    key_fn: F,
) -> Result<Vec<Station<T>>, ProximityError>
where
    T: Clone,
    F: Fn(&T) -> f64,
{
    if !(interval.is_finite() && interval > 0.0) {
        return Err(ProximityError::InvalidInterval(interval));
    }

    let mut index = ProximityIndex::new();
    for item in items {
        let key = key_fn(&item);
        index.insert(key, item);
    }

    let (Some((min, _)), Some((max, _))) = (index.iter().next(), index.iter().next_back()) else {
        return Ok(Vec::new());
    };

    let last_start = next_interval(max, interval) - STATION_EPSILON;
    let mut start = current_interval(min, interval);
    let mut stations = Vec::new();

    while start <= last_start {
        let end = next_interval(start, interval);
        let in_station = index.range_inclusive(start, end - STATION_EPSILON);
        if !in_station.is_empty() {
            stations.push(Station {
                start,
                end,
                items: in_station.into_iter().cloned().collect(),
            });
        }

        // Skip straight to the next occupied station
        let Some(next_key) = index.first_key_from(end) else {
            break;
        };
        start = current_interval(next_key, interval).max(end);
    }

    debug!(interval, stations = stations.len(), "stationing done");
    Ok(stations)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_of(entries: &[(f64, &'static str)]) -> ProximityIndex<&'static str> {
        let mut index = ProximityIndex::new();
        for &(key, value) in entries {
            assert!(index.insert(key, value));
        }
        index
    }

    #[test]
    fn nearest_on_empty_index_fails() {
        let index: ProximityIndex<u8> = ProximityIndex::new();
        assert_eq!(index.nearest(1.0), Err(ProximityError::Empty));
    }

    #[test]
    fn nearest_tie_goes_to_lower_key() {
        let index = index_of(&[(10.0, "X"), (20.0, "Y")]);
        assert_eq!(index.nearest(15.0), Ok(&"X"));
    }

    #[test]
    fn nearest_picks_strictly_closer_key() {
        let index = index_of(&[(10.0, "X"), (20.0, "Y")]);
        assert_eq!(index.nearest(15.1), Ok(&"Y"));
        assert_eq!(index.nearest(14.9), Ok(&"X"));
    }

    #[test]
    fn nearest_outside_the_keys() {
        let index = index_of(&[(10.0, "X"), (20.0, "Y")]);
        assert_eq!(index.nearest(-100.0), Ok(&"X"));
        assert_eq!(index.nearest(100.0), Ok(&"Y"));
        assert_eq!(index.nearest(20.0), Ok(&"Y"));
    }

    #[test]
    fn colliding_keys_are_perturbed() {
        let mut index = ProximityIndex::new();
        assert!(index.insert(5.0, "a"));
        assert!(index.insert(5.0, "b"));
        assert!(index.insert(5.0, "c"));

        let keys: Vec<f64> = index.iter().map(|(k, _)| k).collect();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[0], 5.0);
        assert!((keys[1] - 5.00001).abs() < 1e-9);
        assert!((keys[2] - 5.00002).abs() < 1e-9);

        let values: Vec<_> = index.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_dropped_after_max_probes() {
        let mut index = ProximityIndex::new();
        for i in 0..MAX_PROBES {
            assert!(index.insert(1.0, i), "insert {i} should fit");
        }

        assert!(!index.insert(1.0, MAX_PROBES));
        assert_eq!(index.len(), MAX_PROBES);
    }

    #[test]
    fn nan_key_is_dropped() {
        let mut index = ProximityIndex::new();
        assert!(!index.insert(f64::NAN, 1));
        assert!(index.is_empty());
    }

    #[test]
    fn range_is_inclusive_and_order_independent() {
        let index = index_of(&[(1.0, "a"), (2.0, "b"), (3.0, "c"), (4.0, "d")]);

        assert_eq!(index.range_inclusive(2.0, 3.0), vec![&"b", &"c"]);
        assert_eq!(index.range_inclusive(3.0, 2.0), vec![&"b", &"c"]);
        assert_eq!(index.range_inclusive(0.0, 10.0).len(), 4);
        assert!(index.range_inclusive(2.1, 2.9).is_empty());
    }

    #[test]
    fn range_on_empty_index_is_empty() {
        let index: ProximityIndex<u8> = ProximityIndex::new();
        assert!(index.range_inclusive(0.0, 1.0).is_empty());
        assert!(index.range_or_nearest(0.0, 1.0).is_empty());
    }

    #[test]
    fn range_or_nearest_returns_range_when_populated() {
        let index = index_of(&[(10.0, "a"), (12.0, "b"), (30.0, "c")]);
        assert_eq!(index.range_or_nearest(9.0, 13.0), vec![&"a", &"b"]);
    }

    #[test]
    fn range_or_nearest_midpoint_tie_goes_to_start() {
        let index = index_of(&[(10.0, "Lo"), (30.0, "Hi")]);
        assert_eq!(index.range_or_nearest(15.0, 25.0), vec![&"Lo"]);
    }

    #[test]
    fn range_or_nearest_tie_follows_argument_order() {
        let index = index_of(&[(10.0, "Lo"), (30.0, "Hi")]);
        assert_eq!(index.range_or_nearest(25.0, 15.0), vec![&"Hi"]);
    }

    #[test]
    fn range_or_nearest_prefers_entry_closer_to_midpoint() {
        let index = index_of(&[(10.0, "Lo"), (30.0, "Hi")]);
        assert_eq!(index.range_or_nearest(16.0, 28.0), vec![&"Hi"]);
        assert_eq!(index.range_or_nearest(12.0, 24.0), vec![&"Lo"]);
    }

    #[test]
    fn range_or_nearest_same_entry_on_both_sides() {
        let index = index_of(&[(10.0, "only"), (100.0, "far")]);
        assert_eq!(index.range_or_nearest(20.0, 30.0), vec![&"only"]);
    }

    fn station_bounds<T>(stations: &[Station<T>]) -> Vec<(f64, f64)> {
        stations.iter().map(|s| (s.start, s.end)).collect()
    }

    #[test]
    fn interval_helpers_respect_boundaries() {
        assert_eq!(next_interval(12.3, 10.0), 20.0);
        assert_eq!(next_interval(20.0, 10.0), 30.0);
        assert_eq!(next_interval(-12.0, 10.0), -10.0);
        assert_eq!(current_interval(12.3, 10.0), 10.0);
        assert_eq!(current_interval(20.0, 10.0), 20.0);
        assert_eq!(current_interval(-120.1, 10.0), -130.0);
    }

    #[test]
    fn stationing_of_nothing_is_empty() {
        let stations = stationing(10.0, Vec::<f64>::new(), |v| *v).unwrap();
        assert!(stations.is_empty());
    }

    #[test]
    fn stationing_rejects_bad_interval() {
        for interval in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                stationing(interval, vec![1.0], |v: &f64| *v),
                Err(ProximityError::InvalidInterval(_))
            ));
        }
    }

    #[test]
    fn single_item_gets_one_station() {
        let stations = stationing(10.0, vec![12.3], |v| *v).unwrap();

        assert_eq!(station_bounds(&stations), vec![(10.0, 20.0)]);
        assert_eq!(stations[0].items, vec![12.3]);
    }

    #[test]
    fn boundary_item_opens_the_next_station() {
        let stations = stationing(0.5, vec![2.1, 2.6, 2.5], |v| *v).unwrap();

        assert_eq!(station_bounds(&stations), vec![(2.0, 2.5), (2.5, 3.0)]);
        assert_eq!(stations[0].items, vec![2.1]);
        assert_eq!(stations[1].items, vec![2.5, 2.6]);
    }

    #[test]
    fn stationing_skips_empty_stretches() {
        let items = vec![
            ("A", -120.1),
            ("B", -12.0),
            ("C", -10.0),
            ("D", -0.1),
            ("E", 0.0),
            ("F", 0.1),
            ("G", 9.9),
            ("H", 10.0),
            ("I", 10.1),
            ("J", 19.9),
            ("K", 20.0),
            ("L", 20.1),
            ("M", 25.5),
            ("N", 29.99),
            ("O", 120.1),
        ];

        let stations = stationing(10.0, items, |(_, km)| *km).unwrap();
        let names: Vec<Vec<&str>> = stations
            .iter()
            .map(|s| s.items.iter().map(|(name, _)| *name).collect())
            .collect();

        assert_eq!(
            station_bounds(&stations),
            vec![
                (-130.0, -120.0),
                (-20.0, -10.0),
                (-10.0, 0.0),
                (0.0, 10.0),
                (10.0, 20.0),
                (20.0, 30.0),
                (120.0, 130.0),
            ]
        );
        assert_eq!(
            names,
            vec![
                vec!["A"],
                vec!["B"],
                vec!["C", "D"],
                vec!["E", "F", "G"],
                vec!["H", "I", "J"],
                vec!["K", "L", "M", "N"],
                vec!["O"],
            ]
        );
    }

    #[test]
    fn stationing_drops_nan_keys() {
        let stations = stationing(1.0, vec![f64::NAN, 0.5], |v| *v).unwrap();

        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].items.len(), 1);
    }
}
