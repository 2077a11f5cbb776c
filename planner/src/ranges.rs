//! Generic interval merging.

use std::ops::Range;

/// A half-open interval that can absorb an overlapping neighbour.
pub trait Interval {
    type Point: Ord + Copy;

    fn start(&self) -> Self::Point;
    fn end(&self) -> Self::Point;

    /// Grow this interval so it ends at `end`.
    fn extend_to(&mut self, end: Self::Point);
}

impl<T: Ord + Copy> Interval for Range<T> {
    type Point = T;

    fn start(&self) -> T {
        self.start
    }

    fn end(&self) -> T {
        self.end
    }

    fn extend_to(&mut self, end: T) {
        self.end = end;
    }
}

/// Sort by start and merge in a single sweep.
///
/// An interval starting at or before the running end is absorbed, so
/// adjacent intervals merge too. The result is sorted and pairwise
/// non-overlapping; a merged interval keeps the identity of its first member.
pub fn merge_intervals<I: Interval>(mut intervals: Vec<I>) -> Vec<I> {
    intervals.sort_by_key(|i| i.start());

    let mut merged: Vec<I> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start() <= last.end() => {
                if interval.end() > last.end() {
                    last.extend_to(interval.end());
                }
            }
            _ => merged.push(interval),
        }
    }
    merged
}
