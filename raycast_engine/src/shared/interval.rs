use std::fmt::{Display, Formatter};
use std::ops::{RangeFrom, RangeFull, RangeInclusive, RangeToInclusive};

use serde::{Deserialize, Serialize};

/// A closed interval of values, used for the valid distance range `[t_min, t_max]` of a ray query.
///
/// There may/not be a `start` and/or `end` bound; a missing bound is unbounded on that side.
/// Both bounds are *inclusive*.
///
/// # Empty intervals
/// An interval with `start > end` (or with a bound that can't be compared, such as NaN) is *empty*,
/// and contains nothing. Queries given an empty interval report no intersection.
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interval<T> {
    pub start: Option<T>,
    pub end: Option<T>,
}

impl<T> From<RangeFull> for Interval<T> {
    fn from(_value: RangeFull) -> Self { Self::FULL }
}
impl<T> From<RangeInclusive<T>> for Interval<T> {
    fn from(value: RangeInclusive<T>) -> Self {
        let (start, end) = value.into_inner();
        Self::new(start, end)
    }
}
impl<T> From<RangeFrom<T>> for Interval<T> {
    fn from(value: RangeFrom<T>) -> Self {
        Self {
            start: Some(value.start),
            end: None,
        }
    }
}
impl<T> From<RangeToInclusive<T>> for Interval<T> {
    fn from(value: RangeToInclusive<T>) -> Self {
        Self {
            start: None,
            end: Some(value.end),
        }
    }
}

impl<T> Interval<T> {
    pub const FULL: Self = Self { start: None, end: None };

    pub const fn new(start: T, end: T) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// Replaces the upper bound, keeping the lower one
    pub fn with_end(self, end: T) -> Self {
        Self {
            end: Some(end),
            ..self
        }
    }
}

impl<T: PartialOrd> Interval<T> {
    pub fn contains(&self, item: &T) -> bool {
        let above = self.start.as_ref().map_or(true, |start| start <= item);
        let below = self.end.as_ref().map_or(true, |end| item <= end);
        above && below
    }

    /// Whether the interval contains no values at all
    pub fn is_empty(&self) -> bool {
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => !(start <= end),
            // An unbounded side can still be an incomparable value (NaN), so check the bounds against themselves
            (Some(bound), None) | (None, Some(bound)) => !(bound <= bound),
            (None, None) => false,
        }
    }
}

impl<T: PartialOrd + Copy> Interval<T> {
    /// Intersects the range `min..=max` with `self`, returning the overlapping part if there is one
    pub fn overlap(&self, min: T, max: T) -> Option<(T, T)> {
        let low = match self.start {
            Some(start) if start > min => start,
            _ => min,
        };
        let high = match self.end {
            Some(end) if end < max => end,
            _ => max,
        };
        (low <= high).then_some((low, high))
    }
}

impl<T: Display> Display for Interval<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        match &self.start {
            Some(start) => write!(f, "{start}")?,
            None => write!(f, "-inf")?,
        }
        write!(f, ", ")?;
        match &self.end {
            Some(end) => write!(f, "{end}")?,
            None => write!(f, "inf")?,
        }
        write!(f, "]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Number;

    #[test]
    fn contains_is_inclusive() {
        let i = Interval::new(0., 100.);
        assert!(i.contains(&0.));
        assert!(i.contains(&100.));
        assert!(!i.contains(&100.0001));
        assert!(!i.contains(&-0.0001));
    }

    #[test]
    fn reversed_and_nan_bounds_are_empty() {
        assert!(Interval::new(5., 1.).is_empty());
        assert!(Interval::new(Number::NAN, 1.).is_empty());
        assert!(Interval::<Number>::from(Number::NAN..).is_empty());
        assert!(!Interval::<Number>::FULL.is_empty());
        assert!(!Interval::new(1., 1.).is_empty());
    }

    #[test]
    fn from_ranges() {
        assert_eq!(Interval::from(1. ..=2.), Interval::new(1., 2.));
        assert_eq!(Interval::from(..=3.), Interval { start: None, end: Some(3.) });
        assert_eq!(Interval::from(4. ..), Interval { start: Some(4.), end: None });
        assert_eq!(Interval::<Number>::from(..), Interval::FULL);
        assert!(Interval::from(..=3.).contains(&Number::NEG_INFINITY));
        assert_eq!(Interval::<Number>::from(..).to_string(), "[-inf, inf]");
    }

    #[test]
    fn overlap_clamps_to_bounds() {
        let i = Interval::new(1., 10.);
        assert_eq!(i.overlap(-5., 5.), Some((1., 5.)));
        assert_eq!(i.overlap(11., 20.), None);
        assert_eq!(Interval::FULL.overlap(-5., 5.), Some((-5., 5.)));
        assert_eq!(i.with_end(3.).overlap(4., 8.), None);
    }
}
