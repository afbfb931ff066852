use std::fmt::Display;
use std::fmt::Formatter;

use itertools::Itertools;

use crate::basic_types::EmptyDomain;
use crate::gourd_assert_moderate;
use crate::math::NumExt;

/// The set of values a variable may still take, stored as a sorted list of inclusive intervals.
///
/// The intervals are kept normalised: sorted, disjoint and non-adjacent (there are never two
/// intervals `[a, b]` and `[b + 1, c]`). Two domains containing the same values are therefore
/// structurally equal, which the trail relies on to restore domains exactly.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Domain {
    intervals: Vec<(i64, i64)>,
}

impl Domain {
    /// The domain `[lower_bound, upper_bound]`; empty if `lower_bound > upper_bound`.
    pub fn new(lower_bound: i64, upper_bound: i64) -> Domain {
        if lower_bound > upper_bound {
            return Domain::empty();
        }

        Domain {
            intervals: vec![(lower_bound, upper_bound)],
        }
    }

    pub fn empty() -> Domain {
        Domain {
            intervals: Vec::new(),
        }
    }

    pub fn singleton(value: i64) -> Domain {
        Domain::new(value, value)
    }

    /// Creates a domain from an arbitrary collection of values; duplicates are ignored.
    pub fn from_values(values: impl IntoIterator<Item = i64>) -> Domain {
        Domain::from_intervals(values.into_iter().map(|value| (value, value)))
    }

    /// Creates a domain from an arbitrary collection of inclusive intervals, which may overlap,
    /// touch, be out of order, or be empty.
    pub fn from_intervals(intervals: impl IntoIterator<Item = (i64, i64)>) -> Domain {
        let mut intervals = intervals
            .into_iter()
            .filter(|&(lo, hi)| lo <= hi)
            .collect::<Vec<_>>();
        intervals.sort_unstable();

        let mut normalised: Vec<(i64, i64)> = Vec::with_capacity(intervals.len());
        for (lo, hi) in intervals {
            match normalised.last_mut() {
                Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
                _ => normalised.push((lo, hi)),
            }
        }

        Domain {
            intervals: normalised,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The smallest value in the domain, or `i64::MAX` for the empty domain.
    pub fn min(&self) -> i64 {
        self.intervals.first().map_or(i64::MAX, |&(lo, _)| lo)
    }

    /// The largest value in the domain, or `i64::MIN` for the empty domain.
    pub fn max(&self) -> i64 {
        self.intervals.last().map_or(i64::MIN, |&(_, hi)| hi)
    }

    /// The number of values in the domain, saturating at `u64::MAX`.
    pub fn size(&self) -> u64 {
        self.intervals.iter().fold(0_u64, |acc, &(lo, hi)| {
            acc.saturating_add(hi.abs_diff(lo).saturating_add(1))
        })
    }

    pub fn is_fixed(&self) -> bool {
        self.intervals.len() == 1 && self.intervals[0].0 == self.intervals[0].1
    }

    /// The value of the domain if it contains exactly one value.
    pub fn fixed_value(&self) -> Option<i64> {
        if self.is_fixed() {
            Some(self.min())
        } else {
            None
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        let index = self.intervals.partition_point(|&(_, hi)| hi < value);
        self.intervals
            .get(index)
            .is_some_and(|&(lo, _)| lo <= value)
    }

    /// The inclusive intervals making up the domain, in increasing order.
    pub fn intervals(&self) -> &[(i64, i64)] {
        &self.intervals
    }

    /// Iterates over every value in the domain in increasing order.
    pub fn iter(&self) -> impl Iterator<Item = i64> + '_ {
        self.intervals.iter().flat_map(|&(lo, hi)| lo..=hi)
    }

    /// The smallest value in the domain which is at least `value`.
    pub fn next_value(&self, value: i64) -> Option<i64> {
        let index = self.intervals.partition_point(|&(_, hi)| hi < value);
        self.intervals.get(index).map(|&(lo, _)| lo.max(value))
    }

    /// The largest value in the domain which is at most `value`.
    pub fn previous_value(&self, value: i64) -> Option<i64> {
        let index = self.intervals.partition_point(|&(lo, _)| lo <= value);
        index
            .checked_sub(1)
            .map(|index| self.intervals[index].1.min(value))
    }

    pub fn is_subset_of(&self, other: &Domain) -> bool {
        let mut others = other.intervals.iter().peekable();
        'outer: for &(lo, hi) in self.intervals.iter() {
            while let Some(&&(other_lo, other_hi)) = others.peek() {
                if other_hi < lo {
                    let _ = others.next();
                    continue;
                }
                if other_lo <= lo && hi <= other_hi {
                    continue 'outer;
                }
                return false;
            }
            return false;
        }

        true
    }

    /// The set of values contained in both domains.
    pub fn intersect(&self, other: &Domain) -> Domain {
        let mut result = Vec::new();
        let (mut i, mut j) = (0, 0);
        while i < self.intervals.len() && j < other.intervals.len() {
            let (a_lo, a_hi) = self.intervals[i];
            let (b_lo, b_hi) = other.intervals[j];

            let lo = a_lo.max(b_lo);
            let hi = a_hi.min(b_hi);
            if lo <= hi {
                result.push((lo, hi));
            }

            if a_hi < b_hi {
                i += 1;
            } else {
                j += 1;
            }
        }

        Domain { intervals: result }
    }

    /// The set of values in `[lower_bound, upper_bound]` which are not in this domain.
    pub fn complement(&self, lower_bound: i64, upper_bound: i64) -> Domain {
        let mut result = Vec::new();
        let mut next = lower_bound;
        for &(lo, hi) in self.intervals.iter() {
            if hi < next {
                continue;
            }
            if lo > upper_bound {
                break;
            }
            if lo > next {
                result.push((next, lo - 1));
            }
            match hi.checked_add(1) {
                Some(after) => next = after,
                None => return Domain { intervals: result },
            }
        }
        if next <= upper_bound {
            result.push((next, upper_bound));
        }

        Domain { intervals: result }
    }

    /// Narrows the domain to the values in `[lower_bound, upper_bound]`.
    ///
    /// Returns whether the domain changed. If the result would be empty the domain is left
    /// untouched and [`EmptyDomain`] is returned.
    pub fn intersect_with(&mut self, lower_bound: i64, upper_bound: i64) -> Result<bool, EmptyDomain> {
        if lower_bound <= self.min() && self.max() <= upper_bound {
            return if self.is_empty() { Err(EmptyDomain) } else { Ok(false) };
        }

        let narrowed = self.intersect(&Domain::new(lower_bound, upper_bound));
        self.replace_with(narrowed)
    }

    /// Narrows the domain to the values it shares with `other`; see [`Domain::intersect_with`].
    pub fn intersect_domain(&mut self, other: &Domain) -> Result<bool, EmptyDomain> {
        let narrowed = self.intersect(other);
        self.replace_with(narrowed)
    }

    /// Removes a single value from the domain, returning whether it was present.
    pub fn remove_value(&mut self, value: i64) -> Result<bool, EmptyDomain> {
        self.remove_interval(value, value)
    }

    /// Removes all values in `[lower_bound, upper_bound]` from the domain.
    pub fn remove_interval(&mut self, lower_bound: i64, upper_bound: i64) -> Result<bool, EmptyDomain> {
        if lower_bound > upper_bound {
            return Ok(false);
        }

        let mut result = Vec::with_capacity(self.intervals.len() + 1);
        for &(lo, hi) in self.intervals.iter() {
            if hi < lower_bound || lo > upper_bound {
                result.push((lo, hi));
                continue;
            }
            if lo < lower_bound {
                result.push((lo, lower_bound - 1));
            }
            if hi > upper_bound {
                result.push((upper_bound + 1, hi));
            }
        }

        self.replace_with(Domain { intervals: result })
    }

    /// The domain `{ value + offset | value ∈ self }`, or `None` on overflow.
    pub fn shift(&self, offset: i64) -> Option<Domain> {
        let intervals = self
            .intervals
            .iter()
            .map(|&(lo, hi)| Some((lo.checked_add(offset)?, hi.checked_add(offset)?)))
            .collect::<Option<Vec<_>>>()?;

        Some(Domain { intervals })
    }

    /// The domain `{ -value | value ∈ self }`, or `None` on overflow.
    pub fn negation(&self) -> Option<Domain> {
        let intervals = self
            .intervals
            .iter()
            .rev()
            .map(|&(lo, hi)| Some((hi.checked_neg()?, lo.checked_neg()?)))
            .collect::<Option<Vec<_>>>()?;

        Some(Domain { intervals })
    }

    /// The values `x` for which `coefficient * x` lies in this domain.
    pub fn scaled_preimage(&self, coefficient: i64) -> Domain {
        gourd_assert_moderate!(coefficient != 0);

        Domain::from_intervals(self.intervals.iter().map(|&(lo, hi)| {
            if coefficient > 0 {
                (
                    <i64 as NumExt>::div_ceil(lo, coefficient),
                    <i64 as NumExt>::div_floor(hi, coefficient),
                )
            } else {
                (
                    <i64 as NumExt>::div_ceil(hi, coefficient),
                    <i64 as NumExt>::div_floor(lo, coefficient),
                )
            }
        }))
    }

    /// Checks the representation invariant: intervals are non-empty, sorted, disjoint and
    /// non-adjacent.
    pub fn is_normalised(&self) -> bool {
        self.intervals.iter().all(|&(lo, hi)| lo <= hi)
            && self
                .intervals
                .iter()
                .tuple_windows()
                .all(|(&(_, previous_hi), &(next_lo, _))| previous_hi.saturating_add(1) < next_lo)
    }

    fn replace_with(&mut self, narrowed: Domain) -> Result<bool, EmptyDomain> {
        if narrowed.is_empty() {
            return Err(EmptyDomain);
        }

        gourd_assert_moderate!(narrowed.is_normalised());

        let changed = narrowed != *self;
        *self = narrowed;
        Ok(changed)
    }
}

impl Display for Domain {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let intervals = self.intervals.iter().format_with(", ", |&(lo, hi), write_interval| {
            if lo == hi {
                write_interval(&lo)
            } else {
                write_interval(&format_args!("{lo}..{hi}"))
            }
        });
        write!(f, "{{{intervals}}}")
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn overlapping_and_adjacent_intervals_are_merged() {
        let domain = Domain::from_intervals([(5, 7), (1, 2), (3, 3), (10, 12), (11, 15)]);

        assert_eq!(&[(1, 3), (5, 7), (10, 15)], domain.intervals());
        assert!(domain.is_normalised());
    }

    #[test]
    fn bounds_and_size_are_computed_over_all_intervals() {
        let domain = Domain::from_values([4, 1, 2, 9]);

        assert_eq!(1, domain.min());
        assert_eq!(9, domain.max());
        assert_eq!(4, domain.size());
        assert!(!domain.is_fixed());
        assert!(domain.contains(2));
        assert!(!domain.contains(3));
    }

    #[test]
    fn intersect_with_reports_change_only_when_values_are_removed() {
        let mut domain = Domain::new(0, 10);

        assert_eq!(Ok(false), domain.intersect_with(-5, 15));
        assert_eq!(Ok(true), domain.intersect_with(3, 7));
        assert_eq!(Domain::new(3, 7), domain);
    }

    #[test]
    fn intersect_with_disjoint_range_is_empty_and_leaves_domain_untouched() {
        let mut domain = Domain::new(0, 10);

        assert_eq!(Err(EmptyDomain), domain.intersect_with(11, 20));
        assert_eq!(Domain::new(0, 10), domain);
    }

    #[test]
    fn removing_an_interior_value_splits_the_interval() {
        let mut domain = Domain::new(0, 4);

        assert_eq!(Ok(true), domain.remove_value(2));
        assert_eq!(&[(0, 1), (3, 4)], domain.intervals());
        assert_eq!(Ok(false), domain.remove_value(2));
    }

    #[test]
    fn removing_the_last_value_is_an_empty_domain() {
        let mut domain = Domain::singleton(3);

        assert_eq!(Err(EmptyDomain), domain.remove_value(3));
        assert_eq!(Some(3), domain.fixed_value());
    }

    #[test]
    fn intersect_with_lands_on_next_value_after_a_hole() {
        let mut domain = Domain::from_values([1, 5, 9]);

        assert_eq!(Ok(true), domain.intersect_with(2, 9));
        assert_eq!(5, domain.min());
    }

    #[test]
    fn complement_within_range() {
        let domain = Domain::from_intervals([(2, 3), (6, 7)]);

        assert_eq!(
            Domain::from_intervals([(0, 1), (4, 5), (8, 9)]),
            domain.complement(0, 9)
        );
        assert_eq!(Domain::new(4, 5), domain.complement(3, 6));
    }

    #[test]
    fn scaled_preimage_rounds_inwards() {
        let domain = Domain::new(3, 10);

        assert_eq!(Domain::new(1, 3), domain.scaled_preimage(3));
        assert_eq!(Domain::new(-3, -1), domain.scaled_preimage(-3));
        assert!(Domain::singleton(5).scaled_preimage(2).is_empty());
    }

    #[test]
    fn next_and_previous_values_skip_holes() {
        let domain = Domain::from_values([1, 5, 9]);

        assert_eq!(Some(5), domain.next_value(2));
        assert_eq!(Some(5), domain.next_value(5));
        assert_eq!(None, domain.next_value(10));
        assert_eq!(Some(1), domain.previous_value(4));
        assert_eq!(None, domain.previous_value(0));
    }

    #[test]
    fn subset_checks_respect_holes() {
        let outer = Domain::from_intervals([(0, 3), (6, 9)]);

        assert!(Domain::from_values([1, 7]).is_subset_of(&outer));
        assert!(!Domain::new(2, 6).is_subset_of(&outer));
        assert!(Domain::empty().is_subset_of(&outer));
        assert!(!outer.is_subset_of(&Domain::empty()));
    }

    #[test]
    fn negation_reverses_intervals() {
        let domain = Domain::from_intervals([(-2, 1), (4, 5)]);

        assert_eq!(
            Domain::from_intervals([(-5, -4), (-1, 2)]),
            domain.negation().unwrap()
        );
        assert!(Domain::singleton(i64::MIN).negation().is_none());
    }

    #[test]
    fn display_lists_intervals_and_singletons() {
        let domain = Domain::from_intervals([(1, 3), (5, 5)]);

        assert_eq!("{1..3, 5}", domain.to_string());
    }

    #[derive(Clone, Debug)]
    enum Operation {
        IntersectWith(i64, i64),
        RemoveValue(i64),
        RemoveInterval(i64, i64),
        IntersectDomain(Vec<(i64, i64)>),
    }

    fn operation() -> impl Strategy<Value = Operation> {
        prop_oneof![
            (-20_i64..20, -20_i64..20).prop_map(|(a, b)| Operation::IntersectWith(a, b)),
            (-20_i64..20).prop_map(Operation::RemoveValue),
            (-20_i64..20, -20_i64..20).prop_map(|(a, b)| Operation::RemoveInterval(a, b)),
            prop::collection::vec((-20_i64..20, -20_i64..20), 0..4)
                .prop_map(Operation::IntersectDomain),
        ]
    }

    proptest! {
        #[test]
        fn domains_stay_normalised_under_narrowing(
            initial in prop::collection::vec((-20_i64..20, -20_i64..20), 1..5),
            operations in prop::collection::vec(operation(), 0..12),
        ) {
            let mut domain = Domain::from_intervals(initial);
            prop_assume!(!domain.is_empty());

            for operation in operations {
                let before = domain.clone();
                let result = match operation {
                    Operation::IntersectWith(lo, hi) => domain.intersect_with(lo, hi),
                    Operation::RemoveValue(value) => domain.remove_value(value),
                    Operation::RemoveInterval(lo, hi) => domain.remove_interval(lo, hi),
                    Operation::IntersectDomain(intervals) => {
                        domain.intersect_domain(&Domain::from_intervals(intervals))
                    }
                };

                prop_assert!(domain.is_normalised());
                prop_assert!(domain.is_subset_of(&before));
                match result {
                    Ok(changed) => prop_assert_eq!(changed, domain != before),
                    Err(EmptyDomain) => prop_assert_eq!(&domain, &before),
                }
            }
        }

        #[test]
        fn membership_matches_a_naive_value_set(
            intervals in prop::collection::vec((-15_i64..15, -15_i64..15), 0..5),
        ) {
            let domain = Domain::from_intervals(intervals.clone());
            for value in -16..16 {
                let expected = intervals.iter().any(|&(lo, hi)| lo <= value && value <= hi);
                prop_assert_eq!(expected, domain.contains(value));
            }
            prop_assert_eq!(domain.iter().count() as u64, domain.size());
        }
    }
}
