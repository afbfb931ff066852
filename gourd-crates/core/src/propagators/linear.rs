use crate::basic_types::Inconsistency;
use crate::basic_types::OrOverflow;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::Domain;
use crate::engine::VariableStore;
use crate::math::clamp_to_i64;
use crate::math::NumExt;

/// The constraint `Σ coefficient_i * x_i ∈ rhs`.
///
/// Propagation is bound consistent: every variable is narrowed to the range implied by the bounds
/// of the others. Once a single variable is left unfixed, its domain is filtered against the holes
/// of `rhs` as well, which makes e.g. `x - y ∈ {..-1, 1..}` a disequality.
///
/// The sums are computed with checked 64-bit arithmetic; an overflow is reported as
/// [`Inconsistency::Overflow`] rather than wrapping. A constraint whose coefficients could not be
/// merged without overflowing is marked as such and never propagates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinearConstraint {
    terms: Box<[(i64, DomainId)]>,
    rhs: Domain,
    overflowed: bool,
}

/// The range of the left-hand side given the current bounds.
#[derive(Clone, Copy, Debug)]
struct Activity {
    min: i64,
    max: i64,
    num_unfixed: usize,
}

impl LinearConstraint {
    /// Terms with a zero coefficient are dropped and repeated variables are merged.
    pub fn new(terms: impl IntoIterator<Item = (i64, DomainId)>, rhs: Domain) -> Self {
        let mut overflowed = false;
        let mut merged: Vec<(i64, DomainId)> = Vec::new();
        for (coefficient, variable) in terms {
            match merged.iter_mut().find(|(_, other)| *other == variable) {
                Some(term) => match term.0.checked_add(coefficient) {
                    Some(sum) => term.0 = sum,
                    None => overflowed = true,
                },
                None => merged.push((coefficient, variable)),
            }
        }
        merged.retain(|&(coefficient, _)| coefficient != 0);

        LinearConstraint {
            terms: merged.into(),
            rhs,
            overflowed,
        }
    }

    /// Marks the constraint as built from an expression whose arithmetic overflowed.
    pub(crate) fn mark_overflowed(mut self) -> Self {
        self.overflowed = true;
        self
    }

    /// Whether the terms of the constraint do not represent the expression it was built from,
    /// because a coefficient left the `i64` range.
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    pub fn terms(&self) -> &[(i64, DomainId)] {
        &self.terms
    }

    pub fn rhs(&self) -> &Domain {
        &self.rhs
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.terms.iter().map(|&(_, variable)| variable)
    }

    fn term_bounds(coefficient: i64, variable: DomainId, store: &VariableStore) -> Option<(i64, i64)> {
        let first = coefficient.checked_mul(store.lower_bound(variable))?;
        let second = coefficient.checked_mul(store.upper_bound(variable))?;
        Some((first.min(second), first.max(second)))
    }

    fn activity(&self, store: &VariableStore) -> Result<Activity, Inconsistency> {
        if self.overflowed {
            return Err(Inconsistency::Overflow);
        }

        let mut activity = Activity {
            min: 0,
            max: 0,
            num_unfixed: 0,
        };

        for &(coefficient, variable) in self.terms.iter() {
            let (min, max) = Self::term_bounds(coefficient, variable, store).or_overflow()?;
            activity.min = activity.min.checked_add(min).or_overflow()?;
            activity.max = activity.max.checked_add(max).or_overflow()?;
            if !store.is_fixed(variable) {
                activity.num_unfixed += 1;
            }
        }

        Ok(activity)
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let activity = self.activity(store)?;

        if activity.min > self.rhs.max() || activity.max < self.rhs.min() {
            return Err(Inconsistency::Conflict);
        }

        match activity.num_unfixed {
            0 if self.rhs.contains(activity.min) => return Ok(()),
            0 => return Err(Inconsistency::Conflict),
            1 => return self.filter_last_variable(store, activity),
            _ => {}
        }

        for &(coefficient, variable) in self.terms.iter() {
            let (term_min, term_max) =
                Self::term_bounds(coefficient, variable, store).or_overflow()?;

            // The bounds of the remaining terms, widened to i128 so that unbounded right-hand
            // sides cannot overflow here.
            let others_min = i128::from(activity.min) - i128::from(term_min);
            let others_max = i128::from(activity.max) - i128::from(term_max);
            let lower = i128::from(self.rhs.min()) - others_max;
            let upper = i128::from(self.rhs.max()) - others_min;

            let coefficient = i128::from(coefficient);
            let (lower_bound, upper_bound) = if coefficient > 0 {
                (
                    <i128 as NumExt>::div_ceil(lower, coefficient),
                    <i128 as NumExt>::div_floor(upper, coefficient),
                )
            } else {
                (
                    <i128 as NumExt>::div_ceil(upper, coefficient),
                    <i128 as NumExt>::div_floor(lower, coefficient),
                )
            };

            let _ = store.intersect_bounds(
                variable,
                clamp_to_i64(lower_bound),
                clamp_to_i64(upper_bound),
            )?;
        }

        Ok(())
    }

    /// With all but one variable fixed, the last variable must take a value in
    /// `(rhs - fixed) / coefficient`.
    fn filter_last_variable(&self, store: &mut VariableStore, activity: Activity) -> PropagationStatusCP {
        let Some(&(coefficient, variable)) = self
            .terms
            .iter()
            .find(|&&(_, variable)| !store.is_fixed(variable))
        else {
            return Ok(());
        };

        let (term_min, _) = Self::term_bounds(coefficient, variable, store).or_overflow()?;
        let fixed_sum = activity.min.checked_sub(term_min).or_overflow()?;
        let allowed = self
            .rhs
            .intersect(&Domain::new(activity.min, activity.max))
            .shift(fixed_sum.checked_neg().or_overflow()?)
            .or_overflow()?
            .scaled_preimage(coefficient);

        let _ = store.intersect_domain(variable, &allowed)?;
        Ok(())
    }

    /// Whether the constraint is violated for every completion of the current domains, judged
    /// by bounds alone.
    pub(crate) fn detect_inconsistency(&self, store: &VariableStore) -> bool {
        match self.activity(store) {
            Ok(activity) => {
                activity.min > self.rhs.max()
                    || activity.max < self.rhs.min()
                    || (activity.num_unfixed == 0 && !self.rhs.contains(activity.min))
            }
            Err(_) => false,
        }
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        if self.overflowed {
            return false;
        }

        let sum = self
            .terms
            .iter()
            .map(|&(coefficient, variable)| i128::from(coefficient) * i128::from(value(variable)))
            .sum::<i128>();

        i64::try_from(sum).is_ok_and(|sum| self.rhs.contains(sum))
    }
}
