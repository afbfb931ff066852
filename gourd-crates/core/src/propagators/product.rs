use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::VariableStore;
use crate::math::clamp_to_i64;
use crate::math::NumExt;

/// The constraint `target == left * right`, propagated on bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Product {
    target: AffineView,
    left: AffineView,
    right: AffineView,
}

/// The bounds `[min, max]` of a view widened to `i128`.
fn bounds(view: &AffineView, store: &VariableStore) -> (i128, i128) {
    (
        i128::from(view.lower_bound(store)),
        i128::from(view.upper_bound(store)),
    )
}

impl Product {
    pub fn new(target: AffineView, left: AffineView, right: AffineView) -> Self {
        Product {
            target,
            left,
            right,
        }
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        [&self.target, &self.left, &self.right]
            .into_iter()
            .filter_map(IntegerVariable::domain_id)
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let (left_min, left_max) = bounds(&self.left, store);
        let (right_min, right_max) = bounds(&self.right, store);

        // Values are at most 2^63 in magnitude, so the corner products fit in an i128.
        let corners = [
            left_min * right_min,
            left_min * right_max,
            left_max * right_min,
            left_max * right_max,
        ];
        let product_min = corners.iter().copied().min().unwrap_or(0);
        let product_max = corners.iter().copied().max().unwrap_or(0);
        let _ = self.target.set_lower_bound(store, clamp_to_i64(product_min))?;
        let _ = self.target.set_upper_bound(store, clamp_to_i64(product_max))?;

        self.propagate_factor(store, &self.left, &self.right)?;
        self.propagate_factor(store, &self.right, &self.left)
    }

    /// Narrows `factor` to `target / other` when `other` cannot be zero.
    fn propagate_factor(
        &self,
        store: &mut VariableStore,
        factor: &AffineView,
        other: &AffineView,
    ) -> PropagationStatusCP {
        let (other_min, other_max) = bounds(other, store);
        if other_min <= 0 && 0 <= other_max {
            return Ok(());
        }

        let (target_min, target_max) = bounds(&self.target, store);
        let quotients = [
            (target_min, other_min),
            (target_min, other_max),
            (target_max, other_min),
            (target_max, other_max),
        ];

        // Over a box not crossing zero the quotient is extremal at the corners; rounding is
        // monotone, so rounding each corner inwards bounds the integral quotients.
        let lower_bound = quotients
            .iter()
            .map(|&(numerator, denominator)| <i128 as NumExt>::div_ceil(numerator, denominator))
            .min()
            .unwrap_or(i128::MIN);
        let upper_bound = quotients
            .iter()
            .map(|&(numerator, denominator)| <i128 as NumExt>::div_floor(numerator, denominator))
            .max()
            .unwrap_or(i128::MAX);

        let _ = factor.set_lower_bound(store, clamp_to_i64(lower_bound))?;
        let _ = factor.set_upper_bound(store, clamp_to_i64(upper_bound))?;
        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        i128::from(self.left.evaluate(value)) * i128::from(self.right.evaluate(value))
            == i128::from(self.target.evaluate(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestStore;
    use crate::model::Constraint;

    #[test]
    fn target_is_bounded_by_corner_products() {
        let mut store = TestStore::default();
        let a = store.new_variable(-2, 3);
        let b = store.new_variable(1, 4);
        let target = store.new_variable(-100, 100);

        store
            .propagate(Constraint::Product(Product::new(target.into(), a.into(), b.into())))
            .expect("non-empty domain");

        assert_eq!(-8, store.lower_bound(target));
        assert_eq!(12, store.upper_bound(target));
    }

    #[test]
    fn factor_is_bounded_by_division() {
        let mut store = TestStore::default();
        let a = store.new_variable(0, 100);
        let b = store.new_variable(3, 4);
        let target = store.new_variable(10, 12);

        store
            .propagate(Constraint::Product(Product::new(target.into(), a.into(), b.into())))
            .expect("non-empty domain");

        assert_eq!(3, store.lower_bound(a));
        assert_eq!(4, store.upper_bound(a));
    }

    #[test]
    fn fixed_factors_fix_the_target() {
        let mut store = TestStore::default();
        let a = store.new_variable(6, 6);
        let b = store.new_variable(-7, -7);
        let target = store.new_variable(-100, 100);

        store
            .propagate(Constraint::Product(Product::new(target.into(), a.into(), b.into())))
            .expect("non-empty domain");

        assert_eq!(Some(-42), store.fixed_value(target));
    }
}
