use std::ops::Add;
use std::ops::Mul;
use std::ops::Neg;
use std::ops::Sub;

use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;

/// An integer expression `Σ coefficient_i * x_i + offset`, as used by linear constraints and
/// objectives.
///
/// Expressions are built with the usual operators. Terms over the same variable are merged and
/// terms whose coefficient becomes zero are dropped. The arithmetic is checked: once a coefficient
/// or the offset leaves the `i64` range the expression is marked as overflowed, and
/// [`crate::model::Model::validate`] rejects any constraint or objective built from it.
///
/// ```
/// # use gourd_core::model::LinearExpr;
/// # use gourd_core::model::Model;
/// let mut model = Model::default();
/// let x = model.new_int_var(0, 10, "x");
/// let y = model.new_int_var(0, 10, "y");
///
/// let expression = LinearExpr::from(x) * 3 - y + 4;
/// assert_eq!(&[(3, x), (-1, y)], expression.terms());
/// assert_eq!(4, expression.offset());
///
/// let cancelled = expression - LinearExpr::from(x) * 3;
/// assert_eq!(&[(-1, y)], cancelled.terms());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinearExpr {
    terms: Vec<(i64, DomainId)>,
    offset: i64,
    overflowed: bool,
}

impl LinearExpr {
    pub fn new(terms: impl IntoIterator<Item = (i64, DomainId)>, offset: i64) -> Self {
        let mut expression = LinearExpr::constant(offset);
        for (coefficient, variable) in terms {
            expression.add_term(coefficient, variable);
        }
        expression
    }

    pub fn constant(offset: i64) -> Self {
        LinearExpr {
            terms: Vec::new(),
            offset,
            overflowed: false,
        }
    }

    /// The sum of the given variables.
    pub fn sum(variables: impl IntoIterator<Item = DomainId>) -> Self {
        LinearExpr::new(variables.into_iter().map(|variable| (1, variable)), 0)
    }

    /// The sum of the given variables weighted by the given coefficients.
    pub fn weighted_sum(
        variables: impl IntoIterator<Item = DomainId>,
        coefficients: impl IntoIterator<Item = i64>,
    ) -> Self {
        LinearExpr::new(coefficients.into_iter().zip(variables), 0)
    }

    pub fn terms(&self) -> &[(i64, DomainId)] {
        &self.terms
    }

    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Whether some coefficient or the offset left the `i64` range while building the
    /// expression. The terms and offset of such an expression are meaningless.
    pub fn has_overflowed(&self) -> bool {
        self.overflowed
    }

    /// Evaluates the expression in 128-bit arithmetic, which cannot overflow for the expression
    /// sizes a model can hold.
    pub fn evaluate(&self, value: &dyn Fn(DomainId) -> i64) -> i128 {
        self.terms
            .iter()
            .map(|&(coefficient, variable)| i128::from(coefficient) * i128::from(value(variable)))
            .sum::<i128>()
            + i128::from(self.offset)
    }

    fn add_term(&mut self, coefficient: i64, variable: DomainId) {
        let Some(index) = self.terms.iter().position(|&(_, other)| other == variable) else {
            if coefficient != 0 {
                self.terms.push((coefficient, variable));
            }
            return;
        };

        match self.terms[index].0.checked_add(coefficient) {
            Some(0) => {
                let _ = self.terms.remove(index);
            }
            Some(sum) => self.terms[index].0 = sum,
            None => self.overflowed = true,
        }
    }
}

impl From<DomainId> for LinearExpr {
    fn from(variable: DomainId) -> Self {
        LinearExpr::new([(1, variable)], 0)
    }
}

impl From<Literal> for LinearExpr {
    /// A negative literal is the expression `1 - x`.
    fn from(literal: Literal) -> Self {
        if literal.is_positive() {
            LinearExpr::from(literal.variable())
        } else {
            LinearExpr::new([(-1, literal.variable())], 1)
        }
    }
}

impl From<AffineView> for LinearExpr {
    fn from(view: AffineView) -> Self {
        match view.variable() {
            Some(variable) => {
                LinearExpr::new([(view.scale(), variable)], view.constant_offset())
            }
            None => LinearExpr::constant(view.constant_offset()),
        }
    }
}

impl From<i64> for LinearExpr {
    fn from(value: i64) -> Self {
        LinearExpr::constant(value)
    }
}

impl<Rhs: Into<LinearExpr>> Add<Rhs> for LinearExpr {
    type Output = LinearExpr;

    fn add(mut self, rhs: Rhs) -> Self::Output {
        let rhs = rhs.into();
        for (coefficient, variable) in rhs.terms {
            self.add_term(coefficient, variable);
        }
        match self.offset.checked_add(rhs.offset) {
            Some(offset) => self.offset = offset,
            None => self.overflowed = true,
        }
        self.overflowed |= rhs.overflowed;
        self
    }
}

impl Neg for LinearExpr {
    type Output = LinearExpr;

    fn neg(self) -> Self::Output {
        self * -1
    }
}

impl<Rhs: Into<LinearExpr>> Sub<Rhs> for LinearExpr {
    type Output = LinearExpr;

    fn sub(self, rhs: Rhs) -> Self::Output {
        let rhs: LinearExpr = rhs.into();
        self + -rhs
    }
}

impl Mul<i64> for LinearExpr {
    type Output = LinearExpr;

    fn mul(mut self, factor: i64) -> Self::Output {
        for (coefficient, _) in self.terms.iter_mut() {
            match coefficient.checked_mul(factor) {
                Some(product) => *coefficient = product,
                None => self.overflowed = true,
            }
        }
        self.terms.retain(|&(coefficient, _)| coefficient != 0);

        match self.offset.checked_mul(factor) {
            Some(offset) => self.offset = offset,
            None => self.overflowed = true,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_literal_is_one_minus_the_variable() {
        let x = DomainId::new(0);

        let expression = LinearExpr::from(!Literal::new(x));

        assert_eq!(1, expression.evaluate(&|_| 0));
        assert_eq!(0, expression.evaluate(&|_| 1));
    }

    #[test]
    fn operators_combine_terms_and_offsets() {
        let x = DomainId::new(0);
        let y = DomainId::new(1);

        let expression = (LinearExpr::from(x) + y) * 2 - 5;

        assert_eq!(&[(2, x), (2, y)], expression.terms());
        assert_eq!(-5, expression.offset());
        assert_eq!(9, expression.evaluate(&|variable| i64::from(variable.id()) + 3));
    }

    #[test]
    fn like_terms_are_merged_and_cancelled() {
        let x = DomainId::new(0);
        let y = DomainId::new(1);

        let expression = LinearExpr::from(x) + y + LinearExpr::from(x) * 2 - y;

        assert_eq!(&[(3, x)], expression.terms());
        assert!(LinearExpr::new([(2, x), (-2, x)], 0).terms().is_empty());
        assert!((LinearExpr::from(y) * 0).terms().is_empty());
    }

    #[test]
    fn overflowing_offset_is_recorded() {
        let x = DomainId::new(0);

        let expression = LinearExpr::from(x) + i64::MAX + 5;

        assert!(expression.has_overflowed());
        assert!(!(LinearExpr::from(x) + i64::MAX).has_overflowed());
    }

    #[test]
    fn overflowing_coefficients_are_recorded() {
        let x = DomainId::new(0);

        assert!((LinearExpr::from(x) * i64::MAX + x).has_overflowed());
        assert!((-LinearExpr::constant(i64::MIN)).has_overflowed());
        assert!((LinearExpr::from(x) + (LinearExpr::from(x) * i64::MAX + x)).has_overflowed());
    }
}
