use super::DomainId;
use super::IntegerVariable;
use super::Literal;
use super::TransformableVariable;
use crate::basic_types::EmptyDomain;
use crate::basic_types::Inconsistency;
use crate::engine::VariableStore;
use crate::math::clamp_to_i64;
use crate::math::NumExt;

/// Models the expression `y = scale * x + offset`, by expressing the domain of `y` as a
/// transformation of the domain of `x`. Without an inner variable the view is the constant
/// `offset`.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub struct AffineView {
    variable: Option<DomainId>,
    scale: i64,
    offset: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Rounding {
    Up,
    Down,
}

impl AffineView {
    /// The view `scale * variable + offset`; a zero scale yields the constant `offset`.
    pub fn new(variable: DomainId, scale: i64, offset: i64) -> Self {
        if scale == 0 {
            return AffineView::constant(offset);
        }

        AffineView {
            variable: Some(variable),
            scale,
            offset,
        }
    }

    pub fn constant(value: i64) -> Self {
        AffineView {
            variable: None,
            scale: 1,
            offset: value,
        }
    }

    pub fn variable(&self) -> Option<DomainId> {
        self.variable
    }

    pub fn scale(&self) -> i64 {
        self.scale
    }

    pub fn constant_offset(&self) -> i64 {
        self.offset
    }

    /// The value of the view when its inner variable takes `value`, saturating at the `i64`
    /// range.
    pub fn map(&self, value: i64) -> i64 {
        clamp_to_i64(i128::from(self.scale) * i128::from(value) + i128::from(self.offset))
    }

    /// The value of the view under a complete assignment.
    pub fn evaluate(&self, value: &dyn Fn(DomainId) -> i64) -> i64 {
        match self.variable {
            None => self.offset,
            Some(variable) => self.map(value(variable)),
        }
    }

    /// Apply the inverse transformation of this view on a value, to go from the value in the
    /// domain of `self` to a value in the domain of the inner variable.
    fn invert(&self, value: i64, rounding: Rounding) -> i64 {
        let inverted_translation = i128::from(value) - i128::from(self.offset);
        let scale = i128::from(self.scale);

        clamp_to_i64(match rounding {
            Rounding::Up => <i128 as NumExt>::div_ceil(inverted_translation, scale),
            Rounding::Down => <i128 as NumExt>::div_floor(inverted_translation, scale),
        })
    }

    /// The exact preimage of `value`, if the view can take it.
    fn preimage(&self, value: i64) -> Option<i64> {
        let inverted_translation = i128::from(value) - i128::from(self.offset);
        let scale = i128::from(self.scale);

        if inverted_translation % scale == 0 {
            i64::try_from(inverted_translation / scale).ok()
        } else {
            None
        }
    }

    /// The range the view spans given the declared domain of its variable; `None` if that range
    /// does not fit in an `i64`.
    pub(crate) fn checked_range(&self, lower_bound: i64, upper_bound: i64) -> Option<(i64, i64)> {
        let first = i128::from(self.scale)
            .checked_mul(i128::from(lower_bound))?
            .checked_add(i128::from(self.offset))?;
        let second = i128::from(self.scale)
            .checked_mul(i128::from(upper_bound))?
            .checked_add(i128::from(self.offset))?;

        Some((
            i64::try_from(first.min(second)).ok()?,
            i64::try_from(first.max(second)).ok()?,
        ))
    }
}

impl IntegerVariable for AffineView {
    fn lower_bound(&self, store: &VariableStore) -> i64 {
        match self.variable {
            None => self.offset,
            Some(variable) if self.scale < 0 => self.map(store.upper_bound(variable)),
            Some(variable) => self.map(store.lower_bound(variable)),
        }
    }

    fn upper_bound(&self, store: &VariableStore) -> i64 {
        match self.variable {
            None => self.offset,
            Some(variable) if self.scale < 0 => self.map(store.lower_bound(variable)),
            Some(variable) => self.map(store.upper_bound(variable)),
        }
    }

    fn contains(&self, store: &VariableStore, value: i64) -> bool {
        match self.variable {
            None => value == self.offset,
            Some(variable) => self
                .preimage(value)
                .is_some_and(|inverted| store.contains(variable, inverted)),
        }
    }

    fn fixed_value(&self, store: &VariableStore) -> Option<i64> {
        match self.variable {
            None => Some(self.offset),
            Some(variable) => store.fixed_value(variable).map(|value| self.map(value)),
        }
    }

    fn iterate_domain(&self, store: &VariableStore) -> impl Iterator<Item = i64> {
        let view = *self;
        let values: Box<dyn Iterator<Item = i64> + '_> = match view.variable {
            None => Box::new(std::iter::once(view.offset)),
            Some(variable) => Box::new(store.domain(variable).iter().map(move |value| view.map(value))),
        };
        values
    }

    fn set_lower_bound(
        &self,
        store: &mut VariableStore,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        match self.variable {
            None if self.offset >= bound => Ok(false),
            None => Err(EmptyDomain.into()),
            Some(variable) if self.scale < 0 => {
                store.tighten_upper_bound(variable, self.invert(bound, Rounding::Down))
            }
            Some(variable) => store.tighten_lower_bound(variable, self.invert(bound, Rounding::Up)),
        }
    }

    fn set_upper_bound(
        &self,
        store: &mut VariableStore,
        bound: i64,
    ) -> Result<bool, Inconsistency> {
        match self.variable {
            None if self.offset <= bound => Ok(false),
            None => Err(EmptyDomain.into()),
            Some(variable) if self.scale < 0 => {
                store.tighten_lower_bound(variable, self.invert(bound, Rounding::Up))
            }
            Some(variable) => {
                store.tighten_upper_bound(variable, self.invert(bound, Rounding::Down))
            }
        }
    }

    fn remove_value(&self, store: &mut VariableStore, value: i64) -> Result<bool, Inconsistency> {
        match self.variable {
            None if self.offset != value => Ok(false),
            None => Err(EmptyDomain.into()),
            Some(variable) => match self.preimage(value) {
                Some(inverted) => store.remove_value(variable, inverted),
                None => Ok(false),
            },
        }
    }

    fn domain_id(&self) -> Option<DomainId> {
        self.variable
    }
}

impl TransformableVariable for AffineView {
    fn scaled(&self, scale: i64) -> AffineView {
        match self.variable {
            None => AffineView::constant(self.offset.saturating_mul(scale)),
            Some(variable) => AffineView::new(
                variable,
                self.scale.saturating_mul(scale),
                self.offset.saturating_mul(scale),
            ),
        }
    }

    fn offset(&self, offset: i64) -> AffineView {
        AffineView {
            offset: self.offset.saturating_add(offset),
            ..*self
        }
    }
}

impl TransformableVariable for DomainId {
    fn scaled(&self, scale: i64) -> AffineView {
        AffineView::new(*self, scale, 0)
    }

    fn offset(&self, offset: i64) -> AffineView {
        AffineView::new(*self, 1, offset)
    }
}

impl From<DomainId> for AffineView {
    fn from(variable: DomainId) -> Self {
        AffineView::new(variable, 1, 0)
    }
}

impl From<i64> for AffineView {
    fn from(value: i64) -> Self {
        AffineView::constant(value)
    }
}

/// A literal as the 0-1 expression which is `1` exactly when the literal is true.
impl From<Literal> for AffineView {
    fn from(literal: Literal) -> Self {
        if literal.is_positive() {
            AffineView::new(literal.variable(), 1, 0)
        } else {
            AffineView::new(literal.variable(), -1, 1)
        }
    }
}
