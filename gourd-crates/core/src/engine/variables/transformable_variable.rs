use super::AffineView;

/// Trait for transforming a variable into an [`AffineView`] of itself.
pub trait TransformableVariable {
    /// Get a variable which domain is scaled compared to the domain of self.
    ///
    /// The scaled domain will have holes in it. E.g. if we have `dom(x) = {1, 2}`, then
    /// `dom(x.scaled(2)) = {2, 4}` and *not* `dom(x.scaled(2)) = {1, 2, 3, 4}`.
    fn scaled(&self, scale: i64) -> AffineView;

    /// Get a variable which domain has a constant offset to the domain of self.
    fn offset(&self, offset: i64) -> AffineView;
}
