use super::ConstraintRecord;
use crate::engine::variables::Literal;

/// Returned by every `add_*` method of [`Model`](super::Model); allows making the constraint
/// conditional.
#[derive(Debug)]
pub struct ConstraintHandle<'model> {
    record: &'model mut ConstraintRecord,
}

impl<'model> ConstraintHandle<'model> {
    pub(crate) fn new(record: &'model mut ConstraintRecord) -> Self {
        ConstraintHandle { record }
    }

    /// Only enforces the constraint when all of `literals` are true. Calling this repeatedly adds
    /// to the conjunction.
    pub fn only_enforce_if(self, literals: impl IntoIterator<Item = Literal>) -> Self {
        self.record.enforcement.extend(literals);
        self
    }

    /// The literals the constraint is conditional on.
    pub fn enforcement(&self) -> &[Literal] {
        &self.record.enforcement
    }
}
