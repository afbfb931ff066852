use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::VariableStore;

/// The clause `l_1 ∨ ... ∨ l_n`; unit propagation only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoolOr {
    literals: Box<[Literal]>,
}

impl BoolOr {
    pub fn new(literals: impl IntoIterator<Item = Literal>) -> Self {
        BoolOr {
            literals: literals.into_iter().collect(),
        }
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.literals.iter().map(Literal::variable)
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let mut unassigned = None;

        for &literal in self.literals.iter() {
            match literal.value(store) {
                Some(true) => return Ok(()),
                Some(false) => {}
                None if unassigned.is_some() => return Ok(()),
                None => unassigned = Some(literal),
            }
        }

        match unassigned {
            Some(literal) => literal.set_true(store).map(|_| ()),
            None => Err(Inconsistency::Conflict),
        }
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        self.literals.iter().any(|literal| literal.evaluate(value))
    }
}
