use enumset::EnumSet;
use itertools::Itertools;

use crate::basic_types::Inconsistency;
use crate::basic_types::Narrowing;
use crate::basic_types::PropagationStatusCP;
use crate::engine::domain_events::DomainEvent;
use crate::engine::variables::DomainId;
use crate::engine::variables::Literal;
use crate::engine::VariableStore;
use crate::propagators::AllDifferent;
use crate::propagators::Automaton;
use crate::propagators::BoolOr;
use crate::propagators::Circuit;
use crate::propagators::Cumulative;
use crate::propagators::Element;
use crate::propagators::LinearConstraint;
use crate::propagators::Maximum;
use crate::propagators::NoOverlap;
use crate::propagators::NoOverlap2D;
use crate::propagators::Priority;
use crate::propagators::Product;
use crate::propagators::Reservoir;
use crate::propagators::Table;

/// The closed set of constraint kinds. Each variant holds the operand ids and parameters of one
/// constraint; constraints are immutable once the model is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Constraint {
    Linear(LinearConstraint),
    AllDifferent(AllDifferent),
    Element(Element),
    Table(Table),
    Automaton(Automaton),
    NoOverlap(NoOverlap),
    NoOverlap2D(NoOverlap2D),
    Cumulative(Cumulative),
    Circuit(Circuit),
    Reservoir(Reservoir),
    BoolOr(BoolOr),
    Maximum(Maximum),
    Product(Product),
}

impl Constraint {
    pub fn name(&self) -> &'static str {
        match self {
            Constraint::Linear(_) => "Linear",
            Constraint::AllDifferent(_) => "AllDifferent",
            Constraint::Element(_) => "Element",
            Constraint::Table(_) => "Table",
            Constraint::Automaton(_) => "Automaton",
            Constraint::NoOverlap(_) => "NoOverlap",
            Constraint::NoOverlap2D(_) => "NoOverlap2D",
            Constraint::Cumulative(_) => "Cumulative",
            Constraint::Circuit(_) => "Circuit",
            Constraint::Reservoir(_) => "Reservoir",
            Constraint::BoolOr(_) => "BoolOr",
            Constraint::Maximum(_) => "Maximum",
            Constraint::Product(_) => "Product",
        }
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        match self {
            Constraint::Linear(linear) => linear.propagate(store),
            Constraint::AllDifferent(all_different) => all_different.propagate(store),
            Constraint::Element(element) => element.propagate(store),
            Constraint::Table(table) => table.propagate(store),
            Constraint::Automaton(automaton) => automaton.propagate(store),
            Constraint::NoOverlap(no_overlap) => no_overlap.propagate(store),
            Constraint::NoOverlap2D(no_overlap_2d) => no_overlap_2d.propagate(store),
            Constraint::Cumulative(cumulative) => cumulative.propagate(store),
            Constraint::Circuit(circuit) => circuit.propagate(store),
            Constraint::Reservoir(reservoir) => reservoir.propagate(store),
            Constraint::BoolOr(bool_or) => bool_or.propagate(store),
            Constraint::Maximum(maximum) => maximum.propagate(store),
            Constraint::Product(product) => product.propagate(store),
        }
    }

    /// Evaluates the constraint under a complete assignment.
    pub fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        match self {
            Constraint::Linear(linear) => linear.is_satisfied(value),
            Constraint::AllDifferent(all_different) => all_different.is_satisfied(value),
            Constraint::Element(element) => element.is_satisfied(value),
            Constraint::Table(table) => table.is_satisfied(value),
            Constraint::Automaton(automaton) => automaton.is_satisfied(value),
            Constraint::NoOverlap(no_overlap) => no_overlap.is_satisfied(value),
            Constraint::NoOverlap2D(no_overlap_2d) => no_overlap_2d.is_satisfied(value),
            Constraint::Cumulative(cumulative) => cumulative.is_satisfied(value),
            Constraint::Circuit(circuit) => circuit.is_satisfied(value),
            Constraint::Reservoir(reservoir) => reservoir.is_satisfied(value),
            Constraint::BoolOr(bool_or) => bool_or.is_satisfied(value),
            Constraint::Maximum(maximum) => maximum.is_satisfied(value),
            Constraint::Product(product) => product.is_satisfied(value),
        }
    }

    /// The variables the constraint reads, possibly with repetitions.
    pub fn variables(&self) -> Vec<DomainId> {
        match self {
            Constraint::Linear(linear) => linear.variables().collect(),
            Constraint::AllDifferent(all_different) => all_different.variables().collect(),
            Constraint::Element(element) => element.variables().collect(),
            Constraint::Table(table) => table.variables().collect(),
            Constraint::Automaton(automaton) => automaton.variables().collect(),
            Constraint::NoOverlap(no_overlap) => no_overlap.variables(),
            Constraint::NoOverlap2D(no_overlap_2d) => no_overlap_2d.variables(),
            Constraint::Cumulative(cumulative) => cumulative.variables(),
            Constraint::Circuit(circuit) => circuit.variables().collect(),
            Constraint::Reservoir(reservoir) => reservoir.variables().collect(),
            Constraint::BoolOr(bool_or) => bool_or.variables().collect(),
            Constraint::Maximum(maximum) => maximum.variables().collect(),
            Constraint::Product(product) => product.variables().collect(),
        }
    }

    pub(crate) fn priority(&self) -> Priority {
        match self {
            Constraint::Linear(_)
            | Constraint::BoolOr(_)
            | Constraint::Maximum(_)
            | Constraint::Product(_) => Priority::High,
            Constraint::AllDifferent(_) | Constraint::Element(_) | Constraint::Table(_) => {
                Priority::Medium
            }
            Constraint::NoOverlap(_) | Constraint::Cumulative(_) | Constraint::Reservoir(_) => {
                Priority::Low
            }
            Constraint::Automaton(_) | Constraint::NoOverlap2D(_) | Constraint::Circuit(_) => {
                Priority::VeryLow
            }
        }
    }

    /// The domain events on its variables after which the constraint has to be propagated again.
    pub(crate) fn events(&self) -> EnumSet<DomainEvent> {
        match self {
            Constraint::BoolOr(_) | Constraint::Circuit(_) => EnumSet::only(DomainEvent::Assign),
            Constraint::Element(_) | Constraint::Table(_) | Constraint::Automaton(_) => {
                EnumSet::all()
            }
            _ => DomainEvent::bounds(),
        }
    }

    /// Whether the constraint is certainly violated under the current domains.
    pub(crate) fn detect_inconsistency(&self, store: &VariableStore) -> bool {
        match self {
            Constraint::Linear(linear) => linear.detect_inconsistency(store),
            _ => {
                let variables = self.variables();
                variables.iter().all(|&variable| store.is_fixed(variable))
                    && !self.is_satisfied(&|variable| store.lower_bound(variable))
            }
        }
    }
}

/// A constraint together with the literals enforcing it: the constraint only has to hold when
/// every enforcement literal is true.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstraintRecord {
    pub enforcement: Vec<Literal>,
    pub constraint: Constraint,
}

impl ConstraintRecord {
    pub fn new(constraint: Constraint) -> Self {
        ConstraintRecord {
            enforcement: Vec::new(),
            constraint,
        }
    }

    /// Propagates the record until it no longer narrows anything.
    ///
    /// If an enforcement literal is false nothing happens. If all are true the constraint itself
    /// is propagated. If exactly one is unfixed and the constraint is certainly violated, that
    /// literal is set to false.
    pub(crate) fn propagate(&self, store: &mut VariableStore) -> Result<Narrowing, Inconsistency> {
        let start = store.snapshot();

        let mut unfixed = None;
        let mut num_unfixed = 0;
        for &literal in self.enforcement.iter() {
            match literal.value(store) {
                Some(false) => return Ok(Narrowing::Unchanged),
                Some(true) => {}
                None => {
                    num_unfixed += 1;
                    unfixed = Some(literal);
                }
            }
        }

        match (num_unfixed, unfixed) {
            (0, _) => loop {
                let before = store.snapshot();
                self.constraint.propagate(store)?;
                if store.snapshot() == before {
                    break;
                }
            },
            (1, Some(literal)) => {
                if self.constraint.detect_inconsistency(store) {
                    let _ = literal.set_false(store)?;
                }
            }
            _ => {}
        }

        if store.snapshot() == start {
            Ok(Narrowing::Unchanged)
        } else {
            Ok(Narrowing::Narrowed)
        }
    }

    pub fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        !self.enforcement.iter().all(|literal| literal.evaluate(value))
            || self.constraint.is_satisfied(value)
    }

    /// The enforcement variables followed by the variables of the constraint, without repetitions.
    pub(crate) fn variables(&self) -> Vec<DomainId> {
        self.enforcement
            .iter()
            .map(Literal::variable)
            .chain(self.constraint.variables())
            .sorted_unstable()
            .dedup()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestStore;
    use crate::engine::Domain;

    fn at_least_five(variable: DomainId) -> Constraint {
        Constraint::Linear(LinearConstraint::new(
            [(1, variable)],
            Domain::new(5, i64::MAX),
        ))
    }

    #[test]
    fn violated_enforced_linear_falsifies_its_literal() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 3);
        let b = store.new_literal();

        let record = ConstraintRecord {
            enforcement: vec![b],
            constraint: at_least_five(x),
        };
        let narrowing = record.propagate(&mut store).expect("no conflict");

        assert_eq!(Narrowing::Narrowed, narrowing);
        assert!(b.is_false(&store));
    }

    #[test]
    fn false_enforcement_disables_the_constraint() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 3);
        let b = store.new_literal();
        let _ = b.set_false(&mut store).unwrap();

        let record = ConstraintRecord {
            enforcement: vec![b],
            constraint: at_least_five(x),
        };

        assert_eq!(Ok(Narrowing::Unchanged), record.propagate(&mut store));
        assert_eq!(3, store.upper_bound(x));
    }

    #[test]
    fn true_enforcement_propagates_the_constraint() {
        let mut store = TestStore::default();
        let x = store.new_variable(0, 10);
        let b = store.new_literal();
        let _ = b.set_true(&mut store).unwrap();

        let record = ConstraintRecord {
            enforcement: vec![b],
            constraint: at_least_five(x),
        };
        let _ = record.propagate(&mut store).expect("no conflict");

        assert_eq!(5, store.lower_bound(x));
    }

    #[test]
    fn fixed_violation_of_a_non_linear_constraint_is_detected() {
        let mut store = TestStore::default();
        let x = store.new_variable(2, 2);
        let y = store.new_variable(2, 2);
        let b = store.new_literal();

        let record = ConstraintRecord {
            enforcement: vec![b],
            constraint: Constraint::AllDifferent(AllDifferent::new([x.into(), y.into()])),
        };
        let _ = record.propagate(&mut store).expect("no conflict");

        assert!(b.is_false(&store));
    }

    #[test]
    fn unsatisfied_record_is_reported_under_true_enforcement_only() {
        let x = DomainId::new(0);
        let b = Literal::new(DomainId::new(1));
        let record = ConstraintRecord {
            enforcement: vec![b],
            constraint: at_least_five(x),
        };

        assert!(record.is_satisfied(&|variable| if variable == x { 3 } else { 0 }));
        assert!(!record.is_satisfied(&|variable| if variable == x { 3 } else { 1 }));
    }
}
