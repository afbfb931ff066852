use super::no_overlap::can_precede;
use super::no_overlap::enforce_precedence;
use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntervalVar;
use crate::engine::VariableStore;

/// A rectangle spanned by an interval on each axis; it is present when both intervals are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: IntervalVar,
    pub y: IntervalVar,
}

impl Rectangle {
    fn is_present(&self, store: &VariableStore) -> bool {
        self.x.is_present(store) && self.y.is_present(store)
    }

    fn is_absent(&self, store: &VariableStore) -> bool {
        self.x.is_absent(store) || self.y.is_absent(store)
    }

    /// Makes the rectangle absent when exactly one of its presence literals is still open.
    fn try_set_absent(&self, store: &mut VariableStore) -> PropagationStatusCP {
        match (self.x.is_present(store), self.y.is_present(store)) {
            (true, true) => Err(Inconsistency::Conflict),
            (true, false) => self.y.set_absent(store).map(|_| ()),
            (false, true) => self.x.set_absent(store).map(|_| ()),
            (false, false) => Ok(()),
        }
    }
}

/// The constraint that no two present rectangles overlap: for every pair one lies entirely to
/// the left of, to the right of, below, or above the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NoOverlap2D {
    rectangles: Box<[Rectangle]>,
}

impl NoOverlap2D {
    pub fn new(rectangles: impl IntoIterator<Item = Rectangle>) -> Self {
        NoOverlap2D {
            rectangles: rectangles.into_iter().collect(),
        }
    }

    pub(crate) fn variables(&self) -> Vec<DomainId> {
        let mut variables = Vec::new();
        for rectangle in self.rectangles.iter() {
            rectangle.x.collect_variables(&mut variables);
            rectangle.y.collect_variables(&mut variables);
        }
        variables
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        for (i, first) in self.rectangles.iter().enumerate() {
            for second in self.rectangles[i + 1..].iter() {
                if first.is_absent(store) || second.is_absent(store) {
                    continue;
                }

                let placements = [
                    can_precede(store, &first.x, &second.x),
                    can_precede(store, &second.x, &first.x),
                    can_precede(store, &first.y, &second.y),
                    can_precede(store, &second.y, &first.y),
                ];
                let num_possible = placements.iter().filter(|&&possible| possible).count();

                if num_possible == 0 {
                    match (first.is_present(store), second.is_present(store)) {
                        (true, true) => return Err(Inconsistency::Conflict),
                        (true, false) => second.try_set_absent(store)?,
                        (false, true) => first.try_set_absent(store)?,
                        (false, false) => {}
                    }
                    continue;
                }

                if num_possible > 1 || !first.is_present(store) || !second.is_present(store) {
                    continue;
                }

                match placements {
                    [true, _, _, _] => enforce_precedence(store, &first.x, &second.x)?,
                    [_, true, _, _] => enforce_precedence(store, &second.x, &first.x)?,
                    [_, _, true, _] => enforce_precedence(store, &first.y, &second.y)?,
                    _ => enforce_precedence(store, &second.y, &first.y)?,
                }
            }
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let present = self
            .rectangles
            .iter()
            .filter(|r| r.x.evaluate_presence(value) && r.y.evaluate_presence(value))
            .map(|r| {
                (
                    r.x.start.evaluate(value),
                    r.x.end.evaluate(value),
                    r.y.start.evaluate(value),
                    r.y.end.evaluate(value),
                )
            })
            .collect::<Vec<_>>();

        present.iter().enumerate().all(|(i, a)| {
            present[i + 1..]
                .iter()
                .all(|b| a.1 <= b.0 || b.1 <= a.0 || a.3 <= b.2 || b.3 <= a.2)
        })
    }
}
