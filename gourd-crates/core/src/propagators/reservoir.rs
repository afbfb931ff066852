use crate::basic_types::Inconsistency;
use crate::basic_types::PropagationStatusCP;
use crate::engine::variables::AffineView;
use crate::engine::variables::DomainId;
use crate::engine::variables::IntegerVariable;
use crate::engine::variables::Literal;
use crate::engine::VariableStore;

/// An event of a [`Reservoir`]: at `time`, if active, the level changes by `level_change`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ReservoirEvent {
    pub time: AffineView,
    pub level_change: i64,
    pub active: Option<Literal>,
}

impl ReservoirEvent {
    fn is_active(&self, store: &VariableStore) -> bool {
        self.active.map_or(true, |literal| literal.is_true(store))
    }

    fn is_inactive(&self, store: &VariableStore) -> bool {
        self.active.is_some_and(|literal| literal.is_false(store))
    }
}

/// The constraint that the level of a reservoir, starting at zero and changed by every active
/// event at its time, stays within `[min_level, max_level]` at all times. The range has to
/// contain zero.
///
/// The level is only checked at the times of active events. For each such time the events are
/// split into those surely at or before it, those possibly before it, and those surely after it,
/// which bounds the level at that time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reservoir {
    events: Box<[ReservoirEvent]>,
    min_level: i64,
    max_level: i64,
}

/// The bounds of the level right after a checkpoint event.
#[derive(Clone, Copy, Debug)]
struct LevelBounds {
    /// The sum of the changes that certainly happened.
    sure: i128,
    lower: i128,
    upper: i128,
}

impl Reservoir {
    pub fn new(
        events: impl IntoIterator<Item = ReservoirEvent>,
        min_level: i64,
        max_level: i64,
    ) -> Self {
        Reservoir {
            events: events.into_iter().collect(),
            min_level,
            max_level,
        }
    }

    pub fn min_level(&self) -> i64 {
        self.min_level
    }

    pub fn max_level(&self) -> i64 {
        self.max_level
    }

    pub(crate) fn variables(&self) -> impl Iterator<Item = DomainId> + '_ {
        self.events.iter().flat_map(|event| {
            event
                .time
                .domain_id()
                .into_iter()
                .chain(event.active.map(|literal| literal.variable()))
        })
    }

    /// Whether `event` certainly happens no later than `checkpoint`.
    fn surely_before(store: &VariableStore, event: &ReservoirEvent, checkpoint: &ReservoirEvent) -> bool {
        event.time.upper_bound(store) <= checkpoint.time.lower_bound(store)
    }

    /// Whether `event` may happen no later than `checkpoint`.
    fn possibly_before(store: &VariableStore, event: &ReservoirEvent, checkpoint: &ReservoirEvent) -> bool {
        event.time.lower_bound(store) <= checkpoint.time.upper_bound(store)
    }

    fn level_bounds(&self, store: &VariableStore, checkpoint: usize) -> LevelBounds {
        let at = &self.events[checkpoint];
        let mut bounds = LevelBounds {
            sure: 0,
            lower: 0,
            upper: 0,
        };

        for (index, event) in self.events.iter().enumerate() {
            if event.is_inactive(store) {
                continue;
            }
            let change = i128::from(event.level_change);

            let is_sure = event.is_active(store)
                && (index == checkpoint || Self::surely_before(store, event, at));
            if is_sure {
                bounds.sure += change;
                bounds.lower += change;
                bounds.upper += change;
            } else if Self::possibly_before(store, event, at) {
                bounds.lower += change.min(0);
                bounds.upper += change.max(0);
            }
        }

        bounds
    }

    pub(crate) fn propagate(&self, store: &mut VariableStore) -> PropagationStatusCP {
        let min_level = i128::from(self.min_level);
        let max_level = i128::from(self.max_level);
        if min_level > 0 || max_level < 0 {
            return Err(Inconsistency::Conflict);
        }

        for (checkpoint, at) in self.events.iter().enumerate() {
            if !at.is_active(store) {
                continue;
            }

            let bounds = self.level_bounds(store, checkpoint);
            if bounds.lower > max_level || bounds.upper < min_level {
                return Err(Inconsistency::Conflict);
            }

            for (index, event) in self.events.iter().enumerate() {
                if index == checkpoint || event.is_inactive(store) || event.level_change == 0 {
                    continue;
                }
                if event.is_active(store) && Self::surely_before(store, event, at) {
                    continue;
                }
                if !Self::possibly_before(store, event, at) {
                    continue;
                }

                // The level at the checkpoint with and without this event, each taking the most
                // favourable outcome for the other possible events.
                let change = i128::from(event.level_change);
                let without = (bounds.lower - change.min(0), bounds.upper - change.max(0));
                let with = (without.0 + change, without.1 + change);
                let infeasible = |(lower, upper): (i128, i128)| lower > max_level || upper < min_level;

                if infeasible(with) {
                    if event.is_active(store) {
                        // The event has to happen strictly after the checkpoint.
                        let _ = event
                            .time
                            .set_lower_bound(store, at.time.lower_bound(store).saturating_add(1))?;
                        let _ = at
                            .time
                            .set_upper_bound(store, event.time.upper_bound(store).saturating_sub(1))?;
                    } else if Self::surely_before(store, event, at) {
                        if let Some(literal) = event.active {
                            let _ = literal.set_false(store)?;
                        }
                    }
                } else if infeasible(without) && event.is_active(store) {
                    // The event has to happen no later than the checkpoint.
                    let _ = at
                        .time
                        .set_lower_bound(store, event.time.lower_bound(store))?;
                    let _ = event
                        .time
                        .set_upper_bound(store, at.time.upper_bound(store))?;
                }
            }
        }

        Ok(())
    }

    pub(crate) fn is_satisfied(&self, value: &dyn Fn(DomainId) -> i64) -> bool {
        let active = self
            .events
            .iter()
            .filter(|event| event.active.map_or(true, |literal| literal.evaluate(value)))
            .map(|event| (event.time.evaluate(value), i128::from(event.level_change)))
            .collect::<Vec<_>>();

        let range = i128::from(self.min_level)..=i128::from(self.max_level);
        range.contains(&0) && active.iter().all(|&(time, _)| {
            let level = active
                .iter()
                .filter(|&&(other, _)| other <= time)
                .map(|&(_, change)| change)
                .sum::<i128>();
            range.contains(&level)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_helper::TestStore;
    use crate::model::Constraint;

    fn event(time: AffineView, level_change: i64, active: Option<Literal>) -> ReservoirEvent {
        ReservoirEvent {
            time,
            level_change,
            active,
        }
    }

    #[test]
    fn consuming_before_producing_is_a_conflict() {
        let mut store = TestStore::default();
        let reservoir = Reservoir::new(
            [
                event(AffineView::constant(0), -2, None),
                event(AffineView::constant(5), 2, None),
            ],
            0,
            10,
        );

        assert_eq!(
            Err(Inconsistency::Conflict),
            store.propagate(Constraint::Reservoir(reservoir))
        );
    }

    #[test]
    fn consumption_is_pushed_after_production() {
        let mut store = TestStore::default();
        let consume = store.new_variable(0, 10);
        let reservoir = Reservoir::new(
            [
                event(AffineView::constant(4), 3, None),
                event(consume.into(), -3, None),
            ],
            0,
            10,
        );

        store
            .propagate(Constraint::Reservoir(reservoir))
            .expect("non-empty domain");

        assert_eq!(4, store.lower_bound(consume));
    }

    #[test]
    fn production_over_capacity_is_pushed_after_consumption() {
        let mut store = TestStore::default();
        let produce = store.new_variable(0, 10);
        let reservoir = Reservoir::new(
            [
                event(AffineView::constant(0), 4, None),
                event(AffineView::constant(6), -4, None),
                event(produce.into(), 4, None),
            ],
            0,
            5,
        );

        store
            .propagate(Constraint::Reservoir(reservoir))
            .expect("non-empty domain");

        assert_eq!(6, store.lower_bound(produce));
    }

    #[test]
    fn optional_event_before_the_checkpoint_is_deactivated() {
        let mut store = TestStore::default();
        let active = store.new_literal();
        let reservoir = Reservoir::new(
            [
                event(AffineView::constant(2), 4, None),
                event(AffineView::constant(1), 3, Some(active)),
            ],
            0,
            5,
        );

        store
            .propagate(Constraint::Reservoir(reservoir))
            .expect("non-empty domain");

        assert!(active.is_false(&store));
    }
}
