use enumset::EnumSet;
use enumset::EnumSetType;

use super::Domain;

/// A description of the kinds of events that can happen on a domain variable.
#[derive(Debug, EnumSetType, Hash)]
pub enum DomainEvent {
    /// Event where an (integer) variable domain collapses to a single value.
    Assign,
    /// Event where an (integer) variable domain tightens the lower bound.
    LowerBound,
    /// Event where an (integer) variable domain tightens the upper bound.
    UpperBound,
    /// Event where an (integer) variable domain removes an inner value within the domain.
    /// N.B. this DomainEvent should not be used with Boolean Variables!
    Removal,
}

impl DomainEvent {
    /// Events which change a bound of the domain.
    pub fn bounds() -> EnumSet<DomainEvent> {
        DomainEvent::Assign | DomainEvent::LowerBound | DomainEvent::UpperBound
    }

    /// The events that took place when `old` was narrowed to `new`.
    pub(crate) fn between(old: &Domain, new: &Domain) -> EnumSet<DomainEvent> {
        let mut events = EnumSet::empty();

        if new.min() > old.min() {
            let _ = events.insert(DomainEvent::LowerBound);
        }
        if new.max() < old.max() {
            let _ = events.insert(DomainEvent::UpperBound);
        }
        if new.is_fixed() && !old.is_fixed() {
            let _ = events.insert(DomainEvent::Assign);
        }
        if events.is_empty() && new != old {
            let _ = events.insert(DomainEvent::Removal);
        }

        events
    }
}
