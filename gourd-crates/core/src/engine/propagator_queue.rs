use std::collections::VecDeque;

use super::propagator_id::PropagatorId;
use crate::containers::KeyedVec;
use crate::gourd_assert_moderate;
use crate::propagators::Priority;

/// The propagators waiting to run, one FIFO bucket per [`Priority`]. A propagator is enqueued at
/// most once.
#[derive(Debug, Clone)]
pub(crate) struct PropagatorQueue {
    queues: Vec<VecDeque<PropagatorId>>,
    is_enqueued: KeyedVec<PropagatorId, bool>,
    num_enqueued: usize,
}

impl Default for PropagatorQueue {
    fn default() -> Self {
        PropagatorQueue {
            queues: vec![VecDeque::new(); Priority::NUM_LEVELS],
            is_enqueued: KeyedVec::default(),
            num_enqueued: 0,
        }
    }
}

impl PropagatorQueue {
    pub(crate) fn is_empty(&self) -> bool {
        self.num_enqueued == 0
    }

    pub(crate) fn enqueue_propagator(&mut self, propagator_id: PropagatorId, priority: Priority) {
        if self.is_propagator_enqueued(propagator_id) {
            return;
        }

        self.is_enqueued.accommodate(propagator_id, false);
        self.is_enqueued[propagator_id] = true;
        self.num_enqueued += 1;
        self.queues[priority as usize].push_back(propagator_id);
    }

    /// Takes the oldest propagator of the most urgent non-empty bucket.
    pub(crate) fn pop(&mut self) -> Option<PropagatorId> {
        let propagator_id = self.queues.iter_mut().find_map(VecDeque::pop_front)?;

        gourd_assert_moderate!(self.is_enqueued[propagator_id]);
        self.is_enqueued[propagator_id] = false;
        self.num_enqueued -= 1;

        Some(propagator_id)
    }

    pub(crate) fn clear(&mut self) {
        for queue in self.queues.iter_mut() {
            queue.clear();
        }
        for is_propagator_enqueued in self.is_enqueued.iter_mut() {
            *is_propagator_enqueued = false;
        }
        self.num_enqueued = 0;
    }

    pub(crate) fn is_propagator_enqueued(&self, propagator_id: PropagatorId) -> bool {
        self.is_enqueued
            .get(propagator_id)
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn higher_priorities_are_popped_first() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(1), Priority::High);
        queue.enqueue_propagator(PropagatorId(0), Priority::Medium);
        queue.enqueue_propagator(PropagatorId(3), Priority::VeryLow);
        queue.enqueue_propagator(PropagatorId(4), Priority::Low);

        assert_eq!(Some(PropagatorId(1)), queue.pop());
        assert_eq!(Some(PropagatorId(0)), queue.pop());
        assert_eq!(Some(PropagatorId(4)), queue.pop());
        assert_eq!(Some(PropagatorId(3)), queue.pop());
        assert_eq!(None, queue.pop());
    }

    #[test]
    fn propagators_are_enqueued_once() {
        let mut queue = PropagatorQueue::default();

        queue.enqueue_propagator(PropagatorId(2), Priority::Low);
        queue.enqueue_propagator(PropagatorId(2), Priority::Low);

        assert_eq!(Some(PropagatorId(2)), queue.pop());
        assert!(queue.is_empty());
    }

    #[test]
    fn clearing_allows_enqueueing_again() {
        let mut queue = PropagatorQueue::default();
        queue.enqueue_propagator(PropagatorId(0), Priority::High);

        queue.clear();

        assert!(queue.is_empty());
        assert!(!queue.is_propagator_enqueued(PropagatorId(0)));
        queue.enqueue_propagator(PropagatorId(0), Priority::High);
        assert_eq!(Some(PropagatorId(0)), queue.pop());
    }
}
