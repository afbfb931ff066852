use std::iter::Rev;
use std::ops::Deref;
use std::vec::Drain;

use crate::gourd_assert_simple;

/// A position on a [`Trail`]; restoring to it undoes every entry pushed after it was taken.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrailMark(pub(crate) usize);

/// An append-only undo log. Entries are pushed while narrowing and popped, in reverse order, when
/// restoring an earlier [`TrailMark`].
#[derive(Clone, Debug)]
pub(crate) struct Trail<T> {
    trail: Vec<T>,
}

// We explicitly implement the Default and not as a macro, because we want to avoid imposing Default
// on the generic type T.
impl<T> Default for Trail<T> {
    fn default() -> Self {
        Trail {
            trail: Default::default(),
        }
    }
}

impl<T> Trail<T> {
    pub(crate) fn mark(&self) -> TrailMark {
        TrailMark(self.trail.len())
    }

    /// Removes all entries pushed after `mark`, returning them most recent first.
    pub(crate) fn truncate_to(&mut self, mark: TrailMark) -> Rev<Drain<'_, T>> {
        gourd_assert_simple!(
            mark.0 <= self.trail.len(),
            "cannot restore to mark {} on a trail of length {}",
            mark.0,
            self.trail.len()
        );

        self.trail.drain(mark.0..).rev()
    }

    pub(crate) fn push(&mut self, elem: T) {
        self.trail.push(elem)
    }

    pub(crate) fn clear(&mut self) {
        self.trail.clear()
    }
}

impl<T> Deref for Trail<T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        &self.trail
    }
}
