//! Linear undo/redo history.
//!
//! The stack holds the current value (`present`), earlier values (`past`,
//! oldest first) and undone values (`future`, nearest redo first). Any new
//! value clears `future`. Recording a value equal to `present` is a no-op,
//! so the top of `past` never duplicates `present`.
//!
//! Every value carries a short action label (`"brightness"`, `"crop"`, ...)
//! so a history panel can list the steps and highlight the current one.

use std::collections::VecDeque;

use crate::{EditChange, EditState, FrameId};

/// Default number of undo steps kept.
pub const DEFAULT_CAPACITY: usize = 100;

/// Label of the first entry of a fresh history.
pub const INITIAL_LABEL: &str = "open";

/// Label used by [`HistoryStack::commit`].
pub const DEFAULT_LABEL: &str = "edit";

#[derive(Debug, Clone)]
struct Step<T> {
    value: T,
    label: &'static str,
}

impl<T> Step<T> {
    fn new(value: T, label: &'static str) -> Self {
        Self { value, label }
    }
}

/// One history step as shown in a history panel.
#[derive(Debug)]
pub struct HistoryEntry<'a, T> {
    pub label: &'static str,
    pub value: &'a T,
}

impl<T> Clone for HistoryEntry<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for HistoryEntry<'_, T> {}

/// Bounded linear history of values.
#[derive(Debug, Clone)]
pub struct HistoryStack<T> {
    past: VecDeque<Step<T>>,
    present: Step<T>,
    future: VecDeque<Step<T>>,
    capacity: usize,
}

impl<T: Default + Clone + PartialEq> Default for HistoryStack<T> {
    fn default() -> Self {
        Self::new(T::default(), DEFAULT_CAPACITY)
    }
}

impl<T: Clone + PartialEq> HistoryStack<T> {
    /// A history holding only `initial`. `capacity` bounds `past`; zero is treated as one.
    pub fn new(initial: T, capacity: usize) -> Self {
        Self {
            past: VecDeque::new(),
            present: Step::new(initial, INITIAL_LABEL),
            future: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn present(&self) -> &T {
        &self.present.value
    }

    /// Label of the step that produced the present value.
    pub fn present_label(&self) -> &'static str {
        self.present.label
    }

    /// Earlier values, oldest first.
    pub fn past(&self) -> impl Iterator<Item = &T> {
        self.past.iter().map(|step| &step.value)
    }

    /// Undone values, nearest redo first.
    pub fn future(&self) -> impl Iterator<Item = &T> {
        self.future.iter().map(|step| &step.value)
    }

    /// Every value held: past, present, then future.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries().map(|entry| entry.value)
    }

    /// Every step with its label, in the same order as [`iter`](Self::iter).
    pub fn entries(&self) -> impl Iterator<Item = HistoryEntry<'_, T>> {
        self.past
            .iter()
            .chain(std::iter::once(&self.present))
            .chain(self.future.iter())
            .map(|step| HistoryEntry {
                label: step.label,
                value: &step.value,
            })
    }

    /// Position of the present value within [`entries`](Self::entries).
    pub fn current_index(&self) -> usize {
        self.past.len()
    }

    /// Number of values held, including `present`.
    pub fn len(&self) -> usize {
        self.past.len() + 1 + self.future.len()
    }

    /// Always false; a history holds at least its present value.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Make `next` the present value under [`DEFAULT_LABEL`].
    pub fn commit(&mut self, next: T) -> bool {
        self.record(next, DEFAULT_LABEL)
    }

    /// Make `next` the present value, labelled `label`.
    ///
    /// Returns false (and changes nothing) when `next` equals the present.
    pub fn record(&mut self, next: T, label: &'static str) -> bool {
        if next == self.present.value {
            return false;
        }
        let previous = std::mem::replace(&mut self.present, Step::new(next, label));
        self.past.push_back(previous);
        while self.past.len() > self.capacity {
            self.past.pop_front();
        }
        self.future.clear();
        true
    }

    /// Step back one value. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop_back() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Step forward one value. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push_back(current);
        true
    }

    /// Record `initial` as a new step, so the reset itself can be undone.
    ///
    /// `future` is dropped even when `initial` is already the present value;
    /// only the duplicate entry is skipped.
    pub fn reset_to(&mut self, initial: T, label: &'static str) -> bool {
        let changed = self.record(initial, label);
        self.future.clear();
        changed
    }

    /// Forget past and future, keeping the present value.
    pub fn clear(&mut self) {
        self.past.clear();
        self.future.clear();
    }

    /// Replace everything with a single `initial` value.
    pub fn replace_all(&mut self, initial: T) {
        self.clear();
        self.present = Step::new(initial, INITIAL_LABEL);
    }
}

impl HistoryStack<EditState> {
    /// A history starting at the default state.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(EditState::default(), capacity)
    }

    /// Record a single-field change. No-op when the (clamped) value is unchanged.
    pub fn set(&mut self, change: EditChange) -> bool {
        let next = self.present.value.with_change(change);
        let changed = self.record(next, change.label());
        if changed {
            tracing::debug!(field = change.label(), depth = self.past.len(), "history set");
        }
        changed
    }

    /// Record several field changes as one history step.
    ///
    /// The step is labelled after the first change.
    pub fn update<I>(&mut self, changes: I) -> bool
    where
        I: IntoIterator<Item = EditChange>,
    {
        let mut label = None;
        let next = changes.into_iter().fold(self.present.value.clone(), |state, change| {
            label.get_or_insert(change.label());
            state.with_change(change)
        });
        let label = label.unwrap_or(DEFAULT_LABEL);
        let changed = self.record(next, label);
        if changed {
            tracing::debug!(label, depth = self.past.len(), "history update");
        }
        changed
    }

    /// Consume the pending crop area into `frame`.
    ///
    /// Does nothing when no crop area is set.
    pub fn apply_crop(&mut self, frame: FrameId) -> bool {
        if self.present.value.crop_area.is_none() {
            return false;
        }
        let next = EditState {
            crop_area: None,
            frame,
            ..self.present.value.clone()
        };
        let changed = self.record(next, "crop");
        if changed {
            tracing::debug!(frame = frame.0, "history crop applied");
        }
        changed
    }

    /// Return to the default adjustments on the loaded image, as an undoable step.
    ///
    /// Already at the default, nothing is pushed but pending redos are dropped.
    pub fn reset(&mut self) -> bool {
        let changed = self.reset_to(EditState::default(), "reset");
        if changed {
            tracing::debug!("history reset");
        }
        changed
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
