use crate::action::UndoableAction;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use tracing::{debug, trace};

pub const DEFAULT_MAX_STACK_SIZE: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(size) => size,
    None => panic!("default stack size must be positive"),
};

/// Snapshot of the two availability flags, for presentation layers that
/// re-render only when something changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UndoState {
    pub can_undo: bool,
    pub can_redo: bool,
}

/// Bounded undo/redo history.
///
/// The manager only orders actions; it never applies or reverses them.
/// Undo and redo are two-phase: the caller pops an action, reverses (or
/// reapplies) its effect on the real data, then confirms it so it moves to
/// the opposite stack. An action that is popped but never confirmed is gone
/// from both stacks, and confirming without a pop duplicates the entry.
/// Keeping those calls paired is the caller's contract.
#[derive(Debug, Clone)]
pub struct UndoManager<A = UndoableAction> {
    /// Most recent at the back.
    undo_stack: VecDeque<A>,
    /// Most recent at the back.
    redo_stack: Vec<A>,
    last_action: Option<A>,
    max_stack_size: NonZeroUsize,
}

impl<A> Default for UndoManager<A> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STACK_SIZE)
    }
}

impl<A> UndoManager<A> {
    #[must_use]
    pub fn new(max_stack_size: NonZeroUsize) -> Self {
        Self {
            undo_stack: VecDeque::with_capacity(max_stack_size.get().min(64)),
            redo_stack: Vec::new(),
            last_action: None,
            max_stack_size,
        }
    }

    #[must_use]
    pub const fn max_stack_size(&self) -> NonZeroUsize {
        self.max_stack_size
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> UndoState {
        UndoState {
            can_undo: self.can_undo(),
            can_redo: self.can_redo(),
        }
    }

    /// The most recently recorded action. Undo and redo do not change it.
    #[must_use]
    pub const fn last_action(&self) -> Option<&A> {
        self.last_action.as_ref()
    }

    #[must_use]
    pub fn peek_undo(&self) -> Option<&A> {
        self.undo_stack.back()
    }

    #[must_use]
    pub fn peek_redo(&self) -> Option<&A> {
        self.redo_stack.last()
    }

    /// Removes the newest undo entry. Follow up with [`Self::confirm_undo`]
    /// once the action has been reversed.
    pub fn pop_undo(&mut self) -> Option<A> {
        self.undo_stack.pop_back()
    }

    /// Moves a reversed action onto the redo stack.
    pub fn confirm_undo(&mut self, action: A) {
        self.redo_stack.push(action);
        debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "Action undone"
        );
    }

    /// Removes the newest redo entry. Follow up with [`Self::confirm_redo`]
    /// once the action has been reapplied.
    pub fn pop_redo(&mut self) -> Option<A> {
        self.redo_stack.pop()
    }

    /// Puts a reapplied action back on top of the undo stack.
    ///
    /// Like [`Self::record_action`] this respects the size cap, but it leaves
    /// the redo stack alone.
    pub fn confirm_redo(&mut self, action: A) {
        self.push_bounded(action);
        debug!(
            undo = self.undo_stack.len(),
            redo = self.redo_stack.len(),
            "Action redone"
        );
    }

    #[must_use]
    pub fn undo_stack_size(&self) -> usize {
        self.undo_stack.len()
    }

    #[must_use]
    pub fn redo_stack_size(&self) -> usize {
        self.redo_stack.len()
    }

    /// Undo entries, newest first.
    pub fn undo_history(&self) -> impl Iterator<Item = &A> {
        self.undo_stack.iter().rev()
    }

    /// Redo entries, newest first.
    pub fn redo_history(&self) -> impl Iterator<Item = &A> {
        self.redo_stack.iter().rev()
    }

    /// Empties both stacks. `last_action` is kept.
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
        debug!("Undo history cleared");
    }

    fn push_bounded(&mut self, action: A) {
        self.undo_stack.push_back(action);
        while self.undo_stack.len() > self.max_stack_size.get() {
            self.undo_stack.pop_front();
            trace!(max = self.max_stack_size.get(), "Evicted oldest undo entry");
        }
    }
}

impl<A: Clone> UndoManager<A> {
    /// Records a new action. The redo history is discarded.
    pub fn record_action(&mut self, action: A) {
        self.last_action = Some(action.clone());
        self.push_bounded(action);
        self.redo_stack.clear();
        debug!(undo = self.undo_stack.len(), "Action recorded");
    }
}
