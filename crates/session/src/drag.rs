//! Drag gesture lifecycle.
//!
//! `Idle -> Dragging -> (resolved | cancelled) -> Idle`. The dragged stack is
//! captured by value when the gesture starts; the resolver compares it with
//! the source slot again at drop time.

use blockcraft_core::ItemStack;

use crate::transfer::{DndTransfer, SlotRef};

/// Current phase of the drag state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// A stack has been picked up and is waiting for a drop target.
    Dragging {
        /// Slot the gesture started from.
        source: SlotRef,
        /// Snapshot of the source stack at drag start.
        stack: ItemStack,
    },
}

/// Why a gesture ended without a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Dropped outside any slot.
    NoTarget,
    /// Dropped back onto its own origin.
    SameSlot,
    /// Aborted before a drop happened.
    Aborted,
}

/// How a drag gesture ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragEnd {
    /// A transfer is ready to be resolved.
    Drop(DndTransfer),
    /// No transfer; nothing is mutated.
    Cancelled(CancelReason),
}

/// Tracks at most one drag gesture at a time.
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Start a gesture from `source`, which currently holds `observed`.
    ///
    /// Empty or zero-count sources never enter `Dragging`. Starting a new
    /// gesture replaces any unfinished one.
    pub fn begin(&mut self, source: SlotRef, observed: Option<&ItemStack>) -> bool {
        match observed.filter(|stack| !stack.is_empty()) {
            Some(stack) => {
                self.state = DragState::Dragging {
                    source,
                    stack: *stack,
                };
                true
            }
            None => false,
        }
    }

    /// Finish the gesture. Returns `None` if nothing was being dragged.
    pub fn end(&mut self, target: Option<SlotRef>) -> Option<DragEnd> {
        let DragState::Dragging { source, stack } = std::mem::take(&mut self.state) else {
            return None;
        };
        let end = match target {
            None => DragEnd::Cancelled(CancelReason::NoTarget),
            Some(target) if target == source => DragEnd::Cancelled(CancelReason::SameSlot),
            Some(target) => DragEnd::Drop(DndTransfer {
                source,
                target,
                dragged: stack,
            }),
        };
        Some(end)
    }

    /// Abort the current gesture, if any.
    pub fn cancel(&mut self) -> Option<DragEnd> {
        match std::mem::take(&mut self.state) {
            DragState::Idle => None,
            DragState::Dragging { .. } => Some(DragEnd::Cancelled(CancelReason::Aborted)),
        }
    }
}
