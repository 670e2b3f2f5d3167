#![warn(missing_docs)]
//! Screen-level state: drag gestures, transfer resolution between the grid
//! and the player arena, and the crafting session lifecycle.

pub mod drag;
pub mod session;
pub mod transfer;

pub use drag::{CancelReason, DragController, DragEnd, DragState};
pub use session::{CloseReport, CraftReceipt, CraftingSession, GestureResult, InventoryScreen};
pub use transfer::{
    resolve_inventory_transfer, resolve_transfer, Area, DndTransfer, SlotRef, TransferOutcome,
    TransferRejected, TransferStrategy,
};
