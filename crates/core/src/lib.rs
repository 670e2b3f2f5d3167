#![warn(missing_docs)]
//! Core primitives shared across the workspace: item stacks and containers.

pub mod container;
pub mod item;

// Re-export commonly used types
pub use container::{
    Container, CraftingGrid, InsertReport, PlayerInventory, Slot, SlotWindow, Window, GRID_SIZE,
    GRID_WIDTH, HOTBAR_SIZE, MAIN_SIZE, PLAYER_SLOTS,
};
pub use item::{add_to_stack, can_stack, normalize, ItemStack, ItemType, UnknownItemType, STACK_LIMIT};
