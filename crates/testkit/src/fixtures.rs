//! Container builders and bookkeeping helpers for tests.

use blockcraft_core::{CraftingGrid, ItemStack, ItemType, PlayerInventory};

/// Build a crafting grid from `(slot, item, count)` cells.
pub fn grid_with(cells: &[(usize, ItemType, u32)]) -> CraftingGrid {
    let mut grid = CraftingGrid::new();
    for &(slot, item, count) in cells {
        grid.set(slot, Some(ItemStack::new(item, count)));
    }
    grid
}

/// Build a player inventory from `(arena slot, item, count)` entries.
pub fn inventory_with(slots: &[(usize, ItemType, u32)]) -> PlayerInventory {
    let mut inventory = PlayerInventory::new();
    for &(slot, item, count) in slots {
        inventory
            .arena_mut()
            .set(slot, Some(ItemStack::new(item, count)));
    }
    inventory
}

/// Units held across the grid and the inventory together.
pub fn total_items(grid: &CraftingGrid, inventory: &PlayerInventory) -> u32 {
    grid.total_items() + inventory.total_items()
}

/// Units of one kind held across the grid and the inventory together.
pub fn total_of(grid: &CraftingGrid, inventory: &PlayerInventory, item: ItemType) -> u32 {
    grid.count_item(item) + inventory.count_item(item)
}
