//! Property-based tests for transfer resolution
//!
//! Validates transfer invariants:
//! - Grid + inventory unit totals never change, per kind
//! - A rejected transfer leaves both containers bit-identical
//! - No slot ever exceeds STACK_LIMIT or holds a zero-count stack

use blockcraft_core::{CraftingGrid, ItemStack, ItemType, PlayerInventory, STACK_LIMIT};
use blockcraft_session::{resolve_transfer, Area, DndTransfer, SlotRef};
use blockcraft_testkit::{total_items, total_of};
use proptest::prelude::*;

fn any_item() -> impl Strategy<Value = ItemType> {
    // A small palette makes same-kind interactions common.
    prop::sample::select(vec![ItemType::Dirt, ItemType::Wood, ItemType::Planks])
}

fn any_slot() -> impl Strategy<Value = SlotRef> {
    prop_oneof![
        (0usize..10).prop_map(SlotRef::grid),
        (0usize..28).prop_map(SlotRef::inventory),
        (0usize..10).prop_map(SlotRef::hotbar),
    ]
}

fn any_state() -> impl Strategy<Value = (CraftingGrid, PlayerInventory)> {
    let grid = prop::collection::vec(
        prop::option::of((any_item(), 1u32..=STACK_LIMIT)),
        9,
    );
    let arena = prop::collection::vec(
        prop::option::weighted(0.6, (any_item(), 1u32..=STACK_LIMIT)),
        36,
    );
    (grid, arena).prop_map(|(grid_slots, arena_slots)| {
        let mut grid = CraftingGrid::new();
        for (index, slot) in grid_slots.into_iter().enumerate() {
            grid.set(index, slot.map(|(item, count)| ItemStack::new(item, count)));
        }
        let mut inventory = PlayerInventory::new();
        for (index, slot) in arena_slots.into_iter().enumerate() {
            inventory
                .arena_mut()
                .set(index, slot.map(|(item, count)| ItemStack::new(item, count)));
        }
        (grid, inventory)
    })
}

fn observed(grid: &CraftingGrid, inventory: &PlayerInventory, at: SlotRef) -> Option<ItemStack> {
    match at.area {
        Area::Grid => grid.get(at.index).copied(),
        _ => at
            .area
            .window()
            .and_then(|window| inventory.get(window, at.index))
            .copied(),
    }
}

proptest! {
    /// Property: any sequence of drags conserves every item kind
    #[test]
    fn transfers_conserve_units(
        (mut grid, mut inventory) in any_state(),
        drags in prop::collection::vec((any_slot(), any_slot()), 1..40),
    ) {
        let before_total = total_items(&grid, &inventory);
        let before_kinds: Vec<u32> = ItemType::ALL
            .iter()
            .map(|&item| total_of(&grid, &inventory, item))
            .collect();

        for (source, target) in drags {
            let Some(dragged) = observed(&grid, &inventory, source) else {
                continue;
            };
            let _ = resolve_transfer(
                &DndTransfer { source, target, dragged },
                &mut grid,
                &mut inventory,
            );
        }

        prop_assert_eq!(total_items(&grid, &inventory), before_total);
        for (item, before) in ItemType::ALL.iter().zip(before_kinds) {
            prop_assert_eq!(total_of(&grid, &inventory, *item), before);
        }
        for stack in grid.slots().iter().chain(inventory.arena().slots().iter()).flatten() {
            prop_assert!(stack.count > 0 && stack.count <= STACK_LIMIT);
        }
    }

    /// Property: rejection never mutates either container
    #[test]
    fn rejection_is_idempotent(
        (grid, inventory) in any_state(),
        source in any_slot(),
        target in any_slot(),
        item in any_item(),
        count in 0u32..=STACK_LIMIT,
    ) {
        let mut grid_after = grid.clone();
        let mut inventory_after = inventory.clone();
        // Mostly stale snapshots, so rejections are frequent.
        let dragged = observed(&grid, &inventory, source)
            .filter(|_| count % 2 == 0)
            .unwrap_or(ItemStack::new(item, count));

        let result = resolve_transfer(
            &DndTransfer { source, target, dragged },
            &mut grid_after,
            &mut inventory_after,
        );

        if result.is_err() {
            prop_assert_eq!(grid_after, grid);
            prop_assert_eq!(inventory_after, inventory);
        }
    }
}
