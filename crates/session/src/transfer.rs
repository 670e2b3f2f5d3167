//! Drag-and-drop transfer resolution between the crafting grid, the main
//! inventory and the hotbar.
//!
//! Each `(source area, target area)` pair maps to one [`TransferStrategy`].
//! Every strategy checks all of its preconditions before touching a slot, so a
//! rejected transfer leaves both containers exactly as they were.

use blockcraft_core::{
    add_to_stack, CraftingGrid, ItemStack, PlayerInventory, Slot, Window, GRID_SIZE,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// One of the three logical containers a slot can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    /// The 3x3 crafting grid.
    Grid,
    /// The 27-slot main inventory window.
    Inventory,
    /// The 9-slot hotbar window.
    Hotbar,
}

impl Area {
    /// Arena window backing this area, or `None` for the crafting grid.
    pub fn window(self) -> Option<Window> {
        match self {
            Area::Grid => None,
            Area::Inventory => Some(Window::Main),
            Area::Hotbar => Some(Window::Hotbar),
        }
    }

    /// Number of addressable slots.
    pub fn slot_count(self) -> usize {
        self.window().map_or(GRID_SIZE, Window::len)
    }

    /// Whether this area is part of the player arena.
    pub fn is_player(self) -> bool {
        self.window().is_some()
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Area::Grid => "grid",
            Area::Inventory => "inventory",
            Area::Hotbar => "hotbar",
        })
    }
}

/// Address of one slot: an area plus an area-local index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotRef {
    /// Container the slot belongs to.
    pub area: Area,
    /// Index within that container.
    pub index: usize,
}

impl SlotRef {
    /// Address a slot.
    pub const fn new(area: Area, index: usize) -> Self {
        Self { area, index }
    }

    /// A crafting grid slot.
    pub const fn grid(index: usize) -> Self {
        Self::new(Area::Grid, index)
    }

    /// A main inventory slot.
    pub const fn inventory(index: usize) -> Self {
        Self::new(Area::Inventory, index)
    }

    /// A hotbar slot.
    pub const fn hotbar(index: usize) -> Self {
        Self::new(Area::Hotbar, index)
    }
}

impl fmt::Display for SlotRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.area, self.index)
    }
}

/// A completed drag gesture, consumed by [`resolve_transfer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DndTransfer {
    /// Slot the drag started from.
    pub source: SlotRef,
    /// Slot the drag was dropped on.
    pub target: SlotRef,
    /// Stack captured when the drag started.
    pub dragged: ItemStack,
}

/// How a transfer between two areas is carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferStrategy {
    /// grid -> grid: move into empty, stack onto same kind, swap otherwise.
    MergeOrSwap,
    /// inventory/hotbar -> inventory/hotbar: move into empty, swap otherwise.
    MoveOrSwap,
    /// inventory/hotbar -> grid: place a single unit.
    PlaceOne,
    /// grid -> inventory/hotbar: return the stack via general insertion.
    ReturnToInventory,
}

impl TransferStrategy {
    /// Dispatch table keyed by `(source, target)`.
    pub fn for_areas(source: Area, target: Area) -> Self {
        match (source.is_player(), target.is_player()) {
            (false, false) => TransferStrategy::MergeOrSwap,
            (true, true) => TransferStrategy::MoveOrSwap,
            (true, false) => TransferStrategy::PlaceOne,
            (false, true) => TransferStrategy::ReturnToInventory,
        }
    }
}

/// What a successful transfer did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransferOutcome {
    /// The whole stack moved into an empty slot.
    Moved {
        /// Units moved.
        count: u32,
    },
    /// Units were added onto a same-kind stack; `remainder` stayed at the source.
    Stacked {
        /// Units moved onto the target.
        moved: u32,
        /// Units left at the source.
        remainder: u32,
    },
    /// Source and target exchanged their stacks.
    Swapped,
    /// A single unit was placed into the grid.
    PlacedOne,
    /// The grid stack was inserted into the player arena.
    Returned {
        /// Units inserted.
        inserted: u32,
        /// Units that did not fit and stayed in the grid slot.
        remainder: u32,
    },
}

/// Why a transfer left both containers unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferRejected {
    /// Dropped onto its own origin.
    #[error("source and target are the same slot")]
    SameSlot,
    /// The area is not part of the current screen.
    #[error("`{area}` is not a container on this screen")]
    UnrecognizedTarget {
        /// Area that was referenced.
        area: Area,
    },
    /// Index outside the area.
    #[error("slot {index} is out of range for `{area}`")]
    InvalidSlot {
        /// Area that was referenced.
        area: Area,
        /// Requested index.
        index: usize,
    },
    /// Nothing to move.
    #[error("source slot is empty")]
    EmptySource,
    /// The source no longer holds the stack captured at drag start.
    #[error("source slot changed during the drag")]
    SourceChanged,
    /// A single unit cannot be placed on a different kind.
    #[error("target slot holds a different item")]
    TargetOccupied,
    /// Same kind, but no room left.
    #[error("target slot is full")]
    TargetFull,
    /// Not a single unit fits in the player arena.
    #[error("inventory has no room")]
    InventoryFull,
}

/// Resolve one drag gesture on the crafting screen.
pub fn resolve_transfer(
    transfer: &DndTransfer,
    grid: &mut CraftingGrid,
    inventory: &mut PlayerInventory,
) -> Result<TransferOutcome, TransferRejected> {
    let mut containers = Containers {
        grid: Some(grid),
        inventory,
    };
    containers.resolve(transfer)
}

/// Resolve one drag gesture on the inventory screen, where no grid exists.
pub fn resolve_inventory_transfer(
    transfer: &DndTransfer,
    inventory: &mut PlayerInventory,
) -> Result<TransferOutcome, TransferRejected> {
    let mut containers = Containers {
        grid: None,
        inventory,
    };
    containers.resolve(transfer)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Grid(usize),
    Arena(usize),
}

struct Containers<'a> {
    grid: Option<&'a mut CraftingGrid>,
    inventory: &'a mut PlayerInventory,
}

impl Containers<'_> {
    fn resolve(&mut self, transfer: &DndTransfer) -> Result<TransferOutcome, TransferRejected> {
        let result = self.apply(transfer);
        match &result {
            Ok(outcome) => debug!(
                source = %transfer.source,
                target = %transfer.target,
                ?outcome,
                "Transfer resolved"
            ),
            Err(reason) => debug!(
                source = %transfer.source,
                target = %transfer.target,
                %reason,
                "Transfer rejected"
            ),
        }
        result
    }

    fn apply(&mut self, transfer: &DndTransfer) -> Result<TransferOutcome, TransferRejected> {
        let source = self.locate(transfer.source)?;
        let target = self.locate(transfer.target)?;
        if source == target {
            return Err(TransferRejected::SameSlot);
        }

        let Some(stack) = self.get(source) else {
            return Err(TransferRejected::EmptySource);
        };
        if stack != transfer.dragged {
            return Err(TransferRejected::SourceChanged);
        }

        match TransferStrategy::for_areas(transfer.source.area, transfer.target.area) {
            TransferStrategy::MergeOrSwap => self.merge_or_swap(source, target, stack),
            TransferStrategy::MoveOrSwap => self.move_or_swap(source, target, stack),
            TransferStrategy::PlaceOne => self.place_one(source, target, stack),
            TransferStrategy::ReturnToInventory => self.return_to_inventory(source, stack),
        }
    }

    fn locate(&self, at: SlotRef) -> Result<Location, TransferRejected> {
        let invalid = TransferRejected::InvalidSlot {
            area: at.area,
            index: at.index,
        };
        match at.area.window() {
            Some(window) => window.to_arena(at.index).map(Location::Arena).ok_or(invalid),
            None if self.grid.is_none() => {
                Err(TransferRejected::UnrecognizedTarget { area: at.area })
            }
            None if at.index < at.area.slot_count() => Ok(Location::Grid(at.index)),
            None => Err(invalid),
        }
    }

    fn get(&self, at: Location) -> Slot {
        match at {
            Location::Grid(index) => self.grid.as_ref().and_then(|grid| grid.get(index)).copied(),
            Location::Arena(slot) => self.inventory.arena().get(slot).copied(),
        }
    }

    fn set(&mut self, at: Location, slot: Slot) {
        match at {
            Location::Grid(index) => {
                if let Some(grid) = self.grid.as_mut() {
                    grid.set(index, slot);
                }
            }
            Location::Arena(index) => {
                self.inventory.arena_mut().set(index, slot);
            }
        }
    }

    fn swap(&mut self, source: Location, target: Location, stack: ItemStack) -> TransferOutcome {
        let displaced = self.get(target);
        self.set(target, Some(stack));
        self.set(source, displaced);
        TransferOutcome::Swapped
    }

    fn merge_or_swap(
        &mut self,
        source: Location,
        target: Location,
        stack: ItemStack,
    ) -> Result<TransferOutcome, TransferRejected> {
        match self.get(target) {
            None => {
                self.set(target, Some(stack));
                self.set(source, None);
                Ok(TransferOutcome::Moved { count: stack.count })
            }
            Some(existing) if existing.can_stack_with(&stack) => {
                if existing.is_full() {
                    return Err(TransferRejected::TargetFull);
                }
                let (merged, remainder) = add_to_stack(existing, stack.count);
                self.set(target, Some(merged));
                self.set(source, Some(stack.with_count(remainder)));
                Ok(TransferOutcome::Stacked {
                    moved: stack.count - remainder,
                    remainder,
                })
            }
            Some(_) => Ok(self.swap(source, target, stack)),
        }
    }

    fn move_or_swap(
        &mut self,
        source: Location,
        target: Location,
        stack: ItemStack,
    ) -> Result<TransferOutcome, TransferRejected> {
        match self.get(target) {
            None => {
                self.set(target, Some(stack));
                self.set(source, None);
                Ok(TransferOutcome::Moved { count: stack.count })
            }
            // Same kind swaps as well; stacks are not merged between arena slots.
            Some(_) => Ok(self.swap(source, target, stack)),
        }
    }

    fn place_one(
        &mut self,
        source: Location,
        target: Location,
        stack: ItemStack,
    ) -> Result<TransferOutcome, TransferRejected> {
        let placed = match self.get(target) {
            None => ItemStack::single(stack.item),
            Some(existing) if !existing.can_stack_with(&stack) => {
                return Err(TransferRejected::TargetOccupied)
            }
            Some(existing) if existing.is_full() => return Err(TransferRejected::TargetFull),
            Some(existing) => existing.with_count(existing.count + 1),
        };
        self.set(target, Some(placed));
        self.set(source, Some(stack.with_count(stack.count - 1)));
        Ok(TransferOutcome::PlacedOne)
    }

    fn return_to_inventory(
        &mut self,
        source: Location,
        stack: ItemStack,
    ) -> Result<TransferOutcome, TransferRejected> {
        // A report with nothing inserted means the arena was not touched.
        let report = self.inventory.arena_mut().insert_stack(stack.item, stack.count);
        if report.inserted == 0 {
            return Err(TransferRejected::InventoryFull);
        }
        self.set(source, Some(stack.with_count(report.leftover)));
        Ok(TransferOutcome::Returned {
            inserted: report.inserted,
            remainder: report.leftover,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockcraft_core::{ItemType, STACK_LIMIT};

    fn stack(item: ItemType, count: u32) -> ItemStack {
        ItemStack::new(item, count)
    }

    fn drag(source: SlotRef, target: SlotRef, dragged: ItemStack) -> DndTransfer {
        DndTransfer {
            source,
            target,
            dragged,
        }
    }

    #[test]
    fn dispatch_table_covers_every_pair() {
        use Area::*;
        use TransferStrategy::*;
        let table = [
            (Grid, Grid, MergeOrSwap),
            (Grid, Inventory, ReturnToInventory),
            (Grid, Hotbar, ReturnToInventory),
            (Inventory, Grid, PlaceOne),
            (Hotbar, Grid, PlaceOne),
            (Inventory, Inventory, MoveOrSwap),
            (Inventory, Hotbar, MoveOrSwap),
            (Hotbar, Inventory, MoveOrSwap),
            (Hotbar, Hotbar, MoveOrSwap),
        ];
        for (source, target, expected) in table {
            assert_eq!(TransferStrategy::for_areas(source, target), expected);
        }
    }

    #[test]
    fn grid_to_grid_moves_into_empty() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        grid.set(0, Some(stack(ItemType::Wood, 3)));

        let outcome = resolve_transfer(
            &drag(SlotRef::grid(0), SlotRef::grid(8), stack(ItemType::Wood, 3)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Moved { count: 3 });
        assert!(grid.get(0).is_none());
        assert_eq!(grid.get(8).copied(), Some(stack(ItemType::Wood, 3)));
    }

    #[test]
    fn grid_to_grid_stacks_up_to_limit() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        grid.set(0, Some(stack(ItemType::Dirt, 10)));
        grid.set(1, Some(stack(ItemType::Dirt, 60)));

        let outcome = resolve_transfer(
            &drag(SlotRef::grid(0), SlotRef::grid(1), stack(ItemType::Dirt, 10)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Stacked { moved: 4, remainder: 6 });
        assert_eq!(grid.get(1).map(|s| s.count), Some(STACK_LIMIT));
        assert_eq!(grid.get(0).map(|s| s.count), Some(6));
    }

    #[test]
    fn grid_to_grid_rejects_full_same_kind() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        grid.set(0, Some(stack(ItemType::Dirt, 1)));
        grid.set(1, Some(stack(ItemType::Dirt, STACK_LIMIT)));
        let before = grid.clone();

        let err = resolve_transfer(
            &drag(SlotRef::grid(0), SlotRef::grid(1), stack(ItemType::Dirt, 1)),
            &mut grid,
            &mut inv,
        )
        .unwrap_err();

        assert_eq!(err, TransferRejected::TargetFull);
        assert_eq!(grid, before);
    }

    #[test]
    fn grid_to_grid_swaps_different_kinds() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        grid.set(2, Some(stack(ItemType::Sand, 5)));
        grid.set(3, Some(stack(ItemType::Stone, 7)));

        let outcome = resolve_transfer(
            &drag(SlotRef::grid(2), SlotRef::grid(3), stack(ItemType::Sand, 5)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Swapped);
        assert_eq!(grid.get(2).copied(), Some(stack(ItemType::Stone, 7)));
        assert_eq!(grid.get(3).copied(), Some(stack(ItemType::Sand, 5)));
    }

    #[test]
    fn arena_moves_between_windows() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        inv.set(Window::Hotbar, 4, Some(stack(ItemType::Grass, 9)));

        let outcome = resolve_transfer(
            &drag(SlotRef::hotbar(4), SlotRef::inventory(0), stack(ItemType::Grass, 9)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Moved { count: 9 });
        assert!(inv.get(Window::Hotbar, 4).is_none());
        // Inventory index 0 is arena slot 9.
        assert_eq!(inv.arena().get(9).copied(), Some(stack(ItemType::Grass, 9)));
    }

    #[test]
    fn arena_same_kind_swaps_instead_of_merging() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        inv.set(Window::Main, 0, Some(stack(ItemType::Dirt, 60)));
        inv.set(Window::Main, 1, Some(stack(ItemType::Dirt, 10)));

        let outcome = resolve_transfer(
            &drag(SlotRef::inventory(1), SlotRef::inventory(0), stack(ItemType::Dirt, 10)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Swapped);
        assert_eq!(inv.get(Window::Main, 0).map(|s| s.count), Some(10));
        assert_eq!(inv.get(Window::Main, 1).map(|s| s.count), Some(60));
    }

    #[test]
    fn arena_to_grid_places_a_single_unit() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        inv.set(Window::Hotbar, 0, Some(stack(ItemType::Planks, 20)));

        let from = SlotRef::hotbar(0);
        resolve_transfer(
            &drag(from, SlotRef::grid(4), stack(ItemType::Planks, 20)),
            &mut grid,
            &mut inv,
        )
        .unwrap();
        let outcome = resolve_transfer(
            &drag(from, SlotRef::grid(4), stack(ItemType::Planks, 19)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::PlacedOne);
        assert_eq!(grid.get(4).map(|s| s.count), Some(2));
        assert_eq!(inv.get(Window::Hotbar, 0).map(|s| s.count), Some(18));
    }

    #[test]
    fn arena_to_grid_empties_source_on_last_unit() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        inv.set(Window::Main, 5, Some(stack(ItemType::Wood, 1)));

        resolve_transfer(
            &drag(SlotRef::inventory(5), SlotRef::grid(0), stack(ItemType::Wood, 1)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert!(inv.get(Window::Main, 5).is_none());
        assert_eq!(grid.get(0).copied(), Some(stack(ItemType::Wood, 1)));
    }

    #[test]
    fn arena_to_grid_rejects_other_kind_or_full_target() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        inv.set(Window::Hotbar, 0, Some(stack(ItemType::Sand, 3)));
        grid.set(0, Some(stack(ItemType::Stone, 1)));
        grid.set(1, Some(stack(ItemType::Sand, STACK_LIMIT)));
        let (grid_before, inv_before) = (grid.clone(), inv.clone());

        let occupied = resolve_transfer(
            &drag(SlotRef::hotbar(0), SlotRef::grid(0), stack(ItemType::Sand, 3)),
            &mut grid,
            &mut inv,
        );
        let full = resolve_transfer(
            &drag(SlotRef::hotbar(0), SlotRef::grid(1), stack(ItemType::Sand, 3)),
            &mut grid,
            &mut inv,
        );

        assert_eq!(occupied, Err(TransferRejected::TargetOccupied));
        assert_eq!(full, Err(TransferRejected::TargetFull));
        assert_eq!(grid, grid_before);
        assert_eq!(inv, inv_before);
    }

    #[test]
    fn grid_to_arena_ignores_drop_slot() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        inv.set(Window::Hotbar, 2, Some(stack(ItemType::Wood, 10)));
        grid.set(6, Some(stack(ItemType::Wood, 3)));

        let outcome = resolve_transfer(
            &drag(SlotRef::grid(6), SlotRef::inventory(20), stack(ItemType::Wood, 3)),
            &mut grid,
            &mut inv,
        )
        .unwrap();

        assert_eq!(outcome, TransferOutcome::Returned { inserted: 3, remainder: 0 });
        assert!(grid.is_empty());
        assert_eq!(inv.get(Window::Hotbar, 2).map(|s| s.count), Some(13));
        assert!(inv.get(Window::Main, 20).is_none());
    }

    #[test]
    fn grid_to_arena_keeps_what_does_not_fit() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        for slot in 0..inv.arena().len() {
            inv.arena_mut().set(slot, Some(stack(ItemType::Stone, STACK_LIMIT)));
        }
        inv.arena_mut().set(12, Some(stack(ItemType::Sand, 62)));
        grid.set(0, Some(stack(ItemType::Sand, 5)));

        let outcome = resolve_transfer(
            &drag(SlotRef::grid(0), SlotRef::hotbar(0), stack(ItemType::Sand, 5)),
            &mut grid,
            &mut inv,
        )
        .unwrap();
        assert_eq!(outcome, TransferOutcome::Returned { inserted: 2, remainder: 3 });
        assert_eq!(grid.get(0).map(|s| s.count), Some(3));

        let (grid_before, inv_before) = (grid.clone(), inv.clone());
        let err = resolve_transfer(
            &drag(SlotRef::grid(0), SlotRef::hotbar(0), stack(ItemType::Sand, 3)),
            &mut grid,
            &mut inv,
        )
        .unwrap_err();
        assert_eq!(err, TransferRejected::InventoryFull);
        assert_eq!(grid, grid_before);
        assert_eq!(inv, inv_before);
    }

    #[test]
    fn precondition_rejections() {
        let mut grid = CraftingGrid::new();
        let mut inv = PlayerInventory::new();
        grid.set(0, Some(stack(ItemType::Dirt, 2)));
        let dirt = stack(ItemType::Dirt, 2);

        let cases = [
            (drag(SlotRef::grid(0), SlotRef::grid(0), dirt), TransferRejected::SameSlot),
            (
                drag(SlotRef::grid(0), SlotRef::grid(9), dirt),
                TransferRejected::InvalidSlot {
                    area: Area::Grid,
                    index: 9,
                },
            ),
            (
                drag(SlotRef::grid(0), SlotRef::hotbar(9), dirt),
                TransferRejected::InvalidSlot {
                    area: Area::Hotbar,
                    index: 9,
                },
            ),
            (drag(SlotRef::grid(1), SlotRef::grid(2), dirt), TransferRejected::EmptySource),
            (
                drag(SlotRef::grid(0), SlotRef::grid(2), stack(ItemType::Dirt, 5)),
                TransferRejected::SourceChanged,
            ),
        ];

        for (transfer, expected) in cases {
            assert_eq!(resolve_transfer(&transfer, &mut grid, &mut inv), Err(expected));
        }
        assert_eq!(grid.get(0).copied(), Some(dirt));
        assert!(inv.arena().is_empty());
    }

    #[test]
    fn inventory_screen_has_no_grid() {
        let mut inv = PlayerInventory::new();
        inv.set(Window::Hotbar, 0, Some(stack(ItemType::Stone, 4)));

        let err = resolve_inventory_transfer(
            &drag(SlotRef::hotbar(0), SlotRef::grid(0), stack(ItemType::Stone, 4)),
            &mut inv,
        )
        .unwrap_err();
        assert_eq!(err, TransferRejected::UnrecognizedTarget { area: Area::Grid });

        let outcome = resolve_inventory_transfer(
            &drag(SlotRef::hotbar(0), SlotRef::hotbar(8), stack(ItemType::Stone, 4)),
            &mut inv,
        )
        .unwrap();
        assert_eq!(outcome, TransferOutcome::Moved { count: 4 });
        assert_eq!(inv.get(Window::Hotbar, 8).map(|s| s.count), Some(4));
    }
}
