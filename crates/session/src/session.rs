//! Crafting and inventory screens.
//!
//! A [`CraftingSession`] owns the grid for as long as the crafting screen is
//! open and borrows the player inventory per event. The current recipe match
//! is recomputed after every grid mutation, so it always reflects the grid
//! the next event will see.

use blockcraft_core::{CraftingGrid, InsertReport, ItemStack, PlayerInventory};
use blockcraft_crafting::{
    compute_max_multiplier, craft, CraftOutput, CraftResult, CraftScale, Recipe, RecipeBook,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::drag::{CancelReason, DragController, DragEnd};
use crate::transfer::{
    resolve_inventory_transfer, resolve_transfer, DndTransfer, SlotRef, TransferOutcome,
    TransferRejected,
};

/// Result of finishing a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureResult {
    /// The transfer was applied.
    Resolved(TransferOutcome),
    /// The transfer was refused; nothing changed.
    Rejected(TransferRejected),
    /// The gesture ended without a transfer.
    Cancelled(CancelReason),
    /// No gesture was in progress.
    NotDragging,
}

fn finish(
    end: Option<DragEnd>,
    resolve: impl FnOnce(&DndTransfer) -> Result<TransferOutcome, TransferRejected>,
) -> GestureResult {
    match end {
        None => GestureResult::NotDragging,
        Some(DragEnd::Cancelled(reason)) => {
            debug!(?reason, "Drag cancelled");
            GestureResult::Cancelled(reason)
        }
        Some(DragEnd::Drop(transfer)) => match resolve(&transfer) {
            Ok(outcome) => GestureResult::Resolved(outcome),
            Err(reason) => GestureResult::Rejected(reason),
        },
    }
}

/// Output of a craft and where it ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CraftReceipt {
    /// What the craft produced.
    pub output: CraftOutput,
    /// How much of it the inventory accepted.
    pub delivered: InsertReport,
}

/// Result of draining the grid into the inventory on close.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CloseReport {
    /// Units moved into the inventory.
    pub returned: u32,
    /// Stacks the inventory could not accept, in grid order.
    pub undelivered: Vec<ItemStack>,
}

/// The open crafting screen.
#[derive(Debug)]
#[must_use = "close the session to return grid contents to the inventory"]
pub struct CraftingSession<'r> {
    book: &'r RecipeBook,
    grid: CraftingGrid,
    drag: DragController,
    current: Option<&'r Recipe>,
}

impl<'r> CraftingSession<'r> {
    /// Open a crafting screen with an empty grid.
    pub fn open(book: &'r RecipeBook) -> Self {
        Self {
            book,
            grid: CraftingGrid::new(),
            drag: DragController::new(),
            current: None,
        }
    }

    /// Current grid contents.
    pub fn grid(&self) -> &CraftingGrid {
        &self.grid
    }

    /// Recipe the grid currently satisfies.
    pub fn current_recipe(&self) -> Option<&'r Recipe> {
        self.current
    }

    /// How many times the current recipe could be crafted right now.
    pub fn max_multiplier(&self) -> u32 {
        self.current
            .map_or(0, |recipe| compute_max_multiplier(recipe, &self.grid))
    }

    /// Single-craft result shown in the output slot.
    pub fn preview(&self) -> Option<ItemStack> {
        self.current
            .map(|recipe| ItemStack::new(recipe.result, recipe.result_count))
    }

    /// Whether a drag gesture is in progress.
    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Pick up the stack at `source`.
    pub fn begin_drag(&mut self, source: SlotRef, inventory: &PlayerInventory) -> bool {
        let observed = match source.area.window() {
            Some(window) => inventory.get(window, source.index),
            None => self.grid.get(source.index),
        };
        self.drag.begin(source, observed)
    }

    /// Drop the dragged stack on `target` (or nowhere).
    pub fn end_drag(
        &mut self,
        target: Option<SlotRef>,
        inventory: &mut PlayerInventory,
    ) -> GestureResult {
        let end = self.drag.end(target);
        finish(end, |transfer| self.transfer(transfer, inventory))
    }

    /// Abort the current gesture without touching any slot.
    pub fn cancel_drag(&mut self) -> GestureResult {
        match self.drag.cancel() {
            Some(DragEnd::Cancelled(reason)) => GestureResult::Cancelled(reason),
            _ => GestureResult::NotDragging,
        }
    }

    /// Resolve a transfer and re-match the grid.
    pub fn transfer(
        &mut self,
        transfer: &DndTransfer,
        inventory: &mut PlayerInventory,
    ) -> Result<TransferOutcome, TransferRejected> {
        let outcome = resolve_transfer(transfer, &mut self.grid, inventory)?;
        self.rematch();
        Ok(outcome)
    }

    /// Craft the current recipe and insert the output into the inventory.
    ///
    /// Returns `Ok(None)` when the grid matches no recipe. Units the
    /// inventory cannot hold are reported in the receipt and otherwise left
    /// to the caller.
    pub fn craft(
        &mut self,
        scale: CraftScale,
        inventory: &mut PlayerInventory,
    ) -> CraftResult<Option<CraftReceipt>> {
        let Some(recipe) = self.current else {
            debug!("Craft requested with no matching recipe");
            return Ok(None);
        };

        let crafted = craft(recipe, &mut self.grid, scale);
        self.rematch();
        let output = crafted?;

        let delivered = inventory.insert_stack(output.item, output.count);
        Ok(Some(CraftReceipt { output, delivered }))
    }

    /// Close the screen, draining every grid slot into the inventory in
    /// index order.
    pub fn close(mut self, inventory: &mut PlayerInventory) -> CloseReport {
        self.drag.cancel();

        let mut report = CloseReport::default();
        for index in 0..self.grid.len() {
            let Some(stack) = self.grid.take(index) else {
                continue;
            };
            let inserted = inventory.insert_stack(stack.item, stack.count);
            report.returned += inserted.inserted;
            if inserted.leftover > 0 {
                report.undelivered.push(stack.with_count(inserted.leftover));
            }
        }

        if report.undelivered.is_empty() {
            info!(returned = report.returned, "Crafting session closed");
        } else {
            warn!(
                returned = report.returned,
                undelivered = report.undelivered.len(),
                "Crafting session closed with items the inventory could not hold"
            );
        }
        report
    }

    fn rematch(&mut self) {
        let next = self.book.find_match(&self.grid);
        if next.map(|r| r.id.as_str()) != self.current.map(|r| r.id.as_str()) {
            debug!(
                recipe = next.map(|r| r.id.as_str()).unwrap_or("none"),
                "Recipe match changed"
            );
        }
        self.current = next;
    }
}

/// The inventory screen: hotbar and main inventory, no grid.
#[derive(Debug, Default)]
pub struct InventoryScreen {
    drag: DragController,
}

impl InventoryScreen {
    /// Open the inventory screen.
    pub fn open() -> Self {
        Self::default()
    }

    /// Pick up the stack at `source`. Grid slots cannot be picked up here.
    pub fn begin_drag(&mut self, source: SlotRef, inventory: &PlayerInventory) -> bool {
        let observed = source
            .area
            .window()
            .and_then(|window| inventory.get(window, source.index));
        self.drag.begin(source, observed)
    }

    /// Drop the dragged stack on `target` (or nowhere).
    pub fn end_drag(
        &mut self,
        target: Option<SlotRef>,
        inventory: &mut PlayerInventory,
    ) -> GestureResult {
        finish(self.drag.end(target), |transfer| {
            resolve_inventory_transfer(transfer, inventory)
        })
    }
}
