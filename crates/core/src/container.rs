//! Fixed-size slot containers: the 3x3 crafting grid and the player arena.
//!
//! The player arena is one backing sequence of 36 slots. The hotbar and the
//! main inventory are windows onto it (`[0, 9)` and `[9, 36)`), so a window
//! index always maps to exactly one arena slot.

use crate::item::{normalize, ItemStack, ItemType, STACK_LIMIT};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Number of slots in the crafting grid.
pub const GRID_SIZE: usize = 9;

/// Width (and height) of the crafting grid.
pub const GRID_WIDTH: usize = 3;

/// Number of slots in the hotbar window.
pub const HOTBAR_SIZE: usize = 9;

/// Number of slots in the main inventory window.
pub const MAIN_SIZE: usize = 27;

/// Number of slots in the player arena.
pub const PLAYER_SLOTS: usize = HOTBAR_SIZE + MAIN_SIZE;

/// A single container slot.
pub type Slot = Option<ItemStack>;

/// Outcome of inserting units into a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InsertReport {
    /// Units placed into the container.
    pub inserted: u32,
    /// Units that did not fit.
    pub leftover: u32,
}

impl InsertReport {
    /// True when every unit found a slot.
    pub fn is_complete(&self) -> bool {
        self.leftover == 0
    }
}

/// Ordered, fixed-length sequence of optional item stacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container<const N: usize> {
    slots: [Slot; N],
}

impl<const N: usize> Serialize for Container<N> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeSeq;
        let mut seq = serializer.serialize_seq(Some(N))?;
        for slot in &self.slots {
            seq.serialize_element(slot)?;
        }
        seq.end()
    }
}

impl<'de, const N: usize> Deserialize<'de> for Container<N> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let slots: Vec<Slot> = Vec::deserialize(deserializer)?;
        if slots.len() != N {
            return Err(serde::de::Error::custom(format!(
                "Expected {} slots, got {}",
                N,
                slots.len()
            )));
        }
        if slots.iter().flatten().any(|stack| stack.count > STACK_LIMIT) {
            return Err(serde::de::Error::custom(format!(
                "Slot count exceeds stack limit of {STACK_LIMIT}"
            )));
        }

        let slots: [Slot; N] = slots
            .into_iter()
            .map(normalize)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| serde::de::Error::custom("Failed to convert to array"))?;

        Ok(Self { slots })
    }
}

impl<const N: usize> Container<N> {
    /// Create a new empty container.
    pub fn new() -> Self {
        Self { slots: [None; N] }
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        N
    }

    /// Raw slot view.
    pub fn slots(&self) -> &[Slot; N] {
        &self.slots
    }

    /// Get the stack in a slot.
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    /// Set a slot, canonicalising zero-count stacks to empty.
    ///
    /// Returns `false` when the index is out of range.
    pub fn set(&mut self, slot: usize, stack: Slot) -> bool {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = normalize(stack);
                true
            }
            None => false,
        }
    }

    /// Take the stack out of a slot, leaving it empty.
    pub fn take(&mut self, slot: usize) -> Slot {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Remove up to `amount` units from one slot, returning the amount removed.
    pub fn remove_from(&mut self, slot: usize, amount: u32) -> u32 {
        let Some(entry) = self.slots.get_mut(slot) else {
            return 0;
        };
        let Some(stack) = entry.as_mut() else {
            return 0;
        };
        let removed = stack.remove(amount);
        *entry = normalize(*entry);
        removed
    }

    /// Swap the contents of two slots. Returns `false` if either index is out of range.
    pub fn swap(&mut self, a: usize, b: usize) -> bool {
        if a >= N || b >= N {
            return false;
        }
        self.slots.swap(a, b);
        true
    }

    /// Iterate over `(index, stack)` for occupied slots.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, &ItemStack)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|stack| (index, stack)))
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.occupied().count()
    }

    /// Count the total number of a specific item in the container.
    pub fn count_item(&self, item: ItemType) -> u32 {
        self.occupied()
            .filter(|(_, stack)| stack.item == item)
            .map(|(_, stack)| stack.count)
            .sum()
    }

    /// Total units across every slot.
    pub fn total_items(&self) -> u32 {
        self.occupied().map(|(_, stack)| stack.count).sum()
    }

    /// Check if the container is completely empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Empty every slot.
    pub fn clear(&mut self) {
        self.slots = [None; N];
    }

    /// Insert units of one item kind.
    ///
    /// Tops up existing stacks of the same kind first (lowest index first),
    /// then fills empty slots in index order. Units that fit nowhere are
    /// reported back as `leftover`; the container never exceeds the stack limit.
    pub fn insert_stack(&mut self, item: ItemType, amount: u32) -> InsertReport {
        let mut remaining = amount;

        // First pass: merge into existing stacks.
        for stack in self.slots.iter_mut().flatten() {
            if remaining == 0 {
                break;
            }
            if stack.item == item && !stack.is_full() {
                remaining = stack.add(remaining);
            }
        }

        // Second pass: open new stacks in empty slots.
        for slot in self.slots.iter_mut() {
            if remaining == 0 {
                break;
            }
            if slot.is_none() {
                let placed = remaining.min(STACK_LIMIT);
                *slot = Some(ItemStack::new(item, placed));
                remaining -= placed;
            }
        }

        InsertReport {
            inserted: amount - remaining,
            leftover: remaining,
        }
    }
}

impl<const N: usize> Default for Container<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// 3x3 crafting grid, row-major.
pub type CraftingGrid = Container<GRID_SIZE>;

impl Container<GRID_SIZE> {
    /// Slot index of a `(row, column)` cell.
    pub const fn index_of(row: usize, col: usize) -> usize {
        row * GRID_WIDTH + col
    }

    /// Get the stack at a `(row, column)` cell.
    pub fn cell(&self, row: usize, col: usize) -> Option<&ItemStack> {
        if row >= GRID_WIDTH || col >= GRID_WIDTH {
            return None;
        }
        self.get(Self::index_of(row, col))
    }
}

/// A logical window onto the player arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Window {
    /// Arena slots `[0, 9)`.
    Hotbar,
    /// Arena slots `[9, 36)`, the 27-slot inventory.
    Main,
}

impl Window {
    /// First arena slot covered by this window.
    pub const fn offset(self) -> usize {
        match self {
            Window::Hotbar => 0,
            Window::Main => HOTBAR_SIZE,
        }
    }

    /// Number of slots in this window.
    pub const fn len(self) -> usize {
        match self {
            Window::Hotbar => HOTBAR_SIZE,
            Window::Main => MAIN_SIZE,
        }
    }

    /// Map a window-local index to its arena slot.
    pub fn to_arena(self, index: usize) -> Option<usize> {
        (index < self.len()).then(|| self.offset() + index)
    }

    /// Map an arena slot back to `(window, local index)`.
    pub fn from_arena(slot: usize) -> Option<(Window, usize)> {
        match slot {
            s if s < HOTBAR_SIZE => Some((Window::Hotbar, s)),
            s if s < PLAYER_SLOTS => Some((Window::Main, s - HOTBAR_SIZE)),
            _ => None,
        }
    }
}

/// Read-only view of one window of the player arena.
#[derive(Debug, Clone, Copy)]
pub struct SlotWindow<'a> {
    window: Window,
    slots: &'a [Slot],
}

impl<'a> SlotWindow<'a> {
    /// Which window this is.
    pub fn window(&self) -> Window {
        self.window
    }

    /// Number of slots in the window.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if every slot in the window is empty.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    /// Get the stack at a window-local index.
    pub fn get(&self, index: usize) -> Option<&'a ItemStack> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// Iterate over the window's slots in local order.
    pub fn iter(&self) -> impl Iterator<Item = &'a Slot> {
        self.slots.iter()
    }
}

/// The player's 36-slot arena with hotbar selection.
///
/// Outlives any single crafting session.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerInventory {
    slots: Container<PLAYER_SLOTS>,
    #[serde(default, deserialize_with = "deserialize_hotbar_slot")]
    selected: usize,
}

fn deserialize_hotbar_slot<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let slot = usize::deserialize(deserializer)?;
    if slot >= HOTBAR_SIZE {
        return Err(serde::de::Error::custom(format!(
            "Selected hotbar slot {slot} must be below {HOTBAR_SIZE}"
        )));
    }
    Ok(slot)
}

impl PlayerInventory {
    /// Create a new empty inventory with hotbar slot 0 selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// The backing arena.
    pub fn arena(&self) -> &Container<PLAYER_SLOTS> {
        &self.slots
    }

    /// Mutable access to the backing arena.
    pub fn arena_mut(&mut self) -> &mut Container<PLAYER_SLOTS> {
        &mut self.slots
    }

    /// View one window of the arena.
    pub fn window(&self, window: Window) -> SlotWindow<'_> {
        let start = window.offset();
        SlotWindow {
            window,
            slots: &self.slots.slots()[start..start + window.len()],
        }
    }

    /// The hotbar window.
    pub fn hotbar(&self) -> SlotWindow<'_> {
        self.window(Window::Hotbar)
    }

    /// The 27-slot main inventory window.
    pub fn main(&self) -> SlotWindow<'_> {
        self.window(Window::Main)
    }

    /// Get the stack at a window-local index.
    pub fn get(&self, window: Window, index: usize) -> Option<&ItemStack> {
        window.to_arena(index).and_then(|slot| self.slots.get(slot))
    }

    /// Set a slot by window-local index.
    pub fn set(&mut self, window: Window, index: usize, stack: Slot) -> bool {
        match window.to_arena(index) {
            Some(slot) => self.slots.set(slot, stack),
            None => false,
        }
    }

    /// Insert units using the general stacking rule across the whole arena.
    pub fn insert_stack(&mut self, item: ItemType, amount: u32) -> InsertReport {
        let report = self.slots.insert_stack(item, amount);
        if !report.is_complete() {
            warn!(
                %item,
                leftover = report.leftover,
                "Inventory full, could not add every unit"
            );
        }
        report
    }

    /// Remove up to `amount` units from one arena slot.
    pub fn take_from_slot(&mut self, slot: usize, amount: u32) -> Option<ItemStack> {
        let item = self.slots.get(slot)?.item;
        let removed = self.slots.remove_from(slot, amount);
        (removed > 0).then(|| ItemStack::new(item, removed))
    }

    /// Currently selected hotbar slot (0-8).
    pub fn selected_slot(&self) -> usize {
        self.selected
    }

    /// Select a hotbar slot. Returns `false` for indices outside the hotbar.
    pub fn select_hotbar(&mut self, index: usize) -> bool {
        if index >= HOTBAR_SIZE {
            return false;
        }
        self.selected = index;
        true
    }

    /// Stack in the selected hotbar slot.
    pub fn selected_stack(&self) -> Option<&ItemStack> {
        self.get(Window::Hotbar, self.selected)
    }

    /// Consume units from the selected hotbar slot (e.g. placing a block).
    pub fn take_selected(&mut self, amount: u32) -> Option<ItemStack> {
        let slot = Window::Hotbar.to_arena(self.selected)?;
        self.take_from_slot(slot, amount)
    }

    /// Count the total number of a specific item across the arena.
    pub fn count_item(&self, item: ItemType) -> u32 {
        self.slots.count_item(item)
    }

    /// Total units across the arena.
    pub fn total_items(&self) -> u32 {
        self.slots.total_items()
    }
}
