//! Item system - item kinds and stack arithmetic.
//!
//! Items are plain `(kind, count)` pairs. There is no durability or other
//! per-instance metadata, so two stacks of the same kind always merge.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum number of units a single container slot can hold.
pub const STACK_LIMIT: u32 = 64;

/// Item kind identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    /// Dirt block
    Dirt,
    /// Grass block
    Grass,
    /// Cobblestone block
    Stone,
    /// Log block
    Wood,
    /// Sand block
    Sand,
    /// Wooden planks
    Planks,
    /// Stick (crafting material, not placeable)
    Stick,
    /// Crafting table block
    CraftingTable,
}

impl ItemType {
    /// Every item kind, in declaration order.
    pub const ALL: [ItemType; 8] = [
        ItemType::Dirt,
        ItemType::Grass,
        ItemType::Stone,
        ItemType::Wood,
        ItemType::Sand,
        ItemType::Planks,
        ItemType::Stick,
        ItemType::CraftingTable,
    ];

    /// Stable snake_case name used by config and recipe files.
    pub fn name(self) -> &'static str {
        match self {
            ItemType::Dirt => "dirt",
            ItemType::Grass => "grass",
            ItemType::Stone => "stone",
            ItemType::Wood => "wood",
            ItemType::Sand => "sand",
            ItemType::Planks => "planks",
            ItemType::Stick => "stick",
            ItemType::CraftingTable => "crafting_table",
        }
    }

    /// Whether this item can be placed into the world as a block.
    pub fn is_placeable(self) -> bool {
        !matches!(self, ItemType::Stick)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unknown item name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown item kind `{0}`")]
pub struct UnknownItemType(pub String);

impl FromStr for ItemType {
    type Err = UnknownItemType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        ItemType::ALL
            .into_iter()
            .find(|item| item.name() == name)
            .ok_or_else(|| UnknownItemType(name.to_string()))
    }
}

/// A stack of items occupying one container slot.
///
/// A stack with `count == 0` is never stored: containers canonicalise it to
/// an empty slot on every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    /// Kind of item
    pub item: ItemType,
    /// Quantity in stack
    pub count: u32,
}

impl ItemStack {
    /// Create a new item stack.
    pub fn new(item: ItemType, count: u32) -> Self {
        Self { item, count }
    }

    /// Create a stack holding exactly one unit.
    pub fn single(item: ItemType) -> Self {
        Self::new(item, 1)
    }

    /// Same kind, different count.
    pub fn with_count(self, count: u32) -> Self {
        Self { count, ..self }
    }

    /// Check if this stack holds nothing.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Check if this stack is at the stack limit.
    pub fn is_full(&self) -> bool {
        self.count >= STACK_LIMIT
    }

    /// Units that can still be added before reaching the stack limit.
    pub fn remaining_space(&self) -> u32 {
        STACK_LIMIT.saturating_sub(self.count)
    }

    /// Check if this stack can merge with another stack.
    pub fn can_stack_with(&self, other: &ItemStack) -> bool {
        !self.is_empty() && !other.is_empty() && self.item == other.item
    }

    /// Add units to this stack, returning the amount that didn't fit.
    pub fn add(&mut self, amount: u32) -> u32 {
        let added = amount.min(self.remaining_space());
        self.count += added;
        amount - added
    }

    /// Remove units from this stack, returning the amount actually removed.
    pub fn remove(&mut self, amount: u32) -> u32 {
        let removed = amount.min(self.count);
        self.count -= removed;
        removed
    }
}

impl fmt::Display for ItemStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.item, self.count)
    }
}

/// True iff both slots hold a non-empty stack of the same kind.
pub fn can_stack(a: Option<&ItemStack>, b: Option<&ItemStack>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.can_stack_with(b),
        _ => false,
    }
}

/// Add `amount` to `stack`, clamping at [`STACK_LIMIT`].
///
/// Returns the resulting stack and the overflow that did not fit.
pub fn add_to_stack(stack: ItemStack, amount: u32) -> (ItemStack, u32) {
    let mut merged = stack;
    let overflow = merged.add(amount);
    (merged, overflow)
}

/// Canonicalise a slot value: zero-count stacks become `None`.
pub fn normalize(slot: Option<ItemStack>) -> Option<ItemStack> {
    slot.filter(|stack| !stack.is_empty())
}
