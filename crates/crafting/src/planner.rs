//! Craft planning: how many times a recipe can run and what each slot gives up.

use blockcraft_core::{CraftingGrid, ItemStack, GRID_SIZE};
use serde::{Deserialize, Serialize};

use crate::recipe::{Recipe, RecipePattern};

/// How many crafts a single request performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraftScale {
    /// Craft once (plain click).
    #[default]
    One,
    /// Craft as many times as the grid allows (shift-click).
    Max,
}

/// Derived, ephemeral plan for one craft request.
///
/// Recomputed on every attempt; never stored across grid mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftPlan<'a> {
    recipe: &'a Recipe,
    multiplier: u32,
    consumption: [Option<ItemStack>; GRID_SIZE],
}

impl<'a> CraftPlan<'a> {
    /// Recipe this plan executes.
    pub fn recipe(&self) -> &'a Recipe {
        self.recipe
    }

    /// Number of simultaneous crafts. Zero means "not craftable".
    pub fn multiplier(&self) -> u32 {
        self.multiplier
    }

    /// Units to remove from each grid slot.
    pub fn consumption(&self) -> &[Option<ItemStack>; GRID_SIZE] {
        &self.consumption
    }

    /// Check whether the plan performs at least one craft.
    pub fn is_craftable(&self) -> bool {
        self.multiplier > 0
    }

    /// Units the plan produces, or `None` if that does not fit in `u32`.
    pub fn output_count(&self) -> Option<u32> {
        self.recipe.result_count.checked_mul(self.multiplier)
    }
}

/// Largest multiplier the current grid supports for `recipe`.
///
/// Shapeless: the minimum over required kinds of `provided / required`.
/// Shaped: every required cell must still hold its kind with at least the
/// per-craft count, then the minimum over cells of `count / required`.
/// A recipe with no requirements yields zero.
pub fn compute_max_multiplier(recipe: &Recipe, grid: &CraftingGrid) -> u32 {
    match &recipe.pattern {
        RecipePattern::Shapeless(_) => recipe
            .pattern
            .requirements()
            .into_iter()
            .map(|(item, need)| grid.count_item(item).checked_div(need).unwrap_or(0))
            .min()
            .unwrap_or(0),
        RecipePattern::Shaped(cells) => {
            let mut multiplier: Option<u32> = None;
            for (slot, required) in cells.iter().enumerate() {
                let Some(required) = required else {
                    continue;
                };
                let ratio = match grid.get(slot) {
                    Some(stack) if stack.item == required.item && stack.count >= required.count => {
                        stack.count.checked_div(required.count).unwrap_or(0)
                    }
                    _ => return 0,
                };
                multiplier = Some(multiplier.map_or(ratio, |m| m.min(ratio)));
            }
            multiplier.unwrap_or(0)
        }
    }
}

/// Build the consumption plan for one craft request.
///
/// Shaped recipes consume `required * multiplier` from each required cell.
/// Shapeless recipes drain each required kind greedily from the lowest slot
/// index upward until the total for that kind is met.
pub fn plan_craft<'a>(recipe: &'a Recipe, grid: &CraftingGrid, scale: CraftScale) -> CraftPlan<'a> {
    let max = compute_max_multiplier(recipe, grid);
    let multiplier = match scale {
        CraftScale::One => max.min(1),
        CraftScale::Max => max,
    };

    let mut consumption = [None; GRID_SIZE];
    if multiplier > 0 {
        match &recipe.pattern {
            RecipePattern::Shaped(cells) => {
                for (slot, required) in cells.iter().enumerate() {
                    if let Some(required) = required {
                        consumption[slot] =
                            Some(ItemStack::new(required.item, required.count * multiplier));
                    }
                }
            }
            RecipePattern::Shapeless(_) => {
                for (item, need) in recipe.pattern.requirements() {
                    let mut remaining = need * multiplier;
                    for (slot, stack) in grid.occupied() {
                        if remaining == 0 {
                            break;
                        }
                        if stack.item != item {
                            continue;
                        }
                        let take = remaining.min(stack.count);
                        consumption[slot] = Some(ItemStack::new(item, take));
                        remaining -= take;
                    }
                }
            }
        }
    }

    CraftPlan {
        recipe,
        multiplier,
        consumption,
    }
}
