//! Recipe matching against a crafting grid snapshot.
//!
//! Shaped recipes are an "at least one craft" check per cell: surplus units
//! in a required cell are fine, but every cell the pattern leaves empty must
//! be empty in the grid.
//!
//! Shapeless recipes are stricter about what else is on the grid: the number
//! of occupied cells must equal the units required for one craft and the set
//! of kinds present must equal the set required, while each required kind
//! only needs *at least* its count. Any unrelated item anywhere on the grid
//! therefore rejects a shapeless recipe.

use blockcraft_core::{CraftingGrid, GRID_SIZE};
use std::collections::BTreeMap;
use tracing::debug;

use crate::recipe::{Ingredient, Recipe, RecipeBook, RecipePattern};

/// First recipe in `book`, in priority order, that the grid satisfies.
///
/// Pure; safe to call after every grid mutation.
pub fn find_matching_recipe<'a>(book: &'a RecipeBook, grid: &CraftingGrid) -> Option<&'a Recipe> {
    book.iter().find(|recipe| matches(recipe, grid))
}

/// Check one recipe against the grid.
pub fn matches(recipe: &Recipe, grid: &CraftingGrid) -> bool {
    match &recipe.pattern {
        RecipePattern::Shaped(cells) => matches_shaped(cells, grid),
        RecipePattern::Shapeless(ingredients) => matches_shapeless(&recipe.id, ingredients, grid),
    }
}

/// Position-by-position check with "at least" counts.
pub fn matches_shaped(cells: &[Option<Ingredient>; GRID_SIZE], grid: &CraftingGrid) -> bool {
    cells
        .iter()
        .zip(grid.slots())
        .all(|(required, provided)| match (required, provided) {
            (None, None) => true,
            (Some(required), Some(stack)) => {
                stack.item == required.item && stack.count >= required.count
            }
            _ => false,
        })
}

/// Exact cell total, exact kind set, at-least per kind.
pub fn matches_shapeless(id: &str, ingredients: &[Ingredient], grid: &CraftingGrid) -> bool {
    let mut required = BTreeMap::new();
    let mut total_required = 0u32;
    for ingredient in ingredients {
        let kind = required.entry(ingredient.item).or_insert(0u32);
        *kind = kind.saturating_add(ingredient.count);
        total_required = total_required.saturating_add(ingredient.count);
    }
    if required.is_empty() {
        return false;
    }

    let mut provided = BTreeMap::new();
    let mut occupied_cells = 0u32;
    for (_, stack) in grid.occupied() {
        let kind = provided.entry(stack.item).or_insert(0u32);
        *kind = kind.saturating_add(stack.count);
        occupied_cells += 1;
    }

    if occupied_cells != total_required {
        debug!(
            recipe = id,
            grid = occupied_cells,
            recipe_total = total_required,
            "shapeless mismatch: total count"
        );
        return false;
    }
    if provided.len() != required.len() {
        debug!(
            recipe = id,
            grid = provided.len(),
            recipe_kinds = required.len(),
            "shapeless mismatch: distinct kinds"
        );
        return false;
    }
    for (item, need) in &required {
        let have = provided.get(item).copied().unwrap_or(0);
        if have < *need {
            debug!(recipe = id, %item, have, need, "shapeless mismatch: count for kind");
            return false;
        }
    }

    true
}
