//! Transactional craft execution.
//!
//! A plan is validated against the grid in full before anything is removed,
//! so a rejected craft leaves every slot exactly as it was.

use blockcraft_core::{CraftingGrid, ItemType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::error::{CraftError, CraftResult};
use crate::planner::{plan_craft, CraftPlan, CraftScale};
use crate::recipe::Recipe;

/// Items produced by a successful craft.
///
/// `count` may exceed the stack limit when the multiplier is large; the
/// caller splits it across slots when inserting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CraftOutput {
    /// Recipe that ran.
    pub recipe: String,
    /// Item produced.
    pub item: ItemType,
    /// Units produced (`result_count * multiplier`).
    pub count: u32,
    /// Number of crafts performed.
    pub multiplier: u32,
}

/// Apply a plan to the grid and report what it produced.
pub fn execute(plan: &CraftPlan<'_>, grid: &mut CraftingGrid) -> CraftResult<CraftOutput> {
    let recipe = plan.recipe();
    if !plan.is_craftable() {
        return Err(CraftError::NotCraftable {
            recipe: recipe.id.clone(),
        });
    }

    let Some(count) = plan.output_count() else {
        return Err(CraftError::OutputOverflow {
            recipe: recipe.id.clone(),
            multiplier: plan.multiplier(),
        });
    };
    validate(plan, grid)?;

    for (slot, take) in plan.consumption().iter().enumerate() {
        if let Some(take) = take {
            grid.remove_from(slot, take.count);
        }
    }

    let output = CraftOutput {
        recipe: recipe.id.clone(),
        item: recipe.result,
        count,
        multiplier: plan.multiplier(),
    };
    info!(
        recipe = %output.recipe,
        multiplier = output.multiplier,
        produced = output.count,
        item = %output.item,
        "Crafted"
    );
    Ok(output)
}

/// Plan and execute in one step.
pub fn craft(recipe: &Recipe, grid: &mut CraftingGrid, scale: CraftScale) -> CraftResult<CraftOutput> {
    let plan = plan_craft(recipe, grid, scale);
    execute(&plan, grid)
}

fn validate(plan: &CraftPlan<'_>, grid: &CraftingGrid) -> CraftResult<()> {
    let recipe = plan.recipe();
    let violation = |item, required, available| CraftError::ConsumptionInvariantViolation {
        recipe: recipe.id.clone(),
        item,
        required,
        available,
    };

    let mut planned: BTreeMap<ItemType, u32> = BTreeMap::new();
    for (slot, take) in plan.consumption().iter().enumerate() {
        let Some(take) = take else {
            continue;
        };
        let available = grid
            .get(slot)
            .filter(|stack| stack.item == take.item)
            .map_or(0, |stack| stack.count);
        if available < take.count {
            return Err(violation(take.item, take.count, available));
        }
        let total = planned.entry(take.item).or_insert(0);
        *total = total.saturating_add(take.count);
    }

    // Every required kind must be fully covered by the per-slot plan.
    for (item, need) in recipe.pattern.requirements() {
        let required = need.saturating_mul(plan.multiplier());
        let covered = planned.get(&item).copied().unwrap_or(0);
        if covered != required {
            return Err(violation(item, required, covered));
        }
    }

    Ok(())
}
