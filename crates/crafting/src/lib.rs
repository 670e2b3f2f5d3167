#![warn(missing_docs)]
//! Crafting engine: ordered recipe table, grid matching, multi-craft
//! planning and transactional execution.

pub mod error;
pub mod executor;
pub mod matcher;
pub mod planner;
pub mod recipe;

pub use error::{CraftError, CraftResult};
pub use executor::{craft, execute, CraftOutput};
pub use matcher::find_matching_recipe;
pub use planner::{compute_max_multiplier, plan_craft, CraftPlan, CraftScale};
pub use recipe::{Ingredient, Recipe, RecipeBook, RecipePattern, MAX_RESULT_COUNT};
