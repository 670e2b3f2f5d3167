//! Crafting error types.

use blockcraft_core::ItemType;
use thiserror::Error;

/// Errors surfaced by a craft request. A grid that matches no recipe is not
/// an error; lookups return `None` instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CraftError {
    /// The recipe matched earlier but the grid no longer supports a single craft.
    #[error("recipe `{recipe}` is not currently craftable")]
    NotCraftable {
        /// Recipe that was requested.
        recipe: String,
    },
    /// The craft would produce more units than can be counted.
    #[error("recipe `{recipe}` crafted {multiplier} times overflows its output count")]
    OutputOverflow {
        /// Recipe that was requested.
        recipe: String,
        /// Number of crafts planned.
        multiplier: u32,
    },
    /// Planner and executor disagree on what the grid holds.
    ///
    /// Unreachable with a plan computed against the current grid; the grid is
    /// left untouched when it happens.
    #[error(
        "consumption plan for `{recipe}` needs {required} {item} but the grid has {available}"
    )]
    ConsumptionInvariantViolation {
        /// Recipe being executed.
        recipe: String,
        /// Item whose consumption could not be satisfied.
        item: ItemType,
        /// Units the plan expected to remove.
        required: u32,
        /// Units actually available.
        available: u32,
    },
}

/// Result type for crafting operations.
pub type CraftResult<T> = Result<T, CraftError>;
