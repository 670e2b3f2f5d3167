//! Recipe definitions and the ordered recipe table.
//!
//! Lookup is a linear scan in declaration order and the first match wins, so
//! the order recipes are added in is part of their meaning.

use anyhow::{bail, Context, Result};
use blockcraft_core::{CraftingGrid, ItemType, GRID_SIZE, STACK_LIMIT};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::matcher;

/// One required ingredient: an item kind and the units needed per craft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Item required for crafting.
    #[serde(alias = "type")]
    pub item: ItemType,
    /// Units of this item consumed by one craft.
    #[serde(default = "default_ingredient_count")]
    pub count: u32,
}

fn default_ingredient_count() -> u32 {
    1
}

impl Ingredient {
    /// Ingredient requiring `count` units.
    pub fn new(item: ItemType, count: u32) -> Self {
        Self { item, count }
    }

    /// Ingredient requiring a single unit.
    pub fn one(item: ItemType) -> Self {
        Self::new(item, 1)
    }
}

/// How a recipe's ingredients are laid out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecipePattern {
    /// Nine row-major cells; `None` cells must be empty in the grid.
    Shaped([Option<Ingredient>; GRID_SIZE]),
    /// Ingredient multiset with no positional meaning.
    Shapeless(Vec<Ingredient>),
}

impl RecipePattern {
    /// Whether position is ignored when matching.
    pub fn is_shapeless(&self) -> bool {
        matches!(self, RecipePattern::Shapeless(_))
    }

    /// Iterate over every required ingredient.
    pub fn ingredients(&self) -> Box<dyn Iterator<Item = &Ingredient> + '_> {
        match self {
            RecipePattern::Shaped(cells) => Box::new(cells.iter().flatten()),
            RecipePattern::Shapeless(list) => Box::new(list.iter()),
        }
    }

    /// Units required per item kind for one craft, summed over the pattern.
    ///
    /// Saturates at `u32::MAX`; a saturated kind can never be satisfied.
    pub fn requirements(&self) -> BTreeMap<ItemType, u32> {
        let mut required = BTreeMap::new();
        for ingredient in self.ingredients() {
            let total = required.entry(ingredient.item).or_insert(0u32);
            *total = total.saturating_add(ingredient.count);
        }
        required
    }

    /// Total units required for one craft, or `None` if it overflows `u32`.
    pub fn total_required(&self) -> Option<u32> {
        self.ingredients()
            .try_fold(0u32, |total, ingredient| total.checked_add(ingredient.count))
    }
}

/// Largest `result_count` a recipe may declare. The output of a full grid of
/// full stacks, one unit per craft, still fits in `u32`.
pub const MAX_RESULT_COUNT: u32 = u32::MAX / (STACK_LIMIT * GRID_SIZE as u32);

/// Crafting recipe definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    /// Unique recipe identifier (e.g., "crafting_table").
    pub id: String,
    /// Ingredient layout.
    pub pattern: RecipePattern,
    /// Item produced by this recipe.
    pub result: ItemType,
    /// Units produced by one craft.
    pub result_count: u32,
}

impl Recipe {
    /// Create a shaped recipe from nine row-major cells.
    pub fn shaped(
        id: impl Into<String>,
        cells: [Option<Ingredient>; GRID_SIZE],
        result: ItemType,
        result_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            pattern: RecipePattern::Shaped(cells),
            result,
            result_count,
        }
    }

    /// Create a shapeless recipe.
    pub fn shapeless(
        id: impl Into<String>,
        ingredients: Vec<Ingredient>,
        result: ItemType,
        result_count: u32,
    ) -> Self {
        Self {
            id: id.into(),
            pattern: RecipePattern::Shapeless(ingredients),
            result,
            result_count,
        }
    }

    /// Whether position is ignored when matching.
    pub fn is_shapeless(&self) -> bool {
        self.pattern.is_shapeless()
    }

    /// Check whether the grid satisfies this recipe at least once.
    pub fn matches(&self, grid: &CraftingGrid) -> bool {
        matcher::matches(self, grid)
    }

    fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            bail!("recipe id must not be empty");
        }
        if self.result_count == 0 {
            bail!("recipe `{}` must produce at least one item", self.id);
        }
        if self.result_count > MAX_RESULT_COUNT {
            bail!(
                "recipe `{}` produces {} items, at most {MAX_RESULT_COUNT} allowed",
                self.id,
                self.result_count
            );
        }
        for ingredient in self.pattern.ingredients() {
            if ingredient.count == 0 {
                bail!("recipe `{}` has an ingredient with count 0", self.id);
            }
            // A cell never holds more than one stack.
            if ingredient.count > STACK_LIMIT {
                bail!(
                    "recipe `{}` needs {} {} in one cell, at most {STACK_LIMIT} allowed",
                    self.id,
                    ingredient.count,
                    ingredient.item
                );
            }
        }
        match self.pattern.total_required() {
            None => bail!("recipe `{}` requires more items than can be counted", self.id),
            Some(0) => bail!("recipe `{}` requires no ingredients", self.id),
            Some(_) => Ok(()),
        }
    }
}

/// On-disk recipe format, one entry per recipe.
#[derive(Debug, Deserialize)]
struct RecipeDef {
    id: String,
    #[serde(default)]
    shapeless: bool,
    pattern: Vec<Option<Ingredient>>,
    result: ItemType,
    count: u32,
}

impl RecipeDef {
    fn into_recipe(self) -> Result<Recipe> {
        let recipe = if self.shapeless {
            Recipe::shapeless(
                self.id,
                self.pattern.into_iter().flatten().collect(),
                self.result,
                self.count,
            )
        } else {
            let cells: [Option<Ingredient>; GRID_SIZE] =
                self.pattern.try_into().map_err(|cells: Vec<_>| {
                    anyhow::anyhow!(
                        "shaped pattern must have {GRID_SIZE} cells, got {}",
                        cells.len()
                    )
                })?;
            Recipe::shaped(self.id, cells, self.result, self.count)
        };
        recipe.validate()?;
        Ok(recipe)
    }
}

/// Ordered recipe table.
#[derive(Debug, Clone, Default)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
}

impl RecipeBook {
    /// Create a new empty recipe book.
    pub fn new() -> Self {
        Self {
            recipes: Vec::new(),
        }
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON string, preserving file order as priority.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let defs: Vec<RecipeDef> =
            serde_json::from_str(content).context("Failed to parse recipe JSON")?;

        let mut book = Self::new();
        for def in defs {
            let id = def.id.clone();
            let recipe = def
                .into_recipe()
                .with_context(|| format!("Invalid recipe `{id}`"))?;
            book.add_recipe(recipe)?;
        }

        Ok(book)
    }

    /// Append a recipe at the lowest priority.
    pub fn add_recipe(&mut self, recipe: Recipe) -> Result<()> {
        recipe.validate()?;
        if self.get(&recipe.id).is_some() {
            bail!("recipe `{}` is already registered", recipe.id);
        }
        self.recipes.push(recipe);
        Ok(())
    }

    /// Get a recipe by ID.
    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.recipes.iter().find(|recipe| recipe.id == id)
    }

    /// Recipes in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &Recipe> {
        self.recipes.iter()
    }

    /// Count total number of recipes.
    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    /// Check if the book holds no recipes.
    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// First recipe, in priority order, satisfied by the grid.
    pub fn find_match(&self, grid: &CraftingGrid) -> Option<&Recipe> {
        matcher::find_matching_recipe(self, grid)
    }

    /// Create a recipe book with the default table.
    ///
    /// Priority order:
    /// - Planks (shapeless, 1 wood -> 4 planks)
    /// - Sticks (planks stacked vertically in the middle column -> 4 sticks)
    /// - Crafting table (2x2 planks in the top-left corner)
    pub fn with_defaults() -> Self {
        let planks = Some(Ingredient::one(ItemType::Planks));

        Self {
            recipes: vec![
                Recipe::shapeless(
                    "planks",
                    vec![Ingredient::one(ItemType::Wood)],
                    ItemType::Planks,
                    4,
                ),
                Recipe::shaped(
                    "stick",
                    [
                        None, planks, None, //
                        None, planks, None, //
                        None, None, None,
                    ],
                    ItemType::Stick,
                    4,
                ),
                Recipe::shaped(
                    "crafting_table",
                    [
                        planks, planks, None, //
                        planks, planks, None, //
                        None, None, None,
                    ],
                    ItemType::CraftingTable,
                    1,
                ),
            ],
        }
    }
}
