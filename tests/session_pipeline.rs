use blockcraft_core::{ItemStack, ItemType, PlayerInventory, Window};
use blockcraft_crafting::{CraftScale, RecipeBook};
use blockcraft_session::{CraftingSession, GestureResult, SlotRef, TransferRejected};
use blockcraft_testkit::{inventory_with, total_items};

const RECIPES: &str = include_str!("../config/recipes.json");

fn drag(
    session: &mut CraftingSession<'_>,
    inventory: &mut PlayerInventory,
    from: SlotRef,
    to: SlotRef,
) -> GestureResult {
    assert!(session.begin_drag(from, inventory), "nothing to drag at {from}");
    session.end_drag(Some(to), inventory)
}

#[test]
fn shipped_recipe_file_matches_builtin_table() {
    let loaded = RecipeBook::load_from_str(RECIPES).expect("recipes should parse");
    let builtin = RecipeBook::with_defaults();
    assert_eq!(
        loaded.iter().collect::<Vec<_>>(),
        builtin.iter().collect::<Vec<_>>()
    );
}

#[test]
fn wood_to_sticks_round_trip() {
    let book = RecipeBook::load_from_str(RECIPES).expect("recipes should parse");
    let mut inventory = inventory_with(&[(3, ItemType::Wood, 2)]);

    let mut session = CraftingSession::open(&book);
    drag(&mut session, &mut inventory, SlotRef::hotbar(3), SlotRef::grid(0));
    let receipt = session
        .craft(CraftScale::One, &mut inventory)
        .expect("craft succeeds")
        .expect("planks match");
    assert_eq!(receipt.output.item, ItemType::Planks);

    // Planks land in hotbar slot 0; lay two of them out as a stick.
    assert_eq!(
        inventory.get(Window::Hotbar, 0).copied(),
        Some(ItemStack::new(ItemType::Planks, 4))
    );
    drag(&mut session, &mut inventory, SlotRef::hotbar(0), SlotRef::grid(1));
    drag(&mut session, &mut inventory, SlotRef::hotbar(0), SlotRef::grid(4));
    assert_eq!(session.current_recipe().map(|r| r.id.as_str()), Some("stick"));

    // A third plank in the corner turns it into nothing.
    drag(&mut session, &mut inventory, SlotRef::hotbar(0), SlotRef::grid(8));
    assert!(session.current_recipe().is_none());
    let back = drag(&mut session, &mut inventory, SlotRef::grid(8), SlotRef::inventory(0));
    assert!(matches!(back, GestureResult::Resolved(_)));
    assert_eq!(session.current_recipe().map(|r| r.id.as_str()), Some("stick"));

    session
        .craft(CraftScale::Max, &mut inventory)
        .expect("craft succeeds")
        .expect("stick match");
    let report = session.close(&mut inventory);

    assert!(report.undelivered.is_empty());
    assert_eq!(inventory.count_item(ItemType::Stick), 4);
    assert_eq!(inventory.count_item(ItemType::Planks), 2);
    assert_eq!(inventory.count_item(ItemType::Wood), 1);
}

#[test]
fn rejected_drop_keeps_both_containers() {
    let book = RecipeBook::with_defaults();
    let mut inventory = inventory_with(&[(0, ItemType::Sand, 4), (1, ItemType::Dirt, 4)]);
    let mut session = CraftingSession::open(&book);
    drag(&mut session, &mut inventory, SlotRef::hotbar(0), SlotRef::grid(2));
    let before = inventory.clone();
    let grid_before = session.grid().clone();
    let units = total_items(&grid_before, &before);

    let result = drag(&mut session, &mut inventory, SlotRef::hotbar(1), SlotRef::grid(2));

    assert_eq!(result, GestureResult::Rejected(TransferRejected::TargetOccupied));
    assert_eq!(inventory, before);
    assert_eq!(session.grid(), &grid_before);
    assert_eq!(total_items(session.grid(), &inventory), units);
    let _ = session.close(&mut inventory);
    assert_eq!(inventory.count_item(ItemType::Sand), 4);
}
