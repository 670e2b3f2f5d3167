use blockcraft_core::{ItemStack, ItemType, PlayerInventory, HOTBAR_SIZE, PLAYER_SLOTS, STACK_LIMIT};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::warn;

pub const DEFAULT_SESSION_PATH: &str = "config/session.toml";

/// One pre-filled arena slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct LoadoutEntry {
    /// Arena slot (0-8 hotbar, 9-35 main inventory).
    pub slot: usize,
    pub item: ItemType,
    pub count: u32,
}

impl LoadoutEntry {
    const fn new(slot: usize, item: ItemType, count: u32) -> Self {
        Self { slot, item, count }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Starting inventory contents.
    pub loadout: Vec<LoadoutEntry>,
    /// Recipe table to load instead of the built-in one.
    pub recipes: Option<PathBuf>,
    /// Hotbar slot selected at start.
    pub selected_hotbar: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            loadout: vec![
                LoadoutEntry::new(0, ItemType::Dirt, 10),
                LoadoutEntry::new(1, ItemType::Grass, 10),
                LoadoutEntry::new(2, ItemType::Stone, 10),
                LoadoutEntry::new(3, ItemType::Wood, 64),
                LoadoutEntry::new(4, ItemType::Sand, 10),
                LoadoutEntry::new(5, ItemType::Stone, 10),
                LoadoutEntry::new(6, ItemType::CraftingTable, 1),
                LoadoutEntry::new(7, ItemType::Planks, 20),
                LoadoutEntry::new(8, ItemType::Stone, 10),
            ],
            recipes: None,
            selected_hotbar: 0,
        }
    }
}

impl SessionConfig {
    /// Load session configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_SESSION_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<SessionConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    SessionConfig::default()
                }
            },
            Err(err) => {
                if path != Path::new(DEFAULT_SESSION_PATH)
                    || err.kind() != std::io::ErrorKind::NotFound
                {
                    warn!("Failed to read {}: {err}. Using defaults", path.display());
                } else {
                    warn!(
                        "Session config not found at {}. Using defaults",
                        path.display()
                    );
                }
                SessionConfig::default()
            }
        }
    }

    /// Build the starting inventory. Entries that cannot be placed are skipped.
    pub fn starting_inventory(&self) -> PlayerInventory {
        let mut inventory = PlayerInventory::new();
        for entry in &self.loadout {
            if entry.slot >= PLAYER_SLOTS {
                warn!(slot = entry.slot, "Loadout slot out of range, skipping");
                continue;
            }
            if entry.count == 0 || entry.count > STACK_LIMIT {
                warn!(
                    slot = entry.slot,
                    count = entry.count,
                    "Loadout count outside 1..={STACK_LIMIT}, skipping"
                );
                continue;
            }
            inventory
                .arena_mut()
                .set(entry.slot, Some(ItemStack::new(entry.item, entry.count)));
        }

        if !inventory.select_hotbar(self.selected_hotbar) {
            warn!(
                slot = self.selected_hotbar,
                "Selected hotbar slot must be below {HOTBAR_SIZE}, using 0"
            );
        }
        inventory
    }
}
