use anyhow::{bail, Context, Result};
use blockcraft_core::{ItemStack, ItemType, PlayerInventory, HOTBAR_SIZE};
use blockcraft_crafting::{CraftOutput, CraftScale, RecipeBook};
use blockcraft_session::{CraftingSession, GestureResult, InventoryScreen, SlotRef};
use blockcraft_testkit::{EventRecord, JsonlSink};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fs, path::Path};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SessionScriptFile {
    steps: Vec<Step>,
}

fn one() -> u32 {
    1
}

/// One user action in a headless session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    OpenCrafting,
    /// Drag from one slot and drop on another; `to: null` drops outside any slot.
    Drag {
        from: SlotRef,
        #[serde(default)]
        to: Option<SlotRef>,
    },
    Craft {
        #[serde(default)]
        scale: CraftScale,
    },
    Close,
    SelectHotbar {
        slot: usize,
    },
    /// Place one unit of the selected hotbar stack into the world.
    UseSelected,
    /// Pick up items from the world.
    Pickup {
        item: ItemType,
        #[serde(default = "one")]
        count: u32,
    },
}

/// Load a session script from a JSON file on disk.
pub fn load_steps(path: &Path) -> Result<Vec<Step>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read session script {}", path.display()))?;
    parse_steps(&contents)
}

/// Parse a session script from an in-memory JSON string.
pub fn parse_steps(contents: &str) -> Result<Vec<Step>> {
    let file: SessionScriptFile =
        serde_json::from_str(contents).context("Failed to parse session script JSON")?;
    if file.steps.is_empty() {
        bail!("session script contains no steps");
    }
    for (index, step) in file.steps.iter().enumerate() {
        match step {
            Step::SelectHotbar { slot } if *slot >= HOTBAR_SIZE => {
                bail!("step {index}: hotbar slot {slot} must be below {HOTBAR_SIZE}")
            }
            Step::Pickup { count: 0, .. } => bail!("step {index}: pickup count must be positive"),
            _ => {}
        }
    }
    Ok(file.steps)
}

/// Final state of a headless run.
#[derive(Debug, Serialize)]
pub struct RunReport {
    pub steps: u64,
    pub crafted: Vec<CraftOutput>,
    /// Units the inventory could not accept (craft output, pickups, close drain).
    pub undelivered: Vec<ItemStack>,
    pub inventory: PlayerInventory,
}

/// Applies script steps to one player inventory.
pub struct SessionRunner<'r> {
    book: &'r RecipeBook,
    inventory: PlayerInventory,
    crafting: Option<CraftingSession<'r>>,
    screen: InventoryScreen,
    events: Option<JsonlSink>,
    step: u64,
    crafted: Vec<CraftOutput>,
    undelivered: Vec<ItemStack>,
}

impl<'r> SessionRunner<'r> {
    pub fn new(book: &'r RecipeBook, inventory: PlayerInventory) -> Self {
        Self {
            book,
            inventory,
            crafting: None,
            screen: InventoryScreen::open(),
            events: None,
            step: 0,
            crafted: Vec::new(),
            undelivered: Vec::new(),
        }
    }

    /// Record every step to a JSONL event log.
    pub fn with_events(mut self, sink: JsonlSink) -> Self {
        self.events = Some(sink);
        self
    }

    /// Run every step, then close the crafting screen if it is still open.
    pub fn run(mut self, steps: &[Step]) -> Result<RunReport> {
        for step in steps {
            self.apply(step)?;
        }
        if self.crafting.is_some() {
            debug!("Script ended with the crafting screen open, closing it");
            self.apply(&Step::Close)?;
        }
        Ok(RunReport {
            steps: self.step,
            crafted: self.crafted,
            undelivered: self.undelivered,
            inventory: self.inventory,
        })
    }

    /// Apply a single step.
    pub fn apply(&mut self, step: &Step) -> Result<()> {
        let (kind, payload) = match step {
            Step::OpenCrafting => {
                if self.crafting.is_some() {
                    bail!("step {}: crafting screen is already open", self.step);
                }
                self.crafting = Some(CraftingSession::open(self.book));
                ("open_crafting", json!({}))
            }
            Step::Drag { from, to } => ("drag", self.drag(*from, *to)),
            Step::Craft { scale } => {
                let Some(session) = self.crafting.as_mut() else {
                    bail!("step {}: craft requires an open crafting screen", self.step);
                };
                let payload = match session.craft(*scale, &mut self.inventory)? {
                    Some(receipt) => {
                        if receipt.delivered.leftover > 0 {
                            self.undelivered.push(ItemStack::new(
                                receipt.output.item,
                                receipt.delivered.leftover,
                            ));
                        }
                        let payload = serde_json::to_value(&receipt)?;
                        self.crafted.push(receipt.output);
                        payload
                    }
                    None => json!({ "status": "no_match" }),
                };
                ("craft", payload)
            }
            Step::Close => {
                let Some(session) = self.crafting.take() else {
                    bail!("step {}: no crafting screen to close", self.step);
                };
                let report = session.close(&mut self.inventory);
                let payload = serde_json::to_value(&report)?;
                self.undelivered.extend(report.undelivered);
                ("close", payload)
            }
            Step::SelectHotbar { slot } => {
                if !self.inventory.select_hotbar(*slot) {
                    bail!("step {}: hotbar slot {slot} out of range", self.step);
                }
                ("select_hotbar", json!({ "slot": slot }))
            }
            Step::UseSelected => ("use_selected", self.use_selected()),
            Step::Pickup { item, count } => {
                let report = self.inventory.insert_stack(*item, *count);
                if report.leftover > 0 {
                    self.undelivered
                        .push(ItemStack::new(*item, report.leftover));
                }
                ("pickup", serde_json::to_value(report)?)
            }
        };

        self.record(kind, &payload)?;
        self.step += 1;
        Ok(())
    }

    fn drag(&mut self, from: SlotRef, to: Option<SlotRef>) -> Value {
        let result = match self.crafting.as_mut() {
            Some(session) => {
                if session.begin_drag(from, &self.inventory) {
                    session.end_drag(to, &mut self.inventory)
                } else {
                    GestureResult::NotDragging
                }
            }
            None => {
                if self.screen.begin_drag(from, &self.inventory) {
                    self.screen.end_drag(to, &mut self.inventory)
                } else {
                    GestureResult::NotDragging
                }
            }
        };

        match result {
            GestureResult::Resolved(outcome) => json!({ "status": "resolved", "outcome": outcome }),
            GestureResult::Rejected(reason) => {
                json!({ "status": "rejected", "reason": reason.to_string() })
            }
            GestureResult::Cancelled(reason) => {
                json!({ "status": "cancelled", "reason": format!("{reason:?}") })
            }
            GestureResult::NotDragging => {
                json!({ "status": "ignored", "reason": format!("nothing to drag at {from}") })
            }
        }
    }

    fn use_selected(&mut self) -> Value {
        let slot = self.inventory.selected_slot();
        match self.inventory.selected_stack().copied() {
            None => json!({ "slot": slot, "placed": null }),
            Some(stack) if !stack.item.is_placeable() => {
                debug!(item = %stack.item, "Selected item cannot be placed");
                json!({ "slot": slot, "placed": null, "reason": "not_placeable" })
            }
            Some(_) => {
                let placed = self.inventory.take_selected(1);
                json!({ "slot": slot, "placed": placed })
            }
        }
    }

    fn record(&mut self, kind: &str, payload: &Value) -> Result<()> {
        info!(step = self.step, kind, %payload, "Step applied");
        if let Some(sink) = self.events.as_mut() {
            let payload = payload.to_string();
            sink.write(&EventRecord {
                step: self.step,
                kind,
                payload: &payload,
            })
            .context("Failed to write session event")?;
        }
        Ok(())
    }
}
