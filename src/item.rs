use serde::Serialize;

use crate::data::ItemDefinition;

// ============================================================================
// Inventory
// ============================================================================

pub const INVENTORY_SIZE: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySlot {
    pub item_id: String,
    pub quantity: u32,
}

impl InventorySlot {
    pub fn new(item_id: &str, quantity: u32) -> Self {
        Self {
            item_id: item_id.to_string(),
            quantity,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Inventory {
    pub slots: Vec<Option<InventorySlot>>,
}

impl Inventory {
    pub fn new() -> Self {
        Self {
            slots: vec![None; INVENTORY_SIZE],
        }
    }

    /// Try to add an item to inventory. Returns the quantity that couldn't fit.
    pub fn add_item(&mut self, item: &ItemDefinition, mut quantity: u32) -> u32 {
        let max_stack = item.max_stack.max(1);

        // First, try to stack with existing items
        for slot in self.slots.iter_mut().flatten() {
            if quantity == 0 {
                break;
            }
            if slot.item_id == item.id && slot.quantity < max_stack {
                let add = quantity.min(max_stack - slot.quantity);
                slot.quantity += add;
                quantity -= add;
            }
        }

        // Then, try to find empty slots for remaining quantity
        for slot in &mut self.slots {
            if quantity == 0 {
                break;
            }
            if slot.is_none() {
                let add = quantity.min(max_stack);
                *slot = Some(InventorySlot::new(&item.id, add));
                quantity -= add;
            }
        }

        quantity
    }

    /// Total quantity of an item across all slots
    pub fn count(&self, item_id: &str) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item_id == item_id)
            .map(|s| s.quantity)
            .sum()
    }

    /// Get inventory as a serializable update
    pub fn to_update(&self) -> Vec<InventorySlotUpdate> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| {
                slot.as_ref().map(|s| InventorySlotUpdate {
                    slot: i as u8,
                    item_id: s.item_id.clone(),
                    quantity: s.quantity,
                })
            })
            .collect()
    }
}

impl Default for Inventory {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InventorySlotUpdate {
    pub slot: u8,
    pub item_id: String,
    pub quantity: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stacks_fill_before_new_slots() {
        let water = ItemDefinition::new("water", "Bottle of Water", 10);
        let mut inventory = Inventory::new();

        assert_eq!(inventory.add_item(&water, 4), 0);
        assert_eq!(inventory.add_item(&water, 8), 0);

        assert_eq!(inventory.count("water"), 12);
        assert_eq!(inventory.slots[0].as_ref().map(|s| s.quantity), Some(10));
        assert_eq!(inventory.slots[1].as_ref().map(|s| s.quantity), Some(2));
        assert_eq!(inventory.to_update().len(), 2);
    }

    #[test]
    fn test_non_stackable_takes_one_slot_each() {
        let radio = ItemDefinition::new("radio", "Radio", 1);
        let mut inventory = Inventory::new();

        inventory.add_item(&radio, 3);
        assert_eq!(inventory.count("radio"), 3);
        assert_eq!(inventory.to_update().len(), 3);
    }

    #[test]
    fn test_overflow_is_returned() {
        let radio = ItemDefinition::new("radio", "Radio", 1);
        let mut inventory = Inventory::new();

        assert_eq!(inventory.add_item(&radio, INVENTORY_SIZE as u32 + 4), 4);
        assert!(inventory.slots.iter().all(Option::is_some));
        assert_eq!(inventory.count("radio"), INVENTORY_SIZE as u32);
    }
}
