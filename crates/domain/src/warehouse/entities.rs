//! Entities owned by the warehouse aggregate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{BatchId, LocationId};

/// A registered batch of goods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batch {
    /// Batch identifier.
    pub id: BatchId,

    /// Unique batch name.
    pub name: String,

    /// Pharma batches are only moved into empty locations.
    pub is_pharma: bool,
}

impl Batch {
    /// Creates a new batch.
    pub fn new(id: BatchId, name: impl Into<String>, is_pharma: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_pharma,
        }
    }
}

impl std::fmt::Display for Batch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

/// A place in the warehouse holding quantities of batches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Location identifier.
    pub id: LocationId,

    /// Unique location name.
    pub name: String,

    quantities: BTreeMap<BatchId, u32>,
}

impl Location {
    /// Creates a new, empty location.
    pub fn new(id: LocationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            quantities: BTreeMap::new(),
        }
    }

    /// Returns true if no batch is stored here.
    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Returns the quantity of a batch stored here, or 0.
    pub fn quantity_of_batch(&self, batch_id: BatchId) -> u32 {
        self.quantities.get(&batch_id).copied().unwrap_or(0)
    }

    /// Returns true if some quantity of the batch is stored here.
    pub fn contains_batch(&self, batch_id: BatchId) -> bool {
        self.quantities.contains_key(&batch_id)
    }

    /// Returns the stored batches with their quantities, ordered by batch ID.
    pub fn batches(&self) -> impl Iterator<Item = (BatchId, u32)> + '_ {
        self.quantities.iter().map(|(id, qty)| (*id, *qty))
    }

    pub(crate) fn add_batch(&mut self, batch_id: BatchId, quantity: u32) {
        if quantity == 0 {
            return;
        }
        let entry = self.quantities.entry(batch_id).or_insert(0);
        *entry = entry.saturating_add(quantity);
    }

    /// Removing everything that is stored (or more) drops the entry.
    pub(crate) fn remove_batch(&mut self, batch_id: BatchId, quantity: u32) {
        let Some(current) = self.quantities.get_mut(&batch_id) else {
            return;
        };
        if *current > quantity {
            *current -= quantity;
        } else {
            self.quantities.remove(&batch_id);
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location() -> Location {
        Location::new(LocationId::new(1), "Receive")
    }

    #[test]
    fn test_new_location_is_empty() {
        assert!(location().is_empty());
    }

    #[test]
    fn test_location_with_batch_is_not_empty() {
        let mut location = location();
        location.add_batch(BatchId::new(3), 12);
        assert!(!location.is_empty());
    }

    #[test]
    fn test_contains_added_batch_only() {
        let mut location = location();
        location.add_batch(BatchId::new(3), 12);

        assert!(location.contains_batch(BatchId::new(3)));
        assert!(!location.contains_batch(BatchId::new(4)));
    }

    #[test]
    fn test_quantity_accumulates_adds_and_removes() {
        let mut location = location();
        location.add_batch(BatchId::new(3), 12);
        location.add_batch(BatchId::new(3), 8);
        location.remove_batch(BatchId::new(3), 5);

        assert_eq!(location.quantity_of_batch(BatchId::new(3)), 15);
    }

    #[test]
    fn test_removing_everything_drops_batch() {
        let mut location = location();
        location.add_batch(BatchId::new(3), 12);
        location.remove_batch(BatchId::new(3), 12);

        assert_eq!(location.quantity_of_batch(BatchId::new(3)), 0);
        assert!(!location.contains_batch(BatchId::new(3)));
        assert!(location.is_empty());
    }

    #[test]
    fn test_over_removal_drops_batch() {
        let mut location = location();
        location.add_batch(BatchId::new(3), 2);
        location.remove_batch(BatchId::new(3), 9);

        assert!(!location.contains_batch(BatchId::new(3)));
    }

    #[test]
    fn test_remove_unknown_batch_is_noop() {
        let mut location = location();
        location.add_batch(BatchId::new(1), 4);
        location.remove_batch(BatchId::new(2), 4);

        assert_eq!(location.batches().collect::<Vec<_>>(), vec![(BatchId::new(1), 4)]);
    }

    #[test]
    fn test_add_zero_keeps_location_empty() {
        let mut location = location();
        location.add_batch(BatchId::new(1), 0);
        assert!(location.is_empty());
    }

    #[test]
    fn test_add_saturates() {
        let mut location = location();
        location.add_batch(BatchId::new(1), u32::MAX);
        location.add_batch(BatchId::new(1), 1);
        assert_eq!(location.quantity_of_batch(BatchId::new(1)), u32::MAX);
    }

    #[test]
    fn test_display() {
        assert_eq!(location().to_string(), "Receive (1)");
        assert_eq!(
            Batch::new(BatchId::new(7), "Aspirin", true).to_string(),
            "Aspirin (7)"
        );
    }
}
