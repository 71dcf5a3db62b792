//! The selection store and its change broadcast.

use std::sync::Arc;

use tokio::sync::broadcast;

use crate::item::{ItemId, ItemKind, SelectionItem};
use crate::storage::SelectionStorage;

/// Fixed storage key the whole selection is serialized under.
pub const SELECTION_KEY: &str = "sred_selection";

/// Capacity of the change-notification channel. Notifications carry no
/// payload, so a lagged receiver only misses coalesced wake-ups and the
/// next `refresh` still reads the latest state.
const BUS_CAPACITY: usize = 16;

/// Change-notification bus shared by every surface of one client context.
///
/// Mutating a [`SelectionStore`] publishes on the bus after persisting;
/// consumers subscribe and re-read storage on receipt.
#[derive(Clone)]
pub struct SelectionBus {
    tx: broadcast::Sender<()>,
}

impl SelectionBus {
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BUS_CAPACITY);
        Self { tx }
    }

    /// Subscribe to change notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.tx.subscribe()
    }

    fn publish(&self) {
        // No subscribers is fine - surfaces mounted later read storage on init.
        let _ = self.tx.send(());
    }
}

impl Default for SelectionBus {
    fn default() -> Self {
        Self::new()
    }
}

/// One surface's view of the visitor's selection.
///
/// Each independently-mounted surface constructs its own store over the
/// shared storage and bus. State is re-read from storage at construction
/// and on every [`refresh`](Self::refresh); mutations persist the full list
/// and then publish, so all surfaces converge within one notification
/// cycle. Concurrent writers race last-write-wins on the persisted blob.
pub struct SelectionStore {
    storage: Arc<dyn SelectionStorage>,
    bus: SelectionBus,
    items: Vec<SelectionItem>,
}

impl SelectionStore {
    /// Create a store over shared storage, reading any state persisted
    /// before this surface mounted.
    #[must_use]
    pub fn new(storage: Arc<dyn SelectionStorage>, bus: SelectionBus) -> Self {
        let items = read_items(storage.as_ref());
        Self {
            storage,
            bus,
            items,
        }
    }

    /// Re-read the selection from storage. Call on every bus notification.
    pub fn refresh(&mut self) {
        self.items = read_items(self.storage.as_ref());
    }

    /// Subscribe to change notifications for this store's bus.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.bus.subscribe()
    }

    /// Add a line to the selection.
    ///
    /// Adding an `(id, kind)` identity that is already present is a no-op:
    /// quantities change only through [`update_quantity`](Self::update_quantity),
    /// never by repeated adds.
    pub fn add(&mut self, item: SelectionItem) {
        if self.is_selected(&item.id, item.kind) {
            return;
        }
        let mut item = item;
        item.quantity = item.quantity.max(1);
        self.items.push(item);
        self.commit();
    }

    /// Remove the line matching `(id, kind)`. No-op when absent.
    pub fn remove(&mut self, id: &ItemId, kind: ItemKind) {
        let before = self.items.len();
        self.items.retain(|item| !item.matches(id, kind));
        if self.items.len() != before {
            self.commit();
        }
    }

    /// Set the quantity of the line matching `(id, kind)`, clamped to a
    /// minimum of 1. No-op when absent.
    pub fn update_quantity(&mut self, id: &ItemId, kind: ItemKind, quantity: u32) {
        let Some(item) = self.items.iter_mut().find(|item| item.matches(id, kind)) else {
            return;
        };
        item.quantity = quantity.max(1);
        self.commit();
    }

    /// Empty the selection, e.g. after a submitted order.
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    /// Whether a line with this `(id, kind)` identity exists.
    #[must_use]
    pub fn is_selected(&self, id: &ItemId, kind: ItemKind) -> bool {
        self.items.iter().any(|item| item.matches(id, kind))
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    /// Serialize the selection for attaching to an order message.
    #[must_use]
    pub fn snapshot(&self) -> String {
        serde_json::to_string(&self.items).unwrap_or_else(|_| "[]".to_owned())
    }

    /// Persist the full list, then notify every surface.
    fn commit(&self) {
        match serde_json::to_string(&self.items) {
            Ok(json) => {
                self.storage.set(SELECTION_KEY, &json);
                self.bus.publish();
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize selection");
            }
        }
    }
}

/// Read and normalize the persisted selection.
///
/// Missing or malformed data is an empty selection, never an error:
/// a visitor with a corrupted blob gets a fresh cart and a log line.
fn read_items(storage: &dyn SelectionStorage) -> Vec<SelectionItem> {
    let Some(raw) = storage.get(SELECTION_KEY) else {
        return Vec::new();
    };

    match serde_json::from_str::<Vec<SelectionItem>>(&raw) {
        Ok(items) => items
            .into_iter()
            .map(|mut item| {
                item.quantity = item.quantity.max(1);
                item
            })
            .collect(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to parse stored selection, starting empty");
            Vec::new()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn store() -> (SelectionStore, Arc<MemoryStorage>, SelectionBus) {
        let storage = Arc::new(MemoryStorage::new());
        let bus = SelectionBus::new();
        let store = SelectionStore::new(storage.clone(), bus.clone());
        (store, storage, bus)
    }

    fn product(id: i64, name: &str) -> SelectionItem {
        SelectionItem::new(ItemId::from(id), name, ItemKind::Product)
    }

    #[test]
    fn test_add_remove_clear_scenario() {
        let (mut store, _, _) = store();

        store.add(product(1, "Gift box"));
        store.add(
            SelectionItem::new(ItemId::from(2), "Spring pack", ItemKind::Promo).with_quantity(2),
        );
        assert_eq!(store.count(), 2);
        assert_eq!(store.total_items(), 3);

        store.remove(&ItemId::from(1), ItemKind::Product);
        assert_eq!(store.count(), 1);
        assert_eq!(store.total_items(), 2);

        store.clear();
        assert_eq!(store.count(), 0);
        assert_eq!(store.total_items(), 0);
    }

    #[test]
    fn test_duplicate_add_is_a_noop() {
        let (mut store, _, _) = store();

        store.add(product(1, "Gift box"));
        store.add(product(1, "Gift box").with_quantity(5));

        assert_eq!(store.count(), 1);
        assert_eq!(store.total_items(), 1);
    }

    #[test]
    fn test_same_id_different_kind_are_separate_lines() {
        let (mut store, _, _) = store();

        store.add(product(1, "Gift box"));
        store.add(SelectionItem::new(ItemId::from(1), "Gift promo", ItemKind::Promo));

        assert_eq!(store.count(), 2);
        assert!(store.is_selected(&ItemId::from(1), ItemKind::Product));
        assert!(store.is_selected(&ItemId::from(1), ItemKind::Promo));
    }

    #[test]
    fn test_update_quantity_clamps_to_one() {
        let (mut store, _, _) = store();

        store.add(product(1, "Gift box"));
        store.update_quantity(&ItemId::from(1), ItemKind::Product, 0);

        assert_eq!(store.items()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_missing_line_is_a_noop() {
        let (mut store, _, bus) = store();
        let mut rx = bus.subscribe();

        store.update_quantity(&ItemId::from(9), ItemKind::Product, 4);

        assert_eq!(store.count(), 0);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_remove_missing_line_is_a_noop() {
        let (mut store, _, _) = store();
        store.add(product(1, "Gift box"));

        store.remove(&ItemId::from(2), ItemKind::Product);
        store.remove(&ItemId::from(1), ItemKind::Promo);

        assert_eq!(store.count(), 1);
    }

    #[test]
    fn test_invariants_hold_across_mutation_sequences() {
        let (mut store, _, _) = store();

        store.add(product(1, "A"));
        store.add(product(2, "B").with_quantity(0));
        store.add(product(1, "A again"));
        store.update_quantity(&ItemId::from(2), ItemKind::Product, 7);
        store.update_quantity(&ItemId::from(1), ItemKind::Product, 0);
        store.remove(&ItemId::from(3), ItemKind::Product);

        let mut seen = std::collections::HashSet::new();
        for item in store.items() {
            assert!(item.quantity >= 1);
            assert!(seen.insert((item.id.clone(), item.kind)));
        }
    }

    #[test]
    fn test_mutation_notifies_and_other_surface_converges() {
        let storage = Arc::new(MemoryStorage::new());
        let bus = SelectionBus::new();
        let mut writer = SelectionStore::new(storage.clone(), bus.clone());
        let mut reader = SelectionStore::new(storage, bus);
        let mut rx = reader.subscribe();

        writer.add(product(1, "Gift box").with_quantity(3));

        assert!(rx.try_recv().is_ok());
        reader.refresh();
        assert_eq!(reader.items(), writer.items());
    }

    #[test]
    fn test_late_mounted_surface_reads_existing_state() {
        let storage = Arc::new(MemoryStorage::new());
        let bus = SelectionBus::new();
        let mut first = SelectionStore::new(storage.clone(), bus.clone());
        first.add(product(1, "Gift box"));

        let second = SelectionStore::new(storage, bus);
        assert_eq!(second.count(), 1);
        assert!(second.is_selected(&ItemId::from(1), ItemKind::Product));
    }

    #[test]
    fn test_malformed_stored_data_reads_as_empty() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(SELECTION_KEY, "{not json");

        let store = SelectionStore::new(storage, SelectionBus::new());
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn test_legacy_entries_without_quantity_normalize_on_read() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set(
            SELECTION_KEY,
            r#"[{"id":1,"name":"Gift box","type":"product"},
                {"id":"ribbon","name":"Ribbon","type":"promo","quantity":4}]"#,
        );

        let store = SelectionStore::new(storage, SelectionBus::new());
        assert_eq!(store.count(), 2);
        assert_eq!(store.total_items(), 5);
    }

    #[test]
    fn test_persist_reload_roundtrip() {
        let storage = Arc::new(MemoryStorage::new());
        let bus = SelectionBus::new();
        let mut store = SelectionStore::new(storage.clone(), bus.clone());

        store.add(product(1, "Gift box").with_description("Black case"));
        store.add(
            SelectionItem::new(ItemId::from("spring"), "Spring pack", ItemKind::Promo)
                .with_quantity(2),
        );

        let reloaded = SelectionStore::new(storage, bus);
        assert_eq!(reloaded.items(), store.items());
    }
}
