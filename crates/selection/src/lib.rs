//! SRED Selection - client-side selection (cart) store.
//!
//! The selection is the visitor's in-progress order: a list of product and
//! promo references with quantities. Several independently-mounted UI
//! surfaces (navbar counter, floating summary, cart sheet, contact-page
//! order form) all display it, so there is no single in-memory owner.
//! Instead, every mutation writes the full list to durable storage under a
//! fixed key and broadcasts a change notification; every surface re-reads
//! from storage when notified and once at its own initialization.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use sred_selection::{ItemId, ItemKind, MemoryStorage, SelectionBus, SelectionItem, SelectionStore};
//!
//! let storage = Arc::new(MemoryStorage::new());
//! let bus = SelectionBus::new();
//!
//! let mut store = SelectionStore::new(storage.clone(), bus.clone());
//! store.add(SelectionItem::new(ItemId::from(1), "Gift box", ItemKind::Product));
//!
//! // A surface mounted later converges on the same state.
//! let other = SelectionStore::new(storage, bus);
//! assert_eq!(other.count(), 1);
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

mod item;
mod storage;
mod store;

pub use item::{ItemId, ItemKind, SelectionItem};
pub use storage::{MemoryStorage, SelectionStorage};
pub use store::{SELECTION_KEY, SelectionBus, SelectionStore};
