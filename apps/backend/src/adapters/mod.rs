//! Adapters for the external collaborators the coordinator consumes:
//! the item catalog and the game record store.

pub mod item_source;
pub mod record_store;

pub use item_source::{HttpItemSource, ItemSource};
pub use record_store::{GameRecordStore, HttpRecordStore};
