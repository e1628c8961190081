//! Domain entities - Items and the catalogs that hold them

mod catalog;
mod item;

pub use catalog::{Catalog, DuplicateId};
pub use item::{ItemRecord, ItemType};
