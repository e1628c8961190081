//! Catalog entity - the durable per-type collection of accepted items

use std::collections::HashSet;

use serde_json::Value;

use super::item::{ItemRecord, ItemType};

/// An append would have introduced a second item with the same id
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{item_type} catalog already contains id '{id}'")]
pub struct DuplicateId {
    pub item_type: ItemType,
    pub id: String,
}

/// All accepted items of one type.
///
/// Entries are kept as the raw JSON they were loaded with so fields this
/// version does not know about survive a merge untouched.
#[derive(Debug, Clone)]
pub struct Catalog {
    item_type: ItemType,
    entries: Vec<Value>,
    ids: HashSet<String>,
}

impl Catalog {
    pub fn empty(item_type: ItemType) -> Self {
        Self {
            item_type,
            entries: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Wrap entries read from storage. Ids are indexed trimmed, the same way
    /// new items are read, so hand-edited whitespace still collides.
    pub fn from_entries(item_type: ItemType, entries: Vec<Value>) -> Self {
        let ids = entries
            .iter()
            .filter_map(|entry| entry.get("id").and_then(Value::as_str))
            .map(|id| id.trim().to_string())
            .collect();

        Self {
            item_type,
            entries,
            ids,
        }
    }

    #[cfg(test)]
    pub fn entries(&self) -> &[Value] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Value> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> &HashSet<String> {
        &self.ids
    }

    /// Append `items` after the existing entries.
    ///
    /// Either every item is appended or none is: ids are checked against the
    /// catalog and against each other before anything is inserted.
    pub fn append(&mut self, items: &[ItemRecord]) -> Result<usize, DuplicateId> {
        let mut incoming = HashSet::with_capacity(items.len());
        for item in items {
            if self.ids.contains(&item.id) || !incoming.insert(item.id.as_str()) {
                return Err(DuplicateId {
                    item_type: self.item_type,
                    id: item.id.clone(),
                });
            }
        }

        for item in items {
            self.ids.insert(item.id.clone());
            self.entries.push(item.to_json());
        }

        Ok(items.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weapon(id: &str, name: &str) -> ItemRecord {
        ItemRecord::from_untrusted(ItemType::Weapon, &json!({"id": id, "name": name})).unwrap()
    }

    #[test]
    fn test_append_preserves_existing_entries() {
        let existing = json!({"id": "w001", "name": "Rusty Blade", "legacy_tier": 3});
        let mut catalog = Catalog::from_entries(ItemType::Weapon, vec![existing.clone()]);

        let added = catalog.append(&[weapon("w002", "Pipe Wrench")]).unwrap();

        assert_eq!(added, 1);
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.entries()[0], existing);
        assert_eq!(catalog.entries()[1]["id"], "w002");
        assert!(catalog.contains("w002"));
    }

    #[test]
    fn test_append_rejects_existing_id() {
        let mut catalog = Catalog::from_entries(
            ItemType::Weapon,
            vec![json!({"id": "w001", "name": "Rusty Blade"})],
        );

        let err = catalog
            .append(&[weapon("w002", "Pipe Wrench"), weapon("w001", "Fake Blade")])
            .unwrap_err();

        assert_eq!(err.id, "w001");
        assert_eq!(catalog.len(), 1);
        assert!(!catalog.contains("w002"));
        assert_eq!(catalog.entries()[0]["name"], "Rusty Blade");
    }

    #[test]
    fn test_append_rejects_duplicates_within_batch() {
        let mut catalog = Catalog::empty(ItemType::Weapon);

        let err = catalog
            .append(&[weapon("w010", "Club"), weapon("w010", "Other Club")])
            .unwrap_err();

        assert_eq!(err.id, "w010");
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_stored_ids_are_indexed_trimmed() {
        let mut catalog = Catalog::from_entries(
            ItemType::Weapon,
            vec![json!({"id": " w001 ", "name": "Rusty Blade"})],
        );

        assert!(catalog.contains("w001"));
        let err = catalog.append(&[weapon("w001", "Fake Blade")]).unwrap_err();
        assert_eq!(err.id, "w001");
        // The stored entry itself is untouched
        assert_eq!(catalog.entries()[0]["id"], " w001 ");
    }
}
