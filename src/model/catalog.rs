use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::model::Language;

/// A single Style or Motif record from the reference catalog.
///
/// The integer `id` is assigned by the store on creation and is the only
/// stable cross-reference key; localized names may change freely without
/// affecting references held elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: i32,
    pub name_ja: String,
    pub name_en: String,
    pub created_at: String, // ISO 8601 timestamp
    pub updated_at: String, // ISO 8601 timestamp
}

impl CatalogEntry {
    pub fn name(&self, language: Language) -> &str {
        match language {
            Language::Ja => &self.name_ja,
            Language::En => &self.name_en,
        }
    }
}

/// Input model for creating a new catalog entry (id assigned by the store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCatalogEntry {
    pub name_ja: String,
    pub name_en: String,
}

impl NewCatalogEntry {
    /// Convert to a full entry with store-generated id and timestamps.
    pub fn into_entry(self, id: i32) -> CatalogEntry {
        let now = chrono::Utc::now().to_rfc3339();
        CatalogEntry {
            id,
            name_ja: self.name_ja,
            name_en: self.name_en,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Sparse update payload for a catalog entry. The id is immutable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntryUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_ja: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_en: Option<String>,
}

/// In-memory snapshot of one kind's catalog.
///
/// An empty catalog is a legal value (a degraded fetch produces one) and
/// makes every name resolution drop silently rather than fail.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<i32, usize>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        let by_id = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.id, idx))
            .collect();
        Self { entries, by_id }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn get(&self, id: i32) -> Option<&CatalogEntry> {
        self.by_id.get(&id).map(|idx| &self.entries[*idx])
    }

    pub fn contains(&self, id: i32) -> bool {
        self.by_id.contains_key(&id)
    }

    /// Exact, case-sensitive match on either localized name.
    pub fn find_by_name(&self, name: &str) -> Option<&CatalogEntry> {
        self.entries
            .iter()
            .find(|entry| entry.name_ja == name || entry.name_en == name)
    }

    /// The id set that dangling references are filtered against.
    pub fn valid_ids(&self) -> BTreeSet<i32> {
        self.by_id.keys().copied().collect()
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i32, ja: &str, en: &str) -> CatalogEntry {
        CatalogEntry {
            id,
            name_ja: ja.to_string(),
            name_en: en.to_string(),
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_lookup_by_id_and_name() {
        let catalog = Catalog::new(vec![
            entry(1, "和彫り", "Japanese Traditional"),
            entry(2, "ブラック＆グレー", "Black & Gray"),
        ]);

        assert_eq!(catalog.get(1).unwrap().name_en, "Japanese Traditional");
        assert!(catalog.get(99).is_none());
        assert_eq!(catalog.find_by_name("和彫り").unwrap().id, 1);
        assert_eq!(catalog.find_by_name("Black & Gray").unwrap().id, 2);
        assert!(catalog.find_by_name("black & gray").is_none()); // case-sensitive
    }

    #[test]
    fn test_empty_catalog_is_legal() {
        let catalog = Catalog::empty();
        assert!(catalog.is_empty());
        assert!(catalog.valid_ids().is_empty());
        assert!(catalog.get(1).is_none());
    }

    #[test]
    fn test_localized_name_selection() {
        let e = entry(7, "龍", "Dragon");
        assert_eq!(e.name(Language::Ja), "龍");
        assert_eq!(e.name(Language::En), "Dragon");
    }
}
