use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::DataError;
use crate::job::ItemCatalog;

use super::item_def::{ItemDefinition, RawItemDefinition};

/// Registry for all item definitions
pub struct ItemRegistry {
    items: HashMap<String, ItemDefinition>,
}

impl ItemRegistry {
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Load all item definitions from a directory
    pub fn load_from_directory(&mut self, data_dir: &Path) -> Result<(), DataError> {
        let items_dir = data_dir.join("items");

        if !items_dir.exists() {
            warn!("Items directory does not exist: {:?}", items_dir);
            return Ok(());
        }

        let entries = std::fs::read_dir(&items_dir).map_err(|source| DataError::Read {
            path: items_dir.clone(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| DataError::Read {
                path: items_dir.clone(),
                source,
            })?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == "toml") {
                let content = std::fs::read_to_string(&path).map_err(|source| DataError::Read {
                    path: path.clone(),
                    source,
                })?;

                // Parse as table of items
                let table: HashMap<String, RawItemDefinition> = toml::from_str(&content)
                    .map_err(|source| DataError::Parse {
                        path: path.clone(),
                        source,
                    })?;

                for (id, raw) in table {
                    if self.items.contains_key(&id) {
                        warn!("Duplicate item ID '{}' in {:?}, overwriting", id, path);
                    }
                    self.insert(ItemDefinition::from_raw(&id, &raw));
                }
            }
        }

        info!("Loaded {} item definitions", self.items.len());

        Ok(())
    }

    /// Add or replace a definition
    pub fn insert(&mut self, item: ItemDefinition) {
        self.items.insert(item.id.clone(), item);
    }

    /// Get an item definition by ID
    pub fn get(&self, id: &str) -> Option<&ItemDefinition> {
        self.items.get(id)
    }

    /// Get the number of loaded items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for ItemRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemCatalog for ItemRegistry {
    fn lookup_item(&self, key: &str) -> Option<&ItemDefinition> {
        self.get(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let items_dir = dir.path().join("items");
        std::fs::create_dir(&items_dir).unwrap();
        std::fs::write(
            items_dir.join("tools.toml"),
            r#"
                [toolkit]
                display_name = "Toolkit"
                category = "tool"
                stackable = false

                [bolt]
                max_stack = 50
            "#,
        )
        .unwrap();
        std::fs::write(items_dir.join("notes.txt"), "ignored").unwrap();

        let mut registry = ItemRegistry::new();
        registry.load_from_directory(dir.path()).unwrap();

        assert_eq!(registry.len(), 2);
        assert!(!registry.get("toolkit").unwrap().is_stackable());
        assert_eq!(registry.lookup_item("bolt").unwrap().max_stack, 50);
        assert!(registry.lookup_item("hammer").is_none());
    }

    #[test]
    fn test_missing_directory_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ItemRegistry::new();
        assert!(registry.load_from_directory(dir.path()).is_ok());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_parse_error_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let items_dir = dir.path().join("items");
        std::fs::create_dir(&items_dir).unwrap();
        std::fs::write(items_dir.join("broken.toml"), "[toolkit\n").unwrap();

        let mut registry = ItemRegistry::new();
        let err = registry.load_from_directory(dir.path()).unwrap_err();
        assert!(matches!(err, DataError::Parse { .. }));
        assert!(err.to_string().contains("broken.toml"));
    }
}
