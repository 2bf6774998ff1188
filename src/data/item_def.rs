use serde::{Deserialize, Serialize};

// ============================================================================
// Item Categories
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemCategory {
    Consumable,
    #[default]
    Material,
    Tool,
    Equipment,
    Job,
}

// ============================================================================
// Raw Item Definition (direct from TOML)
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct RawItemDefinition {
    pub display_name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub category: ItemCategory,
    pub max_stack: Option<u32>,
    /// Shorthand for `max_stack = 1`
    pub stackable: Option<bool>,
}

// ============================================================================
// Resolved Item Definition
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDefinition {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub category: ItemCategory,
    pub max_stack: u32,
}

impl ItemDefinition {
    pub fn new(id: &str, display_name: &str, max_stack: u32) -> Self {
        Self {
            id: id.to_string(),
            display_name: display_name.to_string(),
            description: String::new(),
            category: ItemCategory::default(),
            max_stack: max_stack.max(1),
        }
    }

    pub fn from_raw(id: &str, raw: &RawItemDefinition) -> Self {
        let max_stack = match raw.stackable {
            Some(false) => 1,
            _ => raw.max_stack.unwrap_or(99).max(1),
        };

        Self {
            id: id.to_string(),
            display_name: raw.display_name.clone()
                .unwrap_or_else(|| id.to_string()),
            description: raw.description.clone()
                .unwrap_or_default(),
            category: raw.category,
            max_stack,
        }
    }

    /// Whether several units can share one inventory slot
    pub fn is_stackable(&self) -> bool {
        self.max_stack > 1
    }
}
