use serde::{Deserialize, Serialize};

use super::id::Id;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: Id,
    pub name: String,
}

impl Category {
    /// Build a category from user input. Returns `None` when the name is blank.
    pub fn named(name: &str) -> Option<Self> {
        let name = clean_name(name)?;
        Some(Self { id: Id::generate(), name })
    }
}

/// Trimmed category name, or `None` if nothing is left.
pub fn clean_name(name: &str) -> Option<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
