//! Optional place catalog used to tag exports.
//!
//! The catalog comes from an optional remote store. When it cannot be
//! fetched the session simply has no catalog; nothing else degrades.

use serde::{Deserialize, Serialize};

/// A known place an export can be associated with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
}

/// Known places, in the order the store returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceCatalog {
    places: Vec<Place>,
}

impl PlaceCatalog {
    pub fn new(places: Vec<Place>) -> Self {
        Self { places }
    }

    pub fn places(&self) -> &[Place] {
        &self.places
    }

    pub fn len(&self) -> usize {
        self.places.len()
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Exact (trimmed) name match.
    pub fn find_by_name(&self, name: &str) -> Option<&Place> {
        let name = name.trim();
        self.places.iter().find(|p| p.name == name)
    }

    /// Places whose name starts with `prefix`, case-insensitively.
    pub fn suggestions(&self, prefix: &str) -> Vec<&Place> {
        let prefix = prefix.trim().to_lowercase();
        self.places
            .iter()
            .filter(|p| p.name.to_lowercase().starts_with(&prefix))
            .collect()
    }
}
