//! Tag registry: string-keyed dispatch from tag names to substitution functions

use std::collections::HashMap;

use thiserror::Error;

/// Plain-text tag, localizes its data through the stringtable
pub const TEXT_TAG: &str = "text";
/// Plain-text tag, passes its data through unchanged
pub const RAW_TEXT_TAG: &str = "rawtext";

/// Object-by-id tags; all resolve through the shared object table
pub const PLANET_ID_TAG: &str = "planet";
pub const SYSTEM_ID_TAG: &str = "system";
pub const SHIP_ID_TAG: &str = "ship";
pub const FLEET_ID_TAG: &str = "fleet";
pub const BUILDING_ID_TAG: &str = "building";
pub const FIELD_ID_TAG: &str = "field";

/// Combat log reference
pub const COMBAT_ID_TAG: &str = "combat";

/// Empire by empire id
pub const EMPIRE_ID_TAG: &str = "empire";
/// Player-created ship design by design id, with predefined-design fallback
pub const DESIGN_ID_TAG: &str = "shipdesign";
/// Predefined ship design by content name
pub const PREDEFINED_DESIGN_TAG: &str = "predefinedshipdesign";

/// Named value expression
pub const VALUE_TAG: &str = "value";

/// Name-keyed content tags
pub const TECH_TAG: &str = "tech";
pub const POLICY_TAG: &str = "policy";
pub const BUILDING_TYPE_TAG: &str = "buildingtype";
pub const SPECIAL_TAG: &str = "special";
pub const SHIP_HULL_TAG: &str = "shiphull";
pub const SHIP_PART_TAG: &str = "shippart";
pub const SPECIES_TAG: &str = "species";
pub const FIELD_TYPE_TAG: &str = "fieldtype";

/// Meter kind by canonical name
pub const METER_TYPE_TAG: &str = "metertype";

/// A substitution function: turns a token's bound data into rendered text.
///
/// `None` means "could not substitute" and makes the enclosing render
/// invalid; it never aborts rendering.
pub type SubstituteFn = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Errors that can occur when populating a registry
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A substitution function is already registered for the tag
    #[error("duplicate tag registration: {tag}")]
    Duplicate { tag: String },
}

/// Registry mapping tag names to substitution functions.
///
/// Built once at startup (see [`TagRegistry::builtin`]), then shared behind
/// an `Arc` and read concurrently by any number of templates. Tags are plain
/// strings, never a closed enum: stringtable content can introduce new tags,
/// registered through [`TagRegistry::register`] before the registry is
/// frozen, without touching this crate.
#[derive(Default)]
pub struct TagRegistry {
    entries: HashMap<String, SubstituteFn>,
}

impl TagRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a substitution function for a tag
    pub fn register(
        &mut self,
        tag: impl Into<String>,
        func: SubstituteFn,
    ) -> Result<(), RegistryError> {
        let tag = tag.into();
        if self.entries.contains_key(&tag) {
            return Err(RegistryError::Duplicate { tag });
        }
        self.entries.insert(tag, func);
        Ok(())
    }

    /// Insert without a duplicate check; builtin construction only.
    pub(crate) fn set(&mut self, tag: &str, func: SubstituteFn) {
        self.entries.insert(tag.to_string(), func);
    }

    /// Get the substitution function for a tag
    pub fn get(&self, tag: &str) -> Option<&SubstituteFn> {
        self.entries.get(tag)
    }

    /// Check if a tag is registered
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// All registered tag names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }
}

impl std::fmt::Debug for TagRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&str> = self.names().collect();
        names.sort_unstable();
        f.debug_struct("TagRegistry").field("tags", &names).finish()
    }
}
