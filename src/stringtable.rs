//! Stringtable support for localized text lookup
//!
//! A stringtable maps stable keys to human-readable strings in one locale.
//! Lookup through [`StringTable::user_string`] is total: unknown keys resolve
//! to a deterministic `ERROR: <key>` placeholder instead of failing, so
//! message rendering can always produce output.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stringtables
#[derive(Error, Debug)]
pub enum StringtableError {
    #[error("Failed to read stringtable file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stringtable TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stringtable mapping keys to localized strings
#[derive(Debug, Clone)]
pub struct StringTable {
    /// Optional name for the table (e.g. the language it carries)
    pub name: Option<String>,
    /// Optional locale identifier, e.g. "en"
    pub locale: Option<String>,
    entries: HashMap<String, String>,
}

/// TOML structure for deserializing stringtables
#[derive(Deserialize)]
struct TomlStringtable {
    metadata: Option<TomlMetadata>,
    strings: HashMap<String, String>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    locale: Option<String>,
}

/// Built-in table covering the keys the substitution engine itself relies on,
/// plus a few sample message templates.
const DEFAULT_STRINGS: &str = r#"
[metadata]
name = "Built-in English"
locale = "en"

[strings]
# Engine placeholders
ERROR = "ERROR"
UNKNOWN_VALUE_REF_NAME = "unknown value"
FW_UNKNOWN_DESIGN_NAME = "unknown design"
COMBAT = "Combat"

# Meter display names
METER_POPULATION = "Population"
METER_TARGET_POPULATION = "Target Population"
METER_INDUSTRY = "Industry"
METER_RESEARCH = "Research"
METER_INFLUENCE = "Influence"
METER_CONSTRUCTION = "Construction"
METER_HAPPINESS = "Happiness"
METER_FUEL = "Fuel"
METER_MAX_FUEL = "Max Fuel"
METER_SHIELD = "Shield"
METER_MAX_SHIELD = "Max Shield"
METER_STRUCTURE = "Structure"
METER_MAX_STRUCTURE = "Max Structure"
METER_DEFENSE = "Defense"
METER_MAX_DEFENSE = "Max Defense"
METER_TROOPS = "Troops"
METER_SUPPLY = "Supply"
METER_STEALTH = "Stealth"
METER_DETECTION = "Detection"
METER_SPEED = "Speed"

# Sample message templates
SITREP_PLANET_COLONIZED = "Planet %planet% has been colonized."
SITREP_TECH_RESEARCHED = "%empire% has researched %tech%."
SITREP_SHIP_DESTROYED_IN_COMBAT = "%ship% was destroyed in %combat%."
"#;

impl StringTable {
    /// Load a stringtable from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, StringtableError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a stringtable from a TOML string
    pub fn from_str(content: &str) -> Result<Self, StringtableError> {
        let parsed: TomlStringtable = toml::from_str(content)?;

        Ok(StringTable {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            locale: parsed.metadata.as_ref().and_then(|m| m.locale.clone()),
            entries: parsed.strings,
        })
    }

    /// Look up a key, if present
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|s| s.as_str())
    }

    /// True if the table has an entry for the key
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Resolve a key to its localized string.
    ///
    /// Total: unknown keys yield `ERROR: <key>` so callers never have to
    /// handle a missing translation at lookup time.
    pub fn user_string(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(value) => value.clone(),
            None => format!("ERROR: {key}"),
        }
    }

    /// Insert or replace one entry
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Number of entries in the table
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for StringTable {
    fn default() -> Self {
        Self::from_str(DEFAULT_STRINGS).expect("Built-in stringtable should be valid TOML")
    }
}
