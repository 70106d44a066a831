//! Game-state lookups consumed by the substitution engine
//!
//! The engine never owns game state. Everything it needs to resolve an
//! entity reference is expressed by the read-only [`UniverseView`] trait:
//! object names by id, empire names by id, ship designs by id or by
//! predefined name, existence checks for name-keyed content, and evaluation
//! of named value expressions. [`MemoryUniverse`] is a plain map-backed
//! implementation, constructible in code or from a TOML file, used by the
//! CLI and by tests.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a universe description
#[derive(Error, Debug)]
pub enum UniverseError {
    #[error("Failed to read universe file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse universe TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("invalid numeric id key: {key}")]
    InvalidId { key: String },
    #[error("unknown content kind: {kind}")]
    UnknownContentKind { kind: String },
}

/// Kinds of name-keyed game content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Tech,
    Policy,
    BuildingType,
    Special,
    Species,
    FieldType,
    ShipHull,
    ShipPart,
}

impl ContentKind {
    /// All kinds, in presentation order
    pub const ALL: &'static [ContentKind] = &[
        ContentKind::Tech,
        ContentKind::Policy,
        ContentKind::BuildingType,
        ContentKind::Special,
        ContentKind::Species,
        ContentKind::FieldType,
        ContentKind::ShipHull,
        ContentKind::ShipPart,
    ];

    /// Canonical lowercase label, matching the substitution tag names
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Tech => "tech",
            ContentKind::Policy => "policy",
            ContentKind::BuildingType => "buildingtype",
            ContentKind::Special => "special",
            ContentKind::Species => "species",
            ContentKind::FieldType => "fieldtype",
            ContentKind::ShipHull => "shiphull",
            ContentKind::ShipPart => "shippart",
        }
    }

    /// Parse a canonical label back into a kind
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|kind| kind.as_str() == value)
    }
}

/// Closed set of meter kinds that can appear in `%metertype%` tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterType {
    Population,
    TargetPopulation,
    Industry,
    Research,
    Influence,
    Construction,
    Happiness,
    Fuel,
    MaxFuel,
    Shield,
    MaxShield,
    Structure,
    MaxStructure,
    Defense,
    MaxDefense,
    Troops,
    Supply,
    Stealth,
    Detection,
    Speed,
}

impl MeterType {
    pub const ALL: &'static [MeterType] = &[
        MeterType::Population,
        MeterType::TargetPopulation,
        MeterType::Industry,
        MeterType::Research,
        MeterType::Influence,
        MeterType::Construction,
        MeterType::Happiness,
        MeterType::Fuel,
        MeterType::MaxFuel,
        MeterType::Shield,
        MeterType::MaxShield,
        MeterType::Structure,
        MeterType::MaxStructure,
        MeterType::Defense,
        MeterType::MaxDefense,
        MeterType::Troops,
        MeterType::Supply,
        MeterType::Stealth,
        MeterType::Detection,
        MeterType::Speed,
    ];

    /// Canonical name, doubling as the stringtable key for the display name
    pub fn as_str(self) -> &'static str {
        match self {
            MeterType::Population => "METER_POPULATION",
            MeterType::TargetPopulation => "METER_TARGET_POPULATION",
            MeterType::Industry => "METER_INDUSTRY",
            MeterType::Research => "METER_RESEARCH",
            MeterType::Influence => "METER_INFLUENCE",
            MeterType::Construction => "METER_CONSTRUCTION",
            MeterType::Happiness => "METER_HAPPINESS",
            MeterType::Fuel => "METER_FUEL",
            MeterType::MaxFuel => "METER_MAX_FUEL",
            MeterType::Shield => "METER_SHIELD",
            MeterType::MaxShield => "METER_MAX_SHIELD",
            MeterType::Structure => "METER_STRUCTURE",
            MeterType::MaxStructure => "METER_MAX_STRUCTURE",
            MeterType::Defense => "METER_DEFENSE",
            MeterType::MaxDefense => "METER_MAX_DEFENSE",
            MeterType::Troops => "METER_TROOPS",
            MeterType::Supply => "METER_SUPPLY",
            MeterType::Stealth => "METER_STEALTH",
            MeterType::Detection => "METER_DETECTION",
            MeterType::Speed => "METER_SPEED",
        }
    }

    /// Parse a canonical meter name
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|meter| meter.as_str() == value)
    }
}

/// Read-only view of the game state the engine substitutes against.
///
/// All lookups are fallible with `None`; a missing entity is a normal
/// outcome, not an error. Implementations must be cheap and side-effect-free:
/// the engine may call them once per token per render.
pub trait UniverseView: Send + Sync {
    /// Display name of an in-universe object (planet, system, ship, fleet,
    /// building, field) by object id
    fn object_name(&self, id: i32) -> Option<String>;

    /// Display name of an empire by empire id
    fn empire_name(&self, id: i32) -> Option<String>;

    /// Name of a player-created ship design by design id
    fn design_name(&self, id: i32) -> Option<String>;

    /// Name of a predefined ship design by its content name
    fn generic_design_name(&self, name: &str) -> Option<String>;

    /// True if a piece of name-keyed content exists
    fn content_exists(&self, kind: ContentKind, name: &str) -> bool;

    /// Evaluate a named value expression to display text
    fn evaluate_value(&self, name: &str) -> Option<String>;
}

/// Map-backed [`UniverseView`] implementation
#[derive(Debug, Clone, Default)]
pub struct MemoryUniverse {
    objects: HashMap<i32, String>,
    empires: HashMap<i32, String>,
    designs: HashMap<i32, String>,
    generic_designs: HashMap<String, String>,
    content: HashMap<ContentKind, HashSet<String>>,
    values: HashMap<String, String>,
}

/// TOML structure for deserializing universe descriptions
#[derive(Deserialize)]
struct TomlUniverse {
    #[serde(default)]
    objects: HashMap<String, String>,
    #[serde(default)]
    empires: HashMap<String, String>,
    #[serde(default)]
    designs: HashMap<String, String>,
    #[serde(default)]
    generic_designs: HashMap<String, String>,
    #[serde(default)]
    content: HashMap<String, Vec<String>>,
    #[serde(default)]
    values: HashMap<String, String>,
}

fn parse_id_table(table: HashMap<String, String>) -> Result<HashMap<i32, String>, UniverseError> {
    table
        .into_iter()
        .map(|(key, name)| {
            let id = key
                .parse::<i32>()
                .map_err(|_| UniverseError::InvalidId { key: key.clone() })?;
            Ok((id, name))
        })
        .collect()
}

impl MemoryUniverse {
    /// Create an empty universe
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a universe description from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, UniverseError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load a universe description from a TOML string
    pub fn from_str(content: &str) -> Result<Self, UniverseError> {
        let parsed: TomlUniverse = toml::from_str(content)?;

        let mut content_sets: HashMap<ContentKind, HashSet<String>> = HashMap::new();
        for (kind, names) in parsed.content {
            let kind = ContentKind::parse(&kind)
                .ok_or_else(|| UniverseError::UnknownContentKind { kind: kind.clone() })?;
            content_sets.entry(kind).or_default().extend(names);
        }

        Ok(MemoryUniverse {
            objects: parse_id_table(parsed.objects)?,
            empires: parse_id_table(parsed.empires)?,
            designs: parse_id_table(parsed.designs)?,
            generic_designs: parsed.generic_designs,
            content: content_sets,
            values: parsed.values,
        })
    }

    /// Add an in-universe object
    pub fn add_object(&mut self, id: i32, name: impl Into<String>) {
        self.objects.insert(id, name.into());
    }

    /// Add an empire
    pub fn add_empire(&mut self, id: i32, name: impl Into<String>) {
        self.empires.insert(id, name.into());
    }

    /// Add a player-created ship design
    pub fn add_design(&mut self, id: i32, name: impl Into<String>) {
        self.designs.insert(id, name.into());
    }

    /// Add a predefined ship design
    pub fn add_generic_design(&mut self, name: impl Into<String>, display: impl Into<String>) {
        self.generic_designs.insert(name.into(), display.into());
    }

    /// Register a piece of name-keyed content as existing
    pub fn add_content(&mut self, kind: ContentKind, name: impl Into<String>) {
        self.content.entry(kind).or_default().insert(name.into());
    }

    /// Add a named value expression with its evaluated display text
    pub fn add_value(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl UniverseView for MemoryUniverse {
    fn object_name(&self, id: i32) -> Option<String> {
        self.objects.get(&id).cloned()
    }

    fn empire_name(&self, id: i32) -> Option<String> {
        self.empires.get(&id).cloned()
    }

    fn design_name(&self, id: i32) -> Option<String> {
        self.designs.get(&id).cloned()
    }

    fn generic_design_name(&self, name: &str) -> Option<String> {
        self.generic_designs.get(name).cloned()
    }

    fn content_exists(&self, kind: ContentKind, name: &str) -> bool {
        self.content
            .get(&kind)
            .is_some_and(|names| names.contains(name))
    }

    fn evaluate_value(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_kind_round_trip() {
        for kind in ContentKind::ALL {
            assert_eq!(ContentKind::parse(kind.as_str()), Some(*kind));
        }
        assert_eq!(ContentKind::parse("starlane"), None);
    }

    #[test]
    fn test_meter_type_round_trip() {
        for meter in MeterType::ALL {
            assert_eq!(MeterType::parse(meter.as_str()), Some(*meter));
        }
        assert_eq!(MeterType::parse("METER_LUCK"), None);
    }

    #[test]
    fn test_memory_universe_lookups() {
        let mut universe = MemoryUniverse::new();
        universe.add_object(42, "Earth");
        universe.add_empire(1, "Terran Federation");
        universe.add_design(7, "Venator");
        universe.add_generic_design("SD_SCOUT", "Scout");
        universe.add_content(ContentKind::Tech, "LRN_ALGO_ELEGANCE");
        universe.add_value("HABITABLE_SIZE", "5");

        assert_eq!(universe.object_name(42).as_deref(), Some("Earth"));
        assert_eq!(universe.object_name(43), None);
        assert_eq!(universe.empire_name(1).as_deref(), Some("Terran Federation"));
        assert_eq!(universe.design_name(7).as_deref(), Some("Venator"));
        assert_eq!(universe.generic_design_name("SD_SCOUT").as_deref(), Some("Scout"));
        assert!(universe.content_exists(ContentKind::Tech, "LRN_ALGO_ELEGANCE"));
        assert!(!universe.content_exists(ContentKind::Policy, "LRN_ALGO_ELEGANCE"));
        assert_eq!(universe.evaluate_value("HABITABLE_SIZE").as_deref(), Some("5"));
        assert_eq!(universe.evaluate_value("UNKNOWN"), None);
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
[objects]
42 = "Earth"
5 = "Sol"

[empires]
1 = "Terran Federation"

[designs]
7 = "Venator"

[generic_designs]
SD_SCOUT = "Scout"

[content]
tech = ["LRN_ALGO_ELEGANCE", "GRO_GENOME_BANK"]
species = ["SP_HUMAN"]

[values]
HABITABLE_SIZE = "5"
"#;
        let universe = MemoryUniverse::from_str(toml_str).expect("Should parse");
        assert_eq!(universe.object_name(42).as_deref(), Some("Earth"));
        assert_eq!(universe.object_name(5).as_deref(), Some("Sol"));
        assert_eq!(universe.empire_name(1).as_deref(), Some("Terran Federation"));
        assert_eq!(universe.design_name(7).as_deref(), Some("Venator"));
        assert_eq!(universe.generic_design_name("SD_SCOUT").as_deref(), Some("Scout"));
        assert!(universe.content_exists(ContentKind::Tech, "GRO_GENOME_BANK"));
        assert!(universe.content_exists(ContentKind::Species, "SP_HUMAN"));
        assert_eq!(universe.evaluate_value("HABITABLE_SIZE").as_deref(), Some("5"));
    }

    #[test]
    fn test_from_toml_rejects_bad_id() {
        let toml_str = r#"
[objects]
earth = "Earth"
"#;
        let result = MemoryUniverse::from_str(toml_str);
        assert!(matches!(result, Err(UniverseError::InvalidId { .. })));
    }

    #[test]
    fn test_from_toml_rejects_unknown_content_kind() {
        let toml_str = r#"
[content]
starlane = ["SL_1"]
"#;
        let result = MemoryUniverse::from_str(toml_str);
        assert!(matches!(result, Err(UniverseError::UnknownContentKind { .. })));
    }
}
