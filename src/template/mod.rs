//! Variable-substitution templates for game messages
//!
//! This module provides the infrastructure for turning message templates
//! containing `%tag%` / `%tag:label%` tokens into rendered text with
//! entity references resolved against the game state.
//!
//! # Example
//!
//! ```text
//! template: "Planet %planet% has been colonized."
//! binding:  planet -> "42"
//! output:   "Planet <planet 42>Earth</planet> has been colonized."
//! ```

mod registry;
mod resolver;

pub use registry::{RegistryError, SubstituteFn, TagRegistry};
pub use registry::{
    BUILDING_ID_TAG, BUILDING_TYPE_TAG, COMBAT_ID_TAG, DESIGN_ID_TAG, EMPIRE_ID_TAG, FIELD_ID_TAG,
    FIELD_TYPE_TAG, FLEET_ID_TAG, METER_TYPE_TAG, PLANET_ID_TAG, POLICY_TAG,
    PREDEFINED_DESIGN_TAG, RAW_TEXT_TAG, SHIP_HULL_TAG, SHIP_ID_TAG, SHIP_PART_TAG, SPECIAL_TAG,
    SPECIES_TAG, SYSTEM_ID_TAG, TECH_TAG, TEXT_TAG, VALUE_TAG,
};
pub use resolver::{substitute, with_tags, Rendered};

use std::collections::HashMap;
use std::sync::Arc;

use crate::stringtable::StringTable;

/// A message template plus the bindings needed to render it.
///
/// Rendering is lazy and cached: the first call to [`VarText::text`] or
/// [`VarText::is_valid`] runs one substitution pass and both accessors share
/// its result until a mutator invalidates it. A single `VarText` is a
/// single-writer object; share the registry and stringtable handles instead
/// of the template itself.
pub struct VarText {
    registry: Arc<TagRegistry>,
    strings: Arc<StringTable>,
    template: String,
    /// Resolve the template through the stringtable before scanning
    lookup_template: bool,
    bindings: HashMap<String, String>,
    cache: Option<Rendered>,
}

impl VarText {
    /// Create a template object with an empty template
    pub fn new(registry: Arc<TagRegistry>, strings: Arc<StringTable>) -> Self {
        Self {
            registry,
            strings,
            template: String::new(),
            lookup_template: false,
            bindings: HashMap::new(),
            cache: None,
        }
    }

    /// Set the template, consuming self; for construction chains
    pub fn with_template(mut self, template: impl Into<String>, localize: bool) -> Self {
        self.set_template(template, localize);
        self
    }

    /// Replace the template text and localization flag
    pub fn set_template(&mut self, template: impl Into<String>, localize: bool) {
        self.template = template.into();
        self.lookup_template = localize;
        self.cache = None;
    }

    /// Insert or overwrite one binding; the last write for a label wins
    pub fn add_binding(&mut self, label: impl Into<String>, data: impl Into<String>) {
        self.bindings.insert(label.into(), data.into());
        self.cache = None;
    }

    /// Insert bindings in order, with the same overwrite semantics as
    /// [`VarText::add_binding`]
    pub fn add_bindings<K, V, I>(&mut self, pairs: I)
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        for (label, data) in pairs {
            self.bindings.insert(label.into(), data.into());
        }
        self.cache = None;
    }

    /// The rendered text, computed on first access
    pub fn text(&mut self) -> &str {
        &self.render().text
    }

    /// Whether every token in the template resolved, computed on the same
    /// pass as [`VarText::text`]
    pub fn is_valid(&mut self) -> bool {
        self.render().valid
    }

    /// The distinct labels currently bound, in no particular order
    pub fn variable_tags(&self) -> Vec<&str> {
        self.bindings.keys().map(|label| label.as_str()).collect()
    }

    fn render(&mut self) -> &Rendered {
        if self.cache.is_none() {
            self.cache = Some(substitute(
                &self.template,
                self.lookup_template,
                &self.bindings,
                &self.registry,
                &self.strings,
            ));
        }
        self.cache.as_ref().expect("cache was just filled")
    }
}

impl std::fmt::Debug for VarText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VarText")
            .field("template", &self.template)
            .field("lookup_template", &self.lookup_template)
            .field("bindings", &self.bindings)
            .field("cached", &self.cache.is_some())
            .finish()
    }
}
