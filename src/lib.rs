//! vartext - variable substitution for game message templates
//!
//! Templates are plain text containing `%tag%` or `%tag:label%` tokens.
//! Rendering looks each token's label up in caller-supplied bindings,
//! dispatches the bound data to the substitution function registered for the
//! tag, and splices the result into the output. Entity references come back
//! wrapped in `<tag data>name</tag>` spans so a downstream renderer can make
//! them clickable. Rendering never fails: unresolvable tokens degrade to a
//! localized error placeholder and clear the render's validity flag.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vartext::{MemoryUniverse, StringTable, TagRegistry, VarText};
//!
//! let mut universe = MemoryUniverse::new();
//! universe.add_object(42, "Earth");
//!
//! let strings = Arc::new(StringTable::default());
//! let registry = Arc::new(TagRegistry::builtin(Arc::new(universe), Arc::clone(&strings)));
//!
//! let mut message = VarText::new(registry, strings)
//!     .with_template("Colony founded on %planet%.", false);
//! message.add_binding("planet", "42");
//!
//! assert_eq!(message.text(), "Colony founded on <planet 42>Earth</planet>.");
//! assert!(message.is_valid());
//! ```

pub mod scanner;
pub mod stringtable;
pub mod template;
pub mod universe;

pub use stringtable::{StringTable, StringtableError};
pub use template::{
    substitute, with_tags, RegistryError, Rendered, SubstituteFn, TagRegistry, VarText,
};
pub use universe::{ContentKind, MemoryUniverse, MeterType, UniverseError, UniverseView};
