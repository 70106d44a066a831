//! Built-in substitution functions and the substitution engine
//!
//! The engine walks a scanned template left to right, copying literal
//! segments through and replacing each token by the output of the
//! substitution function registered for its tag. Failures never abort a
//! render: a token that cannot be resolved is replaced by the localized
//! `ERROR` placeholder and clears the render's validity flag, and the walk
//! continues. Substituted text is spliced verbatim and never re-scanned, so
//! variable data cannot smuggle further tokens into the output.

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::scanner::{self, Segment};
use crate::stringtable::StringTable;
use crate::universe::{ContentKind, MeterType, UniverseView};

use super::registry::{
    TagRegistry, BUILDING_ID_TAG, BUILDING_TYPE_TAG, COMBAT_ID_TAG, DESIGN_ID_TAG,
    EMPIRE_ID_TAG, FIELD_ID_TAG, FIELD_TYPE_TAG, FLEET_ID_TAG, METER_TYPE_TAG, PLANET_ID_TAG,
    POLICY_TAG, PREDEFINED_DESIGN_TAG, RAW_TEXT_TAG, SHIP_HULL_TAG, SHIP_ID_TAG, SHIP_PART_TAG,
    SPECIAL_TAG, SPECIES_TAG, SYSTEM_ID_TAG, TECH_TAG, TEXT_TAG, VALUE_TAG,
};

/// The outcome of one render pass: the substituted text and whether every
/// token in the template resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub text: String,
    pub valid: bool,
}

/// Wrap `content` in a markup span carrying the tag identity and the raw
/// data, so a downstream renderer can recover the entity reference without
/// re-parsing the text: `<tag data>content</tag>`.
pub fn with_tags(content: &str, tag: &str, data: &str) -> String {
    let mut out = String::with_capacity(content.len() + 2 * tag.len() + data.len() + 6);
    out.push('<');
    out.push_str(tag);
    out.push(' ');
    out.push_str(data);
    out.push('>');
    out.push_str(content);
    out.push_str("</");
    out.push_str(tag);
    out.push('>');
    out
}

/// Substitute for an object-by-id tag. The tag picks the wrapping span; the
/// lookup is the same shared object table for every object kind.
fn object_string(universe: &dyn UniverseView, data: &str, tag: &str) -> Option<String> {
    let id: i32 = data.parse().ok()?;
    let name = universe.object_name(id)?;
    Some(with_tags(&name, tag, data))
}

/// Substitute for an empire tag
fn empire_string(universe: &dyn UniverseView, data: &str) -> Option<String> {
    let id: i32 = data.parse().ok()?;
    let name = universe.empire_name(id)?;
    Some(with_tags(&name, EMPIRE_ID_TAG, data))
}

/// Substitute for a name-keyed content tag: the data is a content name, and
/// the substitution is its localized display name.
fn name_string(
    universe: &dyn UniverseView,
    strings: &StringTable,
    kind: ContentKind,
    tag: &str,
    data: &str,
) -> Option<String> {
    if !universe.content_exists(kind, data) {
        return None;
    }
    Some(with_tags(&strings.user_string(data), tag, data))
}

/// Substitute for a ship design tag. Numeric data naming a player-created
/// design wins; otherwise the data is tried as a predefined design name.
/// When neither lookup succeeds this degrades to a localized "unknown
/// design" string instead of failing, so stale design references in old
/// messages stay readable.
fn ship_design_string(
    universe: &dyn UniverseView,
    strings: &StringTable,
    data: &str,
) -> Option<String> {
    if let Ok(id) = data.parse::<i32>() {
        if let Some(name) = universe.design_name(id) {
            return Some(with_tags(&name, DESIGN_ID_TAG, data));
        }
    }
    if let Some(name) = universe.generic_design_name(data) {
        return Some(with_tags(&name, PREDEFINED_DESIGN_TAG, data));
    }
    Some(strings.user_string("FW_UNKNOWN_DESIGN_NAME"))
}

/// Substitute for a predefined ship design tag
fn predefined_design_string(universe: &dyn UniverseView, data: &str) -> Option<String> {
    let name = universe.generic_design_name(data)?;
    Some(with_tags(&name, PREDEFINED_DESIGN_TAG, data))
}

/// Substitute for a named value expression. A known expression renders its
/// localized name with the evaluated result as span data; an unknown one
/// degrades to a localized "unknown value" placeholder without failing.
fn value_string(
    universe: &dyn UniverseView,
    strings: &StringTable,
    data: &str,
) -> Option<String> {
    match universe.evaluate_value(data) {
        Some(value) => Some(with_tags(&strings.user_string(data), VALUE_TAG, &value)),
        None => Some(with_tags(
            data,
            VALUE_TAG,
            &strings.user_string("UNKNOWN_VALUE_REF_NAME"),
        )),
    }
}

/// Substitute for a meter kind tag. The data must parse as a canonical meter
/// name with a display string in the stringtable.
fn meter_string(strings: &StringTable, data: &str) -> Option<String> {
    let meter = MeterType::parse(data)?;
    let name = meter.as_str();
    if !strings.contains(name) {
        return None;
    }
    Some(with_tags(&strings.user_string(name), METER_TYPE_TAG, name))
}

impl TagRegistry {
    /// Build the registry of built-in tags against the given collaborators.
    ///
    /// Call once at startup, wrap in an `Arc`, and hand the handle to every
    /// template. Additional tags can be [`TagRegistry::register`]ed before
    /// the registry is frozen behind the `Arc`.
    pub fn builtin(universe: Arc<dyn UniverseView>, strings: Arc<StringTable>) -> Self {
        let mut registry = TagRegistry::new();

        let s = Arc::clone(&strings);
        registry.set(TEXT_TAG, Box::new(move |data: &str| Some(s.user_string(data))));
        registry.set(RAW_TEXT_TAG, Box::new(|data: &str| Some(data.to_string())));

        for tag in [
            PLANET_ID_TAG,
            SYSTEM_ID_TAG,
            SHIP_ID_TAG,
            FLEET_ID_TAG,
            BUILDING_ID_TAG,
            FIELD_ID_TAG,
        ] {
            let u = Arc::clone(&universe);
            registry.set(
                tag,
                Box::new(move |data: &str| object_string(u.as_ref(), data, tag)),
            );
        }

        let s = Arc::clone(&strings);
        registry.set(
            COMBAT_ID_TAG,
            Box::new(move |data: &str| {
                Some(with_tags(&s.user_string("COMBAT"), COMBAT_ID_TAG, data))
            }),
        );

        let u = Arc::clone(&universe);
        registry.set(
            EMPIRE_ID_TAG,
            Box::new(move |data: &str| empire_string(u.as_ref(), data)),
        );

        for (tag, kind) in [
            (TECH_TAG, ContentKind::Tech),
            (POLICY_TAG, ContentKind::Policy),
            (BUILDING_TYPE_TAG, ContentKind::BuildingType),
            (SPECIAL_TAG, ContentKind::Special),
            (SPECIES_TAG, ContentKind::Species),
            (FIELD_TYPE_TAG, ContentKind::FieldType),
            (SHIP_HULL_TAG, ContentKind::ShipHull),
            (SHIP_PART_TAG, ContentKind::ShipPart),
        ] {
            let u = Arc::clone(&universe);
            let s = Arc::clone(&strings);
            registry.set(
                tag,
                Box::new(move |data: &str| name_string(u.as_ref(), s.as_ref(), kind, tag, data)),
            );
        }

        let s = Arc::clone(&strings);
        registry.set(
            METER_TYPE_TAG,
            Box::new(move |data: &str| meter_string(s.as_ref(), data)),
        );

        let u = Arc::clone(&universe);
        let s = Arc::clone(&strings);
        registry.set(
            DESIGN_ID_TAG,
            Box::new(move |data: &str| ship_design_string(u.as_ref(), s.as_ref(), data)),
        );

        let u = Arc::clone(&universe);
        registry.set(
            PREDEFINED_DESIGN_TAG,
            Box::new(move |data: &str| predefined_design_string(u.as_ref(), data)),
        );

        let u = Arc::clone(&universe);
        let s = Arc::clone(&strings);
        registry.set(
            VALUE_TAG,
            Box::new(move |data: &str| value_string(u.as_ref(), s.as_ref(), data)),
        );

        registry
    }
}

/// Render a template against a set of bindings.
///
/// When `localize` is set the template is first resolved through the
/// stringtable, then scanned. Each token looks up its effective label (the
/// explicit label, or the tag itself) in `bindings` and dispatches the bound
/// data to the registry. Missing bindings, unknown tags, and refused
/// substitutions splice the localized `ERROR` placeholder and clear the
/// validity flag; rendering always runs to the end of the template.
pub fn substitute(
    template: &str,
    localize: bool,
    bindings: &HashMap<String, String>,
    registry: &TagRegistry,
    strings: &StringTable,
) -> Rendered {
    if template.is_empty() {
        return Rendered {
            text: String::new(),
            valid: true,
        };
    }

    let working: Cow<'_, str> = if localize {
        Cow::Owned(strings.user_string(template))
    } else {
        Cow::Borrowed(template)
    };
    let working: &str = working.as_ref();

    let mut text = String::with_capacity(working.len());
    let mut valid = true;

    for segment in scanner::segments(working) {
        match segment {
            Segment::Literal(literal) => text.push_str(literal),
            Segment::Token(token) => {
                let label = token.effective_label();
                let Some(data) = bindings.get(label) else {
                    warn!(
                        label,
                        token = &working[token.span.clone()],
                        "no binding found for label"
                    );
                    valid = false;
                    text.push_str(&strings.user_string("ERROR"));
                    continue;
                };

                let substitution = registry.get(&token.tag).and_then(|func| func(data));
                match substitution {
                    Some(output) => text.push_str(&output),
                    None => {
                        warn!(
                            tag = token.tag.as_str(),
                            token = &working[token.span.clone()],
                            "no substitution executed for tag"
                        );
                        valid = false;
                        text.push_str(&strings.user_string("ERROR"));
                    }
                }
            }
        }
    }

    Rendered { text, valid }
}
