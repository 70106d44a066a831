//! The deliberate leniency split between tag families.
//!
//! Entity tags (objects, empires, named content, meters) fail hard: an
//! unresolvable reference becomes the ERROR placeholder and poisons the
//! render's validity. Ship-design and value tags fail soft: they substitute
//! a localized "unknown" text and leave validity intact, because those
//! references routinely outlive their targets (deleted designs, renamed
//! value expressions) in old saved messages. Both halves of the contract are
//! pinned here; do not "fix" the soft families into hard failures.

use std::sync::Arc;

use vartext::{MemoryUniverse, Rendered, StringTable, TagRegistry, VarText};

fn render(template: &str, bindings: &[(&str, &str)]) -> Rendered {
    let mut universe = MemoryUniverse::new();
    universe.add_object(42, "Earth");
    universe.add_design(101, "Venator");
    universe.add_generic_design("SD_SCOUT", "Scout");
    universe.add_value("HABITABLE_SIZE", "5");

    let mut strings = StringTable::default();
    strings.add("HABITABLE_SIZE", "Habitable Size");

    let strings = Arc::new(strings);
    let registry = Arc::new(TagRegistry::builtin(
        Arc::new(universe),
        Arc::clone(&strings),
    ));
    let mut message = VarText::new(registry, strings).with_template(template, false);
    message.add_bindings(bindings.iter().copied());
    Rendered {
        text: message.text().to_string(),
        valid: message.is_valid(),
    }
}

#[test]
fn shipdesign_resolves_player_designs_by_id() {
    let rendered = render("%shipdesign%", &[("shipdesign", "101")]);
    assert_eq!(rendered.text, "<shipdesign 101>Venator</shipdesign>");
    assert!(rendered.valid);
}

#[test]
fn shipdesign_falls_back_to_predefined_designs_by_name() {
    let rendered = render("%shipdesign%", &[("shipdesign", "SD_SCOUT")]);
    assert_eq!(
        rendered.text,
        "<predefinedshipdesign SD_SCOUT>Scout</predefinedshipdesign>"
    );
    assert!(rendered.valid);
}

#[test]
fn shipdesign_stays_valid_when_both_lookups_miss() {
    let rendered = render("%shipdesign%", &[("shipdesign", "999")]);
    assert_eq!(rendered.text, "unknown design");
    assert!(rendered.valid);
}

#[test]
fn predefined_design_tag_alone_fails_hard() {
    // The standalone by-name tag keeps the strict contract.
    let rendered = render(
        "%predefinedshipdesign%",
        &[("predefinedshipdesign", "SD_GONE")],
    );
    assert_eq!(rendered.text, "ERROR");
    assert!(!rendered.valid);
}

#[test]
fn value_tag_wraps_known_expressions() {
    let rendered = render("%value%", &[("value", "HABITABLE_SIZE")]);
    assert_eq!(rendered.text, "<value 5>Habitable Size</value>");
    assert!(rendered.valid);
}

#[test]
fn value_tag_stays_valid_for_unknown_expressions() {
    let rendered = render("%value:foo%", &[("foo", "NO_SUCH_VALUE")]);
    assert_eq!(
        rendered.text,
        "<value unknown value>NO_SUCH_VALUE</value>"
    );
    assert!(rendered.valid);
}

#[test]
fn entity_tags_fail_hard_in_the_same_universe() {
    // Contrast case: an object miss in the very same setup poisons validity.
    let rendered = render("%planet%", &[("planet", "404")]);
    assert_eq!(rendered.text, "ERROR");
    assert!(!rendered.valid);
}

#[test]
fn soft_and_hard_failures_combine_per_token() {
    let rendered = render(
        "%shipdesign% vs %planet%",
        &[("shipdesign", "999"), ("planet", "404")],
    );
    assert_eq!(rendered.text, "unknown design vs ERROR");
    assert!(!rendered.valid);
}
