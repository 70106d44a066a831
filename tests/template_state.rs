//! Cache discipline and registry extension tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use vartext::{MemoryUniverse, StringTable, TagRegistry, VarText};

fn fixtures() -> (Arc<TagRegistry>, Arc<StringTable>) {
    let mut universe = MemoryUniverse::new();
    universe.add_object(42, "Earth");
    universe.add_object(5, "Sol");
    let strings = Arc::new(StringTable::default());
    let registry = Arc::new(TagRegistry::builtin(
        Arc::new(universe),
        Arc::clone(&strings),
    ));
    (registry, strings)
}

/// Registry with one extra tag whose resolver counts its invocations.
fn counting_fixtures() -> (Arc<TagRegistry>, Arc<StringTable>, Arc<AtomicUsize>) {
    let strings = Arc::new(StringTable::default());
    let mut registry = TagRegistry::builtin(Arc::new(MemoryUniverse::new()), Arc::clone(&strings));

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    registry
        .register(
            "echo",
            Box::new(move |data: &str| {
                counter.fetch_add(1, Ordering::SeqCst);
                Some(data.to_string())
            }),
        )
        .expect("echo tag is not a builtin");

    (Arc::new(registry), strings, calls)
}

#[test]
fn text_and_is_valid_share_one_render_pass() {
    let (registry, strings, calls) = counting_fixtures();
    let mut message = VarText::new(registry, strings).with_template("%echo%", false);
    message.add_binding("echo", "ping");

    assert_eq!(message.text(), "ping");
    assert!(message.is_valid());
    assert_eq!(message.text(), "ping");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn mutators_invalidate_and_trigger_exactly_one_rerender() {
    let (registry, strings, calls) = counting_fixtures();
    let mut message = VarText::new(registry, strings).with_template("%echo%", false);
    message.add_binding("echo", "ping");
    assert_eq!(message.text(), "ping");

    message.add_binding("echo", "pong");
    assert_eq!(message.text(), "pong");
    assert!(message.is_valid());
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn custom_registered_tag_dispatches_like_builtins() {
    let (registry, strings, _) = counting_fixtures();
    let mut message = VarText::new(registry, strings).with_template("say %echo:word%", false);
    message.add_binding("word", "hello");
    assert_eq!(message.text(), "say hello");
    assert!(message.is_valid());
}

#[test]
fn duplicate_custom_tag_is_rejected() {
    let strings = Arc::new(StringTable::default());
    let mut registry = TagRegistry::builtin(Arc::new(MemoryUniverse::new()), Arc::clone(&strings));
    let result = registry.register("planet", Box::new(|_: &str| None));
    assert!(result.is_err());
}

#[test]
fn set_template_reflects_new_inputs() {
    let (registry, strings) = fixtures();
    let mut message = VarText::new(registry, strings).with_template("%planet%", false);
    message.add_binding("planet", "42");
    assert_eq!(message.text(), "<planet 42>Earth</planet>");

    message.set_template("now %planet% again", false);
    assert_eq!(message.text(), "now <planet 42>Earth</planet> again");
}

#[test]
fn rebinding_reflects_new_inputs() {
    let (registry, strings) = fixtures();
    let mut message = VarText::new(registry, strings).with_template("%planet%", false);
    message.add_binding("planet", "42");
    assert_eq!(message.text(), "<planet 42>Earth</planet>");

    message.add_binding("planet", "5");
    assert_eq!(message.text(), "<planet 5>Sol</planet>");
}

#[test]
fn overwrite_keeps_exactly_one_binding_per_label() {
    let (registry, strings) = fixtures();
    let mut message = VarText::new(registry, strings);
    message.add_binding("x", "a");
    message.add_binding("x", "b");
    assert_eq!(message.variable_tags(), vec!["x"]);
}

#[test]
fn bulk_add_applies_overwrites_in_order() {
    let (registry, strings) = fixtures();
    let mut message = VarText::new(registry, strings).with_template("%rawtext:x%", false);
    message.add_bindings([("x", "one"), ("y", "other"), ("x", "two")]);
    assert_eq!(message.text(), "two");

    let mut tags = message.variable_tags();
    tags.sort_unstable();
    assert_eq!(tags, vec!["x", "y"]);
}

#[test]
fn validity_goes_invalid_then_recovers_after_fixing_bindings() {
    let (registry, strings) = fixtures();
    let mut message = VarText::new(registry, strings).with_template("%planet%", false);
    message.add_binding("planet", "404");
    assert!(!message.is_valid());

    message.add_binding("planet", "42");
    assert!(message.is_valid());
    assert_eq!(message.text(), "<planet 42>Earth</planet>");
}
