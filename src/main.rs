//! vartext CLI
//!
//! Usage:
//!   vartext [OPTIONS] [TEMPLATE]
//!
//! Options:
//!   -l, --lookup             Treat TEMPLATE as a stringtable key
//!   -b, --bind <LABEL=DATA>  Add a binding (repeatable)
//!   -s, --strings <FILE>     Stringtable file (TOML format)
//!   -u, --universe <FILE>    Universe description file (TOML format)
//!   -c, --check              Report unresolved tokens instead of rendering
//!       --tags               Show the built-in tag reference
//!   -h, --help               Print help

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use ariadne::{Color, Label, Report, ReportKind, Source};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use vartext::{scanner, MemoryUniverse, StringTable, TagRegistry, VarText};

#[derive(Parser)]
#[command(name = "vartext")]
#[command(about = "Variable substitution for game message templates")]
struct Cli {
    /// Template text (reads from stdin if not provided)
    template: Option<String>,

    /// Treat the template as a stringtable key and look it up first
    #[arg(short, long)]
    lookup: bool,

    /// Bind a label to data, e.g. -b planet=42 (repeatable)
    #[arg(short, long = "bind", value_name = "LABEL=DATA")]
    bind: Vec<String>,

    /// Stringtable file (TOML format); built-in English table if omitted
    #[arg(short, long)]
    strings: Option<PathBuf>,

    /// Universe description file (TOML format); empty universe if omitted
    #[arg(short, long)]
    universe: Option<PathBuf>,

    /// Report every token that fails to resolve, with its position
    #[arg(short, long)]
    check: bool,

    /// Show the built-in tag reference
    #[arg(long)]
    tags: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.tags {
        print_tags();
        return;
    }

    // Read the template
    let template = match &cli.template {
        Some(arg) => arg.clone(),
        None => {
            if io::stdin().is_terminal() {
                eprintln!("No template given; pass one as an argument or on stdin.");
                std::process::exit(2);
            }
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => buffer.trim_end_matches('\n').to_string(),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    // Load collaborators
    let strings = match &cli.strings {
        Some(path) => match StringTable::from_file(path) {
            Ok(table) => table,
            Err(e) => {
                eprintln!("Error loading stringtable '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => StringTable::default(),
    };
    tracing::debug!(entries = strings.len(), "stringtable loaded");

    let universe = match &cli.universe {
        Some(path) => match MemoryUniverse::from_file(path) {
            Ok(universe) => universe,
            Err(e) => {
                eprintln!("Error loading universe '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => MemoryUniverse::new(),
    };

    let strings = Arc::new(strings);
    let registry = Arc::new(TagRegistry::builtin(
        Arc::new(universe),
        Arc::clone(&strings),
    ));

    // Parse bindings
    let mut bindings = Vec::new();
    for entry in &cli.bind {
        match entry.split_once('=') {
            Some((label, data)) => bindings.push((label.to_string(), data.to_string())),
            None => {
                eprintln!("Invalid binding '{}': expected LABEL=DATA", entry);
                std::process::exit(2);
            }
        }
    }

    if cli.check {
        let failures = check_template(&template, cli.lookup, &bindings, &registry, &strings);
        if failures > 0 {
            eprintln!(
                "{} token{} failed to resolve",
                failures,
                if failures == 1 { "" } else { "s" }
            );
            std::process::exit(1);
        }
        println!("all tokens resolved");
        return;
    }

    let mut message =
        VarText::new(registry, strings).with_template(template, cli.lookup);
    message.add_bindings(bindings);

    println!("{}", message.text());
    if !message.is_valid() {
        std::process::exit(1);
    }
}

/// Re-resolve each token individually and report the ones that fail, with
/// their spans in the working template. Mirrors the render pass exactly, so
/// a clean check implies a valid render.
fn check_template(
    template: &str,
    lookup: bool,
    bindings: &[(String, String)],
    registry: &TagRegistry,
    strings: &StringTable,
) -> usize {
    let working = if lookup {
        strings.user_string(template)
    } else {
        template.to_string()
    };

    let bound: std::collections::HashMap<&str, &str> = bindings
        .iter()
        .map(|(label, data)| (label.as_str(), data.as_str()))
        .collect();

    let mut failures = 0;
    for token in scanner::tokens(&working) {
        let label = token.effective_label();
        let problem = match bound.get(label).copied() {
            None => Some(format!("no binding for label '{}'", label)),
            Some(data) => match registry.get(&token.tag) {
                None => Some(format!("unknown tag '{}'", token.tag)),
                Some(func) => match func(data) {
                    Some(_) => None,
                    None => Some(format!(
                        "tag '{}' refused to substitute data '{}'",
                        token.tag, data
                    )),
                },
            },
        };

        if let Some(message) = problem {
            failures += 1;
            let mut buf = Vec::new();
            Report::build(ReportKind::Error, "template", token.span.start)
                .with_message(&message)
                .with_label(
                    Label::new(("template", token.span.clone()))
                        .with_message(message.clone())
                        .with_color(Color::Red),
                )
                .finish()
                .write(("template", Source::from(working.as_str())), &mut buf)
                .ok();
            eprint!("{}", String::from_utf8_lossy(&buf));
        }
    }
    failures
}

fn print_tags() {
    println!(
        r#"VARTEXT BUILT-IN TAGS
=====================

Tokens have the form %tag% or %tag:label%. The label picks the binding the
token's data comes from; without one, the tag name doubles as the label.

PLAIN TEXT
----------
text        Localize the bound data through the stringtable
rawtext     Splice the bound data unchanged

OBJECTS BY ID
-------------
planet, system, ship, fleet, building, field
            Bound data is an object id; substitutes the object's name
            wrapped as <tag id>name</tag>. Fails on a malformed id or an
            unknown object.

EMPIRES AND COMBAT
------------------
empire      Bound data is an empire id; fails when unknown
combat      Always substitutes the localized combat marker

SHIP DESIGNS
------------
shipdesign  Player design by id, then predefined design by name; degrades
            to the localized unknown-design text instead of failing
predefinedshipdesign
            Predefined design by name only; fails when unknown

NAMED CONTENT
-------------
tech, policy, buildingtype, special, species, fieldtype, shiphull, shippart
            Bound data names a piece of game content; substitutes its
            localized display name. Fails when the content doesn't exist.

VALUES AND METERS
-----------------
value       Named value expression; unknown names degrade to the localized
            unknown-value text instead of failing
metertype   Canonical meter name (e.g. METER_POPULATION); fails on unknown
            meters or missing display strings

EXAMPLES
--------
vartext -b planet=42 -u universe.toml 'Welcome to %planet%.'
vartext --lookup -b planet=42 -u universe.toml SITREP_PLANET_COLONIZED
vartext --check -b name=oops '%planet:name%'"#
    );
}
