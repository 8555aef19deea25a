// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! End-to-end composition tests.
//!
//! Each test runs a whole round from a JSON reflection model into a
//! [`MemoryFiler`] and inspects the generated Java sources.

use traitsmith_core::prelude::*;
use traitsmith_core::reflect::{MemberDecl, ReflectedType};

const PERSON: &str = include_str!("fixtures/person.json");

fn run(input: &RoundInput, config: &GeneratorConfig) -> (MemoryFiler, RoundSummary, Vec<Diagnostic>) {
    let mut filer = MemoryFiler::new();
    let mut diagnostics = Vec::new();
    let summary = process_round(input, config, &mut filer, &mut diagnostics);
    (filer, summary, diagnostics)
}

fn person_round() -> (MemoryFiler, RoundSummary, Vec<Diagnostic>) {
    let input: RoundInput = serde_json::from_str(PERSON).unwrap();
    run(&input, &GeneratorConfig::default())
}

fn source<'a>(filer: &'a MemoryFiler, name: &str) -> &'a str {
    filer
        .get(name)
        .unwrap_or_else(|| panic!("{name} was not generated"))
}

#[test]
fn round_generates_every_artifact() {
    let (filer, summary, diagnostics) = person_round();
    assert!(summary.is_complete());
    assert_eq!(filer.len(), 8);
    assert_eq!(
        filer.names().collect::<Vec<_>>(),
        vec![
            "com.example.BoxDelegate",
            "com.example.BoxTrait",
            "com.example.GreeterDelegate",
            "com.example.GreeterTrait",
            "com.example.WalkerDelegate",
            "com.example.WalkerTrait",
            "com.example.app.AbstractCrate",
            "com.example.app.AbstractPerson",
        ]
    );

    // Only the private helper is worth mentioning.
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].severity, Severity::Warning);
    assert_eq!(
        diagnostics[0].location.as_deref(),
        Some("com.example.Walker.helper")
    );
}

#[test]
fn every_file_starts_with_the_generated_comment() {
    let (filer, _, _) = person_round();
    for name in filer.names() {
        assert!(
            source(&filer, name).starts_with("// Generated by traitsmith. Do not edit.\n"),
            "{name}"
        );
    }
}

#[test]
fn preferred_trait_wins_the_diamond() {
    let (filer, _, _) = person_round();
    let person = source(&filer, "com.example.app.AbstractPerson");
    assert!(person.contains(
        "public abstract class AbstractPerson implements GreeterTrait, WalkerTrait {"
    ));
    assert!(person.contains(
        "    public String greet(String other) {\n        return this.walkerDelegate.trait$greet(other);\n    }\n"
    ));
    assert_eq!(person.matches("greet(String other)").count(), 1);
    assert!(person.contains("    public abstract String name();\n"));
    assert!(person.contains("    public void walk(int steps) {\n        this.walkerDelegate.trait$walk(steps);\n"));
    assert!(person.contains("    public static final String GREETING = Greeter.GREETING;\n"));
    assert!(!person.contains("self()"));
    assert!(!person.contains("helper"));
}

#[test]
fn losing_default_stays_reachable_through_its_alias() {
    let (filer, _, _) = person_round();
    let delegate = source(&filer, "com.example.GreeterDelegate");
    assert!(delegate.contains(
        "    public String trait$greet(String other) {\n        return super.greet(other);\n    }\n"
    ));
    // A trait body calling greet() lands on the host's winner.
    assert!(delegate.contains(
        "    @Override\n    public String greet(String other) {\n        return this.target.greet(other);\n    }\n"
    ));
    assert!(delegate.contains("    @Override\n    public String name() {\n        return this.target.name();\n"));
}

#[test]
fn self_accessor_returns_the_host() {
    let (filer, _, _) = person_round();
    let interface = source(&filer, "com.example.WalkerTrait");
    assert!(!interface.contains("self()"));

    let delegate = source(&filer, "com.example.WalkerDelegate");
    assert!(delegate.contains(
        "    @Override\n    public WalkerTrait self() {\n        return this.target;\n    }\n"
    ));
}

#[test]
fn accessor_returning_the_trait_class_is_an_ordinary_method() {
    let mut input: RoundInput = serde_json::from_str(PERSON).unwrap();
    let walker = input
        .traits
        .iter_mut()
        .find(|decl| decl.name == "com.example.Walker")
        .unwrap();
    for member in &mut walker.members {
        if let MemberDecl::Method(method) = member {
            if method.self_accessor {
                method.return_type = ReflectedType::declared("com.example.Walker");
            }
        }
    }
    let (filer, _, diagnostics) = run(&input, &GeneratorConfig::default());

    let error = diagnostics
        .iter()
        .find(|diagnostic| diagnostic.is_error())
        .expect("accessor is reported");
    assert_eq!(error.location.as_deref(), Some("com.example.Walker.self"));
    assert!(error.message.contains("com.example.WalkerTrait"));

    let delegate = source(&filer, "com.example.WalkerDelegate");
    assert!(!delegate.contains("(Walker) this.target"));
    assert!(delegate.contains("        return this.target.self();\n"));
    let person = source(&filer, "com.example.app.AbstractPerson");
    assert!(person.contains("    public abstract Walker self();\n"));
}

const SAME_SIMPLE_NAME: &str = r#"{
  "traits": [
    {
      "name": "lib.Box",
      "type_parameters": [ { "name": "T" } ],
      "members": [
        { "kind": "field", "name": "MAX", "modifiers": ["public", "static", "final"],
          "type": { "kind": "primitive", "name": "int" } },
        { "kind": "method", "name": "get", "modifiers": ["public", "abstract"],
          "return_type": { "kind": "type_variable", "name": "T" } }
      ]
    },
    {
      "name": "org.Box",
      "type_parameters": [ { "name": "T" } ],
      "members": [
        { "kind": "field", "name": "MAX", "modifiers": ["public", "static", "final"],
          "type": { "kind": "primitive", "name": "int" } },
        { "kind": "method", "name": "put", "modifiers": ["public"],
          "return_type": { "kind": "void" },
          "parameters": [ { "name": "value", "type": { "kind": "type_variable", "name": "T" } } ] }
      ]
    }
  ],
  "hosts": [ { "name": "app.Crate", "traits": ["lib.Box", "org.Box"] } ]
}"#;

#[test]
fn traits_sharing_a_simple_name_keep_separate_parameters_and_constants() {
    let input: RoundInput = serde_json::from_str(SAME_SIMPLE_NAME).unwrap();
    let config = GeneratorConfig {
        emit_generated_comment: false,
        ..GeneratorConfig::default()
    };
    let (filer, summary, diagnostics) = run(&input, &config);
    assert!(summary.is_complete(), "{diagnostics:?}");

    let host = source(&filer, "app.AbstractCrate");
    assert!(host.contains(
        "public abstract class AbstractCrate<Box_T, Box2_T> implements BoxTrait<Box_T>, org.BoxTrait<Box2_T> {"
    ), "{host}");
    assert_eq!(host.matches("Box_MAX =").count(), 1, "{host}");
    assert!(host.contains("    public static final int Box_MAX = Box.MAX;\n"));
    assert!(host.contains("    public static final int Box2_MAX = org.Box.MAX;\n"));
    assert!(host.contains(
        "    private final org.BoxDelegate<Box2_T> boxDelegate2 = new org.BoxDelegate<>(this);\n"
    ));
    assert!(host.contains("    public abstract Box_T get();\n"));
    assert!(host.contains(
        "    public void put(Box2_T value) {\n        this.boxDelegate2.trait$put(value);\n"
    ));

    // The trait's own files are unaffected by how a host composes it.
    let interface = source(&filer, "org.BoxTrait");
    assert!(interface.contains("public interface BoxTrait<Box_T> {"));
}

#[test]
fn intersection_bound_expands_into_extends_list() {
    let (filer, _, _) = person_round();
    let interface = source(&filer, "com.example.BoxTrait");
    assert!(interface.contains("import java.io.Serializable;\n"));
    assert!(interface.contains(
        "public interface BoxTrait<Box_T extends Comparable<Box_T> & Serializable> {"
    ));
    assert!(!interface.contains("Object"));
    assert!(interface.contains("    Box_T get();\n"));
    assert!(interface.contains("    void put(Box_T value);\n"));
}

#[test]
fn generic_host_merges_superclass_and_trait_parameters() {
    let (filer, _, _) = person_round();
    let host = source(&filer, "com.example.app.AbstractCrate");
    assert!(host.contains("import com.example.BoxTrait;\n"));
    assert!(host.contains(
        "public abstract class AbstractCrate<S0, Box_T extends Comparable<Box_T> & Serializable> extends Base<S0> implements BoxTrait<Box_T> {"
    ));
    assert!(host.contains(
        "    private final BoxDelegate<Box_T> boxDelegate = new BoxDelegate<>(this);\n"
    ));
    assert!(host.contains("    public abstract Box_T get();\n"));
}

#[test]
fn rounds_are_deterministic() {
    let (first, _, _) = person_round();
    let (second, _, _) = person_round();
    let first_names: Vec<_> = first.names().collect();
    assert_eq!(first_names, second.names().collect::<Vec<_>>());
    for name in first_names {
        assert_eq!(first.get(name), second.get(name));
    }
}

#[test]
fn custom_naming_flows_through_every_artifact() {
    let input: RoundInput = serde_json::from_str(PERSON).unwrap();
    let config = GeneratorConfig {
        interface_suffix: "Like".into(),
        delegate_suffix: "Impl".into(),
        superclass_prefix: "Base".into(),
        default_alias_prefix: "mixin$".into(),
        emit_generated_comment: false,
        ..GeneratorConfig::default()
    };
    let (filer, summary, diagnostics) = run(&input, &config);
    assert!(summary.is_complete());
    // The accessor still names the default interface.
    assert!(diagnostics.iter().any(|diagnostic| {
        diagnostic.is_error() && diagnostic.location.as_deref() == Some("com.example.Walker.self")
    }));
    let person = source(&filer, "com.example.app.BasePerson");
    assert!(person.starts_with("package com.example.app;"));
    assert!(person.contains("implements GreeterLike, WalkerLike {"));
    assert!(person.contains("    private final WalkerImpl walkerImpl = new WalkerImpl(this);\n"));
    assert!(person.contains("return this.walkerImpl.mixin$greet(other);"));
    assert!(source(&filer, "com.example.GreeterImpl").contains("public String mixin$greet(String other) {"));
}

#[test]
fn host_without_preference_takes_first_declared_trait() {
    let mut input: RoundInput = serde_json::from_str(PERSON).unwrap();
    input.hosts[0].preferences.clear();
    let (filer, _, _) = run(&input, &GeneratorConfig::default());
    let person = source(&filer, "com.example.app.AbstractPerson");
    assert!(person.contains("return this.greeterDelegate.trait$greet(other);"));
}
