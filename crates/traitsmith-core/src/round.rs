// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! One generation round.
//!
//! **DDD Context:** Code Generation
//!
//! A round resolves every trait, generates the trait artifacts, then
//! resolves and generates every host. A declaration that fails is reported
//! at its own name and skipped; everything unrelated still generates. A host
//! composing a trait whose artifacts could not be written is skipped too,
//! since its superclass would refer to missing types.

use crate::config::GeneratorConfig;
use crate::descriptor::{HostDescriptor, ResolveError, TraitDescriptor, TraitLookup};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::filer::SourceFiler;
use crate::generate::Generator;
use crate::reflect::RoundInput;
use ecow::{EcoString, eco_format};
use std::collections::HashSet;
use tracing::{debug, info, instrument};

/// What a round produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundSummary {
    /// Qualified names of every generated file, in generation order.
    pub generated: Vec<EcoString>,
    /// Traits that failed to resolve or generate.
    pub skipped_traits: usize,
    /// Hosts that failed to resolve or generate, or compose a skipped trait.
    pub skipped_hosts: usize,
}

impl RoundSummary {
    /// Whether every declaration generated.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.skipped_traits == 0 && self.skipped_hosts == 0
    }
}

/// Processes every declaration in `input`.
#[instrument(skip_all, fields(traits = input.traits.len(), hosts = input.hosts.len()))]
pub fn process_round(
    input: &RoundInput,
    config: &GeneratorConfig,
    filer: &mut dyn SourceFiler,
    sink: &mut dyn DiagnosticSink,
) -> RoundSummary {
    let mut summary = RoundSummary::default();
    let lookup = resolve_traits(input, config, sink, &mut summary);

    let mut generator = Generator::new(config.clone(), filer);
    let mut failed: HashSet<EcoString> = HashSet::new();
    for descriptor in lookup.iter() {
        match generator.generate_trait_artifacts(descriptor) {
            Ok(artifacts) => {
                summary.generated.push(artifacts.interface_name);
                summary.generated.push(artifacts.delegate_name);
            }
            Err(err) => {
                sink.report(Diagnostic::error(err.to_string()).at(descriptor.qualified_name()));
                failed.insert(descriptor.qualified_name());
                summary.skipped_traits += 1;
            }
        }
    }

    for decl in &input.hosts {
        let host = match HostDescriptor::resolve(decl, &lookup, sink) {
            Ok(host) => host,
            Err(err) => {
                report_resolve_error(sink, &decl.name, &err);
                summary.skipped_hosts += 1;
                continue;
            }
        };
        if let Some(missing) = host
            .traits()
            .iter()
            .find(|owner| failed.contains(&owner.qualified_name()))
        {
            sink.report(
                Diagnostic::error(eco_format!(
                    "superclass not generated: artifacts for trait '{}' are missing",
                    missing.qualified_name()
                ))
                .at(decl.name.clone()),
            );
            summary.skipped_hosts += 1;
            continue;
        }
        match generator.generate_host_superclass(&host) {
            Ok(name) => summary.generated.push(name),
            Err(err) => {
                sink.report(Diagnostic::error(err.to_string()).at(decl.name.clone()));
                summary.skipped_hosts += 1;
            }
        }
    }

    info!(
        generated = summary.generated.len(),
        skipped_traits = summary.skipped_traits,
        skipped_hosts = summary.skipped_hosts,
        "round finished"
    );
    summary
}

fn resolve_traits(
    input: &RoundInput,
    config: &GeneratorConfig,
    sink: &mut dyn DiagnosticSink,
    summary: &mut RoundSummary,
) -> TraitLookup {
    let mut lookup = TraitLookup::new();
    for decl in &input.traits {
        let descriptor = match TraitDescriptor::resolve_with_config(decl, config, sink) {
            Ok(descriptor) => descriptor,
            Err(err) => {
                report_resolve_error(sink, &decl.name, &err);
                summary.skipped_traits += 1;
                continue;
            }
        };
        let name = descriptor.qualified_name();
        if lookup.get(&name).is_some() {
            report_resolve_error(sink, &decl.name, &ResolveError::DuplicateTrait(name));
            summary.skipped_traits += 1;
            continue;
        }
        debug!(%name, "trait resolved");
        lookup.insert(descriptor);
    }
    lookup
}

fn report_resolve_error(sink: &mut dyn DiagnosticSink, location: &str, err: &ResolveError) {
    let diagnostic = Diagnostic::error(err.to_string()).at(location);
    let diagnostic = match err {
        ResolveError::AmbiguousTrait { .. } => {
            diagnostic.with_hint("use the trait's qualified name")
        }
        ResolveError::UnknownTrait(_) => {
            diagnostic.with_hint("traits must be declared in the same round")
        }
        _ => diagnostic,
    };
    sink.report(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filer::MemoryFiler;
    use crate::reflect::{HostDeclaration, MemberDecl, TraitDeclaration};
    use crate::test_helpers::{concrete_method, simple_trait_decl, string_type};
    use std::io::{self, Write};

    fn host(name: &str, traits: &[&str]) -> HostDeclaration {
        HostDeclaration {
            name: name.into(),
            traits: traits.iter().map(|name| (*name).into()).collect(),
            superclass: None,
            preferences: vec![],
        }
    }

    fn input(traits: Vec<TraitDeclaration>, hosts: Vec<HostDeclaration>) -> RoundInput {
        RoundInput { traits, hosts }
    }

    #[test]
    fn generates_every_artifact() {
        let input = input(
            vec![
                simple_trait_decl("lib.Greeter", &["greet"]),
                simple_trait_decl("lib.Walker", &["walk"]),
            ],
            vec![host("app.Person", &["Greeter", "lib.Walker"])],
        );
        let mut filer = MemoryFiler::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = process_round(&input, &GeneratorConfig::default(), &mut filer, &mut sink);

        assert!(sink.is_empty(), "{sink:?}");
        assert!(summary.is_complete());
        assert_eq!(
            summary.generated,
            vec![
                "lib.GreeterTrait",
                "lib.GreeterDelegate",
                "lib.WalkerTrait",
                "lib.WalkerDelegate",
                "app.AbstractPerson",
            ]
        );
        assert_eq!(filer.len(), 5);
    }

    #[test]
    fn failing_trait_is_reported_at_its_name() {
        let mut broken = simple_trait_decl("lib.Broken", &["go"]);
        broken.superclass = Some(crate::reflect::ReflectedType::declared("lib.Base"));
        let input = input(
            vec![broken, simple_trait_decl("lib.Greeter", &["greet"])],
            vec![
                host("app.Person", &["Greeter"]),
                host("app.Robot", &["Broken"]),
            ],
        );
        let mut filer = MemoryFiler::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = process_round(&input, &GeneratorConfig::default(), &mut filer, &mut sink);

        assert_eq!(summary.skipped_traits, 1);
        assert_eq!(summary.skipped_hosts, 1);
        assert!(filer.get("app.AbstractPerson").is_some());
        assert!(filer.get("app.AbstractRobot").is_none());
        let locations: Vec<_> = sink
            .iter()
            .filter(|diagnostic| diagnostic.is_error())
            .filter_map(|diagnostic| diagnostic.location.as_deref())
            .collect();
        assert_eq!(locations, vec!["lib.Broken", "app.Robot"]);
    }

    #[test]
    fn duplicate_trait_is_skipped() {
        let input = input(
            vec![
                simple_trait_decl("lib.Greeter", &["greet"]),
                simple_trait_decl("lib.Greeter", &["other"]),
            ],
            vec![],
        );
        let mut filer = MemoryFiler::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = process_round(&input, &GeneratorConfig::default(), &mut filer, &mut sink);
        assert_eq!(summary.skipped_traits, 1);
        assert_eq!(summary.generated.len(), 2);
        assert!(filer.get("lib.GreeterTrait").unwrap().contains("greet()"));
    }

    #[test]
    fn ambiguous_trait_name_gets_a_hint() {
        let input = input(
            vec![
                simple_trait_decl("a.Greeter", &["greet"]),
                simple_trait_decl("b.Greeter", &["greet"]),
            ],
            vec![host("app.Person", &["Greeter"])],
        );
        let mut sink: Vec<Diagnostic> = Vec::new();
        process_round(
            &input,
            &GeneratorConfig::default(),
            &mut MemoryFiler::new(),
            &mut sink,
        );
        let error = sink.iter().find(|diagnostic| diagnostic.is_error()).unwrap();
        assert_eq!(error.location.as_deref(), Some("app.Person"));
        assert!(error.hint.is_some());
    }

    /// Accepts interfaces and delegates, refuses everything in `lib.locked`.
    struct LockedFiler(MemoryFiler);

    impl SourceFiler for LockedFiler {
        fn create_source(
            &mut self,
            qualified_name: &str,
            originating: &str,
        ) -> io::Result<Box<dyn Write + '_>> {
            if qualified_name.starts_with("lib.locked.") {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked"));
            }
            self.0.create_source(qualified_name, originating)
        }
    }

    #[test]
    fn host_of_unwritten_trait_is_skipped() {
        let mut locked = simple_trait_decl("lib.locked.Secret", &[]);
        locked
            .members
            .push(MemberDecl::Method(concrete_method("hide", string_type())));
        let input = input(
            vec![locked, simple_trait_decl("lib.Greeter", &["greet"])],
            vec![
                host("app.Spy", &["Greeter", "Secret"]),
                host("app.Person", &["Greeter"]),
            ],
        );
        let mut filer = LockedFiler(MemoryFiler::new());
        let mut sink: Vec<Diagnostic> = Vec::new();
        let summary = process_round(&input, &GeneratorConfig::default(), &mut filer, &mut sink);

        assert_eq!(summary.skipped_traits, 1);
        assert_eq!(summary.skipped_hosts, 1);
        assert!(filer.0.get("app.AbstractPerson").is_some());
        assert!(filer.0.get("app.AbstractSpy").is_none());
        assert!(sink.iter().any(|diagnostic| {
            diagnostic.location.as_deref() == Some("app.Spy")
                && diagnostic.message.contains("lib.locked.Secret")
        }));
    }
}
