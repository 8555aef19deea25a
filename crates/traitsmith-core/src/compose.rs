// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Diamond-conflict resolution.
//!
//! **DDD Context:** Composition — Domain Service
//!
//! Merges the methods of every trait a host composes into one list of
//! signature groups. Methods whose normalized signatures are equal land in
//! the same group; a group with more than one entry is a collision. The
//! entry at the front of a group wins: by default the first trait in the
//! host's composition order, or the trait a preference names for that
//! method.
//!
//! Also decides the generated superclass's type parameters, its delegate
//! field names and how trait constants are re-declared.

use crate::config::GeneratorConfig;
use crate::descriptor::{HostDescriptor, TraitConstant, TraitDescriptor, TraitMethod, decapitalize};
use crate::signature::MethodSignature;
use crate::types::GenericParam;
use ecow::{EcoString, eco_format};
use tracing::{debug, trace};

/// One trait's method in a signature group.
#[derive(Debug, Clone, Copy)]
pub struct Contribution<'a> {
    /// Position of the trait in the host's composition order.
    pub trait_index: usize,
    pub owner: &'a TraitDescriptor,
    pub method: &'a TraitMethod,
}

/// Every contribution sharing one normalized signature.
#[derive(Debug, Clone)]
pub struct SignatureGroup<'a> {
    pub signature: MethodSignature,
    pub entries: Vec<Contribution<'a>>,
}

impl<'a> SignatureGroup<'a> {
    /// The contribution the host superclass uses.
    #[must_use]
    pub fn winner(&self) -> &Contribution<'a> {
        &self.entries[0]
    }

    #[must_use]
    pub fn is_collision(&self) -> bool {
        self.entries.len() > 1
    }
}

/// Groups the composable methods of `traits` by normalized signature.
///
/// Groups appear in the order their signature is first seen; entries within
/// a group follow `traits` order.
#[must_use]
pub fn accumulate(traits: &[TraitDescriptor]) -> Vec<SignatureGroup<'_>> {
    let mut groups: Vec<SignatureGroup<'_>> = Vec::new();
    for (trait_index, owner) in traits.iter().enumerate() {
        for method in owner.composable_methods() {
            let signature = method.normalized_signature();
            let contribution = Contribution {
                trait_index,
                owner,
                method,
            };
            match groups.iter_mut().find(|group| group.signature == signature) {
                Some(group) => group.entries.push(contribution),
                None => groups.push(SignatureGroup {
                    signature,
                    entries: vec![contribution],
                }),
            }
        }
    }
    groups
}

/// Moves the preferred trait's entry to the front of each group whose
/// method name has a preference. Applying it twice changes nothing.
pub fn apply_preferences(groups: &mut [SignatureGroup<'_>], host: &HostDescriptor) {
    for group in groups {
        let Some(preferred) = host.preferred_trait(&group.signature.name) else {
            continue;
        };
        let position = group
            .entries
            .iter()
            .position(|entry| entry.owner.qualified_name().as_str() == preferred);
        if let Some(position) = position {
            let entry = group.entries.remove(position);
            group.entries.insert(0, entry);
        }
    }
}

/// Accumulates and resolves the signature groups of a host.
#[must_use]
pub fn resolve_groups(host: &HostDescriptor) -> Vec<SignatureGroup<'_>> {
    let mut groups = accumulate(host.traits());
    apply_preferences(&mut groups, host);
    for group in groups.iter().filter(|group| group.is_collision()) {
        let winner = group.winner();
        debug!(
            signature = %group.signature,
            contenders = group.entries.len(),
            winner = %winner.owner.qualified_name(),
            "collision"
        );
    }
    groups
}

/// Type parameters of the generated superclass.
///
/// The desired superclass's parameters come first. Each trait's qualified
/// parameters follow in composition order; one whose name is already taken
/// is dropped and the earlier parameter keeps its position.
#[must_use]
pub fn merge_type_params(host: &HostDescriptor, config: &GeneratorConfig) -> Vec<GenericParam> {
    let mut merged = host
        .superclass()
        .map(|superclass| superclass.type_params(&config.auto_parameter_prefix))
        .unwrap_or_default();
    for owner in host.traits() {
        for param in owner.type_params() {
            let name = param.effective_name();
            if merged.iter().any(|existing| existing.effective_name() == name) {
                trace!(%name, "type parameter already declared");
                continue;
            }
            merged.push(param.clone());
        }
    }
    merged
}

/// A constant as re-declared on the host superclass.
#[derive(Debug, Clone, Copy)]
pub struct ComposedConstant<'a> {
    pub owner: &'a TraitDescriptor,
    pub constant: &'a TraitConstant,
    /// Whether the name collides with another trait's constant.
    pub prefixed: bool,
}

impl ComposedConstant<'_> {
    /// `MAX`, or `Greeter_MAX` on a collision.
    #[must_use]
    pub fn name(&self) -> EcoString {
        if self.prefixed {
            eco_format!("{}_{}", self.owner.qualifier(), self.constant.name)
        } else {
            self.constant.name.clone()
        }
    }
}

/// Every constant of every trait. Names declared by more than one trait are
/// all prefixed with their trait's qualifier, which the host keeps unique.
#[must_use]
pub fn compose_constants(traits: &[TraitDescriptor]) -> Vec<ComposedConstant<'_>> {
    let all: Vec<(&TraitDescriptor, &TraitConstant)> = traits
        .iter()
        .flat_map(|owner| owner.constants().iter().map(move |constant| (owner, constant)))
        .collect();
    all.iter()
        .map(|&(owner, constant)| {
            let prefixed = all.iter().any(|&(other, other_constant)| {
                !std::ptr::eq(other, owner) && other_constant.name == constant.name
            });
            ComposedConstant {
                owner,
                constant,
                prefixed,
            }
        })
        .collect()
}

/// Names of the delegate fields on the host superclass, one per trait.
///
/// `greeterDelegate`, or `greeterDelegate2` and so on when two traits
/// share a simple name.
#[must_use]
pub fn delegate_field_names(traits: &[TraitDescriptor], config: &GeneratorConfig) -> Vec<EcoString> {
    let mut names: Vec<EcoString> = Vec::with_capacity(traits.len());
    for owner in traits {
        let base = decapitalize(&config.delegate_name(owner.simple_name()));
        let mut candidate = base.clone();
        let mut counter = 2;
        while names.contains(&candidate) {
            candidate = eco_format!("{base}{counter}");
            counter += 1;
        }
        names.push(candidate);
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{
        FieldDecl, HostDeclaration, MemberDecl, PreferenceDecl, ReflectedModifier, ReflectedType,
        TypeParameterDecl,
    };
    use crate::test_helpers::{
        abstract_method, concrete_method, int_type, lookup_of, resolve_trait, simple_trait,
        simple_trait_decl, string_type, with_param,
    };

    fn host_of(traits: &[TraitDescriptor], preferences: &[(&str, &str)]) -> HostDescriptor {
        let decl = HostDeclaration {
            name: "app.Host".into(),
            traits: traits.iter().map(TraitDescriptor::qualified_name).collect(),
            superclass: None,
            preferences: preferences
                .iter()
                .map(|(method, trait_name)| PreferenceDecl {
                    method: (*method).into(),
                    trait_name: (*trait_name).into(),
                })
                .collect(),
        };
        HostDescriptor::resolve(&decl, &lookup_of(traits), &mut Vec::new()).unwrap()
    }

    fn adder(name: &str) -> TraitDescriptor {
        let mut decl = simple_trait_decl(name, &[]);
        let method = with_param(
            with_param(concrete_method("foo", int_type()), "a", int_type()),
            "b",
            int_type(),
        );
        decl.members.push(MemberDecl::Method(method));
        resolve_trait(&decl)
    }

    fn winner_of(groups: &[SignatureGroup<'_>], name: &str) -> EcoString {
        groups
            .iter()
            .find(|group| group.signature.name == name)
            .unwrap()
            .winner()
            .owner
            .qualified_name()
    }

    #[test]
    fn identical_signatures_form_one_group() {
        let traits: Vec<_> = (0..4).map(|i| adder(&format!("lib.Adder{i}"))).collect();
        let groups = accumulate(&traits);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entries.len(), 4);
        assert!(groups[0].is_collision());
    }

    #[test]
    fn different_signatures_do_not_collide() {
        let mut decl = simple_trait_decl("lib.Other", &[]);
        decl.members.push(MemberDecl::Method(with_param(
            concrete_method("foo", int_type()),
            "a",
            int_type(),
        )));
        let traits = vec![adder("lib.Adder"), resolve_trait(&decl)];
        let groups = accumulate(&traits);
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().all(|group| !group.is_collision()));
    }

    #[test]
    fn same_named_parameters_from_different_traits_collide() {
        let generic = |name: &str| {
            let mut decl = simple_trait_decl(name, &[]);
            decl.type_parameters.push(TypeParameterDecl {
                name: "T".into(),
                bounds: vec![],
            });
            decl.members.push(MemberDecl::Method(abstract_method(
                "get",
                ReflectedType::variable("T"),
            )));
            resolve_trait(&decl)
        };
        let traits = vec![generic("lib.Box"), generic("lib.Cell")];
        let groups = accumulate(&traits);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[0].winner().method.return_type.to_string(), "Box_T");
    }

    #[test]
    fn first_declared_trait_wins_by_default() {
        let traits = vec![
            simple_trait("lib.First", &["m"]),
            simple_trait("lib.Second", &["m"]),
        ];
        let host = host_of(&traits, &[]);
        assert_eq!(winner_of(&resolve_groups(&host), "m"), "lib.First");
    }

    #[test]
    fn preference_moves_winner_and_is_stable() {
        let traits = vec![
            simple_trait("lib.First", &["m", "n"]),
            simple_trait("lib.Second", &["m", "n"]),
        ];
        let host = host_of(&traits, &[("m", "Second")]);
        let mut groups = resolve_groups(&host);
        assert_eq!(winner_of(&groups, "m"), "lib.Second");
        assert_eq!(winner_of(&groups, "n"), "lib.First");

        apply_preferences(&mut groups, &host);
        assert_eq!(winner_of(&groups, "m"), "lib.Second");
        for _ in 0..3 {
            assert_eq!(winner_of(&resolve_groups(&host), "m"), "lib.Second");
        }
    }

    #[test]
    fn preference_keeps_losers_in_order() {
        let traits = vec![
            simple_trait("lib.A", &["m"]),
            simple_trait("lib.B", &["m"]),
            simple_trait("lib.C", &["m"]),
        ];
        let host = host_of(&traits, &[("m", "lib.C")]);
        let groups = resolve_groups(&host);
        let order: Vec<_> = groups[0]
            .entries
            .iter()
            .map(|entry| entry.owner.simple_name().to_string())
            .collect();
        assert_eq!(order, vec!["C", "A", "B"]);
    }

    #[test]
    fn accessor_is_not_composed() {
        let mut decl = simple_trait_decl("lib.Fluent", &["m"]);
        let mut accessor = abstract_method("self", ReflectedType::declared("lib.FluentTrait"));
        accessor.self_accessor = true;
        decl.members.push(MemberDecl::Method(accessor));
        let traits = vec![resolve_trait(&decl)];
        let groups = accumulate(&traits);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].signature.name, "m");
    }

    #[test]
    fn superclass_parameters_take_precedence() {
        let mut decl = simple_trait_decl("lib.Box", &[]);
        decl.type_parameters = vec![
            TypeParameterDecl {
                name: "T".into(),
                bounds: vec![],
            },
            TypeParameterDecl {
                name: "U".into(),
                bounds: vec![],
            },
        ];
        let traits = vec![resolve_trait(&decl)];
        let host_decl = HostDeclaration {
            name: "app.Host".into(),
            traits: vec!["lib.Box".into()],
            superclass: Some(crate::reflect::SuperclassDecl {
                name: "app.Base".into(),
                type_parameters: vec![],
                arguments: vec![
                    crate::reflect::SuperclassArgument::Named {
                        name: "Box_T".into(),
                    },
                    crate::reflect::SuperclassArgument::Auto,
                ],
            }),
            preferences: vec![],
        };
        let host = HostDescriptor::resolve(&host_decl, &lookup_of(&traits), &mut Vec::new()).unwrap();
        let names: Vec<_> = merge_type_params(&host, &GeneratorConfig::default())
            .iter()
            .map(GenericParam::effective_name)
            .collect();
        assert_eq!(names, vec!["Box_T", "S1", "Box_U"]);
    }

    #[test]
    fn colliding_constants_are_prefixed() {
        let constant = |name: &str| {
            MemberDecl::Field(FieldDecl {
                name: name.into(),
                ty: string_type(),
                modifiers: vec![
                    ReflectedModifier::Public,
                    ReflectedModifier::Static,
                    ReflectedModifier::Final,
                ],
            })
        };
        let mut first = simple_trait_decl("lib.First", &[]);
        first.members = vec![constant("NAME"), constant("ONLY_FIRST")];
        let mut second = simple_trait_decl("lib.Second", &[]);
        second.members = vec![constant("NAME")];
        let traits = vec![resolve_trait(&first), resolve_trait(&second)];
        let names: Vec<_> = compose_constants(&traits)
            .iter()
            .map(ComposedConstant::name)
            .collect();
        assert_eq!(names, vec!["First_NAME", "ONLY_FIRST", "Second_NAME"]);
    }

    #[test]
    fn same_simple_name_traits_keep_constants_and_parameters_apart() {
        let boxed = |name: &str| {
            let mut decl = simple_trait_decl(name, &[]);
            decl.type_parameters.push(TypeParameterDecl {
                name: "T".into(),
                bounds: vec![],
            });
            decl.members.push(MemberDecl::Field(FieldDecl {
                name: "MAX".into(),
                ty: int_type(),
                modifiers: vec![
                    ReflectedModifier::Public,
                    ReflectedModifier::Static,
                    ReflectedModifier::Final,
                ],
            }));
            resolve_trait(&decl)
        };
        let host = host_of(&[boxed("lib.Box"), boxed("org.Box")], &[]);

        let constants: Vec<_> = compose_constants(host.traits())
            .iter()
            .map(ComposedConstant::name)
            .collect();
        assert_eq!(constants, vec!["Box_MAX", "Box2_MAX"]);

        let params: Vec<_> = merge_type_params(&host, &GeneratorConfig::default())
            .iter()
            .map(GenericParam::effective_name)
            .collect();
        assert_eq!(params, vec!["Box_T", "Box2_T"]);
    }

    #[test]
    fn delegate_fields_are_disambiguated() {
        let traits = vec![
            simple_trait("lib.Greeter", &["a"]),
            simple_trait("org.Greeter", &["b"]),
            simple_trait("lib.Walker", &["c"]),
        ];
        assert_eq!(
            delegate_field_names(&traits, &GeneratorConfig::default()),
            vec!["greeterDelegate", "greeterDelegate2", "walkerDelegate"]
        );
    }
}
