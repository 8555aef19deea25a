// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Host descriptors.

use super::{ResolveError, TraitDescriptor, TraitLookup};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::reflect::{HostDeclaration, SuperclassArgument, SuperclassDecl};
use crate::types::{DeclaredType, GenericParam, TypeError, TypeRef};
use ecow::{EcoString, eco_format};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// How one type argument of the desired superclass is supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuperclassArg {
    Explicit(TypeRef),
    /// A parameter of the generated superclass with this name.
    Named(EcoString),
    /// A parameter named after its position.
    Auto,
}

/// The class a host's generated superclass extends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredSuperclass {
    ty: DeclaredType,
    /// The superclass's own parameter names and bounds, when declared.
    parameters: Vec<GenericParam>,
    arguments: Vec<SuperclassArg>,
}

impl DesiredSuperclass {
    fn resolve(host: &EcoString, decl: &SuperclassDecl) -> Result<Self, ResolveError> {
        let ty = DeclaredType::from_qualified_name(&decl.name).map_err(|source| {
            ResolveError::InvalidName {
                name: decl.name.clone(),
                source,
            }
        })?;
        let invalid = |source: TypeError| ResolveError::InvalidSuperclassArgument {
            host: host.clone(),
            source,
        };
        let parameters = decl
            .type_parameters
            .iter()
            .map(|param| param.to_generic_param())
            .collect::<Result<Vec<_>, _>>()
            .map_err(invalid)?;

        let expected = parameters.len();
        let found = decl.arguments.len();
        let arguments = if found == 0 {
            vec![SuperclassArg::Auto; expected]
        } else if expected != 0 && expected != found {
            return Err(ResolveError::SuperclassArity {
                superclass: decl.name.clone(),
                expected,
                found,
            });
        } else {
            decl.arguments
                .iter()
                .map(|argument| {
                    Ok(match argument {
                        SuperclassArgument::Explicit { ty } => {
                            SuperclassArg::Explicit(ty.to_type_ref().map_err(invalid)?)
                        }
                        SuperclassArgument::Named { name } => SuperclassArg::Named(name.clone()),
                        SuperclassArgument::Auto => SuperclassArg::Auto,
                    })
                })
                .collect::<Result<Vec<_>, ResolveError>>()?
        };

        Ok(Self {
            ty,
            parameters,
            arguments,
        })
    }

    /// The superclass without type arguments.
    pub fn erased(&self) -> &DeclaredType {
        &self.ty
    }

    pub fn arguments(&self) -> &[SuperclassArg] {
        &self.arguments
    }

    fn argument_name(&self, index: usize, auto_prefix: &str) -> Option<EcoString> {
        match &self.arguments[index] {
            SuperclassArg::Explicit(_) => None,
            SuperclassArg::Named(name) => Some(name.clone()),
            SuperclassArg::Auto => Some(eco_format!("{auto_prefix}{index}")),
        }
    }

    fn argument_type(&self, index: usize, auto_prefix: &str) -> TypeRef {
        match (&self.arguments[index], self.argument_name(index, auto_prefix)) {
            (SuperclassArg::Explicit(ty), _) => ty.clone(),
            (_, Some(name)) => TypeRef::generic(GenericParam::new(name)),
            (_, None) => TypeRef::root(),
        }
    }

    /// The `extends` clause, with every argument filled in.
    #[must_use]
    pub fn to_type_ref(&self, auto_prefix: &str) -> TypeRef {
        let args = (0..self.arguments.len())
            .map(|index| self.argument_type(index, auto_prefix))
            .collect();
        TypeRef::declared(self.ty.clone().with_type_args(args))
    }

    /// Generic parameters the generated superclass must declare, in
    /// argument order and without repeats.
    ///
    /// Each parameter takes the bounds of the superclass parameter it stands
    /// for, rewritten in terms of the generated class's arguments.
    #[must_use]
    pub fn type_params(&self, auto_prefix: &str) -> Vec<GenericParam> {
        let substitution: Vec<(EcoString, TypeRef)> = self
            .parameters
            .iter()
            .enumerate()
            .map(|(index, param)| {
                (
                    EcoString::from(param.name()),
                    self.argument_type(index, auto_prefix),
                )
            })
            .collect();

        let mut result: Vec<GenericParam> = Vec::new();
        for index in 0..self.arguments.len() {
            let Some(name) = self.argument_name(index, auto_prefix) else {
                continue;
            };
            if result.iter().any(|existing| existing.name() == name.as_str()) {
                continue;
            }
            let bounds = self
                .parameters
                .get(index)
                .map(|param| {
                    param
                        .extends_bounds()
                        .iter()
                        .map(|bound| substitute(bound, &substitution))
                        .collect()
                })
                .unwrap_or_default();
            result.push(GenericParam::new(name).with_extends(bounds));
        }
        result
    }
}

fn substitute(ty: &TypeRef, substitution: &[(EcoString, TypeRef)]) -> TypeRef {
    ty.map_generics(&mut |param| {
        substitution
            .iter()
            .find(|(name, _)| name == param.name())
            .map(|(_, replacement)| replacement.clone())
    })
}

/// A validated host class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDescriptor {
    ty: DeclaredType,
    traits: Vec<TraitDescriptor>,
    superclass: Option<DesiredSuperclass>,
    /// Method name to the qualified name of the preferred trait.
    preferences: BTreeMap<EcoString, EcoString>,
}

impl HostDescriptor {
    /// Builds a descriptor from a host declaration.
    ///
    /// Every composed trait must be known to `lookup` and appear once, and
    /// every preference must name a composed trait. Traits sharing a simple
    /// name are re-qualified (`Box`, `Box2`, ...) so their parameters and
    /// constants stay distinct on the generated superclass. A preference naming a
    /// trait that does not declare the method has no effect and is reported
    /// as a warning.
    #[instrument(skip_all, fields(name = %decl.name))]
    pub fn resolve(
        decl: &HostDeclaration,
        lookup: &TraitLookup,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, ResolveError> {
        let ty = DeclaredType::from_qualified_name(&decl.name).map_err(|source| {
            ResolveError::InvalidName {
                name: decl.name.clone(),
                source,
            }
        })?;
        if decl.traits.is_empty() {
            return Err(ResolveError::NoTraits {
                host: decl.name.clone(),
            });
        }

        let mut traits: Vec<TraitDescriptor> = Vec::with_capacity(decl.traits.len());
        for name in &decl.traits {
            let descriptor = lookup.find(name)?;
            let qualified = descriptor.qualified_name();
            if traits.iter().any(|existing| existing.qualified_name() == qualified) {
                return Err(ResolveError::DuplicateTrait(qualified));
            }
            traits.push(descriptor.clone());
        }
        disambiguate_qualifiers(&mut traits);

        let superclass = decl
            .superclass
            .as_ref()
            .map(|superclass| DesiredSuperclass::resolve(&decl.name, superclass))
            .transpose()?;

        let mut preferences: BTreeMap<EcoString, EcoString> = BTreeMap::new();
        for preference in &decl.preferences {
            let target = find_composed(&traits, &preference.trait_name).map_err(|err| match err {
                ResolveError::UnknownTrait(trait_name) => ResolveError::PreferenceNotComposed {
                    method: preference.method.clone(),
                    trait_name,
                },
                other => other,
            })?;
            let qualified = target.qualified_name();
            if let Some(existing) = preferences.get(&preference.method) {
                if *existing != qualified {
                    return Err(ResolveError::ConflictingPreference {
                        method: preference.method.clone(),
                        first: existing.clone(),
                        second: qualified,
                    });
                }
                continue;
            }
            if !target.declares_method(&preference.method) {
                sink.report(
                    Diagnostic::warning(eco_format!(
                        "preference for '{}' has no effect: '{}' does not declare it",
                        preference.method,
                        qualified
                    ))
                    .at(decl.name.clone()),
                );
            }
            debug!(method = %preference.method, winner = %qualified, "preference");
            preferences.insert(preference.method.clone(), qualified);
        }

        Ok(Self {
            ty,
            traits,
            superclass,
            preferences,
        })
    }

    pub fn ty(&self) -> &DeclaredType {
        &self.ty
    }

    #[must_use]
    pub fn qualified_name(&self) -> EcoString {
        self.ty.qualified_name()
    }

    /// Composed traits in declaration order.
    pub fn traits(&self) -> &[TraitDescriptor] {
        &self.traits
    }

    #[must_use]
    pub fn superclass(&self) -> Option<&DesiredSuperclass> {
        self.superclass.as_ref()
    }

    /// Qualified name of the trait preferred for `method`, if any.
    #[must_use]
    pub fn preferred_trait(&self, method: &str) -> Option<&str> {
        self.preferences.get(method).map(EcoString::as_str)
    }
}

/// Gives every trait after the first with a given qualifier a numbered one
/// that no other composed trait uses.
fn disambiguate_qualifiers(traits: &mut [TraitDescriptor]) {
    let mut taken: Vec<EcoString> = traits
        .iter()
        .map(|owner| EcoString::from(owner.qualifier()))
        .collect();
    for index in 1..traits.len() {
        let base = traits[index].qualifier();
        if !traits[..index].iter().any(|earlier| earlier.qualifier() == base) {
            continue;
        }
        let mut counter = 2;
        let mut candidate = eco_format!("{base}{counter}");
        while taken.contains(&candidate) {
            counter += 1;
            candidate = eco_format!("{base}{counter}");
        }
        debug!(
            name = %traits[index].qualified_name(),
            qualifier = %candidate,
            "requalified trait"
        );
        traits[index] = traits[index].requalified(&candidate);
        taken.push(candidate);
    }
}

fn find_composed<'a>(
    traits: &'a [TraitDescriptor],
    name: &str,
) -> Result<&'a TraitDescriptor, ResolveError> {
    if let Some(found) = traits.iter().find(|t| t.qualified_name().as_str() == name) {
        return Ok(found);
    }
    let candidates: Vec<_> = traits.iter().filter(|t| t.simple_name() == name).collect();
    match candidates.as_slice() {
        [] => Err(ResolveError::UnknownTrait(name.into())),
        [single] => Ok(single),
        many => Err(ResolveError::AmbiguousTrait {
            name: name.into(),
            candidates: many
                .iter()
                .map(|t| t.qualified_name())
                .collect::<Vec<_>>()
                .join(", ")
                .into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::{MemberDecl, PreferenceDecl, ReflectedType, TypeParameterDecl};
    use crate::test_helpers::{
        abstract_method, lookup_of, resolve_trait, simple_trait, simple_trait_decl,
    };

    fn host(traits: &[&str]) -> HostDeclaration {
        HostDeclaration {
            name: "app.Person".into(),
            traits: traits.iter().map(|name| EcoString::from(*name)).collect(),
            superclass: None,
            preferences: vec![],
        }
    }

    fn prefer(method: &str, trait_name: &str) -> PreferenceDecl {
        PreferenceDecl {
            method: method.into(),
            trait_name: trait_name.into(),
        }
    }

    #[test]
    fn resolves_traits_in_order() {
        let lookup = lookup_of(&[
            simple_trait("lib.Walker", &["walk"]),
            simple_trait("lib.Greeter", &["greet"]),
        ]);
        let descriptor =
            HostDescriptor::resolve(&host(&["Greeter", "lib.Walker"]), &lookup, &mut Vec::new())
                .unwrap();
        let names: Vec<_> = descriptor.traits().iter().map(TraitDescriptor::qualified_name).collect();
        assert_eq!(names, vec!["lib.Greeter", "lib.Walker"]);
    }

    #[test]
    fn traits_sharing_a_simple_name_get_distinct_qualifiers() {
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
        let lookup = lookup_of(&[generic("lib.Box"), generic("org.Box"), generic("net.Box")]);
        let resolved = HostDescriptor::resolve(
            &host(&["lib.Box", "org.Box", "net.Box"]),
            &lookup,
            &mut Vec::new(),
        )
        .unwrap();
        let qualifiers: Vec<_> = resolved.traits().iter().map(TraitDescriptor::qualifier).collect();
        assert_eq!(qualifiers, vec!["Box", "Box2", "Box3"]);

        let org = &resolved.traits()[1];
        assert_eq!(org.ty().to_string(), "org.Box<Box2_T>");
        assert_eq!(org.type_params()[0].effective_name(), "Box2_T");
        assert_eq!(org.methods()[0].return_type.to_string(), "Box2_T");
        // The lookup's copy is untouched.
        assert_eq!(lookup.get("org.Box").unwrap().qualifier(), "Box");
    }

    #[test]
    fn numbered_qualifier_skips_names_already_in_use() {
        let lookup = lookup_of(&[
            simple_trait("lib.Box", &["a"]),
            simple_trait("lib.Box2", &["b"]),
            simple_trait("org.Box", &["c"]),
        ]);
        let resolved = HostDescriptor::resolve(
            &host(&["lib.Box", "lib.Box2", "org.Box"]),
            &lookup,
            &mut Vec::new(),
        )
        .unwrap();
        let qualifiers: Vec<_> = resolved.traits().iter().map(TraitDescriptor::qualifier).collect();
        assert_eq!(qualifiers, vec!["Box", "Box2", "Box3"]);
    }

    #[test]
    fn unknown_and_duplicate_traits_are_errors() {
        let lookup = lookup_of(&[simple_trait("lib.Greeter", &["greet"])]);
        assert_eq!(
            HostDescriptor::resolve(&host(&["Flyer"]), &lookup, &mut Vec::new()).unwrap_err(),
            ResolveError::UnknownTrait("Flyer".into())
        );
        assert_eq!(
            HostDescriptor::resolve(&host(&["Greeter", "lib.Greeter"]), &lookup, &mut Vec::new())
                .unwrap_err(),
            ResolveError::DuplicateTrait("lib.Greeter".into())
        );
    }

    #[test]
    fn preference_must_name_a_composed_trait() {
        let lookup = lookup_of(&[
            simple_trait("lib.Greeter", &["greet"]),
            simple_trait("lib.Walker", &["greet"]),
        ]);
        let mut decl = host(&["Greeter"]);
        decl.preferences.push(prefer("greet", "Walker"));
        assert!(matches!(
            HostDescriptor::resolve(&decl, &lookup, &mut Vec::new()),
            Err(ResolveError::PreferenceNotComposed { .. })
        ));
    }

    #[test]
    fn conflicting_preferences_are_errors() {
        let lookup = lookup_of(&[
            simple_trait("lib.Greeter", &["greet"]),
            simple_trait("lib.Walker", &["greet"]),
        ]);
        let mut decl = host(&["Greeter", "Walker"]);
        decl.preferences.push(prefer("greet", "Walker"));
        decl.preferences.push(prefer("greet", "lib.Walker"));
        let resolved = HostDescriptor::resolve(&decl, &lookup, &mut Vec::new()).unwrap();
        assert_eq!(resolved.preferred_trait("greet"), Some("lib.Walker"));

        decl.preferences.push(prefer("greet", "Greeter"));
        assert!(matches!(
            HostDescriptor::resolve(&decl, &lookup, &mut Vec::new()),
            Err(ResolveError::ConflictingPreference { .. })
        ));
    }

    #[test]
    fn preference_without_method_warns() {
        let lookup = lookup_of(&[
            simple_trait("lib.Greeter", &["greet"]),
            simple_trait("lib.Walker", &["walk"]),
        ]);
        let mut decl = host(&["Greeter", "Walker"]);
        decl.preferences.push(prefer("greet", "Walker"));
        let mut sink = Vec::new();
        let resolved = HostDescriptor::resolve(&decl, &lookup, &mut sink).unwrap();
        assert_eq!(resolved.preferred_trait("greet"), Some("lib.Walker"));
        assert_eq!(sink.len(), 1);
        assert!(sink[0].message.contains("no effect"));
    }

    #[test]
    fn superclass_arguments_become_parameters() {
        let lookup = lookup_of(&[simple_trait("lib.Greeter", &["greet"])]);
        let mut decl = host(&["Greeter"]);
        decl.superclass = Some(SuperclassDecl {
            name: "app.Base".into(),
            type_parameters: vec![
                TypeParameterDecl {
                    name: "K".into(),
                    bounds: vec![ReflectedType::Declared {
                        name: "java.lang.Comparable".into(),
                        arguments: vec![ReflectedType::variable("K")],
                    }],
                },
                TypeParameterDecl {
                    name: "V".into(),
                    bounds: vec![],
                },
                TypeParameterDecl {
                    name: "W".into(),
                    bounds: vec![],
                },
            ],
            arguments: vec![
                SuperclassArgument::Auto,
                SuperclassArgument::Named { name: "X".into() },
                SuperclassArgument::Explicit {
                    ty: ReflectedType::declared("java.lang.String"),
                },
            ],
        });
        let resolved = HostDescriptor::resolve(&decl, &lookup, &mut Vec::new()).unwrap();
        let superclass = resolved.superclass().unwrap();
        assert_eq!(
            superclass.to_type_ref("S").to_string(),
            "app.Base<S0, X, java.lang.String>"
        );
        let params: Vec<_> = superclass
            .type_params("S")
            .iter()
            .map(|param| {
                let bounds: Vec<_> = param.extends_bounds().iter().map(ToString::to_string).collect();
                format!("{} {}", param.name(), bounds.join("&"))
            })
            .collect();
        assert_eq!(params, vec!["S0 java.lang.Comparable<S0>", "X "]);
    }

    #[test]
    fn superclass_arity_mismatch_is_an_error() {
        let lookup = lookup_of(&[simple_trait("lib.Greeter", &["greet"])]);
        let mut decl = host(&["Greeter"]);
        decl.superclass = Some(SuperclassDecl {
            name: "app.Base".into(),
            type_parameters: vec![TypeParameterDecl {
                name: "K".into(),
                bounds: vec![],
            }],
            arguments: vec![SuperclassArgument::Auto, SuperclassArgument::Auto],
        });
        assert!(matches!(
            HostDescriptor::resolve(&decl, &lookup, &mut Vec::new()),
            Err(ResolveError::SuperclassArity {
                expected: 1,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn missing_arguments_default_to_auto() {
        let lookup = lookup_of(&[simple_trait("lib.Greeter", &["greet"])]);
        let mut decl = host(&["Greeter"]);
        decl.superclass = Some(SuperclassDecl {
            name: "app.Base".into(),
            type_parameters: vec![
                TypeParameterDecl {
                    name: "K".into(),
                    bounds: vec![],
                },
                TypeParameterDecl {
                    name: "V".into(),
                    bounds: vec![],
                },
            ],
            arguments: vec![],
        });
        let resolved = HostDescriptor::resolve(&decl, &lookup, &mut Vec::new()).unwrap();
        assert_eq!(
            resolved.superclass().unwrap().to_type_ref("T").to_string(),
            "app.Base<T0, T1>"
        );
    }
}
