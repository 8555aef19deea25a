// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Shared builders for unit tests.

use crate::descriptor::{TraitDescriptor, TraitLookup};
use crate::reflect::{
    MemberDecl, MethodDecl, ParameterDecl, ReflectedModifier, ReflectedType, TraitDeclaration,
};

pub fn string_type() -> ReflectedType {
    ReflectedType::declared("java.lang.String")
}

pub fn int_type() -> ReflectedType {
    ReflectedType::Primitive { name: "int".into() }
}

pub fn abstract_method(name: &str, return_type: ReflectedType) -> MethodDecl {
    MethodDecl {
        name: name.into(),
        modifiers: vec![ReflectedModifier::Public, ReflectedModifier::Abstract],
        type_parameters: vec![],
        return_type,
        parameters: vec![],
        varargs: false,
        throws: vec![],
        self_accessor: false,
    }
}

pub fn concrete_method(name: &str, return_type: ReflectedType) -> MethodDecl {
    MethodDecl {
        modifiers: vec![ReflectedModifier::Public],
        ..abstract_method(name, return_type)
    }
}

/// Adds a parameter to a method declaration.
pub fn with_param(mut method: MethodDecl, name: &str, ty: ReflectedType) -> MethodDecl {
    method.parameters.push(ParameterDecl {
        name: name.into(),
        ty,
    });
    method
}

/// A trait declaring one concrete `String m()` per name.
pub fn simple_trait_decl(name: &str, methods: &[&str]) -> TraitDeclaration {
    TraitDeclaration {
        name: name.into(),
        type_parameters: vec![],
        superclass: None,
        interfaces: vec![],
        members: methods
            .iter()
            .map(|method| MemberDecl::Method(concrete_method(method, string_type())))
            .collect(),
    }
}

/// # Panics
///
/// Panics if the declaration does not resolve.
pub fn resolve_trait(decl: &TraitDeclaration) -> TraitDescriptor {
    TraitDescriptor::resolve(decl, &mut Vec::new()).expect("trait resolves")
}

pub fn simple_trait(name: &str, methods: &[&str]) -> TraitDescriptor {
    resolve_trait(&simple_trait_decl(name, methods))
}

pub fn lookup_of(traits: &[TraitDescriptor]) -> TraitLookup {
    traits.iter().cloned().collect()
}
