// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Import gathering.
//!
//! **DDD Context:** Source Emission
//!
//! Walks type references, expressions and reflected types and records every
//! declared type they mention, transitively: the type itself, its type
//! arguments, and the extends- and super-bounds of generic parameters and
//! wildcards. The universal root and primitives are never recorded.
//!
//! Intersection bounds (`T extends A & B`) contribute each component
//! separately; there is no single "intersection" entry.

use crate::reflect::ReflectedType;
use crate::types::{DeclaredType, TypeKind, TypeRef};
use std::collections::BTreeSet;

/// Accumulates declared types into a caller-provided set.
///
/// Stored entries carry no type arguments.
#[derive(Debug)]
pub struct ImportCollector<'a> {
    types: &'a mut BTreeSet<DeclaredType>,
}

impl<'a> ImportCollector<'a> {
    pub fn new(types: &'a mut BTreeSet<DeclaredType>) -> Self {
        Self { types }
    }

    /// Records a declared type (and its arguments).
    pub fn collect_declared(&mut self, ty: &DeclaredType) {
        self.insert(ty);
        for arg in ty.type_args() {
            self.collect_type(arg);
        }
    }

    /// Records every declared type reachable from a reference.
    pub fn collect_type(&mut self, ty: &TypeRef) {
        ty.visit(&mut |node| {
            if let TypeKind::Declared(declared) = node.kind() {
                self.insert(declared);
            }
        });
    }

    /// Records every declared type reachable from a reflected type.
    pub fn collect_reflected(&mut self, ty: &ReflectedType) {
        match ty {
            ReflectedType::Primitive { .. } | ReflectedType::Void => {}
            ReflectedType::Declared { name, arguments } => {
                if let Ok(declared) = DeclaredType::from_qualified_name(name) {
                    self.insert(&declared);
                }
                for arg in arguments {
                    self.collect_reflected(arg);
                }
            }
            ReflectedType::Array { component } => self.collect_reflected(component),
            ReflectedType::TypeVariable {
                upper_bound,
                lower_bound,
                ..
            } => {
                for bound in upper_bound.iter().chain(lower_bound) {
                    self.collect_reflected(bound);
                }
            }
            ReflectedType::Wildcard {
                extends_bound,
                super_bound,
            } => {
                for bound in extends_bound.iter().chain(super_bound) {
                    self.collect_reflected(bound);
                }
            }
            ReflectedType::Intersection { bounds } => {
                for bound in bounds {
                    self.collect_reflected(bound);
                }
            }
        }
    }

    fn insert(&mut self, ty: &DeclaredType) {
        if ty.is_root() || ty.is_primitive() {
            return;
        }
        if !self.types.contains(ty) {
            self.types.insert(ty.erased());
        }
    }
}

/// Collects the imports of a single type reference into a fresh set.
#[must_use]
pub fn imports_of(ty: &TypeRef) -> BTreeSet<DeclaredType> {
    let mut types = BTreeSet::new();
    ImportCollector::new(&mut types).collect_type(ty);
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GenericParam;

    fn names(set: &BTreeSet<DeclaredType>) -> Vec<String> {
        set.iter().map(|ty| ty.qualified_name().to_string()).collect()
    }

    fn declared(name: &str, args: Vec<TypeRef>) -> TypeRef {
        TypeRef::declared(DeclaredType::from_qualified_name(name).unwrap().with_type_args(args))
    }

    #[test]
    fn collects_type_arguments_recursively() {
        let ty = declared(
            "java.util.Map",
            vec![
                declared("java.lang.String", vec![]),
                declared("java.util.List", vec![declared("com.acme.Widget", vec![])]),
            ],
        );
        assert_eq!(
            names(&imports_of(&ty)),
            vec!["com.acme.Widget", "java.lang.String", "java.util.List", "java.util.Map"]
        );
    }

    #[test]
    fn collects_both_bound_kinds() {
        let upper = TypeRef::generic(
            GenericParam::new("T").with_extends(vec![declared("com.acme.Shape", vec![])]),
        );
        let lower = TypeRef::generic(GenericParam::wildcard().with_super(declared("com.acme.Circle", vec![])));
        let ty = declared("java.util.function.Function", vec![upper, lower]);
        assert_eq!(
            names(&imports_of(&ty)),
            vec!["com.acme.Circle", "com.acme.Shape", "java.util.function.Function"]
        );
    }

    #[test]
    fn never_collects_root_or_primitives() {
        let ty = declared(
            "java.util.Map",
            vec![declared("java.lang.Object", vec![]), declared("int", vec![])],
        );
        assert_eq!(names(&imports_of(&ty)), vec!["java.util.Map"]);
    }

    #[test]
    fn intersection_bound_yields_each_component() {
        let reflected = ReflectedType::TypeVariable {
            name: "T".into(),
            upper_bound: Some(Box::new(ReflectedType::Intersection {
                bounds: vec![
                    ReflectedType::declared("java.lang.Object"),
                    ReflectedType::declared("com.acme.A"),
                    ReflectedType::declared("com.acme.B"),
                ],
            })),
            lower_bound: None,
        };
        let mut set = BTreeSet::new();
        ImportCollector::new(&mut set).collect_reflected(&reflected);
        assert_eq!(names(&set), vec!["com.acme.A", "com.acme.B"]);

        let converted = reflected.to_type_ref().unwrap();
        assert_eq!(names(&imports_of(&converted)), vec!["com.acme.A", "com.acme.B"]);
    }

    #[test]
    fn stored_entries_are_erased() {
        let ty = declared("java.util.List", vec![declared("com.acme.Widget", vec![])]);
        let set = imports_of(&ty);
        assert!(set.iter().all(|entry| entry.type_args().is_empty()));
    }
}
