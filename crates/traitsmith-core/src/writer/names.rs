// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Name shortening for emitted source.
//!
//! **DDD Context:** Source Emission
//!
//! The registry maps each simple name to the declared types seen under it,
//! in registration order. The candidate at index 0 owns the unqualified
//! spelling; every other candidate is written fully qualified.
//!
//! The first registrant of a simple name wins, unless a later registration
//! is marked `highest_preference` (types of the file's own package and of
//! the default namespace). Such a registration moves to index 0 and bumps
//! the previous owner to index 1.

use crate::types::{DEFAULT_NAMESPACE, DeclaredType, GenericParam, TypeKind, TypeRef};
use ecow::EcoString;
use std::collections::HashMap;

/// Simple name → candidates, index 0 preferred.
#[derive(Debug, Clone, Default)]
pub struct NameRegistry {
    package: EcoString,
    candidates: HashMap<EcoString, Vec<DeclaredType>>,
}

impl NameRegistry {
    /// Creates a registry for a file in the given package.
    #[must_use]
    pub fn new(package: impl Into<EcoString>) -> Self {
        Self {
            package: package.into(),
            candidates: HashMap::new(),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    /// Registers a type under its simple name.
    pub fn register(&mut self, ty: &DeclaredType, highest_preference: bool) {
        let entry = self
            .candidates
            .entry(EcoString::from(ty.simple_name()))
            .or_default();
        if let Some(position) = entry.iter().position(|candidate| candidate == ty) {
            if highest_preference && position != 0 {
                let existing = entry.remove(position);
                entry.insert(0, existing);
            }
            return;
        }
        if highest_preference {
            entry.insert(0, ty.erased());
        } else {
            entry.push(ty.erased());
        }
    }

    /// Returns true if the type is rendered by its simple name.
    #[must_use]
    pub fn is_preferred(&self, ty: &DeclaredType) -> bool {
        match self.candidates.get(ty.simple_name()) {
            Some(candidates) => candidates.first() == Some(ty),
            None => {
                ty.namespace().is_empty()
                    || ty.namespace() == DEFAULT_NAMESPACE
                    || ty.namespace() == self.package.as_str()
            }
        }
    }

    /// Every registered type that owns its simple name, sorted.
    #[must_use]
    pub fn preferred(&self) -> Vec<&DeclaredType> {
        let mut types: Vec<_> = self
            .candidates
            .values()
            .filter_map(|candidates| candidates.first())
            .collect();
        types.sort();
        types
    }

    /// Types that need an `import` line: preferred, and not implicitly
    /// visible.
    #[must_use]
    pub fn imports(&self) -> Vec<&DeclaredType> {
        self.preferred()
            .into_iter()
            .filter(|ty| {
                !ty.namespace().is_empty()
                    && ty.namespace() != DEFAULT_NAMESPACE
                    && ty.namespace() != self.package.as_str()
            })
            .collect()
    }

    /// The name of a declared type, simple or qualified, without arguments.
    #[must_use]
    pub fn type_name(&self, ty: &DeclaredType) -> EcoString {
        if self.is_preferred(ty) {
            EcoString::from(ty.simple_name())
        } else {
            ty.qualified_name()
        }
    }

    /// Renders a type reference in type-use position.
    #[must_use]
    pub fn render(&self, ty: &TypeRef) -> String {
        let mut out = String::new();
        self.render_into(&mut out, ty);
        out
    }

    /// Renders a generic parameter as it appears in a declaration's
    /// parameter list, with its bounds (`T extends A & B`).
    #[must_use]
    pub fn render_type_parameter(&self, param: &GenericParam) -> String {
        let mut out = param.effective_name().to_string();
        let bounds: Vec<_> = param
            .extends_bounds()
            .iter()
            .filter(|bound| !bound.as_declared().is_some_and(DeclaredType::is_root))
            .collect();
        for (i, bound) in bounds.iter().enumerate() {
            out.push_str(if i == 0 { " extends " } else { " & " });
            self.render_into(&mut out, bound);
        }
        out
    }

    /// Renders a `<...>` parameter list, or nothing when empty.
    #[must_use]
    pub fn render_type_parameters(&self, params: &[GenericParam]) -> String {
        if params.is_empty() {
            return String::new();
        }
        let rendered: Vec<_> = params
            .iter()
            .map(|param| self.render_type_parameter(param))
            .collect();
        format!("<{}>", rendered.join(", "))
    }

    fn render_into(&self, out: &mut String, ty: &TypeRef) {
        match ty.kind() {
            TypeKind::Declared(declared) => {
                out.push_str(&self.type_name(declared));
                if !declared.type_args().is_empty() {
                    out.push('<');
                    for (i, arg) in declared.type_args().iter().enumerate() {
                        if i > 0 {
                            out.push_str(", ");
                        }
                        self.render_into(out, arg);
                    }
                    out.push('>');
                }
            }
            TypeKind::Generic(param) if param.is_wildcard() => {
                out.push('?');
                if let Some(bound) = param.extends_bounds().first() {
                    out.push_str(" extends ");
                    self.render_into(out, bound);
                } else if let Some(bound) = param.super_bound() {
                    out.push_str(" super ");
                    self.render_into(out, bound);
                }
            }
            TypeKind::Generic(param) => out.push_str(&param.effective_name()),
        }
        for dim in 0..ty.array_depth() {
            if ty.is_varargs() && dim + 1 == ty.array_depth() {
                out.push_str("...");
            } else {
                out.push_str("[]");
            }
        }
    }
}
