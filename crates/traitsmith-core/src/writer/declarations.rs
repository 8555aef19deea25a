// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Declarations accepted by the [`SourceWriter`](super::SourceWriter).

use crate::expr::Expr;
use crate::imports::ImportCollector;
use crate::signature::Parameter;
use crate::types::{DeclaredType, GenericParam, TypeRef};
use ecow::EcoString;
use std::fmt;

/// Declaration modifiers, written in the order given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Static => "static",
            Self::Final => "final",
        })
    }
}

/// Class or interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    Class,
    Interface,
}

/// Header of a class or interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclaration {
    pub kind: DeclarationKind,
    pub modifiers: Vec<Modifier>,
    pub name: EcoString,
    pub type_params: Vec<GenericParam>,
    /// `extends` for classes. Interfaces put their supertypes in
    /// `interfaces`.
    pub superclass: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
}

impl TypeDeclaration {
    #[must_use]
    pub fn class(name: impl Into<EcoString>) -> Self {
        Self {
            kind: DeclarationKind::Class,
            modifiers: vec![Modifier::Public],
            name: name.into(),
            type_params: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    #[must_use]
    pub fn interface(name: impl Into<EcoString>) -> Self {
        Self {
            kind: DeclarationKind::Interface,
            ..Self::class(name)
        }
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_type_params(mut self, type_params: Vec<GenericParam>) -> Self {
        self.type_params = type_params;
        self
    }

    #[must_use]
    pub fn extending(mut self, superclass: TypeRef) -> Self {
        self.superclass = Some(superclass);
        self
    }

    #[must_use]
    pub fn implementing(mut self, interfaces: Vec<TypeRef>) -> Self {
        self.interfaces = interfaces;
        self
    }

    pub fn collect_types(&self, collector: &mut ImportCollector<'_>) {
        for param in &self.type_params {
            for bound in param.extends_bounds() {
                collector.collect_type(bound);
            }
        }
        for ty in self.superclass.iter().chain(&self.interfaces) {
            collector.collect_type(ty);
        }
    }
}

/// A field, optionally initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDeclaration {
    pub modifiers: Vec<Modifier>,
    pub ty: TypeRef,
    pub name: EcoString,
    pub initializer: Option<Expr>,
}

impl FieldDeclaration {
    #[must_use]
    pub fn new(modifiers: Vec<Modifier>, ty: TypeRef, name: impl Into<EcoString>) -> Self {
        Self {
            modifiers,
            ty,
            name: name.into(),
            initializer: None,
        }
    }

    #[must_use]
    pub fn initialized(mut self, value: Expr) -> Self {
        self.initializer = Some(value);
        self
    }

    pub fn collect_types(&self, collector: &mut ImportCollector<'_>) {
        collector.collect_type(&self.ty);
        if let Some(value) = &self.initializer {
            value.collect_types(collector);
        }
    }
}

/// A method or constructor header.
///
/// `return_type == None` marks a constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDeclaration {
    pub annotations: Vec<DeclaredType>,
    pub modifiers: Vec<Modifier>,
    pub type_params: Vec<GenericParam>,
    pub return_type: Option<TypeRef>,
    pub name: EcoString,
    pub params: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
}

impl MethodDeclaration {
    #[must_use]
    pub fn method(return_type: TypeRef, name: impl Into<EcoString>) -> Self {
        Self {
            annotations: Vec::new(),
            modifiers: Vec::new(),
            type_params: Vec::new(),
            return_type: Some(return_type),
            name: name.into(),
            params: Vec::new(),
            throws: Vec::new(),
        }
    }

    #[must_use]
    pub fn constructor(name: impl Into<EcoString>) -> Self {
        Self {
            return_type: None,
            ..Self::method(TypeRef::void(), name)
        }
    }

    #[must_use]
    pub fn annotated(mut self, annotation: DeclaredType) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn with_modifiers(mut self, modifiers: Vec<Modifier>) -> Self {
        self.modifiers = modifiers;
        self
    }

    #[must_use]
    pub fn with_type_params(mut self, type_params: Vec<GenericParam>) -> Self {
        self.type_params = type_params;
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: Vec<Parameter>) -> Self {
        self.params = params;
        self
    }

    #[must_use]
    pub fn with_throws(mut self, throws: Vec<TypeRef>) -> Self {
        self.throws = throws;
        self
    }

    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.return_type.is_none()
    }

    /// The parameter names as argument expressions, for forwarding calls.
    #[must_use]
    pub fn forwarded_args(&self) -> Vec<Expr> {
        self.params.iter().map(|param| Expr::var(param.name.clone())).collect()
    }

    pub fn collect_types(&self, collector: &mut ImportCollector<'_>) {
        for annotation in &self.annotations {
            collector.collect_declared(annotation);
        }
        for param in &self.type_params {
            for bound in param.extends_bounds() {
                collector.collect_type(bound);
            }
        }
        if let Some(ty) = &self.return_type {
            collector.collect_type(ty);
        }
        for param in &self.params {
            collector.collect_type(&param.ty);
        }
        for ty in &self.throws {
            collector.collect_type(ty);
        }
    }
}
