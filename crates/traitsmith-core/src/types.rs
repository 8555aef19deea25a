// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Type references used throughout generation.
//!
//! **DDD Context:** Type Model
//!
//! A [`TypeRef`] describes one occurrence of a type in emitted source: the
//! referenced type itself plus its array depth and varargs flag. The type is
//! either a [`DeclaredType`] (a nominal class or interface, or a primitive)
//! or a [`GenericParam`] (a type variable or a wildcard).
//!
//! These values are independent of any live compiler objects: descriptors
//! are built once from the reflection model and then only cloned, rewritten
//! and rendered.

use ecow::EcoString;
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use thiserror::Error;

/// Namespace whose members are visible everywhere without an import.
pub const DEFAULT_NAMESPACE: &str = "java.lang";

/// Simple name of the universal root type.
pub const ROOT_TYPE_NAME: &str = "Object";

/// Simple name of the `@Override` annotation.
pub const OVERRIDE_NAME: &str = "Override";

/// Reserved generic parameter name for wildcards.
pub const WILDCARD_NAME: &str = "?";

/// Name of the `void` pseudo-type.
pub const VOID_NAME: &str = "void";

/// Built-in primitive type names.
pub const PRIMITIVE_NAMES: &[&str] = &[
    "boolean", "byte", "char", "short", "int", "long", "float", "double",
];

/// Errors raised while building or rewriting type references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// A type name was empty.
    #[error("type name must not be empty")]
    EmptyName,

    /// A generic parameter was qualified twice.
    #[error("generic parameter '{name}' is already qualified by '{qualifier}'")]
    AlreadyQualified {
        /// Parameter name.
        name: EcoString,
        /// Existing qualifier.
        qualifier: EcoString,
    },

    /// Wildcards never take a qualifier.
    #[error("a wildcard cannot be qualified")]
    QualifiedWildcard,

    /// Intersections may only appear as type-variable bounds.
    #[error("intersection type is only allowed as a type variable bound")]
    UnexpectedIntersection,

    /// A type that cannot be used in the given position.
    #[error("'{0}' cannot be used here")]
    Unresolvable(EcoString),
}

/// Result type for type model operations.
pub type Result<T> = std::result::Result<T, TypeError>;

/// A nominal type: namespace, simple name and type arguments.
///
/// Equality and hashing are *shallow*: two references to `java.util.List`
/// are equal whatever their type arguments. Use [`DeclaredType::deep_eq`]
/// when the arguments matter.
#[derive(Debug, Clone)]
pub struct DeclaredType {
    namespace: EcoString,
    simple_name: EcoString,
    type_args: Vec<TypeRef>,
}

impl DeclaredType {
    /// Creates a declared type without type arguments.
    pub fn new(namespace: impl Into<EcoString>, simple_name: impl Into<EcoString>) -> Result<Self> {
        let simple_name = simple_name.into();
        if simple_name.is_empty() {
            return Err(TypeError::EmptyName);
        }
        Ok(Self {
            namespace: namespace.into(),
            simple_name,
            type_args: Vec::new(),
        })
    }

    /// Parses a qualified name, splitting on the last `.`.
    ///
    /// `"java.util.List"` becomes namespace `java.util`, simple name `List`;
    /// `"int"` has an empty namespace.
    pub fn from_qualified_name(name: &str) -> Result<Self> {
        match name.rsplit_once('.') {
            Some((namespace, simple)) => Self::new(namespace, simple),
            None => Self::new("", name),
        }
    }

    /// The universal root type, `java.lang.Object`.
    #[must_use]
    pub fn root() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.into(),
            simple_name: ROOT_TYPE_NAME.into(),
            type_args: Vec::new(),
        }
    }

    /// The `java.lang.Override` annotation type.
    #[must_use]
    pub fn override_annotation() -> Self {
        Self {
            namespace: DEFAULT_NAMESPACE.into(),
            simple_name: OVERRIDE_NAME.into(),
            type_args: Vec::new(),
        }
    }

    /// The `void` pseudo-type.
    #[must_use]
    pub fn void() -> Self {
        Self {
            namespace: EcoString::new(),
            simple_name: VOID_NAME.into(),
            type_args: Vec::new(),
        }
    }

    /// Returns this type with the given type arguments.
    #[must_use]
    pub fn with_type_args(mut self, type_args: Vec<TypeRef>) -> Self {
        self.type_args = type_args;
        self
    }

    /// Returns a copy of this type without type arguments.
    #[must_use]
    pub fn erased(&self) -> Self {
        Self {
            namespace: self.namespace.clone(),
            simple_name: self.simple_name.clone(),
            type_args: Vec::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn simple_name(&self) -> &str {
        &self.simple_name
    }

    pub fn type_args(&self) -> &[TypeRef] {
        &self.type_args
    }

    /// The fully qualified name, without type arguments.
    #[must_use]
    pub fn qualified_name(&self) -> EcoString {
        if self.namespace.is_empty() {
            self.simple_name.clone()
        } else {
            let mut name = self.namespace.clone();
            name.push('.');
            name.push_str(&self.simple_name);
            name
        }
    }

    /// Returns true for `java.lang.Object`.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.namespace == DEFAULT_NAMESPACE && self.simple_name == ROOT_TYPE_NAME
    }

    /// Returns true for primitives and `void`.
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        self.namespace.is_empty()
            && (self.simple_name == VOID_NAME || PRIMITIVE_NAMES.contains(&self.simple_name.as_str()))
    }

    /// Returns true for `void`.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.namespace.is_empty() && self.simple_name == VOID_NAME
    }

    /// Structural equality including type arguments.
    #[must_use]
    pub fn deep_eq(&self, other: &Self) -> bool {
        self == other
            && self.type_args.len() == other.type_args.len()
            && self
                .type_args
                .iter()
                .zip(&other.type_args)
                .all(|(a, b)| a == b)
    }
}

impl PartialEq for DeclaredType {
    fn eq(&self, other: &Self) -> bool {
        self.namespace == other.namespace && self.simple_name == other.simple_name
    }
}

impl Eq for DeclaredType {}

impl Hash for DeclaredType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.namespace.hash(state);
        self.simple_name.hash(state);
    }
}

impl PartialOrd for DeclaredType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DeclaredType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.namespace
            .cmp(&other.namespace)
            .then_with(|| self.simple_name.cmp(&other.simple_name))
    }
}

/// A generic type parameter or wildcard.
///
/// The qualifier disambiguates same-named parameters coming from different
/// traits once they are merged into one declaration. It is assigned at most
/// once, through [`GenericParam::with_qualifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    name: EcoString,
    qualifier: Option<EcoString>,
    extends_bounds: Vec<TypeRef>,
    super_bound: Option<Box<TypeRef>>,
}

impl GenericParam {
    /// Creates an unbounded, unqualified parameter.
    #[must_use]
    pub fn new(name: impl Into<EcoString>) -> Self {
        Self {
            name: name.into(),
            qualifier: None,
            extends_bounds: Vec::new(),
            super_bound: None,
        }
    }

    /// Creates an unbounded wildcard (`?`).
    #[must_use]
    pub fn wildcard() -> Self {
        Self::new(WILDCARD_NAME)
    }

    /// Returns this parameter with the given upper bounds.
    #[must_use]
    pub fn with_extends(mut self, bounds: Vec<TypeRef>) -> Self {
        self.extends_bounds = bounds;
        self
    }

    /// Returns this parameter with the given lower bound.
    #[must_use]
    pub fn with_super(mut self, bound: TypeRef) -> Self {
        self.super_bound = Some(Box::new(bound));
        self
    }

    /// Qualifies this parameter.
    ///
    /// Fails if it already carries a qualifier or is a wildcard.
    pub fn with_qualifier(mut self, qualifier: impl Into<EcoString>) -> Result<Self> {
        if self.is_wildcard() {
            return Err(TypeError::QualifiedWildcard);
        }
        if let Some(existing) = &self.qualifier {
            return Err(TypeError::AlreadyQualified {
                name: self.name.clone(),
                qualifier: existing.clone(),
            });
        }
        self.qualifier = Some(qualifier.into());
        Ok(self)
    }

    /// Returns a copy without the qualifier (bounds are kept as they are).
    #[must_use]
    pub fn without_qualifier(&self) -> Self {
        Self {
            qualifier: None,
            ..self.clone()
        }
    }

    /// Returns a copy without bounds, as the parameter appears at a use site.
    #[must_use]
    pub fn unbounded(&self) -> Self {
        Self {
            name: self.name.clone(),
            qualifier: self.qualifier.clone(),
            extends_bounds: Vec::new(),
            super_bound: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qualifier(&self) -> Option<&str> {
        self.qualifier.as_deref()
    }

    pub fn extends_bounds(&self) -> &[TypeRef] {
        &self.extends_bounds
    }

    pub fn super_bound(&self) -> Option<&TypeRef> {
        self.super_bound.as_deref()
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.name == WILDCARD_NAME
    }

    /// The name as rendered in source: `{qualifier}_{name}` when qualified.
    #[must_use]
    pub fn effective_name(&self) -> EcoString {
        match &self.qualifier {
            Some(qualifier) => {
                let mut name = qualifier.clone();
                name.push('_');
                name.push_str(&self.name);
                name
            }
            None => self.name.clone(),
        }
    }
}

/// The referenced type of a [`TypeRef`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeKind {
    Declared(DeclaredType),
    Generic(GenericParam),
}

/// One occurrence of a type: what it refers to, plus array dimensions.
///
/// Equality is deep: type arguments, bounds, qualifiers, array depth and the
/// varargs flag all take part.
#[derive(Debug, Clone)]
pub struct TypeRef {
    kind: TypeKind,
    array_depth: usize,
    varargs: bool,
}

impl TypeRef {
    #[must_use]
    pub fn declared(ty: DeclaredType) -> Self {
        Self {
            kind: TypeKind::Declared(ty),
            array_depth: 0,
            varargs: false,
        }
    }

    #[must_use]
    pub fn generic(param: GenericParam) -> Self {
        Self {
            kind: TypeKind::Generic(param),
            array_depth: 0,
            varargs: false,
        }
    }

    /// Shorthand for a declared type parsed from a qualified name.
    pub fn named(qualified_name: &str) -> Result<Self> {
        DeclaredType::from_qualified_name(qualified_name).map(Self::declared)
    }

    #[must_use]
    pub fn wildcard() -> Self {
        Self::generic(GenericParam::wildcard())
    }

    #[must_use]
    pub fn void() -> Self {
        Self::declared(DeclaredType::void())
    }

    #[must_use]
    pub fn root() -> Self {
        Self::declared(DeclaredType::root())
    }

    /// Returns this reference with the given array depth.
    #[must_use]
    pub fn with_array_depth(mut self, depth: usize) -> Self {
        self.array_depth = depth;
        if depth == 0 {
            self.varargs = false;
        }
        self
    }

    /// Marks the outermost array dimension as varargs, adding one if needed.
    #[must_use]
    pub fn as_varargs(mut self) -> Self {
        if self.array_depth == 0 {
            self.array_depth = 1;
        }
        self.varargs = true;
        self
    }

    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }

    pub fn array_depth(&self) -> usize {
        self.array_depth
    }

    pub fn is_varargs(&self) -> bool {
        self.varargs
    }

    pub fn as_declared(&self) -> Option<&DeclaredType> {
        match &self.kind {
            TypeKind::Declared(ty) => Some(ty),
            TypeKind::Generic(_) => None,
        }
    }

    pub fn as_generic(&self) -> Option<&GenericParam> {
        match &self.kind {
            TypeKind::Generic(param) => Some(param),
            TypeKind::Declared(_) => None,
        }
    }

    /// True for `void` with no array dimensions.
    #[must_use]
    pub fn is_void(&self) -> bool {
        self.array_depth == 0 && self.as_declared().is_some_and(DeclaredType::is_void)
    }

    /// Calls `f` for this reference and every reference nested in it
    /// (type arguments, extends bounds and super bounds), pre-order.
    pub fn visit(&self, f: &mut impl FnMut(&TypeRef)) {
        f(self);
        match &self.kind {
            TypeKind::Declared(ty) => {
                for arg in &ty.type_args {
                    arg.visit(f);
                }
            }
            TypeKind::Generic(param) => {
                for bound in &param.extends_bounds {
                    bound.visit(f);
                }
                if let Some(bound) = &param.super_bound {
                    bound.visit(f);
                }
            }
        }
    }

    /// Rewrites generic parameters bottom-up.
    ///
    /// For every generic parameter, its bounds are rewritten first, then `f`
    /// is offered the result. `Some(replacement)` substitutes it, keeping this
    /// occurrence's array dimensions on top of the replacement's.
    pub fn try_map_generics<E>(
        &self,
        f: &mut impl FnMut(&GenericParam) -> std::result::Result<Option<TypeRef>, E>,
    ) -> std::result::Result<TypeRef, E> {
        match &self.kind {
            TypeKind::Declared(ty) => {
                let type_args = ty
                    .type_args
                    .iter()
                    .map(|arg| arg.try_map_generics(f))
                    .collect::<std::result::Result<Vec<_>, E>>()?;
                Ok(Self {
                    kind: TypeKind::Declared(ty.erased().with_type_args(type_args)),
                    array_depth: self.array_depth,
                    varargs: self.varargs,
                })
            }
            TypeKind::Generic(param) => {
                let mapped = param.try_map_bounds(f)?;
                match f(&mapped)? {
                    Some(replacement) => Ok(Self {
                        array_depth: replacement.array_depth + self.array_depth,
                        varargs: self.varargs || replacement.varargs,
                        kind: replacement.kind,
                    }),
                    None => Ok(Self {
                        kind: TypeKind::Generic(mapped),
                        array_depth: self.array_depth,
                        varargs: self.varargs,
                    }),
                }
            }
        }
    }

    /// Infallible form of [`TypeRef::try_map_generics`].
    #[must_use]
    pub fn map_generics(&self, f: &mut impl FnMut(&GenericParam) -> Option<TypeRef>) -> TypeRef {
        let result: std::result::Result<TypeRef, Infallible> =
            self.try_map_generics(&mut |param| Ok(f(param)));
        match result {
            Ok(ty) => ty,
            Err(never) => match never {},
        }
    }

    /// Qualifies every unqualified, non-wildcard generic parameter.
    #[must_use]
    pub fn qualify_generics(&self, qualifier: &str) -> TypeRef {
        self.map_generics(&mut |param| {
            if param.is_wildcard() || param.qualifier.is_some() {
                None
            } else {
                param.clone().with_qualifier(qualifier).ok().map(TypeRef::generic)
            }
        })
    }

    /// Moves every parameter qualified by `from` to the qualifier `to`.
    #[must_use]
    pub fn requalify_generics(&self, from: &str, to: &str) -> TypeRef {
        self.map_generics(&mut |param| {
            (param.qualifier.as_deref() == Some(from))
                .then(|| TypeRef::generic(param.with_qualifier_replaced(to)))
        })
    }

    /// Strips qualifiers from every generic parameter.
    #[must_use]
    pub fn normalized(&self) -> TypeRef {
        self.map_generics(&mut |param| {
            param
                .qualifier
                .is_some()
                .then(|| TypeRef::generic(param.without_qualifier()))
        })
    }
}

impl GenericParam {
    /// This parameter re-keyed from qualifier `from` to `to`, bounds
    /// included. Parameters with another qualifier are left alone.
    #[must_use]
    pub fn requalified(&self, from: &str, to: &str) -> GenericParam {
        let param = GenericParam {
            extends_bounds: self
                .extends_bounds
                .iter()
                .map(|bound| bound.requalify_generics(from, to))
                .collect(),
            super_bound: self
                .super_bound
                .as_ref()
                .map(|bound| Box::new(bound.requalify_generics(from, to))),
            ..self.clone()
        };
        if param.qualifier.as_deref() == Some(from) {
            param.with_qualifier_replaced(to)
        } else {
            param
        }
    }

    fn with_qualifier_replaced(&self, qualifier: &str) -> GenericParam {
        GenericParam {
            qualifier: Some(qualifier.into()),
            ..self.clone()
        }
    }

    /// Rewrites bounds with [`TypeRef::try_map_generics`].
    pub fn try_map_bounds<E>(
        &self,
        f: &mut impl FnMut(&GenericParam) -> std::result::Result<Option<TypeRef>, E>,
    ) -> std::result::Result<GenericParam, E> {
        let extends_bounds = self
            .extends_bounds
            .iter()
            .map(|bound| bound.try_map_generics(f))
            .collect::<std::result::Result<Vec<_>, E>>()?;
        let super_bound = match &self.super_bound {
            Some(bound) => Some(Box::new(bound.try_map_generics(f)?)),
            None => None,
        };
        Ok(GenericParam {
            name: self.name.clone(),
            qualifier: self.qualifier.clone(),
            extends_bounds,
            super_bound,
        })
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        if self.array_depth != other.array_depth || self.varargs != other.varargs {
            return false;
        }
        match (&self.kind, &other.kind) {
            (TypeKind::Declared(a), TypeKind::Declared(b)) => a.deep_eq(b),
            (TypeKind::Generic(a), TypeKind::Generic(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypeRef {}

impl From<DeclaredType> for TypeRef {
    fn from(ty: DeclaredType) -> Self {
        Self::declared(ty)
    }
}

impl From<GenericParam> for TypeRef {
    fn from(param: GenericParam) -> Self {
        Self::generic(param)
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())?;
        if !self.type_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.type_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        Ok(())
    }
}

impl fmt::Display for GenericParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.effective_name())?;
        if self.is_wildcard() {
            if let Some(bound) = self.extends_bounds.first() {
                write!(f, " extends {bound}")?;
            }
        }
        if let Some(bound) = &self.super_bound {
            write!(f, " super {bound}")?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TypeKind::Declared(ty) => write!(f, "{ty}")?,
            TypeKind::Generic(param) => write!(f, "{param}")?,
        }
        for dim in 0..self.array_depth {
            if self.varargs && dim + 1 == self.array_depth {
                f.write_str("...")?;
            } else {
                f.write_str("[]")?;
            }
        }
        Ok(())
    }
}
