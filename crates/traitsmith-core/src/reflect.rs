// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Reflection model of trait and host declarations.
//!
//! **DDD Context:** Input — Anti-Corruption Layer
//!
//! These are the raw, serde-deserializable shapes a compiler front end (or a
//! JSON file) hands to the generator. They mirror what the host compiler
//! exposes about a declaration and are deliberately loose: structural
//! validation happens when they are turned into descriptors
//! (see [`crate::descriptor`]).
//!
//! ```json
//! { "kind": "declared", "name": "java.util.List",
//!   "arguments": [ { "kind": "type_variable", "name": "T" } ] }
//! ```

use crate::types::{DeclaredType, GenericParam, Result, TypeError, TypeRef};
use ecow::EcoString;
use serde::{Deserialize, Serialize};

/// A type as reported by the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ReflectedType {
    /// A primitive such as `int`.
    Primitive { name: EcoString },
    /// The `void` pseudo-type.
    Void,
    /// A class or interface, possibly parameterized.
    Declared {
        name: EcoString,
        #[serde(default)]
        arguments: Vec<ReflectedType>,
    },
    /// An array of the component type.
    Array { component: Box<ReflectedType> },
    /// A reference to a type variable.
    TypeVariable {
        name: EcoString,
        #[serde(default)]
        upper_bound: Option<Box<ReflectedType>>,
        #[serde(default)]
        lower_bound: Option<Box<ReflectedType>>,
    },
    /// A wildcard argument, `?`, `? extends X` or `? super X`.
    Wildcard {
        #[serde(default)]
        extends_bound: Option<Box<ReflectedType>>,
        #[serde(default)]
        super_bound: Option<Box<ReflectedType>>,
    },
    /// An intersection bound, `A & B`.
    Intersection { bounds: Vec<ReflectedType> },
}

impl ReflectedType {
    /// Convenience constructor for a non-generic declared type.
    #[must_use]
    pub fn declared(name: &str) -> Self {
        Self::Declared {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Convenience constructor for an unbounded type variable.
    #[must_use]
    pub fn variable(name: &str) -> Self {
        Self::TypeVariable {
            name: name.into(),
            upper_bound: None,
            lower_bound: None,
        }
    }

    /// Converts to a [`TypeRef`].
    ///
    /// Intersections are only legal as a type variable's upper bound, where
    /// they are expanded into separate extends bounds.
    pub fn to_type_ref(&self) -> Result<TypeRef> {
        match self {
            Self::Primitive { name } => {
                let ty = DeclaredType::new("", name.clone())?;
                if !ty.is_primitive() {
                    return Err(TypeError::Unresolvable(name.clone()));
                }
                Ok(TypeRef::declared(ty))
            }
            Self::Void => Ok(TypeRef::void()),
            Self::Declared { name, arguments } => {
                let args = arguments
                    .iter()
                    .map(Self::to_type_ref)
                    .collect::<Result<Vec<_>>>()?;
                let ty = DeclaredType::from_qualified_name(name)?.with_type_args(args);
                Ok(TypeRef::declared(ty))
            }
            Self::Array { component } => {
                let inner = component.to_type_ref()?;
                let depth = inner.array_depth() + 1;
                Ok(inner.with_array_depth(depth))
            }
            Self::TypeVariable {
                name,
                upper_bound,
                lower_bound,
            } => {
                if name.is_empty() {
                    return Err(TypeError::EmptyName);
                }
                let mut param = GenericParam::new(name.clone());
                if let Some(upper) = upper_bound {
                    param = param.with_extends(upper_bounds(upper)?);
                }
                if let Some(lower) = lower_bound {
                    param = param.with_super(lower.to_type_ref()?);
                }
                Ok(TypeRef::generic(param))
            }
            Self::Wildcard {
                extends_bound,
                super_bound,
            } => {
                let mut param = GenericParam::wildcard();
                if let Some(upper) = extends_bound {
                    param = param.with_extends(upper_bounds(upper)?);
                }
                if let Some(lower) = super_bound {
                    param = param.with_super(lower.to_type_ref()?);
                }
                Ok(TypeRef::generic(param))
            }
            Self::Intersection { .. } => Err(TypeError::UnexpectedIntersection),
        }
    }
}

/// Expands an upper bound into its component types, dropping the root.
fn upper_bounds(bound: &ReflectedType) -> Result<Vec<TypeRef>> {
    let components = match bound {
        ReflectedType::Intersection { bounds } => bounds.as_slice(),
        other => std::slice::from_ref(other),
    };
    let mut result = Vec::with_capacity(components.len());
    for component in components {
        let ty = component.to_type_ref()?;
        if ty.as_declared().is_some_and(DeclaredType::is_root) && ty.array_depth() == 0 {
            continue;
        }
        result.push(ty);
    }
    Ok(result)
}

/// Modifiers the generator cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReflectedModifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Default,
}

/// A declared type parameter with its bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeParameterDecl {
    pub name: EcoString,
    #[serde(default)]
    pub bounds: Vec<ReflectedType>,
}

impl TypeParameterDecl {
    /// Converts to a [`GenericParam`]; a root bound is dropped.
    pub fn to_generic_param(&self) -> Result<GenericParam> {
        if self.name.is_empty() {
            return Err(TypeError::EmptyName);
        }
        let mut bounds = Vec::new();
        for bound in &self.bounds {
            bounds.extend(upper_bounds(bound)?);
        }
        Ok(GenericParam::new(self.name.clone()).with_extends(bounds))
    }
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    #[serde(default)]
    pub name: EcoString,
    #[serde(rename = "type")]
    pub ty: ReflectedType,
}

/// A method declared by a trait or superinterface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: EcoString,
    #[serde(default)]
    pub modifiers: Vec<ReflectedModifier>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDecl>,
    pub return_type: ReflectedType,
    #[serde(default)]
    pub parameters: Vec<ParameterDecl>,
    /// Whether the last parameter is declared as varargs.
    #[serde(default)]
    pub varargs: bool,
    #[serde(default)]
    pub throws: Vec<ReflectedType>,
    /// Marks the trait's return-self accessor.
    #[serde(default)]
    pub self_accessor: bool,
}

impl MethodDecl {
    #[must_use]
    pub fn has(&self, modifier: ReflectedModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// A field declared by a trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: EcoString,
    #[serde(rename = "type")]
    pub ty: ReflectedType,
    #[serde(default)]
    pub modifiers: Vec<ReflectedModifier>,
}

impl FieldDecl {
    #[must_use]
    pub fn has(&self, modifier: ReflectedModifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// One member of a trait declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberDecl {
    Method(MethodDecl),
    Constructor {
        #[serde(default)]
        parameters: Vec<ParameterDecl>,
    },
    Field(FieldDecl),
    /// Anything else (nested types, initializer blocks, ...).
    Other {
        #[serde(default)]
        name: EcoString,
        description: EcoString,
    },
}

/// A superinterface implemented by a trait.
///
/// `type_parameters` are the interface's own parameter names, `arguments` the
/// types the trait supplies for them, in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperInterfaceDecl {
    pub name: EcoString,
    #[serde(default)]
    pub type_parameters: Vec<EcoString>,
    #[serde(default)]
    pub arguments: Vec<ReflectedType>,
    /// Abstract methods of the interface, in terms of its own parameters.
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

/// A class annotated as a trait.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitDeclaration {
    /// Qualified name of the trait class.
    pub name: EcoString,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(default)]
    pub superclass: Option<ReflectedType>,
    #[serde(default)]
    pub interfaces: Vec<SuperInterfaceDecl>,
    #[serde(default)]
    pub members: Vec<MemberDecl>,
}

/// How one type argument of the desired superclass is supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuperclassArgument {
    /// A concrete type.
    Explicit {
        #[serde(rename = "type")]
        ty: ReflectedType,
    },
    /// A generic parameter of the generated superclass with this name.
    Named { name: EcoString },
    /// A generic parameter with a generated name.
    Auto,
}

/// The class the generated superclass should extend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuperclassDecl {
    pub name: EcoString,
    /// The superclass's own type parameters, used for bounds.
    #[serde(default)]
    pub type_parameters: Vec<TypeParameterDecl>,
    #[serde(default)]
    pub arguments: Vec<SuperclassArgument>,
}

/// A host-declared diamond tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceDecl {
    pub method: EcoString,
    /// Qualified or simple name of the winning trait.
    #[serde(rename = "trait")]
    pub trait_name: EcoString,
}

/// A class that composes traits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostDeclaration {
    /// Qualified name of the host class.
    pub name: EcoString,
    /// Qualified or simple trait names, in composition order.
    pub traits: Vec<EcoString>,
    #[serde(default)]
    pub superclass: Option<SuperclassDecl>,
    #[serde(default)]
    pub preferences: Vec<PreferenceDecl>,
}

/// Everything discovered in one generation round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundInput {
    #[serde(default)]
    pub traits: Vec<TraitDeclaration>,
    #[serde(default)]
    pub hosts: Vec<HostDeclaration>,
}
