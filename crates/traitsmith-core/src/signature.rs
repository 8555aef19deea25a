// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Method signatures and parameters.
//!
//! **DDD Context:** Type Model — Value Object
//!
//! A [`MethodSignature`] is the key used for collision detection when the
//! methods of several traits are merged into one superclass. Equality is
//! deep and order-sensitive: name, return type, argument types and thrown
//! types must all match position by position, including array depth and the
//! varargs flag.

use crate::types::TypeRef;
use ecow::EcoString;
use std::fmt;

/// A named, typed method parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub ty: TypeRef,
    pub name: EcoString,
}

impl Parameter {
    #[must_use]
    pub fn new(ty: TypeRef, name: impl Into<EcoString>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

/// The comparable shape of a method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub name: EcoString,
    pub return_type: TypeRef,
    pub arg_types: Vec<TypeRef>,
    pub throws_types: Vec<TypeRef>,
}

impl MethodSignature {
    #[must_use]
    pub fn new(
        name: impl Into<EcoString>,
        return_type: TypeRef,
        arg_types: Vec<TypeRef>,
        throws_types: Vec<TypeRef>,
    ) -> Self {
        Self {
            name: name.into(),
            return_type,
            arg_types,
            throws_types,
        }
    }

    /// Returns the signature with generic qualifiers stripped.
    ///
    /// Two methods from different traits collide iff their normalized
    /// signatures are equal.
    #[must_use]
    pub fn normalized(&self) -> Self {
        Self {
            name: self.name.clone(),
            return_type: self.return_type.normalized(),
            arg_types: self.arg_types.iter().map(TypeRef::normalized).collect(),
            throws_types: self.throws_types.iter().map(TypeRef::normalized).collect(),
        }
    }

    /// Number of arguments.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arg_types.len()
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.return_type, self.name)?;
        for (i, arg) in self.arg_types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")?;
        if !self.throws_types.is_empty() {
            f.write_str(" throws ")?;
            for (i, ty) in self.throws_types.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{ty}")?;
            }
        }
        Ok(())
    }
}
