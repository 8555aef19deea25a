// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Whole-file plans.
//!
//! A [`CompilationUnit`] describes a file as data: package, header comment
//! and one top-level type with its members. [`CompilationUnit::render`]
//! gathers the imports from every type and expression in the plan, then
//! drives a [`SourceWriter`] through the file in one pass. Because the text
//! only exists once rendering succeeds, a failed plan never yields a
//! partial file.

use super::declarations::{FieldDeclaration, MethodDeclaration, TypeDeclaration};
use super::{Result, SourceWriter};
use crate::expr::Expr;
use crate::imports::ImportCollector;
use crate::types::DeclaredType;
use ecow::EcoString;
use std::collections::BTreeSet;

/// One member of a type body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMember {
    Field(FieldDeclaration),
    /// A method without a body (interface or abstract method).
    Abstract(MethodDeclaration),
    /// A method or constructor with body statements.
    Method {
        decl: MethodDeclaration,
        body: Vec<Expr>,
    },
    Nested(TypeBody),
}

/// A type declaration and its members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBody {
    pub decl: TypeDeclaration,
    pub members: Vec<TypeMember>,
}

impl TypeBody {
    #[must_use]
    pub fn new(decl: TypeDeclaration) -> Self {
        Self {
            decl,
            members: Vec::new(),
        }
    }

    pub fn push(&mut self, member: TypeMember) {
        self.members.push(member);
    }

    fn collect_types(&self, collector: &mut ImportCollector<'_>) {
        self.decl.collect_types(collector);
        for member in &self.members {
            match member {
                TypeMember::Field(field) => field.collect_types(collector),
                TypeMember::Abstract(decl) => decl.collect_types(collector),
                TypeMember::Method { decl, body } => {
                    decl.collect_types(collector);
                    for statement in body {
                        statement.collect_types(collector);
                    }
                }
                TypeMember::Nested(nested) => nested.collect_types(collector),
            }
        }
    }

    fn write(&self, writer: &mut SourceWriter) -> Result<()> {
        writer.begin_type(&self.decl)?;
        for member in &self.members {
            match member {
                TypeMember::Field(field) => writer.field(field)?,
                TypeMember::Abstract(decl) => writer.abstract_method(decl)?,
                TypeMember::Method { decl, body } => {
                    if decl.is_constructor() {
                        writer.begin_constructor(decl)?;
                    } else {
                        writer.begin_method(decl)?;
                    }
                    for statement in body {
                        writer.statement(statement)?;
                    }
                    writer.end_method()?;
                }
                TypeMember::Nested(nested) => nested.write(writer)?,
            }
        }
        writer.end_type()
    }
}

/// A complete source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationUnit {
    pub package: EcoString,
    pub header: Option<EcoString>,
    pub body: TypeBody,
}

impl CompilationUnit {
    #[must_use]
    pub fn new(package: impl Into<EcoString>, body: TypeBody) -> Self {
        Self {
            package: package.into(),
            header: None,
            body,
        }
    }

    #[must_use]
    pub fn with_header(mut self, header: impl Into<EcoString>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Fully qualified name of the top-level type.
    #[must_use]
    pub fn qualified_name(&self) -> EcoString {
        if self.package.is_empty() {
            self.body.decl.name.clone()
        } else {
            ecow::eco_format!("{}.{}", self.package, self.body.decl.name)
        }
    }

    /// Every declared type the file mentions.
    #[must_use]
    pub fn referenced_types(&self) -> BTreeSet<DeclaredType> {
        let mut types = BTreeSet::new();
        self.body.collect_types(&mut ImportCollector::new(&mut types));
        types
    }

    /// Renders the file.
    pub fn render(&self) -> Result<String> {
        let types = self.referenced_types();
        let mut writer = SourceWriter::new();
        if let Some(header) = &self.header {
            writer.comment(header);
        }
        writer.package(&self.package)?;
        writer.imports(&types)?;
        self.body.write(&mut writer)?;
        writer.finish()
    }
}
