// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Scoped source writer.
//!
//! **DDD Context:** Source Emission
//!
//! [`SourceWriter`] emits one Java compilation unit. It keeps a stack of
//! lexical scopes:
//!
//! ```text
//! Package -> Imports -> TypeDefinition <-> MethodDefinition
//!                            |  ^
//!                            +--+  (nested types)
//! ```
//!
//! Every operation checks the top of the stack before writing anything. An
//! out-of-order call returns [`WriterError::IllegalScope`] and leaves both
//! the stack and the output untouched; callers treat it as fatal for the
//! file being written.
//!
//! Indentation is derived from the stack depth. Type references are
//! rendered through the file's [`NameRegistry`], populated by
//! [`SourceWriter::imports`].

pub mod declarations;
pub mod names;
pub mod unit;

use crate::expr::Expr;
use crate::types::{DEFAULT_NAMESPACE, DeclaredType, TypeRef};
use declarations::{DeclarationKind, FieldDeclaration, MethodDeclaration, Modifier, TypeDeclaration};
use ecow::EcoString;
use names::NameRegistry;
use std::fmt;
use thiserror::Error;

/// Indentation width of generated source.
pub const INDENT: usize = 4;

/// A lexical scope of the file being written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Package,
    Imports,
    TypeDefinition,
    MethodDefinition,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Package => "package",
            Self::Imports => "imports",
            Self::TypeDefinition => "type definition",
            Self::MethodDefinition => "method definition",
        })
    }
}

/// Contract violations of the writer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriterError {
    /// An operation was called in a scope it cannot follow.
    #[error("`{operation}` is not allowed in {found} scope (expected {expected})")]
    IllegalScope {
        operation: &'static str,
        expected: &'static str,
        found: EcoString,
    },

    /// `finish` was called with type or method scopes still open.
    #[error("cannot finish file with {0} unclosed scope(s)")]
    Unclosed(usize),
}

/// Result type for writer operations.
pub type Result<T> = std::result::Result<T, WriterError>;

/// What was written last inside the current type body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Member {
    Field,
    Block,
}

/// Writes one compilation unit.
#[derive(Debug, Default)]
pub struct SourceWriter {
    out: String,
    scopes: Vec<Scope>,
    names: NameRegistry,
    kinds: Vec<DeclarationKind>,
    previous: Option<Member>,
}

impl SourceWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The innermost open scope.
    pub fn scope(&self) -> Option<Scope> {
        self.scopes.last().copied()
    }

    pub fn names(&self) -> &NameRegistry {
        &self.names
    }

    /// The text written so far.
    pub fn as_str(&self) -> &str {
        &self.out
    }

    /// Opens the file with a package statement (omitted for the default
    /// package).
    pub fn package(&mut self, namespace: &str) -> Result<()> {
        if !self.scopes.is_empty() {
            return Err(self.illegal("package", "no scope"));
        }
        if !namespace.is_empty() {
            self.out.push_str("package ");
            self.out.push_str(namespace);
            self.out.push_str(";\n\n");
        }
        self.names = NameRegistry::new(namespace);
        self.scopes.push(Scope::Package);
        Ok(())
    }

    /// Registers the given types and writes the `import` block.
    ///
    /// Registration happens in three passes so that default-namespace types,
    /// then same-package types, take the unqualified spelling from anything
    /// else with the same simple name.
    pub fn imports<'a>(&mut self, types: impl IntoIterator<Item = &'a DeclaredType>) -> Result<()> {
        if self.scope() != Some(Scope::Package) {
            return Err(self.illegal("imports", "package"));
        }
        let types: Vec<&DeclaredType> = types.into_iter().collect();
        let package = EcoString::from(self.names.package());
        for ty in &types {
            if ty.namespace() != DEFAULT_NAMESPACE && ty.namespace() != package.as_str() {
                self.names.register(ty, false);
            }
        }
        for ty in types.iter().filter(|ty| ty.namespace() == DEFAULT_NAMESPACE) {
            self.names.register(ty, true);
        }
        for ty in types.iter().filter(|ty| ty.namespace() == package.as_str()) {
            self.names.register(ty, true);
        }

        let imports = self.names.imports();
        for ty in &imports {
            self.out.push_str("import ");
            self.out.push_str(&ty.qualified_name());
            self.out.push_str(";\n");
        }
        if !imports.is_empty() {
            self.out.push('\n');
        }
        self.scopes.push(Scope::Imports);
        Ok(())
    }

    /// Opens a class or interface body.
    pub fn begin_type(&mut self, decl: &TypeDeclaration) -> Result<()> {
        match self.scope() {
            Some(Scope::Imports | Scope::TypeDefinition) => {}
            _ => return Err(self.illegal("begin_type", "imports or type definition")),
        }
        self.separate(Member::Block);

        let mut line = String::new();
        push_modifiers(&mut line, &decl.modifiers);
        line.push_str(match decl.kind {
            DeclarationKind::Class => "class ",
            DeclarationKind::Interface => "interface ",
        });
        line.push_str(&decl.name);
        line.push_str(&self.names.render_type_parameters(&decl.type_params));
        match decl.kind {
            DeclarationKind::Class => {
                if let Some(superclass) = &decl.superclass {
                    line.push_str(" extends ");
                    line.push_str(&self.names.render(superclass));
                }
                self.push_type_list(&mut line, " implements ", &decl.interfaces);
            }
            DeclarationKind::Interface => {
                self.push_type_list(&mut line, " extends ", &decl.interfaces);
            }
        }
        line.push_str(" {");
        self.line(&line);

        self.scopes.push(Scope::TypeDefinition);
        self.kinds.push(decl.kind);
        self.previous = None;
        Ok(())
    }

    /// Closes the innermost type body.
    pub fn end_type(&mut self) -> Result<()> {
        if self.scope() != Some(Scope::TypeDefinition) {
            return Err(self.illegal("end_type", "type definition"));
        }
        self.scopes.pop();
        self.kinds.pop();
        self.line("}");
        self.previous = Some(Member::Block);
        Ok(())
    }

    /// Writes a field declaration.
    pub fn field(&mut self, decl: &FieldDeclaration) -> Result<()> {
        if self.scope() != Some(Scope::TypeDefinition) {
            return Err(self.illegal("field", "type definition"));
        }
        self.separate(Member::Field);
        let mut line = String::new();
        push_modifiers(&mut line, &decl.modifiers);
        line.push_str(&self.names.render(&decl.ty));
        line.push(' ');
        line.push_str(&decl.name);
        if let Some(value) = &decl.initializer {
            line.push_str(" = ");
            value.write(&mut line, &self.names);
        }
        line.push(';');
        self.line(&line);
        self.previous = Some(Member::Field);
        Ok(())
    }

    /// Writes a method declaration without a body.
    pub fn abstract_method(&mut self, decl: &MethodDeclaration) -> Result<()> {
        if self.scope() != Some(Scope::TypeDefinition) || decl.is_constructor() {
            return Err(self.illegal("abstract_method", "type definition"));
        }
        self.write_method_header(decl, ";");
        self.previous = Some(Member::Block);
        Ok(())
    }

    /// Opens a method body.
    pub fn begin_method(&mut self, decl: &MethodDeclaration) -> Result<()> {
        let in_interface = self.kinds.last() == Some(&DeclarationKind::Interface);
        let is_static = decl.modifiers.contains(&Modifier::Static);
        if self.scope() != Some(Scope::TypeDefinition) || (in_interface && !is_static) {
            return Err(self.illegal("begin_method", "class type definition"));
        }
        self.write_method_header(decl, " {");
        self.scopes.push(Scope::MethodDefinition);
        Ok(())
    }

    /// Opens a constructor body.
    pub fn begin_constructor(&mut self, decl: &MethodDeclaration) -> Result<()> {
        if !decl.is_constructor() || self.kinds.last() != Some(&DeclarationKind::Class) {
            return Err(self.illegal("begin_constructor", "class type definition"));
        }
        self.begin_method(decl)
    }

    /// Writes one statement inside a method body.
    pub fn statement(&mut self, expr: &Expr) -> Result<()> {
        if self.scope() != Some(Scope::MethodDefinition) {
            return Err(self.illegal("statement", "method definition"));
        }
        let mut line = String::new();
        expr.write(&mut line, &self.names);
        line.push(';');
        self.line(&line);
        Ok(())
    }

    /// Closes the current method body.
    pub fn end_method(&mut self) -> Result<()> {
        if self.scope() != Some(Scope::MethodDefinition) {
            return Err(self.illegal("end_method", "method definition"));
        }
        self.scopes.pop();
        self.line("}");
        self.previous = Some(Member::Block);
        Ok(())
    }

    /// Writes a `//` comment at the current indentation. Allowed anywhere.
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            let mut comment = String::from("//");
            if !line.is_empty() {
                comment.push(' ');
                comment.push_str(line);
            }
            self.line(&comment);
        }
    }

    /// Writes an empty line.
    pub fn blank_line(&mut self) {
        self.out.push('\n');
    }

    /// Returns the finished text. Every type must be closed.
    pub fn finish(self) -> Result<String> {
        let open = self
            .scopes
            .iter()
            .filter(|scope| matches!(scope, Scope::TypeDefinition | Scope::MethodDefinition))
            .count();
        if open > 0 {
            return Err(WriterError::Unclosed(open));
        }
        Ok(self.out)
    }

    fn write_method_header(&mut self, decl: &MethodDeclaration, terminator: &str) {
        self.separate(Member::Block);
        for annotation in &decl.annotations {
            let name = self.names.type_name(annotation);
            self.line(&format!("@{name}"));
        }
        let mut line = String::new();
        push_modifiers(&mut line, &decl.modifiers);
        if !decl.type_params.is_empty() {
            line.push_str(&self.names.render_type_parameters(&decl.type_params));
            line.push(' ');
        }
        if let Some(ty) = &decl.return_type {
            line.push_str(&self.names.render(ty));
            line.push(' ');
        }
        line.push_str(&decl.name);
        line.push('(');
        for (i, param) in decl.params.iter().enumerate() {
            if i > 0 {
                line.push_str(", ");
            }
            line.push_str(&self.names.render(&param.ty));
            line.push(' ');
            line.push_str(&param.name);
        }
        line.push(')');
        self.push_type_list(&mut line, " throws ", &decl.throws);
        line.push_str(terminator);
        self.line(&line);
    }

    fn push_type_list(&self, line: &mut String, keyword: &str, types: &[TypeRef]) {
        for (i, ty) in types.iter().enumerate() {
            line.push_str(if i == 0 { keyword } else { ", " });
            line.push_str(&self.names.render(ty));
        }
    }

    /// Inserts a blank line between members of a type body.
    fn separate(&mut self, next: Member) {
        match (self.previous, next) {
            (None, _) | (Some(Member::Field), Member::Field) => {}
            _ => self.out.push('\n'),
        }
    }

    fn indent_level(&self) -> usize {
        self.scopes
            .iter()
            .filter(|scope| matches!(scope, Scope::TypeDefinition | Scope::MethodDefinition))
            .count()
    }

    fn line(&mut self, text: &str) {
        for _ in 0..self.indent_level() * INDENT {
            self.out.push(' ');
        }
        self.out.push_str(text);
        self.out.push('\n');
    }

    fn illegal(&self, operation: &'static str, expected: &'static str) -> WriterError {
        WriterError::IllegalScope {
            operation,
            expected,
            found: match self.scope() {
                Some(scope) => EcoString::from(scope.to_string()),
                None => EcoString::from("no"),
            },
        }
    }
}

fn push_modifiers(line: &mut String, modifiers: &[Modifier]) {
    for modifier in modifiers {
        line.push_str(&modifier.to_string());
        line.push(' ');
    }
}
