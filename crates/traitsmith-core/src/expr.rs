// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Expression builder for method bodies and field initializers.
//!
//! **DDD Context:** Source Emission
//!
//! A small composable AST. Each node writes itself through a
//! [`NameRegistry`], so type references inside expressions (casts, static
//! receivers, constructor calls) are shortened consistently with the rest of
//! the file.
//!
//! [`Expr::write`] reports whether it produced any text. A receiver that
//! writes nothing (an empty literal, for example) suppresses the `.` that
//! would otherwise separate it from the member name.

use crate::imports::ImportCollector;
use crate::types::TypeRef;
use crate::writer::names::NameRegistry;
use ecow::EcoString;

/// What a member access or call is qualified by.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receiver {
    /// Unqualified: `name`.
    None,
    /// `this.name`.
    This,
    /// `super.name`.
    Super,
    /// `Type.name`.
    Static(TypeRef),
    /// `expr.name`.
    Expr(Box<Expr>),
}

/// An expression node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Verbatim source text.
    Literal(EcoString),
    /// `this`.
    This,
    /// Field or variable reference.
    Reference { receiver: Receiver, name: EcoString },
    /// `target = value`.
    Assign { target: Box<Expr>, value: Box<Expr> },
    /// `(Type) expr`.
    Cast { ty: TypeRef, expr: Box<Expr> },
    /// `new Type(args)`, or `new Type<>(args)` when `diamond` is set.
    New {
        ty: TypeRef,
        args: Vec<Expr>,
        diamond: bool,
    },
    /// Method invocation.
    Call {
        receiver: Receiver,
        name: EcoString,
        args: Vec<Expr>,
    },
    /// `new T[n][m]` when `dimensions` is non-empty, else `new T[] { ... }`.
    NewArray {
        element: TypeRef,
        dimensions: Vec<Expr>,
        elements: Vec<Expr>,
    },
    /// `array[index]`.
    ArrayElement { array: Box<Expr>, index: Box<Expr> },
    /// `return` or `return expr`.
    Return(Option<Box<Expr>>),
}

impl Expr {
    #[must_use]
    pub fn literal(text: impl Into<EcoString>) -> Self {
        Self::Literal(text.into())
    }

    /// Unqualified variable or field.
    #[must_use]
    pub fn var(name: impl Into<EcoString>) -> Self {
        Self::Reference {
            receiver: Receiver::None,
            name: name.into(),
        }
    }

    /// `this.name`.
    #[must_use]
    pub fn this_field(name: impl Into<EcoString>) -> Self {
        Self::Reference {
            receiver: Receiver::This,
            name: name.into(),
        }
    }

    /// `receiver.name`.
    #[must_use]
    pub fn field_of(receiver: Expr, name: impl Into<EcoString>) -> Self {
        Self::Reference {
            receiver: Receiver::Expr(Box::new(receiver)),
            name: name.into(),
        }
    }

    /// `Type.name`.
    #[must_use]
    pub fn static_field(ty: TypeRef, name: impl Into<EcoString>) -> Self {
        Self::Reference {
            receiver: Receiver::Static(ty),
            name: name.into(),
        }
    }

    #[must_use]
    pub fn assign(target: Expr, value: Expr) -> Self {
        Self::Assign {
            target: Box::new(target),
            value: Box::new(value),
        }
    }

    #[must_use]
    pub fn cast(ty: TypeRef, expr: Expr) -> Self {
        Self::Cast {
            ty,
            expr: Box::new(expr),
        }
    }

    #[must_use]
    pub fn new_instance(ty: TypeRef, args: Vec<Expr>) -> Self {
        Self::New {
            ty,
            args,
            diamond: false,
        }
    }

    /// `new Type<>(args)`; falls back to `new Type(args)` for raw types.
    #[must_use]
    pub fn new_diamond(ty: TypeRef, args: Vec<Expr>) -> Self {
        let diamond = ty
            .as_declared()
            .is_some_and(|declared| !declared.type_args().is_empty());
        Self::New { ty, args, diamond }
    }

    /// `receiver.name(args)`.
    #[must_use]
    pub fn call(receiver: Expr, name: impl Into<EcoString>, args: Vec<Expr>) -> Self {
        Self::Call {
            receiver: Receiver::Expr(Box::new(receiver)),
            name: name.into(),
            args,
        }
    }

    /// `Type.name(args)`.
    #[must_use]
    pub fn static_call(ty: TypeRef, name: impl Into<EcoString>, args: Vec<Expr>) -> Self {
        Self::Call {
            receiver: Receiver::Static(ty),
            name: name.into(),
            args,
        }
    }

    /// `super.name(args)`.
    #[must_use]
    pub fn super_call(name: impl Into<EcoString>, args: Vec<Expr>) -> Self {
        Self::Call {
            receiver: Receiver::Super,
            name: name.into(),
            args,
        }
    }

    /// `new T[n]...`.
    #[must_use]
    pub fn new_array(element: TypeRef, dimensions: Vec<Expr>) -> Self {
        Self::NewArray {
            element,
            dimensions,
            elements: Vec::new(),
        }
    }

    /// `new T[] { a, b }`.
    #[must_use]
    pub fn array_literal(element: TypeRef, elements: Vec<Expr>) -> Self {
        Self::NewArray {
            element,
            dimensions: Vec::new(),
            elements,
        }
    }

    #[must_use]
    pub fn element(array: Expr, index: Expr) -> Self {
        Self::ArrayElement {
            array: Box::new(array),
            index: Box::new(index),
        }
    }

    #[must_use]
    pub fn returning(expr: Expr) -> Self {
        Self::Return(Some(Box::new(expr)))
    }

    #[must_use]
    pub fn return_void() -> Self {
        Self::Return(None)
    }

    /// Renders the expression to a fresh string.
    #[must_use]
    pub fn to_source(&self, names: &NameRegistry) -> String {
        let mut out = String::new();
        self.write(&mut out, names);
        out
    }

    /// Writes the expression, returning whether anything was written.
    pub fn write(&self, out: &mut String, names: &NameRegistry) -> bool {
        let start = out.len();
        match self {
            Self::Literal(text) => out.push_str(text),
            Self::This => out.push_str("this"),
            Self::Reference { receiver, name } => {
                write_receiver(out, receiver, names);
                out.push_str(name);
            }
            Self::Assign { target, value } => {
                target.write(out, names);
                out.push_str(" = ");
                value.write(out, names);
            }
            Self::Cast { ty, expr } => {
                out.push('(');
                out.push_str(&names.render(ty));
                out.push_str(") ");
                expr.write(out, names);
            }
            Self::New { ty, args, diamond } => {
                out.push_str("new ");
                match (ty.as_declared(), diamond) {
                    (Some(declared), true) => {
                        out.push_str(&names.type_name(declared));
                        out.push_str("<>");
                    }
                    _ => out.push_str(&names.render(ty)),
                }
                write_args(out, args, names);
            }
            Self::Call {
                receiver,
                name,
                args,
            } => {
                write_receiver(out, receiver, names);
                out.push_str(name);
                write_args(out, args, names);
            }
            Self::NewArray {
                element,
                dimensions,
                elements,
            } => {
                out.push_str("new ");
                out.push_str(&names.render(element));
                if dimensions.is_empty() {
                    out.push_str("[] {");
                    for (i, item) in elements.iter().enumerate() {
                        out.push_str(if i == 0 { " " } else { ", " });
                        item.write(out, names);
                    }
                    out.push_str(if elements.is_empty() { "}" } else { " }" });
                } else {
                    for dimension in dimensions {
                        out.push('[');
                        dimension.write(out, names);
                        out.push(']');
                    }
                }
            }
            Self::ArrayElement { array, index } => {
                array.write(out, names);
                out.push('[');
                index.write(out, names);
                out.push(']');
            }
            Self::Return(value) => {
                out.push_str("return");
                if let Some(value) = value {
                    out.push(' ');
                    value.write(out, names);
                }
            }
        }
        out.len() > start
    }

    /// Feeds every type this expression mentions to the collector.
    pub fn collect_types(&self, collector: &mut ImportCollector<'_>) {
        match self {
            Self::Literal(_) | Self::This => {}
            Self::Reference { receiver, .. } => collect_receiver(receiver, collector),
            Self::Assign { target, value } => {
                target.collect_types(collector);
                value.collect_types(collector);
            }
            Self::Cast { ty, expr } => {
                collector.collect_type(ty);
                expr.collect_types(collector);
            }
            Self::New { ty, args, .. } => {
                collector.collect_type(ty);
                for arg in args {
                    arg.collect_types(collector);
                }
            }
            Self::Call { receiver, args, .. } => {
                collect_receiver(receiver, collector);
                for arg in args {
                    arg.collect_types(collector);
                }
            }
            Self::NewArray {
                element,
                dimensions,
                elements,
            } => {
                collector.collect_type(element);
                for expr in dimensions.iter().chain(elements) {
                    expr.collect_types(collector);
                }
            }
            Self::ArrayElement { array, index } => {
                array.collect_types(collector);
                index.collect_types(collector);
            }
            Self::Return(value) => {
                if let Some(value) = value {
                    value.collect_types(collector);
                }
            }
        }
    }
}

fn write_receiver(out: &mut String, receiver: &Receiver, names: &NameRegistry) {
    let wrote = match receiver {
        Receiver::None => false,
        Receiver::This => {
            out.push_str("this");
            true
        }
        Receiver::Super => {
            out.push_str("super");
            true
        }
        Receiver::Static(ty) => match ty.as_declared() {
            Some(declared) => {
                out.push_str(&names.type_name(declared));
                true
            }
            None => {
                out.push_str(&names.render(ty));
                true
            }
        },
        Receiver::Expr(expr) if matches!(**expr, Expr::Cast { .. }) => {
            out.push('(');
            expr.write(out, names);
            out.push(')');
            true
        }
        Receiver::Expr(expr) => expr.write(out, names),
    };
    if wrote {
        out.push('.');
    }
}

fn write_args(out: &mut String, args: &[Expr], names: &NameRegistry) {
    out.push('(');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        arg.write(out, names);
    }
    out.push(')');
}

fn collect_receiver(receiver: &Receiver, collector: &mut ImportCollector<'_>) {
    match receiver {
        Receiver::Static(ty) => collector.collect_type(ty),
        Receiver::Expr(expr) => expr.collect_types(collector),
        Receiver::None | Receiver::This | Receiver::Super => {}
    }
}
