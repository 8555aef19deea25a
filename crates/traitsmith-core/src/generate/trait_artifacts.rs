// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Interface and delegate plans for a trait.
//!
//! The delegate extends the trait class and holds the host (typed as the
//! trait's interface). Plain method names forward to the host, so a trait
//! body calling another method reaches whichever implementation won on the
//! host. The trait's own bodies stay reachable under the alias, which calls
//! `super`.

use super::{forward, method_header};
use crate::config::GeneratorConfig;
use crate::descriptor::{MethodKind, TraitDescriptor, TraitMethod};
use crate::expr::Expr;
use crate::signature::Parameter;
use crate::types::{DeclaredType, TypeRef};
use crate::writer::declarations::{FieldDeclaration, MethodDeclaration, Modifier, TypeDeclaration};
use crate::writer::unit::{CompilationUnit, TypeBody, TypeMember};
use ecow::EcoString;

/// Name of the delegate's field holding the host.
const TARGET_FIELD: &str = "target";

/// The trait's interface type, parameterized like the trait.
#[must_use]
pub fn interface_type(descriptor: &TraitDescriptor, config: &GeneratorConfig) -> TypeRef {
    named_like_trait(descriptor, config.interface_name(descriptor.simple_name()))
}

/// The trait's delegate type, parameterized like the trait.
#[must_use]
pub fn delegate_type(descriptor: &TraitDescriptor, config: &GeneratorConfig) -> TypeRef {
    named_like_trait(descriptor, config.delegate_name(descriptor.simple_name()))
}

fn named_like_trait(descriptor: &TraitDescriptor, simple_name: EcoString) -> TypeRef {
    let ty = DeclaredType::new(descriptor.namespace(), simple_name)
        .map(|ty| ty.with_type_args(descriptor.type_args().to_vec()));
    match ty {
        Ok(ty) => TypeRef::declared(ty),
        // The simple name is built from a non-empty trait name.
        Err(_) => TypeRef::root(),
    }
}

/// Plans `{Trait}Trait`: every declared, composable method, extending the
/// trait's superinterfaces.
#[must_use]
pub fn interface_unit(descriptor: &TraitDescriptor, config: &GeneratorConfig) -> CompilationUnit {
    let decl = TypeDeclaration::interface(config.interface_name(descriptor.simple_name()))
        .with_type_params(descriptor.type_params().to_vec())
        .implementing(
            descriptor
                .super_interfaces()
                .iter()
                .map(|interface| interface.ty.clone())
                .collect(),
        );
    let mut body = TypeBody::new(decl);
    for method in descriptor
        .composable_methods()
        .filter(|method| !method.is_inherited())
    {
        body.push(TypeMember::Abstract(method_header(method, &method.name, vec![])));
    }
    unit(descriptor.namespace(), body, config)
}

/// Plans `{Trait}Delegate extends {Trait}`.
#[must_use]
pub fn delegate_unit(descriptor: &TraitDescriptor, config: &GeneratorConfig) -> CompilationUnit {
    let name = config.delegate_name(descriptor.simple_name());
    let target_type = interface_type(descriptor, config);
    let decl = TypeDeclaration::class(name.clone())
        .with_type_params(descriptor.type_params().to_vec())
        .extending(TypeRef::declared(descriptor.ty().clone()));
    let mut body = TypeBody::new(decl);

    body.push(TypeMember::Field(FieldDeclaration::new(
        vec![Modifier::Private, Modifier::Final],
        target_type.clone(),
        TARGET_FIELD,
    )));
    body.push(TypeMember::Method {
        decl: MethodDeclaration::constructor(name)
            .with_modifiers(vec![Modifier::Public])
            .with_params(vec![Parameter::new(target_type.clone(), TARGET_FIELD)]),
        body: vec![Expr::assign(
            Expr::this_field(TARGET_FIELD),
            Expr::var(TARGET_FIELD),
        )],
    });

    for method in descriptor.methods() {
        match method.kind {
            MethodKind::SelfAccessor => body.push(accessor(method, &target_type)),
            MethodKind::Abstract => {
                if !method.is_final {
                    body.push(forward_to_target(method));
                }
            }
            MethodKind::Concrete => {
                if !method.is_final {
                    body.push(forward_to_target(method));
                }
                body.push(alias(method, config));
            }
        }
    }
    unit(descriptor.namespace(), body, config)
}

/// `@Override public R m(args) { return this.target.m(args); }`
fn forward_to_target(method: &TraitMethod) -> TypeMember {
    let decl = method_header(method, &method.name, vec![Modifier::Public])
        .annotated(DeclaredType::override_annotation());
    let call = Expr::call(
        Expr::this_field(TARGET_FIELD),
        method.name.clone(),
        decl.forwarded_args(),
    );
    TypeMember::Method {
        body: vec![forward(method, call)],
        decl,
    }
}

/// `public R trait$m(args) { return super.m(args); }`
fn alias(method: &TraitMethod, config: &GeneratorConfig) -> TypeMember {
    let decl = method_header(method, &config.alias_name(&method.name), vec![Modifier::Public]);
    let call = Expr::super_call(method.name.clone(), decl.forwarded_args());
    TypeMember::Method {
        body: vec![forward(method, call)],
        decl,
    }
}

/// The accessor returns the held host, cast unless it already has the
/// accessor's return type.
fn accessor(method: &TraitMethod, target_type: &TypeRef) -> TypeMember {
    let decl = method_header(method, &method.name, vec![Modifier::Public])
        .annotated(DeclaredType::override_annotation());
    let target = Expr::this_field(TARGET_FIELD);
    let value = if method.return_type == *target_type {
        target
    } else {
        Expr::cast(method.return_type.clone(), target)
    };
    TypeMember::Method {
        decl,
        body: vec![Expr::returning(value)],
    }
}

fn unit(namespace: &str, body: TypeBody, config: &GeneratorConfig) -> CompilationUnit {
    let unit = CompilationUnit::new(namespace, body);
    match config.header() {
        Some(header) => unit.with_header(header),
        None => unit,
    }
}
