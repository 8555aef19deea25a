// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Host superclass plan.

use super::trait_artifacts::{delegate_type, interface_type};
use super::{forward, method_header};
use crate::compose::{self, SignatureGroup};
use crate::config::GeneratorConfig;
use crate::descriptor::HostDescriptor;
use crate::expr::Expr;
use crate::types::TypeRef;
use crate::writer::declarations::{FieldDeclaration, Modifier, TypeDeclaration};
use crate::writer::unit::{CompilationUnit, TypeBody, TypeMember};
use ecow::EcoString;
use tracing::trace;

/// Plans `Abstract{Host}`.
///
/// Members, in order: re-declared trait constants, one delegate field per
/// trait, then one method per signature group. An abstract winner stays
/// abstract; a concrete winner forwards to its trait's delegate alias.
#[must_use]
pub fn superclass_unit(host: &HostDescriptor, config: &GeneratorConfig) -> CompilationUnit {
    let traits = host.traits();
    let mut decl = TypeDeclaration::class(config.superclass_name(host.ty().simple_name()))
        .with_modifiers(vec![Modifier::Public, Modifier::Abstract])
        .with_type_params(compose::merge_type_params(host, config))
        .implementing(
            traits
                .iter()
                .map(|owner| interface_type(owner, config))
                .collect(),
        );
    if let Some(superclass) = host.superclass() {
        decl = decl.extending(superclass.to_type_ref(&config.auto_parameter_prefix));
    }
    let mut body = TypeBody::new(decl);

    for constant in compose::compose_constants(traits) {
        let value = Expr::static_field(
            TypeRef::declared(constant.owner.ty().erased()),
            constant.constant.name.clone(),
        );
        body.push(TypeMember::Field(
            FieldDeclaration::new(
                vec![Modifier::Public, Modifier::Static, Modifier::Final],
                constant.constant.ty.clone(),
                constant.name(),
            )
            .initialized(value),
        ));
    }

    let fields = compose::delegate_field_names(traits, config);
    for (owner, field) in traits.iter().zip(&fields) {
        let ty = delegate_type(owner, config);
        body.push(TypeMember::Field(
            FieldDeclaration::new(vec![Modifier::Private, Modifier::Final], ty.clone(), field.clone())
                .initialized(Expr::new_diamond(ty, vec![Expr::This])),
        ));
    }

    for group in compose::resolve_groups(host) {
        body.push(group_member(&group, &fields, config));
    }

    let unit = CompilationUnit::new(host.ty().namespace(), body);
    match config.header() {
        Some(header) => unit.with_header(header),
        None => unit,
    }
}

fn group_member(
    group: &SignatureGroup<'_>,
    fields: &[EcoString],
    config: &GeneratorConfig,
) -> TypeMember {
    let winner = group.winner();
    let method = winner.method;
    trace!(
        method = %method.name,
        from = %winner.owner.qualified_name(),
        is_abstract = method.is_abstract(),
        "superclass member"
    );
    if method.is_abstract() {
        return TypeMember::Abstract(method_header(
            method,
            &method.name,
            vec![Modifier::Public, Modifier::Abstract],
        ));
    }
    let decl = method_header(method, &method.name, vec![Modifier::Public]);
    let call = Expr::call(
        Expr::this_field(fields[winner.trait_index].clone()),
        config.alias_name(&method.name),
        decl.forwarded_args(),
    );
    TypeMember::Method {
        body: vec![forward(method, call)],
        decl,
    }
}
