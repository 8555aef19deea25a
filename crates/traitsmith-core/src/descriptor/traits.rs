// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Trait descriptors.

use super::ResolveError;
use crate::config::GeneratorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::reflect::{
    FieldDecl, MemberDecl, MethodDecl, ReflectedModifier, ReflectedType, SuperInterfaceDecl,
    TraitDeclaration, TypeParameterDecl,
};
use crate::signature::{MethodSignature, Parameter};
use crate::types::{DeclaredType, GenericParam, TypeError, TypeRef};
use ecow::{EcoString, eco_format};
use std::collections::BTreeMap;
use tracing::{debug, instrument};

/// How a trait method takes part in composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// No body; the host must provide one.
    Abstract,
    /// Has a body that the delegate exposes under its alias.
    Concrete,
    /// The abstract return-self accessor, implemented by the delegate.
    SelfAccessor,
}

/// A method a trait contributes.
///
/// All types are already qualified with the owning trait's simple name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitMethod {
    pub name: EcoString,
    pub type_params: Vec<GenericParam>,
    pub return_type: TypeRef,
    pub params: Vec<Parameter>,
    pub throws: Vec<TypeRef>,
    pub kind: MethodKind,
    pub is_final: bool,
    /// Qualified name of the superinterface this method was inherited from.
    pub inherited_from: Option<EcoString>,
}

impl TraitMethod {
    #[must_use]
    pub fn signature(&self) -> MethodSignature {
        MethodSignature::new(
            self.name.clone(),
            self.return_type.clone(),
            self.params.iter().map(|param| param.ty.clone()).collect(),
            self.throws.clone(),
        )
    }

    /// The signature with generic qualifiers stripped, used as the
    /// collision key.
    #[must_use]
    pub fn normalized_signature(&self) -> MethodSignature {
        self.signature().normalized()
    }

    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.kind != MethodKind::Concrete
    }

    #[must_use]
    pub fn is_inherited(&self) -> bool {
        self.inherited_from.is_some()
    }
}

/// A `public static final` field of a trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitConstant {
    pub name: EcoString,
    pub ty: TypeRef,
}

/// A superinterface, with its type arguments expressed in the trait's
/// (qualified) parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperInterface {
    pub ty: TypeRef,
    /// Interface parameter name to the type the trait supplies for it.
    pub remapping: Vec<(EcoString, TypeRef)>,
}

/// A validated trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitDescriptor {
    ty: DeclaredType,
    /// Prefix of every generic parameter the trait declares; the simple name
    /// unless a host composes two traits sharing it.
    qualifier: EcoString,
    type_params: Vec<GenericParam>,
    methods: Vec<TraitMethod>,
    constants: Vec<TraitConstant>,
    super_interfaces: Vec<SuperInterface>,
}

impl TraitDescriptor {
    /// Builds a descriptor from a trait declaration, with default artifact
    /// naming.
    pub fn resolve(
        decl: &TraitDeclaration,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, ResolveError> {
        Self::resolve_with_config(decl, &GeneratorConfig::default(), sink)
    }

    /// Builds a descriptor from a trait declaration.
    ///
    /// Members that cannot be composed are reported to `sink` and skipped.
    /// A trait with a superclass other than the root, or with a name or type
    /// parameter that cannot be resolved, is rejected. The self accessor
    /// must return the trait's interface as `config` names it.
    #[instrument(skip_all, fields(name = %decl.name))]
    pub fn resolve_with_config(
        decl: &TraitDeclaration,
        config: &GeneratorConfig,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Self, ResolveError> {
        let erased =
            DeclaredType::from_qualified_name(&decl.name).map_err(|source| {
                ResolveError::InvalidName {
                    name: decl.name.clone(),
                    source,
                }
            })?;
        let qualifier: EcoString = erased.simple_name().into();
        let interface_name = match erased.namespace() {
            "" => config.interface_name(erased.simple_name()),
            namespace => eco_format!("{namespace}.{}", config.interface_name(erased.simple_name())),
        };

        if let Some(superclass) = &decl.superclass {
            check_superclass(&decl.name, superclass)?;
        }

        let type_params = decl
            .type_parameters
            .iter()
            .map(|param| localize_param(param, &qualifier, &[]))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ResolveError::UnresolvableType {
                owner: decl.name.clone(),
                source,
            })?;
        let type_args = type_params
            .iter()
            .map(|param| TypeRef::generic(param.unbounded()))
            .collect();
        let ty = erased.with_type_args(type_args);

        let mut methods = Vec::new();
        let mut constants = Vec::new();
        let mut has_accessor = false;
        for member in &decl.members {
            match member {
                MemberDecl::Method(method) => {
                    let location = eco_format!("{}.{}", decl.name, method.name);
                    if method.has(ReflectedModifier::Static) || method.has(ReflectedModifier::Private)
                    {
                        sink.report(
                            Diagnostic::warning("static and private methods are not composed")
                                .at(location),
                        );
                        continue;
                    }
                    match convert_method(method, &qualifier, &[]) {
                        Ok(converted) => {
                            let accessor = AccessorCheck {
                                interface: &interface_name,
                                return_type: &converted.return_type,
                                location: &location,
                            };
                            let kind = method_kind(method, &mut has_accessor, &accessor, sink);
                            methods.push(TraitMethod { kind, ..converted });
                        }
                        Err(err) => sink.report(
                            Diagnostic::error(eco_format!("unresolvable type: {err}")).at(location),
                        ),
                    }
                }
                MemberDecl::Constructor { parameters } => {
                    if !parameters.is_empty() {
                        sink.report(
                            Diagnostic::error("trait constructors must take no arguments")
                                .at(eco_format!("{}.<init>", decl.name))
                                .with_hint("remove the constructor or its parameters"),
                        );
                    }
                }
                MemberDecl::Field(field) => {
                    let location = eco_format!("{}.{}", decl.name, field.name);
                    match convert_constant(field) {
                        Ok(Some(constant)) => constants.push(constant),
                        Ok(None) => sink.report(
                            Diagnostic::error("trait fields must be public static final constants")
                                .at(location)
                                .with_hint("traits cannot hold state"),
                        ),
                        Err(err) => sink.report(
                            Diagnostic::error(eco_format!("unresolvable type: {err}")).at(location),
                        ),
                    }
                }
                MemberDecl::Other { name, description } => {
                    let location = if name.is_empty() {
                        decl.name.clone()
                    } else {
                        eco_format!("{}.{}", decl.name, name)
                    };
                    sink.report(
                        Diagnostic::error(eco_format!("{description} is not allowed in a trait"))
                            .at(location),
                    );
                }
            }
        }

        let mut super_interfaces = Vec::new();
        for interface in &decl.interfaces {
            match resolve_interface(interface, &qualifier) {
                Ok((resolved, inherited)) => {
                    for method in inherited {
                        let signature = method.normalized_signature();
                        if methods
                            .iter()
                            .any(|existing: &TraitMethod| existing.normalized_signature() == signature)
                        {
                            debug!(method = %method.name, "inherited method already declared");
                            continue;
                        }
                        methods.push(method);
                    }
                    super_interfaces.push(resolved);
                }
                Err(err) => sink.report(Diagnostic::error(err.to_string()).at(decl.name.clone())),
            }
        }

        debug!(
            methods = methods.len(),
            constants = constants.len(),
            "resolved trait"
        );
        Ok(Self {
            ty,
            qualifier,
            type_params,
            methods,
            constants,
            super_interfaces,
        })
    }

    /// This trait with every generic parameter re-keyed to `qualifier`.
    #[must_use]
    pub fn requalified(&self, qualifier: &str) -> Self {
        let from = self.qualifier.as_str();
        let ty_ref = |ty: &TypeRef| ty.requalify_generics(from, qualifier);
        let param = |param: &GenericParam| param.requalified(from, qualifier);
        Self {
            ty: self
                .ty
                .erased()
                .with_type_args(self.ty.type_args().iter().map(ty_ref).collect()),
            qualifier: qualifier.into(),
            type_params: self.type_params.iter().map(param).collect(),
            methods: self
                .methods
                .iter()
                .map(|method| TraitMethod {
                    type_params: method.type_params.iter().map(param).collect(),
                    return_type: ty_ref(&method.return_type),
                    params: method
                        .params
                        .iter()
                        .map(|p| Parameter::new(ty_ref(&p.ty), p.name.clone()))
                        .collect(),
                    throws: method.throws.iter().map(ty_ref).collect(),
                    ..method.clone()
                })
                .collect(),
            constants: self
                .constants
                .iter()
                .map(|constant| TraitConstant {
                    name: constant.name.clone(),
                    ty: ty_ref(&constant.ty),
                })
                .collect(),
            super_interfaces: self
                .super_interfaces
                .iter()
                .map(|interface| SuperInterface {
                    ty: ty_ref(&interface.ty),
                    remapping: interface
                        .remapping
                        .iter()
                        .map(|(name, ty)| (name.clone(), ty_ref(ty)))
                        .collect(),
                })
                .collect(),
        }
    }

    /// The trait class, parameterized by its own qualified parameters.
    pub fn ty(&self) -> &DeclaredType {
        &self.ty
    }

    #[must_use]
    pub fn qualified_name(&self) -> EcoString {
        self.ty.qualified_name()
    }

    pub fn simple_name(&self) -> &str {
        self.ty.simple_name()
    }

    pub fn namespace(&self) -> &str {
        self.ty.namespace()
    }

    /// Prefix of the trait's generic parameters, and of its constants when
    /// they clash on a host.
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// Declared type parameters, qualified and with bounds.
    pub fn type_params(&self) -> &[GenericParam] {
        &self.type_params
    }

    /// Use-site arguments for the trait's own parameters.
    pub fn type_args(&self) -> &[TypeRef] {
        self.ty.type_args()
    }

    /// Every method, declared ones first, then inherited ones.
    pub fn methods(&self) -> &[TraitMethod] {
        &self.methods
    }

    /// Methods that take part in composition (everything but the accessor).
    pub fn composable_methods(&self) -> impl Iterator<Item = &TraitMethod> {
        self.methods
            .iter()
            .filter(|method| method.kind != MethodKind::SelfAccessor)
    }

    #[must_use]
    pub fn self_accessor(&self) -> Option<&TraitMethod> {
        self.methods
            .iter()
            .find(|method| method.kind == MethodKind::SelfAccessor)
    }

    pub fn constants(&self) -> &[TraitConstant] {
        &self.constants
    }

    pub fn super_interfaces(&self) -> &[SuperInterface] {
        &self.super_interfaces
    }

    /// Whether the trait contributes a method with this name.
    #[must_use]
    pub fn declares_method(&self, name: &str) -> bool {
        self.composable_methods().any(|method| method.name == name)
    }
}

/// Traits resolved in this round, by qualified name.
#[derive(Debug, Clone, Default)]
pub struct TraitLookup {
    traits: BTreeMap<EcoString, TraitDescriptor>,
}

impl TraitLookup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a trait, returning any previous trait with the same name.
    pub fn insert(&mut self, descriptor: TraitDescriptor) -> Option<TraitDescriptor> {
        self.traits.insert(descriptor.qualified_name(), descriptor)
    }

    #[must_use]
    pub fn get(&self, qualified_name: &str) -> Option<&TraitDescriptor> {
        self.traits.get(qualified_name)
    }

    /// Finds a trait by qualified name, or by simple name when that is
    /// unambiguous.
    pub fn find(&self, name: &str) -> Result<&TraitDescriptor, ResolveError> {
        if let Some(found) = self.traits.get(name) {
            return Ok(found);
        }
        let candidates: Vec<_> = self
            .traits
            .values()
            .filter(|descriptor| descriptor.simple_name() == name)
            .collect();
        match candidates.as_slice() {
            [] => Err(ResolveError::UnknownTrait(name.into())),
            [single] => Ok(single),
            many => Err(ResolveError::AmbiguousTrait {
                name: name.into(),
                candidates: many
                    .iter()
                    .map(|descriptor| descriptor.qualified_name())
                    .collect::<Vec<_>>()
                    .join(", ")
                    .into(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &TraitDescriptor> {
        self.traits.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.traits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traits.is_empty()
    }
}

impl FromIterator<TraitDescriptor> for TraitLookup {
    fn from_iter<I: IntoIterator<Item = TraitDescriptor>>(iter: I) -> Self {
        let mut lookup = Self::new();
        for descriptor in iter {
            lookup.insert(descriptor);
        }
        lookup
    }
}

fn check_superclass(name: &EcoString, superclass: &ReflectedType) -> Result<(), ResolveError> {
    match superclass.to_type_ref() {
        Ok(ty) if ty.array_depth() == 0 && ty.as_declared().is_some_and(DeclaredType::is_root) => {
            Ok(())
        }
        Ok(ty) => Err(ResolveError::IllegalSuperclass {
            name: name.clone(),
            superclass: ty.to_string().into(),
        }),
        Err(source) => Err(ResolveError::UnresolvableType {
            owner: name.clone(),
            source,
        }),
    }
}

/// What a self accessor is checked against.
struct AccessorCheck<'a> {
    /// Qualified name of the trait's generated interface.
    interface: &'a str,
    return_type: &'a TypeRef,
    location: &'a EcoString,
}

/// Decides the method's kind, reporting a misdeclared accessor.
fn method_kind(
    method: &MethodDecl,
    has_accessor: &mut bool,
    check: &AccessorCheck<'_>,
    sink: &mut dyn DiagnosticSink,
) -> MethodKind {
    let location = check.location;
    let is_abstract = method.has(ReflectedModifier::Abstract);
    let ordinary = if is_abstract {
        MethodKind::Abstract
    } else {
        MethodKind::Concrete
    };
    if !method.self_accessor {
        return ordinary;
    }
    if !is_abstract || !method.parameters.is_empty() {
        sink.report(
            Diagnostic::error("the self accessor must be abstract and take no arguments")
                .at(location.clone()),
        );
        return ordinary;
    }
    let returns_interface = check.return_type.array_depth() == 0
        && check
            .return_type
            .as_declared()
            .is_some_and(|ty| ty.qualified_name() == check.interface);
    if !returns_interface {
        sink.report(
            Diagnostic::error(eco_format!(
                "the self accessor must return '{}'",
                check.interface
            ))
            .at(location.clone())
            .with_hint("the host is only known to implement the trait's interface"),
        );
        return ordinary;
    }
    if *has_accessor {
        sink.report(
            Diagnostic::error("a trait may declare only one self accessor").at(location.clone()),
        );
        return ordinary;
    }
    *has_accessor = true;
    MethodKind::SelfAccessor
}

/// Rewrites a reflected type into the trait's terms: interface parameters
/// are replaced through `remapping`, then every remaining parameter is
/// qualified with the trait's simple name.
fn localize(
    ty: &ReflectedType,
    qualifier: &str,
    remapping: &[(EcoString, TypeRef)],
) -> Result<TypeRef, TypeError> {
    Ok(remap(&ty.to_type_ref()?, remapping).qualify_generics(qualifier))
}

fn remap(ty: &TypeRef, remapping: &[(EcoString, TypeRef)]) -> TypeRef {
    if remapping.is_empty() {
        return ty.clone();
    }
    ty.map_generics(&mut |param| {
        if param.qualifier().is_some() {
            return None;
        }
        remapping
            .iter()
            .find(|(name, _)| name == param.name())
            .map(|(_, replacement)| replacement.clone())
    })
}

fn localize_param(
    decl: &TypeParameterDecl,
    qualifier: &str,
    remapping: &[(EcoString, TypeRef)],
) -> Result<GenericParam, TypeError> {
    let param = decl.to_generic_param()?;
    let bounds = param
        .extends_bounds()
        .iter()
        .map(|bound| remap(bound, remapping).qualify_generics(qualifier))
        .collect();
    GenericParam::new(param.name())
        .with_extends(bounds)
        .with_qualifier(qualifier)
}

fn convert_method(
    method: &MethodDecl,
    qualifier: &str,
    remapping: &[(EcoString, TypeRef)],
) -> Result<TraitMethod, TypeError> {
    let type_params = method
        .type_parameters
        .iter()
        .map(|param| localize_param(param, qualifier, remapping))
        .collect::<Result<Vec<_>, _>>()?;
    let last = method.parameters.len().saturating_sub(1);
    let mut params = Vec::with_capacity(method.parameters.len());
    for (index, param) in method.parameters.iter().enumerate() {
        let mut ty = localize(&param.ty, qualifier, remapping)?;
        if method.varargs && index == last {
            ty = ty.as_varargs();
        }
        let name = if param.name.is_empty() {
            eco_format!("arg{index}")
        } else {
            param.name.clone()
        };
        params.push(Parameter::new(ty, name));
    }
    let throws = method
        .throws
        .iter()
        .map(|ty| localize(ty, qualifier, remapping))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(TraitMethod {
        name: method.name.clone(),
        type_params,
        return_type: localize(&method.return_type, qualifier, remapping)?,
        params,
        throws,
        kind: MethodKind::Abstract,
        is_final: method.has(ReflectedModifier::Final),
        inherited_from: None,
    })
}

/// `Ok(None)` for a field that is not a constant.
fn convert_constant(field: &FieldDecl) -> Result<Option<TraitConstant>, TypeError> {
    let is_constant = field.has(ReflectedModifier::Public)
        && field.has(ReflectedModifier::Static)
        && field.has(ReflectedModifier::Final);
    if !is_constant {
        return Ok(None);
    }
    Ok(Some(TraitConstant {
        name: field.name.clone(),
        ty: field.ty.to_type_ref()?,
    }))
}

/// Resolves a superinterface and the methods the trait inherits from it.
///
/// A raw use (no arguments for a generic interface) maps every interface
/// parameter to the root type.
fn resolve_interface(
    decl: &SuperInterfaceDecl,
    qualifier: &str,
) -> Result<(SuperInterface, Vec<TraitMethod>), ResolveError> {
    let unresolvable = |source: TypeError| ResolveError::UnresolvableType {
        owner: decl.name.clone(),
        source,
    };
    let erased = DeclaredType::from_qualified_name(&decl.name).map_err(unresolvable)?;
    let expected = decl.type_parameters.len();
    let found = decl.arguments.len();
    if found != 0 && found != expected {
        return Err(ResolveError::InterfaceArity {
            interface: decl.name.clone(),
            expected,
            found,
        });
    }

    let arguments = decl
        .arguments
        .iter()
        .map(|argument| localize(argument, qualifier, &[]))
        .collect::<Result<Vec<_>, _>>()
        .map_err(unresolvable)?;
    let remapping: Vec<(EcoString, TypeRef)> = if arguments.is_empty() {
        decl.type_parameters
            .iter()
            .map(|name| (name.clone(), TypeRef::root()))
            .collect()
    } else {
        decl.type_parameters
            .iter()
            .cloned()
            .zip(arguments.iter().cloned())
            .collect()
    };

    let mut methods = Vec::new();
    for method in &decl.methods {
        if method.has(ReflectedModifier::Static) || method.has(ReflectedModifier::Private) {
            continue;
        }
        let converted = convert_method(method, qualifier, &remapping).map_err(unresolvable)?;
        let kind = if method.has(ReflectedModifier::Default) {
            MethodKind::Concrete
        } else {
            MethodKind::Abstract
        };
        methods.push(TraitMethod {
            kind,
            inherited_from: Some(erased.qualified_name()),
            ..converted
        });
    }

    let resolved = SuperInterface {
        ty: TypeRef::declared(erased.with_type_args(arguments)),
        remapping,
    };
    Ok((resolved, methods))
}
