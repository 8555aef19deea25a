// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Artifact generation.
//!
//! **DDD Context:** Code Generation
//!
//! For every trait the generator emits a capability interface and a
//! delegate class; for every host it emits an abstract superclass that the
//! host extends. Each artifact is planned as a
//! [`CompilationUnit`](crate::writer::unit::CompilationUnit), rendered in
//! memory, and only then written through the [`SourceFiler`].
//!
//! ```text
//! Greeter            -> GreeterTrait (interface), GreeterDelegate
//! Person [Greeter]   -> AbstractPerson implements GreeterTrait
//! ```

// Spurious warnings from miette derive macro expansion
#![allow(unused_assignments)]

mod superclass;
mod trait_artifacts;

pub use superclass::superclass_unit;
pub use trait_artifacts::{delegate_unit, interface_unit};

use crate::config::GeneratorConfig;
use crate::descriptor::{HostDescriptor, TraitDescriptor, TraitMethod};
use crate::expr::Expr;
use crate::filer::SourceFiler;
use crate::writer::WriterError;
use crate::writer::declarations::{MethodDeclaration, Modifier};
use crate::writer::unit::CompilationUnit;
use ecow::EcoString;
use miette::Diagnostic;
use std::collections::HashSet;
use std::io::{self, Write};
use thiserror::Error;
use tracing::{info, instrument};

/// Errors that abort one artifact.
#[derive(Debug, Error, Diagnostic)]
pub enum GenerateError {
    /// Generation was requested twice for the same declaration.
    #[error("artifacts for '{0}' were already generated")]
    #[diagnostic(
        code(traitsmith::generate::already_generated),
        help("each trait and host is generated once per round")
    )]
    AlreadyGenerated(EcoString),

    /// The writer rejected an operation.
    #[error("failed to emit '{name}'")]
    #[diagnostic(code(traitsmith::generate::writer))]
    Writer {
        name: EcoString,
        #[source]
        source: WriterError,
    },

    /// The filer could not create or write a file.
    #[error("failed to write '{name}'")]
    #[diagnostic(code(traitsmith::generate::io))]
    Io {
        name: EcoString,
        #[source]
        source: io::Error,
    },
}

/// Result type for generation.
pub type Result<T> = std::result::Result<T, GenerateError>;

/// Names of the files generated for a trait.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraitArtifacts {
    pub interface_name: EcoString,
    pub delegate_name: EcoString,
}

/// Generates artifacts into a [`SourceFiler`], once per declaration.
pub struct Generator<'f> {
    config: GeneratorConfig,
    filer: &'f mut dyn SourceFiler,
    traits_done: HashSet<EcoString>,
    hosts_done: HashSet<EcoString>,
}

impl<'f> Generator<'f> {
    pub fn new(config: GeneratorConfig, filer: &'f mut dyn SourceFiler) -> Self {
        Self {
            config,
            filer,
            traits_done: HashSet::new(),
            hosts_done: HashSet::new(),
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Emits the interface and delegate for a trait.
    ///
    /// Both files are rendered before either is written.
    #[instrument(skip_all, fields(name = %descriptor.qualified_name()))]
    pub fn generate_trait_artifacts(
        &mut self,
        descriptor: &TraitDescriptor,
    ) -> Result<TraitArtifacts> {
        let originating = descriptor.qualified_name();
        if self.traits_done.contains(&originating) {
            return Err(GenerateError::AlreadyGenerated(originating));
        }

        let interface = interface_unit(descriptor, &self.config);
        let delegate = delegate_unit(descriptor, &self.config);
        let interface_text = render(&interface)?;
        let delegate_text = render(&delegate)?;

        let artifacts = TraitArtifacts {
            interface_name: interface.qualified_name(),
            delegate_name: delegate.qualified_name(),
        };
        self.emit(&artifacts.interface_name, &originating, &interface_text)?;
        self.emit(&artifacts.delegate_name, &originating, &delegate_text)?;
        self.traits_done.insert(originating);
        info!(
            interface = %artifacts.interface_name,
            delegate = %artifacts.delegate_name,
            "generated trait artifacts"
        );
        Ok(artifacts)
    }

    /// Emits the abstract superclass for a host and returns its name.
    #[instrument(skip_all, fields(name = %host.qualified_name()))]
    pub fn generate_host_superclass(&mut self, host: &HostDescriptor) -> Result<EcoString> {
        let originating = host.qualified_name();
        if self.hosts_done.contains(&originating) {
            return Err(GenerateError::AlreadyGenerated(originating));
        }

        let unit = superclass_unit(host, &self.config);
        let text = render(&unit)?;
        let name = unit.qualified_name();
        self.emit(&name, &originating, &text)?;
        self.hosts_done.insert(originating);
        info!(superclass = %name, "generated host superclass");
        Ok(name)
    }

    fn emit(&mut self, name: &EcoString, originating: &str, text: &str) -> Result<()> {
        let io_error = |source: io::Error| GenerateError::Io {
            name: name.clone(),
            source,
        };
        let mut file = self
            .filer
            .create_source(name, originating)
            .map_err(io_error)?;
        file.write_all(text.as_bytes()).map_err(io_error)?;
        file.flush().map_err(io_error)
    }
}

fn render(unit: &CompilationUnit) -> Result<String> {
    unit.render().map_err(|source| GenerateError::Writer {
        name: unit.qualified_name(),
        source,
    })
}

/// Header for `method` under `name`, with the method's own type
/// parameters, parameters and throws clause.
pub(crate) fn method_header(
    method: &TraitMethod,
    name: &str,
    modifiers: Vec<Modifier>,
) -> MethodDeclaration {
    MethodDeclaration::method(method.return_type.clone(), name)
        .with_modifiers(modifiers)
        .with_type_params(method.type_params.clone())
        .with_params(method.params.clone())
        .with_throws(method.throws.clone())
}

/// `return call;`, or just `call;` for a `void` method.
pub(crate) fn forward(method: &TraitMethod, call: Expr) -> Expr {
    if method.return_type.is_void() {
        call
    } else {
        Expr::returning(call)
    }
}
