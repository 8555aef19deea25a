// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! traitsmith core.
//!
//! This crate contains the trait-composition generator:
//! - Type references and method signatures, independent of any compiler
//! - The reflection model a front end hands over ([`reflect`])
//! - Validated trait and host descriptors ([`descriptor`])
//! - Diamond-conflict resolution ([`compose`])
//! - A scoped source writer that shortens and imports type names
//!   ([`writer`])
//! - Generation of interfaces, delegates and host superclasses
//!   ([`generate`], [`round`])
//!
//! Generation is single-threaded and synchronous. Each output file is
//! rendered completely in memory before it is handed to a
//! [`filer::SourceFiler`], so a failed artifact never leaves a partial file.

pub mod compose;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod expr;
pub mod filer;
pub mod generate;
pub mod imports;
pub mod reflect;
pub mod round;
pub mod signature;
pub mod types;
pub mod writer;

#[cfg(test)]
pub(crate) mod test_helpers;

/// Re-export commonly used types.
pub mod prelude {
    pub use crate::config::GeneratorConfig;
    pub use crate::descriptor::{HostDescriptor, TraitDescriptor, TraitLookup};
    pub use crate::diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, Severity};
    pub use crate::filer::{MemoryFiler, SourceFiler};
    pub use crate::generate::{GenerateError, Generator, TraitArtifacts};
    pub use crate::reflect::{HostDeclaration, RoundInput, TraitDeclaration};
    pub use crate::round::{RoundSummary, process_round};
    pub use crate::types::{DeclaredType, GenericParam, TypeRef};
}
