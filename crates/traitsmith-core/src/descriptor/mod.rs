// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Trait and host descriptors.
//!
//! **DDD Context:** Composition — Domain Model
//!
//! Descriptors are the validated, immutable view of a declaration that the
//! composition resolver works from. They are built once per round from the
//! reflection model:
//!
//! - [`TraitDescriptor::resolve`] checks a trait's shape, skips (and reports)
//!   members that cannot be composed, and qualifies every generic parameter
//!   with the trait's simple name.
//! - [`HostDescriptor::resolve`] resolves the composed trait names against a
//!   [`TraitLookup`] and checks preferences and the desired superclass.
//!
//! Member-level problems are reported to a [`DiagnosticSink`] and resolution
//! carries on; problems that make the whole declaration unusable are returned
//! as a [`ResolveError`].
//!
//! [`DiagnosticSink`]: crate::diagnostics::DiagnosticSink

mod host;
mod traits;

pub use host::{DesiredSuperclass, HostDescriptor, SuperclassArg};
pub use traits::{
    MethodKind, SuperInterface, TraitConstant, TraitDescriptor, TraitLookup, TraitMethod,
};

use crate::types::TypeError;
use ecow::EcoString;
use thiserror::Error;

/// A declaration that cannot be turned into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("invalid name '{name}': {source}")]
    InvalidName {
        name: EcoString,
        #[source]
        source: TypeError,
    },

    #[error("unresolvable type in '{owner}': {source}")]
    UnresolvableType {
        owner: EcoString,
        #[source]
        source: TypeError,
    },

    #[error("'{interface}' declares {expected} type parameter(s) but {found} argument(s) were given")]
    InterfaceArity {
        interface: EcoString,
        expected: usize,
        found: usize,
    },

    #[error("trait '{name}' must not extend '{superclass}'")]
    IllegalSuperclass {
        name: EcoString,
        superclass: EcoString,
    },

    #[error("unknown trait '{0}'")]
    UnknownTrait(EcoString),

    #[error("trait name '{name}' is ambiguous between {candidates}")]
    AmbiguousTrait {
        name: EcoString,
        candidates: EcoString,
    },

    #[error("trait '{0}' is composed more than once")]
    DuplicateTrait(EcoString),

    #[error("host '{host}' composes no traits")]
    NoTraits { host: EcoString },

    #[error("preference for '{method}' names '{trait_name}', which is not composed")]
    PreferenceNotComposed {
        method: EcoString,
        trait_name: EcoString,
    },

    #[error("conflicting preferences for '{method}': '{first}' and '{second}'")]
    ConflictingPreference {
        method: EcoString,
        first: EcoString,
        second: EcoString,
    },

    #[error("superclass '{superclass}' takes {expected} type argument(s) but {found} were given")]
    SuperclassArity {
        superclass: EcoString,
        expected: usize,
        found: usize,
    },

    #[error("invalid superclass argument on '{host}': {source}")]
    InvalidSuperclassArgument {
        host: EcoString,
        #[source]
        source: TypeError,
    },
}

/// Lower-cases the first character: `Greeter` becomes `greeter`.
pub(crate) fn decapitalize(name: &str) -> EcoString {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => {
            let mut out: EcoString = first.to_lowercase().collect::<String>().into();
            out.push_str(chars.as_str());
            out
        }
        None => EcoString::new(),
    }
}
