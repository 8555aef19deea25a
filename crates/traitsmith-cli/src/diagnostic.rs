// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error diagnostics using miette.
//!
//! Converts traitsmith-core diagnostics into miette-formatted reports. Core
//! diagnostics carry a declaration name rather than a source span, so the
//! location is folded into the message.

use miette::{Diagnostic, Report};
use std::fmt;
use traitsmith_core::diagnostics::{Diagnostic as CoreDiagnostic, Severity};

/// A generation diagnostic with rich formatting.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct GenerationDiagnostic {
    pub severity: Severity,
    /// Human-readable message, prefixed with the location if there is one
    pub message: String,
    pub hint: Option<String>,
}

impl GenerationDiagnostic {
    /// Create a new diagnostic from a traitsmith-core diagnostic.
    pub fn from_core_diagnostic(diagnostic: &CoreDiagnostic) -> Self {
        let message = match &diagnostic.location {
            Some(location) => format!("{location}: {}", diagnostic.message),
            None => diagnostic.message.to_string(),
        };
        Self {
            severity: diagnostic.severity,
            message,
            hint: diagnostic.hint.as_ref().map(ToString::to_string),
        }
    }
}

impl Diagnostic for GenerationDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.severity {
            Severity::Error => "traitsmith::error",
            Severity::Warning => "traitsmith::warning",
            Severity::Note => "traitsmith::note",
        };
        Some(Box::new(code))
    }

    fn severity(&self) -> Option<miette::Severity> {
        Some(match self.severity {
            Severity::Error => miette::Severity::Error,
            Severity::Warning => miette::Severity::Warning,
            Severity::Note => miette::Severity::Advice,
        })
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.hint
            .as_ref()
            .map(|hint| Box::new(hint) as Box<dyn fmt::Display + 'a>)
    }
}

/// Prints every diagnostic to stderr.
pub fn report_all<'a>(diagnostics: impl IntoIterator<Item = &'a CoreDiagnostic>) {
    for diagnostic in diagnostics {
        eprintln!(
            "{:?}",
            Report::new(GenerationDiagnostic::from_core_diagnostic(diagnostic))
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_carries_location_and_hint() {
        let core = CoreDiagnostic::error("unknown trait 'Flyer'")
            .at("app.Person")
            .with_hint("traits must be declared in the same round");
        let diag = GenerationDiagnostic::from_core_diagnostic(&core);

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "app.Person: unknown trait 'Flyer'");
        assert_eq!(
            diag.help().map(|help| help.to_string()).as_deref(),
            Some("traits must be declared in the same round")
        );
        assert_eq!(diag.severity(), Some(miette::Severity::Error));
    }

    #[test]
    fn warning_without_location() {
        let core = CoreDiagnostic::warning("nothing to compose");
        let diag = GenerationDiagnostic::from_core_diagnostic(&core);

        assert_eq!(diag.message, "nothing to compose");
        assert!(diag.help().is_none());
        assert_eq!(diag.severity(), Some(miette::Severity::Warning));
        assert_eq!(
            diag.code().map(|code| code.to_string()).as_deref(),
            Some("traitsmith::warning")
        );
    }

    #[test]
    fn note_is_advice() {
        let diag = GenerationDiagnostic::from_core_diagnostic(&CoreDiagnostic::note("fyi"));
        assert_eq!(diag.severity(), Some(miette::Severity::Advice));
    }
}
