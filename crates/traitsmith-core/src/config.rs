// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generator options.
//!
//! Naming of generated artifacts is configurable; every option has a
//! default so an empty `[generator]` table (or none at all) is valid.
//!
//! ```toml
//! [generator]
//! interface_suffix = "Trait"
//! delegate_suffix = "Delegate"
//! superclass_prefix = "Abstract"
//! default_alias_prefix = "trait$"
//! ```

use ecow::{EcoString, eco_format};
use serde::Deserialize;
use thiserror::Error;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("`{option}` must not be empty")]
    Empty { option: &'static str },

    #[error("`{option}` value '{value}' is not a valid identifier fragment")]
    InvalidIdentifier {
        option: &'static str,
        value: EcoString,
    },
}

/// Naming and output options for generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Appended to a trait's simple name to name its interface.
    pub interface_suffix: EcoString,
    /// Appended to a trait's simple name to name its delegate.
    pub delegate_suffix: EcoString,
    /// Prepended to a host's simple name to name its superclass.
    pub superclass_prefix: EcoString,
    /// Prefix of the alias under which a delegate exposes a trait's own
    /// implementation of a concrete method.
    pub default_alias_prefix: EcoString,
    /// Prefix of auto-numbered superclass type parameters.
    pub auto_parameter_prefix: EcoString,
    /// Whether generated files start with a "generated" comment.
    pub emit_generated_comment: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            interface_suffix: "Trait".into(),
            delegate_suffix: "Delegate".into(),
            superclass_prefix: "Abstract".into(),
            default_alias_prefix: "trait$".into(),
            auto_parameter_prefix: "S".into(),
            emit_generated_comment: true,
        }
    }
}

impl GeneratorConfig {
    /// Checks every naming option.
    ///
    /// Affixes must be non-empty and made of identifier characters; the
    /// alias and parameter prefixes must also be able to start an
    /// identifier.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_fragment("interface_suffix", &self.interface_suffix, false)?;
        check_fragment("delegate_suffix", &self.delegate_suffix, false)?;
        check_fragment("superclass_prefix", &self.superclass_prefix, true)?;
        check_fragment("default_alias_prefix", &self.default_alias_prefix, true)?;
        check_fragment("auto_parameter_prefix", &self.auto_parameter_prefix, true)?;
        if self.interface_suffix == self.delegate_suffix {
            return Err(ConfigError::InvalidIdentifier {
                option: "delegate_suffix",
                value: self.delegate_suffix.clone(),
            });
        }
        Ok(())
    }

    /// The comment written at the top of each generated file, if enabled.
    #[must_use]
    pub fn header(&self) -> Option<&'static str> {
        self.emit_generated_comment
            .then_some("Generated by traitsmith. Do not edit.")
    }

    /// `Greeter` -> `GreeterTrait`.
    #[must_use]
    pub fn interface_name(&self, trait_name: &str) -> EcoString {
        eco_format!("{trait_name}{}", self.interface_suffix)
    }

    /// `Greeter` -> `GreeterDelegate`.
    #[must_use]
    pub fn delegate_name(&self, trait_name: &str) -> EcoString {
        eco_format!("{trait_name}{}", self.delegate_suffix)
    }

    /// `Person` -> `AbstractPerson`.
    #[must_use]
    pub fn superclass_name(&self, host_name: &str) -> EcoString {
        eco_format!("{}{host_name}", self.superclass_prefix)
    }

    /// `greet` -> `trait$greet`.
    #[must_use]
    pub fn alias_name(&self, method: &str) -> EcoString {
        eco_format!("{}{method}", self.default_alias_prefix)
    }
}

fn check_fragment(option: &'static str, value: &str, leading: bool) -> Result<(), ConfigError> {
    let mut chars = value.chars();
    let Some(first) = chars.next() else {
        return Err(ConfigError::Empty { option });
    };
    let is_part = |c: char| c.is_alphanumeric() || c == '_' || c == '$';
    let first_ok = if leading {
        first.is_alphabetic() || first == '_' || first == '$'
    } else {
        is_part(first)
    };
    if first_ok && chars.all(is_part) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentifier {
            option,
            value: value.into(),
        })
    }
}
