// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! CLI command implementations.

pub mod check;
pub mod generate;
pub mod manifest;

use camino::Utf8Path;
use miette::{Context, IntoDiagnostic, Result};
use std::fs;
use tracing::info;
use traitsmith_core::reflect::RoundInput;

/// Reads the JSON reflection model of one round.
pub fn load_round(path: &Utf8Path) -> Result<RoundInput> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read input '{path}'"))?;
    let round: RoundInput = serde_json::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse input '{path}'"))?;
    info!(
        traits = round.traits.len(),
        hosts = round.hosts.len(),
        "Loaded round"
    );
    Ok(round)
}
