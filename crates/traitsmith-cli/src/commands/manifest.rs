// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generator options from `traitsmith.toml`.
//!
//! **DDD Context:** Configuration
//!
//! Only the `[generator]` table is read; other tables are ignored so the
//! file can carry settings for other tools. A missing file means defaults.

use camino::Utf8Path;
use miette::{Context, IntoDiagnostic, Result};
use serde::Deserialize;
use std::fs;
use tracing::debug;
use traitsmith_core::config::GeneratorConfig;

/// Name of the options file looked up next to the input.
pub const MANIFEST_NAME: &str = "traitsmith.toml";

/// The top-level structure parsed from `traitsmith.toml`.
#[derive(Debug, Default, Deserialize)]
struct Manifest {
    /// The `[generator]` section of the manifest.
    #[serde(default)]
    generator: GeneratorConfig,
}

/// Parse and validate a `traitsmith.toml` file.
pub fn parse_manifest(path: &Utf8Path) -> Result<GeneratorConfig> {
    let content = fs::read_to_string(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to read manifest '{path}'"))?;

    let manifest: Manifest = toml::from_str(&content)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to parse manifest '{path}'"))?;

    manifest
        .generator
        .validate()
        .into_diagnostic()
        .wrap_err_with(|| format!("Invalid [generator] options in '{path}'"))?;
    Ok(manifest.generator)
}

/// Resolves the options for an input file.
///
/// An explicit path must exist. Otherwise `traitsmith.toml` next to the
/// input is used when present.
pub fn load_config(input: &Utf8Path, explicit: Option<&Utf8Path>) -> Result<GeneratorConfig> {
    if let Some(path) = explicit {
        debug!(%path, "using explicit manifest");
        return parse_manifest(path);
    }
    let dir = input.parent().unwrap_or_else(|| Utf8Path::new("."));
    let manifest_path = dir.join(MANIFEST_NAME);
    if manifest_path
        .try_exists()
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to stat manifest '{manifest_path}'"))?
    {
        debug!(path = %manifest_path, "found manifest");
        parse_manifest(&manifest_path)
    } else {
        debug!("no traitsmith.toml found, using default options");
        Ok(GeneratorConfig::default())
    }
}
