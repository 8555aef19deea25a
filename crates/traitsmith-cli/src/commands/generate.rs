// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Generate Java sources for one round.

use camino::{Utf8Path, Utf8PathBuf};
use miette::{Context, IntoDiagnostic, Result};
use std::fs;
use tracing::{debug, info, instrument};
use traitsmith_core::diagnostics::Diagnostics;
use traitsmith_core::round::process_round;

use super::{load_round, manifest};
use crate::diagnostic::report_all;
use crate::filer::DirectoryFiler;

/// Directory created next to the input when `--out` is not given.
const DEFAULT_OUT_DIR: &str = "generated";

/// Generate every artifact of the round described by `input`.
///
/// Unrelated artifacts are still written when some declarations fail; the
/// command fails afterwards if any error was reported.
#[instrument(skip_all, fields(input = %input))]
pub fn generate(
    input: &Utf8Path,
    out: Option<&Utf8Path>,
    config: Option<&Utf8Path>,
) -> Result<()> {
    info!("Starting generation");
    let round = load_round(input)?;
    let config = manifest::load_config(input, config)?;

    let out_dir = out.map_or_else(|| default_out_dir(input), Utf8Path::to_path_buf);
    debug!("Creating output directory: {}", out_dir);
    fs::create_dir_all(&out_dir)
        .into_diagnostic()
        .wrap_err_with(|| format!("Failed to create output directory '{out_dir}'"))?;

    let mut filer = DirectoryFiler::new(out_dir.clone());
    let mut diagnostics = Diagnostics::new();
    let summary = process_round(&round, &config, &mut filer, &mut diagnostics);
    report_all(diagnostics.iter());

    println!(
        "Generated {} file(s) into {out_dir}",
        filer.written().len()
    );
    if !summary.is_complete() {
        println!(
            "Skipped {} trait(s) and {} host(s)",
            summary.skipped_traits, summary.skipped_hosts
        );
    }

    if diagnostics.has_errors() {
        miette::bail!("Generation reported {} error(s)", diagnostics.error_count());
    }
    info!(files = summary.generated.len(), "Generation completed successfully");
    Ok(())
}

fn default_out_dir(input: &Utf8Path) -> Utf8PathBuf {
    input
        .parent()
        .unwrap_or_else(|| Utf8Path::new("."))
        .join(DEFAULT_OUT_DIR)
}
