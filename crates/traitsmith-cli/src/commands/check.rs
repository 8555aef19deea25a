// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Check a round without writing any files.

use camino::Utf8Path;
use miette::Result;
use tracing::instrument;
use traitsmith_core::diagnostics::Diagnostics;
use traitsmith_core::filer::MemoryFiler;
use traitsmith_core::round::process_round;

use super::{load_round, manifest};
use crate::diagnostic::report_all;

/// Resolve and generate everything into memory, reporting diagnostics.
#[instrument(skip_all, fields(input = %input))]
pub fn check(input: &Utf8Path, config: Option<&Utf8Path>) -> Result<()> {
    let round = load_round(input)?;
    let config = manifest::load_config(input, config)?;

    let mut filer = MemoryFiler::new();
    let mut diagnostics = Diagnostics::new();
    let summary = process_round(&round, &config, &mut filer, &mut diagnostics);
    report_all(diagnostics.iter());

    println!(
        "Checked {} trait(s) and {} host(s): {} file(s) would be generated",
        round.traits.len(),
        round.hosts.len(),
        summary.generated.len()
    );
    if diagnostics.has_errors() {
        miette::bail!("Check reported {} error(s)", diagnostics.error_count());
    }
    Ok(())
}
