//! Restore command implementation
//!
//! Restores every tool in the project manifest and reports each entry. The
//! command fails when any entry failed or command names collided.

use std::path::Path;

use console::Style;

use super::helpers::{Context, current_dir};
use crate::cli::RestoreArgs;
use crate::config::manifest;
use crate::error::Result;
use crate::installer::PackageInstaller;
use crate::restore::{EntryState, RestoreOrchestrator, RestoreReport, StoreEntryInstaller};

/// Run restore command
pub fn run(ctx: &Context, args: RestoreArgs) -> Result<()> {
    let manifest_path = match args.manifest {
        Some(path) => path,
        None => manifest::discover(&current_dir()?)?,
    };
    let entries = manifest::load(&manifest_path)?;

    if entries.is_empty() {
        println!("No tools to restore in {}", manifest_path.display());
        return Ok(());
    }

    let installer = PackageInstaller::new(ctx.store.clone());
    let restorer = ctx.restorer();
    let entry_installer =
        StoreEntryInstaller::new(&installer, &restorer, &ctx.framework, &ctx.runtime)
            .with_additional_feeds(args.add_source);

    let report = RestoreOrchestrator::new(&entry_installer, &ctx.cache, ctx.store.root())
        .restore(&entries);

    print_report(&manifest_path, &report);
    report.into_result()
}

fn print_report(manifest_path: &Path, report: &RestoreReport) {
    println!("Restoring tools from {}", manifest_path.display());
    println!();

    for outcome in &report.outcomes {
        let marker = if outcome.state == EntryState::Validated {
            Style::new().green().bold().apply_to("✓")
        } else {
            Style::new().red().bold().apply_to("✗")
        };
        let kind = outcome
            .error
            .as_ref()
            .map(|e| format!(" [{}]", e.kind()))
            .unwrap_or_default();

        println!(
            "  {} {} {} ({}){}",
            marker,
            Style::new().bold().apply_to(&outcome.id),
            outcome.version,
            outcome.state,
            kind
        );
    }

    if let Some(collision) = &report.collision {
        println!();
        println!("  {} {}", Style::new().red().bold().apply_to("✗"), collision);
    }
}
