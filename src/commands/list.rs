//! List command implementation
//!
//! Lists installed packages with their versions, straight from the store
//! directory layout.

use console::Style;

use super::helpers::Context;
use crate::cli::ListArgs;
use crate::domain::{PackageId, PackageVersion};
use crate::error::Result;

/// Run list command
pub fn run(ctx: &Context, args: ListArgs) -> Result<()> {
    let packages = match args.id {
        Some(id) => {
            let id = PackageId::new(id)?;
            let versions = ctx.store.enumerate_versions(&id)?;
            if versions.is_empty() {
                Vec::new()
            } else {
                vec![(id, versions)]
            }
        }
        None => ctx.store.installed_packages()?,
    };

    if packages.is_empty() {
        println!("No tool packages installed.");
        return Ok(());
    }

    println!("Installed tool packages ({}):", packages.len());
    println!();
    for (id, versions) in &packages {
        println!(
            "  {} {}",
            Style::new().bold().yellow().apply_to(id),
            format_versions(versions)
        );
    }

    Ok(())
}

fn format_versions(versions: &[PackageVersion]) -> String {
    versions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
