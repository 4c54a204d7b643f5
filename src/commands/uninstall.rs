//! Uninstall command implementation

use console::Style;

use super::helpers::Context;
use crate::cli::UninstallArgs;
use crate::domain::{PackageId, PackageVersion};
use crate::error::{Result, ToolpackError};

/// Run uninstall command
pub fn run(ctx: &Context, args: UninstallArgs) -> Result<()> {
    let id = PackageId::new(args.id)?;
    let version = PackageVersion::concrete(&args.version)?;

    let package = ctx
        .store
        .try_get_package(&id, &version)?
        .ok_or_else(|| ToolpackError::PackageNotFound {
            id: id.to_string(),
            version: version.to_string(),
        })?;

    package.uninstall()?;

    println!(
        "{} {} version {}",
        Style::new().green().bold().apply_to("Uninstalled"),
        Style::new().bold().apply_to(&id),
        version
    );
    Ok(())
}
