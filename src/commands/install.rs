//! Install command implementation
//!
//! Restores one package from the feed into the store and records its
//! commands in the resolver cache.

use console::Style;
use tracing::warn;

use super::helpers::{Context, print_commands};
use crate::cache::CacheKey;
use crate::cli::InstallArgs;
use crate::domain::{PackageId, PackageVersion};
use crate::error::Result;
use crate::installer::PackageInstaller;
use crate::restorer::RestoreRequest;

/// Run install command
pub fn run(ctx: &Context, args: InstallArgs) -> Result<()> {
    let id = PackageId::new(args.id)?;
    let version = match args.version.as_deref() {
        Some(v) => PackageVersion::parse(v)?,
        None => PackageVersion::Floating,
    };

    let installer = PackageInstaller::new(ctx.store.clone());
    let request = RestoreRequest::new(id, version, &ctx.framework, &ctx.runtime)
        .with_additional_feeds(args.add_source);
    let mut package = installer.install_with_restorer(&request, &ctx.restorer())?;

    let commands = package.commands()?.to_vec();
    let key = CacheKey::new(
        package.id().clone(),
        package.version().clone(),
        &ctx.framework,
        &ctx.runtime,
    );
    if let Err(e) = ctx.cache.save(&key, &commands, ctx.store.root()) {
        warn!("Failed to cache commands for {}: {}", package.id(), e);
    }

    println!(
        "{} {} version {} {}",
        Style::new().green().bold().apply_to("Installed"),
        Style::new().bold().apply_to(package.id()),
        package.version(),
        Style::new()
            .dim()
            .apply_to(format!("({}/{})", package.framework(), package.runtime()))
    );
    print_commands(&commands);

    Ok(())
}
