//! Resolve command implementation
//!
//! Looks a package's commands up in the resolver cache first and only reads
//! the installed package on a miss, caching what it finds.

use console::Style;
use tracing::debug;

use super::helpers::{Context, print_commands};
use crate::cache::CacheKey;
use crate::cli::ResolveArgs;
use crate::domain::{PackageId, PackageVersion, RestoredCommand};
use crate::error::{Result, ToolpackError};

/// Run resolve command
pub fn run(ctx: &Context, args: ResolveArgs) -> Result<()> {
    let id = PackageId::new(args.id)?;
    let version = PackageVersion::concrete(&args.version)?;

    let commands = resolve(ctx, &id, &version)?;

    println!(
        "{} version {}",
        Style::new().bold().yellow().apply_to(&id),
        version
    );
    print_commands(&commands);
    Ok(())
}

fn resolve(ctx: &Context, id: &PackageId, version: &PackageVersion) -> Result<Vec<RestoredCommand>> {
    let key = CacheKey::new(id.clone(), version.clone(), &ctx.framework, &ctx.runtime);
    let cached = ctx.cache.load(&key, ctx.store.root());
    if !cached.is_empty() {
        return Ok(cached);
    }

    debug!("Resolving {} {} from the store", id, version);
    let mut package =
        ctx.store
            .try_get_package(id, version)?
            .ok_or_else(|| ToolpackError::PackageNotFound {
                id: id.to_string(),
                version: version.to_string(),
            })?;

    let commands = package.commands()?.to_vec();
    ctx.cache.save(&key, &commands, ctx.store.root())?;
    Ok(commands)
}
