//! Version command implementation

use crate::error::Result;
use crate::paths::{CACHE_FORMAT_VERSION, DEFAULT_FRAMEWORK, DEFAULT_RUNTIME};

/// Run version command
pub fn run() -> Result<()> {
    println!("toolpack {}", env!("CARGO_PKG_VERSION"));
    println!("  Resolver cache format: {CACHE_FORMAT_VERSION}");
    println!("  Default target: {DEFAULT_FRAMEWORK}/{DEFAULT_RUNTIME}");
    Ok(())
}
