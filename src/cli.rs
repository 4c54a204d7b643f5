//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::paths::{CACHE_ENV, DEFAULT_FRAMEWORK, DEFAULT_RUNTIME, FEED_ENV, STORE_ENV};

/// Toolpack - tool package manager
///
/// Install tool packages into a local store and restore the tools a project
/// pins in its manifest.
#[derive(Parser, Debug)]
#[command(
    name = "toolpack",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Tool package manager with transactional installs and a resolver cache",
    long_about = "Toolpack installs tool packages into a local package store, resolves the \
                  commands each package exposes and restores every tool pinned in a project's \
                  toolpack-tools.json manifest.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  toolpack install demo.tool --version 1.0.0\n    \
                  toolpack list\n    \
                  toolpack restore\n    \
                  toolpack resolve demo.tool --version 1.0.0\n    \
                  toolpack uninstall demo.tool --version 1.0.0"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug)]
pub struct GlobalArgs {
    /// Package store directory
    #[arg(long, global = true, env = STORE_ENV, value_name = "DIR")]
    pub store: Option<PathBuf>,

    /// Resolver cache directory
    #[arg(long, global = true, env = CACHE_ENV, value_name = "DIR")]
    pub cache: Option<PathBuf>,

    /// Local package feed directory
    #[arg(long, global = true, env = FEED_ENV, value_name = "DIR")]
    pub feed: Option<PathBuf>,

    /// Target framework to restore
    #[arg(long, global = true, default_value = DEFAULT_FRAMEWORK)]
    pub framework: String,

    /// Runtime identifier to restore
    #[arg(long, global = true, default_value = DEFAULT_RUNTIME)]
    pub runtime: String,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install a tool package into the store
    Install(InstallArgs),

    /// Remove a tool package version from the store
    Uninstall(UninstallArgs),

    /// List installed tool packages
    List(ListArgs),

    /// Restore every tool in a manifest
    Restore(RestoreArgs),

    /// Show the commands of an installed package
    Resolve(ResolveArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install the latest version:\n    toolpack install demo.tool\n\n\
                   Install a specific version:\n    toolpack install demo.tool --version 1.2.3\n\n\
                   Install for another runtime:\n    toolpack install demo.tool --runtime linux-x64\n\n\
                   Install from an extra feed:\n    toolpack install demo.tool --add-source ./packages")]
pub struct InstallArgs {
    /// Package id
    pub id: String,

    /// Package version (defaults to the latest in the feed)
    #[arg(long)]
    pub version: Option<String>,

    /// Extra feed searched before the default one (repeatable)
    #[arg(long, value_name = "DIR")]
    pub add_source: Vec<PathBuf>,
}

/// Arguments for the uninstall command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Uninstall a version:\n    toolpack uninstall demo.tool --version 1.2.3")]
pub struct UninstallArgs {
    /// Package id
    pub id: String,

    /// Installed version to remove
    #[arg(long)]
    pub version: String,
}

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List all installed packages:\n    toolpack list\n\n\
                  List versions of one package:\n    toolpack list demo.tool")]
pub struct ListArgs {
    /// Only list this package
    pub id: Option<String>,
}

/// Arguments for the restore command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Restore the nearest manifest:\n    toolpack restore\n\n\
                  Restore a specific manifest:\n    toolpack restore path/to/toolpack-tools.json")]
pub struct RestoreArgs {
    /// Manifest path (defaults to the nearest toolpack-tools.json)
    pub manifest: Option<PathBuf>,

    /// Extra feed searched before the default one for every tool (repeatable)
    #[arg(long, value_name = "DIR")]
    pub add_source: Vec<PathBuf>,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show commands of an installed package:\n    toolpack resolve demo.tool --version 1.2.3")]
pub struct ResolveArgs {
    /// Package id
    pub id: String,

    /// Installed version
    #[arg(long)]
    pub version: String,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    toolpack completions --shell bash > ~/.bash_completion.d/toolpack\n\n\
                  Generate zsh completions:\n    toolpack completions --shell zsh > ~/.zfunc/_toolpack\n\n\
                  Generate fish completions:\n    toolpack completions --shell fish > ~/.config/fish/completions/toolpack.fish")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_install() {
        let cli = Cli::try_parse_from(["toolpack", "install", "demo.tool"]).unwrap();
        match cli.command {
            Commands::Install(args) => {
                assert_eq!(args.id, "demo.tool");
                assert_eq!(args.version, None);
            }
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_install_with_version() {
        let cli =
            Cli::try_parse_from(["toolpack", "install", "demo.tool", "--version", "1.2.3"]).unwrap();
        match cli.command {
            Commands::Install(args) => assert_eq!(args.version.as_deref(), Some("1.2.3")),
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_parsing_uninstall_requires_version() {
        assert!(Cli::try_parse_from(["toolpack", "uninstall", "demo.tool"]).is_err());

        let cli = Cli::try_parse_from(["toolpack", "uninstall", "demo.tool", "--version", "1.0.0"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Uninstall(_)));
    }

    #[test]
    fn test_cli_parsing_restore() {
        let cli = Cli::try_parse_from(["toolpack", "restore"]).unwrap();
        match cli.command {
            Commands::Restore(args) => {
                assert!(args.manifest.is_none());
                assert!(args.add_source.is_empty());
            }
            _ => panic!("Expected Restore command"),
        }
    }

    #[test]
    fn test_cli_parsing_add_source_repeats() {
        let cli = Cli::try_parse_from([
            "toolpack",
            "install",
            "demo.tool",
            "--add-source",
            "feed-a",
            "--add-source",
            "feed-b",
        ])
        .unwrap();
        match cli.command {
            Commands::Install(args) => assert_eq!(
                args.add_source,
                vec![PathBuf::from("feed-a"), PathBuf::from("feed-b")]
            ),
            _ => panic!("Expected Install command"),
        }
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "toolpack",
            "list",
            "--store",
            "/tmp/store",
            "--runtime",
            "linux-x64",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.global.store, Some(PathBuf::from("/tmp/store")));
        assert_eq!(cli.global.runtime, "linux-x64");
        assert_eq!(cli.global.framework, DEFAULT_FRAMEWORK);
        assert!(cli.global.verbose);
    }

    #[test]
    fn test_cli_parsing_completions() {
        let cli = Cli::try_parse_from(["toolpack", "completions", "--shell", "zsh"]).unwrap();
        match cli.command {
            Commands::Completions(args) => assert_eq!(args.shell, "zsh"),
            _ => panic!("Expected Completions command"),
        }
    }
}
