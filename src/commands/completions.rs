//! Shell completions command

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use crate::cli::{Cli, CompletionsArgs};
use crate::error::{Result, ToolpackError};

/// Generate shell completions to stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    let shell = parse_shell(&args.shell)?;
    write_completions(shell, &mut std::io::stdout().lock());
    Ok(())
}

fn parse_shell(name: &str) -> Result<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Ok(Shell::Bash),
        "elvish" => Ok(Shell::Elvish),
        "fish" => Ok(Shell::Fish),
        "powershell" | "pwsh" => Ok(Shell::PowerShell),
        "zsh" => Ok(Shell::Zsh),
        _ => Err(ToolpackError::UnsupportedShell {
            shell: name.to_string(),
        }),
    }
}

fn write_completions(shell: Shell, out: &mut impl Write) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "toolpack", out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_supported_shell_generates_script() {
        for name in ["bash", "elvish", "fish", "powershell", "pwsh", "zsh"] {
            let shell = parse_shell(name).unwrap();
            let mut out = Vec::new();
            write_completions(shell, &mut out);
            assert!(
                String::from_utf8_lossy(&out).contains("toolpack"),
                "{name} completions should mention the binary"
            );
        }
    }

    #[test]
    fn test_shell_name_ignores_case() {
        assert_eq!(parse_shell("BASH").unwrap(), Shell::Bash);
        assert_eq!(parse_shell("Zsh").unwrap(), Shell::Zsh);
    }

    #[test]
    fn test_unknown_shell_is_error() {
        let err = parse_shell("tcsh").unwrap_err();
        assert!(err.to_string().contains("tcsh"));
    }
}
