//! Shell completion generation

use std::io::Write;

use clap::Command;
use clap_complete::{generate, Shell};

/// Shell type for completions generation
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum CompletionShell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    #[value(name = "powershell")]
    PowerShell,
    /// Elvish shell
    Elvish,
}

impl From<CompletionShell> for Shell {
    fn from(shell: CompletionShell) -> Self {
        match shell {
            CompletionShell::Bash => Shell::Bash,
            CompletionShell::Zsh => Shell::Zsh,
            CompletionShell::Fish => Shell::Fish,
            CompletionShell::PowerShell => Shell::PowerShell,
            CompletionShell::Elvish => Shell::Elvish,
        }
    }
}

/// Generate shell completions and write to the given writer
pub fn generate_completions<W: Write>(shell: Shell, cmd: &mut Command, buf: &mut W) {
    let name = cmd.get_name().to_string();
    generate(shell, cmd, name, buf);
}

/// Generate completions and print to stdout
pub fn print_completions(shell: Shell, cmd: &mut Command) {
    generate_completions(shell, cmd, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command() -> Command {
        Command::new("devguard")
            .subcommand(Command::new("list"))
            .subcommand(Command::new("add"))
    }

    #[test]
    fn bash_completions_mention_subcommands() {
        let mut buf = Vec::new();
        generate_completions(Shell::Bash, &mut command(), &mut buf);
        let script = String::from_utf8(buf).unwrap();
        assert!(script.contains("devguard"));
        assert!(script.contains("list"));
    }

    #[test]
    fn shell_mapping() {
        assert_eq!(Shell::from(CompletionShell::Zsh), Shell::Zsh);
        assert_eq!(Shell::from(CompletionShell::PowerShell), Shell::PowerShell);
    }
}
