//! Shell completion generation.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{CommandFactory, ValueEnum};
use clap_complete::{generate, Shell};

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
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

/// Write the completion script for `C` to `out`.
pub fn generate_completions<C: CommandFactory>(
    shell: CompletionShell,
    bin_name: &str,
    out: &mut dyn Write,
) {
    let mut cmd = C::command();
    let shell_type: Shell = shell.into();
    generate(shell_type, &mut cmd, bin_name, out);
}

/// Get the completions directory for a shell.
pub fn get_completions_dir(shell: CompletionShell) -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    let data_dir = dirs::data_local_dir().unwrap_or_else(|| home.join(".local/share"));

    match shell {
        CompletionShell::Bash => Some(data_dir.join("bash-completion/completions")),
        CompletionShell::Zsh => Some(home.join(".zfunc")),
        CompletionShell::Fish => Some(home.join(".config/fish/completions")),
        CompletionShell::PowerShell => dirs::config_dir().map(|c| c.join("powershell")),
        CompletionShell::Elvish => Some(home.join(".elvish/lib")),
    }
}

/// Get the completion file name for a shell.
pub fn get_completion_filename(shell: CompletionShell, bin_name: &str) -> String {
    match shell {
        CompletionShell::Bash => bin_name.to_string(),
        CompletionShell::Zsh => format!("_{}", bin_name),
        CompletionShell::Fish => format!("{}.fish", bin_name),
        CompletionShell::PowerShell => format!("_{}.ps1", bin_name),
        CompletionShell::Elvish => format!("{}.elv", bin_name),
    }
}

/// Write the completion script into `dir`, creating it if needed.
pub fn install_completions<C: CommandFactory>(
    shell: CompletionShell,
    bin_name: &str,
    dir: &Path,
) -> anyhow::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;

    let completion_file = dir.join(get_completion_filename(shell, bin_name));
    let mut file = std::fs::File::create(&completion_file)?;
    generate_completions::<C>(shell, bin_name, &mut file);
    file.flush()?;

    tracing::debug!(path = %completion_file.display(), ?shell, "Completions written");
    Ok(completion_file)
}

/// The requested shell, or the one named by `shell_env` (usually `$SHELL`).
pub fn resolve_shell(
    requested: Option<CompletionShell>,
    shell_env: Option<&str>,
) -> Option<CompletionShell> {
    requested.or_else(|| shell_env.and_then(shell_from_path))
}

fn shell_from_path(s: &str) -> Option<CompletionShell> {
    if s.contains("zsh") {
        Some(CompletionShell::Zsh)
    } else if s.contains("bash") {
        Some(CompletionShell::Bash)
    } else if s.contains("fish") {
        Some(CompletionShell::Fish)
    } else if s.contains("pwsh") || s.contains("powershell") {
        Some(CompletionShell::PowerShell)
    } else if s.contains("elvish") {
        Some(CompletionShell::Elvish)
    } else {
        None
    }
}
