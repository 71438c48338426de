use dialoguer::console::style;
use raybot_cli::completions::{self, CompletionShell};

use crate::args::Cli;

const BIN_NAME: &str = "raybot";

pub(crate) fn cmd_completions(shell: Option<CompletionShell>, install: bool) -> anyhow::Result<()> {
    let shell = completions::resolve_shell(shell, std::env::var("SHELL").ok().as_deref())
        .ok_or_else(|| anyhow::anyhow!("Could not detect your shell. Pass one explicitly."))?;

    if !install {
        completions::generate_completions::<Cli>(shell, BIN_NAME, &mut std::io::stdout());
        return Ok(());
    }

    let dir = completions::get_completions_dir(shell)
        .ok_or_else(|| anyhow::anyhow!("Could not determine completions directory"))?;
    let path = completions::install_completions::<Cli>(shell, BIN_NAME, &dir)?;

    eprintln!(
        "{} Completions written to {}",
        style("✓").green(),
        path.display()
    );
    if shell == CompletionShell::Zsh {
        eprintln!(
            "{} Add `fpath=(~/.zfunc $fpath)` before `compinit` in ~/.zshrc",
            style("→").cyan()
        );
    }
    Ok(())
}
