use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use raybot_cli::completions::CompletionShell;
use raybot_cli::edit::Assignment;
use raybot_cli::types::ConfigDomain;

#[derive(Parser)]
#[command(name = "raybot")]
#[command(version)]
#[command(about = "Read and change the configuration of a raybot robot", long_about = None)]
pub(crate) struct Cli {
    /// Base URL of the robot's API. Can also be set via RAYBOT_API_URL env var.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Read and replace robot configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Show the settings this CLI resolved
    Settings,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for (detected from $SHELL if omitted)
        #[arg(value_enum)]
        shell: Option<CompletionShell>,

        /// Write into the shell's completions directory instead of stdout
        #[arg(long)]
        install: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// List configuration domains and their API paths
    Domains,

    /// Print one domain's configuration, or all of them
    Get {
        /// Domain to read (log, hardware, cloud, http, wifi, command)
        domain: Option<ConfigDomain>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },

    /// Replace a domain's configuration with the contents of a file
    Set {
        /// Domain to replace
        domain: ConfigDomain,

        /// JSON or TOML file holding the full record
        #[arg(short, long)]
        file: PathBuf,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Change individual fields of a domain's configuration
    Edit {
        /// Domain to change
        domain: ConfigDomain,

        /// Field assignments, e.g. sta.ssid=warehouse sta.enable=true
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<Assignment>,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Json,
    Toml,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_edit_with_assignments() {
        let cli = Cli::try_parse_from([
            "raybot",
            "-vv",
            "config",
            "edit",
            "wifi",
            "sta.ssid=warehouse",
            "sta.enable=true",
            "--yes",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Config {
                command:
                    ConfigCommands::Edit {
                        domain,
                        assignments,
                        yes,
                    },
            } => {
                assert_eq!(domain, ConfigDomain::Wifi);
                assert_eq!(assignments.len(), 2);
                assert!(yes);
            }
            _ => panic!("expected config edit"),
        }
    }

    #[test]
    fn rejects_unknown_domain() {
        assert!(Cli::try_parse_from(["raybot", "config", "get", "battery"]).is_err());
    }

    #[test]
    fn edit_requires_an_assignment() {
        assert!(Cli::try_parse_from(["raybot", "config", "edit", "log"]).is_err());
    }

    #[test]
    fn completions_shell_is_optional() {
        let cli = Cli::try_parse_from(["raybot", "completions"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: None,
                install: false
            }
        ));

        let cli = Cli::try_parse_from(["raybot", "completions", "zsh", "--install"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Completions {
                shell: Some(CompletionShell::Zsh),
                install: true
            }
        ));
    }

    #[test]
    fn global_api_url_after_subcommand() {
        let cli = Cli::try_parse_from([
            "raybot",
            "config",
            "get",
            "--api-url",
            "http://robot.local:3000/api/v1",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://robot.local:3000/api/v1"));
    }
}
