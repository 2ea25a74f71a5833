use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "stint-cli", version, about = "Stint CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Host the session: drive the tick cadences, accept commands on stdin
    Run,
    /// Print the current session state as JSON
    Status,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Run => commands::run::run(),
        Commands::Status => commands::status::run(),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_top_level_commands() {
        assert!(matches!(
            Cli::parse_from(["stint-cli", "run"]).command,
            Commands::Run
        ));
        assert!(matches!(
            Cli::parse_from(["stint-cli", "status"]).command,
            Commands::Status
        ));
        assert!(matches!(
            Cli::parse_from(["stint-cli", "config", "set", "limit.daily_secs", "7200"]).command,
            Commands::Config { .. }
        ));
    }
}
