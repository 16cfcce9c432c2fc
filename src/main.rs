//! Pomonoise - a Pomodoro timer CLI with looping ambient noise
//!
//! This tool helps you stay focused using the Pomodoro Technique:
//! - 25 minutes of focused work, 5 minutes of rest, alternating
//! - A looping ambient sound (rain, cafe, birdsong, waves) while running
//! - A background daemon that keeps counting and playing when the
//!   terminal is elsewhere

use anyhow::Result;
use clap::{CommandFactory, Parser};

use pomonoise::cli::{Cli, Commands, Display, IpcClient, ModeArg};
use pomonoise::daemon;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse();

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    // Set verbose logging if requested
    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Start(args)) => {
            let client = IpcClient::new()?;
            let response = client.start(args.sound).await?;
            Display::show_start_success(&response);
        }
        Some(Commands::Stop) => {
            let client = IpcClient::new()?;
            let response = client.stop().await?;
            Display::show_stop_success(&response);
        }
        Some(Commands::Work) => {
            let client = IpcClient::new()?;
            let response = client.switch_to_work().await?;
            Display::show_mode_success(&response);
        }
        Some(Commands::Rest) => {
            let client = IpcClient::new()?;
            let response = client.switch_to_rest().await?;
            Display::show_mode_success(&response);
        }
        Some(Commands::Duration(args)) => {
            let client = IpcClient::new()?;
            let response = match args.mode {
                None => client.update_duration(args.minutes).await?,
                Some(ModeArg::Work) => client.update_work_duration(args.minutes).await?,
                Some(ModeArg::Rest) => client.update_rest_duration(args.minutes).await?,
            };
            Display::show_duration_success(&response);
        }
        Some(Commands::Sound { name }) => {
            let client = IpcClient::new()?;
            let response = client.update_sound(name).await?;
            Display::show_sound_success(&response);
        }
        Some(Commands::Sounds) => {
            // Local command; the catalog is compiled in.
            Display::show_catalog();
        }
        Some(Commands::Infinite) => {
            let client = IpcClient::new()?;
            let response = client.toggle_infinite().await?;
            Display::show_infinite_success(&response);
        }
        Some(Commands::Status) => {
            let client = IpcClient::new()?;
            let response = client.status().await?;
            Display::show_status(&response);
        }
        Some(Commands::Daemon) => {
            let socket_path = daemon::default_socket_path()?;
            daemon::run(&socket_path).await?;
        }
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
        }
        None => {
            // No command provided, show help
            Cli::command().print_help()?;
        }
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["pomonoise"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_status() {
        let cli = Cli::parse_from(["pomonoise", "status"]);
        assert!(matches!(cli.command, Some(Commands::Status)));
    }

    #[test]
    fn test_cli_parse_start_with_sound() {
        let cli = Cli::parse_from(["pomonoise", "start", "--sound", "forest"]);
        match cli.command {
            Some(Commands::Start(args)) => {
                assert_eq!(args.sound, Some("forest".to_string()));
            }
            _ => panic!("Expected Start command"),
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["pomonoise", "--verbose", "status"]);
        assert!(cli.verbose);
    }
}
