//! Command definitions for the Pomonoise CLI.
//!
//! Uses clap derive macro for argument parsing.

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::sound::{SoundId, CATALOG};

// ============================================================================
// CLI Structure
// ============================================================================

/// Pomonoise - a Pomodoro timer with looping ambient noise
#[derive(Parser, Debug)]
#[command(
    name = "pomonoise",
    version,
    about = "環境音付きポモドーロタイマーCLI",
    long_about = "作業と休憩を自動で交互に刻むポモドーロタイマー。\n\
                  カウントダウン中は環境音をループ再生し、バックグラウンドの\n\
                  デーモンが画面を閉じても計測と再生を続けます。",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start the countdown in the selected mode
    Start(StartArgs),

    /// Stop the countdown and reset the current interval
    Stop,

    /// Select the work mode (stopped only)
    Work,

    /// Select the rest mode (stopped only)
    Rest,

    /// Set the interval duration in minutes
    Duration(DurationArgs),

    /// Select the ambient track
    Sound {
        /// Catalog name of the track (e.g. "rain")
        #[arg(value_parser = validate_sound_name)]
        name: String,
    },

    /// List the ambient track catalog
    Sounds,

    /// Toggle the infinite-cycle flag
    Infinite,

    /// Show current timer status
    Status,

    /// Run as daemon (background service)
    #[command(hide = true)]
    Daemon,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Command Arguments
// ============================================================================

/// Arguments for the start command
#[derive(Args, Debug, Clone, Default)]
pub struct StartArgs {
    /// Ambient track to select before starting
    #[arg(short, long, value_parser = validate_sound_name)]
    pub sound: Option<String>,
}

/// Arguments for the duration command
#[derive(Args, Debug, Clone)]
pub struct DurationArgs {
    /// New duration in minutes (1-600)
    #[arg(value_parser = clap::value_parser!(u32).range(1..=600))]
    pub minutes: u32,

    /// Target a named mode instead of the currently selected one
    #[arg(short, long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// Mode selector for the duration command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Work interval
    Work,
    /// Rest interval
    Rest,
}

// ============================================================================
// Validation Functions
// ============================================================================

/// Validates an ambient track name against the catalog.
fn validate_sound_name(s: &str) -> Result<String, String> {
    if SoundId::from_name(s).is_some() {
        Ok(s.to_string())
    } else {
        let names: Vec<&str> = CATALOG.iter().map(|entry| entry.id.name()).collect();
        Err(format!(
            "不明な音声です。候補: {}",
            names.join(", ")
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
