//! Application orchestration and command routing.
//!
//! Handles command-line argument parsing and delegates to appropriate command handlers.

use std::io;
use std::path::PathBuf;
use std::process;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};

use crate::commands;
use crate::logging;

/// A terminal dual-channel audio recorder with merged speech-to-text transcripts
#[derive(Parser)]
#[command(name = "tandem")]
#[command(version)]
#[command(about = "Record two audio inputs at once and merge their transcripts")]
#[command(
    long_about = "Record two audio inputs at once (e.g. a microphone and a system\n\
loopback device), transcribe each channel with a hosted Whisper model, and\n\
interleave both transcripts chronologically into one source-tagged file.\n\n\
DEFAULT COMMAND:\n    If no command is specified, 'record' is used by default.\n\n\
EXAMPLES:\n    # Record both configured channels until Enter is pressed\n    $ tandem\n    \n    # Record into a specific folder\n    $ tandem record -f ~/meetings\n    \n    # Transcribe an existing recording as channel A\n    $ tandem transcribe channel_a_audio.wav --channel a\n    \n    # Re-merge two transcripts\n    $ tandem merge channel_a_transcript.txt channel_b_transcript.txt\n    \n    # See which device IDs are available\n    $ tandem list-devices"
)]
#[command(
    after_help = "CONFIGURATION:\n    Config file:        ~/.config/tandem/tandem.toml\n    Logs:               ~/.local/state/tandem/tandem.log.*"
)]
struct Cli {
    /// Save this session under DIR instead of the configured save folder
    /// (record default command)
    #[arg(short, long, value_name = "DIR", global = true)]
    folder: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record both channels and produce a merged transcript (default)
    ///
    /// Press Space to pause/resume, Enter (or 's') to stop and transcribe,
    /// Escape/'q' to cancel. SIGUSR1 stops and transcribes externally.
    #[command(visible_alias = "r")]
    Record,

    /// Transcribe a pre-recorded audio file as one channel
    ///
    /// Writes the per-channel transcript file next to the input unless
    /// --output is given.
    #[command(visible_alias = "t")]
    Transcribe {
        /// Path to the encoded audio file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Which channel label to use: 'a' or 'b'
        #[arg(short, long, value_name = "CHANNEL", default_value = "a")]
        channel: String,

        /// Write the transcript to this path
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// Merge two per-channel transcript files chronologically
    ///
    /// Either input may be missing or empty; it contributes zero lines.
    /// At equal timestamps, channel A lines precede channel B lines.
    #[command(visible_alias = "m")]
    Merge {
        /// Channel A transcript file
        #[arg(value_name = "FILE_A")]
        file_a: PathBuf,

        /// Channel B transcript file
        #[arg(value_name = "FILE_B")]
        file_b: PathBuf,

        /// Write the combined transcript to this path
        #[arg(short, long, value_name = "OUTPUT")]
        output: Option<String>,
    },

    /// List available audio input devices
    ///
    /// Shows device IDs, names, and configurations to help configure
    /// the channel devices in tandem.toml.
    #[command(name = "list-devices")]
    ListDevices,

    /// Open configuration file in your preferred editor
    ///
    /// Edit device selection, save folder, and transcription settings.
    /// Uses $EDITOR environment variable or falls back to nano/vim.
    #[command(visible_alias = "c")]
    Config,

    /// Show recent log entries from the application
    ///
    /// Display the last 50 lines of the most recent log file.
    /// Useful for troubleshooting issues.
    Logs,

    /// Generate shell completion script
    ///
    /// Generate completion script for your shell. Save the output to your
    /// shell's completion directory or source it directly.
    Completions {
        /// The shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Runs the main application based on command-line arguments.
///
/// # Errors
/// - If logging initialization fails
/// - If command execution fails (configuration, recording, transcription, merge)
pub async fn run() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Handle commands that don't need logging or config setup
    match &cli.command {
        Some(Commands::Completions { shell }) => {
            generate(*shell, &mut Cli::command(), "tandem", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::ListDevices) => {
            return match commands::handle_list_devices() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        Some(Commands::Logs) => {
            return match commands::handle_logs() {
                Ok(()) => Ok(()),
                Err(e) => {
                    eprintln!("Error: {e}");
                    process::exit(1);
                }
            };
        }
        _ => {}
    }

    // Initialize logging for all other commands
    logging::init_logging()?;

    // Route to appropriate command handler
    match cli.command {
        None | Some(Commands::Record) => {
            // Default command is record; --folder is global so it applies
            // with or without the explicit subcommand
            commands::handle_record(cli.folder).await?;
        }
        Some(Commands::Transcribe {
            file,
            channel,
            output,
        }) => {
            commands::handle_transcribe(file, channel, output).await?;
        }
        Some(Commands::Merge {
            file_a,
            file_b,
            output,
        }) => {
            commands::handle_merge(file_a, file_b, output)?;
        }
        Some(Commands::Config) => {
            commands::handle_config()?;
        }
        Some(Commands::Completions { .. }) | Some(Commands::ListDevices) | Some(Commands::Logs) => {
            unreachable!("These commands are handled earlier")
        }
    }

    Ok(())
}
