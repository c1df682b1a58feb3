//! Dual-channel recording session command.
//!
//! Starts both capture workers, runs the interactive control loop (pause,
//! stop, cancel) with a live status line, and on stop drives the finalize
//! chain: encode both channels, transcribe both files, merge the two
//! transcripts. Supports an external stop trigger via SIGUSR1.

use std::io::{stdout, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType};

use crate::config::TandemConfig;
use crate::session::{self, format_elapsed, FinalizeReport, RecordingSession, SessionPaths};
use crate::transcription::{TranscriptionConfig, TranscriptionModel};

/// User input command during recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordingCommand {
    /// Keep recording (no relevant key pressed)
    Continue,
    /// Stop and run the finalize chain (Enter or 's', or SIGUSR1)
    Stop,
    /// Stop and discard everything (Escape, 'q', or Ctrl+C)
    Cancel,
    /// Pause/resume recording (Space key)
    TogglePause,
}

/// Handles a full dual-channel recording session.
///
/// # Errors
/// - If the configuration cannot be loaded or names an unknown model
/// - If the session cannot start (`InvalidConfiguration`)
/// - If terminal raw mode cannot be entered
pub async fn handle_record(folder_override: Option<String>) -> Result<(), anyhow::Error> {
    tracing::info!("=== tandem recording session started ===");

    let config = TandemConfig::load().map_err(|e| {
        tracing::error!("Failed to load configuration: {e}");
        eprintln!("Configuration error: {e}");
        eprintln!("Check your ~/.config/tandem/tandem.toml file and try again.");
        anyhow!("Configuration error: {e}")
    })?;

    let model = TranscriptionModel::from_id(&config.transcription.model).ok_or_else(|| {
        let available = TranscriptionModel::available_ids().join(", ");
        eprintln!(
            "Unknown transcription model '{}'. Available models: {available}",
            config.transcription.model
        );
        anyhow!("Unknown transcription model '{}'", config.transcription.model)
    })?;
    let transcription_config =
        TranscriptionConfig::new(model, config.transcription.api_key.clone());

    let save_folder = folder_override.unwrap_or_else(|| config.output.save_folder.clone());
    let paths = SessionPaths::new(Path::new(&save_folder));

    tracing::info!(
        "Configuration loaded: channel_a={}, channel_b={}, block_size={}, model={}",
        config.audio.channel_a_device,
        config.audio.channel_b_device,
        config.audio.block_size,
        config.transcription.model
    );

    let mut recording_session = RecordingSession::new(
        config.audio.channel_a_device.clone(),
        config.audio.channel_b_device.clone(),
        config.audio.block_size,
    );

    if let Err(e) = recording_session.start() {
        tracing::error!("Failed to start recording: {e}");
        eprintln!("Recording error: {e}");
        eprintln!("Configure both channel devices in ~/.config/tandem/tandem.toml ('tandem list-devices' shows the options).");
        return Err(e.into());
    }

    // External stop trigger, same contract as pressing Enter
    let external_stop = Arc::new(AtomicBool::new(false));
    signal_hook::flag::register(signal_hook::consts::SIGUSR1, Arc::clone(&external_stop))
        .map_err(|e| anyhow!("Failed to register signal handler: {e}"))?;

    enable_raw_mode()?;
    let outcome = control_loop(&mut recording_session, &external_stop);
    disable_raw_mode()?;
    println!();

    let finalize_requested = match outcome {
        Ok(finalize_requested) => finalize_requested,
        Err(e) => {
            // Input handling broke; stop cleanly and keep what was captured
            tracing::error!("Input handling error, stopping session: {e}");
            true
        }
    };

    if !finalize_requested {
        recording_session.cancel()?;
        println!("Recording cancelled, nothing saved.");
        tracing::info!("=== tandem recording session cancelled ===");
        return Ok(());
    }

    let captured = recording_session.stop()?;
    println!(
        "Recorded {} of audio. Finalizing (encode, transcribe, merge)...",
        format_elapsed(captured.elapsed)
    );

    let report = session::controller::finalize(captured, &paths, &transcription_config).await;
    print_report(&report);

    tracing::info!("=== tandem recording session finished ===");
    Ok(())
}

/// Runs the interactive key loop until stop or cancel.
///
/// Returns true when the session should be finalized, false when it was
/// cancelled.
fn control_loop(
    recording_session: &mut RecordingSession,
    external_stop: &Arc<AtomicBool>,
) -> Result<bool, anyhow::Error> {
    loop {
        if external_stop.load(Ordering::Relaxed) {
            tracing::info!("Received SIGUSR1: stopping via external trigger");
            return Ok(true);
        }

        draw_status(recording_session)?;

        match poll_command()? {
            RecordingCommand::Continue => {}
            RecordingCommand::Stop => return Ok(true),
            RecordingCommand::Cancel => return Ok(false),
            RecordingCommand::TogglePause => {
                // NotRecording can't happen here; the loop only runs mid-session
                recording_session.toggle_pause()?;
            }
        }
    }
}

/// Polls the keyboard for up to one tick and maps the key to a command.
fn poll_command() -> Result<RecordingCommand, anyhow::Error> {
    if !event::poll(Duration::from_millis(50))? {
        return Ok(RecordingCommand::Continue);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(RecordingCommand::Continue);
        }

        let command = match key.code {
            KeyCode::Enter | KeyCode::Char('s') => RecordingCommand::Stop,
            KeyCode::Esc | KeyCode::Char('q') => RecordingCommand::Cancel,
            KeyCode::Char(' ') => RecordingCommand::TogglePause,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                RecordingCommand::Cancel
            }
            _ => RecordingCommand::Continue,
        };
        return Ok(command);
    }

    Ok(RecordingCommand::Continue)
}

/// Redraws the single status line with state and elapsed time.
fn draw_status(recording_session: &RecordingSession) -> Result<(), anyhow::Error> {
    let state = if recording_session.is_paused() {
        "⏸ Paused   "
    } else {
        "● Recording"
    };
    let line = format!(
        " {state}  {}   [Space] pause/resume  [Enter] stop & transcribe  [Esc] cancel",
        format_elapsed(recording_session.elapsed())
    );

    let mut out = stdout();
    execute!(
        out,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        crossterm::style::Print(line)
    )?;
    out.flush()?;
    Ok(())
}

/// Prints the per-stage finalize outcomes.
fn print_report(report: &FinalizeReport) {
    println!();
    println!("Session folder: {}", report.session_dir.display());

    for (channel, outcome) in &report.channels {
        match (&outcome.audio_path, &outcome.audio_error) {
            (Some(path), _) => println!("  {channel} audio:      {}", path.display()),
            (None, Some(e)) => println!("  {channel} audio:      failed ({e})"),
            (None, None) => println!("  {channel} audio:      skipped (nothing captured)"),
        }

        match (&outcome.transcript_path, &outcome.transcript_error) {
            (Some(path), _) => println!("  {channel} transcript: {}", path.display()),
            (None, Some(e)) => println!("  {channel} transcript: failed ({e})"),
            (None, None) => println!("  {channel} transcript: skipped"),
        }
    }

    match (&report.combined_path, &report.merge_error) {
        (Some(path), _) => println!("  Combined:             {}", path.display()),
        (None, Some(e)) => println!("  Combined:             failed ({e})"),
        (None, None) => println!("  Combined:             skipped"),
    }
}
