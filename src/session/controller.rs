//! Session controller: device validation, worker lifecycle, finalize chain.
//!
//! The controller owns the state machine (via [`SessionClock`]) and the two
//! capture workers. Stop joins both workers before any buffer is read, then
//! runs encode → transcribe → merge sequentially, collecting per-stage
//! outcomes into a [`FinalizeReport`] instead of aborting on the first
//! failure. The session ends Stopped regardless of what finalize reports.

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::time::Duration;

use crate::audio::{self, device, FrameBuffer};
use crate::channel::ChannelId;
use crate::transcript::{merge, writer};
use crate::transcription::{self, TranscriptionConfig};

use super::clock::{SessionClock, SessionState};
use super::error::SessionError;
use super::worker::{CaptureWorker, SessionFlags};

/// Output file locations for one session.
///
/// Every finalized session gets its own timestamped folder so repeated
/// sessions never overwrite each other.
#[derive(Debug, Clone)]
pub struct SessionPaths {
    dir: PathBuf,
}

impl SessionPaths {
    /// Plans a session folder under the configured save folder. Nothing is
    /// created on disk until finalize runs.
    pub fn new(save_folder: &Path) -> Self {
        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        Self {
            dir: save_folder.join(format!("session_{stamp}")),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn audio(&self, channel: ChannelId) -> PathBuf {
        self.dir.join(format!("{}_audio.wav", channel.file_stem()))
    }

    pub fn transcript(&self, channel: ChannelId) -> PathBuf {
        self.dir.join(format!("{}_transcript.txt", channel.file_stem()))
    }

    pub fn combined(&self) -> PathBuf {
        self.dir.join("combined_transcript.txt")
    }
}

/// Buffers handed over by the joined workers, ready for finalize.
pub struct CapturedAudio {
    pub elapsed: Duration,
    pub buffers: Vec<(ChannelId, FrameBuffer)>,
}

/// Per-channel finalize outcome: each stage reports independently.
#[derive(Debug, Default)]
pub struct ChannelOutcome {
    pub audio_path: Option<PathBuf>,
    pub audio_error: Option<String>,
    pub transcript_path: Option<PathBuf>,
    pub transcript_error: Option<String>,
}

/// Everything the finalize chain produced (or failed to produce).
#[derive(Debug)]
pub struct FinalizeReport {
    pub elapsed: Duration,
    pub session_dir: PathBuf,
    pub channels: Vec<(ChannelId, ChannelOutcome)>,
    pub combined_path: Option<PathBuf>,
    pub merge_error: Option<String>,
}

/// A dual-channel recording session.
pub struct RecordingSession {
    clock: SessionClock,
    flags: SessionFlags,
    workers: Vec<CaptureWorker>,
    channel_a_device: String,
    channel_b_device: String,
    block_size: u32,
}

impl RecordingSession {
    pub fn new(channel_a_device: String, channel_b_device: String, block_size: u32) -> Self {
        Self {
            clock: SessionClock::new(),
            flags: SessionFlags::new(),
            workers: Vec::new(),
            channel_a_device,
            channel_b_device,
            block_size,
        }
    }

    pub fn state(&self) -> SessionState {
        self.clock.state()
    }

    /// Elapsed recording time, excluding paused spans.
    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    pub fn is_paused(&self) -> bool {
        self.clock.state() == SessionState::Paused
    }

    /// Starts recording on both channels.
    ///
    /// Both devices are validated before any thread is spawned; a failure
    /// leaves the session Idle with no side effects.
    ///
    /// # Errors
    /// - `InvalidConfiguration` if either device selector is missing, does
    ///   not resolve, or is not input-capable
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.clock.state() != SessionState::Idle {
            return Err(SessionError::InvalidConfiguration(
                "a session is already in progress".to_string(),
            ));
        }

        let selectors = [
            (ChannelId::A, self.channel_a_device.clone()),
            (ChannelId::B, self.channel_b_device.clone()),
        ];

        // Reject missing selectors before touching the audio host at all
        for (channel, selector) in &selectors {
            if selector.trim().is_empty() {
                return Err(SessionError::InvalidConfiguration(format!(
                    "{channel}: no input device selected"
                )));
            }
        }

        for (channel, selector) in &selectors {
            let name = device::validate_input(selector)
                .map_err(|e| SessionError::InvalidConfiguration(format!("{channel}: {e}")))?;
            tracing::info!("{channel} will record from '{name}'");
        }

        self.clock.start()?;

        self.workers = vec![
            CaptureWorker::spawn(
                ChannelId::A,
                self.channel_a_device.clone(),
                self.block_size,
                self.flags.clone(),
            ),
            CaptureWorker::spawn(
                ChannelId::B,
                self.channel_b_device.clone(),
                self.block_size,
                self.flags.clone(),
            ),
        ];

        tracing::info!("Recording started on both channels");
        Ok(())
    }

    /// Toggles pause. Returns true if the session is now paused.
    ///
    /// # Errors
    /// - `NotRecording` if no session is in progress
    pub fn toggle_pause(&mut self) -> Result<bool, SessionError> {
        let paused = self.clock.toggle_pause()?;
        self.flags.pause.store(paused, Ordering::SeqCst);
        tracing::info!("Recording {}", if paused { "paused" } else { "resumed" });
        Ok(paused)
    }

    /// Stops the session and returns the captured audio.
    ///
    /// Raises the one-shot stop flag and joins both workers, so no writer
    /// can still be appending when the buffers are handed out. Stop is
    /// irreversible; the clock ends in Stopped even if a worker misbehaved.
    ///
    /// # Errors
    /// - `NotRecording` if no session is in progress (no files are touched)
    pub fn stop(&mut self) -> Result<CapturedAudio, SessionError> {
        let elapsed = self.clock.stop()?;

        self.flags.stop.store(true, Ordering::SeqCst);

        let buffers = self
            .workers
            .drain(..)
            .map(|worker| {
                let channel = worker.channel();
                (channel, worker.join())
            })
            .collect();

        tracing::info!(
            "Recording stopped after {:.2}s of recorded time",
            elapsed.as_secs_f64()
        );

        Ok(CapturedAudio { elapsed, buffers })
    }

    /// Stops the session and discards everything captured.
    ///
    /// # Errors
    /// - `NotRecording` if no session is in progress
    pub fn cancel(&mut self) -> Result<(), SessionError> {
        let captured = self.stop()?;
        drop(captured);
        tracing::info!("Recording cancelled, buffers discarded");
        Ok(())
    }
}

/// Runs the finalize chain: encode both channels, transcribe both encoded
/// files, merge the two transcripts. Failures are isolated per channel and
/// per stage; every outcome lands in the report.
pub async fn finalize(
    captured: CapturedAudio,
    paths: &SessionPaths,
    transcription_config: &TranscriptionConfig,
) -> FinalizeReport {
    let mut report = FinalizeReport {
        elapsed: captured.elapsed,
        session_dir: paths.dir().to_path_buf(),
        channels: Vec::new(),
        combined_path: None,
        merge_error: None,
    };

    if let Err(e) = std::fs::create_dir_all(paths.dir()) {
        tracing::error!("Failed to create session folder {}: {e}", paths.dir().display());
        report.merge_error = Some(format!("could not create session folder: {e}"));
        for (channel, _) in captured.buffers {
            report.channels.push((channel, ChannelOutcome::default()));
        }
        return report;
    }

    // Encode, then transcribe, channel by channel
    for (channel, buffer) in &captured.buffers {
        let mut outcome = ChannelOutcome::default();
        let audio_path = paths.audio(*channel);

        match audio::encode_wav(buffer, &audio_path) {
            Ok(audio::EncodeOutcome::Written(_)) => outcome.audio_path = Some(audio_path.clone()),
            Ok(audio::EncodeOutcome::Skipped) => {
                tracing::info!("{channel}: nothing recorded, no audio file written");
            }
            Err(e) => {
                tracing::error!("{channel}: encoding failed: {e}");
                outcome.audio_error = Some(e.to_string());
            }
        }

        if let Some(encoded) = &outcome.audio_path {
            let transcript_path = paths.transcript(*channel);
            let started = std::time::Instant::now();
            match transcription::transcribe(transcription_config, encoded).await {
                Ok(segments) => {
                    match writer::write_transcript(&segments, started.elapsed(), &transcript_path)
                    {
                        Ok(()) => outcome.transcript_path = Some(transcript_path),
                        Err(e) => {
                            tracing::error!("{channel}: writing transcript failed: {e}");
                            outcome.transcript_error = Some(e.to_string());
                        }
                    }
                }
                Err(e) => {
                    // The other channel's pipeline and the merge both continue
                    tracing::error!("{channel}: transcription failed: {e}");
                    outcome.transcript_error = Some(e.to_string());
                }
            }
        }

        report.channels.push((*channel, outcome));
    }

    // Merge always runs; a missing or empty transcript contributes zero lines
    let combined_path = paths.combined();
    match merge::merge_transcripts(
        &paths.transcript(ChannelId::A),
        &paths.transcript(ChannelId::B),
        &combined_path,
    ) {
        Ok(line_count) => {
            tracing::info!(
                "Combined transcript written: {} ({line_count} lines)",
                combined_path.display()
            );
            report.combined_path = Some(combined_path);
        }
        Err(e) => {
            tracing::error!("Merging transcripts failed: {e}");
            report.merge_error = Some(e.to_string());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session_with_devices(a: &str, b: &str) -> RecordingSession {
        RecordingSession::new(a.to_string(), b.to_string(), 1024)
    }

    #[test]
    fn stop_before_start_is_not_recording() {
        let mut session = session_with_devices("default", "default");
        assert!(matches!(session.stop(), Err(SessionError::NotRecording)));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn pause_before_start_is_not_recording() {
        let mut session = session_with_devices("default", "default");
        assert!(matches!(
            session.toggle_pause(),
            Err(SessionError::NotRecording)
        ));
    }

    #[test]
    fn start_without_device_selection_fails_and_stays_idle() {
        let mut session = session_with_devices("default", "");
        match session.start() {
            Err(SessionError::InvalidConfiguration(msg)) => {
                assert!(msg.contains("Channel B"), "{msg}");
            }
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        }
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.workers.is_empty());
    }

    #[test]
    fn session_paths_are_channel_scoped() {
        let paths = SessionPaths::new(Path::new("/tmp/recordings"));
        assert!(paths
            .audio(ChannelId::A)
            .to_string_lossy()
            .ends_with("channel_a_audio.wav"));
        assert!(paths
            .transcript(ChannelId::B)
            .to_string_lossy()
            .ends_with("channel_b_transcript.txt"));
        assert!(paths
            .combined()
            .to_string_lossy()
            .ends_with("combined_transcript.txt"));
        assert!(paths.dir().starts_with("/tmp/recordings"));
    }
}
