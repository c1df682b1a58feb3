//! Session state machine and pause-aware elapsed-time accounting.
//!
//! Kept free of any audio or thread handling so the transition rules and
//! the elapsed arithmetic can be tested directly. The controller wraps this
//! with worker management.

use std::time::{Duration, Instant};

use super::error::SessionError;

/// Lifecycle state of a recording session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No session running
    Idle,
    /// Capturing audio on both channels
    Recording,
    /// Session alive but capture suspended; incoming blocks are dropped
    Paused,
    /// Session ended; buffers handed to the finalize chain
    Stopped,
}

/// Tracks session state plus the elapsed time actually spent recording.
///
/// Accounting rule: `elapsed_before_pause` banks completed recording spans;
/// `started_at` marks the beginning of the current span. Entering Paused
/// banks `now - started_at`; leaving Paused restarts the span at `now`.
/// The reported elapsed time is the bank plus the live span while
/// Recording, or just the bank while Paused.
#[derive(Debug)]
pub struct SessionClock {
    state: SessionState,
    started_at: Option<Instant>,
    elapsed_before_pause: Duration,
}

impl SessionClock {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            started_at: None,
            elapsed_before_pause: Duration::ZERO,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Idle → Recording. Resets the accumulated elapsed time.
    ///
    /// # Errors
    /// - `NotRecording` is never returned here; starting twice is an
    ///   `InvalidConfiguration` because the caller failed to stop first
    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Idle {
            return Err(SessionError::InvalidConfiguration(
                "a session is already in progress".to_string(),
            ));
        }
        self.state = SessionState::Recording;
        self.started_at = Some(Instant::now());
        self.elapsed_before_pause = Duration::ZERO;
        Ok(())
    }

    /// Toggles Recording ↔ Paused. Returns true if the session is now paused.
    ///
    /// # Errors
    /// - `NotRecording` if no session is in progress
    pub fn toggle_pause(&mut self) -> Result<bool, SessionError> {
        match self.state {
            SessionState::Recording => {
                if let Some(started) = self.started_at.take() {
                    self.elapsed_before_pause += started.elapsed();
                }
                self.state = SessionState::Paused;
                Ok(true)
            }
            SessionState::Paused => {
                self.started_at = Some(Instant::now());
                self.state = SessionState::Recording;
                Ok(false)
            }
            SessionState::Idle | SessionState::Stopped => Err(SessionError::NotRecording),
        }
    }

    /// Recording|Paused → Stopped. Returns the final elapsed recording time.
    ///
    /// # Errors
    /// - `NotRecording` if no session is in progress
    pub fn stop(&mut self) -> Result<Duration, SessionError> {
        match self.state {
            SessionState::Recording | SessionState::Paused => {
                if self.state == SessionState::Recording {
                    if let Some(started) = self.started_at.take() {
                        self.elapsed_before_pause += started.elapsed();
                    }
                }
                self.state = SessionState::Stopped;
                Ok(self.elapsed_before_pause)
            }
            SessionState::Idle | SessionState::Stopped => Err(SessionError::NotRecording),
        }
    }

    /// Elapsed recording time, excluding all paused spans.
    pub fn elapsed(&self) -> Duration {
        match self.state {
            SessionState::Recording => {
                self.elapsed_before_pause
                    + self.started_at.map(|s| s.elapsed()).unwrap_or_default()
            }
            _ => self.elapsed_before_pause,
        }
    }
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats an elapsed duration as `HH:MM:SS.CC` for the status line.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_secs = elapsed.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    let seconds = total_secs % 60;
    let centis = elapsed.subsec_millis() / 10;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{centis:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;

    // Generous bound for scheduler jitter in the sleep-based tests
    const TOLERANCE: Duration = Duration::from_millis(40);

    fn close(a: Duration, b: Duration) -> bool {
        let diff = if a > b { a - b } else { b - a };
        diff <= TOLERANCE
    }

    #[test]
    fn starts_idle_and_transitions_linearly() {
        let mut clock = SessionClock::new();
        assert_eq!(clock.state(), SessionState::Idle);

        clock.start().unwrap();
        assert_eq!(clock.state(), SessionState::Recording);

        clock.stop().unwrap();
        assert_eq!(clock.state(), SessionState::Stopped);
    }

    #[test]
    fn stop_without_start_is_not_recording() {
        let mut clock = SessionClock::new();
        assert!(matches!(clock.stop(), Err(SessionError::NotRecording)));
        assert_eq!(clock.state(), SessionState::Idle);
    }

    #[test]
    fn pause_without_start_is_not_recording() {
        let mut clock = SessionClock::new();
        assert!(matches!(
            clock.toggle_pause(),
            Err(SessionError::NotRecording)
        ));
    }

    #[test]
    fn stop_is_irreversible() {
        let mut clock = SessionClock::new();
        clock.start().unwrap();
        clock.stop().unwrap();
        assert!(matches!(clock.stop(), Err(SessionError::NotRecording)));
        assert!(matches!(
            clock.toggle_pause(),
            Err(SessionError::NotRecording)
        ));
    }

    #[test]
    fn double_start_is_rejected() {
        let mut clock = SessionClock::new();
        clock.start().unwrap();
        assert!(matches!(
            clock.start(),
            Err(SessionError::InvalidConfiguration(_))
        ));
        assert_eq!(clock.state(), SessionState::Recording);
    }

    #[test]
    fn elapsed_excludes_paused_spans() {
        let mut clock = SessionClock::new();
        clock.start().unwrap();
        sleep(Duration::from_millis(50));

        let paused = clock.toggle_pause().unwrap();
        assert!(paused);
        let at_pause = clock.elapsed();
        assert!(close(at_pause, Duration::from_millis(50)), "{at_pause:?}");

        // Frozen while paused
        sleep(Duration::from_millis(60));
        assert!(close(clock.elapsed(), at_pause));

        let paused = clock.toggle_pause().unwrap();
        assert!(!paused);
        sleep(Duration::from_millis(50));

        let total = clock.stop().unwrap();
        assert!(close(total, Duration::from_millis(100)), "{total:?}");
    }

    #[test]
    fn stop_while_paused_keeps_banked_time() {
        let mut clock = SessionClock::new();
        clock.start().unwrap();
        sleep(Duration::from_millis(50));
        clock.toggle_pause().unwrap();

        let total = clock.stop().unwrap();
        assert!(close(total, Duration::from_millis(50)), "{total:?}");
    }

    #[test]
    fn formats_elapsed_with_centiseconds() {
        assert_eq!(format_elapsed(Duration::ZERO), "00:00:00.00");
        assert_eq!(format_elapsed(Duration::from_millis(1250)), "00:00:01.25");
        assert_eq!(format_elapsed(Duration::from_secs(3661)), "01:01:01.00");
        assert_eq!(format_elapsed(Duration::from_secs(7325)), "02:02:05.00");
    }
}
