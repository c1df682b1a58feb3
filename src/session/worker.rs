//! Capture worker threads.
//!
//! One worker per channel. The worker thread resolves its device, builds a
//! cpal input stream at the fixed 16 kHz rate, and drains sample blocks from
//! the stream callback into its exclusively-owned frame buffer until the
//! shared stop flag is raised. While the pause flag is set, arriving blocks
//! are dropped, not buffered: pause is lossy, the stream keeps running, and
//! the buffer holds only unpaused session time.
//!
//! Device failures never abort the session. A worker that cannot open its
//! stream, or whose stream reports a read error, logs the cause and ends its
//! loop early; the partial buffer is still encoded and transcribed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use cpal::{Sample, SizedSample};
use crossbeam_channel::{bounded, RecvTimeoutError, Sender};

use crate::audio::{device, FrameBuffer, SAMPLE_RATE};
use crate::channel::ChannelId;

/// How often the drain loop re-checks the stop flag while no audio arrives.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Capacity of the callback-to-worker block channel. At 1024-sample blocks
/// this buffers several seconds of audio before the callback starts
/// dropping, which only happens if the worker thread is starved.
const BLOCK_QUEUE_CAPACITY: usize = 64;

/// Shared control surface between the controller and both workers.
///
/// `stop` is one-shot: raised once, never cleared. `pause` is a toggle whose
/// staleness for at most one block is acceptable. These two atomics are the
/// only mutable state shared across threads; each buffer has a single owner.
#[derive(Debug, Clone, Default)]
pub struct SessionFlags {
    pub stop: Arc<AtomicBool>,
    pub pause: Arc<AtomicBool>,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Handle to a running capture worker.
pub struct CaptureWorker {
    channel: ChannelId,
    handle: JoinHandle<FrameBuffer>,
}

impl CaptureWorker {
    /// Spawns the capture thread for one channel.
    ///
    /// The device selector is resolved inside the thread (cpal streams are
    /// not `Send`, so the stream must be built where it lives); the caller
    /// is expected to have validated the selector already so failures here
    /// are device races, handled as early termination.
    pub fn spawn(
        channel: ChannelId,
        device_selector: String,
        block_size: u32,
        flags: SessionFlags,
    ) -> Self {
        let builder = std::thread::Builder::new().name(format!("capture-{}", channel.file_stem()));
        let handle = builder
            .spawn(move || capture_loop(channel, &device_selector, block_size, &flags))
            .expect("failed to spawn capture thread");

        Self { channel, handle }
    }

    pub fn channel(&self) -> ChannelId {
        self.channel
    }

    /// Waits for the worker to finish and takes ownership of its buffer.
    ///
    /// A panicked worker yields an empty buffer; the session continues with
    /// whatever the other channel captured.
    pub fn join(self) -> FrameBuffer {
        match self.handle.join() {
            Ok(buffer) => buffer,
            Err(_) => {
                tracing::error!("{} capture thread panicked, treating as empty", self.channel);
                FrameBuffer::new()
            }
        }
    }
}

/// Body of the capture thread: open the stream, then drain blocks until
/// stopped or the device fails.
fn capture_loop(
    channel: ChannelId,
    device_selector: &str,
    block_size: u32,
    flags: &SessionFlags,
) -> FrameBuffer {
    let mut buffer = FrameBuffer::new();

    let (block_tx, block_rx) = bounded::<Vec<f32>>(BLOCK_QUEUE_CAPACITY);
    let read_failed = Arc::new(AtomicBool::new(false));

    let stream = match open_stream(channel, device_selector, block_size, block_tx, &read_failed) {
        Ok(stream) => stream,
        Err(e) => {
            tracing::error!("{} capture failed to start: {e}", channel);
            return buffer;
        }
    };

    tracing::info!("{} capture started on device '{device_selector}'", channel);

    loop {
        if flags.stop.load(Ordering::SeqCst) {
            break;
        }
        if read_failed.load(Ordering::SeqCst) {
            tracing::error!(
                "{} device read failed, ending capture early with {:.2}s buffered",
                channel,
                buffer.duration_seconds()
            );
            break;
        }

        match block_rx.recv_timeout(POLL_INTERVAL) {
            Ok(block) => {
                // Lossy pause: frames that arrive while paused are discarded
                if flags.pause.load(Ordering::SeqCst) {
                    continue;
                }
                buffer.push_block(block);
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    drop(stream);
    tracing::info!(
        "{} capture stopped: {} samples ({:.2}s)",
        channel,
        buffer.len(),
        buffer.duration_seconds()
    );

    buffer
}

/// Resolves the device and builds a playing input stream that feeds mono
/// blocks into `block_tx`.
fn open_stream(
    channel: ChannelId,
    device_selector: &str,
    block_size: u32,
    block_tx: Sender<Vec<f32>>,
    read_failed: &Arc<AtomicBool>,
) -> Result<cpal::Stream> {
    let input = device::resolve(device_selector)?;
    let device_config = input.default_input_config()?;
    let num_channels = device_config.channels() as usize;

    // The rate is fixed: transcription engines and the WAV container both
    // assume 16 kHz, so a backend that cannot deliver it fails the channel
    // rather than recording at a rate the pipeline would mislabel.
    let stream_config = cpal::StreamConfig {
        channels: device_config.channels(),
        sample_rate: cpal::SampleRate(SAMPLE_RATE),
        buffer_size: cpal::BufferSize::Fixed(block_size),
    };

    let stream = match device_config.sample_format() {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(channel, &input, &stream_config, num_channels, block_tx, read_failed)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(channel, &input, &stream_config, num_channels, block_tx, read_failed)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(channel, &input, &stream_config, num_channels, block_tx, read_failed)?
        }
        cpal::SampleFormat::I32 => {
            build_stream::<i32>(channel, &input, &stream_config, num_channels, block_tx, read_failed)?
        }
        other => return Err(anyhow!("Unsupported sample format {other:?}")),
    };

    stream.play()?;
    Ok(stream)
}

/// Builds the input stream for one native sample format, downmixing the
/// device's interleaved frames to mono f32 in the callback.
fn build_stream<T>(
    channel: ChannelId,
    input: &cpal::Device,
    config: &cpal::StreamConfig,
    num_channels: usize,
    block_tx: Sender<Vec<f32>>,
    read_failed: &Arc<AtomicBool>,
) -> Result<cpal::Stream>
where
    T: SizedSample + Sample + Send + 'static,
    <T as Sample>::Float: Into<f32>,
{
    let error_flag = Arc::clone(read_failed);

    let data_callback = move |data: &[T], _: &cpal::InputCallbackInfo| {
        let mut block = Vec::with_capacity(data.len() / num_channels.max(1));
        for frame in data.chunks(num_channels.max(1)) {
            let sum: f32 = frame.iter().map(|s| s.to_float_sample().into()).sum();
            block.push(sum / frame.len() as f32);
        }

        if block_tx.try_send(block).is_err() {
            // Worker is not draining; the block is lost, same as a pause drop
            tracing::warn!("{} block queue full, dropping a capture block", channel);
        }
    };

    let error_callback = move |err| {
        tracing::error!("{} stream error: {err}", channel);
        error_flag.store(true, Ordering::SeqCst);
    };

    let stream = input.build_input_stream(config, data_callback, error_callback, None)?;
    Ok(stream)
}
