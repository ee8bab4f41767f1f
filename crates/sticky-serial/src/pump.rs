//! Frame pump: blocking reads in, ordered frames out.
//!
//! Serial ports (and files, and stdin) expose blocking `Read`. The pump runs
//! that read loop on Tokio's blocking pool, owns the [`FrameAssembler`] for
//! the stream, and forwards frames to async consumers through a bounded
//! channel. Since one thread owns both the reads and the assembler, chunks
//! are ingested strictly in arrival order.
//!
//! The pump ends when the source reports end of file, when the source
//! fails, when [`FramePump::shutdown`] is called, or when the consumer drops
//! the pump.

use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use sticky_core::DecoderConfig;
use sticky_protocol::{DecoderStats, Frame, FrameAssembler};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{Result, SerialError};

/// Default number of frames buffered between the pump and its consumer.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Handle to a running pump.
pub struct FramePump {
    /// Frames in stream order.
    frame_rx: mpsc::Receiver<Frame>,

    /// Set to ask the read loop to stop at its next read boundary.
    stop: Arc<AtomicBool>,

    /// The read loop; yields the assembler's final counters.
    task: JoinHandle<Result<DecoderStats>>,
}

impl FramePump {
    /// Start pumping `source` through `assembler`.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn spawn<R>(source: R, assembler: FrameAssembler, read_chunk_size: usize) -> Self
    where
        R: Read + Send + 'static,
    {
        Self::spawn_with_capacity(source, assembler, read_chunk_size, DEFAULT_CHANNEL_CAPACITY)
    }

    /// Start pumping `source` through a new assembler built from `config`.
    ///
    /// # Errors
    /// Returns `SerialError::Protocol` if the configuration fails validation.
    pub fn with_config<R>(source: R, config: DecoderConfig, read_chunk_size: usize) -> Result<Self>
    where
        R: Read + Send + 'static,
    {
        let assembler = FrameAssembler::with_config(config)?;
        Ok(Self::spawn(source, assembler, read_chunk_size))
    }

    /// Like [`FramePump::spawn`] with an explicit channel capacity.
    pub fn spawn_with_capacity<R>(
        source: R,
        assembler: FrameAssembler,
        read_chunk_size: usize,
        capacity: usize,
    ) -> Self
    where
        R: Read + Send + 'static,
    {
        let (frame_tx, frame_rx) = mpsc::channel(capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));
        let task_stop = Arc::clone(&stop);
        let chunk_size = read_chunk_size.max(1);

        let task = tokio::task::spawn_blocking(move || {
            read_loop(source, assembler, chunk_size, &frame_tx, &task_stop)
        });

        Self {
            frame_rx,
            stop,
            task,
        }
    }

    /// Receive the next frame.
    ///
    /// Returns `None` once the pump has stopped and every frame it produced
    /// has been received.
    pub async fn recv(&mut self) -> Option<Frame> {
        self.frame_rx.recv().await
    }

    /// Wait for the pump to stop on its own and return the final counters.
    ///
    /// Frames not yet received are dropped.
    ///
    /// # Errors
    /// Returns the error that stopped the read loop, or
    /// `SerialError::TaskFailed` if the loop panicked.
    pub async fn finish(self) -> Result<DecoderStats> {
        drop(self.frame_rx);
        join(self.task).await
    }

    /// Ask the pump to stop, then wait for it.
    ///
    /// The read loop notices the request after its current read returns, so
    /// sources should be opened with a read timeout.
    ///
    /// # Errors
    /// Same as [`FramePump::finish`].
    pub async fn shutdown(self) -> Result<DecoderStats> {
        self.stop.store(true, Ordering::Release);
        self.finish().await
    }
}

async fn join(task: JoinHandle<Result<DecoderStats>>) -> Result<DecoderStats> {
    match task.await {
        Ok(result) => result,
        Err(e) => Err(SerialError::TaskFailed(e.to_string())),
    }
}

fn read_loop<R: Read>(
    mut source: R,
    mut assembler: FrameAssembler,
    chunk_size: usize,
    frame_tx: &mpsc::Sender<Frame>,
    stop: &AtomicBool,
) -> Result<DecoderStats> {
    let mut buf = vec![0u8; chunk_size];
    info!(chunk_size, "Frame pump started");

    'read: while !stop.load(Ordering::Acquire) {
        let read = match source.read(&mut buf) {
            Ok(0) => {
                debug!("Source reached end of stream");
                break;
            }
            Ok(n) => n,
            Err(e) if is_retryable(e.kind()) => {
                if frame_tx.is_closed() {
                    break;
                }
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Read failed, stopping pump");
                return Err(e.into());
            }
        };

        for frame in assembler.ingest(&buf[..read]) {
            if !forward(frame_tx, frame) {
                debug!("Consumer dropped, stopping pump");
                break 'read;
            }
        }
    }

    let stats = assembler.stats();
    if assembler.residual_len() > 0 {
        debug!(unresolved = assembler.residual_len(), "Pump stopped with unresolved bytes");
    }
    info!(
        frames = stats.frames_emitted,
        corrupt = stats.corrupt_frames,
        malformed = stats.malformed_lengths,
        discarded = stats.bytes_discarded,
        "Frame pump stopped"
    );
    Ok(stats)
}

/// Hand one frame to the consumer, waiting if the channel is full.
///
/// Returns `false` once the consumer is gone.
fn forward(frame_tx: &mpsc::Sender<Frame>, frame: Frame) -> bool {
    match frame_tx.try_send(frame) {
        Ok(()) => true,
        Err(TrySendError::Full(frame)) => {
            warn!("Frame channel full, applying backpressure");
            frame_tx.blocking_send(frame).is_ok()
        }
        Err(TrySendError::Closed(_)) => false,
    }
}

fn is_retryable(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::TimedOut | ErrorKind::Interrupted | ErrorKind::WouldBlock
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::VecDeque;
    use std::io;

    const FRAME_A: [u8; 8] = [0xAA, 0xBB, 0x04, 0x01, 0x02, 0x03, 0x04, 0xFF];

    /// Source replaying scripted read results, then EOF.
    struct ScriptedSource(VecDeque<io::Result<Vec<u8>>>);

    impl Read for ScriptedSource {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.0.pop_front() {
                None => Ok(0),
                Some(Err(e)) => Err(e),
                Some(Ok(chunk)) => {
                    buf[..chunk.len()].copy_from_slice(&chunk);
                    Ok(chunk.len())
                }
            }
        }
    }

    /// Source that never delivers data, only timeouts.
    struct SilentSource;

    impl Read for SilentSource {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            std::thread::sleep(std::time::Duration::from_millis(5));
            Err(io::Error::from(ErrorKind::TimedOut))
        }
    }

    #[tokio::test]
    async fn test_pump_skips_timeouts() {
        let source = ScriptedSource(VecDeque::from(vec![
            Ok(FRAME_A[..3].to_vec()),
            Err(io::Error::from(ErrorKind::TimedOut)),
            Err(io::Error::from(ErrorKind::Interrupted)),
            Ok(FRAME_A[3..].to_vec()),
        ]));

        let mut pump = FramePump::spawn(source, FrameAssembler::new(), 64);

        let frame = pump.recv().await.unwrap();
        assert_eq!(frame.as_bytes(), &FRAME_A);
        assert!(pump.recv().await.is_none());
        assert_eq!(pump.finish().await.unwrap().frames_emitted, 1);
    }

    #[tokio::test]
    async fn test_pump_returns_fatal_read_error() {
        let source = ScriptedSource(VecDeque::from(vec![
            Ok(FRAME_A.to_vec()),
            Err(io::Error::from(ErrorKind::BrokenPipe)),
        ]));

        let mut pump = FramePump::spawn(source, FrameAssembler::new(), 64);

        assert!(pump.recv().await.is_some());
        assert!(pump.recv().await.is_none());
        match pump.finish().await {
            Err(e) => assert!(e.is_disconnect()),
            Ok(stats) => panic!("Expected error, got {stats:?}"),
        }
    }

    #[tokio::test]
    async fn test_shutdown_stops_silent_source() {
        let pump = FramePump::spawn(SilentSource, FrameAssembler::new(), 64);
        let stats = pump.shutdown().await.unwrap();
        assert_eq!(stats.frames_emitted, 0);
    }

    #[tokio::test]
    async fn test_dropped_consumer_stops_silent_source() {
        let pump = FramePump::spawn(SilentSource, FrameAssembler::new(), 64);
        // finish() drops the receiver; the loop sees it on the next timeout
        assert!(pump.finish().await.is_ok());
    }

    #[tokio::test]
    async fn test_backpressure_preserves_every_frame() {
        let chunk: Vec<u8> = (0..50).flat_map(|_| FRAME_A).collect();
        let source = ScriptedSource(VecDeque::from(vec![Ok(chunk)]));

        let mut pump = FramePump::spawn_with_capacity(source, FrameAssembler::new(), 1024, 2);

        let mut count = 0;
        while let Some(frame) = pump.recv().await {
            assert_eq!(frame.payload(), &[1, 2, 3, 4]);
            count += 1;
        }
        assert_eq!(count, 50);
    }

    #[tokio::test]
    async fn test_with_config_decodes() {
        let source = io::Cursor::new(FRAME_A.to_vec());
        let mut pump = FramePump::with_config(source, DecoderConfig::default(), 3).unwrap();

        assert_eq!(pump.recv().await.unwrap().as_bytes(), &FRAME_A);
        assert_eq!(pump.finish().await.unwrap().frames_emitted, 1);
    }

    #[tokio::test]
    async fn test_with_config_rejects_invalid_config() {
        let config = DecoderConfig {
            max_residual_size: 8,
            ..DecoderConfig::default()
        };

        match FramePump::with_config(io::empty(), config, 64) {
            Err(e) => {
                assert!(matches!(e, SerialError::Protocol(sticky_core::Error::Config(_))));
                assert!(!e.is_disconnect());
            }
            Ok(_) => panic!("Expected configuration error"),
        }
    }

    #[rstest]
    #[case::timed_out(ErrorKind::TimedOut, true)]
    #[case::interrupted(ErrorKind::Interrupted, true)]
    #[case::would_block(ErrorKind::WouldBlock, true)]
    #[case::broken_pipe(ErrorKind::BrokenPipe, false)]
    #[case::invalid_data(ErrorKind::InvalidData, false)]
    fn test_is_retryable(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(is_retryable(kind), expected);
    }
}
