//! Background encoder thread for finished recording sessions.
//!
//! Encoding a few hundred full-size frames into a GIF takes far longer
//! than one render tick, so it runs on a dedicated thread. Jobs are
//! queued over a channel and processed strictly in submission order; each
//! job carries its own frames and reports back on its own one-shot
//! channel, wrapped in a [`PendingExport`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;

use super::frame::CapturedFrame;
use crate::encode::SequenceEncoder;
use crate::error::GlimpseError;

/// Outcome of an export: the written path, `None` when there was nothing
/// to write, or the failure.
pub type ExportResult = Result<Option<PathBuf>, GlimpseError>;

/// A finished session's frames, owned independently of the live session.
#[derive(Debug)]
pub struct EncodeJob {
    /// Frames in capture order.
    pub frames: Vec<CapturedFrame>,
    /// Destination file.
    pub path: PathBuf,
    /// Delay between frames in milliseconds.
    pub frame_delay_ms: u32,
    /// Loop forever instead of playing once.
    pub loop_forever: bool,
    /// NeuQuant speed for frames with more than 256 colors (1..=30).
    pub quantize_speed: i32,
}

impl EncodeJob {
    /// Encode every frame into `self.path`.
    ///
    /// A failed job leaves no file behind.
    ///
    /// # Errors
    ///
    /// Returns the first I/O or encoder failure.
    pub fn run(self) -> Result<PathBuf, GlimpseError> {
        let result = self.write_all();
        if result.is_err() {
            let _ = std::fs::remove_file(&self.path);
        }
        result.map(|()| self.path)
    }

    fn write_all(&self) -> Result<(), GlimpseError> {
        let file = BufWriter::new(File::create(&self.path)?);
        let mut encoder =
            SequenceEncoder::new(file, self.frame_delay_ms, self.loop_forever)
                .with_quantize_speed(self.quantize_speed);
        for frame in &self.frames {
            encoder.write_frame(frame)?;
        }
        encoder.close()?.flush()?;
        Ok(())
    }
}

enum EncodeRequest {
    Job {
        job: EncodeJob,
        reply: mpsc::Sender<ExportResult>,
    },
    Shutdown,
}

/// Handle to the eventual result of an export.
///
/// Independent of any async runtime: poll it with [`try_take`] from the
/// render loop, or block on [`wait`].
///
/// [`try_take`]: PendingExport::try_take
/// [`wait`]: PendingExport::wait
#[derive(Debug)]
pub struct PendingExport {
    state: PendingState,
}

#[derive(Debug)]
enum PendingState {
    Ready(ExportResult),
    Waiting(mpsc::Receiver<ExportResult>),
    Taken,
}

impl PendingExport {
    /// An export that is already resolved.
    #[must_use]
    pub fn ready(result: ExportResult) -> Self {
        Self {
            state: PendingState::Ready(result),
        }
    }

    fn waiting(rx: mpsc::Receiver<ExportResult>) -> Self {
        Self {
            state: PendingState::Waiting(rx),
        }
    }

    /// Non-blocking check. Returns the result once, the first time it is
    /// available.
    pub fn try_take(&mut self) -> Option<ExportResult> {
        if let PendingState::Waiting(rx) = &self.state {
            let result = match rx.try_recv() {
                Ok(result) => result,
                Err(mpsc::TryRecvError::Empty) => return None,
                Err(mpsc::TryRecvError::Disconnected) => {
                    Err(GlimpseError::WorkerUnavailable)
                }
            };
            self.state = PendingState::Taken;
            return Some(result);
        }
        match std::mem::replace(&mut self.state, PendingState::Taken) {
            PendingState::Ready(result) => Some(result),
            _ => None,
        }
    }

    /// Block until the export finishes.
    ///
    /// # Errors
    ///
    /// Returns the export failure, or
    /// [`GlimpseError::WorkerUnavailable`] if the worker exited before
    /// answering (or the result was already taken).
    pub fn wait(self) -> ExportResult {
        match self.state {
            PendingState::Ready(result) => result,
            PendingState::Waiting(rx) => {
                rx.recv().unwrap_or(Err(GlimpseError::WorkerUnavailable))
            }
            PendingState::Taken => Err(GlimpseError::WorkerUnavailable),
        }
    }
}

/// Single background thread that encodes [`EncodeJob`]s in FIFO order.
pub struct EncodeWorker {
    request_tx: mpsc::Sender<EncodeRequest>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl EncodeWorker {
    /// Spawn the worker thread.
    ///
    /// # Errors
    ///
    /// Returns [`GlimpseError::ThreadSpawn`] if the thread fails to spawn.
    pub fn new() -> Result<Self, GlimpseError> {
        let (request_tx, request_rx) = mpsc::channel::<EncodeRequest>();
        let thread = std::thread::Builder::new()
            .name("glimpse-encoder".into())
            .spawn(move || Self::thread_loop(&request_rx))
            .map_err(GlimpseError::ThreadSpawn)?;

        Ok(Self {
            request_tx,
            thread: Some(thread),
        })
    }

    /// Queue a job behind any already submitted.
    pub fn submit(&self, job: EncodeJob) -> PendingExport {
        let (reply, rx) = mpsc::channel();
        if self
            .request_tx
            .send(EncodeRequest::Job { job, reply })
            .is_err()
        {
            log::error!("encode worker is gone, dropping job");
            return PendingExport::ready(Err(GlimpseError::WorkerUnavailable));
        }
        PendingExport::waiting(rx)
    }

    /// Finish every queued job, then stop the thread and wait for it.
    pub fn shutdown(&mut self) {
        let _ = self.request_tx.send(EncodeRequest::Shutdown);
        if let Some(handle) = self.thread.take() {
            if handle.join().is_err() {
                log::error!("encode worker panicked");
            }
        }
    }

    fn thread_loop(request_rx: &mpsc::Receiver<EncodeRequest>) {
        while let Ok(request) = request_rx.recv() {
            match request {
                EncodeRequest::Shutdown => break,
                EncodeRequest::Job { job, reply } => {
                    let frames = job.frames.len();
                    let result = match job.run() {
                        Ok(path) => {
                            log::info!(
                                "GIF animation with {frames} frames saved to {}",
                                path.display()
                            );
                            Ok(Some(path))
                        }
                        Err(e) => {
                            log::error!("failed to save GIF: {e}");
                            Err(e)
                        }
                    };
                    // Receiver is gone if the caller dropped the handle.
                    let _ = reply.send(result);
                }
            }
        }
    }
}

impl Drop for EncodeWorker {
    fn drop(&mut self) {
        self.shutdown();
    }
}
