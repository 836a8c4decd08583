//! Per-stream worker thread with bounded, non-blocking queues.

use std::thread::JoinHandle;

use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};
use tracing::{info, trace};

use crate::counting::{CountingPolicy, CrossingPolicy};
use crate::error::StreamError;

use super::DetectionSource;
use super::pipeline::CountingPipeline;
use super::scheduler::FrameResult;

/// Raw frame handed to a worker.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl Frame {
    pub fn new(data: impl Into<Vec<u8>>, width: u32, height: u32) -> Self {
        Self {
            data: data.into(),
            width,
            height,
        }
    }
}

/// Owns one [`CountingPipeline`] on a dedicated thread.
///
/// Frames are applied strictly in submission order. Both queues are bounded:
/// `submit` fails fast with [`StreamError::Full`] instead of waiting, and
/// results a slow consumer has not drained are dropped.
pub struct StreamWorker<D, P = CountingPolicy>
where
    D: DetectionSource,
    P: CrossingPolicy,
{
    name: String,
    frames: Option<Sender<Frame>>,
    results: Receiver<FrameResult>,
    handle: Option<JoinHandle<CountingPipeline<D, P>>>,
}

impl<D, P> StreamWorker<D, P>
where
    D: DetectionSource + Send + 'static,
    P: CrossingPolicy + Send + 'static,
{
    /// Move `pipeline` onto a new thread. `capacity` bounds both queues.
    pub fn spawn(
        name: impl Into<String>,
        mut pipeline: CountingPipeline<D, P>,
        capacity: usize,
    ) -> Result<Self, StreamError> {
        let name = name.into();
        let capacity = capacity.max(1);
        let (frame_tx, frame_rx) = channel::bounded::<Frame>(capacity);
        let (result_tx, result_rx) = channel::bounded::<FrameResult>(capacity);

        let stream = name.clone();
        let handle = std::thread::Builder::new()
            .name(format!("crowdtrack-{name}"))
            .spawn(move || {
                info!(stream = %stream, "stream worker started");
                for frame in frame_rx.iter() {
                    let result = pipeline
                        .process_frame(&frame.data, frame.width, frame.height)
                        .clone();
                    if let Err(TrySendError::Full(dropped)) = result_tx.try_send(result) {
                        trace!(
                            stream = %stream,
                            frame = dropped.frame_index,
                            "result queue full, dropping result"
                        );
                    }
                }
                info!(stream = %stream, "stream worker stopped");
                pipeline
            })?;

        Ok(Self {
            name,
            frames: Some(frame_tx),
            results: result_rx,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Queue a frame without blocking.
    pub fn submit(&self, frame: Frame) -> Result<(), StreamError> {
        let frames = self.frames.as_ref().ok_or(StreamError::Closed)?;
        frames.try_send(frame).map_err(|err| match err {
            TrySendError::Full(_) => StreamError::Full,
            TrySendError::Disconnected(_) => StreamError::Closed,
        })
    }

    /// Next available result, if any.
    pub fn try_recv(&self) -> Result<Option<FrameResult>, StreamError> {
        match self.results.try_recv() {
            Ok(result) => Ok(Some(result)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(StreamError::Closed),
        }
    }

    /// Result receiver, for use with `select!` or blocking iteration.
    pub fn results(&self) -> &Receiver<FrameResult> {
        &self.results
    }

    /// Stop accepting frames, finish the queued ones and hand back the
    /// pipeline with its final state.
    pub fn shutdown(mut self) -> Result<CountingPipeline<D, P>, StreamError> {
        self.frames.take();
        let handle = self.handle.take().ok_or(StreamError::Closed)?;
        handle.join().map_err(|_| StreamError::WorkerPanicked)
    }
}

impl<D, P> Drop for StreamWorker<D, P>
where
    D: DetectionSource,
    P: CrossingPolicy,
{
    fn drop(&mut self) {
        self.frames.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}
