use crate::*;
use base::Rect;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::{runtime::Handle, sync::watch, task::spawn_blocking};

/// Where the orchestrator is with the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Ready to accept the next frame.
    Idle,
    /// A frame was submitted and the model has not answered yet.
    AwaitingInference,
    /// Decoding and composing the model output.
    Decoding,
    /// The new overlay was swapped in.
    Presented,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Submitted,
    /// Another frame was still in flight.
    Dropped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub submitted: u64,
    pub dropped: u64,
    pub presented: u64,
    pub failed: u64,
    /// Capture to swap time of the most recent presented frame.
    pub last_latency: Option<Duration>,
    /// Decode, compose and swap time of the most recent presented frame.
    pub last_postprocess: Option<Duration>,
}

#[derive(Default)]
struct Counters {
    submitted: AtomicU64,
    dropped: AtomicU64,
    presented: AtomicU64,
    failed: AtomicU64,
    // microseconds, 0 until the first frame is presented
    last_latency_us: AtomicU64,
    last_postprocess_us: AtomicU64,
}

fn store_duration(slot: &AtomicU64, duration: Duration) {
    slot.store(duration.as_micros().clamp(1, u64::MAX as u128) as u64, Ordering::Relaxed);
}

fn load_duration(slot: &AtomicU64) -> Option<Duration> {
    match slot.load(Ordering::Relaxed) {
        0 => None,
        us => Some(Duration::from_micros(us)),
    }
}

struct Shared<S> {
    runtime: Handle,
    segmenter: S,
    lut: Arc<ColorLut>,
    filter: ResizeFilter,
    destination: Mutex<Rect<usize>>,
    state: watch::Sender<PipelineState>,
    cell: OverlayCell,
    counters: Counters,
}

// Puts the state machine back to Idle however the frame task ends: done,
// unwound, or dropped by a runtime that never polled it.
struct IdleOnDrop<S>(Arc<Shared<S>>);

impl<S> Drop for IdleOnDrop<S> {
    fn drop(&mut self) {
        if std::thread::panicking() {
            self.0.counters.failed.fetch_add(1, Ordering::Relaxed);
            log::error!("frame task panicked, pipeline back to idle");
        }
        self.0.state.send_replace(PipelineState::Idle);
    }
}

/// Drives frames through the model and into the visible overlay.
///
/// At most one frame is in flight: `on_frame` claims the pipeline with an
/// atomic `Idle -> AwaitingInference` transition, and every frame that
/// arrives before the pipeline is `Idle` again is dropped. A frame that
/// fails at any stage leaves the current overlay untouched.
///
/// Frames may be offered from any thread. The per-frame work runs on the
/// tokio runtime the orchestrator was created in.
///
/// There is no timeout. A segmenter that never resolves keeps the
/// pipeline busy, and every later frame is dropped.
pub struct Orchestrator<S: Segmenter> {
    shared: Arc<Shared<S>>,
}

impl<S: Segmenter> Clone for Orchestrator<S> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<S: Segmenter> Orchestrator<S> {
    /// Must be called from within a tokio runtime, which then runs every frame.
    pub fn new(segmenter: S, lut: Arc<ColorLut>, config: OverlayConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| PipelineError::NoRuntime)?;
        let (state, _) = watch::channel(PipelineState::Idle);
        Ok(Self {
            shared: Arc::new(Shared {
                runtime,
                segmenter,
                lut,
                filter: config.filter(),
                destination: Mutex::new(config.destination()),
                state,
                cell: OverlayCell::new(),
                counters: Counters::default(),
            }),
        })
    }

    /// Offer a captured frame.
    pub fn on_frame(&self, frame: Frame) -> FrameOutcome {
        let claimed = self.shared.state.send_if_modified(|state| {
            if *state == PipelineState::Idle {
                *state = PipelineState::AwaitingInference;
                true
            } else {
                false
            }
        });
        if !claimed {
            let dropped = self.shared.counters.dropped.fetch_add(1, Ordering::Relaxed) + 1;
            log::debug!("inference in flight, dropped frame ({} total)", dropped);
            return FrameOutcome::Dropped;
        }

        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
        let idle = IdleOnDrop(Arc::clone(&self.shared));
        self.shared.runtime.spawn(async move {
            let shared = &idle.0;
            let captured = frame.timestamp;
            match shared.process(frame).await {
                Ok(postprocess) => {
                    let latency = captured.elapsed();
                    let counters = &shared.counters;
                    counters.presented.fetch_add(1, Ordering::Relaxed);
                    store_duration(&counters.last_latency_us, latency);
                    store_duration(&counters.last_postprocess_us, postprocess);
                    log::debug!(
                        "decode and compose time: {:.2} ms, capture to overlay: {:.2} ms",
                        postprocess.as_secs_f64() * 1000.0,
                        latency.as_secs_f64() * 1000.0
                    );
                }
                Err(error) => {
                    shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                    log::warn!("dropping frame: {}", error);
                }
            }
        });
        FrameOutcome::Submitted
    }

    /// Feed every frame from `source` into `on_frame` until it runs dry.
    pub async fn run(&self, mut source: impl FrameSource) {
        log::info!("overlay pipeline running");
        while let Some(frame) = source.next_frame().await {
            self.on_frame(frame);
        }
        log::info!("frame source ended, overlay pipeline stopped");
    }

    /// Change the display rectangle. Applies from the next decoded frame on.
    pub fn set_destination(&self, destination: Rect<usize>) {
        *self
            .shared
            .destination
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = destination;
    }

    pub fn destination(&self) -> Rect<usize> {
        self.shared.destination()
    }

    pub fn state(&self) -> PipelineState {
        *self.shared.state.borrow()
    }

    pub fn watch_state(&self) -> watch::Receiver<PipelineState> {
        self.shared.state.subscribe()
    }

    /// Resolve once no frame is in flight.
    pub async fn wait_idle(&self) {
        let mut receiver = self.shared.state.subscribe();
        // the sender lives in `self`, so this cannot fail
        let _ = receiver.wait_for(|state| *state == PipelineState::Idle).await;
    }

    /// The overlay currently visible, if any frame succeeded yet.
    pub fn overlay(&self) -> Option<Arc<RenderableOverlay>> {
        self.shared.cell.current()
    }

    pub fn subscribe(&self) -> OverlayWatch {
        self.shared.cell.subscribe()
    }

    pub fn stats(&self) -> PipelineStats {
        let counters = &self.shared.counters;
        PipelineStats {
            submitted: counters.submitted.load(Ordering::Relaxed),
            dropped: counters.dropped.load(Ordering::Relaxed),
            presented: counters.presented.load(Ordering::Relaxed),
            failed: counters.failed.load(Ordering::Relaxed),
            last_latency: load_duration(&counters.last_latency_us),
            last_postprocess: load_duration(&counters.last_postprocess_us),
        }
    }
}

impl<S: Segmenter> Shared<S> {
    fn destination(&self) -> Rect<usize> {
        *self.destination.lock().unwrap_or_else(|e| e.into_inner())
    }

    // Returns the time spent after the model answered.
    async fn process(&self, frame: Frame) -> Result<Duration, FrameError> {
        let mapping = resolve(frame.orientation);
        let tensor = self.segmenter.segment(frame.image, mapping.capture).await?;
        if tensor.is_empty() {
            return Err(FrameError::EmptyTensor);
        }

        self.state.send_replace(PipelineState::Decoding);
        let lut = Arc::clone(&self.lut);
        let dest = self.destination();
        let filter = self.filter;
        let started = Instant::now();
        let overlay = spawn_blocking(move || -> Result<RenderableOverlay, FrameError> {
            let bitmap = decode(&tensor, &lut)?;
            Ok(compose(bitmap, mapping.display, dest, filter)?)
        })
        .await
        .map_err(|e| FrameError::Worker(e.to_string()))??;

        self.cell.swap(Arc::new(overlay));
        self.state.send_replace(PipelineState::Presented);
        Ok(started.elapsed())
    }
}
