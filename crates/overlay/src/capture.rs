use crate::*;
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU8, Ordering},
    },
    time::Instant,
};
use tokio::sync::mpsc;
use video::{VideoError, VideoFrame, VideoIn, VideoInDevice, VideoInfo};

/// Anything that yields captured frames, one at a time.
#[allow(async_fn_in_trait)]
pub trait FrameSource {
    /// Next frame, or `None` when the source has ended.
    async fn next_frame(&mut self) -> Option<Frame>;
}

impl FrameSource for mpsc::Receiver<Frame> {
    async fn next_frame(&mut self) -> Option<Frame> {
        self.recv().await
    }
}

/// Reports which way the device is currently held.
pub trait OrientationSensor {
    fn orientation(&self) -> DeviceOrientation;
}

// fixed mounting
impl OrientationSensor for DeviceOrientation {
    fn orientation(&self) -> DeviceOrientation {
        *self
    }
}

/// Orientation reading shared between a sensor callback and the capture side.
#[derive(Debug, Clone, Default)]
pub struct SharedOrientation(Arc<AtomicU8>);

impl SharedOrientation {
    pub fn new(orientation: DeviceOrientation) -> Self {
        Self(Arc::new(AtomicU8::new(orientation.to_u8())))
    }

    pub fn set(&self, orientation: DeviceOrientation) {
        self.0.store(orientation.to_u8(), Ordering::Relaxed);
    }

    pub fn get(&self) -> DeviceOrientation {
        DeviceOrientation::from_u8(self.0.load(Ordering::Relaxed))
    }
}

impl OrientationSensor for SharedOrientation {
    fn orientation(&self) -> DeviceOrientation {
        self.get()
    }
}

// orientation changes kept for frames still waiting in the capture channel
const ORIENTATION_HISTORY: usize = 16;

/// Orientation changes seen on the capture worker, keyed by the timestamp of
/// the first frame taken under the new reading.
#[derive(Clone, Default)]
struct OrientationLog(Arc<Mutex<VecDeque<(Instant, DeviceOrientation)>>>);

impl OrientationLog {
    fn record(&self, at: Instant, orientation: DeviceOrientation) {
        let mut changes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        if changes.back().map(|&(_, last)| last) == Some(orientation) {
            return;
        }
        if changes.len() == ORIENTATION_HISTORY {
            changes.pop_front();
        }
        changes.push_back((at, orientation));
    }

    /// Reading in effect when a frame stamped `at` was taken.
    fn at(&self, at: Instant) -> Option<DeviceOrientation> {
        let changes = self.0.lock().unwrap_or_else(|e| e.into_inner());
        changes
            .iter()
            .rev()
            .find(|(since, _)| *since <= at)
            .map(|&(_, orientation)| orientation)
    }
}

// Reads the sensor on the worker thread, right after each frame is taken.
struct OrientedDevice<O> {
    device: Box<dyn VideoInDevice>,
    sensor: O,
    log: OrientationLog,
}

impl<O: OrientationSensor + Send> VideoInDevice for OrientedDevice<O> {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        self.device.open()
    }

    fn close(&mut self) {
        self.device.close();
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        let frame = self.device.blocking_capture()?;
        self.log.record(frame.timestamp, self.sensor.orientation());
        Ok(frame)
    }
}

/// Camera frames converted to RGB and stamped with the device orientation.
pub struct CaptureSource<O: OrientationSensor> {
    videoin: VideoIn,
    sensor: O,
    history: Option<OrientationLog>,
}

impl<O: OrientationSensor + Clone + Send + 'static> CaptureSource<O> {
    /// Start capturing from `device`. Each frame carries the orientation
    /// read on the capture worker when the frame was taken.
    pub async fn open(device: Box<dyn VideoInDevice>, sensor: O) -> Result<Self, PipelineError> {
        let log = OrientationLog::default();
        log.record(Instant::now(), sensor.orientation());
        let oriented = OrientedDevice {
            device,
            sensor: sensor.clone(),
            log: log.clone(),
        };
        let videoin = VideoIn::spawn(Box::new(oriented)).await.map_err(|error| {
            log::error!("camera could not be opened: {}", error);
            PipelineError::CaptureUnavailable(error)
        })?;
        Ok(Self {
            videoin,
            sensor,
            history: Some(log),
        })
    }
}

impl<O: OrientationSensor> CaptureSource<O> {
    /// Wrap an already running `VideoIn`. Its frames were taken without the
    /// sensor, so they get the reading current when they are handed out.
    pub fn from_video_in(videoin: VideoIn, sensor: O) -> Self {
        Self {
            videoin,
            sensor,
            history: None,
        }
    }

    pub fn video_in(&self) -> &VideoIn {
        &self.videoin
    }

    fn orientation_at(&self, at: Instant) -> DeviceOrientation {
        self.history
            .as_ref()
            .and_then(|history| history.at(at))
            .unwrap_or_else(|| self.sensor.orientation())
    }
}

impl<O: OrientationSensor> FrameSource for CaptureSource<O> {
    async fn next_frame(&mut self) -> Option<Frame> {
        loop {
            let captured = self.videoin.recv().await?;
            match image::to_rgb(captured.image) {
                Ok(image) => {
                    return Some(Frame {
                        image,
                        timestamp: captured.timestamp,
                        orientation: self.orientation_at(captured.timestamp),
                    });
                }
                Err(error) => log::warn!("skipping unreadable camera frame: {}", error),
            }
        }
    }
}
