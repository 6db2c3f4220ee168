use {
    crate::*,
    base::Vec2,
    image::PixelFormat,
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, AtomicU64, Ordering},
        },
        time::Duration,
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

// one slot: a frame waiting in the channel is the only frame we keep
const CHANNEL_CAPACITY: usize = 1;

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT_MS: u64 = 100;

/// What a device actually negotiated when it was opened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub frame_rate: f32,
}

/// A capture backend. All methods run on the same worker thread.
pub trait VideoInDevice: Send {
    /// Open (or reopen) the device and report the negotiated format.
    fn open(&mut self) -> Result<VideoInfo, VideoError>;
    /// Close the device, if open.
    fn close(&mut self);
    /// Block until the next frame is available.
    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError>;
}

pub struct VideoIn {
    receiver: mpsc::Receiver<VideoFrame>,
    cancel: Arc<AtomicBool>,
    dropped: Arc<AtomicU64>,
    info: VideoInfo,
    join_handle: Option<JoinHandle<()>>,
}

fn pump(
    device: &mut dyn VideoInDevice,
    sender: &mpsc::Sender<VideoFrame>,
    cancel: &AtomicBool,
    dropped: &AtomicU64,
) -> bool {
    // returns false once the receiver is gone
    while !cancel.load(Ordering::Relaxed) {
        let frame = match device.blocking_capture() {
            Ok(frame) => frame,
            Err(error) => {
                log::error!("video worker: capture failed: {}", error);
                return true;
            }
        };
        match sender.try_send(frame) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                let count = dropped.fetch_add(1, Ordering::Relaxed) + 1;
                log::debug!("video worker: consumer busy, dropped late frame ({} total)", count);
            }
            Err(mpsc::error::TrySendError::Closed(_)) => return false,
        }
    }
    true
}

impl VideoIn {
    /// Open `device` on a blocking worker and start delivering frames.
    ///
    /// Fails if the first `open` fails. Later capture failures are handled
    /// on the worker by closing, waiting and reopening the device.
    pub async fn spawn(mut device: Box<dyn VideoInDevice>) -> Result<Self, VideoError> {
        let (sender, receiver) = mpsc::channel::<VideoFrame>(CHANNEL_CAPACITY);
        let cancel = Arc::new(AtomicBool::new(false));
        let dropped = Arc::new(AtomicU64::new(0));

        // open() must run on the worker thread, some backends are thread affine
        let (init_tx, init_rx) = oneshot::channel::<Result<VideoInfo, VideoError>>();

        let join_handle = spawn_blocking({
            let cancel = Arc::clone(&cancel);
            let dropped = Arc::clone(&dropped);
            move || {
                match device.open() {
                    Ok(info) => {
                        let _ = init_tx.send(Ok(info));
                    }
                    Err(error) => {
                        let _ = init_tx.send(Err(error));
                        return;
                    }
                }

                while !cancel.load(Ordering::Relaxed) {
                    log::info!("video worker: starting capture loop");
                    if !pump(device.as_mut(), &sender, &cancel, &dropped) {
                        log::info!("video worker: receiver closed");
                        break;
                    }

                    while !cancel.load(Ordering::Relaxed) {
                        log::info!("video worker: reconnecting...");
                        device.close();
                        std::thread::sleep(Duration::from_millis(WAIT_BEFORE_RECONNECT_MS));
                        if device.open().is_ok() {
                            break;
                        }
                    }
                }
                device.close();
            }
        });

        let info = init_rx
            .await
            .map_err(|_| VideoError::Device("worker thread died during init".to_string()))??;
        log::info!(
            "video input: {}x{} {:?} @ {} fps",
            info.size.x,
            info.size.y,
            info.format,
            info.frame_rate
        );

        Ok(Self {
            receiver,
            cancel,
            dropped,
            info,
            join_handle: Some(join_handle),
        })
    }

    pub fn info(&self) -> VideoInfo {
        self.info
    }

    pub fn size(&self) -> Vec2<usize> {
        self.info.size
    }

    /// Frames discarded because the consumer was still busy.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Next frame, or `None` once the worker has stopped.
    pub async fn recv(&mut self) -> Option<VideoFrame> {
        self.receiver.recv().await
    }

    pub async fn capture(&mut self) -> Result<VideoFrame, VideoError> {
        self.recv()
            .await
            .ok_or_else(|| VideoError::Stream("video input channel closed".to_string()))
    }
}

impl Drop for VideoIn {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            handle.abort();
        }
    }
}

#[cfg(feature = "v4l2")]
pub mod v4l2;
