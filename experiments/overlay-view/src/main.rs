use {
    base::{Rect, Tensor, Vec2},
    clap::{Parser, ValueEnum},
    crates_image::RgbImage,
    image::{Image, PixelFormat},
    overlay::{
        CaptureSource, ClassIndexTensor, ColorLut, DeviceOrientation, Frame, FrameSource,
        ImageOrientation, InferenceError, Orchestrator, OverlayConfig, RenderSurface,
        RenderableOverlay, ResizeFilter, Segmenter,
    },
    std::{
        path::PathBuf,
        sync::{Arc, Mutex},
        time::Duration,
    },
    video::VideoInDevice,
};

// Pascal VOC class the stand-in model reports for bright pixels
const PERSON: i32 = 15;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Orientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl From<Orientation> for DeviceOrientation {
    fn from(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Unknown => DeviceOrientation::Unknown,
            Orientation::Portrait => DeviceOrientation::Portrait,
            Orientation::PortraitUpsideDown => DeviceOrientation::PortraitUpsideDown,
            Orientation::LandscapeLeft => DeviceOrientation::LandscapeLeft,
            Orientation::LandscapeRight => DeviceOrientation::LandscapeRight,
            Orientation::FaceUp => DeviceOrientation::FaceUp,
            Orientation::FaceDown => DeviceOrientation::FaceDown,
        }
    }
}

/// Live segmentation overlay over a camera feed, written out as PNG snapshots.
#[derive(Parser, Debug)]
#[command(about = "Blend a segmentation overlay over live video")]
struct Args {
    /// How the device is held
    #[arg(long, value_enum, default_value_t = Orientation::Unknown)]
    orientation: Orientation,
    /// Capture width
    #[arg(long, default_value_t = 640, value_parser = clap::value_parser!(u32).range(2..))]
    width: u32,
    /// Capture height
    #[arg(long, default_value_t = 480, value_parser = clap::value_parser!(u32).range(1..))]
    height: u32,
    /// Luma above which the stand-in model reports a person
    #[arg(long, default_value_t = 160)]
    threshold: u8,
    /// Bilinear mask scaling instead of nearest neighbor
    #[arg(long)]
    smooth: bool,
    /// Snapshot written on every new overlay
    #[arg(long, default_value = "overlay.png")]
    output: PathBuf,
    /// Log to daily files in this directory instead of stdout
    #[arg(long)]
    log_dir: Option<PathBuf>,
    /// V4L2 device node, first camera when omitted
    #[cfg(feature = "v4l2")]
    #[arg(long)]
    device: Option<PathBuf>,
}

/// Stand-in model: bright pixels are a person, everything else background.
struct LumaSegmenter {
    threshold: u8,
}

fn label_bright(image: &Image, threshold: u8) -> Result<ClassIndexTensor, InferenceError> {
    if image.format != PixelFormat::Rgb8 {
        return Err(InferenceError::Model(format!(
            "expected RGB input, got {:?}",
            image.format
        )));
    }
    let classes = image
        .data
        .chunks_exact(3)
        .map(|px| {
            let luma = (77 * px[0] as u32 + 150 * px[1] as u32 + 29 * px[2] as u32) >> 8;
            if luma > threshold as u32 { PERSON } else { 0 }
        })
        .collect();
    Tensor::new(vec![image.size.y, image.size.x], classes)
        .map_err(|e| InferenceError::Model(e.to_string()))
}

impl Segmenter for LumaSegmenter {
    async fn segment(
        &self,
        image: Image,
        _orientation: ImageOrientation,
    ) -> Result<ClassIndexTensor, InferenceError> {
        let threshold = self.threshold;
        tokio::task::spawn_blocking(move || label_bright(&image, threshold))
            .await
            .map_err(|e| InferenceError::Model(e.to_string()))?
    }
}

type LatestImage = Arc<Mutex<Option<Image>>>;

/// Passes frames through, keeping a copy of the newest one for blending.
struct Tap<S> {
    inner: S,
    latest: LatestImage,
}

impl<S: FrameSource> FrameSource for Tap<S> {
    async fn next_frame(&mut self) -> Option<Frame> {
        let frame = self.inner.next_frame().await?;
        *self.latest.lock().unwrap_or_else(|e| e.into_inner()) = Some(frame.image.clone());
        Some(frame)
    }
}

struct SnapshotSurface {
    latest: LatestImage,
    output: PathBuf,
    written: u64,
}

fn blend(frame: &Image, overlay: &RenderableOverlay) -> Option<RgbImage> {
    if frame.size != overlay.bitmap.size() {
        return None;
    }
    let alpha = overlay.opacity;
    let data = frame
        .data
        .iter()
        .zip(overlay.bitmap.data())
        .map(|(&video, &mask)| (video as f32 * (1.0 - alpha) + mask as f32 * alpha).round() as u8)
        .collect();
    RgbImage::from_raw(frame.size.x as u32, frame.size.y as u32, data)
}

impl RenderSurface for SnapshotSurface {
    fn set_overlay(&mut self, overlay: Arc<RenderableOverlay>) {
        let frame = self
            .latest
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        let Some(frame) = frame else {
            return;
        };
        let Some(blended) = blend(&frame, &overlay) else {
            log::warn!(
                "overlay {:?} does not match frame {:?}",
                overlay.bitmap.size(),
                frame.size
            );
            return;
        };
        match blended.save(&self.output) {
            Ok(()) => {
                self.written += 1;
                log::debug!("snapshot {} written to {}", self.written, self.output.display());
            }
            Err(error) => log::warn!("cannot write {}: {}", self.output.display(), error),
        }
    }
}

/// Synthetic YUYV camera: a bright bar sweeping over a dark background.
#[cfg(not(feature = "v4l2"))]
struct TestPattern {
    size: Vec2<usize>,
    tick: usize,
}

#[cfg(not(feature = "v4l2"))]
impl VideoInDevice for TestPattern {
    fn open(&mut self) -> Result<video::VideoInfo, video::VideoError> {
        Ok(video::VideoInfo {
            size: self.size,
            format: PixelFormat::Yuyv,
            frame_rate: 30.0,
        })
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<video::VideoFrame, video::VideoError> {
        std::thread::sleep(Duration::from_millis(33));
        self.tick += 1;
        let bar = self.size.x / 8;
        let start = (self.tick * 4) % self.size.x;
        let mut data = Vec::with_capacity(self.size.x * self.size.y * 2);
        for _ in 0..self.size.y {
            for x in (0..self.size.x).step_by(2) {
                let luma = if (x + self.size.x - start) % self.size.x < bar {
                    235
                } else {
                    40
                };
                data.extend_from_slice(&[luma, 128, luma, 128]);
            }
        }
        Ok(video::VideoFrame::now(Image::new(
            self.size,
            data,
            PixelFormat::Yuyv,
        )))
    }
}

#[cfg(feature = "v4l2")]
fn open_device(args: &Args, size: Vec2<usize>) -> Box<dyn VideoInDevice> {
    Box::new(video::v4l2::V4l2::new(video::v4l2::V4l2Config {
        path: args.device.clone(),
        size: Some(size),
        ..Default::default()
    }))
}

#[cfg(not(feature = "v4l2"))]
fn open_device(_args: &Args, size: Vec2<usize>) -> Box<dyn VideoInDevice> {
    Box::new(TestPattern { size, tick: 0 })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    match &args.log_dir {
        Some(dir) => base::init_file_logger(dir.clone())?,
        None => base::init_stdout_logger(),
    }

    // YUYV packs pixel pairs
    let size = Vec2::new(args.width as usize & !1, args.height as usize);
    let source = CaptureSource::open(
        open_device(&args, size),
        DeviceOrientation::from(args.orientation),
    )
    .await?;
    let camera_size = source.video_in().size();
    log::info!(
        "overlay-view: {}x{} camera, orientation {:?}, snapshots to {}",
        camera_size.x,
        camera_size.y,
        args.orientation,
        args.output.display()
    );

    let filter = if args.smooth {
        ResizeFilter::Triangle
    } else {
        ResizeFilter::Nearest
    };
    let config = OverlayConfig::default()
        .with_destination(Rect::from_size(camera_size))
        .with_filter(filter);
    let pipeline = Orchestrator::new(
        LumaSegmenter {
            threshold: args.threshold,
        },
        Arc::new(ColorLut::pascal_voc()),
        config,
    )?;

    let latest = LatestImage::default();
    let mut surface = SnapshotSurface {
        latest: latest.clone(),
        output: args.output.clone(),
        written: 0,
    };
    let watch = pipeline.subscribe();
    let presenter = tokio::spawn(async move {
        watch.present_into(&mut surface).await;
    });

    let reporter = tokio::spawn({
        let pipeline = pipeline.clone();
        async move {
            let mut ticker = tokio::time::interval(Duration::from_secs(1));
            loop {
                ticker.tick().await;
                let stats = pipeline.stats();
                log::info!(
                    "submitted {} dropped {} presented {} failed {} latency {:?}",
                    stats.submitted,
                    stats.dropped,
                    stats.presented,
                    stats.failed,
                    stats.last_latency
                );
            }
        }
    });

    tokio::select! {
        _ = pipeline.run(Tap { inner: source, latest }) => {}
        _ = tokio::signal::ctrl_c() => log::info!("interrupted"),
    }

    pipeline.wait_idle().await;
    reporter.abort();
    presenter.abort();
    Ok(())
}
