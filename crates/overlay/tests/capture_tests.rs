use base::Vec2;
use image::{Image, PixelFormat};
use overlay::{
    CaptureSource, DeviceOrientation, FrameSource, OrientationSensor, PipelineError,
    SharedOrientation,
};
use video::{VideoError, VideoFrame, VideoInDevice, VideoInfo};

const INFO: VideoInfo = VideoInfo {
    size: Vec2::new(2, 1),
    format: PixelFormat::Yuyv,
    frame_rate: 30.0,
};

// Gray YUYV frames, every other one truncated when `corrupt` is set
struct MockCamera {
    count: usize,
    corrupt: bool,
}

impl VideoInDevice for MockCamera {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        Ok(INFO)
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        std::thread::sleep(std::time::Duration::from_millis(1));
        self.count += 1;
        let data = if self.corrupt && self.count % 2 == 1 {
            vec![128; 3]
        } else {
            vec![128, 128, 128, 128]
        };
        Ok(VideoFrame::now(Image::new(INFO.size, data, PixelFormat::Yuyv)))
    }
}

struct NoCamera;

impl VideoInDevice for NoCamera {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        Err(VideoError::Device("permission denied".to_string()))
    }

    fn close(&mut self) {}

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        unreachable!("never opened")
    }
}

#[tokio::test]
async fn test_frames_arrive_as_rgb() {
    let camera = MockCamera {
        count: 0,
        corrupt: false,
    };
    let mut source = CaptureSource::open(Box::new(camera), DeviceOrientation::LandscapeRight)
        .await
        .unwrap();
    assert_eq!(source.video_in().size(), Vec2::new(2, 1));

    let frame = source.next_frame().await.unwrap();
    assert_eq!(frame.image.format, PixelFormat::Rgb8);
    assert_eq!(frame.image.size, Vec2::new(2, 1));
    assert_eq!(frame.image.data, vec![128; 6]);
    assert_eq!(frame.orientation, DeviceOrientation::LandscapeRight);
}

#[tokio::test]
async fn test_unreadable_frames_are_skipped() {
    let camera = MockCamera {
        count: 0,
        corrupt: true,
    };
    let mut source = CaptureSource::open(Box::new(camera), DeviceOrientation::Unknown)
        .await
        .unwrap();
    for _ in 0..3 {
        let frame = source.next_frame().await.unwrap();
        assert_eq!(frame.image.data.len(), 6);
    }
}

#[tokio::test]
async fn test_queued_frame_keeps_orientation_it_was_taken_with() {
    let sensor = SharedOrientation::new(DeviceOrientation::Portrait);
    let camera = MockCamera {
        count: 0,
        corrupt: false,
    };
    let mut source = CaptureSource::open(Box::new(camera), sensor.clone())
        .await
        .unwrap();

    // let a frame settle in the channel, then turn the device
    tokio::time::sleep(std::time::Duration::from_millis(30)).await;
    sensor.set(DeviceOrientation::FaceDown);
    let queued = source.next_frame().await.unwrap();
    assert_eq!(queued.orientation, DeviceOrientation::Portrait);

    let mut turned = false;
    for _ in 0..20 {
        if source.next_frame().await.unwrap().orientation == DeviceOrientation::FaceDown {
            turned = true;
            break;
        }
    }
    assert!(turned);
}

#[tokio::test]
async fn test_default_sensor_reads_unknown() {
    let sensor = SharedOrientation::default();
    assert_eq!(sensor.orientation(), DeviceOrientation::Unknown);
    let camera = MockCamera {
        count: 0,
        corrupt: false,
    };
    let mut source = CaptureSource::open(Box::new(camera), sensor).await.unwrap();
    assert_eq!(source.next_frame().await.unwrap().orientation, DeviceOrientation::Unknown);
}

#[tokio::test]
async fn test_missing_camera_is_reported() {
    let result = CaptureSource::open(Box::new(NoCamera), DeviceOrientation::Unknown).await;
    assert!(matches!(
        result,
        Err(PipelineError::CaptureUnavailable(VideoError::Device(_)))
    ));
}

#[test]
fn test_shared_orientation_round_trips_every_reading() {
    let sensor = SharedOrientation::new(DeviceOrientation::Portrait);
    for orientation in [
        DeviceOrientation::Unknown,
        DeviceOrientation::Portrait,
        DeviceOrientation::PortraitUpsideDown,
        DeviceOrientation::LandscapeLeft,
        DeviceOrientation::LandscapeRight,
        DeviceOrientation::FaceUp,
        DeviceOrientation::FaceDown,
    ] {
        sensor.set(orientation);
        assert_eq!(sensor.get(), orientation);
    }
}
