use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::path::PathBuf,
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

/// V4L2 capture settings. `None` keeps whatever the device currently uses.
#[derive(Debug, Clone)]
pub struct V4l2Config {
    pub path: Option<PathBuf>,
    pub size: Option<Vec2<usize>>,
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
    pub buffer_count: u32,
}

impl Default for V4l2Config {
    fn default() -> Self {
        // VGA preset
        Self {
            path: None,
            size: Some(Vec2::new(640, 480)),
            format: None,
            frame_rate: None,
            buffer_count: 4,
        }
    }
}

pub struct V4l2 {
    config: V4l2Config,
    stream: Option<MmapStream<'static>>,
    info: Option<VideoInfo>,
}

impl V4l2 {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            stream: None,
            info: None,
        }
    }
}

fn fourcc_for(format: PixelFormat) -> FourCC {
    FourCC::from(format.as_fourcc())
}

impl VideoInDevice for V4l2 {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        self.stream.take();

        let device = match &self.config.path {
            Some(path) => Device::with_path(path)?,
            None => Device::new(0)?,
        };
        let current = Capture::format(&device)?;

        let size = self
            .config
            .size
            .unwrap_or(Vec2::new(current.width as usize, current.height as usize));
        let fourcc = self.config.format.map(fourcc_for).unwrap_or(current.fourcc);

        // the driver may adjust what we ask for
        let actual = Capture::set_format(
            &device,
            &Format::new(size.x as u32, size.y as u32, fourcc),
        )?;
        let format = PixelFormat::from_fourcc(u32::from(actual.fourcc))
            .map_err(|e| VideoError::Device(e.to_string()))?;

        let frame_rate = match self.config.frame_rate {
            Some(frame_rate) => frame_rate,
            None => {
                let params = Capture::params(&device)?;
                params.interval.denominator as f32 / params.interval.numerator as f32
            }
        };
        let params = Capture::set_params(
            &device,
            &v4l::video::capture::Parameters::with_fps(frame_rate as u32),
        )?;

        let stream =
            MmapStream::with_buffers(&device, Type::VideoCapture, self.config.buffer_count)
                .map_err(|e| VideoError::Stream(e.to_string()))?;
        self.stream = Some(stream);

        let info = VideoInfo {
            size: Vec2::new(actual.width as usize, actual.height as usize),
            format,
            frame_rate: params.interval.denominator as f32 / params.interval.numerator as f32,
        };
        self.info = Some(info);
        Ok(info)
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<VideoFrame, VideoError> {
        let (Some(stream), Some(info)) = (self.stream.as_mut(), self.info) else {
            return Err(VideoError::Stream("no stream".to_string()));
        };
        let (data, metadata) =
            CaptureStream::next(stream).map_err(|e| VideoError::Stream(e.to_string()))?;
        // compressed payloads only fill part of the mapped buffer
        let used = match metadata.bytesused as usize {
            0 => data.len(),
            n => n.min(data.len()),
        };
        Ok(VideoFrame::now(Image::new(
            info.size,
            data[..used].to_vec(),
            info.format,
        )))
    }
}

/// Open the first (or configured) V4L2 device.
pub async fn create(config: Option<V4l2Config>) -> Result<VideoIn, VideoError> {
    VideoIn::spawn(Box::new(V4l2::new(config.unwrap_or_default()))).await
}
