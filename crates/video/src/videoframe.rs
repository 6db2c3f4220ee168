use {image::Image, std::time::Instant};

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub image: Image,
    pub timestamp: Instant,
}

impl VideoFrame {
    /// Stamp `image` with the current time.
    pub fn now(image: Image) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
        }
    }
}
