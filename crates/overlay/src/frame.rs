use crate::*;
use image::Image;
use std::time::Instant;

/// One captured frame together with the device orientation at capture time.
#[derive(Debug, Clone)]
pub struct Frame {
    pub image: Image,
    pub timestamp: Instant,
    pub orientation: DeviceOrientation,
}

impl Frame {
    pub fn new(image: Image, orientation: DeviceOrientation) -> Self {
        Self {
            image,
            timestamp: Instant::now(),
            orientation,
        }
    }
}
