use crate::*;
use base::{Rect, Vec2};

/// Configuration for the overlay pipeline.
#[derive(Clone, Debug)]
pub struct OverlayConfig {
    destination: Rect<usize>,
    filter: ResizeFilter,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            destination: Rect::from_size(Vec2::new(640, 480)),
            filter: ResizeFilter::default(),
        }
    }
}

impl OverlayConfig {
    /// Set the display rectangle the overlay is stretched over.
    pub fn with_destination(mut self, destination: Rect<usize>) -> Self {
        self.destination = destination;
        self
    }

    /// Set the resampling filter used when scaling the mask.
    pub fn with_filter(mut self, filter: ResizeFilter) -> Self {
        self.filter = filter;
        self
    }

    // Getters
    pub fn destination(&self) -> Rect<usize> {
        self.destination
    }

    pub fn filter(&self) -> ResizeFilter {
        self.filter
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.destination.is_empty() {
            return Err(PipelineError::Config(format!(
                "destination {}x{} has no area",
                self.destination.size.x, self.destination.size.y
            )));
        }
        Ok(())
    }
}
