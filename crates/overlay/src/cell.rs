use crate::*;
use std::sync::Arc;
use tokio::sync::watch;

/// The render side. Gets the whole overlay to show and must let go of the
/// previous one once a new one arrives.
pub trait RenderSurface {
    fn set_overlay(&mut self, overlay: Arc<RenderableOverlay>);
}

/// Holder of the single visible overlay.
///
/// `swap` replaces the overlay in one step, so a reader sees either the
/// old overlay or the new one and never anything in between.
#[derive(Debug)]
pub struct OverlayCell {
    sender: watch::Sender<Option<Arc<RenderableOverlay>>>,
}

impl Default for OverlayCell {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlayCell {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { sender }
    }

    /// Make `overlay` the visible overlay, returning the one it replaced.
    pub fn swap(&self, overlay: Arc<RenderableOverlay>) -> Option<Arc<RenderableOverlay>> {
        self.sender.send_replace(Some(overlay))
    }

    pub fn current(&self) -> Option<Arc<RenderableOverlay>> {
        self.sender.borrow().clone()
    }

    pub fn subscribe(&self) -> OverlayWatch {
        OverlayWatch {
            receiver: self.sender.subscribe(),
        }
    }
}

/// Presentation-side view of an `OverlayCell`.
#[derive(Debug, Clone)]
pub struct OverlayWatch {
    receiver: watch::Receiver<Option<Arc<RenderableOverlay>>>,
}

impl OverlayWatch {
    /// Wait for the next swap. Returns false once the cell is gone.
    pub async fn changed(&mut self) -> bool {
        self.receiver.changed().await.is_ok()
    }

    /// Newest overlay, marking it as seen.
    pub fn latest(&mut self) -> Option<Arc<RenderableOverlay>> {
        self.receiver.borrow_and_update().clone()
    }

    /// Hand the newest overlay to `surface` if it changed since the last
    /// call. Returns whether the surface was updated.
    pub fn apply_to(&mut self, surface: &mut impl RenderSurface) -> bool {
        if !self.receiver.has_changed().unwrap_or(false) {
            return false;
        }
        match self.latest() {
            Some(overlay) => {
                surface.set_overlay(overlay);
                true
            }
            None => false,
        }
    }

    /// Forward every swap to `surface` until the cell is dropped.
    pub async fn present_into(mut self, surface: &mut impl RenderSurface) {
        while self.changed().await {
            if let Some(overlay) = self.latest() {
                surface.set_overlay(overlay);
            }
        }
    }
}
