use base::{Rect, Vec2};
use overlay::{MaskBitmap, OverlayCell, RenderSurface, RenderableOverlay};
use std::{sync::Arc, time::Duration};

fn overlay(shade: u8) -> Arc<RenderableOverlay> {
    Arc::new(RenderableOverlay {
        bitmap: MaskBitmap::new(Vec2::new(1, 1), vec![shade; 3]).unwrap(),
        dest: Rect::from_size(Vec2::new(1, 1)),
        opacity: 0.5,
    })
}

#[derive(Default)]
struct MockSurface {
    shown: Vec<Arc<RenderableOverlay>>,
}

impl RenderSurface for MockSurface {
    fn set_overlay(&mut self, overlay: Arc<RenderableOverlay>) {
        self.shown.push(overlay);
    }
}

#[test]
fn test_swap_returns_previous() {
    let cell = OverlayCell::new();
    assert!(cell.current().is_none());

    let first = overlay(1);
    assert!(cell.swap(first.clone()).is_none());
    let second = overlay(2);
    let previous = cell.swap(second.clone()).unwrap();
    assert!(Arc::ptr_eq(&previous, &first));
    assert!(Arc::ptr_eq(&cell.current().unwrap(), &second));
}

#[test]
fn test_apply_to_only_on_change() {
    let cell = OverlayCell::default();
    let mut watch = cell.subscribe();
    let mut surface = MockSurface::default();

    assert!(!watch.apply_to(&mut surface));
    cell.swap(overlay(1));
    assert!(watch.apply_to(&mut surface));
    assert!(!watch.apply_to(&mut surface));
    assert_eq!(surface.shown.len(), 1);
}

#[test]
fn test_late_reader_sees_only_newest() {
    let cell = OverlayCell::new();
    let mut watch = cell.subscribe();
    let mut surface = MockSurface::default();

    cell.swap(overlay(1));
    cell.swap(overlay(2));
    cell.swap(overlay(3));
    assert!(watch.apply_to(&mut surface));
    assert_eq!(surface.shown.len(), 1);
    assert_eq!(surface.shown[0].bitmap.data(), &[3, 3, 3]);
}

#[tokio::test]
async fn test_present_into_ends_with_cell() {
    let cell = OverlayCell::new();
    let watch = cell.subscribe();

    let task = tokio::spawn(async move {
        let mut surface = MockSurface::default();
        watch.present_into(&mut surface).await;
        surface.shown.len()
    });

    cell.swap(overlay(1));
    tokio::time::sleep(Duration::from_millis(20)).await;
    drop(cell);

    let shown = tokio::time::timeout(Duration::from_secs(1), task)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(shown, 1);
}
