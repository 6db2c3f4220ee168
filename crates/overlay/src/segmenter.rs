use crate::*;
use image::Image;
use std::future::Future;

/// The segmentation model, seen from the pipeline.
///
/// `segment` receives the captured image and the orientation the model
/// should read it in, and resolves to one class index per pixel. The
/// orchestrator never calls it again before the previous call resolved.
pub trait Segmenter: Send + Sync + 'static {
    fn segment(
        &self,
        image: Image,
        orientation: ImageOrientation,
    ) -> impl Future<Output = Result<ClassIndexTensor, InferenceError>> + Send;
}
