use base::Vec2;
use std::fmt;

/// A pixel buffer whose length disagrees with its declared size.
#[derive(Debug, Clone, PartialEq)]
pub struct BitmapError {
    pub size: Vec2<usize>,
    pub len: usize,
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bitmap of {}x{} cannot hold {} bytes",
            self.size.x, self.size.y, self.len
        )
    }
}

impl std::error::Error for BitmapError {}

#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// Shape is not `[height, width]` with both dimensions positive.
    Dimensions(Vec<usize>),
    /// Element count differs from `height * width`.
    Length { expected: usize, got: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Dimensions(shape) => write!(f, "malformed tensor shape {shape:?}"),
            DecodeError::Length { expected, got } => {
                write!(f, "tensor holds {got} class indices, shape declares {expected}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, PartialEq)]
pub enum ComposeError {
    EmptyDestination(Vec2<usize>),
    OversizedDestination(Vec2<usize>),
    Opacity(f32),
    Bitmap(BitmapError),
}

impl fmt::Display for ComposeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeError::EmptyDestination(size) => {
                write!(f, "destination {}x{} has no area", size.x, size.y)
            }
            ComposeError::OversizedDestination(size) => {
                write!(f, "destination {}x{} is too large", size.x, size.y)
            }
            ComposeError::Opacity(opacity) => write!(f, "opacity {opacity} outside [0, 1]"),
            ComposeError::Bitmap(err) => write!(f, "bitmap error: {err}"),
        }
    }
}

impl std::error::Error for ComposeError {}

impl From<BitmapError> for ComposeError {
    fn from(err: BitmapError) -> Self {
        ComposeError::Bitmap(err)
    }
}

/// Reported by a `Segmenter` when the model could not produce a result.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    Model(String),
    NoResult,
}

impl fmt::Display for InferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceError::Model(msg) => write!(f, "model error: {msg}"),
            InferenceError::NoResult => write!(f, "model returned no result"),
        }
    }
}

impl std::error::Error for InferenceError {}

/// Why a single frame was discarded. Never fatal, the previous overlay stays.
#[derive(Debug)]
pub enum FrameError {
    Inference(InferenceError),
    EmptyTensor,
    Decode(DecodeError),
    Compose(ComposeError),
    Worker(String),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::Inference(err) => write!(f, "inference failed: {err}"),
            FrameError::EmptyTensor => write!(f, "inference returned an empty tensor"),
            FrameError::Decode(err) => write!(f, "decode failed: {err}"),
            FrameError::Compose(err) => write!(f, "compose failed: {err}"),
            FrameError::Worker(msg) => write!(f, "worker failed: {msg}"),
        }
    }
}

impl std::error::Error for FrameError {}

impl From<InferenceError> for FrameError {
    fn from(err: InferenceError) -> Self {
        FrameError::Inference(err)
    }
}

impl From<DecodeError> for FrameError {
    fn from(err: DecodeError) -> Self {
        FrameError::Decode(err)
    }
}

impl From<ComposeError> for FrameError {
    fn from(err: ComposeError) -> Self {
        FrameError::Compose(err)
    }
}

/// Errors that stop the pipeline from starting.
#[derive(Debug)]
pub enum PipelineError {
    CaptureUnavailable(video::VideoError),
    Config(String),
    /// Created outside a tokio runtime.
    NoRuntime,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::CaptureUnavailable(err) => write!(f, "capture unavailable: {err}"),
            PipelineError::Config(msg) => write!(f, "invalid configuration: {msg}"),
            PipelineError::NoRuntime => write!(f, "no tokio runtime to run the pipeline on"),
        }
    }
}

impl std::error::Error for PipelineError {}

impl From<video::VideoError> for PipelineError {
    fn from(err: video::VideoError) -> Self {
        PipelineError::CaptureUnavailable(err)
    }
}
