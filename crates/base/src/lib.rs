//! Shared primitives for the overlay workspace: dense tensors, small
//! geometry types and the process-wide logger.

pub mod logging;
pub mod rect;
pub mod tensor;
pub mod vec2;

pub use logging::{
    FileLogger, LOG_ENV, LogFilter, LogFilterError, StdoutLogger, init_file_logger,
    init_file_logger_with, init_stdout_logger, init_stdout_logger_with,
};
pub use rect::Rect;
pub use tensor::{Tensor, TensorError};
pub use vec2::Vec2;

// Re-export log crate so downstream crates can use base::log::*
pub use log;
