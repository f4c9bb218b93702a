//! Image processing infrastructure

mod processor;

pub use processor::{ImageProcessor, ALLOWED_CONTENT_TYPES};
