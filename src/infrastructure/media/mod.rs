//! Media store infrastructure - local filesystem and S3-compatible backends

mod factory;
mod local;
mod s3;

pub use factory::MediaFactory;
pub use local::LocalMediaStore;
pub use s3::{S3MediaConfig, S3MediaStore};
