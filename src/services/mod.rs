pub mod image;
pub mod s3;
