//! Image hashing for proof-of-human-origin.
//!
//! Every submitted image yields three digests:
//!
//! - **face hash**: a 256-bit gradient hash of the detected face region. It
//!   depends only on decoded pixels, so lossless re-encoding keeps it stable.
//! - **content hash**: Blake2b-256 over the exact submitted bytes. Any byte
//!   change, including metadata or container changes, alters it.
//! - **watermark hash**: Blake2b-256 over the decoded pixel buffer and its
//!   dimensions.
//!
//! Submissions may be PNG, JPEG or binary netpbm (`P5`/`P6`).

pub mod detect;
pub mod error;
pub mod gradient;
pub mod hasher;
pub mod image;

pub use detect::{ContrastFaceDetector, FaceDetector, FaceRegion, FullFrameDetector};
pub use error::HashingError;
pub use gradient::gradient_hash;
pub use hasher::ImageHasher;
pub use crate::image::{ImageFrame, PixelFormat, SubmittedImage};
