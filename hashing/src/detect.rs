//! Face localisation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{HashingError, ImageFrame};

/// Axis-aligned region of a frame, in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn full(frame: &ImageFrame) -> Self {
        Self {
            x: 0,
            y: 0,
            width: frame.width(),
            height: frame.height(),
        }
    }
}

/// Locates the face in a frame.
///
/// Implementations must be deterministic: the same frame always yields the
/// same region or the same error.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, frame: &ImageFrame) -> Result<FaceRegion, HashingError>;
}

/// Treats the whole frame as the face. For inputs that are already cropped.
#[derive(Clone, Copy, Debug, Default)]
pub struct FullFrameDetector;

impl FaceDetector for FullFrameDetector {
    fn detect(&self, frame: &ImageFrame) -> Result<FaceRegion, HashingError> {
        Ok(FaceRegion::full(frame))
    }
}

/// Finds the salient subject against a flat backdrop.
///
/// The backdrop level is the median luma of the frame's outer ring. Pixels
/// that differ from it by more than a quarter of the frame's luma range are
/// salient, and the face region is their bounding box.
#[derive(Clone, Copy, Debug)]
pub struct ContrastFaceDetector {
    /// Minimum spread between darkest and brightest luma.
    pub min_contrast: u8,
    /// Minimum width and height of the salient region.
    pub min_face_size: u32,
}

impl Default for ContrastFaceDetector {
    fn default() -> Self {
        Self {
            min_contrast: 24,
            min_face_size: 16,
        }
    }
}

impl ContrastFaceDetector {
    pub fn new(min_contrast: u8, min_face_size: u32) -> Self {
        Self {
            min_contrast,
            min_face_size,
        }
    }

    fn backdrop(frame: &ImageFrame) -> u8 {
        let (w, h) = (frame.width(), frame.height());
        let mut ring = Vec::with_capacity(2 * (w + h) as usize);
        for x in 0..w {
            ring.push(frame.luma(x, 0));
            if h > 1 {
                ring.push(frame.luma(x, h - 1));
            }
        }
        for y in 1..h.saturating_sub(1) {
            ring.push(frame.luma(0, y));
            if w > 1 {
                ring.push(frame.luma(w - 1, y));
            }
        }
        ring.sort_unstable();
        ring[ring.len() / 2]
    }
}

impl FaceDetector for ContrastFaceDetector {
    fn detect(&self, frame: &ImageFrame) -> Result<FaceRegion, HashingError> {
        let (w, h) = (frame.width(), frame.height());
        if w < self.min_face_size || h < self.min_face_size {
            return Err(HashingError::NoFace(format!(
                "{w}x{h} frame is smaller than the minimum face size {}",
                self.min_face_size
            )));
        }

        let (mut lo, mut hi) = (u8::MAX, u8::MIN);
        for y in 0..h {
            for x in 0..w {
                let l = frame.luma(x, y);
                lo = lo.min(l);
                hi = hi.max(l);
            }
        }
        let contrast = hi - lo;
        if contrast < self.min_contrast {
            return Err(HashingError::NoFace(format!(
                "luma contrast {contrast} below {}",
                self.min_contrast
            )));
        }

        let backdrop = Self::backdrop(frame);
        let threshold = contrast / 4;
        let (mut x0, mut y0, mut x1, mut y1) = (u32::MAX, u32::MAX, 0, 0);
        for y in 0..h {
            for x in 0..w {
                if frame.luma(x, y).abs_diff(backdrop) > threshold {
                    x0 = x0.min(x);
                    y0 = y0.min(y);
                    x1 = x1.max(x);
                    y1 = y1.max(y);
                }
            }
        }
        if x0 == u32::MAX {
            return Err(HashingError::NoFace("no salient region".into()));
        }

        let region = FaceRegion {
            x: x0,
            y: y0,
            width: x1 - x0 + 1,
            height: y1 - y0 + 1,
        };
        if region.width < self.min_face_size || region.height < self.min_face_size {
            return Err(HashingError::NoFace(format!(
                "salient region {}x{} smaller than {}",
                region.width, region.height, self.min_face_size
            )));
        }
        debug!(?region, backdrop, contrast, "face region detected");
        Ok(region)
    }
}
