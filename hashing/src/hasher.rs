use std::sync::Arc;

use armor_crypto::domain_hash;
use armor_types::{ContentHash, FaceHash, ImageHashes, WatermarkHash};
use tracing::debug;

use crate::{gradient_hash, ContrastFaceDetector, FaceDetector, HashingError, SubmittedImage};

const CONTENT_DOMAIN: &str = "creativearmor/content/v1";
const WATERMARK_DOMAIN: &str = "creativearmor/watermark/v1";

/// Computes the three image digests. Cheap to clone.
#[derive(Clone)]
pub struct ImageHasher {
    detector: Arc<dyn FaceDetector>,
}

impl Default for ImageHasher {
    fn default() -> Self {
        Self::new(Arc::new(ContrastFaceDetector::default()))
    }
}

impl ImageHasher {
    pub fn new(detector: Arc<dyn FaceDetector>) -> Self {
        Self { detector }
    }

    /// Gradient hash of the detected face region.
    pub fn hash_face(&self, image: &SubmittedImage) -> Result<FaceHash, HashingError> {
        let frame = image.frame();
        let region = self.detector.detect(frame)?;
        Ok(gradient_hash(frame, region))
    }

    /// Digest of the exact submitted bytes.
    pub fn hash_content(&self, image: &SubmittedImage) -> ContentHash {
        ContentHash::new(domain_hash(CONTENT_DOMAIN, &[image.bytes()]))
    }

    /// Digest of the decoded pixels, independent of the container bytes.
    pub fn hash_watermark(&self, image: &SubmittedImage) -> WatermarkHash {
        let frame = image.frame();
        WatermarkHash::new(domain_hash(
            WATERMARK_DOMAIN,
            &[
                &frame.width().to_be_bytes(),
                &frame.height().to_be_bytes(),
                &[frame.format().tag()],
                frame.pixels(),
            ],
        ))
    }

    pub fn hash_all(&self, image: &SubmittedImage) -> Result<ImageHashes, HashingError> {
        let face = self.hash_face(image).inspect_err(|e| {
            debug!(error = %e, bytes = image.bytes().len(), "face hashing failed");
        })?;
        Ok(ImageHashes {
            face,
            content: self.hash_content(image),
            watermark: self.hash_watermark(image),
        })
    }
}

impl std::fmt::Debug for ImageHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageHasher").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FullFrameDetector, ImageFrame, PixelFormat};

    /// A textured subject on a flat light backdrop.
    fn portrait_pixels(seed: u32) -> Vec<u8> {
        let mut px = vec![200u8; 48 * 48];
        for y in 10..38u32 {
            for x in 12..36u32 {
                px[(y * 48 + x) as usize] = (40 + (x * 7 + y * 3 + seed * 13) % 90) as u8;
            }
        }
        px
    }

    fn p5(pixels: &[u8]) -> SubmittedImage {
        let mut bytes = b"P5\n48 48\n255\n".to_vec();
        bytes.extend_from_slice(pixels);
        SubmittedImage::from_netpbm(bytes).unwrap()
    }

    fn p6(pixels: &[u8]) -> SubmittedImage {
        let mut bytes = b"P6\n48 48\n255\n".to_vec();
        for &v in pixels {
            bytes.extend_from_slice(&[v, v, v]);
        }
        SubmittedImage::from_netpbm(bytes).unwrap()
    }

    #[test]
    fn content_hash_deterministic() {
        let hasher = ImageHasher::default();
        let img = p5(&portrait_pixels(1));
        assert_eq!(hasher.hash_content(&img), hasher.hash_content(&img));
    }

    #[test]
    fn reencoding_keeps_face_changes_content() {
        let hasher = ImageHasher::default();
        let px = portrait_pixels(1);
        let gray = hasher.hash_all(&p5(&px)).unwrap();
        let rgb = hasher.hash_all(&p6(&px)).unwrap();
        assert_eq!(gray.face, rgb.face);
        assert_ne!(gray.content, rgb.content);
        assert_ne!(gray.watermark, rgb.watermark);
    }

    #[test]
    fn trailing_metadata_changes_content_only() {
        let hasher = ImageHasher::default();
        let px = portrait_pixels(2);
        let plain = p5(&px);
        let mut bytes = plain.bytes().to_vec();
        bytes.extend_from_slice(b"exif:edited");
        let tagged = SubmittedImage::from_netpbm(bytes).unwrap();

        assert_eq!(hasher.hash_face(&plain).unwrap(), hasher.hash_face(&tagged).unwrap());
        assert_eq!(hasher.hash_watermark(&plain), hasher.hash_watermark(&tagged));
        assert_ne!(hasher.hash_content(&plain), hasher.hash_content(&tagged));
    }

    #[test]
    fn png_and_p6_of_same_pixels_share_face_hash() {
        let hasher = ImageHasher::default();
        let px = portrait_pixels(3);
        let as_p6 = p6(&px);

        let rgb: Vec<u8> = px.iter().flat_map(|&v| [v, v, v]).collect();
        let buffer = ::image::RgbImage::from_raw(48, 48, rgb).unwrap();
        let mut png = std::io::Cursor::new(Vec::new());
        buffer.write_to(&mut png, ::image::ImageFormat::Png).unwrap();
        let as_png = SubmittedImage::decode(png.into_inner()).unwrap();

        let a = hasher.hash_all(&as_p6).unwrap();
        let b = hasher.hash_all(&as_png).unwrap();
        assert_eq!(a.face, b.face);
        assert_eq!(a.watermark, b.watermark);
        assert_ne!(a.content, b.content);
    }

    #[test]
    fn different_subjects_different_faces() {
        let hasher = ImageHasher::default();
        let a = hasher.hash_face(&p5(&portrait_pixels(1))).unwrap();
        let b = hasher.hash_face(&p5(&portrait_pixels(4))).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn flat_image_fails_with_no_face() {
        let hasher = ImageHasher::default();
        let img = p5(&[128u8; 48 * 48]);
        assert!(matches!(hasher.hash_all(&img), Err(HashingError::NoFace(_))));
    }

    #[test]
    fn pluggable_detector_is_used() {
        let hasher = ImageHasher::new(Arc::new(FullFrameDetector));
        let frame = ImageFrame::new(48, 48, PixelFormat::Gray8, vec![128; 48 * 48]).unwrap();
        assert!(hasher.hash_face(&SubmittedImage::raw(frame)).is_ok());
    }
}
