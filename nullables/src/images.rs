//! Synthetic images with predictable hashing behaviour.

use armor_hashing::SubmittedImage;

const SIZE: u32 = 48;

fn header(magic: &str) -> Vec<u8> {
    format!("{magic}\n{SIZE} {SIZE}\n255\n").into_bytes()
}

fn subject(seed: u32) -> Vec<u8> {
    let mut px = vec![200u8; (SIZE * SIZE) as usize];
    for y in 10..38u32 {
        for x in 12..36u32 {
            px[(y * SIZE + x) as usize] = (40 + (x * 7 + y * 3 + seed * 13) % 90) as u8;
        }
    }
    px
}

/// A 48×48 graymap of a textured subject on a light backdrop.
///
/// Different seeds give different face hashes. `rgb` stores the same gray
/// pixels as a P6 pixmap: same face hash, different content hash.
pub fn sample_portrait(seed: u32, rgb: bool) -> SubmittedImage {
    let px = subject(seed);
    let bytes = if rgb {
        let mut bytes = header("P6");
        for v in px {
            bytes.extend_from_slice(&[v, v, v]);
        }
        bytes
    } else {
        let mut bytes = header("P5");
        bytes.extend_from_slice(&px);
        bytes
    };
    // Generated pixels always form a valid netpbm image.
    SubmittedImage::from_netpbm(bytes).unwrap_or_else(|e| panic!("sample portrait: {e}"))
}

/// A uniform 48×48 graymap. No face can be detected in it.
pub fn flat_image(level: u8) -> SubmittedImage {
    let mut bytes = header("P5");
    bytes.extend(std::iter::repeat(level).take((SIZE * SIZE) as usize));
    SubmittedImage::from_netpbm(bytes).unwrap_or_else(|e| panic!("flat image: {e}"))
}
