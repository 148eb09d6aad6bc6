//! 256-bit horizontal gradient hash.
//!
//! The region is area-averaged down to a 17×16 luma grid. Each of the 16 rows
//! contributes 16 bits, one per adjacent pair, set when luma increases to the
//! right. Bits are packed most-significant first.

use armor_types::FaceHash;

use crate::{FaceRegion, ImageFrame};

const GRID_W: u32 = 17;
const GRID_H: u32 = 16;

/// Cell `i` of `n` over `[start, start+len)`, never empty.
fn span(start: u32, len: u32, i: u32, n: u32) -> (u32, u32) {
    let a = start + (u64::from(len) * u64::from(i) / u64::from(n)) as u32;
    let b = start + (u64::from(len) * u64::from(i + 1) / u64::from(n)) as u32;
    (a, b.max(a + 1).min(start + len.max(1)))
}

fn grid(frame: &ImageFrame, region: FaceRegion) -> [[u32; GRID_W as usize]; GRID_H as usize] {
    let mut cells = [[0u32; GRID_W as usize]; GRID_H as usize];
    for gy in 0..GRID_H {
        let (y0, y1) = span(region.y, region.height, gy, GRID_H);
        for gx in 0..GRID_W {
            let (x0, x1) = span(region.x, region.width, gx, GRID_W);
            let mut sum = 0u64;
            for y in y0..y1 {
                for x in x0..x1 {
                    sum += u64::from(frame.luma(x, y));
                }
            }
            let count = u64::from((y1 - y0) * (x1 - x0));
            // Scaled by 16 so small regions keep sub-level precision.
            cells[gy as usize][gx as usize] = (sum * 16 / count) as u32;
        }
    }
    cells
}

/// Gradient hash of `region` within `frame`.
///
/// The region is clamped to the frame bounds.
pub fn gradient_hash(frame: &ImageFrame, region: FaceRegion) -> FaceHash {
    let x = region.x.min(frame.width() - 1);
    let y = region.y.min(frame.height() - 1);
    let region = FaceRegion {
        x,
        y,
        width: region.width.clamp(1, frame.width() - x),
        height: region.height.clamp(1, frame.height() - y),
    };

    let cells = grid(frame, region);
    let mut out = [0u8; 32];
    let mut bit = 0usize;
    for row in &cells {
        for pair in row.windows(2) {
            if pair[1] > pair[0] {
                out[bit / 8] |= 0x80 >> (bit % 8);
            }
            bit += 1;
        }
    }
    FaceHash::new(out)
}
