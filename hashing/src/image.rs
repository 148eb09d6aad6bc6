//! Decoded image frames and the submissions that carry them.

use ::image::{ColorType, DynamicImage};
use serde::{Deserialize, Serialize};

use crate::HashingError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn channels(&self) -> usize {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }

    /// Stable tag mixed into pixel digests.
    pub(crate) fn tag(&self) -> u8 {
        match self {
            Self::Gray8 => 1,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// A decoded raster, row-major, 8 bits per channel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageFrame {
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Vec<u8>,
}

impl ImageFrame {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: Vec<u8>,
    ) -> Result<Self, HashingError> {
        if width == 0 || height == 0 {
            return Err(HashingError::Decode(format!(
                "empty image ({width}x{height})"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.channels()))
            .ok_or_else(|| HashingError::Decode("image dimensions overflow".into()))?;
        if pixels.len() != expected {
            return Err(HashingError::FrameSize {
                width,
                height,
                format,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Rec. 601 luma of the pixel at `(x, y)`. Alpha is ignored.
    pub fn luma(&self, x: u32, y: u32) -> u8 {
        let ch = self.format.channels();
        let i = (y as usize * self.width as usize + x as usize) * ch;
        match self.format {
            PixelFormat::Gray8 => self.pixels[i],
            PixelFormat::Rgb8 | PixelFormat::Rgba8 => {
                let r = self.pixels[i] as u32;
                let g = self.pixels[i + 1] as u32;
                let b = self.pixels[i + 2] as u32;
                ((299 * r + 587 * g + 114 * b + 500) / 1000) as u8
            }
        }
    }

    /// Decode a PNG, JPEG or binary netpbm image, chosen by its magic bytes.
    ///
    /// Grayscale sources decode to `Gray8`, sources with alpha to `Rgba8`,
    /// everything else to `Rgb8`. Samples wider than 8 bits are narrowed.
    pub fn decode(bytes: &[u8]) -> Result<Self, HashingError> {
        if matches!(bytes.get(..2), Some(b"P5" | b"P6")) {
            return Self::from_netpbm(bytes);
        }
        let format = ::image::guess_format(bytes)
            .map_err(|e| HashingError::Decode(format!("unrecognised image format: {e}")))?;
        let decoded = ::image::load_from_memory_with_format(bytes, format)
            .map_err(|e| HashingError::Decode(format!("{format:?}: {e}")))?;
        Self::from_dynamic(decoded)
    }

    fn from_dynamic(decoded: DynamicImage) -> Result<Self, HashingError> {
        let color = decoded.color();
        let (width, height) = (decoded.width(), decoded.height());
        match color {
            ColorType::L8 | ColorType::L16 => {
                Self::new(width, height, PixelFormat::Gray8, decoded.into_luma8().into_raw())
            }
            c if c.has_alpha() => {
                Self::new(width, height, PixelFormat::Rgba8, decoded.into_rgba8().into_raw())
            }
            _ => Self::new(width, height, PixelFormat::Rgb8, decoded.into_rgb8().into_raw()),
        }
    }

    /// Decode a binary netpbm image (`P5` graymap or `P6` pixmap).
    ///
    /// Samples with a maxval below 255 are rescaled to the full 8-bit range.
    /// Trailing bytes after the first raster are ignored.
    pub fn from_netpbm(bytes: &[u8]) -> Result<Self, HashingError> {
        let mut header = Header::new(bytes);
        let format = match header.magic()? {
            b"P5" => PixelFormat::Gray8,
            b"P6" => PixelFormat::Rgb8,
            other => {
                return Err(HashingError::Decode(format!(
                    "unsupported netpbm magic {:?}",
                    String::from_utf8_lossy(other)
                )))
            }
        };
        let width = header.number()?;
        let height = header.number()?;
        let maxval = header.number()?;
        if maxval == 0 || maxval > 255 {
            return Err(HashingError::Decode(format!(
                "unsupported maxval {maxval}"
            )));
        }
        let raster = header.raster()?;

        let len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.channels()))
            .ok_or_else(|| HashingError::Decode("image dimensions overflow".into()))?;
        if raster.len() < len {
            return Err(HashingError::Decode(format!(
                "truncated raster: {} of {len} bytes",
                raster.len()
            )));
        }
        let mut pixels = raster[..len].to_vec();
        if maxval < 255 {
            for p in &mut pixels {
                if u32::from(*p) > maxval {
                    return Err(HashingError::Decode(format!(
                        "sample {p} exceeds maxval {maxval}"
                    )));
                }
                *p = ((u32::from(*p) * 255 + maxval / 2) / maxval) as u8;
            }
        }
        Self::new(width, height, format, pixels)
    }

    /// Encode as binary netpbm. RGBA frames drop their alpha channel.
    pub fn to_netpbm(&self) -> Vec<u8> {
        let (magic, body): (&str, Vec<u8>) = match self.format {
            PixelFormat::Gray8 => ("P5", self.pixels.clone()),
            PixelFormat::Rgb8 => ("P6", self.pixels.clone()),
            PixelFormat::Rgba8 => (
                "P6",
                self.pixels
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect(),
            ),
        };
        let mut out = format!("{magic}\n{} {}\n255\n", self.width, self.height).into_bytes();
        out.extend_from_slice(&body);
        out
    }
}

/// Cursor over a netpbm header.
struct Header<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Header<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, pos: 0 }
    }

    fn magic(&mut self) -> Result<&'a [u8], HashingError> {
        if self.bytes.len() < 2 {
            return Err(HashingError::Decode("missing netpbm magic".into()));
        }
        self.pos = 2;
        Ok(&self.bytes[..2])
    }

    fn skip_space_and_comments(&mut self) {
        while let Some(&b) = self.bytes.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.bytes.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn number(&mut self) -> Result<u32, HashingError> {
        self.skip_space_and_comments();
        let start = self.pos;
        while self
            .bytes
            .get(self.pos)
            .is_some_and(|b| b.is_ascii_digit())
        {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(HashingError::Decode(format!(
                "expected header number at byte {start}"
            )));
        }
        std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| HashingError::Decode("header number out of range".into()))
    }

    /// Exactly one whitespace byte separates the header from the raster.
    fn raster(&mut self) -> Result<&'a [u8], HashingError> {
        match self.bytes.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => Ok(&self.bytes[self.pos + 1..]),
            _ => Err(HashingError::Decode("missing raster separator".into())),
        }
    }
}

/// An image as submitted: the exact bytes received plus the decoded frame.
///
/// The content hash covers `bytes`; the face and watermark hashes cover
/// `frame`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmittedImage {
    bytes: Vec<u8>,
    frame: ImageFrame,
}

impl SubmittedImage {
    /// Decode a submission in any supported format.
    pub fn decode(bytes: Vec<u8>) -> Result<Self, HashingError> {
        let frame = ImageFrame::decode(&bytes)?;
        Ok(Self { bytes, frame })
    }

    /// Decode a netpbm submission.
    pub fn from_netpbm(bytes: Vec<u8>) -> Result<Self, HashingError> {
        let frame = ImageFrame::from_netpbm(&bytes)?;
        Ok(Self { bytes, frame })
    }

    /// A submission that is a bare pixel buffer. Its bytes are the pixels.
    pub fn raw(frame: ImageFrame) -> Self {
        Self {
            bytes: frame.pixels.clone(),
            frame,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn frame(&self) -> &ImageFrame {
        &self.frame
    }
}
