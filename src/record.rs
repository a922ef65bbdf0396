//! Decoded source images.

use std::io::Cursor;

use image::{DynamicImage, ImageDecoder, ImageReader, RgbaImage};

use crate::error::Error;
use crate::geometry::Size;

/// One decoded source image plus its input-order index.
///
/// Immutable once built. [`render`](crate::render) borrows records for the
/// duration of one request and never modifies them.
#[derive(Clone, Debug)]
pub struct ImageRecord {
    index: usize,
    image: DynamicImage,
}

impl ImageRecord {
    /// Wrap an already decoded image.
    pub fn new(index: usize, image: DynamicImage) -> Self {
        Self { index, image }
    }

    /// Build from tightly packed 8-bit sRGB RGBA pixels.
    pub fn from_rgba8(index: usize, width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, Error> {
        if width == 0 || height == 0 {
            return Err(Error::ZeroDimension {
                index,
                width,
                height,
            });
        }
        let expected = width as usize * height as usize * 4;
        let actual = pixels.len();
        let buffer = RgbaImage::from_raw(width, height, pixels)
            .filter(|_| actual == expected)
            .ok_or(Error::InvalidBuffer { expected, actual })?;
        Ok(Self::new(index, DynamicImage::ImageRgba8(buffer)))
    }

    /// Decode an encoded file (format guessed from its magic bytes).
    ///
    /// EXIF orientation is applied, so the record's dimensions are the
    /// upright display dimensions. Only codecs enabled through cargo
    /// features are available.
    pub fn decode(index: usize, bytes: &[u8]) -> Result<Self, Error> {
        let mut decoder = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(image::ImageError::IoError)?
            .into_decoder()?;
        let orientation = decoder.orientation()?;
        let mut image = DynamicImage::from_decoder(decoder)?;
        image.apply_orientation(orientation);
        if image.width() == 0 || image.height() == 0 {
            return Err(Error::ZeroDimension {
                index,
                width: image.width(),
                height: image.height(),
            });
        }
        Ok(Self::new(index, image))
    }

    /// Input-order index.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.image.width(), self.image.height())
    }

    /// The decoded pixels.
    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Bytes held by the decoded pixel buffer.
    pub fn byte_len(&self) -> u64 {
        self.image.as_bytes().len() as u64
    }
}

/// Sizes of a batch of records, in order, ready for [`compute_layout`](crate::compute_layout).
pub fn sizes(records: &[ImageRecord]) -> Vec<Size> {
    records.iter().map(ImageRecord::size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rgba8_checks_length() {
        let ok = ImageRecord::from_rgba8(3, 2, 2, vec![0; 16]).unwrap();
        assert_eq!(ok.index(), 3);
        assert_eq!(ok.size(), Size::new(2, 2));
        assert_eq!(ok.byte_len(), 16);

        let short = ImageRecord::from_rgba8(0, 2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(
            short,
            Error::InvalidBuffer {
                expected: 16,
                actual: 15
            }
        ));

        // Longer buffers are rejected too, not silently truncated.
        let long = ImageRecord::from_rgba8(0, 2, 2, vec![0; 20]).unwrap_err();
        assert!(matches!(long, Error::InvalidBuffer { .. }));
    }

    #[test]
    fn from_rgba8_rejects_zero_dimension() {
        let err = ImageRecord::from_rgba8(7, 0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, Error::ZeroDimension { index: 7, .. }));
    }

    #[test]
    fn decode_garbage_is_codec_error() {
        let err = ImageRecord::decode(0, b"definitely not an image").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Codec);
    }

    #[cfg(feature = "png")]
    #[test]
    fn decode_png_round_trip() {
        let mut bytes = Vec::new();
        let src = RgbaImage::from_pixel(3, 5, image::Rgba([10, 20, 30, 255]));
        DynamicImage::ImageRgba8(src)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        let rec = ImageRecord::decode(1, &bytes).unwrap();
        assert_eq!(rec.size(), Size::new(3, 5));
        assert_eq!(rec.image().to_rgba8().get_pixel(2, 4).0, [10, 20, 30, 255]);
    }
}
