use std::path::{Path, PathBuf};

use image::{DynamicImage, GenericImageView};

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to decode image {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("{width}x{height} {format:?} image needs {expected} bytes, got {actual}")]
    SizeMismatch {
        width: u32,
        height: u32,
        format: PixelFormat,
        expected: usize,
        actual: usize,
    },

    #[error("unsupported channel count {0}")]
    UnsupportedChannels(u32),
}

/// Channel layout of decoded 8-bit pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Gray,
    Rgb,
    Rgba,
}

impl PixelFormat {
    pub fn from_channel_count(channels: u32) -> Result<Self, ImageError> {
        match channels {
            1 => Ok(Self::Gray),
            3 => Ok(Self::Rgb),
            4 => Ok(Self::Rgba),
            other => Err(ImageError::UnsupportedChannels(other)),
        }
    }

    pub fn channel_count(self) -> u32 {
        match self {
            Self::Gray => 1,
            Self::Rgb => 3,
            Self::Rgba => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PixelBuffer {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub pixels: Vec<u8>,
}

impl PixelBuffer {
    pub fn new(width: u32, height: u32, format: PixelFormat, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * format.channel_count() as usize;
        if pixels.len() != expected {
            return Err(ImageError::SizeMismatch {
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

    /// Keeps 1, 3 and 4 channel images as they are; anything else becomes RGBA.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = img.dimensions();
        let (format, pixels) = match img.color().channel_count() {
            1 => (PixelFormat::Gray, img.into_luma8().into_raw()),
            3 => (PixelFormat::Rgb, img.into_rgb8().into_raw()),
            _ => (PixelFormat::Rgba, img.into_rgba8().into_raw()),
        };

        Self {
            width,
            height,
            format,
            pixels,
        }
    }

    pub fn channel_count(&self) -> u32 {
        self.format.channel_count()
    }

    pub fn into_dynamic(self) -> Option<DynamicImage> {
        let (width, height) = (self.width, self.height);
        match self.format {
            PixelFormat::Gray => image::GrayImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageLuma8),
            PixelFormat::Rgb => image::RgbImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageRgb8),
            PixelFormat::Rgba => image::RgbaImage::from_raw(width, height, self.pixels).map(DynamicImage::ImageRgba8),
        }
    }

    /// GPUs have no 3-channel 8-bit format, so RGB gets an opaque alpha lane.
    pub fn expand_rgb(&self) -> PixelBuffer {
        if self.format != PixelFormat::Rgb {
            return self.clone();
        }

        let mut pixels = Vec::with_capacity(self.pixels.len() / 3 * 4);
        for rgb in self.pixels.chunks_exact(3) {
            pixels.extend_from_slice(rgb);
            pixels.push(255);
        }

        PixelBuffer {
            width: self.width,
            height: self.height,
            format: PixelFormat::Rgba,
            pixels,
        }
    }

    pub fn mip_level_count(&self) -> u32 {
        32 - self.width.max(self.height).max(1).leading_zeros()
    }

    /// Full mip chain starting with a copy of this image, each level half the size
    /// of the previous one (never below 1x1).
    pub fn mip_chain(&self) -> Vec<PixelBuffer> {
        let levels = self.mip_level_count();
        let mut chain = Vec::with_capacity(levels as usize);
        chain.push(self.clone());

        let Some(base) = self.clone().into_dynamic() else {
            return chain;
        };

        for level in 1..levels {
            let width = (self.width >> level).max(1);
            let height = (self.height >> level).max(1);
            let resized = base.resize_exact(width, height, image::imageops::FilterType::Triangle);
            chain.push(PixelBuffer::from_dynamic(resized));
        }

        chain
    }
}

/// Turns an image file into pixels.
pub trait ImageDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, ImageError>;
}

pub struct FileImageDecoder {
    pub flip_vertically: bool,
}

impl Default for FileImageDecoder {
    fn default() -> Self {
        Self { flip_vertically: true }
    }
}

impl ImageDecoder for FileImageDecoder {
    fn decode(&self, path: &Path) -> Result<PixelBuffer, ImageError> {
        let img = image::open(path).map_err(|source| ImageError::Decode {
            path: path.to_path_buf(),
            source,
        })?;
        let img = if self.flip_vertically { img.flipv() } else { img };
        Ok(PixelBuffer::from_dynamic(img))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    #[test]
    fn test_channel_count_is_preserved() {
        let temp = assert_fs::TempDir::new().unwrap();
        let gray = temp.child("gray.png");
        let rgb = temp.child("rgb.png");
        let rgba = temp.child("rgba.png");
        image::GrayImage::new(4, 2).save(gray.path()).unwrap();
        image::RgbImage::new(4, 2).save(rgb.path()).unwrap();
        image::RgbaImage::new(4, 2).save(rgba.path()).unwrap();

        let decoder = FileImageDecoder::default();
        assert_eq!(decoder.decode(gray.path()).unwrap().channel_count(), 1);
        assert_eq!(decoder.decode(rgb.path()).unwrap().channel_count(), 3);

        let decoded = decoder.decode(rgba.path()).unwrap();
        assert_eq!(decoded.format, PixelFormat::Rgba);
        assert_eq!((decoded.width, decoded.height), (4, 2));
        assert_eq!(decoded.pixels.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_flip_vertically() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("stripe.png");
        let mut img = image::GrayImage::new(1, 2);
        img.put_pixel(0, 0, image::Luma([10]));
        img.put_pixel(0, 1, image::Luma([200]));
        img.save(file.path()).unwrap();

        let flipped = FileImageDecoder { flip_vertically: true }.decode(file.path()).unwrap();
        assert_eq!(flipped.pixels, vec![200, 10]);

        let upright = FileImageDecoder { flip_vertically: false }.decode(file.path()).unwrap();
        assert_eq!(upright.pixels, vec![10, 200]);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = FileImageDecoder::default().decode(&temp.path().join("nope.png"));
        assert!(matches!(result, Err(ImageError::Decode { .. })));
    }

    #[test]
    fn test_mip_chain_halves_down_to_one_pixel() {
        let buffer = PixelBuffer::new(8, 2, PixelFormat::Rgb, vec![128; 8 * 2 * 3]).unwrap();
        assert_eq!(buffer.mip_level_count(), 4);

        let chain = buffer.mip_chain();
        let sizes: Vec<_> = chain.iter().map(|mip| (mip.width, mip.height)).collect();
        assert_eq!(sizes, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert!(chain.iter().all(|mip| mip.format == PixelFormat::Rgb));
    }

    #[test]
    fn test_expand_rgb_adds_opaque_alpha() {
        let buffer = PixelBuffer::new(2, 1, PixelFormat::Rgb, vec![1, 2, 3, 4, 5, 6]).unwrap();
        let expanded = buffer.expand_rgb();
        assert_eq!(expanded.format, PixelFormat::Rgba);
        assert_eq!(expanded.pixels, vec![1, 2, 3, 255, 4, 5, 6, 255]);
    }

    #[test]
    fn test_size_mismatch_rejected() {
        let result = PixelBuffer::new(2, 2, PixelFormat::Rgba, vec![0; 3]);
        assert!(matches!(result, Err(ImageError::SizeMismatch { expected: 16, actual: 3, .. })));
    }
}
