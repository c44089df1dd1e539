//! Scene images and the host image capability

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use cs2forge_core::{Color, Error, ImageSize, Result};
use image::codecs::tga::TgaEncoder;
use image::imageops::{self, FilterType};
use image::{ExtendedColorType, RgbaImage};

/// Raster format images are persisted in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// Uncompressed truecolor TGA
    Tga,
}

impl ImageFormat {
    /// Get file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Tga => "tga",
        }
    }
}

/// Host image subsystem, addressed by image name
pub trait ImageHost {
    /// Pixel dimensions of the named image
    fn image_size(&self, name: &str) -> Option<ImageSize>;

    /// Resample the named image in place
    fn scale_image(&mut self, name: &str, size: ImageSize) -> Result<()>;

    /// Persist the named image at `path`
    fn save_image(&mut self, name: &str, path: &Path, format: ImageFormat) -> Result<()>;
}

/// An image held by the in-memory scene
#[derive(Debug, Clone)]
pub struct SceneImage {
    /// Scene-unique name
    pub name: String,
    /// File the pixels were decoded from, if any
    pub source: Option<PathBuf>,
    pixels: RgbaImage,
}

impl SceneImage {
    /// Wrap already-decoded pixels
    pub fn from_rgba(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: name.into(),
            source: None,
            pixels,
        }
    }

    /// Create a generated single-color image
    pub fn solid(name: impl Into<String>, size: ImageSize, color: Color) -> Result<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(Error::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
        let pixels = RgbaImage::from_pixel(size.width, size.height, image::Rgba(color.to_array()));
        Ok(Self::from_rgba(name, pixels))
    }

    /// Decode an image file
    pub fn load(name: impl Into<String>, path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        let pixels = image::open(path)
            .map_err(|e| Error::image(format!("{}: {}", path.display(), e)))?
            .into_rgba8();

        Ok(Self {
            name: name.into(),
            source: Some(path.to_path_buf()),
            pixels,
        })
    }

    /// Pixel dimensions
    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.pixels.width(), self.pixels.height())
    }

    /// RGBA8 pixel data
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Resample to `size`; a no-op when the size is unchanged
    pub fn scale(&mut self, size: ImageSize) -> Result<()> {
        if size.width == 0 || size.height == 0 {
            return Err(Error::InvalidDimensions {
                width: size.width,
                height: size.height,
            });
        }
        if size == self.size() {
            return Ok(());
        }
        self.pixels = imageops::resize(&self.pixels, size.width, size.height, FilterType::Triangle);
        Ok(())
    }

    /// Write the image to `path`
    pub fn save(&self, path: &Path, format: ImageFormat) -> Result<()> {
        match format {
            ImageFormat::Tga => {
                let writer = BufWriter::new(File::create(path)?);
                TgaEncoder::new(writer)
                    .disable_rle()
                    .encode(
                        self.pixels.as_raw(),
                        self.pixels.width(),
                        self.pixels.height(),
                        ExtendedColorType::Rgba8,
                    )
                    .map_err(|e| Error::image(format!("{}: {}", path.display(), e)))?;
            }
        }
        Ok(())
    }
}
