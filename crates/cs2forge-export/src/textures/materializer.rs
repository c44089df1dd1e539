//! Image baking
//!
//! Saves a resolved image into the export's materials directory and returns
//! the path the shader document embeds.

use std::path::Path;

use cs2forge_core::ImageSize;
use cs2forge_scene::path::{material_asset_path, sanitize_file_stem};
use cs2forge_scene::{ImageFormat, ImageHost};
use tracing::{debug, warn};

use super::{Channel, TextureError, TextureResult};

/// Block size both texture dimensions are snapped to
pub const SIZE_MULTIPLE: u32 = 4;

const FORMAT: ImageFormat = ImageFormat::Tga;

/// How baked texture files are named
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextureNaming {
    /// `<image>.tga`, shared by every material using the image
    #[default]
    ImageName,
    /// `<material>_basecolor.tga`, `<material>_roughness.tga`, `<material>_normal.tga`
    MaterialSuffix,
}

impl TextureNaming {
    /// File stem for a channel's texture
    pub fn base_name(&self, channel: Channel, material_stem: &str, image_name: &str) -> String {
        match self {
            TextureNaming::ImageName => sanitize_file_stem(image_name),
            TextureNaming::MaterialSuffix => {
                sanitize_file_stem(&format!("{}_{}", material_stem, channel.suffix()))
            }
        }
    }
}

impl std::str::FromStr for TextureNaming {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "image" => Ok(TextureNaming::ImageName),
            "material" => Ok(TextureNaming::MaterialSuffix),
            _ => Err(format!("Unknown texture naming: {}", s)),
        }
    }
}

/// Snap dimensions down to a multiple of [`SIZE_MULTIPLE`], never below it
///
/// Each axis is handled independently: `max(4, n - n % 4)`.
pub fn normalize_dimensions(size: ImageSize) -> ImageSize {
    let snap = |n: u32| (n - n % SIZE_MULTIPLE).max(SIZE_MULTIPLE);
    ImageSize::new(snap(size.width), snap(size.height))
}

/// Bake `image` to `destination_dir/<base_name>.tga`
///
/// Returns the engine-relative path, or `None` if the host could not
/// scale or save the image. Failures are logged, never propagated.
pub fn materialize<H: ImageHost + ?Sized>(
    host: &mut H,
    image: &str,
    destination_dir: &Path,
    base_name: &str,
) -> Option<String> {
    match try_materialize(host, image, destination_dir, base_name) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(image, error = %e, "Failed to save texture, using default");
            None
        }
    }
}

/// Fallible form of [`materialize`]
pub fn try_materialize<H: ImageHost + ?Sized>(
    host: &mut H,
    image: &str,
    destination_dir: &Path,
    base_name: &str,
) -> TextureResult<String> {
    let size = host
        .image_size(image)
        .ok_or_else(|| TextureError::ImageNotFound(image.to_string()))?;
    if size.width == 0 || size.height == 0 {
        return Err(TextureError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }

    let target = normalize_dimensions(size);
    if target != size {
        debug!(image, from = %size, to = %target, "Normalizing texture size");
        host.scale_image(image, target)?;
    }

    let file_name = format!("{}.{}", base_name, FORMAT.extension());
    host.save_image(image, &destination_dir.join(file_name), FORMAT)?;

    Ok(material_asset_path(base_name, FORMAT.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cs2forge_core::{Color, Error};
    use cs2forge_scene::{Scene, SceneImage};

    #[test]
    fn test_normalize_dimensions() {
        assert_eq!(normalize_dimensions(ImageSize::new(257, 129)), ImageSize::new(256, 128));
        assert_eq!(normalize_dimensions(ImageSize::new(256, 128)), ImageSize::new(256, 128));
        assert_eq!(normalize_dimensions(ImageSize::new(3, 1)), ImageSize::new(4, 4));
        assert_eq!(normalize_dimensions(ImageSize::new(7, 8)), ImageSize::new(4, 8));
    }

    #[test]
    fn test_texture_naming() {
        assert_eq!(
            TextureNaming::ImageName.base_name(Channel::Color, "Wood", "wood_tex"),
            "wood_tex"
        );
        assert_eq!(
            TextureNaming::MaterialSuffix.base_name(Channel::Roughness, "Wood", "wood_tex"),
            "Wood_roughness"
        );
        assert_eq!("material".parse::<TextureNaming>(), Ok(TextureNaming::MaterialSuffix));
        assert!("other".parse::<TextureNaming>().is_err());
    }

    #[test]
    fn test_materialize_scales_and_saves() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new();
        scene
            .add_image(SceneImage::solid("wood_tex", ImageSize::new(257, 129), Color::WHITE).unwrap())
            .unwrap();

        let path = materialize(&mut scene, "wood_tex", dir.path(), "wood_tex");

        assert_eq!(path.as_deref(), Some("materials/wood_tex.tga"));
        let saved = image::open(dir.path().join("wood_tex.tga")).unwrap();
        assert_eq!((saved.width(), saved.height()), (256, 128));
    }

    #[test]
    fn test_missing_image_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = Scene::new();
        assert_eq!(materialize(&mut scene, "ghost", dir.path(), "ghost"), None);
    }

    struct FailingSave;

    impl ImageHost for FailingSave {
        fn image_size(&self, _name: &str) -> Option<ImageSize> {
            Some(ImageSize::new(8, 8))
        }

        fn scale_image(&mut self, _name: &str, _size: ImageSize) -> cs2forge_core::Result<()> {
            Ok(())
        }

        fn save_image(&mut self, _name: &str, _path: &Path, _format: ImageFormat) -> cs2forge_core::Result<()> {
            Err(Error::image("disk full"))
        }
    }

    #[test]
    fn test_save_failure_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let err = try_materialize(&mut FailingSave, "x", dir.path(), "x").unwrap_err();
        assert!(err.to_string().contains("disk full"));
        assert_eq!(materialize(&mut FailingSave, "x", dir.path(), "x"), None);
    }
}
