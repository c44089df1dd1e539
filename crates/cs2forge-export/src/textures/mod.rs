//! Material texture handling
//!
//! Finds the images feeding a material's principled shader and bakes them
//! into the export directory as TGA files the engine can compile.

mod materializer;
mod resolver;

pub use materializer::{
    materialize, normalize_dimensions, try_materialize, TextureNaming, SIZE_MULTIPLE,
};
pub use resolver::{resolve, resolve_channel};

use cs2forge_scene::sockets;
use thiserror::Error;

/// Texture export errors
#[derive(Error, Debug)]
pub enum TextureError {
    /// Host failed to scale or save the image
    #[error("Host error: {0}")]
    Host(#[from] cs2forge_core::Error),

    /// Host has no image of this name
    #[error("Image not found: {0}")]
    ImageNotFound(String),

    /// Image has a zero-sized axis
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
    },
}

/// Result type for texture baking
pub type TextureResult<T> = Result<T, TextureError>;

/// Texture channel read from the principled shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Base color
    Color,
    /// Roughness
    Roughness,
    /// Tangent-space normal
    Normal,
}

impl Channel {
    /// Every channel in document order
    pub const ALL: [Channel; 3] = [Channel::Color, Channel::Roughness, Channel::Normal];

    /// Principled shader input this channel is read from
    pub fn socket(&self) -> &'static str {
        match self {
            Channel::Color => sockets::BASE_COLOR,
            Channel::Roughness => sockets::ROUGHNESS,
            Channel::Normal => sockets::NORMAL,
        }
    }

    /// Whether a normal-map adapter may sit between image and shader
    pub fn follows_adapter(&self) -> bool {
        matches!(self, Channel::Normal)
    }

    /// File-name suffix when textures are named after their material
    pub fn suffix(&self) -> &'static str {
        match self {
            Channel::Color => "basecolor",
            Channel::Roughness => "roughness",
            Channel::Normal => "normal",
        }
    }

    /// Engine default used when the channel has no texture
    pub fn default_path(&self) -> &'static str {
        match self {
            Channel::Color => "materials/default/default_color.tga",
            Channel::Roughness => "materials/default/default_rough.tga",
            Channel::Normal => "materials/default/default_normal.tga",
        }
    }
}

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Channel::Color => "color",
            Channel::Roughness => "roughness",
            Channel::Normal => "normal",
        })
    }
}

/// One value per texture channel
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct TextureSet<T> {
    /// Base color
    pub color: Option<T>,
    /// Roughness
    pub roughness: Option<T>,
    /// Normal
    pub normal: Option<T>,
}

impl<T> TextureSet<T> {
    /// Set with no channel filled
    pub fn empty() -> Self {
        Self {
            color: None,
            roughness: None,
            normal: None,
        }
    }

    /// Value of one channel
    pub fn get(&self, channel: Channel) -> Option<&T> {
        match channel {
            Channel::Color => self.color.as_ref(),
            Channel::Roughness => self.roughness.as_ref(),
            Channel::Normal => self.normal.as_ref(),
        }
    }

    /// Replace one channel
    pub fn set(&mut self, channel: Channel, value: Option<T>) {
        match channel {
            Channel::Color => self.color = value,
            Channel::Roughness => self.roughness = value,
            Channel::Normal => self.normal = value,
        }
    }

    /// Whether no channel is filled
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.roughness.is_none() && self.normal.is_none()
    }

    /// Channels paired with their values, in [`Channel::ALL`] order
    pub fn iter(&self) -> impl Iterator<Item = (Channel, Option<&T>)> {
        Channel::ALL.into_iter().map(move |c| (c, self.get(c)))
    }
}

impl TextureSet<String> {
    /// Path for `channel`, or the engine default
    pub fn path_or_default(&self, channel: Channel) -> &str {
        self.get(channel)
            .map(String::as_str)
            .unwrap_or_else(|| channel.default_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let set = TextureSet::<String>::empty();
        assert!(set.is_empty());
        assert_eq!(
            set.path_or_default(Channel::Roughness),
            "materials/default/default_rough.tga"
        );
    }

    #[test]
    fn test_set_and_iter() {
        let mut set = TextureSet::empty();
        set.set(Channel::Normal, Some("materials/n.tga".to_string()));
        let present: Vec<_> = set
            .iter()
            .filter_map(|(c, v)| v.map(|_| c))
            .collect();
        assert_eq!(present, vec![Channel::Normal]);
        assert_eq!(set.path_or_default(Channel::Normal), "materials/n.tga");
    }

    #[test]
    fn test_only_normal_follows_adapter() {
        assert!(Channel::Normal.follows_adapter());
        assert!(!Channel::Color.follows_adapter());
        assert_eq!(Channel::Color.socket(), "Base Color");
    }
}
