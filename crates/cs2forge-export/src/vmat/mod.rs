//! Source 2 material (`.vmat`) documents
//!
//! Every generated material has the same fixed `Layer0` schema. Only the
//! shader name, the three texture paths and the physics surface vary.

mod keyvalues;

pub use keyvalues::{KvBlock, KvDocument, KvEntry, KvValue};

use std::path::Path;

use crate::textures::{Channel, TextureSet};

/// Shader program every generated material uses
pub const DEFAULT_SHADER: &str = "csgo_complex.vfx";

/// Ambient occlusion texture every generated material uses
pub const DEFAULT_AO_PATH: &str = "materials/default/default_ao.tga";

/// Header comment of generated files
pub const HEADER: &str = "THIS FILE IS AUTO-GENERATED";

/// File extension of material documents
pub const EXTENSION: &str = "vmat";

/// Shader parameters of one material
#[derive(Debug, Clone, PartialEq)]
pub struct VmatDocument {
    /// Shader program
    pub shader: String,
    /// Engine-relative texture paths; missing channels use engine defaults
    pub textures: TextureSet<String>,
    /// Physics surface property
    pub surface: String,
}

impl VmatDocument {
    /// Document using the default shader
    pub fn new(textures: TextureSet<String>, surface: impl Into<String>) -> Self {
        Self {
            shader: DEFAULT_SHADER.to_string(),
            textures,
            surface: surface.into(),
        }
    }

    /// Use another shader program
    pub fn with_shader(mut self, shader: impl Into<String>) -> Self {
        self.shader = shader.into();
        self
    }

    fn texture(&self, channel: Channel) -> KvValue {
        KvValue::str(self.textures.path_or_default(channel))
    }

    /// The `Layer0` block
    pub fn layer(&self) -> KvBlock {
        KvBlock::new("Layer0")
            .pair("shader", KvValue::str(&self.shader))
            .blank()
            .pair("TextureAmbientOcclusion", KvValue::str(DEFAULT_AO_PATH))
            .pair("g_flModelTintAmount", KvValue::float(1.0, 3))
            .pair("g_flTexCoordRotation", KvValue::float(0.0, 3))
            .pair("g_nScaleTexCoordUByModelScaleAxis", KvValue::Int(0))
            .pair("g_nScaleTexCoordVByModelScaleAxis", KvValue::Int(0))
            .pair("g_vColorTint", KvValue::vector(&[1.0, 1.0, 1.0, 0.0], 6))
            .pair("g_vTexCoordCenter", KvValue::vector(&[0.5, 0.5], 3))
            .pair("g_vTexCoordOffset", KvValue::vector(&[0.0, 0.0], 3))
            .pair("g_vTexCoordScale", KvValue::vector(&[1.0, 1.0], 3))
            .pair("g_vTexCoordScrollSpeed", KvValue::vector(&[0.0, 0.0], 3))
            .pair("TextureColor", self.texture(Channel::Color))
            .pair("g_bFogEnabled", KvValue::Bool(true))
            .pair("g_flMetalness", KvValue::float(0.0, 3))
            .pair("TextureRoughness", self.texture(Channel::Roughness))
            .pair("TextureNormal", self.texture(Channel::Normal))
            .pair("g_nTextureAddressModeU", KvValue::Int(0))
            .pair("g_nTextureAddressModeV", KvValue::Int(0))
            .blank()
            .block(
                KvBlock::new("SystemAttributes")
                    .pair("PhysicsSurfaceProperties", KvValue::str(&self.surface)),
            )
    }

    /// Whole file: header comment plus `Layer0`
    pub fn to_keyvalues(&self) -> KvDocument {
        KvDocument {
            comments: vec![HEADER.to_string()],
            blocks: vec![self.layer()],
        }
    }

    /// Write the document, replacing any existing file
    pub fn write_to(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        std::fs::write(path, self.to_string())
    }
}

impl std::fmt::Display for VmatDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.to_keyvalues(), f)
    }
}
