//! Physics surface classification
//!
//! Source 2 picks footstep and impact effects from a material's
//! `PhysicsSurfaceProperties`. The tag is derived from the material name:
//! any vocabulary entry contained in the lower-cased name matches.
//!
//! A name can contain several entries (`metal_box_01` contains both `metal`
//! and `metal_box`). The longest entry wins; entries of equal length
//! resolve alphabetically.

use once_cell::sync::Lazy;

/// Tag used when nothing matches
pub const DEFAULT_SURFACE: &str = "default";

/// Surface tags recognized by the engine
pub const SURFACE_TYPES: &[&str] = &[
    "alienflesh", "armorflesh", "asphalt", "audioblocker", "balloon", "beans", "blockbullets",
    "bloodyflesh", "boulder", "brakingrubbertire", "brass_bell_large", "brass_bell_medium",
    "brass_bell_small", "brass_bell_smallest", "brick", "canister", "cardboard", "carpet",
    "chain", "chainlink", "clay", "cloth", "computer", "concrete", "default", "defuser", "dirt",
    "flesh", "foliage", "fruit", "glass", "grass", "grate", "gravel", "ice", "item", "ladder",
    "metal", "metal_barrel", "metal_box", "metalgrate", "metalpanel", "mud", "paintcan", "paper",
    "plaster", "plastic", "player", "popcan", "porcelain", "rock", "rubber", "sand", "slime",
    "snow", "tile", "upholstery", "water", "weapon", "wet", "wood", "wood_box", "wood_crate",
];

/// Vocabulary in match priority order: longest first, then alphabetical
static BY_PRIORITY: Lazy<Vec<&'static str>> = Lazy::new(|| {
    let mut tags = SURFACE_TYPES.to_vec();
    tags.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    tags
});

/// Physics surface tag for a material name
pub fn classify(material_name: &str) -> &'static str {
    let name = material_name.to_lowercase();
    BY_PRIORITY
        .iter()
        .copied()
        .find(|tag| name.contains(tag))
        .unwrap_or(DEFAULT_SURFACE)
}

/// Every tag contained in the name, in match priority order
///
/// More than one entry means the name is ambiguous and [`classify`] applied
/// the tie-break.
pub fn classify_all(material_name: &str) -> Vec<&'static str> {
    let name = material_name.to_lowercase();
    BY_PRIORITY
        .iter()
        .copied()
        .filter(|tag| name.contains(tag))
        .collect()
}

/// Whether `tag` is part of the vocabulary
pub fn is_surface_type(tag: &str) -> bool {
    SURFACE_TYPES.contains(&tag)
}
