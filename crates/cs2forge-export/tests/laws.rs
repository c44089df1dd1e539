use cs2forge_core::ImageSize;
use cs2forge_export::surface::{classify, classify_all, is_surface_type};
use cs2forge_export::textures::normalize_dimensions;
use cs2forge_scene::material::{is_prefixed, prefixed_name};
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalized_dimensions_are_block_aligned(w in 1u32..10_000, h in 1u32..10_000) {
        let size = normalize_dimensions(ImageSize::new(w, h));
        prop_assert_eq!(size.width % 4, 0);
        prop_assert_eq!(size.height % 4, 0);
        prop_assert!(size.width >= 4 && size.height >= 4);
        prop_assert!(size.width <= w.max(4) && size.height <= h.max(4));
        prop_assert_eq!(normalize_dimensions(size), size);
    }

    #[test]
    fn classify_is_total(name in "\\PC{0,40}") {
        let tag = classify(&name);
        prop_assert!(is_surface_type(tag));
        let all = classify_all(&name);
        match all.first() {
            Some(first) => prop_assert_eq!(*first, tag),
            None => prop_assert_eq!(tag, "default"),
        }
    }

    #[test]
    fn classify_ignores_case(name in "[a-zA-Z_]{0,24}") {
        prop_assert_eq!(classify(&name), classify(&name.to_uppercase()));
    }

    #[test]
    fn prefixing_is_idempotent(name in "[a-zA-Z0-9_/ ]{0,32}") {
        let once = prefixed_name(&name).unwrap_or_else(|| name.clone());
        prop_assert!(is_prefixed(&once));
        prop_assert_eq!(prefixed_name(&once), None);
    }
}
