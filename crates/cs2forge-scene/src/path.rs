//! Engine asset path utilities
//!
//! Paths embedded in generated assets are always relative to the engine's
//! asset root and always use forward slashes, whatever the host platform.

/// Namespace every exported material and texture lives under
pub const MATERIALS_DIR: &str = "materials";

/// Normalize an engine-relative asset path
/// - Converts backslashes to forward slashes
/// - Removes redundant separators
/// - Resolves . and .. components
/// - Never starts with /
pub fn normalize_asset_path(path: &str) -> String {
    let path = path.replace('\\', "/");
    let path = path.trim();

    let mut components = Vec::new();

    for component in path.split('/') {
        match component {
            "" | "." => continue,
            ".." => {
                components.pop();
            }
            _ => components.push(component),
        }
    }

    components.join("/")
}

/// Join asset path components
pub fn join_asset_path(base: &str, relative: &str) -> String {
    let base = base.trim_end_matches(['/', '\\']);
    if base.is_empty() {
        return normalize_asset_path(relative);
    }
    normalize_asset_path(&format!("{}/{}", base, relative))
}

/// Last `/`-separated segment of a name
///
/// `"materials/wood"` -> `"wood"`, `"wood"` -> `"wood"`.
pub fn last_segment(name: &str) -> &str {
    match name.rfind('/') {
        Some(pos) => &name[pos + 1..],
        None => name,
    }
}

/// Make a scene item name usable as a file stem
///
/// Characters that are separators or invalid on common filesystems are
/// replaced with `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    match sanitized.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => sanitized,
    }
}

/// Engine-relative path of a file stored in the materials directory
pub fn material_asset_path(stem: &str, extension: &str) -> String {
    join_asset_path(MATERIALS_DIR, &format!("{}.{}", stem, extension))
}
