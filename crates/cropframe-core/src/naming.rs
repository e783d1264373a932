//! Output file naming.
//!
//! Exports are named in one of three ways, in priority order:
//! - the name the user typed (pre-filled with the source file stem on load)
//! - a slug of the selected place name, which replaces the typed name
//! - `<source stem>_<unix seconds>` when the name field was left empty
//!
//! Every export is written as WebP, so the extension is always `.webp`.

/// Extension appended to every export.
pub const OUTPUT_EXTENSION: &str = "webp";

/// Strip the last extension from a file name: `"IMG_01.final.jpg"` →
/// `"IMG_01.final"`. Names without an extension are returned unchanged.
pub fn file_stem(display_name: &str) -> &str {
    match display_name.rfind('.') {
        Some(pos) if pos > 0 && !display_name[pos + 1..].is_empty() => &display_name[..pos],
        _ => display_name,
    }
}

/// Lowercase slug: runs of anything but `a-z0-9` become a single `-`, and
/// leading/trailing dashes are dropped.
///
/// - `"Lake Tekapo"` → `"lake-tekapo"`
/// - `"  Mt. Cook / Aoraki!"` → `"mt-cook-aoraki"`
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Final output file name.
///
/// `requested` is the trimmed name field; when it is empty the file is
/// named after `source_stem` and `unix_seconds`.
pub fn output_file_name(requested: &str, source_stem: &str, unix_seconds: u64) -> String {
    let requested = requested.trim();
    if requested.is_empty() {
        format!("{source_stem}_{unix_seconds}.{OUTPUT_EXTENSION}")
    } else {
        format!("{requested}.{OUTPUT_EXTENSION}")
    }
}
