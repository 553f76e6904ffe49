//! Color vocabulary shared by the analyzers and the mutation engine.
//!
//! Colors are handled as the strings written in the document. Keys are
//! normalised with [`normalize`] (trimmed, ASCII-lowercased) so `#19AEFF` and
//! `#19aeff` count as the same color; no further CSS resolution is done.

/// The fixed reference palette, in canonical order.
pub const REFERENCE_PALETTE: [&str; 5] = ["#19aeff", "#ff4141", "#ffc022", "#5dbb63", "#333333"];

/// Paint keywords that never count as a used color.
pub const EXCLUDED_KEYWORDS: [&str; 3] = ["none", "transparent", "inherit"];

/// Returns the normalised key for a paint value.
pub fn normalize(value: &str) -> String {
    value.trim().to_ascii_lowercase()
}

/// Returns true if `value` is one of [`EXCLUDED_KEYWORDS`] (case-insensitive).
pub fn is_excluded(value: &str) -> bool {
    let key = normalize(value);
    EXCLUDED_KEYWORDS.contains(&key.as_str())
}

/// Returns true if `value` is a member of [`REFERENCE_PALETTE`] (case-insensitive).
pub fn is_palette(value: &str) -> bool {
    let key = normalize(value);
    REFERENCE_PALETTE.contains(&key.as_str())
}

/// Picks a palette entry for an off-palette color.
///
/// The choice is `fnv1a(normalize(value)) mod 5`, which is stable across
/// processes and platforms.
///
/// # Examples
///
/// ```
/// use svg_critic_core::color::{REFERENCE_PALETTE, palette_substitute};
///
/// let pick = palette_substitute("#abcdef");
/// assert!(REFERENCE_PALETTE.contains(&pick));
/// assert_eq!(pick, palette_substitute("#ABCDEF"));
/// ```
pub fn palette_substitute(value: &str) -> &'static str {
    let index = fnv1a(normalize(value).as_bytes()) % REFERENCE_PALETTE.len() as u64;
    REFERENCE_PALETTE[index as usize]
}

/// 64-bit FNV-1a.
fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
    const PRIME: u64 = 0x0000_0100_0000_01b3;

    bytes.iter().fold(OFFSET_BASIS, |hash, byte| {
        (hash ^ u64::from(*byte)).wrapping_mul(PRIME)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  #19AEFF "), "#19aeff");
        assert_eq!(normalize("Red"), "red");
    }

    #[test]
    fn test_is_excluded() {
        assert!(is_excluded("none"));
        assert!(is_excluded("NONE"));
        assert!(is_excluded("Transparent"));
        assert!(is_excluded("inherit"));
        assert!(!is_excluded("#000000"));
    }

    #[test]
    fn test_is_palette() {
        for color in REFERENCE_PALETTE {
            assert!(is_palette(color));
        }
        assert!(is_palette("#5DBB63"));
        assert!(!is_palette("#333"));
        assert!(!is_palette("blue"));
    }

    #[test]
    fn test_fnv1a_known_vectors() {
        assert_eq!(fnv1a(b""), 0xcbf2_9ce4_8422_2325);
        assert_eq!(fnv1a(b"a"), 0xaf63_dc4c_8601_ec8c);
    }

    #[test]
    fn test_palette_substitute_is_stable() {
        let first = palette_substitute("#123456");
        for _ in 0..10 {
            assert_eq!(palette_substitute("#123456"), first);
        }
    }
}
