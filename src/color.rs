//! Color normalization
//!
//! Worksheet features accept colors as `#RRGGBB` strings or as one of Excel's
//! named colors and write them as `FFRRGGBB` ARGB values.

use crate::error::{Result, XlsheetError};

/// Named colors accepted wherever a color string is expected.
pub const NAMED_COLORS: [(&str, &str); 16] = [
    ("black", "#000000"),
    ("blue", "#0000FF"),
    ("brown", "#800000"),
    ("cyan", "#00FFFF"),
    ("gray", "#808080"),
    ("green", "#008000"),
    ("lime", "#00FF00"),
    ("magenta", "#FF00FF"),
    ("navy", "#000080"),
    ("orange", "#FF6600"),
    ("pink", "#FF00FF"),
    ("purple", "#800080"),
    ("red", "#FF0000"),
    ("silver", "#C0C0C0"),
    ("white", "#FFFFFF"),
    ("yellow", "#FFFF00"),
];

/// Resolve a named color to its `#RRGGBB` form, passing other input through.
pub fn resolve_named(color: &str) -> &str {
    let lower = color.trim().to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map_or(color.trim(), |(_, hex)| *hex)
}

/// Convert `#RRGGBB`, `RRGGBB` or a named color to uppercase `FFRRGGBB`.
pub fn to_argb(color: &str) -> Result<String> {
    let hex = resolve_named(color).trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(XlsheetError::InvalidOption(format!(
            "color '{color}' is not a named color or #RRGGBB value"
        )));
    }
    Ok(format!("FF{}", hex.to_ascii_uppercase()))
}

/// Lowercase `#rrggbb` form used in VML style attributes.
pub fn to_html(color: &str) -> Result<String> {
    let hex = resolve_named(color).trim_start_matches('#');
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(XlsheetError::InvalidOption(format!(
            "color '{color}' is not a named color or #RRGGBB value"
        )));
    }
    Ok(format!("#{}", hex.to_ascii_lowercase()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_to_argb() {
        assert_eq!(to_argb("#ff7128").unwrap(), "FFFF7128");
        assert_eq!(to_argb("638EC6").unwrap(), "FF638EC6");
        assert_eq!(to_argb("red").unwrap(), "FFFF0000");
        assert_eq!(to_argb("Navy").unwrap(), "FF000080");
    }

    #[test]
    fn test_invalid_colors() {
        assert!(to_argb("#12345").is_err());
        assert!(to_argb("chartreuse").is_err());
        assert!(to_argb("#GGGGGG").is_err());
    }

    #[test]
    fn test_to_html() {
        assert_eq!(to_html("#FFFFE1").unwrap(), "#ffffe1");
        assert_eq!(to_html("yellow").unwrap(), "#ffff00");
    }
}
