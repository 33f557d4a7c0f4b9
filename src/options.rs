//! Worksheet construction options and the closed keyword sets used by the
//! per-call option blocks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Construction-time switches for a worksheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorksheetOptions {
    /// Sheet name used in formulas, sparkline ranges and defined names.
    pub name: String,
    /// Spill rows to a temporary file as they complete (rows must arrive in order).
    pub constant_memory: bool,
    /// `write()` converts numeric looking strings to numbers.
    pub strings_to_numbers: bool,
    /// `write()` treats strings starting with `=` as formulas.
    pub strings_to_formulas: bool,
    /// `write()` treats URL-like strings as hyperlinks.
    pub strings_to_urls: bool,
    /// NaN and infinities become Excel error formulas instead of errors.
    pub nan_inf_to_errors: bool,
    /// Add `_xlfn.` to post-2010 functions in formulas.
    pub use_future_functions: bool,
    /// Dates use the 1904 epoch.
    pub date_1904: bool,
    /// Maximum escaped URL and anchor length.
    pub max_url_length: usize,
    /// Style index applied to datetimes written without a format.
    pub default_date_xf: Option<u32>,
    /// Style index applied to hyperlinks written without a format.
    pub default_url_xf: Option<u32>,
    /// Excel 2003 defaults for margins, header/footer and rich string runs.
    pub excel2003_style: bool,
    /// First id handed to tables added to this sheet.
    pub table_id_start: u32,
}

impl Default for WorksheetOptions {
    fn default() -> Self {
        Self {
            name: "Sheet1".to_string(),
            constant_memory: false,
            strings_to_numbers: false,
            strings_to_formulas: true,
            strings_to_urls: true,
            nan_inf_to_errors: false,
            use_future_functions: false,
            date_1904: false,
            max_url_length: 255,
            default_date_xf: None,
            default_url_xf: None,
            excel2003_style: false,
            table_id_start: 1,
        }
    }
}

impl WorksheetOptions {
    /// Decode options from JSON. Unknown keys are rejected.
    pub fn from_json(json: &str) -> Result<Self> {
        from_json(json)
    }
}

/// Decode any option block from JSON.
pub fn from_json<T: DeserializeOwned>(json: &str) -> Result<T> {
    Ok(serde_json::from_str(json)?)
}

/// Declare a closed keyword set: `FromStr` over the accepted spellings
/// (case-insensitive), `wire()` for the OOXML keyword, and serde support
/// through the same spellings.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($(#[$vmeta:meta])* $variant:ident => $wire:literal : [$($spelling:literal),+]),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "&'static str")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            /// Keyword written to the worksheet XML.
            pub const fn wire(self) -> &'static str {
                match self {
                    $(Self::$variant => $wire),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::XlsheetError;

            fn from_str(s: &str) -> $crate::error::Result<Self> {
                let key = s.trim().to_ascii_lowercase();
                match key.as_str() {
                    $($($spelling)|+ => Ok(Self::$variant),)+
                    _ => Err($crate::error::XlsheetError::unknown($kind, s)),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::error::XlsheetError;

            fn try_from(s: String) -> $crate::error::Result<Self> {
                s.parse()
            }
        }

        impl From<$name> for &'static str {
            fn from(v: $name) -> Self {
                v.wire()
            }
        }
    };
}

pub(crate) use keyword_enum;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    keyword_enum! {
        Fruit, "fruit" {
            Apple => "apple" : ["apple", "pomme"],
            Pear => "pear" : ["pear"],
        }
    }

    #[test]
    fn test_defaults() {
        let opts = WorksheetOptions::default();
        assert!(opts.strings_to_formulas);
        assert!(opts.strings_to_urls);
        assert!(!opts.strings_to_numbers);
        assert_eq!(opts.max_url_length, 255);
    }

    #[test]
    fn test_from_json() {
        let opts =
            WorksheetOptions::from_json(r#"{"constant_memory": true, "name": "Data"}"#).unwrap();
        assert!(opts.constant_memory);
        assert_eq!(opts.name, "Data");
        assert!(opts.strings_to_urls);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = WorksheetOptions::from_json(r#"{"constant_memroy": true}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_keyword_enum() {
        assert_eq!("POMME".parse::<Fruit>().unwrap(), Fruit::Apple);
        assert_eq!(Fruit::Pear.wire(), "pear");
        assert!("plum".parse::<Fruit>().is_err());
        let f: Fruit = serde_json::from_str(r#""Apple""#).unwrap();
        assert_eq!(f, Fruit::Apple);
        assert_eq!(serde_json::to_string(&Fruit::Apple).unwrap(), r#""apple""#);
    }
}
