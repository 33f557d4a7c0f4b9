//! Row/column outline (grouping) settings.
//!
//! Outline levels themselves live on the row and column records written by
//! `set_row` / `set_column`. This module holds the sheet-wide settings:
//! - `<outlinePr>` inside `<sheetPr>`: summary position and auto styles
//! - `showOutlineSymbols` on the sheet view
//! - `outlineLevelRow` / `outlineLevelCol` on `<sheetFormatPr>`

use serde::Serialize;

use crate::export::XmlWriter;
use crate::worksheet::Worksheet;

/// Outline display settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlineSettings {
    /// Outline symbols are shown.
    pub visible: bool,
    /// Summary rows are below detail rows.
    pub summary_below: bool,
    /// Summary columns are right of detail columns.
    pub summary_right: bool,
    /// Apply automatic outline styles.
    pub auto_style: bool,
    /// Settings differ from a fresh sheet.
    pub changed: bool,
    /// Highest row outline level in use.
    pub row_level: u8,
    /// Highest column outline level in use.
    pub col_level: u8,
}

impl Default for OutlineSettings {
    fn default() -> Self {
        Self {
            visible: true,
            summary_below: true,
            summary_right: true,
            auto_style: false,
            changed: false,
            row_level: 0,
            col_level: 0,
        }
    }
}

/// Outline levels are clamped to 0..=7.
pub const MAX_OUTLINE_LEVEL: u8 = 7;

pub(crate) fn clamp_level(level: u8) -> u8 {
    level.min(MAX_OUTLINE_LEVEL)
}

impl Worksheet {
    /// Control outline symbol display and summary placement.
    pub fn outline_settings(
        &mut self,
        visible: bool,
        symbols_below: bool,
        symbols_right: bool,
        auto_style: bool,
    ) {
        let outline = &mut self.layout.outline;
        outline.visible = visible;
        outline.summary_below = symbols_below;
        outline.summary_right = symbols_right;
        outline.auto_style = auto_style;
        outline.changed = true;
    }

    pub fn outline(&self) -> &OutlineSettings {
        &self.layout.outline
    }
}

/// `<outlinePr>`, only when the settings were changed.
pub(crate) fn write_outline_pr(out: &mut XmlWriter, outline: &OutlineSettings) {
    if !outline.changed {
        return;
    }
    let mut attrs = Vec::new();
    if outline.auto_style {
        attrs.push(("applyStyles", "1".to_string()));
    }
    if !outline.summary_below {
        attrs.push(("summaryBelow", "0".to_string()));
    }
    if !outline.summary_right {
        attrs.push(("summaryRight", "0".to_string()));
    }
    if !outline.visible {
        attrs.push(("showOutlineSymbols", "0".to_string()));
    }
    out.empty_tag("outlinePr", &attrs);
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;
    use crate::types::RowColOptions;
    use quick_xml::events::{BytesStart, Event};
    use quick_xml::Reader;

    fn parse_element(xml: &str) -> BytesStart<'static> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e) | Event::Empty(e)) => {
                    return e.into_owned();
                }
                Ok(Event::Eof) => panic!("Unexpected EOF"),
                Err(e) => panic!("Error: {e}"),
                _ => {}
            }
        }
    }

    fn attr(e: &BytesStart<'_>, key: &str) -> Option<String> {
        e.attributes()
            .flatten()
            .find(|a| a.key.as_ref() == key.as_bytes())
            .map(|a| String::from_utf8_lossy(&a.value).into_owned())
    }

    #[test]
    fn test_unchanged_settings_write_nothing() {
        let mut out = XmlWriter::new();
        write_outline_pr(&mut out, &OutlineSettings::default());
        assert!(out.is_empty());
    }

    #[test]
    fn test_outline_pr_summary_above_left() {
        let mut ws = Worksheet::new(WorksheetOptions::default()).unwrap();
        ws.outline_settings(false, false, false, true);
        let mut out = XmlWriter::new();
        write_outline_pr(&mut out, ws.outline());

        let e = parse_element(out.as_str());
        assert_eq!(e.name().as_ref(), b"outlinePr");
        assert_eq!(attr(&e, "applyStyles").as_deref(), Some("1"));
        assert_eq!(attr(&e, "summaryBelow").as_deref(), Some("0"));
        assert_eq!(attr(&e, "summaryRight").as_deref(), Some("0"));
        assert_eq!(attr(&e, "showOutlineSymbols").as_deref(), Some("0"));
    }

    #[test]
    fn test_levels_are_clamped_and_tracked() {
        let mut ws = Worksheet::new(WorksheetOptions::default()).unwrap();
        let opts = RowColOptions {
            level: 9,
            ..RowColOptions::default()
        };
        ws.set_row(4, None, None, Some(&opts)).unwrap();
        assert_eq!(ws.outline().row_level, 7);
        ws.set_column(1, 2, None, None, Some(&RowColOptions {
            level: 2,
            ..RowColOptions::default()
        }))
        .unwrap();
        assert_eq!(ws.outline().col_level, 2);
    }
}
