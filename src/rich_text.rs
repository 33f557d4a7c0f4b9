//! Rich strings: one cell holding several differently formatted runs.
//!
//! The runs are serialized once into `<r>` markup and stored like any other
//! string, shared or inline depending on the sink:
//!
//! ```xml
//! <r><t>plain </t></r>
//! <r>
//!   <rPr><b/><sz val="11"/><color theme="1"/><rFont val="Calibri"/>
//!        <family val="2"/><scheme val="minor"/></rPr>
//!   <t>bold</t>
//! </r>
//! ```

use crate::cell_ref::cell_name;
use crate::color::to_argb;
use crate::error::{Result, WriteStatus, XlsheetError};
use crate::export::sheet_data::needs_preserve;
use crate::export::{format_number, XmlWriter};
use crate::format::{FontScript, Format, Underline};
use crate::types::{CellValue, RichRun, RichToken};
use crate::worksheet::{check_bounds, Worksheet, STRING_MAX};

impl Worksheet {
    /// Write a string made of formatted fragments.
    ///
    /// `tokens` alternate between optional formats and text fragments; a
    /// format applies to the fragment after it. A trailing format is used as
    /// the cell format.
    pub fn write_rich_string(
        &mut self,
        row: u32,
        col: u32,
        tokens: &[RichToken<'_>],
    ) -> Result<WriteStatus> {
        check_bounds(row, col)?;

        let (tokens, cell_format) = match tokens.split_last() {
            Some((RichToken::Format(format), rest)) => (rest, Some(*format)),
            _ => (tokens, None),
        };

        let default = Format::default();
        let runs = split_runs(tokens, &default)?;

        let raw_len: usize = runs.iter().map(|run| run.text.chars().count()).sum();
        if raw_len > STRING_MAX {
            log::warn!(
                "rich string at {} exceeds {STRING_MAX} characters",
                cell_name(row, col)
            );
            return Err(XlsheetError::StringTooLong {
                what: "rich string",
                limit: STRING_MAX,
            });
        }

        let fragment = runs_to_xml(&runs, self.options.excel2003_style)?;

        self.check_dimensions(row, col, false, false)?;
        let string = self.sink.rich_string_ref(&self.sst, fragment);
        self.store(
            row,
            col,
            CellValue::String {
                string,
                xf: cell_format.map(Format::xf),
            },
        )?;
        Ok(WriteStatus::Complete)
    }
}

/// Pair every fragment with the format in front of it. Only a leading
/// fragment may go without one; later bare fragments get the default font.
fn split_runs<'a>(tokens: &[RichToken<'a>], default: &'a Format) -> Result<Vec<RichRun<'a>>> {
    if tokens.len() <= 2 {
        log::warn!("a rich string needs more than 2 format/fragment tokens");
        return Err(XlsheetError::Conflict(
            "rich strings need more than 2 format/fragment tokens".to_string(),
        ));
    }

    let mut runs = Vec::with_capacity(tokens.len());
    let mut pending: Option<&Format> = None;
    for (pos, token) in tokens.iter().enumerate() {
        match token {
            RichToken::Format(format) => {
                if pending.is_some() {
                    log::warn!("Excel doesn't allow 2 consecutive formats in a rich string");
                    return Err(XlsheetError::Conflict(
                        "consecutive formats in rich string".to_string(),
                    ));
                }
                pending = Some(*format);
            }
            RichToken::Text(text) => {
                if text.is_empty() {
                    log::warn!("Excel doesn't allow empty strings in rich strings");
                    return Err(XlsheetError::Conflict(
                        "empty fragment in rich string".to_string(),
                    ));
                }
                let format = match pending.take() {
                    Some(format) => Some(format),
                    None if pos == 0 => None,
                    None => Some(default),
                };
                runs.push(RichRun { format, text });
            }
        }
    }
    Ok(runs)
}

fn runs_to_xml(runs: &[RichRun<'_>], excel2003_style: bool) -> Result<String> {
    let mut out = XmlWriter::with_capacity(256);
    for run in runs {
        out.start_tag("r", &[]);
        if let Some(format) = run.format {
            write_run_properties(&mut out, format, excel2003_style)?;
        }
        let attrs = if needs_preserve(run.text) {
            vec![("xml:space", "preserve".to_string())]
        } else {
            Vec::new()
        };
        out.data_element("t", run.text, &attrs);
        out.end_tag("r");
    }
    Ok(out.into_string())
}

/// `<rPr>` of one run.
fn write_run_properties(out: &mut XmlWriter, format: &Format, excel2003_style: bool) -> Result<()> {
    out.start_tag("rPr", &[]);
    if format.bold {
        out.empty_tag("b", &[]);
    }
    if format.italic {
        out.empty_tag("i", &[]);
    }
    if format.strikeout {
        out.empty_tag("strike", &[]);
    }
    if format.outline {
        out.empty_tag("outline", &[]);
    }
    if format.shadow {
        out.empty_tag("shadow", &[]);
    }
    match format.underline {
        Underline::None => {}
        Underline::Single => out.empty_tag("u", &[]),
        Underline::Double => out.empty_tag("u", &[("val", "double".to_string())]),
        Underline::SingleAccounting => {
            out.empty_tag("u", &[("val", "singleAccounting".to_string())]);
        }
        Underline::DoubleAccounting => {
            out.empty_tag("u", &[("val", "doubleAccounting".to_string())]);
        }
    }
    match format.script {
        FontScript::Baseline => {}
        FontScript::Superscript => out.empty_tag("vertAlign", &[("val", "superscript".to_string())]),
        FontScript::Subscript => out.empty_tag("vertAlign", &[("val", "subscript".to_string())]),
    }
    out.empty_tag("sz", &[("val", format_number(format.font_size))]);

    if !excel2003_style {
        let color = match (format.theme, format.color_indexed, &format.font_color) {
            (Some(theme), _, _) if theme > 0 => ("theme", theme.to_string()),
            (_, Some(indexed), _) if indexed > 0 => ("indexed", indexed.to_string()),
            (_, _, Some(color)) => ("rgb", to_argb(color)?),
            _ => ("theme", "1".to_string()),
        };
        out.empty_tag("color", &[color]);
    }

    out.empty_tag("rFont", &[("val", format.font_name.clone())]);
    out.empty_tag("family", &[("val", format.font_family.to_string())]);
    if format.font_name == "Calibri" && !format.hyperlink {
        out.empty_tag("scheme", &[("val", format.font_scheme.clone())]);
    }
    out.end_tag("rPr");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;
    use crate::types::StringRef;
    use pretty_assertions::assert_eq;

    const DEFAULT_RPR: &str = "<sz val=\"11\"/><color theme=\"1\"/><rFont val=\"Calibri\"/>\
                               <family val=\"2\"/><scheme val=\"minor\"/></rPr>";

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    #[test]
    fn test_rich_string_markup() {
        let mut ws = sheet();
        let bold = Format::new().set_bold();
        let italic = Format::new().set_italic();
        let tokens = [
            RichToken::Text("This is "),
            RichToken::Format(&bold),
            RichToken::Text("bold"),
            RichToken::Text(" and this is "),
            RichToken::Format(&italic),
            RichToken::Text("italic"),
        ];
        assert_eq!(ws.write_rich_string(0, 0, &tokens).unwrap(), WriteStatus::Complete);

        let expected = format!(
            "<r><t xml:space=\"preserve\">This is </t></r>\
             <r><rPr><b/>{DEFAULT_RPR}<t>bold</t></r>\
             <r><rPr>{DEFAULT_RPR}<t xml:space=\"preserve\"> and this is </t></r>\
             <r><rPr><i/>{DEFAULT_RPR}<t>italic</t></r>"
        );
        assert_eq!(ws.cell_text(0, 0).unwrap(), expected);
    }

    #[test]
    fn test_trailing_format_is_cell_format() {
        let mut ws = sheet();
        let bold = Format::new().set_bold();
        let cell = Format::with_xf(4);
        let tokens = [
            RichToken::Text("a"),
            RichToken::Format(&bold),
            RichToken::Text("b"),
            RichToken::Format(&cell),
        ];
        ws.write_rich_string(1, 1, &tokens).unwrap();
        assert_eq!(ws.cell(1, 1).and_then(CellValue::xf), Some(4));
    }

    #[test]
    fn test_font_properties() {
        let fancy = Format::new()
            .set_underline(Underline::Double)
            .set_font_script(FontScript::Superscript)
            .set_font_size(14.5)
            .set_font_color("red")
            .set_font_name("Arial");
        let mut out = XmlWriter::new();
        write_run_properties(&mut out, &fancy, false).unwrap();
        assert_eq!(
            out.as_str(),
            "<rPr><u val=\"double\"/><vertAlign val=\"superscript\"/><sz val=\"14.5\"/>\
             <color rgb=\"FFFF0000\"/><rFont val=\"Arial\"/><family val=\"2\"/></rPr>"
        );
    }

    #[test]
    fn test_too_few_tokens() {
        let mut ws = sheet();
        let bold = Format::new().set_bold();
        let err = ws
            .write_rich_string(0, 0, &[RichToken::Format(&bold), RichToken::Text("x")])
            .unwrap_err();
        assert!(matches!(err, XlsheetError::Conflict(_)));
        assert_eq!(ws.dimensions().rows(), None);
    }

    #[test]
    fn test_consecutive_formats() {
        let mut ws = sheet();
        let bold = Format::new().set_bold();
        let tokens = [
            RichToken::Text("a"),
            RichToken::Format(&bold),
            RichToken::Format(&bold),
            RichToken::Text("b"),
        ];
        assert!(matches!(
            ws.write_rich_string(0, 0, &tokens),
            Err(XlsheetError::Conflict(_))
        ));
    }

    #[test]
    fn test_empty_fragment() {
        let mut ws = sheet();
        let bold = Format::new().set_bold();
        let tokens = [RichToken::Text("a"), RichToken::Format(&bold), RichToken::Text("")];
        assert!(ws.write_rich_string(0, 0, &tokens).is_err());
        assert!(ws.cell(0, 0).is_none());
    }

    #[test]
    fn test_streaming_stores_inline_markup() {
        let mut ws = Worksheet::new(WorksheetOptions {
            constant_memory: true,
            ..WorksheetOptions::default()
        })
        .unwrap();
        let bold = Format::new().set_bold();
        let tokens = [RichToken::Text("a"), RichToken::Format(&bold), RichToken::Text("b")];
        ws.write_rich_string(0, 0, &tokens).unwrap();
        match ws.cell(0, 0) {
            Some(CellValue::String {
                string: StringRef::InlineRich(markup),
                ..
            }) => assert!(markup.starts_with("<r><t>a</t></r><r><rPr><b/>")),
            other => panic!("unexpected cell {other:?}"),
        }
    }
}
