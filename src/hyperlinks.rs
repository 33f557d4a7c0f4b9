//! Cell hyperlinks.
//!
//! `write_url` stores the display string as an ordinary string cell and the
//! link itself in a side table. External links are written with a
//! relationship id (`r:id`), internal links with a `location` only.

use std::sync::OnceLock;

use regex::Regex;

use crate::cell_ref::cell_name;
use crate::error::{Result, WriteStatus, XlsheetError};
use crate::export::XmlWriter;
use crate::format::Format;
use crate::types::{CellValue, Hyperlink, LinkType};
use crate::worksheet::{check_bounds, Worksheet, STRING_MAX};

/// Hyperlinks Excel accepts on one worksheet.
pub const MAX_HYPERLINKS: usize = 65_530;

fn escaped_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RE.get_or_init(|| Regex::new("%[0-9a-fA-F]{2}").expect("valid escape regex"))
}

/// Percent-escape the characters Excel escapes in link targets. URLs that
/// already contain an escape are returned unchanged.
pub fn escape_url(url: &str) -> String {
    if escaped_re().is_match(url) {
        return url.to_string();
    }
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        match c {
            '%' => out.push_str("%25"),
            '"' => out.push_str("%22"),
            ' ' => out.push_str("%20"),
            '<' => out.push_str("%3c"),
            '>' => out.push_str("%3e"),
            '[' => out.push_str("%5b"),
            ']' => out.push_str("%5d"),
            '^' => out.push_str("%5e"),
            '`' => out.push_str("%60"),
            '{' => out.push_str("%7b"),
            '}' => out.push_str("%7d"),
            _ => out.push(c),
        }
    }
    out
}

/// Windows drive (`C:`) or network share (`\\server`) path.
fn is_local_path(url: &str) -> bool {
    let mut chars = url.chars();
    match (chars.next(), chars.next()) {
        (Some(c), Some(':')) => c.is_alphanumeric() || c == '_',
        (Some('\\'), _) => true,
        _ => false,
    }
}

impl Worksheet {
    /// Write a hyperlink.
    ///
    /// `url` may be `http(s)://`, `ftp(s)://`, `mailto:`, `internal:` (a
    /// location in this workbook) or `external:` (a local file). `text`
    /// defaults to the URL without its `internal:`/`external:`/`mailto:`
    /// prefix.
    pub fn write_url(
        &mut self,
        row: u32,
        col: u32,
        url: &str,
        format: Option<&Format>,
        text: Option<&str>,
        tip: Option<&str>,
    ) -> Result<WriteStatus> {
        let link = self.prepare_url(row, col, url, text, tip)?;
        self.check_dimensions(row, col, false, false)?;

        let url_format;
        let format = match (format, self.options.default_url_xf) {
            (Some(format), _) => Some(format),
            (None, Some(xf)) => {
                url_format = Format::with_xf(xf);
                Some(&url_format)
            }
            (None, None) => None,
        };
        let status = self.write_string(row, col, &link.display, format)?;

        // Replacing a link keeps the count.
        if self.hyperlinks.entry(row).or_default().insert(col, link).is_none() {
            self.hyperlink_count += 1;
        }
        Ok(status)
    }

    /// Check a URL and build its link without touching the sheet.
    pub(crate) fn prepare_url(
        &self,
        row: u32,
        col: u32,
        url: &str,
        text: Option<&str>,
        tip: Option<&str>,
    ) -> Result<Hyperlink> {
        check_bounds(row, col)?;

        let mut url = url.to_string();
        let mut display = text.unwrap_or(&url).to_string();
        let mut link_type = LinkType::External;
        let mut external_file = false;

        if let Some(target) = url.strip_prefix("internal:") {
            url = target.to_string();
            display = display.replace("internal:", "");
            link_type = LinkType::Internal;
        }
        if let Some(target) = url.strip_prefix("external:") {
            url = target.replace('/', "\\");
            display = display.replace("external:", "").replace('/', "\\");
            external_file = true;
        }
        display = display.replace("mailto:", "");

        if display.chars().count() > STRING_MAX {
            log::warn!(
                "ignoring URL at {}: display string exceeds {STRING_MAX} characters",
                cell_name(row, col)
            );
            return Err(XlsheetError::StringTooLong {
                what: "hyperlink display string",
                limit: STRING_MAX,
            });
        }

        let (target, location) = match link_type {
            LinkType::Internal => (String::new(), Some(url.clone())),
            LinkType::External => {
                let (base, anchor) = match url.split_once('#') {
                    Some((base, anchor)) => (base.to_string(), Some(anchor.to_string())),
                    None => (url.clone(), None),
                };
                let mut base = escape_url(&base);
                let anchor = match anchor {
                    Some(anchor) if !external_file => Some(escape_url(&anchor)),
                    other => other,
                };
                if is_local_path(&base) {
                    base = format!("file:///{base}");
                }
                if let Some(relative) = base.strip_prefix(".\\") {
                    base = relative.to_string();
                }
                (base, anchor)
            }
        };

        // Internal links are checked on their target and display string.
        let max = self.options.max_url_length;
        let (checked, second) = match link_type {
            LinkType::Internal => (&url, Some(&display)),
            LinkType::External => (&target, location.as_ref()),
        };
        let second_len = second.map_or(0, |s| s.chars().count());
        if checked.chars().count() > max || second_len > max {
            log::warn!(
                "ignoring URL '{url}' at {}: longer than {max} characters",
                cell_name(row, col)
            );
            return Err(XlsheetError::UrlTooLong { url, limit: max });
        }

        if self.hyperlink_count >= MAX_HYPERLINKS && self.hyperlink(row, col).is_none() {
            log::warn!("ignoring URL '{url}': more than {MAX_HYPERLINKS} URLs on one worksheet");
            return Err(XlsheetError::TooManyHyperlinks(MAX_HYPERLINKS));
        }

        Ok(Hyperlink {
            link_type,
            url: target,
            location,
            display,
            tip: tip.map(str::to_string),
        })
    }
}

/// `<hyperlinks>`. External links take relationship ids from `next_rel_id`
/// onwards, in row then column order. Returns the next free id.
pub(crate) fn write_hyperlinks(out: &mut XmlWriter, ws: &Worksheet, mut next_rel_id: u32) -> u32 {
    if ws.hyperlinks.values().all(|cols| cols.is_empty()) {
        return next_rel_id;
    }
    out.start_tag("hyperlinks", &[]);
    for (row, cols) in &ws.hyperlinks {
        for (col, link) in cols {
            let mut attrs = vec![("ref", cell_name(*row, *col))];
            match link.link_type {
                LinkType::External => {
                    attrs.push(("r:id", format!("rId{next_rel_id}")));
                    next_rel_id += 1;
                    if let Some(location) = &link.location {
                        attrs.push(("location", location.clone()));
                    }
                    // A cell overwritten with a non-string shows the URL.
                    let is_string = ws
                        .cell(*row, *col)
                        .map_or(true, |cell| matches!(cell, CellValue::String { .. }));
                    if !is_string {
                        attrs.push(("display", link.url.clone()));
                    }
                    if let Some(tip) = &link.tip {
                        attrs.push(("tooltip", tip.clone()));
                    }
                }
                LinkType::Internal => {
                    if let Some(location) = &link.location {
                        attrs.push(("location", location.clone()));
                    }
                    if let Some(tip) = &link.tip {
                        attrs.push(("tooltip", tip.clone()));
                    }
                    attrs.push(("display", link.display.clone()));
                }
            }
            out.empty_tag("hyperlink", &attrs);
        }
    }
    out.end_tag("hyperlinks");
    next_rel_id
}
