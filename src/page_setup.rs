//! Print setup: orientation, paper, margins, header/footer, scaling, page
//! breaks and the print area / print titles defined names.

use crate::cell_ref::{col_to_letter, quote_sheet_name, COL_MAX, ROW_MAX};
use crate::error::{Result, XlsheetError};
use crate::export::xml_writer::{format_number, XmlWriter};
use crate::types::{HeaderFooterOptions, Orientation, PageSetup};
use crate::worksheet::{check_bounds, Worksheet};

/// Longest header or footer string Excel accepts.
pub const HEADER_FOOTER_MAX: usize = 255;
/// Manual page breaks Excel keeps per direction.
pub const MAX_PAGE_BREAKS: usize = 1023;

/// Sort, dedupe and cap page breaks. A break before the first row or
/// column is meaningless and dropped.
pub fn sort_page_breaks(breaks: &[u32]) -> Vec<u32> {
    let mut breaks: Vec<u32> = breaks.iter().copied().filter(|b| *b != 0).collect();
    breaks.sort_unstable();
    breaks.dedup();
    breaks.truncate(MAX_PAGE_BREAKS);
    breaks
}

impl Worksheet {
    pub fn set_landscape(&mut self) {
        self.page.orientation = Orientation::Landscape;
        self.page.page_setup_changed = true;
    }

    pub fn set_portrait(&mut self) {
        self.page.orientation = Orientation::Portrait;
        self.page.page_setup_changed = true;
    }

    /// Excel paper size id. 0 keeps the printer default.
    pub fn set_paper(&mut self, paper_size: u32) {
        if paper_size != 0 {
            self.page.paper_size = paper_size;
            self.page.page_setup_changed = true;
        }
    }

    pub fn center_horizontally(&mut self) {
        self.page.center_horizontally = true;
        self.page.print_options_changed = true;
    }

    pub fn center_vertically(&mut self) {
        self.page.center_vertically = true;
        self.page.print_options_changed = true;
    }

    /// Page margins in inches.
    pub fn set_margins(&mut self, left: f64, right: f64, top: f64, bottom: f64) {
        let margins = &mut self.page.margins;
        margins.left = left;
        margins.right = right;
        margins.top = top;
        margins.bottom = bottom;
    }

    /// Set the page header. `&[Picture]` is stored as Excel's `&G`.
    pub fn set_header(&mut self, header: &str, options: Option<&HeaderFooterOptions>) -> Result<()> {
        let header = header_footer_text(header, "header")?;
        self.page.header = header;
        if let Some(margin) = options.and_then(|o| o.margin) {
            self.page.margins.header = margin;
        }
        self.apply_header_footer_options(options);
        Ok(())
    }

    /// Set the page footer.
    pub fn set_footer(&mut self, footer: &str, options: Option<&HeaderFooterOptions>) -> Result<()> {
        let footer = header_footer_text(footer, "footer")?;
        self.page.footer = footer;
        if let Some(margin) = options.and_then(|o| o.margin) {
            self.page.margins.footer = margin;
        }
        self.apply_header_footer_options(options);
        Ok(())
    }

    fn apply_header_footer_options(&mut self, options: Option<&HeaderFooterOptions>) {
        self.page.header_footer_changed = true;
        let Some(options) = options else {
            return;
        };
        if let Some(scale) = options.scale_with_doc {
            self.page.scale_with_doc = scale;
        }
        if let Some(align) = options.align_with_margins {
            self.page.align_with_margins = align;
        }
    }

    pub fn print_row_col_headers(&mut self) {
        self.page.print_headings = true;
        self.page.print_options_changed = true;
    }

    /// Fit the printout to `width` x `height` pages. 0 leaves that
    /// direction unconstrained.
    pub fn fit_to_pages(&mut self, width: u32, height: u32) {
        self.page.fit_page = true;
        self.page.fit_width = width;
        self.page.fit_height = height;
        self.page.page_setup_changed = true;
    }

    /// Print scale in percent, 10 to 400. Turns fit-to-pages off.
    pub fn set_print_scale(&mut self, scale: u32) -> Result<()> {
        if !(10..=400).contains(&scale) {
            log::warn!("print scale {scale} outside range: 10 <= scale <= 400");
            return Err(XlsheetError::ValueOutOfRange {
                what: "print scale",
                value: f64::from(scale),
                min: 10.0,
                max: 400.0,
            });
        }
        self.page.fit_page = false;
        self.page.scale = scale;
        self.page.page_setup_changed = true;
        Ok(())
    }

    /// First page number of the printout.
    pub fn set_start_page(&mut self, start_page: u32) {
        self.page.first_page_number = Some(start_page);
        self.page.page_setup_changed = true;
    }

    /// Print pages across then down.
    pub fn print_across(&mut self) {
        self.page.across = true;
        self.page.page_setup_changed = true;
    }

    pub fn print_black_and_white(&mut self) {
        self.page.black_and_white = true;
        self.page.page_setup_changed = true;
    }

    /// Manual page breaks before the given zero-indexed rows.
    pub fn set_h_pagebreaks(&mut self, breaks: &[u32]) {
        self.page.row_breaks = breaks.to_vec();
    }

    /// Manual page breaks before the given zero-indexed columns.
    pub fn set_v_pagebreaks(&mut self, breaks: &[u32]) {
        self.page.col_breaks = breaks.to_vec();
    }

    /// Restrict printing to a range. The whole sheet is rejected since it is
    /// the default anyway.
    pub fn print_area(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
    ) -> Result<()> {
        check_bounds(first_row, first_col)?;
        check_bounds(last_row, last_col)?;
        if first_row == 0 && first_col == 0 && last_row == ROW_MAX - 1 && last_col == COL_MAX - 1
        {
            log::warn!("cannot set print area to all cells");
            return Err(XlsheetError::InvalidOption(
                "print area covers every cell".to_string(),
            ));
        }
        self.page.print_area = Some(self.name_area(first_row, first_col, last_row, last_col));
        Ok(())
    }

    /// Rows repeated at the top of each printed page.
    pub fn repeat_rows(&mut self, first_row: u32, last_row: Option<u32>) -> Result<()> {
        let last_row = last_row.unwrap_or(first_row);
        check_bounds(first_row, 0)?;
        check_bounds(last_row, 0)?;
        self.page.repeat_rows = Some(format!(
            "{}!${}:${}",
            quote_sheet_name(&self.options.name),
            first_row + 1,
            last_row + 1
        ));
        Ok(())
    }

    /// Columns repeated at the left of each printed page.
    pub fn repeat_columns(&mut self, first_col: u32, last_col: Option<u32>) -> Result<()> {
        let last_col = last_col.unwrap_or(first_col);
        check_bounds(0, first_col)?;
        check_bounds(0, last_col)?;
        self.page.repeat_cols = Some(format!(
            "{}!${}:${}",
            quote_sheet_name(&self.options.name),
            col_to_letter(first_col),
            col_to_letter(last_col)
        ));
        Ok(())
    }

    /// Defined name value of a range: whole rows and whole columns drop the
    /// other axis.
    fn name_area(&self, first_row: u32, first_col: u32, last_row: u32, last_col: u32) -> String {
        let (start, end, axis_only) = if first_row == 0 && last_row == ROW_MAX - 1 {
            (
                format!("${}", col_to_letter(first_col)),
                format!("${}", col_to_letter(last_col)),
                true,
            )
        } else if first_col == 0 && last_col == COL_MAX - 1 {
            (format!("${}", first_row + 1), format!("${}", last_row + 1), true)
        } else {
            (
                format!("${}${}", col_to_letter(first_col), first_row + 1),
                format!("${}${}", col_to_letter(last_col), last_row + 1),
                false,
            )
        };
        let area = if start == end && !axis_only {
            start
        } else {
            format!("{start}:{end}")
        };
        format!("{}!{}", quote_sheet_name(&self.options.name), area)
    }
}

fn header_footer_text(text: &str, what: &'static str) -> Result<String> {
    let text = text.replace("&[Picture]", "&G");
    if text.chars().count() > HEADER_FOOTER_MAX {
        log::warn!("{what} string cannot be longer than Excel's limit of 255 characters");
        return Err(XlsheetError::StringTooLong {
            what,
            limit: HEADER_FOOTER_MAX,
        });
    }
    Ok(text)
}

/// `<printOptions>`.
pub(crate) fn write_print_options(out: &mut XmlWriter, page: &PageSetup) {
    if !page.print_options_changed {
        return;
    }
    let mut attrs = Vec::new();
    if page.center_horizontally {
        attrs.push(("horizontalCentered", "1".to_string()));
    }
    if page.center_vertically {
        attrs.push(("verticalCentered", "1".to_string()));
    }
    if page.print_headings {
        attrs.push(("headings", "1".to_string()));
    }
    if page.print_gridlines {
        attrs.push(("gridLines", "1".to_string()));
    }
    out.empty_tag("printOptions", &attrs);
}

/// `<pageMargins>`, always written.
pub(crate) fn write_page_margins(out: &mut XmlWriter, page: &PageSetup) {
    let m = &page.margins;
    out.empty_tag(
        "pageMargins",
        &[
            ("left", format_number(m.left)),
            ("right", format_number(m.right)),
            ("top", format_number(m.top)),
            ("bottom", format_number(m.bottom)),
            ("header", format_number(m.header)),
            ("footer", format_number(m.footer)),
        ],
    );
}

/// `<pageSetup>`.
pub(crate) fn write_page_setup(out: &mut XmlWriter, page: &PageSetup) {
    if !page.page_setup_changed {
        return;
    }
    let mut attrs = Vec::new();
    if page.paper_size != 0 {
        attrs.push(("paperSize", page.paper_size.to_string()));
    }
    if page.scale != 100 {
        attrs.push(("scale", page.scale.to_string()));
    }
    if page.fit_page && page.fit_width != 1 {
        attrs.push(("fitToWidth", page.fit_width.to_string()));
    }
    if page.fit_page && page.fit_height != 1 {
        attrs.push(("fitToHeight", page.fit_height.to_string()));
    }
    if page.across {
        attrs.push(("pageOrder", "overThenDown".to_string()));
    }
    if let Some(first) = page.first_page_number.filter(|n| *n > 1) {
        attrs.push(("firstPageNumber", first.to_string()));
    }
    let orientation = match page.orientation {
        Orientation::Portrait => "portrait",
        Orientation::Landscape => "landscape",
    };
    attrs.push(("orientation", orientation.to_string()));
    if page.black_and_white {
        attrs.push(("blackAndWhite", "1".to_string()));
    }
    if page.first_page_number.is_some_and(|n| n != 0) {
        attrs.push(("useFirstPageNumber", "1".to_string()));
    }
    out.empty_tag("pageSetup", &attrs);
}

/// `<headerFooter>`.
pub(crate) fn write_header_footer(out: &mut XmlWriter, page: &PageSetup, excel2003_style: bool) {
    let mut attrs = Vec::new();
    if !page.scale_with_doc {
        attrs.push(("scaleWithDoc", "0".to_string()));
    }
    if !page.align_with_margins {
        attrs.push(("alignWithMargins", "0".to_string()));
    }
    if page.header_footer_changed {
        out.start_tag("headerFooter", &attrs);
        if !page.header.is_empty() {
            out.data_element("oddHeader", &page.header, &[]);
        }
        if !page.footer.is_empty() {
            out.data_element("oddFooter", &page.footer, &[]);
        }
        out.end_tag("headerFooter");
    } else if excel2003_style {
        out.empty_tag("headerFooter", &attrs);
    }
}

/// `<rowBreaks>`.
pub(crate) fn write_row_breaks(out: &mut XmlWriter, page: &PageSetup) {
    write_breaks(out, "rowBreaks", &page.row_breaks, COL_MAX - 1);
}

/// `<colBreaks>`.
pub(crate) fn write_col_breaks(out: &mut XmlWriter, page: &PageSetup) {
    write_breaks(out, "colBreaks", &page.col_breaks, ROW_MAX - 1);
}

fn write_breaks(out: &mut XmlWriter, tag: &str, breaks: &[u32], max: u32) {
    let breaks = sort_page_breaks(breaks);
    if breaks.is_empty() {
        return;
    }
    let count = breaks.len().to_string();
    out.start_tag(tag, &[("count", count.clone()), ("manualBreakCount", count)]);
    for id in breaks {
        out.empty_tag(
            "brk",
            &[
                ("id", id.to_string()),
                ("max", max.to_string()),
                ("man", "1".to_string()),
            ],
        );
    }
    out.end_tag(tag);
}
