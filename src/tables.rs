//! Worksheet tables (ListObjects).
//!
//! `add_table` writes the header, data, formula and total cells into the
//! sheet and keeps a [`Table`] record that is serialized as its own
//! `xl/tables/tableN.xml` part and referenced from `<tableParts>`.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::cell_ref::CellRange;
use crate::error::{Result, XlsheetError};
use crate::export::XmlWriter;
use crate::format::Format;
use crate::formula::prepare_formula;
use crate::hyperlinks::MAX_HYPERLINKS;
use crate::namespaces::NS_SPREADSHEET;
use crate::types::{total_cached_value, Table, TableColumn, TableOptions, TotalFunction};
use crate::worksheet::{check_bounds, Worksheet};

const DEFAULT_STYLE: &str = "TableStyleMedium9";

struct NameRules {
    valid: Regex,
    cell_like: Regex,
    r1c1_like: Regex,
}

fn name_rules() -> &'static NameRules {
    static RULES: OnceLock<NameRules> = OnceLock::new();
    #[allow(clippy::expect_used)]
    RULES.get_or_init(|| NameRules {
        valid: Regex::new(r"^[\w\\][\w\\.]*$").expect("valid table name regex"),
        cell_like: Regex::new(r"^[a-zA-Z][a-zA-Z]?[a-dA-D]?\d+$").expect("valid cell name regex"),
        r1c1_like: Regex::new(r"^[rcRC]$|^[rcRC]\d+[rcRC]\d+$").expect("valid r1c1 regex"),
    })
}

/// Check a user supplied table name against Excel's defined name rules.
pub fn validate_table_name(name: &str) -> Result<()> {
    let rules = name_rules();
    let problem = if name.contains(' ') {
        Some("cannot contain spaces")
    } else if !rules.valid.is_match(name) || name.starts_with(|c: char| c.is_ascii_digit()) {
        Some("contains invalid characters")
    } else if rules.cell_like.is_match(name) {
        Some("looks like a cell reference")
    } else if rules.r1c1_like.is_match(name) {
        Some("looks like an R1C1 reference")
    } else {
        None
    };
    match problem {
        Some(problem) => {
            log::warn!("table name '{name}' {problem}");
            Err(XlsheetError::InvalidOption(format!(
                "table name '{name}' {problem}"
            )))
        }
        None => Ok(()),
    }
}

/// `SUBTOTAL(n,[Column])` with the column name escaped for a structured
/// reference.
fn subtotal_formula(code: u32, column: &str) -> String {
    let escaped = column
        .replace('\'', "''")
        .replace('#', "'#")
        .replace(']', "']")
        .replace('[', "'[");
    format!("SUBTOTAL({code},[{escaped}])")
}

impl Worksheet {
    /// Add a table over a range. The first row is the header unless
    /// `header_row` is off and the last row holds totals when `total_row`
    /// is on; at least one data row must remain.
    pub fn add_table(
        &mut self,
        first_row: u32,
        first_col: u32,
        last_row: u32,
        last_col: u32,
        options: &TableOptions,
    ) -> Result<()> {
        if self.is_streaming() {
            log::warn!("add_table() isn't supported in constant memory mode");
            return Err(XlsheetError::Unsupported("add_table"));
        }
        check_bounds(first_row, first_col)?;
        check_bounds(last_row, last_col)?;
        let range = CellRange::new(first_row, first_col, last_row, last_col);
        self.check_overlap(&range)?;

        let header_row = options.header_row.unwrap_or(true);
        let total_row = options.total_row;
        let data_rows = i64::from(range.last_row) - i64::from(range.first_row)
            - i64::from(header_row)
            - i64::from(total_row);
        if data_rows < 0 {
            log::warn!("add_table() needs at least one data row");
            return Err(XlsheetError::Conflict(
                "table must have at least one data row".to_string(),
            ));
        }

        if let Some(name) = &options.name {
            validate_table_name(name)?;
        }
        let style = match &options.style {
            Some(style) => style.replace(' ', ""),
            None => DEFAULT_STYLE.to_string(),
        };

        let first_data_row = range.first_row + u32::from(header_row);
        let last_data_row = if total_row {
            range.last_row.saturating_sub(1)
        } else {
            range.last_row
        };
        let autofilter = (header_row && options.autofilter.unwrap_or(true)).then(|| {
            CellRange::new(range.first_row, range.first_col, last_data_row, range.last_col).name()
        });

        // Resolve every column before touching any cell.
        let mut seen = HashSet::new();
        let mut columns = Vec::new();
        let mut col_formats: Vec<Option<&Format>> = Vec::new();
        let mut totals: Vec<Option<(String, Option<f64>)>> = Vec::new();
        for (index, col) in (range.first_col..=range.last_col).enumerate() {
            let id = col - range.first_col + 1;
            let user = options.columns.get(index);
            let mut column = TableColumn {
                id,
                name: format!("Column{id}"),
                total_string: None,
                total_function: None,
                formula: None,
                dxf: None,
            };
            let mut total = None;
            if let Some(user) = user {
                if let Some(header) = user.header.as_ref().filter(|h| !h.is_empty()) {
                    column.name = header.clone();
                }
                if !seen.insert(column.name.to_lowercase()) {
                    log::warn!("duplicate header name '{}' in add_table()", column.name);
                    return Err(XlsheetError::Conflict(format!(
                        "duplicate table header name '{}'",
                        column.name
                    )));
                }
                if let Some(formula) = user
                    .formula
                    .as_ref()
                    .filter(|f| !f.trim_start_matches('=').is_empty())
                {
                    let formula = formula
                        .trim_start_matches('=')
                        .replace('@', "[#This Row],");
                    column.formula = Some(prepare_formula(&formula, true));
                }
                match (&user.total_function, &user.total_string) {
                    (Some(TotalFunction::Custom(custom)), _) => {
                        let formula = prepare_formula(custom, true);
                        if formula.is_empty() {
                            log::warn!("empty total formula for column '{}'", column.name);
                            return Err(XlsheetError::InvalidOption(format!(
                                "total formula of column '{}' can't be empty",
                                column.name
                            )));
                        }
                        column.total_function = Some(TotalFunction::Custom(formula.clone()));
                        total = Some((formula, user.total_value));
                    }
                    (Some(function), _) => {
                        let code = function.subtotal_code().unwrap_or(109);
                        total = Some((subtotal_formula(code, &column.name), user.total_value));
                        column.total_function = Some(function.clone());
                    }
                    (None, Some(label)) if !label.is_empty() => {
                        column.total_string = Some(label.clone());
                    }
                    (None, _) => {}
                }
                column.dxf = user.format.as_ref().map(Format::dxf);
            }
            col_formats.push(user.and_then(|u| u.format.as_ref()));
            totals.push(total);
            columns.push(column);
        }

        // Check every data value too, so a rejected value leaves no cells.
        let mut new_links = 0;
        for (row, values) in (first_data_row..=last_data_row).zip(&options.data) {
            for (col, value) in (range.first_col..=range.last_col).zip(values) {
                if self.check_input(row, col, value)? {
                    new_links += 1;
                }
            }
        }
        if self.hyperlink_count + new_links > MAX_HYPERLINKS {
            log::warn!("add_table() data would exceed {MAX_HYPERLINKS} URLs on one worksheet");
            return Err(XlsheetError::TooManyHyperlinks(MAX_HYPERLINKS));
        }

        for (index, col) in (range.first_col..=range.last_col).enumerate() {
            let (Some(column), Some(format)) = (columns.get(index), col_formats.get(index)) else {
                continue;
            };
            if let Some(Some((formula, value))) = totals.get(index) {
                self.write_formula(
                    range.last_row,
                    col,
                    formula,
                    *format,
                    Some(total_cached_value(*value)),
                )?;
            } else if let Some(label) = &column.total_string {
                self.write_string(range.last_row, col, label, *format)?;
            }
            if header_row {
                let header_format = options
                    .columns
                    .get(index)
                    .and_then(|u| u.header_format.as_ref());
                self.write_string(range.first_row, col, &column.name, header_format)?;
            }
        }

        for (row, values) in (first_data_row..=last_data_row).zip(&options.data) {
            for ((col, value), format) in (range.first_col..=range.last_col)
                .zip(values)
                .zip(&col_formats)
            {
                self.write(row, col, value.clone(), *format)?;
            }
        }

        // Calculated columns overwrite any supplied data.
        for (index, col) in (range.first_col..=range.last_col).enumerate() {
            let Some(formula) = columns.get(index).and_then(|c| c.formula.clone()) else {
                continue;
            };
            let format = col_formats.get(index).copied().flatten();
            for row in first_data_row..=last_data_row {
                self.write_formula(row, col, &formula, format, None)?;
            }
        }

        let id = self.options.table_id_start + u32::try_from(self.tables.len()).unwrap_or(0);
        let name = options.name.clone().unwrap_or_else(|| format!("Table{id}"));
        log::debug!("table '{name}' over {}", range.name());
        self.tables.push(Table {
            id,
            name,
            range,
            autofilter,
            style,
            header_row,
            total_row,
            show_first_col: options.first_column,
            show_last_col: options.last_column,
            show_row_stripes: options.banded_rows.unwrap_or(true),
            show_col_stripes: options.banded_columns,
            columns,
        });
        Ok(())
    }
}

impl Table {
    /// The `xl/tables/tableN.xml` part.
    pub fn to_xml(&self) -> String {
        let mut out = XmlWriter::with_capacity(1024);
        out.declaration();

        let mut attrs = vec![
            ("xmlns", NS_SPREADSHEET.to_string()),
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("displayName", self.name.clone()),
            ("ref", self.range.name()),
        ];
        if !self.header_row {
            attrs.push(("headerRowCount", "0".to_string()));
        }
        if self.total_row {
            attrs.push(("totalsRowCount", "1".to_string()));
        } else {
            attrs.push(("totalsRowShown", "0".to_string()));
        }
        out.start_tag("table", &attrs);

        if let Some(filter) = &self.autofilter {
            out.empty_tag("autoFilter", &[("ref", filter.clone())]);
        }

        out.start_tag("tableColumns", &[("count", self.columns.len().to_string())]);
        for column in &self.columns {
            write_table_column(&mut out, column);
        }
        out.end_tag("tableColumns");

        let mut style = Vec::with_capacity(5);
        if !self.style.is_empty() && self.style != "None" {
            style.push(("name", self.style.clone()));
        }
        let flag = |on: bool| if on { "1" } else { "0" }.to_string();
        style.push(("showFirstColumn", flag(self.show_first_col)));
        style.push(("showLastColumn", flag(self.show_last_col)));
        style.push(("showRowStripes", flag(self.show_row_stripes)));
        style.push(("showColumnStripes", flag(self.show_col_stripes)));
        out.empty_tag("tableStyleInfo", &style);

        out.end_tag("table");
        out.into_string()
    }
}

fn write_table_column(out: &mut XmlWriter, column: &TableColumn) {
    let mut attrs = vec![
        ("id", column.id.to_string()),
        ("name", column.name.clone()),
    ];
    if let Some(label) = &column.total_string {
        attrs.push(("totalsRowLabel", label.clone()));
    } else if let Some(function) = &column.total_function {
        attrs.push(("totalsRowFunction", function.wire().to_string()));
    }
    if let Some(dxf) = column.dxf {
        attrs.push(("dataDxfId", dxf.to_string()));
    }

    let custom = match &column.total_function {
        Some(TotalFunction::Custom(formula)) => Some(formula),
        _ => None,
    };
    if column.formula.is_none() && custom.is_none() {
        out.empty_tag("tableColumn", &attrs);
        return;
    }
    out.start_tag("tableColumn", &attrs);
    if let Some(formula) = &column.formula {
        out.data_element("calculatedColumnFormula", formula, &[]);
    }
    if let Some(formula) = custom {
        out.data_element("totalsRowFormula", formula, &[]);
    }
    out.end_tag("tableColumn");
}

/// `<tableParts>`, one relationship per table from `next_rel_id` on.
/// Returns the next free id.
pub(crate) fn write_table_parts(out: &mut XmlWriter, tables: &[Table], mut next_rel_id: u32) -> u32 {
    if tables.is_empty() {
        return next_rel_id;
    }
    out.start_tag("tableParts", &[("count", tables.len().to_string())]);
    for _ in tables {
        out.empty_tag("tablePart", &[("r:id", format!("rId{next_rel_id}"))]);
        next_rel_id += 1;
    }
    out.end_tag("tableParts");
    next_rel_id
}
