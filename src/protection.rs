//! Worksheet protection.
//!
//! `protect` turns on `<sheetProtection>`. Which operations stay allowed is
//! controlled by [`ProtectionOptions`]; cells are only locked when their
//! format says so, which is the workbook's business.

use serde::{Deserialize, Serialize};

use crate::export::XmlWriter;
use crate::worksheet::Worksheet;

/// What a protected sheet still allows. `true` means allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProtectionOptions {
    pub sheet: bool,
    pub content: bool,
    pub objects: bool,
    pub scenarios: bool,
    pub format_cells: bool,
    pub format_columns: bool,
    pub format_rows: bool,
    pub insert_columns: bool,
    pub insert_rows: bool,
    pub insert_hyperlinks: bool,
    pub delete_columns: bool,
    pub delete_rows: bool,
    pub select_locked_cells: bool,
    pub sort: bool,
    pub autofilter: bool,
    pub pivot_tables: bool,
    pub select_unlocked_cells: bool,
}

impl Default for ProtectionOptions {
    fn default() -> Self {
        Self {
            sheet: true,
            content: false,
            objects: false,
            scenarios: false,
            format_cells: false,
            format_columns: false,
            format_rows: false,
            insert_columns: false,
            insert_rows: false,
            insert_hyperlinks: false,
            delete_columns: false,
            delete_rows: false,
            select_locked_cells: true,
            sort: false,
            autofilter: false,
            pivot_tables: false,
            select_unlocked_cells: true,
        }
    }
}

/// Protection state of a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Protection {
    /// Hex encoded legacy hash, `None` without a password.
    pub password_hash: Option<String>,
    pub options: ProtectionOptions,
}

/// Excel's legacy 16-bit password hash as uppercase hex.
pub fn encode_password(password: &str) -> String {
    let chars: Vec<u16> = password.encode_utf16().collect();
    let mut hash: u16 = 0;
    for c in chars.iter().rev() {
        hash = ((hash >> 14) & 0x01) | ((hash << 1) & 0x7FFF);
        hash ^= *c;
    }
    hash = ((hash >> 14) & 0x01) | ((hash << 1) & 0x7FFF);
    #[allow(clippy::cast_possible_truncation)]
    let len = chars.len() as u16;
    hash ^= len;
    hash ^= 0xCE4B;
    format!("{hash:X}")
}

impl Worksheet {
    /// Protect the sheet. An empty password protects without one.
    pub fn protect(&mut self, password: &str, options: Option<&ProtectionOptions>) {
        let password_hash = (!password.is_empty()).then(|| encode_password(password));
        self.protection = Some(Protection {
            password_hash,
            options: options.copied().unwrap_or_default(),
        });
    }

    pub fn protection(&self) -> Option<&Protection> {
        self.protection.as_ref()
    }
}

/// `<sheetProtection>`. Locks are written as the operation being denied,
/// so most flags are inverted.
pub(crate) fn write_sheet_protection(out: &mut XmlWriter, protection: Option<&Protection>) {
    let Some(protection) = protection else {
        return;
    };
    let o = &protection.options;
    let mut attrs = Vec::new();
    if let Some(hash) = &protection.password_hash {
        attrs.push(("password", hash.clone()));
    }
    let flags = [
        ("sheet", o.sheet, "1"),
        ("content", o.content, "1"),
        ("objects", !o.objects, "1"),
        ("scenarios", !o.scenarios, "1"),
        ("formatCells", o.format_cells, "0"),
        ("formatColumns", o.format_columns, "0"),
        ("formatRows", o.format_rows, "0"),
        ("insertColumns", o.insert_columns, "0"),
        ("insertRows", o.insert_rows, "0"),
        ("insertHyperlinks", o.insert_hyperlinks, "0"),
        ("deleteColumns", o.delete_columns, "0"),
        ("deleteRows", o.delete_rows, "0"),
        ("selectLockedCells", !o.select_locked_cells, "1"),
        ("sort", o.sort, "0"),
        ("autoFilter", o.autofilter, "0"),
        ("pivotTables", o.pivot_tables, "0"),
        ("selectUnlockedCells", !o.select_unlocked_cells, "1"),
    ];
    for (name, on, value) in flags {
        if on {
            attrs.push((name, value.to_string()));
        }
    }
    out.empty_tag("sheetProtection", &attrs);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;

    fn protection_xml(ws: &Worksheet) -> String {
        let mut out = XmlWriter::new();
        write_sheet_protection(&mut out, ws.protection());
        out.into_string()
    }

    #[test]
    fn test_encode_password() {
        assert_eq!(encode_password("password"), "83AF");
        assert_eq!(encode_password(""), "CE4B");
    }

    #[test]
    fn test_default_protection() {
        let mut ws = Worksheet::new(WorksheetOptions::default()).unwrap();
        assert_eq!(protection_xml(&ws), "");
        ws.protect("", None);
        assert_eq!(
            protection_xml(&ws),
            r#"<sheetProtection sheet="1" objects="1" scenarios="1"/>"#
        );
    }

    #[test]
    fn test_password_and_allowed_operations() {
        let mut ws = Worksheet::new(WorksheetOptions::default()).unwrap();
        let options = ProtectionOptions {
            format_cells: true,
            insert_rows: true,
            select_locked_cells: false,
            ..ProtectionOptions::default()
        };
        ws.protect("password", Some(&options));
        assert_eq!(
            protection_xml(&ws),
            concat!(
                r#"<sheetProtection password="83AF" sheet="1" objects="1" scenarios="1" "#,
                r#"formatCells="0" insertRows="0" selectLockedCells="1"/>"#
            )
        );
    }

    #[test]
    fn test_options_from_json() {
        let options: ProtectionOptions =
            serde_json::from_str(r#"{"sort": true, "objects": true}"#).unwrap();
        assert!(options.sort && options.objects && options.sheet);
        assert!(serde_json::from_str::<ProtectionOptions>(r#"{"locked": true}"#).is_err());
    }
}
