//! Assembles the worksheet part.
//!
//! Every element is attempted in the order Excel requires; empty overlays
//! write nothing. Relationship ids are handed out in the same pass, so the
//! ids in the XML always match [`SheetRelationships::collect`].

use std::io::Write;

use serde::Serialize;

use crate::auto_filter::write_autofilter;
use crate::cell_ref::CellRange;
use crate::comments::write_legacy_drawing;
use crate::conditional::write_conditional_formats;
use crate::data_validation::write_data_validations;
use crate::drawings::write_drawing;
use crate::error::Result;
use crate::hyperlinks::write_hyperlinks;
use crate::namespaces::{
    NS_MARKUP_COMPAT, NS_RELATIONSHIPS_DOC, NS_SPREADSHEET, NS_X14AC, REL_COMMENTS, REL_DRAWING,
    REL_HYPERLINK, REL_TABLE, REL_VML_DRAWING,
};
use crate::page_setup::{
    write_col_breaks, write_header_footer, write_page_margins, write_page_setup,
    write_print_options, write_row_breaks,
};
use crate::protection::write_sheet_protection;
use crate::sparklines::write_ext_list;
use crate::tables::write_table_parts;
use crate::types::LinkType;
use crate::views::{write_sheet_pr, write_sheet_views};
use crate::worksheet::{write_cols, write_sheet_format_pr, Worksheet};

use super::sheet_data::RowContext;
use super::xml_writer::XmlWriter;

/// One entry of the worksheet's `.rels` part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub id: String,
    pub rel_type: &'static str,
    pub target: String,
    /// `External` for links outside the package.
    pub target_mode: Option<&'static str>,
}

/// Relationships of a worksheet in id order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetRelationships {
    pub relationships: Vec<Relationship>,
}

impl SheetRelationships {
    /// Collect the relationships the sheet XML refers to: external
    /// hyperlinks, drawing, comment VML and tables, then the comments part
    /// which the sheet itself does not reference. `part_index` numbers the
    /// drawing, VML and comments parts.
    pub fn collect(ws: &Worksheet, part_index: u32) -> Self {
        let mut rels = Self::default();
        for cols in ws.hyperlinks.values() {
            for link in cols.values() {
                if link.link_type == LinkType::External {
                    rels.push(REL_HYPERLINK, link.url.clone(), Some("External"));
                }
            }
        }
        if !ws.drawings.is_empty() {
            rels.push(
                REL_DRAWING,
                format!("../drawings/drawing{part_index}.xml"),
                None,
            );
        }
        let has_comments = ws.has_comments();
        if has_comments {
            rels.push(
                REL_VML_DRAWING,
                format!("../drawings/vmlDrawing{part_index}.vml"),
                None,
            );
        }
        for table in &ws.tables {
            rels.push(REL_TABLE, format!("../tables/table{}.xml", table.id), None);
        }
        if has_comments {
            rels.push(REL_COMMENTS, format!("../comments{part_index}.xml"), None);
        }
        rels
    }

    fn push(&mut self, rel_type: &'static str, target: String, target_mode: Option<&'static str>) {
        let id = format!("rId{}", self.relationships.len() + 1);
        self.relationships.push(Relationship {
            id,
            rel_type,
            target,
            target_mode,
        });
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.iter()
    }
}

impl Worksheet {
    /// Serialize the worksheet part.
    ///
    /// In streaming mode the spilled rows are copied in and the spill file
    /// is released, so the sheet can be assembled only once and takes no
    /// further writes.
    pub fn assemble_xml(&mut self) -> Result<String> {
        let dy_descent = self.uses_excel_2010();
        let mut out = XmlWriter::with_capacity(4096 + self.cell_count() * 32);
        out.declaration();

        let mut root = vec![
            ("xmlns", NS_SPREADSHEET.to_string()),
            ("xmlns:r", NS_RELATIONSHIPS_DOC.to_string()),
        ];
        if dy_descent {
            root.push(("xmlns:mc", NS_MARKUP_COMPAT.to_string()));
            root.push(("xmlns:x14ac", NS_X14AC.to_string()));
            root.push(("mc:Ignorable", "x14ac".to_string()));
        }
        out.start_tag("worksheet", &root);

        write_sheet_pr(
            &mut out,
            &self.view,
            &self.layout.outline,
            &self.page,
            self.filter_on(),
        );
        out.empty_tag("dimension", &[("ref", self.dims.to_ref())]);
        write_sheet_views(&mut out, &self.view, &self.layout.outline);
        write_sheet_format_pr(&mut out, &self.layout, dy_descent);
        write_cols(&mut out, &self.layout);

        let rows = self.dims.rows();
        if rows.is_none() {
            out.empty_tag("sheetData", &[]);
        } else {
            out.start_tag("sheetData", &[]);
            let ctx = RowContext::new(&self.layout, &self.comments, dy_descent);
            self.sink.write_rows(&mut out, rows, &ctx)?;
            out.end_tag("sheetData");
        }

        write_sheet_protection(&mut out, self.protection.as_ref());
        write_autofilter(&mut out, self.autofilter.as_ref());
        write_merge_cells(&mut out, &self.merges);
        write_conditional_formats(&mut out, &self.cond_formats);
        write_data_validations(&mut out, &self.validations);
        let rel_id = write_hyperlinks(&mut out, self, 1);
        write_print_options(&mut out, &self.page);
        write_page_margins(&mut out, &self.page);
        write_page_setup(&mut out, &self.page);
        write_header_footer(&mut out, &self.page, self.options.excel2003_style);
        write_row_breaks(&mut out, &self.page);
        write_col_breaks(&mut out, &self.page);
        let rel_id = write_drawing(&mut out, &self.drawings, rel_id);
        let rel_id = write_legacy_drawing(&mut out, self.has_comments(), rel_id);
        write_table_parts(&mut out, &self.tables, rel_id);
        write_ext_list(&mut out, &self.sparklines);

        out.end_tag("worksheet");
        log::debug!(
            "assembled worksheet '{}': {} cells, {} bytes",
            self.options.name,
            self.cell_count(),
            out.len()
        );
        Ok(out.into_string())
    }

    /// Serialize the worksheet part into `writer`.
    pub fn write_to<W: Write>(&mut self, mut writer: W) -> Result<()> {
        let xml = self.assemble_xml()?;
        writer.write_all(xml.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}

/// `<mergeCells>` in the order the ranges were merged.
fn write_merge_cells(out: &mut XmlWriter, merges: &[CellRange]) {
    if merges.is_empty() {
        return;
    }
    out.start_tag("mergeCells", &[("count", merges.len().to_string())]);
    for range in merges {
        out.empty_tag("mergeCell", &[("ref", range.name())]);
    }
    out.end_tag("mergeCells");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::options::WorksheetOptions;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    #[test]
    fn test_empty_sheet() {
        let xml = sheet().assemble_xml().unwrap();
        assert_eq!(
            xml,
            concat!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n",
                r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" "#,
                r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<dimension ref="A1"/>"#,
                r#"<sheetViews><sheetView workbookViewId="0"/></sheetViews>"#,
                r#"<sheetFormatPr defaultRowHeight="15"/>"#,
                r#"<sheetData/>"#,
                r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#,
                r#"</worksheet>"#
            )
        );
    }

    #[test]
    fn test_merge_cells_xml() {
        let mut ws = sheet();
        ws.merge_range(1, 1, 2, 3, "Title", None).unwrap();
        let xml = ws.assemble_xml().unwrap();
        assert!(xml.contains(r#"<mergeCells count="1"><mergeCell ref="B2:D3"/></mergeCells>"#));
    }

    #[test]
    fn test_relationship_ids_follow_element_order() {
        let mut ws = sheet();
        ws.write_url(0, 0, "http://a.com", None, None, None).unwrap();
        ws.write_url(1, 0, "internal:Sheet2!A1", None, None, None).unwrap();
        ws.insert_chart(4, 4, "Chart 1", None).unwrap();
        ws.write_comment(2, 2, "note", None).unwrap();
        let rels = SheetRelationships::collect(&ws, 3);
        let targets: Vec<(&str, &str)> = rels
            .iter()
            .map(|r| (r.id.as_str(), r.target.as_str()))
            .collect();
        assert_eq!(
            targets,
            vec![
                ("rId1", "http://a.com"),
                ("rId2", "../drawings/drawing3.xml"),
                ("rId3", "../drawings/vmlDrawing3.vml"),
                ("rId4", "../comments3.xml"),
            ]
        );
        let xml = ws.assemble_xml().unwrap();
        assert!(xml.contains(r#"<drawing r:id="rId2"/><legacyDrawing r:id="rId3"/>"#));
    }

    #[test]
    fn test_streaming_sheet_assembles_once() {
        let mut ws = Worksheet::new(WorksheetOptions {
            constant_memory: true,
            ..WorksheetOptions::default()
        })
        .unwrap();
        ws.write_string(0, 0, "a", None).unwrap();
        ws.write_number(1, 0, 2.0, None).unwrap();
        let xml = ws.assemble_xml().unwrap();
        assert!(xml.contains(concat!(
            r#"<sheetData><row r="1"><c r="A1" t="inlineStr"><is><t>a</t></is></c></row>"#,
            r#"<row r="2"><c r="A2"><v>2</v></c></row></sheetData>"#
        )));
        assert!(ws.assemble_xml().is_err());
    }

    #[test]
    fn test_write_to() {
        let mut ws = sheet();
        ws.write_boolean(0, 0, true, None).unwrap();
        let mut bytes = Vec::new();
        ws.write_to(&mut bytes).unwrap();
        let xml = String::from_utf8(bytes).unwrap();
        assert!(xml.contains(r#"<c r="A1" t="b"><v>1</v></c>"#));
        assert!(xml.ends_with("</worksheet>"));
    }
}
