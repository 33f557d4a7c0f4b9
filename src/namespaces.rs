//! XML namespaces and relationship types used by the worksheet part.

// =============================================================================
// Spreadsheet namespaces
// =============================================================================

/// Main spreadsheet namespace (Transitional conformance)
pub const NS_SPREADSHEET: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

/// Office document relationships namespace, bound to `r:`
pub const NS_RELATIONSHIPS_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Markup compatibility namespace, bound to `mc:`
pub const NS_MARKUP_COMPAT: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

/// Excel 2010 attribute extensions, bound to `x14ac:`
pub const NS_X14AC: &str = "http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac";

/// Excel 2010 element extensions, bound to `x14:`
pub const NS_X14: &str = "http://schemas.microsoft.com/office/spreadsheetml/2009/9/main";

/// Excel 2006 main namespace, bound to `xm:`
pub const NS_XM: &str = "http://schemas.microsoft.com/office/excel/2006/main";

// =============================================================================
// Office document relationship types
// =============================================================================

/// Relationship type for hyperlinks
pub const REL_HYPERLINK: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";

/// Relationship type for drawings
pub const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";

/// Relationship type for VML drawings (comment boxes)
pub const REL_VML_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/vmlDrawing";

/// Relationship type for comments
pub const REL_COMMENTS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/comments";

/// Relationship type for tables
pub const REL_TABLE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/table";
