//! Sparklines, stored in the Excel 2010 `x14` extension list.
//!
//! ```xml
//! <extLst>
//!   <ext xmlns:x14="..." uri="{05C60535-1F16-4fd2-B633-F4F36F0B64E0}">
//!     <x14:sparklineGroups xmlns:xm="...">
//!       <x14:sparklineGroup displayEmptyCellsAs="gap">
//!         <x14:colorSeries theme="4" tint="-0.499984740745262"/>
//!         ...
//!         <x14:sparklines>
//!           <x14:sparkline><xm:f>Sheet1!A1:E1</xm:f><xm:sqref>F1</xm:sqref></x14:sparkline>
//!         </x14:sparklines>
//!       </x14:sparklineGroup>
//!     </x14:sparklineGroups>
//!   </ext>
//! </extLst>
//! ```

use crate::cell_ref::{cell_name, quote_sheet_name};
use crate::color::to_argb;
use crate::error::{Result, XlsheetError};
use crate::export::{format_number, XmlWriter};
use crate::namespaces::{NS_X14, NS_XM};
use crate::types::{
    AxisLimit, EmptyCells, SparkColor, SparkPalette, SparklineGroup, SparklineOptions,
    SparklineType,
};
use crate::worksheet::{check_bounds, Worksheet};

const SPARKLINE_URI: &str = "{05C60535-1F16-4fd2-B633-F4F36F0B64E0}";

const DARKER_50: f64 = -0.499_984_740_745_262;
const DARKER_25: f64 = -0.249_977_111_117_893;
#[allow(clippy::excessive_precision)]
const LIGHTER_80: f64 = 0.799_981_688_894_314_42;
const LIGHTER_50: f64 = 0.499_984_740_745_262;
#[allow(clippy::excessive_precision)]
const LIGHTER_40: f64 = 0.399_975_585_192_419_21;
#[allow(clippy::excessive_precision)]
const LIGHTER_35: f64 = 0.349_986_266_670_735_79;
const LIGHTER_25: f64 = 0.249_977_111_117_893;
const MAX_STYLE: u8 = 36;

/// One role color of a built-in style. A zero tint is no tint.
#[derive(Clone, Copy)]
enum Swatch {
    Theme(u8, f64),
    Rgb(&'static str),
}

use Swatch::{Rgb, Theme};

impl Swatch {
    fn color(self) -> SparkColor {
        match self {
            Theme(theme, tint) => SparkColor::theme(theme, (tint != 0.0).then_some(tint)),
            Rgb(argb) => SparkColor::rgb(argb),
        }
    }
}

// Role order: series, negative, markers, first, last, high, low.

const fn accent_dark(accent: u8, negative: u8) -> [Swatch; 7] {
    [
        Theme(accent, DARKER_50),
        Theme(negative, 0.0),
        Theme(accent, DARKER_50),
        Theme(accent, LIGHTER_40),
        Theme(accent, LIGHTER_40),
        Theme(accent, 0.0),
        Theme(accent, 0.0),
    ]
}

const fn accent_darker(accent: u8, negative: u8) -> [Swatch; 7] {
    let mark = Theme(negative, DARKER_25);
    [Theme(accent, DARKER_25), Theme(negative, 0.0), mark, mark, mark, mark, mark]
}

const fn accent_plain(accent: u8, negative: u8) -> [Swatch; 7] {
    let mark = Theme(accent, DARKER_25);
    [Theme(accent, 0.0), Theme(negative, 0.0), mark, mark, mark, mark, mark]
}

const fn accent_light(accent: u8) -> [Swatch; 7] {
    [
        Theme(accent, LIGHTER_40),
        Theme(0, DARKER_50),
        Theme(accent, LIGHTER_80),
        Theme(accent, DARKER_25),
        Theme(accent, DARKER_25),
        Theme(accent, DARKER_50),
        Theme(accent, DARKER_50),
    ]
}

const fn rgb_pair(series: &'static str, mark: &'static str) -> [Swatch; 7] {
    let mark = Rgb(mark);
    [Rgb(series), mark, mark, mark, mark, mark, mark]
}

/// Excel's sparkline style gallery, styles 1 to 36.
const STYLES: [[Swatch; 7]; 36] = [
    accent_dark(4, 5),
    accent_dark(5, 6),
    accent_dark(6, 7),
    accent_dark(7, 8),
    accent_dark(8, 9),
    accent_dark(9, 4),
    accent_darker(4, 5),
    accent_darker(5, 6),
    accent_darker(6, 7),
    accent_darker(7, 8),
    accent_darker(8, 9),
    accent_darker(9, 4),
    accent_plain(4, 5),
    accent_plain(5, 6),
    accent_plain(6, 7),
    accent_plain(7, 8),
    accent_plain(8, 9),
    accent_plain(9, 4),
    accent_light(4),
    accent_light(5),
    accent_light(6),
    accent_light(7),
    accent_light(8),
    accent_light(9),
    [
        Theme(1, LIGHTER_50),
        Theme(1, LIGHTER_25),
        Theme(1, LIGHTER_25),
        Theme(1, LIGHTER_25),
        Theme(1, LIGHTER_25),
        Theme(1, LIGHTER_25),
        Theme(1, LIGHTER_25),
    ],
    [
        Theme(1, LIGHTER_35),
        Theme(0, DARKER_25),
        Theme(0, DARKER_25),
        Theme(0, DARKER_25),
        Theme(0, DARKER_25),
        Theme(0, DARKER_25),
        Theme(0, DARKER_25),
    ],
    rgb_pair("FF323232", "FFD00000"),
    rgb_pair("FF000000", "FF0070C0"),
    rgb_pair("FF376092", "FFD00000"),
    rgb_pair("FF0070C0", "FF000000"),
    [
        Rgb("FF5F5F5F"),
        Rgb("FFFFB620"),
        Rgb("FFD70077"),
        Rgb("FF5687C2"),
        Rgb("FF359CEB"),
        Rgb("FF56BE79"),
        Rgb("FFFF5055"),
    ],
    [
        Rgb("FF5687C2"),
        Rgb("FFFFB620"),
        Rgb("FFD70077"),
        Rgb("FF777777"),
        Rgb("FF359CEB"),
        Rgb("FF56BE79"),
        Rgb("FFFF5055"),
    ],
    [
        Rgb("FFC6EFCE"),
        Rgb("FFFFC7CE"),
        Rgb("FF8CADD6"),
        Rgb("FFFFDC47"),
        Rgb("FFFFEB9C"),
        Rgb("FF60D276"),
        Rgb("FFFF5367"),
    ],
    [
        Rgb("FF00B050"),
        Rgb("FFFF0000"),
        Rgb("FF0070C0"),
        Rgb("FFFFC000"),
        Rgb("FFFFC000"),
        Rgb("FF00B050"),
        Rgb("FFFF0000"),
    ],
    [
        Theme(3, 0.0),
        Theme(9, 0.0),
        Theme(8, 0.0),
        Theme(4, 0.0),
        Theme(5, 0.0),
        Theme(6, 0.0),
        Theme(7, 0.0),
    ],
    [
        Theme(1, 0.0),
        Theme(9, 0.0),
        Theme(8, 0.0),
        Theme(4, 0.0),
        Theme(5, 0.0),
        Theme(6, 0.0),
        Theme(7, 0.0),
    ],
];

/// Palette of a built-in sparkline style. Style 0 is Excel's default,
/// the same as style 1; styles past 36 fall back to it too.
pub fn sparkline_palette(style: u8) -> SparkPalette {
    let index = usize::from(style.max(1)) - 1;
    let [series, negative, markers, first, last, high, low] =
        STYLES.get(index).copied().unwrap_or(accent_dark(4, 5));
    SparkPalette {
        series: series.color(),
        negative: negative.color(),
        markers: markers.color(),
        first: first.color(),
        last: last.color(),
        high: high.color(),
        low: low.color(),
    }
}

impl Worksheet {
    /// Add a sparkline group. Without `location` the sparkline goes in the
    /// given cell; with several locations `range` must list one source range
    /// per location.
    pub fn add_sparkline(&mut self, row: u32, col: u32, options: &SparklineOptions) -> Result<()> {
        check_bounds(row, col)?;

        let Some(ranges) = options.range.clone() else {
            log::warn!("parameter 'range' is required in add_sparkline()");
            return Err(XlsheetError::InvalidOption(
                "add_sparkline requires 'range'".to_string(),
            ));
        };
        let ranges = ranges.into_vec();
        let locations = options
            .location
            .clone()
            .map_or_else(|| vec![cell_name(row, col)], |l| l.into_vec());
        if ranges.len() != locations.len() {
            log::warn!("add_sparkline() needs the same number of locations and ranges");
            return Err(XlsheetError::Conflict(format!(
                "{} sparkline locations for {} ranges",
                locations.len(),
                ranges.len()
            )));
        }

        let style = options.style.unwrap_or(0);
        if style > MAX_STYLE {
            return Err(XlsheetError::ValueOutOfRange {
                what: "sparkline style",
                value: f64::from(style),
                min: 0.0,
                max: f64::from(MAX_STYLE),
            });
        }
        let mut colors = sparkline_palette(style);
        let overrides = [
            (&options.series_color, &mut colors.series),
            (&options.negative_color, &mut colors.negative),
            (&options.markers_color, &mut colors.markers),
            (&options.first_color, &mut colors.first),
            (&options.last_color, &mut colors.last),
            (&options.high_color, &mut colors.high),
            (&options.low_color, &mut colors.low),
        ];
        for (user, slot) in overrides {
            if let Some(color) = user {
                *slot = SparkColor::rgb(to_argb(color)?);
            }
        }

        let sheet = quote_sheet_name(&self.options.name);
        let qualify = |range: &str| {
            let range = range.replace('$', "");
            let range = range.trim_start_matches('=');
            if range.contains('!') {
                range.to_string()
            } else {
                format!("{sheet}!{range}")
            }
        };
        let ranges = ranges.iter().map(|r| qualify(r)).collect();
        let locations = locations.iter().map(|l| l.replace('$', "")).collect();
        let date_axis = options.date_axis.as_deref().map(qualify);

        self.sparklines.push(SparklineGroup {
            kind: options.kind.unwrap_or(SparklineType::Line),
            locations,
            ranges,
            high: options.high_point,
            low: options.low_point,
            negative: options.negative_points,
            first: options.first_point,
            last: options.last_point,
            markers: options.markers,
            axis: options.axis,
            reverse: options.reverse,
            show_hidden: options.show_hidden,
            max: options.max,
            min: options.min,
            empty_cells: options.empty_cells.unwrap_or(EmptyCells::Gaps),
            date_axis,
            weight: options.weight,
            colors,
        });
        Ok(())
    }
}

/// `<extLst>` holding the sparkline groups, most recent group first.
pub(crate) fn write_ext_list(out: &mut XmlWriter, groups: &[SparklineGroup]) {
    if groups.is_empty() {
        return;
    }
    out.start_tag("extLst", &[]);
    out.start_tag(
        "ext",
        &[
            ("xmlns:x14", NS_X14.to_string()),
            ("uri", SPARKLINE_URI.to_string()),
        ],
    );
    out.start_tag("x14:sparklineGroups", &[("xmlns:xm", NS_XM.to_string())]);
    for group in groups.iter().rev() {
        write_sparkline_group(out, group);
    }
    out.end_tag("x14:sparklineGroups");
    out.end_tag("ext");
    out.end_tag("extLst");
}

fn write_sparkline_group(out: &mut XmlWriter, group: &SparklineGroup) {
    let one = || "1".to_string();
    let mut attrs = Vec::new();
    let axis_type = |limit: Option<AxisLimit>| match limit {
        Some(AxisLimit::Group) => Some("group"),
        Some(AxisLimit::Value(_)) => Some("custom"),
        None => None,
    };
    if let Some(AxisLimit::Value(max)) = group.max {
        attrs.push(("manualMax", format_number(max)));
    }
    if let Some(AxisLimit::Value(min)) = group.min {
        attrs.push(("manualMin", format_number(min)));
    }
    if group.kind != SparklineType::Line {
        attrs.push(("type", group.kind.wire().to_string()));
    }
    if let Some(weight) = group.weight.filter(|w| *w != 0.0) {
        attrs.push(("lineWeight", format_number(weight)));
    }
    if group.date_axis.is_some() {
        attrs.push(("dateAxis", one()));
    }
    // Zero is Excel's default and left implicit.
    if group.empty_cells != EmptyCells::Zero {
        attrs.push(("displayEmptyCellsAs", group.empty_cells.wire().to_string()));
    }
    let flags = [
        ("markers", group.markers),
        ("high", group.high),
        ("low", group.low),
        ("first", group.first),
        ("last", group.last),
        ("negative", group.negative),
        ("displayXAxis", group.axis),
        ("displayHidden", group.show_hidden),
    ];
    for (name, on) in flags {
        if on {
            attrs.push((name, one()));
        }
    }
    if let Some(kind) = axis_type(group.min) {
        attrs.push(("minAxisType", kind.to_string()));
    }
    if let Some(kind) = axis_type(group.max) {
        attrs.push(("maxAxisType", kind.to_string()));
    }
    if group.reverse {
        attrs.push(("rightToLeft", one()));
    }
    out.start_tag("x14:sparklineGroup", &attrs);

    let colors = &group.colors;
    write_spark_color(out, "x14:colorSeries", &colors.series);
    write_spark_color(out, "x14:colorNegative", &colors.negative);
    write_spark_color(out, "x14:colorAxis", &SparkColor::rgb("FF000000"));
    write_spark_color(out, "x14:colorMarkers", &colors.markers);
    write_spark_color(out, "x14:colorFirst", &colors.first);
    write_spark_color(out, "x14:colorLast", &colors.last);
    write_spark_color(out, "x14:colorHigh", &colors.high);
    write_spark_color(out, "x14:colorLow", &colors.low);

    if let Some(date_axis) = &group.date_axis {
        out.data_element("xm:f", date_axis, &[]);
    }

    out.start_tag("x14:sparklines", &[]);
    for (range, location) in group.ranges.iter().zip(&group.locations) {
        out.start_tag("x14:sparkline", &[]);
        out.data_element("xm:f", range, &[]);
        out.data_element("xm:sqref", location, &[]);
        out.end_tag("x14:sparkline");
    }
    out.end_tag("x14:sparklines");
    out.end_tag("x14:sparklineGroup");
}

fn write_spark_color(out: &mut XmlWriter, tag: &str, color: &SparkColor) {
    let mut attrs = Vec::with_capacity(3);
    if let Some(rgb) = &color.rgb {
        attrs.push(("rgb", rgb.clone()));
    }
    if let Some(theme) = color.theme.filter(|t| *t != 0) {
        attrs.push(("theme", theme.to_string()));
    }
    if let Some(tint) = color.tint.filter(|t| *t != 0.0) {
        attrs.push(("tint", format_number(tint)));
    }
    out.empty_tag(tag, &attrs);
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::options::WorksheetOptions;
    use pretty_assertions::assert_eq;

    fn sheet() -> Worksheet {
        Worksheet::new(WorksheetOptions::default()).unwrap()
    }

    fn xml(ws: &Worksheet) -> String {
        let mut out = XmlWriter::new();
        write_ext_list(&mut out, ws.sparkline_groups());
        out.into_string()
    }

    #[test]
    fn test_default_group_xml() {
        let mut ws = sheet();
        ws.add_sparkline(0, 5, &SparklineOptions::new("$A$1:$E$1")).unwrap();
        assert_eq!(
            xml(&ws),
            "<extLst><ext xmlns:x14=\"http://schemas.microsoft.com/office/spreadsheetml/2009/9/main\" \
             uri=\"{05C60535-1F16-4fd2-B633-F4F36F0B64E0}\">\
             <x14:sparklineGroups xmlns:xm=\"http://schemas.microsoft.com/office/excel/2006/main\">\
             <x14:sparklineGroup displayEmptyCellsAs=\"gap\">\
             <x14:colorSeries theme=\"4\" tint=\"-0.499984740745262\"/>\
             <x14:colorNegative theme=\"5\"/>\
             <x14:colorAxis rgb=\"FF000000\"/>\
             <x14:colorMarkers theme=\"4\" tint=\"-0.499984740745262\"/>\
             <x14:colorFirst theme=\"4\" tint=\"0.3999755851924192\"/>\
             <x14:colorLast theme=\"4\" tint=\"0.3999755851924192\"/>\
             <x14:colorHigh theme=\"4\"/>\
             <x14:colorLow theme=\"4\"/>\
             <x14:sparklines><x14:sparkline><xm:f>Sheet1!A1:E1</xm:f><xm:sqref>F1</xm:sqref>\
             </x14:sparkline></x14:sparklines>\
             </x14:sparklineGroup></x14:sparklineGroups></ext></extLst>"
        );
    }

    #[test]
    fn test_group_attribute_order() {
        let mut ws = sheet();
        let opts = SparklineOptions {
            kind: Some(SparklineType::Column),
            max: Some(AxisLimit::Value(4.0)),
            min: Some(AxisLimit::Group),
            weight: Some(2.25),
            empty_cells: Some(EmptyCells::Connect),
            markers: true,
            negative_points: true,
            axis: true,
            reverse: true,
            date_axis: Some("=$A$3:$E$3".to_string()),
            ..SparklineOptions::new("Other!A1:E1")
        };
        ws.add_sparkline(1, 0, &opts).unwrap();
        let out = xml(&ws);
        assert!(out.contains(
            "<x14:sparklineGroup manualMax=\"4\" type=\"column\" lineWeight=\"2.25\" \
             dateAxis=\"1\" displayEmptyCellsAs=\"span\" markers=\"1\" negative=\"1\" \
             displayXAxis=\"1\" minAxisType=\"group\" maxAxisType=\"custom\" rightToLeft=\"1\">"
        ));
        assert!(out.contains("<xm:f>Sheet1!A3:E3</xm:f><x14:sparklines>"));
        assert!(out.contains("<xm:f>Other!A1:E1</xm:f><xm:sqref>A2</xm:sqref>"));
    }

    #[test]
    fn test_zero_empty_cells_not_written() {
        let mut ws = sheet();
        let opts = SparklineOptions {
            empty_cells: Some(EmptyCells::Zero),
            ..SparklineOptions::new("A1:E1")
        };
        ws.add_sparkline(0, 5, &opts).unwrap();
        assert!(xml(&ws).contains("<x14:sparklineGroup>"));
    }

    #[test]
    fn test_multiple_locations_and_reverse_order() {
        let mut ws = sheet();
        let opts = SparklineOptions {
            location: Some(vec!["F1", "F2"].into()),
            ..SparklineOptions::new(vec!["A1:E1", "A2:E2"])
        };
        ws.add_sparkline(0, 5, &opts).unwrap();
        ws.add_sparkline(2, 5, &SparklineOptions::new("A3:E3")).unwrap();
        let out = xml(&ws);
        let last = out.find("<xm:sqref>F3</xm:sqref>").unwrap();
        let first = out.find("<xm:sqref>F1</xm:sqref>").unwrap();
        assert!(last < first);
        assert!(out.contains("<xm:sqref>F2</xm:sqref>"));
    }

    #[test]
    fn test_count_mismatch() {
        let mut ws = sheet();
        let opts = SparklineOptions {
            location: Some(vec!["F1", "F2"].into()),
            ..SparklineOptions::new("A1:E1")
        };
        let err = ws.add_sparkline(0, 5, &opts).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::StructuralConflict);
        assert!(ws.sparkline_groups().is_empty());
    }

    #[test]
    fn test_range_required() {
        let mut ws = sheet();
        let err = ws.add_sparkline(0, 0, &SparklineOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidOption);
    }

    #[test]
    fn test_user_colors_and_quoted_sheet() {
        let mut ws = Worksheet::new(WorksheetOptions {
            name: "My Data".to_string(),
            ..WorksheetOptions::default()
        })
        .unwrap();
        let opts = SparklineOptions {
            series_color: Some("#C00000".to_string()),
            ..SparklineOptions::new("A1:E1")
        };
        ws.add_sparkline(0, 5, &opts).unwrap();
        let group = &ws.sparkline_groups()[0];
        assert_eq!(group.ranges, vec!["'My Data'!A1:E1".to_string()]);
        assert_eq!(group.colors.series, SparkColor::rgb("FFC00000"));
        assert!(xml(&ws).contains("<x14:colorSeries rgb=\"FFC00000\"/>"));
    }

    #[test]
    fn test_palettes() {
        assert_eq!(sparkline_palette(0), sparkline_palette(1));
        let second = sparkline_palette(2);
        assert_eq!(second.series, SparkColor::theme(5, Some(DARKER_50)));
        assert_eq!(second.negative, SparkColor::theme(6, None));
        assert_eq!(sparkline_palette(6).negative.theme, Some(4));

        let seventh = sparkline_palette(7);
        assert_eq!(seventh.series, SparkColor::theme(4, Some(DARKER_25)));
        assert_eq!(seventh.first, SparkColor::theme(5, Some(DARKER_25)));
        assert_eq!(seventh.high, SparkColor::theme(5, Some(DARKER_25)));

        let nineteenth = sparkline_palette(19);
        assert_eq!(nineteenth.negative, SparkColor::theme(0, Some(DARKER_50)));
        assert_eq!(nineteenth.markers, SparkColor::theme(4, Some(LIGHTER_80)));

        assert_eq!(sparkline_palette(27).series, SparkColor::rgb("FF323232"));
        assert_eq!(sparkline_palette(33).first, SparkColor::rgb("FFFFDC47"));
        let last = sparkline_palette(36);
        assert_eq!(last.series, SparkColor::theme(1, None));
        assert_eq!(last.low, SparkColor::theme(7, None));
    }

    #[test]
    fn test_style_limit() {
        let style = |style| SparklineOptions {
            style: Some(style),
            ..SparklineOptions::new("A1:B1")
        };
        assert!(sheet().add_sparkline(0, 0, &style(36)).is_ok());
        assert!(sheet().add_sparkline(0, 0, &style(37)).is_err());
    }
}
