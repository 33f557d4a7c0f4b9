//! Minimal string-backed XML emitter.
//!
//! Elements are written straight into a `String` the way the sheet writer
//! always has; escaping goes through `quick_xml::escape`.

use std::borrow::Cow;

use quick_xml::escape::partial_escape;

/// Attribute list of one element, in output order.
pub(crate) type Attrs<'a> = [(&'a str, String)];

#[derive(Debug, Default)]
pub struct XmlWriter {
    out: String,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(4096),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
        }
    }

    pub fn declaration(&mut self) {
        self.out
            .push_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n");
    }

    pub fn start_tag(&mut self, tag: &str, attrs: &Attrs<'_>) {
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attrs(attrs);
        self.out.push('>');
    }

    pub fn empty_tag(&mut self, tag: &str, attrs: &Attrs<'_>) {
        self.out.push('<');
        self.out.push_str(tag);
        self.push_attrs(attrs);
        self.out.push_str("/>");
    }

    pub fn end_tag(&mut self, tag: &str) {
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    /// `<tag attrs>escaped data</tag>`.
    pub fn data_element(&mut self, tag: &str, data: &str, attrs: &Attrs<'_>) {
        self.start_tag(tag, attrs);
        self.out.push_str(&escape_data(data));
        self.end_tag(tag);
    }

    /// Append pre-built markup.
    pub fn raw(&mut self, markup: &str) {
        self.out.push_str(markup);
    }

    pub fn as_str(&self) -> &str {
        &self.out
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn into_string(self) -> String {
        self.out
    }

    fn push_attrs(&mut self, attrs: &Attrs<'_>) {
        for (key, value) in attrs {
            self.out.push(' ');
            self.out.push_str(key);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attr(value));
            self.out.push('"');
        }
    }
}

/// Escape `&`, `<` and `>` in element text.
pub fn escape_data(data: &str) -> Cow<'_, str> {
    partial_escape(data)
}

/// Escape an attribute value: element escaping plus `"` and newlines.
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    let escaped = partial_escape(value);
    if escaped.contains(['"', '\n']) {
        Cow::Owned(escaped.replace('"', "&quot;").replace('\n', "&#xA;"))
    } else {
        escaped
    }
}

/// Format a number the way Excel files expect: up to 16 significant
/// digits, no trailing zeros, exponent form for very large or small values.
pub fn format_number(value: f64) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let sci = format!("{value:.15e}");
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if !(-4..16).contains(&exp) {
        let mantissa = trim_zeros(mantissa);
        let sign = if exp < 0 { '-' } else { '+' };
        return format!("{mantissa}E{sign}{:02}", exp.abs());
    }

    // 16 significant digits in fixed notation
    #[allow(clippy::cast_sign_loss)]
    let decimals = (15 - exp).max(0) as usize;
    let fixed = format!("{value:.decimals$}");
    trim_zeros(&fixed).to_string()
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}
