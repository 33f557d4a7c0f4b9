use crate::format::Format;

/// One token of a `write_rich_string` sequence: a format applying to the
/// next fragment, or a text fragment.
#[derive(Debug, Clone, PartialEq)]
pub enum RichToken<'a> {
    Format(&'a Format),
    Text(&'a str),
}

impl<'a> From<&'a str> for RichToken<'a> {
    fn from(s: &'a str) -> Self {
        Self::Text(s)
    }
}

impl<'a> From<&'a String> for RichToken<'a> {
    fn from(s: &'a String) -> Self {
        Self::Text(s.as_str())
    }
}

impl<'a> From<&'a Format> for RichToken<'a> {
    fn from(f: &'a Format) -> Self {
        Self::Format(f)
    }
}

/// A formatted fragment after validation.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RichRun<'a> {
    pub format: Option<&'a Format>,
    pub text: &'a str,
}
