//! Formula text preparation.
//!
//! Excel stores formulas without the leading `=` or array braces, and newer
//! functions must carry their `_xlfn.` (and for some `_xlws.`) storage prefix
//! or Excel shows `#NAME?`.

use std::sync::OnceLock;

use regex::Regex;

/// Functions that return dynamic arrays. A formula using any of them is
/// stored as a dynamic array formula.
const DYNAMIC_FUNCTIONS: &[&str] = &[
    "ANCHORARRAY",
    "BYCOL",
    "BYROW",
    "CHOOSECOLS",
    "CHOOSEROWS",
    "DROP",
    "EXPAND",
    "FILTER",
    "HSTACK",
    "LAMBDA",
    "MAKEARRAY",
    "MAP",
    "RANDARRAY",
    "REDUCE",
    "SCAN",
    "SEQUENCE",
    "SINGLE",
    "SORT",
    "SORTBY",
    "SWITCH",
    "TAKE",
    "TEXTSPLIT",
    "TOCOL",
    "TOROW",
    "UNIQUE",
    "VSTACK",
    "WRAPCOLS",
    "WRAPROWS",
    "XLOOKUP",
];

/// Worksheet functions stored with the `_xlfn._xlws.` prefix.
const XLWS_FUNCTIONS: &[&str] = &["FILTER", "SORT"];

/// Functions added after Excel 2010 that need `_xlfn.` but are not dynamic.
const FUTURE_FUNCTIONS: &[&str] = &[
    "ACOT",
    "ACOTH",
    "AGGREGATE",
    "ARABIC",
    "BASE",
    "BETA.DIST",
    "BETA.INV",
    "BINOM.DIST",
    "BINOM.DIST.RANGE",
    "BINOM.INV",
    "BITAND",
    "BITLSHIFT",
    "BITOR",
    "BITRSHIFT",
    "BITXOR",
    "CEILING.MATH",
    "CEILING.PRECISE",
    "CHISQ.DIST",
    "CHISQ.DIST.RT",
    "CHISQ.INV",
    "CHISQ.INV.RT",
    "CHISQ.TEST",
    "COMBINA",
    "CONCAT",
    "CONFIDENCE.NORM",
    "CONFIDENCE.T",
    "COT",
    "COTH",
    "COVARIANCE.P",
    "COVARIANCE.S",
    "CSC",
    "CSCH",
    "DAYS",
    "DECIMAL",
    "ERF.PRECISE",
    "ERFC.PRECISE",
    "EXPON.DIST",
    "F.DIST",
    "F.DIST.RT",
    "F.INV",
    "F.INV.RT",
    "F.TEST",
    "FILTERXML",
    "FLOOR.MATH",
    "FLOOR.PRECISE",
    "FORECAST.ETS",
    "FORECAST.LINEAR",
    "FORMULATEXT",
    "GAMMA",
    "GAMMA.DIST",
    "GAMMA.INV",
    "GAMMALN.PRECISE",
    "GAUSS",
    "HYPGEOM.DIST",
    "IFNA",
    "IFS",
    "IMCOSH",
    "IMCOT",
    "IMCSC",
    "IMCSCH",
    "IMSEC",
    "IMSECH",
    "IMSINH",
    "IMTAN",
    "ISFORMULA",
    "ISOWEEKNUM",
    "LET",
    "LOGNORM.DIST",
    "LOGNORM.INV",
    "MAXIFS",
    "MINIFS",
    "MODE.MULT",
    "MODE.SNGL",
    "MUNIT",
    "NEGBINOM.DIST",
    "NORM.DIST",
    "NORM.INV",
    "NORM.S.DIST",
    "NORM.S.INV",
    "NUMBERVALUE",
    "PDURATION",
    "PERCENTILE.EXC",
    "PERCENTILE.INC",
    "PERCENTRANK.EXC",
    "PERCENTRANK.INC",
    "PERMUTATIONA",
    "PHI",
    "POISSON.DIST",
    "QUARTILE.EXC",
    "QUARTILE.INC",
    "QUERYSTRING",
    "RANK.AVG",
    "RANK.EQ",
    "RRI",
    "SEC",
    "SECH",
    "SHEET",
    "SHEETS",
    "SKEW.P",
    "STDEV.P",
    "STDEV.S",
    "T.DIST",
    "T.DIST.2T",
    "T.DIST.RT",
    "T.INV",
    "T.INV.2T",
    "T.TEST",
    "TEXTJOIN",
    "UNICHAR",
    "UNICODE",
    "VAR.P",
    "VAR.S",
    "WEBSERVICE",
    "WEIBULL.DIST",
    "XOR",
    "Z.TEST",
];

fn function_call_re(names: &[&str]) -> Regex {
    let alternation = names
        .iter()
        .map(|n| regex::escape(n))
        .collect::<Vec<_>>()
        .join("|");
    #[allow(clippy::expect_used)]
    Regex::new(&format!(r"\b({alternation})\(")).expect("valid regex")
}

fn dynamic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| function_call_re(DYNAMIC_FUNCTIONS))
}

fn xlws_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| function_call_re(XLWS_FUNCTIONS))
}

fn future_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| function_call_re(FUTURE_FUNCTIONS))
}

/// True when the formula calls a dynamic array function.
pub fn has_dynamic_function(formula: &str) -> bool {
    dynamic_re().is_match(formula)
}

/// True for `{=...}` array formula syntax.
pub fn is_array_formula(formula: &str) -> bool {
    formula.starts_with('{') && formula.ends_with('}')
}

/// Strip `{`, `=` and `}` wrappers.
pub fn strip_formula(formula: &str) -> &str {
    let f = formula.strip_prefix('{').unwrap_or(formula);
    let f = f.strip_prefix('=').unwrap_or(f);
    f.strip_suffix('}').unwrap_or(f)
}

/// Formula text as stored in the file: wrappers removed and function
/// prefixes added. Formulas already carrying `_xlfn.` are left alone.
pub fn prepare_formula(formula: &str, expand_future_functions: bool) -> String {
    let f = strip_formula(formula);
    if f.contains("_xlfn.") {
        return f.to_string();
    }

    let mut out = xlws_re().replace_all(f, "_xlfn._xlws.$1(").into_owned();
    out = dynamic_re()
        .replace_all(&out, |caps: &regex::Captures<'_>| {
            let name = caps.get(1).map_or("", |m| m.as_str());
            if XLWS_FUNCTIONS.contains(&name) {
                // already rewritten, the match sits after "_xlws."
                format!("{name}(")
            } else {
                format!("_xlfn.{name}(")
            }
        })
        .into_owned();
    if expand_future_functions {
        out = future_re().replace_all(&out, "_xlfn.$1(").into_owned();
    }
    out
}
