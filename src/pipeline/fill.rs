//! Template filling: substitute record values into `{{ field }}` tokens.
//!
//! This is literal text substitution, not a template language. Only the
//! exact tokens `{{ product }}`, `{{ price }}` and `{{ qty }}` (one space on
//! each side) are recognised. Values are inserted verbatim with no HTML
//! escaping, and any other `{{ … }}` token is left untouched.
//!
//! All three tokens are replaced in one left-to-right pass over the
//! template. A value that happens to contain a token is never re-scanned, so
//! the result is the same whichever placeholder is considered first.

use crate::pipeline::records::{Record, REQUIRED_FIELDS};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static FIELD_TOKEN: Lazy<Regex> = Lazy::new(|| {
    let names = REQUIRED_FIELDS.join("|");
    Regex::new(&format!(r"\{{\{{ ({names}) \}}\}}")).expect("valid field token regex")
});

static ANY_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([^{}]*?)\s*\}\}").expect("valid token regex"));

/// Literal placeholder token for `field`, e.g. `{{ qty }}`.
pub fn placeholder(field: &str) -> String {
    format!("{{{{ {field} }}}}")
}

/// Fill `template` with the trimmed values of `record`.
pub fn fill_template(template: &str, record: &Record) -> String {
    FIELD_TOKEN
        .replace_all(template, |caps: &Captures<'_>| record.field(&caps[1]).to_string())
        .into_owned()
}

/// Names of `{{ name }}` tokens still present in `document`, in order of
/// first appearance.
pub fn unfilled_placeholders(document: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in ANY_TOKEN.captures_iter(document) {
        let name = caps[1].to_string();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}
