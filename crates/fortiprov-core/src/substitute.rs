//! Placeholder substitution for step bodies.
//!
//! Two token syntaxes resolve against the same variable set: `$(name)` and
//! `{{name}}`. The template is scanned once, left to right; replacement text
//! is emitted as-is and never rescanned, so a value that itself looks like a
//! placeholder is not expanded again. Unknown names and unterminated tokens
//! are copied through unchanged. Values are not escaped.

use fortiprov_types::provision::VariableSet;

/// Opening and closing delimiters of each supported syntax.
const DELIMITERS: [(&str, &str); 2] = [("$(", ")"), ("{{", "}}")];

/// Replace every known placeholder in `template` with its value.
pub fn substitute(template: &str, variables: &VariableSet) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find(['$', '{']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];

        match parse_token(tail).and_then(|(name, len)| variables.get(name).map(|v| (v, len))) {
            Some((value, len)) => {
                out.push_str(value);
                rest = &tail[len..];
            }
            None => {
                // Both markers are single-byte ASCII.
                out.push_str(&tail[..1]);
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Names of all placeholder tokens present in `text`, in order of appearance.
///
/// Applied to substituted output, this lists the placeholders the variable
/// set could not resolve.
pub fn placeholder_names(text: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = text;

    while let Some(pos) = rest.find(['$', '{']) {
        let tail = &rest[pos..];
        match parse_token(tail) {
            Some((name, len)) => {
                names.push(name);
                rest = &tail[len..];
            }
            None => rest = &tail[1..],
        }
    }

    names
}

/// Parse a token at the start of `text`, returning its name and byte length.
fn parse_token(text: &str) -> Option<(&str, usize)> {
    let (open, close) = DELIMITERS
        .iter()
        .find(|(open, _)| text.starts_with(open))?;
    let inner = &text[open.len()..];
    let end = inner.find(close)?;
    let name = &inner[..end];
    if name.is_empty() || name.contains(char::is_whitespace) {
        return None;
    }
    Some((name, open.len() + end + close.len()))
}
