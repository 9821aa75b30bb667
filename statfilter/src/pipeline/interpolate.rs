//! `@name` placeholder substitution

use std::sync::OnceLock;

use regex::{Captures as RegexCaptures, Regex};

use super::pack::Captures;

fn placeholder() -> &'static Regex {
    static RE_PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    RE_PLACEHOLDER.get_or_init(|| Regex::new(r"@(\w+)").expect("Invalid regex"))
}

/// Replace every `@name` in `template` with `captures[name]`.
///
/// Placeholders without a matching capture are kept as written.
pub fn interpolate_string(template: &str, captures: &Captures) -> String {
    if !template.contains('@') {
        return template.to_string();
    }

    placeholder()
        .replace_all(template, |caps: &RegexCaptures<'_>| match captures.get(&caps[1]) {
            Some(value) => value.clone(),
            None => caps[0].to_string(),
        })
        .into_owned()
}
