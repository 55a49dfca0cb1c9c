use std::{borrow::Cow, sync::OnceLock};

use regex::Regex;
use scraper::ElementRef;

/// Collapses whitespace runs (including non-breaking spaces) to a single
/// space and trims the ends.
pub fn normalize_whitespace(s: &str) -> Cow<'_, str> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\s+").expect("regex should be valid"));
    match re.replace_all(s, " ") {
        Cow::Borrowed(b) => Cow::Borrowed(b.trim()),
        Cow::Owned(o) => Cow::Owned(o.trim().to_owned()),
    }
}

/// All text inside an element, flattened and normalized.
pub fn element_text(element: ElementRef) -> String {
    normalize_whitespace(&element.text().collect::<String>()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_runs_and_trims() {
        assert_eq!(normalize_whitespace("  Oběd   1 \n\t x "), "Oběd 1 x");
        assert_eq!(normalize_whitespace("plain"), "plain");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn treats_nbsp_as_whitespace() {
        assert_eq!(normalize_whitespace("a\u{a0}\u{a0}b"), "a b");
    }
}
