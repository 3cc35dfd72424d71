//! `style` attribute filtering.
//!
//! Values are not parsed as CSS. A value must first pass a character-class
//! gauntlet (no `url(...)`, no function calls other than digit lists, no
//! escapes or comments); then each `property: value` declaration whose
//! property is allow-listed is kept, re-emitted as `property: value;`.

use std::sync::LazyLock;

use regex::Regex;

use crate::policy::Policy;

// ============================================================================
// Regex Patterns for Style Filtering
// ============================================================================

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)url\s*\(\s*[^\s)]+?\s*\)\s*").expect("URL_RE: hardcoded regex is valid")
});

/// Every character run must be plain, a hyphenated word, a quoted word run,
/// or a parenthesised list of numbers
static GAUNTLET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(?:[:,;#%.\sa-zA-Z0-9!]|\w-\w|'[\s\w]+'|"[\s\w]+"|\([\d,\s]+\))*$"#)
        .expect("GAUNTLET_RE: hardcoded regex is valid")
});

/// `prop: value;` repeated, last semicolon optional
static DECLARATIONS_SHAPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:[-\w]+\s*:[^:;]*(?:;\s*|$))*$")
        .expect("DECLARATIONS_SHAPE_RE: hardcoded regex is valid")
});

static DECLARATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([-\w]+)\s*:\s*([^:;]*)").expect("DECLARATION_RE: hardcoded regex is valid")
});

/// Keep only allow-listed declarations of a `style` value
///
/// Returns an empty string when nothing survives, so the caller keeps the
/// attribute as `style=""`.
#[must_use]
pub fn filter_style(style: &str, policy: &Policy) -> String {
    let style = URL_RE.replace_all(style, " ");

    if !GAUNTLET_RE.is_match(&style) || !DECLARATIONS_SHAPE_RE.is_match(&style) {
        tracing::trace!(style = %style, "Rejecting style value that fails the gauntlet");
        return String::new();
    }

    let mut clean: Vec<String> = Vec::new();
    for caps in DECLARATION_RE.captures_iter(&style) {
        let property = caps[1].to_ascii_lowercase();
        let value = caps[2].trim();
        if value.is_empty() {
            continue;
        }
        if policy.allows_style(&property) {
            clean.push(format!("{property}: {value};"));
        } else {
            tracing::trace!(property = %property, "Dropping disallowed style property");
        }
    }

    clean.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CleanOptions;

    fn policy(styles: &[&str]) -> Policy {
        let options = CleanOptions {
            styles: styles.iter().map(|s| (*s).to_string()).collect(),
            ..CleanOptions::default()
        };
        Policy::resolve(&options).unwrap()
    }

    #[test]
    fn test_nothing_allowed_yields_empty() {
        assert_eq!(filter_style("top:0", &policy(&[])), "");
        assert_eq!(filter_style("color: red", &policy(&[])), "");
    }

    #[test]
    fn test_keeps_allowed_declarations() {
        let p = policy(&["color"]);
        assert_eq!(filter_style("color: blue;", &p), "color: blue;");
        assert_eq!(filter_style("top: 0; color: blue;", &p), "color: blue;");
        assert_eq!(filter_style("COLOR:red", &p), "color: red;");
    }

    #[test]
    fn test_multiple_declarations_joined() {
        let p = policy(&["color", "font-family", "margin"]);
        assert_eq!(
            filter_style("color: rgb(1, 2, 3); font-family: 'Open Sans'; margin: 0", &p),
            "color: rgb(1, 2, 3); font-family: 'Open Sans'; margin: 0;"
        );
    }

    #[test]
    fn test_url_values_removed() {
        let p = policy(&["background", "color"]);
        assert_eq!(
            filter_style("background: url(http://evil.example/x.png); color: red", &p),
            "color: red;"
        );
    }

    #[test]
    fn test_expressions_rejected() {
        let p = policy(&["width"]);
        assert_eq!(filter_style("width: expression(alert(1))", &p), "");
        assert_eq!(filter_style("width: 1px; /* x */", &p), "");
        assert_eq!(filter_style(r"width: \65 xpression", &p), "");
    }

    #[test]
    fn test_filtered_output_is_stable() {
        let p = policy(&["color"]);
        let once = filter_style("top: 0; color: blue;", &p);
        assert_eq!(filter_style(&once, &p), once);
    }
}
