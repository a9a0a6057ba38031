//! String normalization for attribute values, filter terms, and slugs.
//!
//! Every comparison in the crate goes through one of these functions, so a
//! card tagged `" CSS "` and a filter for `"css"` agree on the same canonical
//! form. All functions are pure and never fail: unknown or garbage input
//! yields an empty result rather than an error.

/// Canonical form for free text: trimmed, lower-cased, with internal
/// whitespace runs (including newlines) collapsed to a single space.
///
/// # Examples
/// ```
/// use labkit::normalize::normalize;
///
/// assert_eq!(normalize("  Web\n  Development "), "web development");
/// assert_eq!(normalize(""), "");
/// ```
pub fn normalize(value: &str) -> String {
    value
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL- and id-safe slug: lower-cased, whitespace runs replaced by a single
/// hyphen, repeated hyphens collapsed, everything outside `[a-z0-9-]`
/// stripped. Leading and trailing hyphens are dropped.
///
/// # Examples
/// ```
/// use labkit::normalize::slugify;
///
/// assert_eq!(slugify("Web  Development"), "web-development");
/// assert_eq!(slugify("C++ & Rust!"), "c-rust");
/// assert_eq!(slugify("---"), "");
/// ```
pub fn slugify(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut pending_hyphen = false;
    for ch in value.to_lowercase().chars() {
        if ch.is_whitespace() || ch == '-' {
            pending_hyphen = !out.is_empty();
        } else if ch.is_ascii_alphanumeric() {
            if pending_hyphen {
                out.push('-');
                pending_hyphen = false;
            }
            out.push(ch);
        }
    }
    out
}

/// Splits a comma-separated attribute value into normalized, non-empty
/// entries, sorted ascending for stable comparison.
///
/// # Examples
/// ```
/// use labkit::normalize::split_list;
///
/// assert_eq!(split_list("Web, CSS ,,html"), vec!["css", "html", "web"]);
/// assert!(split_list(" , ").is_empty());
/// ```
pub fn split_list(raw: &str) -> Vec<String> {
    let mut entries: Vec<String> = raw
        .split(',')
        .map(normalize)
        .filter(|entry| !entry.is_empty())
        .collect();
    entries.sort();
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Hello   World  "), "hello world");
        assert_eq!(normalize("line\none"), "line one");
        assert_eq!(normalize("\t \n"), "");
    }

    #[test]
    fn slugify_strips_non_alphanumeric() {
        assert_eq!(slugify("Tools & Cloud"), "tools-cloud");
        assert_eq!(slugify("already-a-slug"), "already-a-slug");
        assert_eq!(slugify("a  --  b"), "a-b");
        assert_eq!(slugify("-leading and trailing-"), "leading-and-trailing");
    }

    #[test]
    fn slugify_of_garbage_is_empty() {
        assert_eq!(slugify("!!! ???"), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn split_list_sorts_and_drops_empties() {
        assert_eq!(split_list("b,a,c"), vec!["a", "b", "c"]);
        assert_eq!(split_list("One,  one "), vec!["one", "one"]);
        assert!(split_list("").is_empty());
    }
}
