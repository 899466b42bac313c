//! Slug derivation from post titles.

use deunicode::deunicode;

/// Turn a title into a URL and file-name friendly slug.
///
/// Non-ASCII text is transliterated, letters are lowercased and every run of
/// other characters becomes a single `-`.
pub fn slugify(title: &str) -> String {
    let ascii = deunicode(title);
    let mut slug = String::with_capacity(ascii.len());

    for c in ascii.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_simple_title() {
        assert_eq!(slugify("Hello World"), "hello-world");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("My Article (2024) - Part #1"), "my-article-2024-part-1");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  ...Why?  "), "why");
    }

    #[test]
    fn test_slugify_transliterates() {
        assert_eq!(slugify("Café Übersicht"), "cafe-ubersicht");
    }

    #[test]
    fn test_slugify_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("!!!"), "");
    }
}
