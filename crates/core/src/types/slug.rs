//! URL-safe slug generation.

/// Derive a URL-safe slug from a display name.
///
/// Lowercases the input and collapses every run of non-alphanumeric
/// characters into a single `-`, trimming leading and trailing dashes.
///
/// # Example
///
/// ```rust
/// # use summit_core::slugify;
/// assert_eq!(slugify("Trail Running Shoes 2.0"), "trail-running-shoes-2-0");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_dash = true;
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            slug.push('-');
            last_dash = true;
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
    fn test_basic() {
        assert_eq!(slugify("Camping Gear"), "camping-gear");
    }

    #[test]
    fn test_collapses_punctuation() {
        assert_eq!(slugify("Yoga & Pilates!"), "yoga-pilates");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(slugify("  -- Bikes -- "), "bikes");
    }

    #[test]
    fn test_empty() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("???"), "");
    }
}
