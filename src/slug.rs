//! Slug generation for output file names.

/// Maximum length for truncated slugs
const MAX_SLUG_LENGTH: usize = 50;

/// Convert a string to a URL-friendly slug (basic conversion).
///
/// Does NOT truncate - use `slugify_truncate` for length-limited slugs.
pub fn slugify(title: &str) -> String {
    let slug: String = title
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    // Collapse consecutive dashes and trim leading/trailing dashes
    let mut result = String::new();
    let mut prev_dash = true;
    for c in slug.chars() {
        if c == '-' {
            if !prev_dash {
                result.push(c);
            }
            prev_dash = true;
        } else {
            result.push(c);
            prev_dash = false;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    result
}

/// Slug truncated at a word boundary to stay under `MAX_SLUG_LENGTH` bytes.
///
/// Falls back to `"untitled"` when nothing slug-worthy is left.
pub fn slugify_truncate(title: &str) -> String {
    let mut result = slugify(title);

    if result.len() > MAX_SLUG_LENGTH {
        let mut cut = MAX_SLUG_LENGTH;
        while !result.is_char_boundary(cut) {
            cut -= 1;
        }
        match result[..cut].rfind('-') {
            Some(pos) => result.truncate(pos),
            None => result.truncate(cut),
        }
    }

    if result.ends_with('-') {
        result.pop();
    }
    if result.is_empty() {
        result.push_str("untitled");
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Test 123!"), "test-123");
        assert_eq!(slugify("  Multiple   Spaces  "), "multiple-spaces");
    }

    #[test]
    fn test_slugify_truncate_long_title() {
        let title = "The Complete Beginner's Guide to Zero-Based Budgeting for Young Professionals in 2026";
        let slug = slugify_truncate(title);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(!slug.ends_with('-'));
        assert!(slug.starts_with("the-complete-beginner-s-guide"));
    }

    #[test]
    fn test_slugify_truncate_short_title() {
        assert_eq!(slugify_truncate("Index Funds 101"), "index-funds-101");
    }

    #[test]
    fn test_slugify_truncate_multibyte() {
        let title = "é".repeat(40);
        let slug = slugify_truncate(&title);
        assert!(slug.len() <= MAX_SLUG_LENGTH);
        assert!(slug.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_slugify_truncate_empty() {
        assert_eq!(slugify_truncate("!!!"), "untitled");
    }
}
