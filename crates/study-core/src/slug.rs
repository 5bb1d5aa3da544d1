//! Slug derivation with collision retry.
//!
//! Pure functions over an abstract set of taken slugs, independent of how
//! topics are stored.

use std::collections::HashSet;

/// Maximum number of candidates tried before giving up.
pub const MAX_SLUG_ATTEMPTS: u32 = 10;

/// Result of a [`unique_slug`] search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugOutcome {
    /// A free slug was found.
    Unique(String),
    /// Every candidate up to the attempt cap was taken.
    Exhausted,
}

/// Normalize a title into its base slug.
///
/// Lowercases, collapses whitespace runs into single hyphens and strips
/// everything outside `[a-z0-9_-]`. May return an empty string for titles
/// with no usable characters.
pub fn slugify(title: &str) -> String {
    title
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-' || *c == '_')
        .collect()
}

/// Find a slug not present in `taken`, suffixing `-1`, `-2`, ... on
/// collision, up to `max_attempts` candidates in total.
pub fn unique_slug(base: &str, taken: &HashSet<String>, max_attempts: u32) -> SlugOutcome {
    if !taken.contains(base) {
        return SlugOutcome::Unique(base.to_string());
    }
    for n in 1..max_attempts {
        let candidate = format!("{}-{}", base, n);
        if !taken.contains(&candidate) {
            return SlugOutcome::Unique(candidate);
        }
    }
    SlugOutcome::Exhausted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taken(slugs: &[&str]) -> HashSet<String> {
        slugs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Java Basics"), "java-basics");
        assert_eq!(slugify("  Rust   Ownership  "), "rust-ownership");
    }

    #[test]
    fn test_slugify_strips_specials() {
        assert_eq!(slugify("C++ & Friends!"), "c-friends");
        assert_eq!(slugify("100% Coverage?"), "100-coverage");
        assert_eq!(slugify("snake_case stays"), "snake_case-stays");
    }

    #[test]
    fn test_slugify_can_be_empty() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("   "), "");
    }

    #[test]
    fn test_unique_slug_free_base() {
        let outcome = unique_slug("java-basics", &taken(&[]), MAX_SLUG_ATTEMPTS);
        assert_eq!(outcome, SlugOutcome::Unique("java-basics".into()));
    }

    #[test]
    fn test_unique_slug_suffixes_in_order() {
        let set = taken(&["java-basics"]);
        assert_eq!(
            unique_slug("java-basics", &set, MAX_SLUG_ATTEMPTS),
            SlugOutcome::Unique("java-basics-1".into())
        );

        let set = taken(&["java-basics", "java-basics-1"]);
        assert_eq!(
            unique_slug("java-basics", &set, MAX_SLUG_ATTEMPTS),
            SlugOutcome::Unique("java-basics-2".into())
        );
    }

    #[test]
    fn test_unique_slug_exhausts_at_cap() {
        let mut set = taken(&["t"]);
        for n in 1..MAX_SLUG_ATTEMPTS {
            set.insert(format!("t-{}", n));
        }
        assert_eq!(unique_slug("t", &set, MAX_SLUG_ATTEMPTS), SlugOutcome::Exhausted);

        // One free candidate below the cap is still found
        set.remove("t-9");
        assert_eq!(
            unique_slug("t", &set, MAX_SLUG_ATTEMPTS),
            SlugOutcome::Unique("t-9".into())
        );
    }

    #[test]
    fn test_slug_alphabet() {
        for title in ["Java Basics", "C++ & Friends!", "Grand Café", "a_b c-d"] {
            let slug = slugify(title);
            assert!(
                slug.chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_'),
                "bad slug {:?} for {:?}",
                slug,
                title
            );
        }
    }
}
