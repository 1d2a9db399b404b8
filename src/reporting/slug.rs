//! File-system safe identifiers for destination labels.

use std::collections::HashSet;

/// Turn `label` into a unique slug, recording it in `used`.
///
/// Lowercase ASCII letters and digits are kept; every other run of characters
/// becomes a single `-`. Collisions get `-2`, `-3`, ... appended.
pub fn slugify(label: &str, used: &mut HashSet<String>) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut pending_dash = false;
    for c in label.trim().to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        slug.push_str("destination");
    }

    let base = slug.clone();
    let mut counter = 2;
    while used.contains(&slug) {
        slug = format!("{base}-{counter}");
        counter += 1;
    }
    used.insert(slug.clone());
    slug
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugs() {
        let mut used = HashSet::new();
        assert_eq!(slugify("Frisco, CO", &mut used), "frisco-co");
        assert_eq!(slugify("  Winter Park, CO!! ", &mut used), "winter-park-co");
        assert_eq!(slugify("Crested Butte (Mt.)", &mut used), "crested-butte-mt");
    }

    #[test]
    fn test_empty_and_symbol_only() {
        let mut used = HashSet::new();
        assert_eq!(slugify("", &mut used), "destination");
        assert_eq!(slugify("???", &mut used), "destination-2");
    }

    #[test]
    fn test_collisions() {
        let mut used = HashSet::new();
        assert_eq!(slugify("Vail", &mut used), "vail");
        assert_eq!(slugify("VAIL", &mut used), "vail-2");
        assert_eq!(slugify("vail!", &mut used), "vail-3");
    }
}
