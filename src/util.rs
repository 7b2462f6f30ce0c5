use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Turns an author slug like `jane-doe` into `Jane Doe`.
pub fn format_author_name(slug: &str) -> String {
    slug.split('-')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Splits a semicolon-delimited tag string into trimmed, non-empty tags.
pub fn split_tags(tags: &str) -> Vec<&str> {
    tags.split(';')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .collect()
}

/// Deterministic per-id triple in [-1, 1], used to jitter seed positions.
pub fn stable_triple(id: &str) -> (f32, f32, f32) {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    let hash = hasher.finish();

    let unit = |bits: u64| ((bits & 0x1f_ffff) as f64 / 0x1f_ffff as f64) as f32;
    let x = unit(hash);
    let y = unit(hash >> 21);
    let z = unit(hash >> 42);
    ((x * 2.0) - 1.0, (y * 2.0) - 1.0, (z * 2.0) - 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_slug_formats_as_title_case() {
        assert_eq!(format_author_name("jane-doe"), "Jane Doe");
        assert_eq!(format_author_name("prince"), "Prince");
        assert_eq!(format_author_name(""), "");
    }

    #[test]
    fn tags_split_and_trim() {
        assert_eq!(split_tags("ai; culture ;"), vec!["ai", "culture"]);
        assert!(split_tags("").is_empty());
    }

    #[test]
    fn stable_triple_is_deterministic_and_bounded() {
        let a = stable_triple("node-1");
        let b = stable_triple("node-1");
        assert_eq!(a, b);
        for value in [a.0, a.1, a.2] {
            assert!((-1.0..=1.0).contains(&value));
        }
    }
}
