//! Filename-based title fallback.

/// Derive a display title from a file or directory name.
///
/// `-` and `_` become spaces. The result is capitalized only when the
/// name was entirely lowercase, so names like `FAQ` or `OAuth-setup`
/// keep their casing.
#[must_use]
pub fn title_from_name(name: &str) -> String {
    let spaced = name.replace(['-', '_'], " ");
    if spaced.to_lowercase() != spaced {
        return spaced;
    }
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}
