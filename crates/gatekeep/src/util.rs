/// Canonical form of an email used for lookups and uniqueness
///
/// Addresses are compared case-insensitively; surrounding whitespace is dropped.
pub fn normalise_email(original: &str) -> String {
    original.trim().to_lowercase()
}
