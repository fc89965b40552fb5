//! Identity key derivation for business records.

/// Separator joining the identity components before normalization.
const SEPARATOR: char = '|';

/// Derive the canonical identity key for a business from its defining
/// fields: name, street address, and locality.
///
/// The three components are joined, lower-cased, and reduced to ASCII
/// letters and digits, so records differing only in case, punctuation,
/// or whitespace resolve to the same key. This is the only identity
/// formula in the system; callers must not derive their own variants.
pub fn identity_key(name: &str, address: &str, locality: &str) -> String {
    let mut joined = String::with_capacity(name.len() + address.len() + locality.len() + 2);
    joined.push_str(name);
    joined.push(SEPARATOR);
    joined.push_str(address);
    joined.push(SEPARATOR);
    joined.push_str(locality);

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_is_case_insensitive() {
        let a = identity_key("Acme Plumbing", "1 Main St", "Austin");
        let b = identity_key("ACME PLUMBING", "1 main st", "AUSTIN");
        assert_eq!(a, b);
    }

    #[test]
    fn test_identity_ignores_punctuation() {
        let a = identity_key("Acme Plumbing", "1 Main St.", "Austin");
        let b = identity_key("Acme Plumbing!", "1, Main St", "Austin");
        assert_eq!(a, b);
        assert_eq!(a, "acmeplumbing1mainstaustin");
    }

    #[test]
    fn test_identity_distinguishes_different_businesses() {
        let a = identity_key("Acme Plumbing", "1 Main St", "Austin");
        let b = identity_key("Acme Plumbing", "2 Main St", "Austin");
        assert_ne!(a, b);
    }

    #[test]
    fn test_identity_of_empty_fields_is_empty() {
        assert_eq!(identity_key("", "", ""), "");
    }
}
