//! Email validation functions

/// Maximum total length of an address
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length of the part before the '@'
pub const MAX_LOCAL_PART_LENGTH: usize = 64;

/// Maximum length of a single domain label
const MAX_LABEL_LENGTH: usize = 63;

/// Characters allowed in an atom of the local part (besides ASCII alphanumerics)
const LOCAL_SPECIALS: &str = "!#$%&'*+/=?^_`{|}~-";

/// Validates email format
///
/// Checks for:
/// - Total length of at most 254 and a local part of at most 64 characters
/// - Exactly one '@' with content on both sides
/// - A local part made of dot-separated atoms (no leading, trailing or doubled dots)
/// - A domain made of dot-separated labels of letters, digits and hyphens,
///   each 1-63 characters and never starting or ending with a hyphen
///
/// A top-level domain is not required, so `user@localhost` is accepted.
pub fn is_valid_email(email: &str) -> bool {
    if email.is_empty() || email.len() > MAX_EMAIL_LENGTH {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if domain.contains('@') {
        return false;
    }

    is_valid_local_part(local) && is_valid_domain(domain)
}

fn is_valid_local_part(local: &str) -> bool {
    if local.is_empty() || local.len() > MAX_LOCAL_PART_LENGTH {
        return false;
    }

    local.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || LOCAL_SPECIALS.contains(c))
    })
}

fn is_valid_domain(domain: &str) -> bool {
    if domain.is_empty() {
        return false;
    }

    domain.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= MAX_LABEL_LENGTH
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}
