//! Phone number normalization and validation.

/// Strip formatting from a raw phone string, keeping only `+` and digits.
///
/// `"+7 (917) 971 11-11"` becomes `"+79179711111"`. A stray `+` in the
/// middle of the input survives normalization and is rejected by
/// [`is_valid`].
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| *c == '+' || c.is_ascii_digit())
        .collect()
}

/// A normalized phone is valid when it is exactly 11 digits with an
/// optional leading `+`.
pub fn is_valid(candidate: &str) -> bool {
    let digits = candidate.strip_prefix('+').unwrap_or(candidate);
    digits.len() == 11 && digits.bytes().all(|b| b.is_ascii_digit())
}
