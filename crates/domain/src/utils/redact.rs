//! Secret masking for logs and `Debug` output

/// Replace every word character (`[A-Za-z0-9_]`) with `x`
///
/// Keeps the length and punctuation of the secret visible, which is enough to
/// spot an obviously wrong value in a debug log without leaking it.
pub fn mask_secret(secret: &str) -> String {
    secret.chars().map(|c| if c.is_ascii_alphanumeric() || c == '_' { 'x' } else { c }).collect()
}
