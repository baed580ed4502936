//! Lock-name utilities

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use sha2::{Digest, Sha512};

/// Maximum length a stored lock name may have.
pub const MAX_LOCK_NAME_LEN: usize = 255;

/// Map an arbitrary base name onto a valid lock name of bounded length.
///
/// Names that are already valid and short enough pass through untouched.
/// Otherwise the result is a prefix of the sanitized name followed by a
/// base64 SHA-512 hash of the original, truncated to `max_len`, so that
/// distinct long names stay distinct.
pub fn to_safe_lock_name<F>(base_name: &str, max_len: usize, sanitize: F) -> String
where
    F: Fn(&str) -> String,
{
    let valid_name = sanitize(base_name);
    if valid_name == base_name && base_name.chars().count() <= max_len {
        return base_name.to_string();
    }

    let hash = BASE64.encode(Sha512::digest(base_name.as_bytes()));
    if hash.len() >= max_len {
        return hash[..max_len].to_string();
    }

    let prefix: String = valid_name.chars().take(max_len - hash.len()).collect();
    format!("{}{}", prefix, hash)
}
