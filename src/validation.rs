use crate::error::{Error, Result};

/// Returns why `value` cannot be passed to gpg as a single operand.
///
/// Only values gpg would misread as an option or split into several
/// arguments are refused; everything else is passed through verbatim.
fn argument_problem(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("cannot be empty")
    } else if value.starts_with('-') {
        Some("must not start with '-'")
    } else if value.chars().any(|c| c.is_whitespace() || c.is_control()) {
        Some("must not contain whitespace or control characters")
    } else {
        None
    }
}

/// Validates a key ID before passing to subprocess.
///
/// Key IDs are opaque to this crate: short and long key IDs, v3/v4/v5/v6
/// fingerprints, `0x`-prefixed forms and anything else gpg accepts are
/// returned unchanged. Whether the key exists is left to gpg.
pub fn validate_keyid(keyid: &str) -> Result<&str> {
    match argument_problem(keyid) {
        Some(reason) => Err(Error::InvalidKeyId {
            keyid: keyid.to_string(),
            reason: format!("key ID {reason}"),
        }),
        None => Ok(keyid),
    }
}

/// Validates a set of key IDs, dropping exact duplicates.
///
/// First-seen order is kept so the `--recv-keys` argument list is stable.
pub fn validate_keyids<S: AsRef<str>>(keyids: &[S]) -> Result<Vec<String>> {
    let mut validated: Vec<String> = Vec::with_capacity(keyids.len());
    for keyid in keyids {
        let keyid = validate_keyid(keyid.as_ref())?;
        if !validated.iter().any(|k| k == keyid) {
            validated.push(keyid.to_string());
        }
    }
    Ok(validated)
}

/// Validates a keyserver address before passing to subprocess.
///
/// The address is otherwise handed to gpg verbatim.
pub fn validate_keyserver(keyserver: &str) -> Result<&str> {
    match argument_problem(keyserver) {
        Some(reason) => Err(Error::InvalidKeyserver {
            keyserver: keyserver.to_string(),
            reason: format!("keyserver {reason}"),
        }),
        None => Ok(keyserver),
    }
}
