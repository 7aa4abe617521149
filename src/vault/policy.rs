//! Master passphrase policy.

use crate::errors::{Result, VaultError};

/// Minimum passphrase length, in characters.
pub const MIN_PASSPHRASE_LEN: usize = 8;

/// Check a candidate master passphrase.
///
/// Requires at least `MIN_PASSPHRASE_LEN` characters, one ASCII letter
/// and one ASCII digit. The error names the first rule that failed.
pub fn check_passphrase(passphrase: &str) -> Result<()> {
    if passphrase.chars().count() < MIN_PASSPHRASE_LEN {
        return Err(VaultError::WeakPassphrase(format!(
            "must be at least {MIN_PASSPHRASE_LEN} characters"
        )));
    }
    if !passphrase.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(VaultError::WeakPassphrase(
            "must contain at least one letter".into(),
        ));
    }
    if !passphrase.chars().any(|c| c.is_ascii_digit()) {
        return Err(VaultError::WeakPassphrase(
            "must contain at least one digit".into(),
        ));
    }
    Ok(())
}
