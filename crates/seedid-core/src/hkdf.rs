//! HKDF-SHA256 (RFC 5869) extract-then-expand.

use ::hkdf::Hkdf;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::error::{ComputationError, Result, ValidationError};

/// 255 blocks of SHA-256 output
pub const MAX_OUTPUT_LEN: usize = 255 * 32;

/// Extract key used when the caller passes no salt.
pub const DEFAULT_SALT: &[u8] = b"seedid/v1";

/// Expand `ikm` into `length` bytes bound to `info`.
///
/// `info` is anything byte-like, so labels can be passed as `&str`.
/// `salt = None` means [`DEFAULT_SALT`], not the RFC's all-zero salt.
///
/// ```
/// use seedid_core::hkdf::hkdf;
/// let okm = hkdf(b"input key material", "seedid/v1/example", None, 42)?;
/// assert_eq!(okm.len(), 42);
/// # Ok::<(), seedid_core::SeedIdError>(())
/// ```
pub fn hkdf(
    ikm: &[u8],
    info: impl AsRef<[u8]>,
    salt: Option<&[u8]>,
    length: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    if length == 0 || length > MAX_OUTPUT_LEN {
        return Err(ValidationError::HkdfLength {
            requested: length,
            max: MAX_OUTPUT_LEN,
        }
        .into());
    }

    let hk = Hkdf::<Sha256>::new(Some(salt.unwrap_or(DEFAULT_SALT)), ikm);
    let mut okm = Zeroizing::new(vec![0u8; length]);
    hk.expand(info.as_ref(), &mut okm)
        .map_err(|e| ComputationError::KeyDerivation(format!("HKDF expand: {}", e)))?;

    Ok(okm)
}
