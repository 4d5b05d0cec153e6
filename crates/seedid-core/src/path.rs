//! Child indices and Ed25519 derivation paths
//!
//! secp256k1 chains use `bitcoin::bip32::DerivationPath` directly. Ed25519 has
//! no non-hardened child derivation, so its paths get their own type that can
//! only be built with every segment hardened.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Bit set on a BIP32/SLIP-10 index to mark it hardened
pub const HARDENED_BIT: u32 = 0x8000_0000;

/// Account/address index supplied by a caller.
///
/// Indices come from JSON bridges and command lines as arbitrary numbers;
/// anything negative, fractional, NaN, infinite or `>= 2^31` is refused here,
/// before any key material is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChildIndex(u32);

impl ChildIndex {
    pub const MAX: u32 = HARDENED_BIT - 1;

    pub fn new(index: u32) -> Result<Self, ValidationError> {
        if index > Self::MAX {
            return Err(ValidationError::InvalidIndex(format!(
                "{} exceeds the maximum of {}",
                index,
                Self::MAX
            )));
        }
        Ok(Self(index))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for ChildIndex {
    type Error = ValidationError;

    fn try_from(index: u32) -> Result<Self, Self::Error> {
        Self::new(index)
    }
}

impl TryFrom<i64> for ChildIndex {
    type Error = ValidationError;

    fn try_from(index: i64) -> Result<Self, Self::Error> {
        if index < 0 {
            return Err(ValidationError::InvalidIndex(format!(
                "{} is negative",
                index
            )));
        }
        let index = u32::try_from(index).map_err(|_| {
            ValidationError::InvalidIndex(format!("{} is out of range", index))
        })?;
        Self::new(index)
    }
}

impl TryFrom<f64> for ChildIndex {
    type Error = ValidationError;

    fn try_from(index: f64) -> Result<Self, Self::Error> {
        if index.is_nan() {
            return Err(ValidationError::InvalidIndex("NaN".to_string()));
        }
        if index.is_infinite() {
            return Err(ValidationError::InvalidIndex(format!("{} is infinite", index)));
        }
        if index.fract() != 0.0 {
            return Err(ValidationError::InvalidIndex(format!(
                "{} is not an integer",
                index
            )));
        }
        if index < 0.0 {
            return Err(ValidationError::InvalidIndex(format!(
                "{} is negative",
                index
            )));
        }
        if index > f64::from(Self::MAX) {
            return Err(ValidationError::InvalidIndex(format!(
                "{} exceeds the maximum of {}",
                index,
                Self::MAX
            )));
        }
        Ok(Self(index as u32))
    }
}

impl FromStr for ChildIndex {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with('-') {
            return Err(ValidationError::InvalidIndex(format!("'{}' is negative", s)));
        }
        let index: u32 = s
            .parse()
            .map_err(|_| ValidationError::InvalidIndex(format!("'{}' is not an integer", s)))?;
        Self::new(index)
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A SLIP-10 path whose segments are all hardened.
///
/// Stores the unhardened index of each segment; the hardened bit is applied
/// at derivation time. `"m"` alone is the master node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HardenedPath(Vec<u32>);

impl HardenedPath {
    /// Build from unhardened segment values.
    pub fn from_indices(indices: impl IntoIterator<Item = u32>) -> Result<Self, ValidationError> {
        let indices: Vec<u32> = indices.into_iter().collect();
        if let Some(bad) = indices.iter().find(|&&i| i > ChildIndex::MAX) {
            return Err(ValidationError::InvalidPath(format!(
                "segment {} is out of range",
                bad
            )));
        }
        Ok(Self(indices))
    }

    pub fn indices(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for HardenedPath {
    type Err = ValidationError;

    /// Parse `m/44'/501'/0'/0'`. `h` and `H` are accepted in place of `'`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut segments = s.trim().split('/');

        if segments.next() != Some("m") {
            return Err(ValidationError::InvalidPath(format!(
                "'{}' must start with 'm'",
                s
            )));
        }

        let mut indices = Vec::new();
        for segment in segments {
            let number = segment
                .strip_suffix('\'')
                .or_else(|| segment.strip_suffix('h'))
                .or_else(|| segment.strip_suffix('H'));

            let number = match number {
                Some(n) => n,
                None if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) => {
                    return Err(ValidationError::NonHardenedSegment(segment.to_string()));
                }
                None => {
                    return Err(ValidationError::InvalidPath(format!(
                        "malformed segment '{}'",
                        segment
                    )));
                }
            };

            if number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ValidationError::InvalidPath(format!(
                    "malformed segment '{}'",
                    segment
                )));
            }

            let index: u32 = number.parse().map_err(|_| {
                ValidationError::InvalidPath(format!("segment '{}' is out of range", segment))
            })?;
            if index > ChildIndex::MAX {
                return Err(ValidationError::InvalidPath(format!(
                    "segment '{}' is out of range",
                    segment
                )));
            }
            indices.push(index);
        }

        Ok(Self(indices))
    }
}

impl fmt::Display for HardenedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{}'", index)?;
        }
        Ok(())
    }
}
