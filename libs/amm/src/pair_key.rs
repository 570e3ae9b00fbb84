//! Canonical pair identification
//!
//! An unordered asset pair maps to exactly one [`PairKey`]: the assets are
//! sorted by address and the Keccak-256 digest of `low ‖ high` is the key.

use crate::error::{AmmError, AmmResult};
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use torq_types::{AssetId, ADDRESS_LEN};

/// Order-independent pool identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey([u8; 32]);

impl PairKey {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Display for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for PairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PairKey({})", self)
    }
}

impl Serialize for PairKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PairKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let digits = raw.strip_prefix("0x").unwrap_or(&raw);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(serde::de::Error::custom)?;
        Ok(PairKey(bytes))
    }
}

/// Sort two assets into canonical `(low, high)` order
///
/// Fails with [`AmmError::IdenticalAssets`] for equal inputs and with
/// [`AmmError::ZeroAsset`] when the lower asset is the null sentinel.
pub fn sort_assets(a: AssetId, b: AssetId) -> AmmResult<(AssetId, AssetId)> {
    if a == b {
        return Err(AmmError::IdenticalAssets);
    }
    let (low, high) = if a < b { (a, b) } else { (b, a) };
    if low.is_zero() {
        return Err(AmmError::ZeroAsset);
    }
    Ok((low, high))
}

/// Derive the pool key for an unordered pair
pub fn pair_key(a: AssetId, b: AssetId) -> AmmResult<PairKey> {
    let (low, high) = sort_assets(a, b)?;
    Ok(key_for_sorted(low, high))
}

/// Hash an already-sorted pair
pub(crate) fn key_for_sorted(low: AssetId, high: AssetId) -> PairKey {
    let mut packed = [0u8; ADDRESS_LEN * 2];
    packed[..ADDRESS_LEN].copy_from_slice(low.as_bytes());
    packed[ADDRESS_LEN..].copy_from_slice(high.as_bytes());
    PairKey(Keccak256::digest(packed).into())
}

/// A pair resolved against canonical order, remembering the caller's order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPair {
    pub key: PairKey,
    pub low: AssetId,
    pub high: AssetId,
    /// True when the caller passed `(high, low)`
    pub flipped: bool,
}

impl ResolvedPair {
    pub fn new(a: AssetId, b: AssetId) -> AmmResult<Self> {
        let (low, high) = sort_assets(a, b)?;
        Ok(Self {
            key: key_for_sorted(low, high),
            low,
            high,
            flipped: a != low,
        })
    }

    /// Translate caller-ordered values into canonical order
    pub fn to_canonical<T>(&self, a: T, b: T) -> (T, T) {
        if self.flipped {
            (b, a)
        } else {
            (a, b)
        }
    }

    /// Translate canonical values back into caller order
    pub fn to_caller<T>(&self, low: T, high: T) -> (T, T) {
        self.to_canonical(low, high)
    }
}
