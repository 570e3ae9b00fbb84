//! # Address-Typed Identifiers
//!
//! Zero-cost wrappers around 20-byte addresses for the two kinds of principal
//! the AMM engine deals with:
//!
//! - [`AssetId`]: a fungible asset (the token contract address)
//! - [`HolderId`]: an account that owns assets or liquidity shares
//!
//! Both share one macro-generated implementation so they cannot be mixed up
//! at a call site while keeping identical layout, ordering and hex encoding.
//!
//! ## Ordering
//!
//! Addresses compare byte-wise, which is the same as comparing them as
//! big-endian 160-bit integers. Canonical pair ordering relies on this.
//!
//! ## Encoding
//!
//! `Display`, `FromStr` and serde all use `0x`-prefixed lowercase hex:
//!
//! ```rust
//! use torq_types::AssetId;
//!
//! let usdc: AssetId = "0x2791bca1f2de4661ed88a30c99a7a9449aa84174".parse().unwrap();
//! assert_eq!(usdc.to_string(), "0x2791bca1f2de4661ed88a30c99a7a9449aa84174");
//! assert!(!usdc.is_zero());
//! ```

use crate::common::errors::ValidationError;

/// Length of an address in bytes
pub const ADDRESS_LEN: usize = 20;

/// Macro for generating 20-byte address wrappers
///
/// Generated types are `Copy`, totally ordered, hashable, and encode as hex
/// strings through serde so config files and scenario files stay readable.
macro_rules! define_address_type {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        #[repr(transparent)]
        pub struct $name(pub [u8; ADDRESS_LEN]);

        impl $name {
            /// The all-zero address, used as the null sentinel
            pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

            #[inline(always)]
            pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
                Self(bytes)
            }

            /// Build an address whose low 8 bytes hold `value` (big-endian)
            ///
            /// Ordering of the results matches ordering of `value`.
            pub const fn from_low_u64(value: u64) -> Self {
                let mut bytes = [0u8; ADDRESS_LEN];
                let be = value.to_be_bytes();
                let mut i = 0;
                while i < 8 {
                    bytes[ADDRESS_LEN - 8 + i] = be[i];
                    i += 1;
                }
                Self(bytes)
            }

            #[inline(always)]
            pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
                &self.0
            }

            #[inline(always)]
            pub const fn into_inner(self) -> [u8; ADDRESS_LEN] {
                self.0
            }

            /// True for the null sentinel
            #[inline]
            pub fn is_zero(&self) -> bool {
                self.0 == [0u8; ADDRESS_LEN]
            }

            /// Parse from hex, with or without `0x`
            pub fn from_hex(input: &str) -> Result<Self, ValidationError> {
                let trimmed = input
                    .strip_prefix("0x")
                    .or_else(|| input.strip_prefix("0X"))
                    .unwrap_or(input);
                if trimmed.len() != ADDRESS_LEN * 2 {
                    return Err(ValidationError::InvalidLength {
                        expected: ADDRESS_LEN * 2,
                        actual: trimmed.len(),
                    });
                }
                let mut bytes = [0u8; ADDRESS_LEN];
                hex::decode_to_slice(trimmed, &mut bytes).map_err(|e| {
                    ValidationError::InvalidHex {
                        input: input.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                Ok(Self(bytes))
            }

            /// Lowercase hex with `0x` prefix
            pub fn to_hex(&self) -> String {
                format!("0x{}", hex::encode(self.0))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}({})", stringify!($name), self)
            }
        }

        impl std::str::FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_hex(s)
            }
        }

        impl From<[u8; ADDRESS_LEN]> for $name {
            #[inline(always)]
            fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
                Self(bytes)
            }
        }

        impl From<$name> for [u8; ADDRESS_LEN] {
            #[inline(always)]
            fn from(address: $name) -> [u8; ADDRESS_LEN] {
                address.0
            }
        }

        impl AsRef<[u8]> for $name {
            #[inline(always)]
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
            where
                S: serde::Serializer,
            {
                serializer.serialize_str(&self.to_hex())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::from_hex(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

define_address_type!(
    /// Fungible asset identifier (token contract address)
    ///
    /// `AssetId::ZERO` is reserved and never names a real asset.
    AssetId
);

define_address_type!(
    /// Account identifier for asset and liquidity-share holders
    HolderId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_roundtrip_with_and_without_prefix() {
        let raw = "2791bca1f2de4661ed88a30c99a7a9449aa84174";
        let with_prefix: AssetId = format!("0x{}", raw).parse().unwrap();
        let without_prefix: AssetId = raw.parse().unwrap();

        assert_eq!(with_prefix, without_prefix);
        assert_eq!(with_prefix.to_string(), format!("0x{}", raw));
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = HolderId::from_hex("0x1234").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidLength {
                expected: 40,
                actual: 4
            }
        );
    }

    #[test]
    fn test_rejects_non_hex() {
        let bad = format!("0x{}", "zz".repeat(20));
        assert!(matches!(
            AssetId::from_hex(&bad),
            Err(ValidationError::InvalidHex { .. })
        ));
    }

    #[test]
    fn test_ordering_matches_numeric_value() {
        let small = AssetId::from_low_u64(7);
        let large = AssetId::from_low_u64(300);
        assert!(small < large);
        assert!(AssetId::ZERO < small);

        let mut high_byte = [0u8; ADDRESS_LEN];
        high_byte[0] = 1;
        assert!(AssetId::new(high_byte) > AssetId::from_low_u64(u64::MAX));
    }

    #[test]
    fn test_zero_sentinel() {
        assert!(AssetId::ZERO.is_zero());
        assert!(AssetId::default().is_zero());
        assert!(!AssetId::from_low_u64(1).is_zero());
    }

    #[test]
    fn test_serde_uses_hex_strings() {
        let holder = HolderId::from_low_u64(0xabcdef);
        let json = serde_json::to_string(&holder).unwrap();
        assert_eq!(json, "\"0x0000000000000000000000000000000000abcdef\"");

        let back: HolderId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, holder);

        assert!(serde_json::from_str::<HolderId>("\"0xnope\"").is_err());
    }
}
