//! Hash function registry.
//!
//! Maps multihash codes to digest implementations and wraps the result
//!  into a [`Multihash`].

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256, Sha512};

use super::Multihash;

/// Sentinel used by hosts to mean "no hash function requested".
pub const UNSPECIFIED_HASH: u64 = u64::MAX;
/// Digest length that means "whatever the hash function natively produces".
pub const NATIVE_HASH_LENGTH: i32 = -1;
/// Largest digest a [`Multihash`] in this crate can hold.
pub const MAX_DIGEST_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HashError {
    #[error("unsupported hash function: {0:#x}")]
    UnsupportedHashFunction(u64),
    #[error("unsupported digest length {length} for hash function {code:#x}")]
    UnsupportedHashLength { code: u64, length: i32 },
    #[error("unknown hash function name: {0}")]
    UnknownName(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashFunction {
    Sha2_256,
    Sha2_512,
    Blake3,
}

impl HashFunction {
    pub fn from_code(code: u64) -> Result<Self, HashError> {
        match code {
            0x12 => Ok(HashFunction::Sha2_256),
            0x13 => Ok(HashFunction::Sha2_512),
            0x1e => Ok(HashFunction::Blake3),
            other => Err(HashError::UnsupportedHashFunction(other)),
        }
    }

    /// Multihash code
    pub fn code(&self) -> u64 {
        match self {
            HashFunction::Sha2_256 => 0x12,
            HashFunction::Sha2_512 => 0x13,
            HashFunction::Blake3 => 0x1e,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            HashFunction::Sha2_256 => "sha2-256",
            HashFunction::Sha2_512 => "sha2-512",
            HashFunction::Blake3 => "blake3",
        }
    }

    /// Digest size in bytes when no length is requested
    pub fn native_length(&self) -> usize {
        match self {
            HashFunction::Sha2_256 => 32,
            HashFunction::Sha2_512 => 64,
            HashFunction::Blake3 => 32,
        }
    }

    /// Longest digest this function can produce.
    ///  BLAKE3 is an XOF, so it can stretch to fill a whole multihash.
    pub fn max_length(&self) -> usize {
        match self {
            HashFunction::Blake3 => MAX_DIGEST_SIZE,
            other => other.native_length(),
        }
    }

    fn digest(&self, data: &[u8], length: usize) -> Vec<u8> {
        match self {
            HashFunction::Sha2_256 => Sha256::digest(data)[..length].to_vec(),
            HashFunction::Sha2_512 => Sha512::digest(data)[..length].to_vec(),
            HashFunction::Blake3 => {
                let mut out = vec![0u8; length];
                let mut hasher = blake3::Hasher::new();
                hasher.update(data);
                hasher.finalize_xof().fill(&mut out);
                out
            }
        }
    }

    /// Hash `data` into a multihash of `length` bytes.
    ///  A length of [`NATIVE_HASH_LENGTH`] picks the native digest size;
    ///  shorter lengths truncate.
    pub fn sum(&self, data: &[u8], length: i32) -> Result<Multihash<MAX_DIGEST_SIZE>, HashError> {
        let length = self.resolve_length(length)?;
        let digest = self.digest(data, length);
        // resolve_length keeps us within MAX_DIGEST_SIZE, so wrap cannot fail
        Multihash::wrap(self.code(), &digest).map_err(|_| HashError::UnsupportedHashLength {
            code: self.code(),
            length: length as i32,
        })
    }

    fn resolve_length(&self, length: i32) -> Result<usize, HashError> {
        if length == NATIVE_HASH_LENGTH {
            return Ok(self.native_length());
        }
        match usize::try_from(length) {
            Ok(len) if len > 0 && len <= self.max_length() => Ok(len),
            _ => Err(HashError::UnsupportedHashLength {
                code: self.code(),
                length,
            }),
        }
    }
}

impl fmt::Display for HashFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for HashFunction {
    type Err = HashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha2-256" | "sha256" => Ok(HashFunction::Sha2_256),
            "sha2-512" | "sha512" => Ok(HashFunction::Sha2_512),
            "blake3" => Ok(HashFunction::Blake3),
            _ => Err(HashError::UnknownName(s.to_string())),
        }
    }
}

/// Hash `data` with the function identified by multihash `code`.
///  [`UNSPECIFIED_HASH`] falls back to SHA2-256.
pub fn sum(data: &[u8], code: u64, length: i32) -> Result<Multihash<MAX_DIGEST_SIZE>, HashError> {
    let function = if code == UNSPECIFIED_HASH {
        HashFunction::Sha2_256
    } else {
        HashFunction::from_code(code)?
    };
    function.sum(data, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha2_256_native_length() {
        let mh = sum(b"hello", 0x12, NATIVE_HASH_LENGTH).unwrap();
        assert_eq!(mh.code(), 0x12);
        assert_eq!(mh.size(), 32);
        assert_eq!(
            hex::encode(mh.digest()),
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }

    #[test]
    fn test_unspecified_falls_back_to_sha2_256() {
        let a = sum(b"hello", UNSPECIFIED_HASH, NATIVE_HASH_LENGTH).unwrap();
        let b = sum(b"hello", 0x12, NATIVE_HASH_LENGTH).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_truncated_digest() {
        let full = sum(b"hello", 0x13, NATIVE_HASH_LENGTH).unwrap();
        let short = sum(b"hello", 0x13, 20).unwrap();
        assert_eq!(short.size(), 20);
        assert_eq!(short.digest(), &full.digest()[..20]);
    }

    #[test]
    fn test_blake3_extends() {
        let mh = sum(b"hello", 0x1e, 64).unwrap();
        assert_eq!(mh.size(), 64);
        let native = sum(b"hello", 0x1e, NATIVE_HASH_LENGTH).unwrap();
        assert_eq!(native.digest(), blake3::hash(b"hello").as_bytes());
        assert_eq!(&mh.digest()[..32], native.digest());
    }

    #[test]
    fn test_bad_lengths() {
        assert_eq!(
            sum(b"x", 0x12, 33),
            Err(HashError::UnsupportedHashLength {
                code: 0x12,
                length: 33
            })
        );
        assert!(sum(b"x", 0x12, 0).is_err());
        assert!(sum(b"x", 0x12, -2).is_err());
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(
            sum(b"x", 0xb220, NATIVE_HASH_LENGTH),
            Err(HashError::UnsupportedHashFunction(0xb220))
        );
    }

    #[test]
    fn test_names() {
        assert_eq!("sha2-256".parse::<HashFunction>().unwrap(), HashFunction::Sha2_256);
        assert_eq!("BLAKE3".parse::<HashFunction>().unwrap(), HashFunction::Blake3);
        assert_eq!(HashFunction::Sha2_512.to_string(), "sha2-512");
        assert!("md5".parse::<HashFunction>().is_err());
    }
}
