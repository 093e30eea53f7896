//! Content fingerprints for indexed files
//!
//! A fingerprint is a 256-bit digest of a file's bytes. The only contract the
//! rest of the crate relies on is "identical content => identical
//! fingerprint"; the hash function itself is pluggable through
//! [`Fingerprinter`].

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::Digest;
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read buffer used when streaming a file through a hasher
const BUFFER_SIZE: usize = 64 * 1024;

/// A 32-byte content digest, hex-encoded when persisted
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Create a fingerprint from raw digest bytes
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the digest as a byte slice
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Lowercase hex, 64 characters
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 64-character hex string
    pub fn from_hex(s: &str) -> Result<Self> {
        if s.len() != 64 {
            return Err(Error::InvalidFingerprint(format!(
                "expected 64 hex characters, got {}",
                s.len()
            )));
        }

        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)
            .map_err(|e| Error::InvalidFingerprint(format!("{s}: {e}")))?;
        Ok(Self(bytes))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = self.to_hex();
        write!(f, "Fingerprint({})", &hex[..16])
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let hex = String::deserialize(deserializer)?;
        Fingerprint::from_hex(&hex).map_err(serde::de::Error::custom)
    }
}

/// Hash function used to fingerprint file contents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FingerprintAlgorithm {
    /// SHA-256 (default, compatible with existing indexes)
    #[default]
    Sha256,
    /// BLAKE3
    Blake3,
}

impl FingerprintAlgorithm {
    /// Short lowercase name, as written to the index
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Blake3 => "blake3",
        }
    }

    /// Get a fingerprinter for this algorithm
    pub fn fingerprinter(&self) -> &'static dyn Fingerprinter {
        match self {
            Self::Sha256 => &Sha256,
            Self::Blake3 => &Blake3,
        }
    }
}

impl fmt::Display for FingerprintAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pluggable content hash
///
/// Implementations must stream their input: memory use is bounded by one read
/// buffer regardless of file size.
pub trait Fingerprinter: Send + Sync {
    /// Which algorithm this is
    fn algorithm(&self) -> FingerprintAlgorithm;

    /// Hash everything the reader yields
    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint>;

    /// Hash a file by path
    fn fingerprint_file(&self, path: &Path) -> io::Result<Fingerprint> {
        let mut file = File::open(path)?;
        self.fingerprint_reader(&mut file)
    }
}

/// SHA-256 fingerprinter
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256;

impl Fingerprinter for Sha256 {
    fn algorithm(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Sha256
    }

    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
        let mut hasher = sha2::Sha256::new();
        stream(reader, |chunk| hasher.update(chunk))?;

        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&hasher.finalize());
        Ok(Fingerprint::from_bytes(bytes))
    }
}

/// BLAKE3 fingerprinter
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3;

impl Fingerprinter for Blake3 {
    fn algorithm(&self) -> FingerprintAlgorithm {
        FingerprintAlgorithm::Blake3
    }

    fn fingerprint_reader(&self, reader: &mut dyn Read) -> io::Result<Fingerprint> {
        let mut hasher = blake3::Hasher::new();
        stream(reader, |chunk| {
            hasher.update(chunk);
        })?;
        Ok(Fingerprint::from_bytes(*hasher.finalize().as_bytes()))
    }
}

/// Feed a reader to `update` one buffer at a time
fn stream(reader: &mut dyn Read, mut update: impl FnMut(&[u8])) -> io::Result<()> {
    let mut buffer = vec![0u8; BUFFER_SIZE];
    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        update(&buffer[..bytes_read]);
    }
}

/// Fingerprint an in-memory buffer
pub fn fingerprint_bytes(algorithm: FingerprintAlgorithm, data: &[u8]) -> Fingerprint {
    match algorithm {
        FingerprintAlgorithm::Sha256 => {
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&sha2::Sha256::digest(data));
            Fingerprint::from_bytes(bytes)
        }
        FingerprintAlgorithm::Blake3 => Fingerprint::from_bytes(*blake3::hash(data).as_bytes()),
    }
}
