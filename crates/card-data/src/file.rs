//! Protected file data
//!
//! A file written to the card is guarded either by the user's passcode or by
//! an issuer signature. Each protection scheme is only understood by a fixed
//! range of card firmware, available through [`FirmwareRestricted`] without
//! looking at the payload.
//!
//! Nothing here verifies signatures or checks the passcode. These types
//! carry the material to the command layer and render the records that the
//! write flow sends at its start and at its end.

use std::fmt;

use bytes::Bytes;
use sha2::{Digest, Sha256};
#[cfg(feature = "zeroize")]
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::firmware::{FirmwareRange, FirmwareRestricted, FirmwareVersion};
use crate::tag::Tag;
use crate::tlv::TlvBuilder;

/// Largest file the card accepts
pub const MAX_FILE_SIZE: usize = 48 * 1024;

/// Largest chunk sent in a single write command
pub const SINGLE_WRITE_SIZE: usize = 900;

/// Protection scheme of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectionKind {
    /// Protected by the user passcode
    Passcode,
    /// Protected by an issuer signature
    Signature,
}

impl ProtectionKind {
    /// Firmware range the scheme is defined for
    pub const fn range(self) -> FirmwareRange {
        match self {
            Self::Passcode => FirmwareRange::from_bounds(
                FirmwareVersion::PASSCODE_PROTECTED_FILES_AVAILABLE,
                FirmwareVersion::MAX,
            ),
            Self::Signature => {
                FirmwareRange::from_bounds(FirmwareVersion::FILES_AVAILABLE, FirmwareVersion::MAX)
            }
        }
    }
}

impl FirmwareRestricted for ProtectionKind {
    fn min_firmware_version(&self) -> FirmwareVersion {
        self.range().min()
    }

    fn max_firmware_version(&self) -> FirmwareVersion {
        self.range().max()
    }
}

/// Issuer signatures over a file
///
/// The starting signature covers the card id, the file size and the
/// counter. The finalizing signature covers the card id, the file data and
/// the counter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDataSignature {
    /// Signature sent when the write starts
    pub starting: Bytes,
    /// Signature sent when the write is confirmed
    pub finalizing: Bytes,
}

impl FileDataSignature {
    /// Create a signature pair
    pub fn new(starting: impl Into<Bytes>, finalizing: impl Into<Bytes>) -> Self {
        Self {
            starting: starting.into(),
            finalizing: finalizing.into(),
        }
    }
}

/// SHA-256 of the user passcode
#[derive(Clone, PartialEq, Eq)]
#[cfg_attr(feature = "zeroize", derive(Zeroize, ZeroizeOnDrop))]
pub struct Passcode([u8; 32]);

impl Passcode {
    /// Hash a passcode as entered by the user
    pub fn new(passcode: &str) -> Self {
        Self(Sha256::digest(passcode.as_bytes()).into())
    }

    /// Wrap an already hashed passcode
    pub const fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// Hashed passcode bytes
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for Passcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passcode(*****)")
    }
}

/// One write command worth of file data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileChunk<'a> {
    /// Offset of the chunk within the file
    pub offset: usize,
    /// Chunk bytes
    pub data: &'a [u8],
}

/// File payload bound to its protection scheme
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProtectedFileData {
    /// Protected by the user passcode
    Passcode {
        /// File contents
        data: Bytes,
    },
    /// Protected by an issuer signature
    Signature {
        /// File contents
        data: Bytes,
        /// Anti-replay counter
        counter: u32,
        /// Issuer signatures over the data and counter
        signature: FileDataSignature,
        /// Issuer key to verify against when the card does not hold one
        issuer_public_key: Option<Bytes>,
    },
}

impl ProtectedFileData {
    /// Protect `data` with the user passcode
    pub fn protected_by_passcode(data: impl Into<Bytes>) -> Self {
        Self::Passcode { data: data.into() }
    }

    /// Protect `data` with an issuer signature
    pub fn protected_by_signature(
        data: impl Into<Bytes>,
        counter: u32,
        signature: FileDataSignature,
        issuer_public_key: Option<Bytes>,
    ) -> Self {
        Self::Signature {
            data: data.into(),
            counter,
            signature,
            issuer_public_key,
        }
    }

    /// File contents
    pub const fn data(&self) -> &Bytes {
        match self {
            Self::Passcode { data } | Self::Signature { data, .. } => data,
        }
    }

    /// Protection scheme
    pub const fn protection(&self) -> ProtectionKind {
        match self {
            Self::Passcode { .. } => ProtectionKind::Passcode,
            Self::Signature { .. } => ProtectionKind::Signature,
        }
    }

    /// Anti-replay counter, for signature protected data
    pub const fn counter(&self) -> Option<u32> {
        match self {
            Self::Signature { counter, .. } => Some(*counter),
            Self::Passcode { .. } => None,
        }
    }

    /// Issuer signatures, for signature protected data
    pub const fn signature(&self) -> Option<&FileDataSignature> {
        match self {
            Self::Signature { signature, .. } => Some(signature),
            Self::Passcode { .. } => None,
        }
    }

    /// Issuer public key supplied alongside the signature
    pub const fn issuer_public_key(&self) -> Option<&Bytes> {
        match self {
            Self::Signature {
                issuer_public_key, ..
            } => issuer_public_key.as_ref(),
            Self::Passcode { .. } => None,
        }
    }

    /// Whether writing requires the user passcode
    pub const fn requires_passcode(&self) -> bool {
        matches!(self, Self::Passcode { .. })
    }

    /// SHA-256 of the file contents
    pub fn code_hash(&self) -> [u8; 32] {
        Sha256::digest(self.data()).into()
    }

    /// Fail with [`Error::DataSizeTooLarge`] if the card cannot hold the file
    pub fn ensure_size(&self) -> Result<()> {
        let size = self.data().len();
        if size > MAX_FILE_SIZE {
            return Err(Error::DataSizeTooLarge {
                size,
                max: MAX_FILE_SIZE,
            });
        }
        Ok(())
    }

    /// Split the file into chunks of at most [`SINGLE_WRITE_SIZE`] bytes
    pub fn write_chunks(&self) -> impl Iterator<Item = FileChunk<'_>> {
        self.data()
            .chunks(SINGLE_WRITE_SIZE)
            .enumerate()
            .map(|(index, data)| FileChunk {
                offset: index * SINGLE_WRITE_SIZE,
                data,
            })
    }

    /// Append the protection records sent when the write starts
    pub fn append_starting_tlvs(&self, builder: TlvBuilder, passcode: &Passcode) -> TlvBuilder {
        match self {
            Self::Signature {
                counter, signature, ..
            } => builder
                .append(Tag::IssuerDataSignature, signature.starting.clone())
                .append_u32(Tag::IssuerDataCounter, *counter),
            Self::Passcode { .. } => builder.append(Tag::Pin2, passcode.as_bytes().to_vec()),
        }
    }

    /// Append the protection records sent when the write is confirmed
    pub fn append_finalizing_tlvs(&self, builder: TlvBuilder, passcode: &Passcode) -> TlvBuilder {
        match self {
            Self::Signature { signature, .. } => {
                builder.append(Tag::IssuerDataSignature, signature.finalizing.clone())
            }
            Self::Passcode { .. } => builder
                .append(Tag::CodeHash, self.code_hash().to_vec())
                .append(Tag::Pin2, passcode.as_bytes().to_vec()),
        }
    }
}

impl FirmwareRestricted for ProtectedFileData {
    fn min_firmware_version(&self) -> FirmwareVersion {
        self.protection().range().min()
    }

    fn max_firmware_version(&self) -> FirmwareVersion {
        self.protection().range().max()
    }
}

/// Builder for signature protected data with every field checked on [`build`](Self::build)
#[derive(Debug, Clone, Default)]
pub struct SignatureProtectedBuilder {
    data: Option<Bytes>,
    counter: Option<u32>,
    signature: Option<FileDataSignature>,
    issuer_public_key: Option<Bytes>,
}

impl SignatureProtectedBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the file contents
    pub fn with_data(mut self, data: impl Into<Bytes>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Set the anti-replay counter
    pub const fn with_counter(mut self, counter: u32) -> Self {
        self.counter = Some(counter);
        self
    }

    /// Set the issuer signatures
    pub fn with_signature(mut self, signature: FileDataSignature) -> Self {
        self.signature = Some(signature);
        self
    }

    /// Set the issuer public key
    pub fn with_issuer_public_key(mut self, key: impl Into<Bytes>) -> Self {
        self.issuer_public_key = Some(key.into());
        self
    }

    /// Build the protected data
    pub fn build(self) -> Result<ProtectedFileData> {
        let data = self.data.ok_or(Error::Construction("File data is required"))?;
        let counter = self.counter.ok_or(Error::Construction("Counter is required"))?;
        let signature = self
            .signature
            .ok_or(Error::Construction("Signature is required"))?;

        Ok(ProtectedFileData::protected_by_signature(
            data,
            counter,
            signature,
            self.issuer_public_key,
        ))
    }
}
