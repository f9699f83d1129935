//! Error type for card data encoding
//!
//! Every fallible operation in this crate returns [`Error`]. When an encode
//! fails no partial output is handed back to the caller.

use iso7816_tlv::TlvError;

use crate::firmware::FirmwareVersion;

/// Result type for card data operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for card data operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A value length cannot be represented by the active length header
    #[error("Encoding overflow: {length} bytes exceeds the maximum of {max} bytes")]
    EncodingOverflow {
        /// Length that was requested
        length: usize,
        /// Largest length the header scheme can express
        max: usize,
    },

    /// A required field was missing or an invalid combination was supplied
    #[error("Construction error: {0}")]
    Construction(&'static str),

    /// Target firmware lies outside the range a payload is defined for
    #[error("Firmware {version} is not supported, expected {min}..={max}")]
    FirmwareIncompatible {
        /// Firmware of the target card
        version: FirmwareVersion,
        /// Lowest supported firmware
        min: FirmwareVersion,
        /// Highest supported firmware
        max: FirmwareVersion,
    },

    /// Encoded input could not be parsed
    #[error("Invalid data: {0}")]
    InvalidData(&'static str),

    /// Firmware version string could not be parsed
    #[error("Invalid firmware version: {0:?}")]
    InvalidFirmwareVersion(String),

    /// NDEF URI record without a supported scheme prefix
    #[error("Unsupported URI: {0}")]
    UnsupportedUri(String),

    /// File payload is larger than the card accepts
    #[error("Data size too large: {size} bytes, maximum is {max}")]
    DataSizeTooLarge {
        /// Size of the payload
        size: usize,
        /// Maximum accepted size
        max: usize,
    },

    /// ISO 7816 simple-TLV conversion failed
    #[error("TlvError: {0}")]
    TlvError(TlvError),
}

impl From<TlvError> for Error {
    fn from(error: TlvError) -> Self {
        Self::TlvError(error)
    }
}
