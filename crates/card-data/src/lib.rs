//! Card data preparation for smart card personalization
//!
//! This crate turns structured descriptions of card data into the exact
//! bytes that are later written to a card. It does not talk to the card:
//! transport, command sequencing and signature verification live elsewhere.
//!
//! ## Overview
//!
//! - [`RecordEncoder`] serializes tagged [`Record`]s with either a
//!   [`HeaderLayout::Static`] or a [`HeaderLayout::Dynamic`] length header.
//! - [`ProtectedFileData`] carries a file payload together with its passcode
//!   or issuer signature protection, each valid for a fixed firmware range.
//! - [`NdefEncoder`] and [`NdefConfig`] produce the precomputed NDEF message.
//! - [`TlvBuilder`] renders command parameters as ISO 7816 simple-TLV.
//!
//! ```
//! use nexum_card_data::{HeaderLayout, Record, RecordEncoder, Tag};
//!
//! let records = vec![
//!     Record::new(Tag::from(0x01), vec![0xAAu8]),
//!     Record::new(Tag::from(0x02), vec![0xBBu8, 0xCC]),
//! ];
//! let bytes = RecordEncoder::new(records, HeaderLayout::Static).encode()?;
//! assert_eq!(bytes.as_ref(), &[0x01, 0x01, 0xAA, 0x02, 0x02, 0xBB, 0xCC]);
//! # Ok::<(), nexum_card_data::Error>(())
//! ```
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rustdoc::missing_crate_level_docs)]

// Re-export bytes for convenience
pub use bytes::{Bytes, BytesMut};

pub mod config;
pub mod error;
pub mod file;
pub mod firmware;
pub mod ndef;
pub mod record;
pub mod tag;
pub mod tlv;

pub use config::{NdefConfig, NdefSetting, NdefSettings};
pub use error::{Error, Result};
pub use file::{
    FileChunk, FileDataSignature, MAX_FILE_SIZE, Passcode, ProtectedFileData, ProtectionKind,
    SINGLE_WRITE_SIZE, SignatureProtectedBuilder,
};
pub use firmware::{FirmwareRange, FirmwareRestricted, FirmwareType, FirmwareVersion};
pub use ndef::{NdefEncoder, NdefRecord, NdefRecordType};
pub use record::{HeaderLayout, Record, RecordDecoder, RecordEncoder};
pub use tag::Tag;
pub use tlv::TlvBuilder;

/// Prelude module containing commonly used traits and types
pub mod prelude {
    pub use crate::{Bytes, Error, Result};

    // Records
    pub use crate::{HeaderLayout, Record, RecordDecoder, RecordEncoder, Tag, TlvBuilder};

    // Protected files
    pub use crate::{
        FileDataSignature, Passcode, ProtectedFileData, ProtectionKind, SignatureProtectedBuilder,
    };

    // Firmware
    pub use crate::{FirmwareRange, FirmwareRestricted, FirmwareVersion};

    // NDEF
    pub use crate::{NdefConfig, NdefEncoder, NdefRecord};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_values_are_shareable() {
        assert_send_sync::<RecordEncoder>();
        assert_send_sync::<ProtectedFileData>();
        assert_send_sync::<NdefEncoder>();
    }
}
