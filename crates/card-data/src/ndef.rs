//! NDEF message encoding
//!
//! The card answers NFC readers with a precomputed NDEF message written at
//! personalization. The message is stored with a two-byte big-endian length
//! prefix followed by short NDEF records.
//!
//! With dynamic NDEF the card appends records of its own after the
//! precomputed ones, so the last precomputed record must not carry the
//! message-end flag.

use bytes::{BufMut, Bytes, BytesMut};
use tracing::{debug, instrument};

use crate::error::{Error, Result};

/// Message begin flag
const FLAG_MB: u8 = 0x80;
/// Message end flag
const FLAG_ME: u8 = 0x40;
/// Short record flag with the NFC Forum well-known type name format
const SR_WELL_KNOWN: u8 = 0x11;
/// Short record flag with the external type name format
const SR_EXTERNAL: u8 = 0x14;

const AAR_TYPE: &[u8] = b"android.com:pkg";
const URI_TYPE: u8 = b'U';
const TEXT_TYPE: u8 = b'T';
/// UTF-8 status byte followed by the language code
const TEXT_STATUS: u8 = 0x02;
const TEXT_LANGUAGE: &[u8] = b"en";

/// Longest payload a short record describes
const MAX_PAYLOAD_LEN: usize = 0xFF;
/// Longest message the two-byte prefix describes
const MAX_MESSAGE_LEN: usize = 0xFFFF;

/// URI prefixes abbreviated by an identifier code, longest match first
const URI_PREFIXES: [(&str, u8); 4] = [
    ("http://www.", 0x01),
    ("https://www.", 0x02),
    ("http://", 0x03),
    ("https://", 0x04),
];

/// Kind of NDEF record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NdefRecordType {
    /// URI record
    Uri,
    /// Android application record, the value is a package name
    Aar,
    /// English text record
    Text,
}

/// A single NDEF record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NdefRecord {
    /// Kind of record
    pub kind: NdefRecordType,
    /// Record value
    pub value: String,
}

impl NdefRecord {
    /// Create a record
    pub fn new(kind: NdefRecordType, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }

    /// URI record
    pub fn uri(value: impl Into<String>) -> Self {
        Self::new(NdefRecordType::Uri, value)
    }

    /// Android application record
    pub fn aar(package: impl Into<String>) -> Self {
        Self::new(NdefRecordType::Aar, package)
    }

    /// Text record
    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NdefRecordType::Text, value)
    }

    fn encode_into(&self, header: u8, buf: &mut BytesMut) -> Result<()> {
        let value = self.value.as_bytes();
        match self.kind {
            NdefRecordType::Aar => {
                buf.put_u8(header | SR_EXTERNAL);
                buf.put_u8(AAR_TYPE.len() as u8);
                buf.put_u8(payload_len(value.len())?);
                buf.put_slice(AAR_TYPE);
                buf.put_slice(value);
            }
            NdefRecordType::Uri => {
                let (rest, code) = URI_PREFIXES
                    .iter()
                    .find_map(|(prefix, code)| {
                        self.value.strip_prefix(prefix).map(|rest| (rest, *code))
                    })
                    .ok_or_else(|| Error::UnsupportedUri(self.value.clone()))?;

                buf.put_u8(header | SR_WELL_KNOWN);
                buf.put_u8(1);
                buf.put_u8(payload_len(rest.len() + 1)?);
                buf.put_u8(URI_TYPE);
                buf.put_u8(code);
                buf.put_slice(rest.as_bytes());
            }
            NdefRecordType::Text => {
                buf.put_u8(header | SR_WELL_KNOWN);
                buf.put_u8(1);
                buf.put_u8(payload_len(value.len() + 1 + TEXT_LANGUAGE.len())?);
                buf.put_u8(TEXT_TYPE);
                buf.put_u8(TEXT_STATUS);
                buf.put_slice(TEXT_LANGUAGE);
                buf.put_slice(value);
            }
        }
        Ok(())
    }
}

fn payload_len(len: usize) -> Result<u8> {
    u8::try_from(len).map_err(|_| Error::EncodingOverflow {
        length: len,
        max: MAX_PAYLOAD_LEN,
    })
}

/// Encodes NDEF records into the message stored on the card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefEncoder {
    records: Vec<NdefRecord>,
    use_dynamic_ndef: bool,
}

impl NdefEncoder {
    /// Create an encoder for `records`
    pub const fn new(records: Vec<NdefRecord>, use_dynamic_ndef: bool) -> Self {
        Self {
            records,
            use_dynamic_ndef,
        }
    }

    /// Records in message order
    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    /// Encode the length-prefixed message
    #[instrument(level = "trace", skip(self), fields(records = self.records.len(), dynamic = self.use_dynamic_ndef))]
    pub fn encode(&self) -> Result<Bytes> {
        let mut message = BytesMut::new();
        let last = self.records.len().saturating_sub(1);

        for (index, record) in self.records.iter().enumerate() {
            let mut header = 0;
            if index == 0 {
                header |= FLAG_MB;
            }
            if !self.use_dynamic_ndef && index == last {
                header |= FLAG_ME;
            }
            record.encode_into(header, &mut message)?;
        }

        let length = u16::try_from(message.len()).map_err(|_| Error::EncodingOverflow {
            length: message.len(),
            max: MAX_MESSAGE_LEN,
        })?;

        let mut buf = BytesMut::with_capacity(2 + message.len());
        buf.put_u16(length);
        buf.put_slice(&message);

        debug!(len = buf.len(), "Encoded NDEF message");
        Ok(buf.freeze())
    }
}
