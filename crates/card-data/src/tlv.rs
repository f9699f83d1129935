//! Command payload builder
//!
//! Card commands carry their parameters as ISO 7816 simple-TLV: a one-byte
//! tag, a one-byte length (or `0xFF` followed by a two-byte length) and the
//! value. [`TlvBuilder`] collects [`Record`]s and renders them in that form.

use bytes::{BufMut, Bytes, BytesMut};
use iso7816_tlv::simple::{Tag as SimpleTag, Tlv};
use tracing::trace;

use crate::error::Result;
use crate::record::{HeaderLayout, Record, RecordEncoder};
use crate::tag::Tag;

/// Accumulates records for a card command payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlvBuilder {
    records: Vec<Record>,
}

impl TlvBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn push(mut self, record: Record) -> Self {
        trace!(%record, "Appending TLV");
        self.records.push(record);
        self
    }

    /// Append raw bytes under `tag`
    pub fn append(self, tag: Tag, value: impl Into<Bytes>) -> Self {
        self.push(Record::new(tag, value))
    }

    /// Append raw bytes under `tag` when a value is present
    pub fn append_optional(self, tag: Tag, value: Option<impl Into<Bytes>>) -> Self {
        match value {
            Some(value) => self.append(tag, value),
            None => self,
        }
    }

    /// Append a single byte
    pub fn append_u8(self, tag: Tag, value: u8) -> Self {
        self.push(Record::uint8(tag, value))
    }

    /// Append a big-endian `u16`
    pub fn append_u16(self, tag: Tag, value: u16) -> Self {
        self.push(Record::uint16(tag, value))
    }

    /// Append a big-endian `u32`
    pub fn append_u32(self, tag: Tag, value: u32) -> Self {
        self.push(Record::uint32(tag, value))
    }

    /// Append UTF-8 text
    pub fn append_utf8(self, tag: Tag, value: &str) -> Self {
        self.push(Record::utf8(tag, value))
    }

    /// Append a boolean flag
    pub fn append_bool(self, tag: Tag, value: bool) -> Self {
        self.push(Record::bool(tag, value))
    }

    /// Records appended so far
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the appended records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Hand the appended records to a [`RecordEncoder`]
    pub fn into_encoder(self, layout: impl Into<HeaderLayout>) -> RecordEncoder {
        RecordEncoder::new(self.records, layout)
    }

    /// Render the records as ISO 7816 simple-TLV
    ///
    /// Tags `0x00` and `0xFF` are not valid simple-TLV tags and values longer
    /// than `0xFFFF` bytes cannot be described; both fail with
    /// [`crate::Error::TlvError`].
    pub fn serialize(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        for record in &self.records {
            let tag = SimpleTag::try_from(record.tag().code())?;
            let tlv = Tlv::new(tag, record.value().to_vec())?;
            buf.put_slice(&tlv.to_vec());
        }
        Ok(buf.freeze())
    }
}
