//! Tagged records and their length header layouts
//!
//! A record is written as `[tag: 1 byte][length header][value]`. The shape
//! of the length header is selected by [`HeaderLayout`]:
//!
//! - [`HeaderLayout::Static`] always writes a single length byte, which
//!   keeps every field at a predictable offset for firmware that cannot
//!   branch on the header. `0xFF` is reserved as the card's extended length
//!   marker, so the longest static value is 254 bytes.
//! - [`HeaderLayout::Dynamic`] uses a BER style definite length: one byte
//!   below `0x80`, otherwise `0x81 LL` or `0x82 HH LL`.

mod decoder;
mod encoder;

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};

pub use decoder::RecordDecoder;
pub use encoder::RecordEncoder;

use crate::error::{Error, Result};
use crate::tag::Tag;

/// Width of the length field in the static layout
pub const STATIC_LENGTH_WIDTH: usize = 1;

/// Longest value the static layout can describe
///
/// A length byte of `0xFF` announces a two-byte length in the card's tag
/// format and is never written by the static layout.
pub const STATIC_MAX_VALUE_LEN: usize = 0xFE;

/// Longest value the dynamic layout can describe
pub const DYNAMIC_MAX_VALUE_LEN: usize = 0xFFFF;

const DYNAMIC_SHORT_MAX: usize = 0x7F;
const DYNAMIC_ONE_BYTE: u8 = 0x81;
const DYNAMIC_TWO_BYTES: u8 = 0x82;

/// Length header convention for encoded records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HeaderLayout {
    /// Variable width length header
    Dynamic,
    /// Fixed width length header
    #[default]
    Static,
}

impl HeaderLayout {
    /// Largest value length this layout can represent
    pub const fn max_value_len(self) -> usize {
        match self {
            Self::Dynamic => DYNAMIC_MAX_VALUE_LEN,
            Self::Static => STATIC_MAX_VALUE_LEN,
        }
    }

    /// Whether this is the variable width layout
    pub const fn is_dynamic(self) -> bool {
        matches!(self, Self::Dynamic)
    }

    /// Number of bytes the length header occupies for a value of `len` bytes
    pub fn header_len(self, len: usize) -> Result<usize> {
        if len > self.max_value_len() {
            return Err(Error::EncodingOverflow {
                length: len,
                max: self.max_value_len(),
            });
        }

        Ok(match self {
            Self::Static => STATIC_LENGTH_WIDTH,
            Self::Dynamic if len <= DYNAMIC_SHORT_MAX => 1,
            Self::Dynamic if len <= 0xFF => 2,
            Self::Dynamic => 3,
        })
    }

    /// Write the length header for a value of `len` bytes
    pub fn put_length<B: BufMut>(self, buf: &mut B, len: usize) -> Result<()> {
        match self.header_len(len)? {
            1 => buf.put_u8(len as u8),
            2 => {
                buf.put_u8(DYNAMIC_ONE_BYTE);
                buf.put_u8(len as u8);
            }
            _ => {
                buf.put_u8(DYNAMIC_TWO_BYTES);
                buf.put_u16(len as u16);
            }
        }
        Ok(())
    }
}

impl From<bool> for HeaderLayout {
    /// Map a `use_dynamic_layout` flag to its layout
    fn from(use_dynamic_layout: bool) -> Self {
        if use_dynamic_layout {
            Self::Dynamic
        } else {
            Self::Static
        }
    }
}

impl fmt::Display for HeaderLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dynamic => f.write_str("dynamic"),
            Self::Static => f.write_str("static"),
        }
    }
}

/// A tagged value to be written to the card
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    tag: Tag,
    value: Bytes,
}

impl Record {
    /// Create a record holding raw bytes
    pub fn new(tag: Tag, value: impl Into<Bytes>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }

    /// Create a record holding UTF-8 text
    pub fn utf8(tag: Tag, value: &str) -> Self {
        Self::new(tag, Bytes::copy_from_slice(value.as_bytes()))
    }

    /// Create a record holding a single byte
    pub fn uint8(tag: Tag, value: u8) -> Self {
        Self::new(tag, vec![value])
    }

    /// Create a record holding a big-endian `u16`
    pub fn uint16(tag: Tag, value: u16) -> Self {
        Self::new(tag, value.to_be_bytes().to_vec())
    }

    /// Create a record holding a big-endian `u32`
    pub fn uint32(tag: Tag, value: u32) -> Self {
        Self::new(tag, value.to_be_bytes().to_vec())
    }

    /// Create a record holding a boolean flag (`0x01` or `0x00`)
    pub fn bool(tag: Tag, value: bool) -> Self {
        Self::uint8(tag, u8::from(value))
    }

    /// Create a record whose value is a list of sub-records encoded with `layout`
    ///
    /// Fails with [`Error::EncodingOverflow`] if a sub-record, or the nested
    /// list as a whole, cannot be described by the layout.
    pub fn nested(tag: Tag, records: &[Self], layout: HeaderLayout) -> Result<Self> {
        let mut buf = BytesMut::new();
        for record in records {
            record.write_to(&mut buf, layout)?;
        }
        layout.header_len(buf.len())?;
        Ok(Self::new(tag, buf.freeze()))
    }

    /// Semantic kind of this record
    pub const fn tag(&self) -> Tag {
        self.tag
    }

    /// Raw value bytes
    pub const fn value(&self) -> &Bytes {
        &self.value
    }

    /// Length of the value in bytes
    pub fn len(&self) -> usize {
        self.value.len()
    }

    /// Whether the value is empty
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Number of bytes this record occupies once encoded with `layout`
    pub fn encoded_len(&self, layout: HeaderLayout) -> Result<usize> {
        Ok(1 + layout.header_len(self.len())? + self.len())
    }

    /// Append the encoded form of this record to `buf`
    pub fn write_to<B: BufMut>(&self, buf: &mut B, layout: HeaderLayout) -> Result<()> {
        // Check the header before touching the buffer so nothing partial is written
        layout.header_len(self.len())?;
        buf.put_u8(self.tag.code());
        layout.put_length(buf, self.len())?;
        buf.put_slice(&self.value);
        Ok(())
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tag.should_mask() {
            write!(f, "{} *****", self.tag)
        } else {
            write!(
                f,
                "{} [0x{:02X}:{:02}]: {}",
                self.tag,
                self.tag.code(),
                self.len(),
                hex::encode_upper(&self.value)
            )
        }
    }
}
