//! Reference decoder for encoded records

use bytes::{Buf, Bytes};

use super::{DYNAMIC_ONE_BYTE, DYNAMIC_TWO_BYTES, HeaderLayout, Record, STATIC_MAX_VALUE_LEN};
use crate::error::{Error, Result};
use crate::tag::Tag;

/// Parses a buffer produced by [`super::RecordEncoder`] back into records
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordDecoder {
    layout: HeaderLayout,
}

impl RecordDecoder {
    /// Create a decoder expecting length headers in `layout`
    pub fn new(layout: impl Into<HeaderLayout>) -> Self {
        Self {
            layout: layout.into(),
        }
    }

    /// Decode records until the input is exhausted
    pub fn decode(&self, data: &[u8]) -> Result<Vec<Record>> {
        let mut input = Bytes::copy_from_slice(data);
        let mut records = Vec::new();

        while input.has_remaining() {
            let tag = input.get_u8();
            let len = self.read_length(&mut input)?;
            if input.remaining() < len {
                return Err(Error::InvalidData("Truncated record value"));
            }
            records.push(Record::new(Tag::from(tag), input.split_to(len)));
        }

        Ok(records)
    }

    fn read_length(&self, input: &mut Bytes) -> Result<usize> {
        if !input.has_remaining() {
            return Err(Error::InvalidData("Missing length header"));
        }

        let first = input.get_u8();
        match self.layout {
            HeaderLayout::Static if usize::from(first) <= STATIC_MAX_VALUE_LEN => {
                Ok(usize::from(first))
            }
            HeaderLayout::Static => Err(Error::InvalidData("Unsupported length form")),
            HeaderLayout::Dynamic => match first {
                0x00..=0x7F => Ok(first as usize),
                DYNAMIC_ONE_BYTE if input.has_remaining() => Ok(input.get_u8() as usize),
                DYNAMIC_TWO_BYTES if input.remaining() >= 2 => Ok(input.get_u16() as usize),
                DYNAMIC_ONE_BYTE | DYNAMIC_TWO_BYTES => {
                    Err(Error::InvalidData("Truncated length header"))
                }
                _ => Err(Error::InvalidData("Unsupported length form")),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordEncoder;
    use hex_literal::hex;

    fn record(tag: u8, value: impl Into<Bytes>) -> Record {
        Record::new(Tag::from(tag), value)
    }

    #[test]
    fn test_decode_static() {
        let records = RecordDecoder::new(HeaderLayout::Static)
            .decode(&hex!("01 01 AA 02 02 BB CC"))
            .unwrap();
        assert_eq!(
            records,
            vec![
                record(0x01, vec![0xAAu8]),
                record(0x02, vec![0xBBu8, 0xCC]),
            ]
        );
    }

    #[test]
    fn test_round_trip_both_layouts() {
        let records = vec![
            record(0x10, vec![0x01u8; 3]),
            record(0x20, vec![0x02u8; 0x90]),
            record(0x30, Bytes::new()),
        ];

        for layout in [HeaderLayout::Static, HeaderLayout::Dynamic] {
            let bytes = RecordEncoder::new(records.clone(), layout).encode().unwrap();
            assert_eq!(RecordDecoder::new(layout).decode(&bytes).unwrap(), records);
        }
    }

    #[test]
    fn test_truncated_input() {
        let decoder = RecordDecoder::new(HeaderLayout::Static);
        assert!(matches!(decoder.decode(&hex!("01")), Err(Error::InvalidData(_))));
        assert!(matches!(decoder.decode(&hex!("01 02 AA")), Err(Error::InvalidData(_))));
        assert!(matches!(decoder.decode(&hex!("01 FF 00 01 AA")), Err(Error::InvalidData(_))));

        let decoder = RecordDecoder::new(HeaderLayout::Dynamic);
        assert!(matches!(decoder.decode(&hex!("01 82 01")), Err(Error::InvalidData(_))));
        assert!(matches!(decoder.decode(&hex!("01 80")), Err(Error::InvalidData(_))));
        assert!(matches!(decoder.decode(&hex!("01 83 00 00 01")), Err(Error::InvalidData(_))));
    }
}
