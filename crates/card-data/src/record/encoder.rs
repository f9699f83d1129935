//! Record encoder
//!
//! Serializes an ordered list of records into one contiguous buffer. There
//! are no separators, no overall length prefix and no trailing marker, so a
//! reader must know the record count or parse until the input is exhausted.

use bytes::{Bytes, BytesMut};
use tracing::{instrument, trace};

use super::{HeaderLayout, Record};
use crate::error::Result;

/// Encodes an ordered list of [`Record`]s with a fixed [`HeaderLayout`]
///
/// The encoder never mutates itself: [`RecordEncoder::encode`] is a pure
/// function of the records and the layout, so repeated calls, including
/// concurrent ones, produce byte-identical output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordEncoder {
    records: Vec<Record>,
    layout: HeaderLayout,
}

impl RecordEncoder {
    /// Create an encoder over `records`, emitted in the given order
    pub fn new(records: Vec<Record>, layout: impl Into<HeaderLayout>) -> Self {
        Self {
            records,
            layout: layout.into(),
        }
    }

    /// Records in emission order
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Length header layout
    pub const fn layout(&self) -> HeaderLayout {
        self.layout
    }

    /// Exact number of bytes [`RecordEncoder::encode`] produces
    pub fn encoded_len(&self) -> Result<usize> {
        self.records
            .iter()
            .try_fold(0, |total, record| Ok(total + record.encoded_len(self.layout)?))
    }

    /// Encode all records into a single buffer
    ///
    /// Fails with [`crate::Error::EncodingOverflow`] if any value is longer
    /// than the layout can describe.
    #[instrument(level = "trace", skip(self), fields(records = self.records.len(), layout = %self.layout))]
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(self.encoded_len()?);

        for record in &self.records {
            trace!(%record, "Encoding record");
            record.write_to(&mut buf, self.layout)?;
        }

        trace!(len = buf.len(), "Encoded records");
        Ok(buf.freeze())
    }
}
