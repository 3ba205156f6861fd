//! Read-side wire primitives.

use crate::error::{DecodeError, DecodeResult};
use crate::payload::PayloadKind;

/// A varint terminates within ten base-128 groups or not at all.
const MAX_VARINT_GROUPS: u32 = 10;

/// A read cursor over an immutable byte buffer.
///
/// A decoder is created fresh per message and owned exclusively by the call
/// that drives it. Nested length-delimited blocks are read through
/// [`Decoder::nested`], which returns a sub-decoder scoped to exactly that
/// block, so a malformed nested message can never read past its own bounds.
#[derive(Debug)]
pub struct Decoder<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a decoder over a byte buffer.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Returns the number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns true when every byte has been consumed.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.pos == self.buf.len()
    }

    fn byte(&mut self) -> DecodeResult<u8> {
        let b = self
            .buf
            .get(self.pos)
            .copied()
            .ok_or(DecodeError::Incomplete)?;
        self.pos += 1;
        Ok(b)
    }

    /// Reads one base-128 varint as its raw 64-bit pattern.
    ///
    /// Fails with [`DecodeError::Incomplete`] if the buffer ends before a
    /// terminating group and [`DecodeError::OverlongVarint`] if no group
    /// within the first ten clears its continuation bit.
    pub fn varint(&mut self) -> DecodeResult<u64> {
        let mut value = 0u64;
        for group in 0..MAX_VARINT_GROUPS {
            let b = self.byte()?;
            value |= u64::from(b & 0x7f) << (7 * group);
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::OverlongVarint)
    }

    /// Reads a zigzag-encoded varint as a signed 64-bit value.
    pub fn zigzag(&mut self) -> DecodeResult<i64> {
        let v = self.varint()?;
        Ok(((v >> 1) as i64) ^ -((v & 1) as i64))
    }

    /// Reads four little-endian bytes.
    pub fn bits32(&mut self) -> DecodeResult<u32> {
        if self.remaining() < 4 {
            return Err(DecodeError::Incomplete);
        }
        let mut word = [0u8; 4];
        word.copy_from_slice(&self.buf[self.pos..self.pos + 4]);
        self.pos += 4;
        Ok(u32::from_le_bytes(word))
    }

    /// Reads eight little-endian bytes.
    pub fn bits64(&mut self) -> DecodeResult<u64> {
        if self.remaining() < 8 {
            return Err(DecodeError::Incomplete);
        }
        let mut word = [0u8; 8];
        word.copy_from_slice(&self.buf[self.pos..self.pos + 8]);
        self.pos += 8;
        Ok(u64::from_le_bytes(word))
    }

    /// Reads a varint length followed by that many raw bytes.
    ///
    /// The returned slice borrows from the underlying buffer; nothing is
    /// copied.
    pub fn bytes(&mut self) -> DecodeResult<&'a [u8]> {
        let len = self.varint()?;
        let len = usize::try_from(len).map_err(|_| DecodeError::Incomplete)?;
        if self.remaining() < len {
            return Err(DecodeError::Incomplete);
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    /// Reads a length-delimited block and returns a decoder scoped to it.
    pub fn nested(&mut self) -> DecodeResult<Decoder<'a>> {
        Ok(Decoder::new(self.bytes()?))
    }

    /// Reads the next field tag, or `None` at a clean end of message.
    ///
    /// The tag splits into `field_number = tag >> 3` and the 3-bit wire
    /// type. Wire types outside the format and field numbers wider than 32
    /// bits fail with [`DecodeError::MalformedField`].
    pub fn key(&mut self) -> DecodeResult<Option<(u32, PayloadKind)>> {
        if self.is_at_end() {
            return Ok(None);
        }
        let tag = self.varint()?;
        let wire_type = (tag & 0x7) as u8;
        let kind = PayloadKind::from_wire_type(wire_type)
            .ok_or(DecodeError::MalformedField { wire_type })?;
        let field = u32::try_from(tag >> 3)
            .map_err(|_| DecodeError::MalformedField { wire_type })?;
        Ok(Some((field, kind)))
    }

    /// Consumes one value of the given kind without interpreting it.
    ///
    /// This is how unknown fields in forward-compatible messages are
    /// ignored instead of aborting the decode.
    pub fn skip(&mut self, kind: PayloadKind) -> DecodeResult<()> {
        match kind {
            PayloadKind::Varint => {
                self.varint()?;
            }
            PayloadKind::Bits32 => {
                self.bits32()?;
            }
            PayloadKind::Bits64 => {
                self.bits64()?;
            }
            PayloadKind::Bytes => {
                self.bytes()?;
            }
        }
        Ok(())
    }
}
