//! Primitive little-endian decoders over a length-bounded slice of the
//! decompressed `.vital` stream.
//!
//! [`Cursor`] always addresses the *whole* decompressed buffer so that error
//! offsets are absolute file offsets, but a packet body is decoded through a
//! [`Cursor::bounded`] child view whose `limit` caps reads to that packet's
//! `datalen`. The parent cursor is advanced past the full `datalen` by the
//! caller regardless of how much the child actually consumed, which is what
//! gives REC/TRKINFO/etc. their padding discipline (surplus bytes silently
//! skipped).

use chrono::{DateTime, Utc};

use crate::error::{Result, VitalError};
use crate::format::RecFmt;

/// A single decoded sample, tagged by the `recfmt` that produced it.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(untagged)]
pub enum RawValue {
    F32(f32),
    F64(f64),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
}

impl RawValue {
    /// Widen to `f64` for the ADC affine transform. Lossless for every
    /// `recfmt` except `f64` itself, which is already exact.
    pub fn as_f64(self) -> f64 {
        match self {
            RawValue::F32(v) => v as f64,
            RawValue::F64(v) => v,
            RawValue::U8(v) => v as f64,
            RawValue::I16(v) => v as f64,
            RawValue::U16(v) => v as f64,
            RawValue::I32(v) => v as f64,
            RawValue::U32(v) => v as f64,
        }
    }
}

/// A cursor over a slice of the fully-decompressed `.vital` stream.
///
/// `pos` and `limit` are both absolute offsets into `buf`, so an error raised
/// mid-decode can always report the true file offset.
pub struct Cursor<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        let limit = buf.len();
        Cursor { buf, pos: 0, limit }
    }

    pub fn pos(&self) -> u64 {
        self.pos as u64
    }

    pub fn remaining(&self) -> usize {
        self.limit - self.pos
    }

    /// Carve a bounded child view of `len` bytes starting at the current
    /// position, without advancing `self`. The caller is responsible for
    /// advancing `self` past the packet once the child has been consumed
    /// (see module docs).
    pub fn bounded(&self, len: usize) -> Result<Cursor<'a>> {
        let end = self.pos.checked_add(len).filter(|&e| e <= self.limit);
        match end {
            Some(end) => Ok(Cursor {
                buf: self.buf,
                pos: self.pos,
                limit: end,
            }),
            None => Err(VitalError::TruncatedStream {
                offset: self.pos as u64,
            }),
        }
    }

    pub fn advance(&mut self, len: usize) -> Result<()> {
        let end = self.pos.checked_add(len).filter(|&e| e <= self.limit);
        match end {
            Some(end) => {
                self.pos = end;
                Ok(())
            }
            None => Err(VitalError::TruncatedStream {
                offset: self.pos as u64,
            }),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.limit {
            return Err(VitalError::TruncatedStream {
                offset: self.pos as u64,
            });
        }
        let s = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(s)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.take(2)?.try_into().unwrap()))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.take(4)?.try_into().unwrap()))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.take(8)?.try_into().unwrap()))
    }

    /// Length-prefixed UTF-8 string: `u32` length then that many bytes.
    pub fn read_string(&mut self) -> Result<String> {
        let offset = self.pos as u64;
        let len = self.read_u32()? as usize;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| VitalError::EncodingError { offset })
    }

    /// `f64` seconds since the Unix epoch, UTC, fractional seconds preserved.
    pub fn read_timestamp(&mut self) -> Result<DateTime<Utc>> {
        let secs = self.read_f64()?;
        let nanos = (secs.fract().abs() * 1_000_000_000.0).round() as u32;
        Ok(DateTime::from_timestamp(secs.trunc() as i64, nanos).unwrap_or(DateTime::UNIX_EPOCH))
    }

    /// Decode one element of the given `recfmt`.
    pub fn read_value(&mut self, fmt: RecFmt) -> Result<RawValue> {
        Ok(match fmt {
            RecFmt::F32 => RawValue::F32(self.read_f32()?),
            RecFmt::F64 => RawValue::F64(self.read_f64()?),
            RecFmt::U8 | RecFmt::U8Alt => RawValue::U8(self.read_u8()?),
            RecFmt::I16 => RawValue::I16(self.read_i16()?),
            RecFmt::U16 => RawValue::U16(self.read_u16()?),
            RecFmt::I32 => RawValue::I32(self.read_i32()?),
            RecFmt::U32 => RawValue::U32(self.read_u32()?),
        })
    }
}
