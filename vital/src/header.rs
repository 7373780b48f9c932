use crate::codec::Cursor;
use crate::error::{Result, VitalError};

/// Number of header bytes *not* covered by `headerlen`: the 4-byte `VITA`
/// signature, the 4-byte `format_ver`, and the 2-byte `headerlen` field
/// itself. Used by the integrity check.
pub const HEADER_PREFIX_LEN: u64 = 10;

/// Overhead of a packet's `type` + `datalen` prefix, in bytes. Used by the
/// integrity check.
pub const PACKET_PREFIX_LEN: u64 = 5;

const SIGNATURE: &[u8; 4] = b"VITA";

/// Fixed `.vital` file header.
#[derive(Debug, Clone, Copy, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Header {
    pub format_ver: u32,
    pub headerlen: u16,
    pub tzbias: i16,
    pub inst_id: u32,
    pub prog_ver: u32,
}

impl Header {
    /// `headerlen` covers every header byte after the `headerlen` field
    /// itself (`tzbias`+`inst_id`+`prog_ver`, normally 10 bytes) and may
    /// include trailing reserved padding for forward compatibility, the same
    /// discipline [`crate::record::read_packet`] applies to `datalen` — any
    /// padding is skipped rather than rejected, so the integrity check's
    /// `headerlen+10` byte count always matches what was actually consumed.
    pub fn parse(cursor: &mut Cursor<'_>) -> Result<Self> {
        let mut sig = [0u8; 4];
        for b in sig.iter_mut() {
            *b = cursor.read_u8()?;
        }
        if &sig != SIGNATURE {
            return Err(VitalError::BadSignature { got: sig });
        }

        let format_ver = cursor.read_u32()?;
        let headerlen = cursor.read_u16()?;
        let fields_start = cursor.pos();
        let tzbias = cursor.read_i16()?;
        let inst_id = cursor.read_u32()?;
        let prog_ver = cursor.read_u32()?;

        let consumed = (cursor.pos() - fields_start) as usize;
        let skip = (headerlen as usize).saturating_sub(consumed);
        cursor.advance(skip)?;

        Ok(Header {
            format_ver,
            headerlen,
            tzbias,
            inst_id,
            prog_ver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// `headerlen` covers tzbias+inst_id+prog_ver (10 bytes) plus
    /// `headerlen - 10` bytes of reserved padding, matching the canonical
    /// `headerlen=16` fixture used throughout this crate's tests.
    pub(crate) fn header_bytes(headerlen: u16) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(b"VITA");
        buf.extend_from_slice(&3u32.to_le_bytes());
        buf.extend_from_slice(&headerlen.to_le_bytes());
        buf.extend_from_slice(&0i16.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend_from_slice(&0u32.to_le_bytes());
        buf.extend(std::iter::repeat(0u8).take((headerlen as usize).saturating_sub(10)));
        buf
    }

    #[test]
    fn test_parse_header_ok() {
        let buf = header_bytes(16);
        let mut c = Cursor::new(&buf);
        let h = Header::parse(&mut c).unwrap();
        assert_eq!(h.format_ver, 3);
        assert_eq!(h.headerlen, 16);
        assert_eq!(c.remaining(), 0);
    }

    #[test]
    fn test_parse_header_bad_signature() {
        let mut buf = header_bytes(16);
        buf[0] = b'X';
        let mut c = Cursor::new(&buf);
        assert!(matches!(
            Header::parse(&mut c),
            Err(VitalError::BadSignature { .. })
        ));
    }

    #[test]
    fn test_parse_header_truncated() {
        let buf = &header_bytes(16)[..8];
        let mut c = Cursor::new(buf);
        assert!(Header::parse(&mut c).is_err());
    }

    #[test]
    fn test_parse_header_skips_reserved_padding() {
        let buf = header_bytes(16);
        let mut c = Cursor::new(&buf);
        let h = Header::parse(&mut c).unwrap();
        assert_eq!(h.headerlen, 16);
        assert_eq!(c.remaining(), 0);
    }
}
