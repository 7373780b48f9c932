//! The packet framer and REC decoder.
//!
//! A `.vital` body is a sequence of `{type: u8, datalen: u32, data:
//! byte[datalen]}` packets. [`read_packet`] reads one such frame
//! and dispatches to the matching body decoder, handing it a bounded cursor
//! so that padding/surplus bytes are discarded uniformly regardless of which
//! decoder ran.

use crate::codec::Cursor;
use crate::error::{Result, VitalError};
use crate::format::RecType;
use crate::frame::{Rec, RecValues};
use crate::track::{Cmd, DevInfo, TrackInfo, TrackRegistry};

const TYPE_TRKINFO: u8 = 0;
const TYPE_REC: u8 = 1;
const TYPE_CMD: u8 = 6;
const TYPE_DEVINFO: u8 = 9;

/// One decoded packet body, tagged by its source packet type.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum Packet {
    DevInfo(DevInfo),
    TrackInfo(TrackInfo),
    Rec(Rec),
    Cmd(Cmd),
}

/// A framed packet: its `datalen` (needed by the integrity check) and
/// decoded body.
pub struct RawPacket {
    pub datalen: u32,
    pub body: Packet,
}

/// Read and decode the next packet from `cursor`. Returns `Ok(None)` on a
/// clean EOF at the type-byte boundary; any other short read is a
/// fatal [`VitalError::TruncatedStream`].
///
/// `registry` is consulted (for REC) and updated (for TRKINFO) as a side
/// effect, accumulated during the same parse pass.
pub fn read_packet(cursor: &mut Cursor<'_>, registry: &mut TrackRegistry) -> Result<Option<RawPacket>> {
    if cursor.remaining() == 0 {
        return Ok(None);
    }

    let offset = cursor.pos();
    let type_id = cursor.read_u8()?;
    let datalen = cursor.read_u32()?;

    let mut body = cursor.bounded(datalen as usize)?;

    let packet = match type_id {
        TYPE_DEVINFO => Packet::DevInfo(decode_devinfo(&mut body)?),
        TYPE_TRKINFO => {
            let info = decode_trkinfo(&mut body)?;
            registry.insert(info.clone());
            Packet::TrackInfo(info)
        }
        TYPE_REC => Packet::Rec(decode_rec(&mut body, datalen, offset, &*registry)?),
        TYPE_CMD => Packet::Cmd(decode_cmd(&mut body)?),
        other => return Err(VitalError::UnknownPacketType { offset, got: other }),
    };

    // Discard any residual/padding bytes regardless of what the body decoder consumed.
    cursor.advance(datalen as usize)?;

    Ok(Some(RawPacket { datalen, body: packet }))
}

fn decode_devinfo(body: &mut Cursor<'_>) -> Result<DevInfo> {
    let devid = body.read_u32()?;
    let typename = body.read_string()?;
    let devname = body.read_string()?;
    let port = body.read_string()?;
    Ok(DevInfo {
        devid,
        typename,
        devname,
        port,
    })
}

fn decode_trkinfo(body: &mut Cursor<'_>) -> Result<TrackInfo> {
    let trkid = body.read_u16()?;
    let rec_type = body.read_u8()?;
    let recfmt = body.read_u8()?;
    let name = body.read_string()?;
    let unit = body.read_string()?;
    let minval = body.read_f32()?;
    let maxval = body.read_f32()?;
    let mut color = [0u8; 4];
    for c in color.iter_mut() {
        *c = body.read_u8()?;
    }
    let srate = body.read_f32()?;
    let adc_gain = body.read_f64()?;
    let adc_offset = body.read_f64()?;
    let montype = body.read_u8()?;
    let devid = body.read_u32()?;

    Ok(TrackInfo {
        trkid,
        rec_type,
        recfmt,
        name,
        unit,
        minval,
        maxval,
        color,
        srate,
        adc_gain,
        adc_offset,
        montype,
        devid,
    })
}

fn decode_cmd(body: &mut Cursor<'_>) -> Result<Cmd> {
    let cmd = body.read_u8()?;
    Ok(match cmd {
        5 => {
            let cnt = body.read_u16()? as usize;
            let mut trkids = Vec::with_capacity(cnt);
            for _ in 0..cnt {
                trkids.push(body.read_u16()?);
            }
            Cmd::Order { trkids }
        }
        6 => Cmd::ResetEvents,
        other => Cmd::Other { cmd: other },
    })
}

/// Decode a REC body. `datalen` and `offset` are the enclosing
/// packet's length and absolute file offset, needed for the `infolen`-based
/// payload-budget arithmetic and for error reporting.
fn decode_rec(
    body: &mut Cursor<'_>,
    datalen: u32,
    offset: u64,
    registry: &TrackRegistry,
) -> Result<Rec> {
    let rec_start = body.pos();
    let infolen = body.read_u16()?;
    let dt = body.read_timestamp()?;
    let trkid = body.read_u16()?;

    // `infolen` bytes follow the infolen field itself and cover dt+trkid
    // (10 bytes) plus any reserved padding before the values start.
    let header_consumed = (body.pos() - rec_start) as usize - 2;
    let skip = (infolen as usize).saturating_sub(header_consumed);
    body.advance(skip)?;

    let budget = (datalen as i64) - (infolen as i64) - 2;
    if budget < 0 {
        return Err(VitalError::TruncatedStream { offset });
    }
    let mut values_body = body.bounded(budget as usize)?;

    let info = registry
        .get(trkid)
        .ok_or(VitalError::UnknownTrack { offset, trkid })?;
    let rec_type = RecType::from_byte(info.rec_type).ok_or(VitalError::UnknownRecType {
        offset,
        trkid,
        rec_type: info.rec_type,
    })?;
    let recfmt = crate::format::RecFmt::from_byte(info.recfmt).ok_or(VitalError::UnknownRecFmt {
        offset,
        trkid,
        recfmt: info.recfmt,
    })?;

    let values = match rec_type {
        RecType::Wav => {
            let num = values_body.read_u32()? as usize;
            let mut vals = Vec::with_capacity(num);
            for _ in 0..num {
                vals.push(values_body.read_value(recfmt)?);
            }
            RecValues::Wav(vals)
        }
        RecType::Num => RecValues::Num(values_body.read_value(recfmt)?),
        RecType::Str => {
            let _unused = values_body.read_u32()?;
            RecValues::Str(values_body.read_string()?)
        }
    };

    Ok(Rec { dt, trkid, values })
}
