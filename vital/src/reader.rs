//! The gunzip reader, the aggregate file model, and the integrity check.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::codec::Cursor;
use crate::error::{Result, VitalError};
use crate::frame::Rec;
use crate::header::{HEADER_PREFIX_LEN, Header, PACKET_PREFIX_LEN};
use crate::record::{Packet, read_packet};
use crate::track::TrackInfo;
use crate::track::TrackRegistry;
use crate::view::TrackView;

/// A `.vital` file, fully decompressed into memory (typical captures are
/// tens to hundreds of MB, small enough to materialize whole).
pub struct VitalReader {
    buf: Vec<u8>,
}

/// Decompress a gzip-compressed `.vital` file fully into memory.
///
/// Parsers never need random access within the logical stream; full
/// materialization keeps the reader simple, matching the fixture-driven
/// workloads this format is used for.
pub fn open_vital(path: &Path) -> Result<VitalReader> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(file);
    let mut buf = Vec::new();
    decoder
        .read_to_end(&mut buf)
        .map_err(VitalError::CorruptContainer)?;
    Ok(VitalReader { buf })
}

/// Decoded `.vital` file contents: header, every TRKINFO (after EVENT
/// dedup) and every REC, in file order.
#[derive(Debug, Clone, serde::Serialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct VitalFile {
    pub header: Header,
    pub track_info: Vec<TrackInfo>,
    pub recs: Vec<Rec>,
    /// Every `trkid` ever declared by a TRKINFO, including EVENT duplicates
    /// dropped from `track_info`, so `get_track` can still resolve them.
    #[serde(skip)]
    trkid_index: HashMap<u16, TrackInfo>,
}

/// Parse a `.vital` file from its fully decompressed bytes.
pub fn parse_vital(reader: &VitalReader) -> Result<VitalFile> {
    let total_size = reader.buf.len() as u64;
    let mut cursor = Cursor::new(&reader.buf);

    let header = Header::parse(&mut cursor)?;

    let mut registry = TrackRegistry::new();
    let mut track_info = Vec::new();
    let mut recs = Vec::new();
    let mut summed: u64 = header.headerlen as u64 + HEADER_PREFIX_LEN;

    while let Some(framed) = read_packet(&mut cursor, &mut registry)? {
        summed += framed.datalen as u64 + PACKET_PREFIX_LEN;
        match framed.body {
            Packet::TrackInfo(info) => track_info.push(info),
            Packet::Rec(rec) => recs.push(rec),
            Packet::DevInfo(_) | Packet::Cmd(_) => {}
        }
    }

    if summed != total_size {
        return Err(VitalError::IntegrityMismatch {
            summed,
            actual: total_size,
        });
    }

    let trkid_index: HashMap<u16, TrackInfo> =
        track_info.iter().map(|t| (t.trkid, t.clone())).collect();

    dedup_event_tracks(&mut track_info);

    Ok(VitalFile {
        header,
        track_info,
        recs,
        trkid_index,
    })
}

/// An `EVENT` track may be declared more than once; keep only the first
/// declaration in the exposed list. RECs are unaffected — they still join by
/// `trkid`, and every `trkid` that was ever registered (including the
/// dropped duplicates') remains resolvable by [`VitalFile::get_track`].
fn dedup_event_tracks(track_info: &mut Vec<TrackInfo>) {
    let mut seen_event = false;
    track_info.retain(|t| {
        if t.name == "EVENT" {
            if seen_event {
                return false;
            }
            seen_event = true;
        }
        true
    });
}

impl VitalFile {
    /// Look up a track by `trkid`, by `name`, or both (in which case they
    /// must name the same track).
    pub fn get_track(&self, trkid: Option<u16>, name: Option<&str>) -> Result<TrackView<'_>> {
        let resolved_trkid = match (trkid, name) {
            (None, None) => {
                return Err(VitalError::TrackNotFound { trkid, name: None });
            }
            (Some(t), None) => t,
            (None, Some(n)) => self.trkid_for_name(n)?,
            (Some(t), Some(n)) => {
                let from_name = self.trkid_for_name(n)?;
                if from_name != t {
                    return Err(VitalError::TrackMismatch {
                        trkid: t,
                        name: n.to_string(),
                        name_trkid: from_name,
                    });
                }
                t
            }
        };

        let info = self
            .trkid_index
            .get(&resolved_trkid)
            .ok_or(VitalError::TrackNotFound {
                trkid: Some(resolved_trkid),
                name: name.map(str::to_string),
            })?;

        let recs: Vec<&Rec> = self
            .recs
            .iter()
            .filter(|r| r.trkid == resolved_trkid)
            .collect();

        Ok(TrackView::new(info, recs))
    }

    fn trkid_for_name(&self, name: &str) -> Result<u16> {
        let mut matches = self.track_info.iter().filter(|t| t.name == name);
        let first = matches.next().ok_or(VitalError::TrackNotFound {
            trkid: None,
            name: Some(name.to_string()),
        })?;
        if matches.next().is_some() {
            return Err(VitalError::AmbiguousTrack {
                name: name.to_string(),
            });
        }
        Ok(first.trkid)
    }
}
