use thiserror::Error;

#[derive(Error, Debug)]
pub enum VitalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("corrupt gzip container: {0}")]
    CorruptContainer(std::io::Error),

    #[error("bad header signature: expected b\"VITA\", got {got:?}")]
    BadSignature { got: [u8; 4] },

    #[error("unknown packet type at offset 0x{offset:X}: {got}")]
    UnknownPacketType { offset: u64, got: u8 },

    #[error("unknown rec_type {rec_type} for trkid {trkid} at offset 0x{offset:X}")]
    UnknownRecType {
        offset: u64,
        trkid: u16,
        rec_type: u8,
    },

    #[error("unknown recfmt {recfmt} for trkid {trkid} at offset 0x{offset:X}")]
    UnknownRecFmt {
        offset: u64,
        trkid: u16,
        recfmt: u8,
    },

    #[error("REC at offset 0x{offset:X} references unregistered trkid {trkid}")]
    UnknownTrack { offset: u64, trkid: u16 },

    #[error("truncated stream at offset 0x{offset:X}")]
    TruncatedStream { offset: u64 },

    #[error("invalid UTF-8 in string field at offset 0x{offset:X}")]
    EncodingError { offset: u64 },

    #[error(
        "integrity check failed: summed packet framing is {summed} bytes, decompressed file is {actual} bytes"
    )]
    IntegrityMismatch { summed: u64, actual: u64 },

    #[error("no track matches trkid={trkid:?} name={name:?}")]
    TrackNotFound {
        trkid: Option<u16>,
        name: Option<String>,
    },

    #[error("multiple tracks match name {name:?}")]
    AmbiguousTrack { name: String },

    #[error("trkid {trkid} and name {name:?} (trkid {name_trkid}) do not name the same track")]
    TrackMismatch {
        trkid: u16,
        name: String,
        name_trkid: u16,
    },

    #[error("invalid track selection: {0}")]
    InvalidSelection(String),
}

pub type Result<T> = std::result::Result<T, VitalError>;
